use crate::battle::ai::{Behavior, ScoringAI};
use crate::battle::engine;
use crate::battle::state::{
    BattleEvent, BattleKind, BattleOutcome, BattleState, CaptureRecord, EventBus, GameState, Side,
    TurnRng, WeatherState,
};
use crate::battle::validation::{valid_actions, validate_player_action};
use crate::catalog::Catalog;
use crate::errors::{ActionError, BattleResult, BattleStateError};
use crate::player::{BattlePlayer, PlayerAction, PlayerType, MAX_TEAM_SIZE};
use crate::pokemon::{PokemonInst, StatusCondition};
use schema::PokemonType;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Snapshot of one active Pokemon for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveStatus {
    pub name: String,
    pub species: String,
    pub level: u8,
    pub types: Vec<PokemonType>,
    pub current_hp: u16,
    pub max_hp: u16,
    pub status: Option<StatusCondition>,
    pub confused: bool,
}

impl ActiveStatus {
    fn of(pokemon: &PokemonInst) -> Self {
        Self {
            name: pokemon.name.clone(),
            species: pokemon.species_name.clone(),
            level: pokemon.level,
            types: pokemon.types.clone(),
            current_hp: pokemon.current_hp(),
            max_hp: pokemon.max_hp(),
            status: pokemon.status,
            confused: pokemon.is_confused(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideStatus {
    pub trainer: String,
    pub active: Option<ActiveStatus>,
    pub healthy_remaining: usize,
    pub action_pending: bool,
}

/// Read-only view of the battle, safe to hand to a UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleStatus {
    pub kind: BattleKind,
    pub turn_number: u32,
    pub is_over: bool,
    pub winner: Option<Side>,
    pub weather: Option<WeatherState>,
    pub can_catch: bool,
    pub can_run: bool,
    pub player: SideStatus,
    pub opponent: SideStatus,
}

/// What the caller needs once the battle is over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    pub capture: Option<CaptureRecord>,
    /// Paid to the player when they beat a trainer.
    pub prize_money: u32,
    pub turns: u32,
}

/// Owns one battle from the opening line to the result.
///
/// Callers submit one action per side, then call [`BattleSession::resolve_turn`].
/// Every event is formatted into the session log as it happens.
#[derive(Debug)]
pub struct BattleSession {
    catalog: Arc<Catalog>,
    state: BattleState,
    rng: TurnRng,
    log: Vec<String>,
}

impl BattleSession {
    pub fn new(
        catalog: Arc<Catalog>,
        kind: BattleKind,
        player: BattlePlayer,
        opponent: BattlePlayer,
        rng: TurnRng,
    ) -> BattleResult<Self> {
        for (side, roster) in [(Side::Player, &player), (Side::Opponent, &opponent)] {
            validate_roster(side, roster)?;
        }
        let battle_id = format!("{}-vs-{}", player.player_id, opponent.player_id);
        Ok(Self {
            catalog,
            state: BattleState::new(battle_id, kind, player, opponent),
            rng,
            log: Vec::new(),
        })
    }

    /// Sends out each side's first healthy Pokemon and writes the opening lines.
    pub fn start(&mut self) -> BattleResult<Vec<String>> {
        if self.state.game_state != GameState::NotStarted {
            return Err(BattleStateError::AlreadyStarted.into());
        }

        let mut bus = EventBus::new();
        for side in Side::both() {
            let player = self.state.player_mut(side);
            let first = player
                .first_healthy_index()
                .ok_or(BattleStateError::NoHealthyPokemon(side))?;
            player.active_pokemon_index = first;
        }

        bus.push(BattleEvent::BattleStarted);
        let opponent = self.state.player(Side::Opponent);
        let opponent_lead = opponent
            .active_pokemon()
            .map(|p| p.name.clone())
            .unwrap_or_default();
        if self.state.kind.is_wild() {
            bus.push(BattleEvent::WildPokemonAppeared {
                pokemon: opponent_lead,
            });
        } else {
            bus.push(BattleEvent::TrainerChallenged {
                kind: self.state.kind,
                trainer: opponent.player_name.clone(),
            });
            bus.push(BattleEvent::PokemonSentOut {
                side: Side::Opponent,
                trainer: opponent.player_name.clone(),
                pokemon: opponent_lead,
            });
        }
        let player = self.state.player(Side::Player);
        if let Some(lead) = player.active_pokemon() {
            bus.push(BattleEvent::PokemonSentOut {
                side: Side::Player,
                trainer: player.player_name.clone(),
                pokemon: lead.name.clone(),
            });
        }

        self.state.game_state = GameState::WaitingForActions;
        info!(battle = %self.state.battle_id, kind = %self.state.kind, "battle started");
        Ok(self.record(&bus))
    }

    /// Queues `action` for `side` after checking it is legal.
    pub fn submit_action(&mut self, side: Side, action: PlayerAction) -> Result<(), ActionError> {
        if self.state.game_state != GameState::WaitingForActions {
            return Err(ActionError::NotAcceptingActions);
        }
        if self.state.action_queue[side.to_index()].is_some() {
            return Err(ActionError::ActionAlreadyPending(side));
        }
        validate_player_action(&self.state, side, &action)?;
        debug!(%side, ?action, "action submitted");
        self.state.action_queue[side.to_index()] = Some(action);
        Ok(())
    }

    /// Lets the opponent policy pick and queue an action for `side`. NPC players
    /// use their own tier; anyone else plays at the battle kind's default.
    pub fn submit_ai_action(&mut self, side: Side) -> Result<PlayerAction, ActionError> {
        let tier = match self.state.player(side).player_type {
            PlayerType::Npc { ai_tier } => ai_tier,
            PlayerType::Human => self.state.kind.default_ai_tier(),
        };
        let action = ScoringAI::new(tier).decide_action(side, &self.state, &mut self.rng);
        self.submit_action(side, action.clone())?;
        Ok(action)
    }

    pub fn ready_for_turn_resolution(&self) -> bool {
        engine::ready_for_turn_resolution(&self.state)
    }

    /// Resolves one turn and returns the lines it added to the log.
    pub fn resolve_turn(&mut self) -> BattleResult<Vec<String>> {
        match self.state.game_state {
            GameState::NotStarted => return Err(BattleStateError::NotStarted.into()),
            GameState::Finished(_) => return Err(BattleStateError::BattleOver.into()),
            GameState::WaitingForActions | GameState::TurnInProgress => {}
        }
        if let Some(side) = Side::both()
            .into_iter()
            .find(|side| self.state.action_queue[side.to_index()].is_none())
        {
            return Err(BattleStateError::AwaitingAction(side).into());
        }

        let bus = engine::resolve_turn(&mut self.state, &self.catalog, &mut self.rng);
        if let Some(outcome) = self.state.outcome() {
            info!(battle = %self.state.battle_id, ?outcome, turns = self.state.turn_number, "battle over");
        }
        Ok(self.record(&bus))
    }

    /// Fills every empty action slot from the opponent policy, then resolves.
    pub fn auto_resolve_turn(&mut self) -> BattleResult<Vec<String>> {
        for side in Side::both() {
            if self.state.action_queue[side.to_index()].is_none() && !self.state.is_over() {
                self.submit_ai_action(side)?;
            }
        }
        self.resolve_turn()
    }

    pub fn status(&self) -> BattleStatus {
        let side_status = |side: Side| {
            let player = self.state.player(side);
            SideStatus {
                trainer: player.player_name.clone(),
                active: player.active_pokemon().map(ActiveStatus::of),
                healthy_remaining: player.team.iter().filter(|p| !p.is_fainted()).count(),
                action_pending: self.state.action_queue[side.to_index()].is_some(),
            }
        };
        let winner = match self.state.outcome() {
            Some(BattleOutcome::Winner(side)) => Some(side),
            _ => None,
        };
        let open = !self.state.is_over();

        BattleStatus {
            kind: self.state.kind,
            turn_number: self.state.turn_number,
            is_over: self.state.is_over(),
            winner,
            weather: self.state.weather,
            can_catch: open && self.state.kind.is_wild(),
            can_run: open && self.state.kind.is_wild(),
            player: side_status(Side::Player),
            opponent: side_status(Side::Opponent),
        }
    }

    /// Every formatted line so far, oldest first.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// `None` until the battle ends.
    pub fn outcome(&self) -> Option<BattleReport> {
        let outcome = self.state.outcome()?;
        let prize_money = match outcome {
            BattleOutcome::Winner(Side::Player) => self.state.player(Side::Opponent).prize_money,
            _ => 0,
        };
        Some(BattleReport {
            outcome,
            capture: self.state.capture.clone(),
            prize_money,
            turns: self.state.turn_number,
        })
    }

    pub fn valid_actions(&self, side: Side) -> Vec<PlayerAction> {
        valid_actions(&self.state, side)
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Hands both rosters back, with experience, damage and catches applied.
    pub fn into_players(self) -> [BattlePlayer; 2] {
        self.state.players
    }

    fn record(&mut self, bus: &EventBus) -> Vec<String> {
        let lines = bus.formatted_lines();
        self.log.extend(lines.iter().cloned());
        lines
    }
}

fn validate_roster(side: Side, player: &BattlePlayer) -> Result<(), BattleStateError> {
    if player.team.is_empty() {
        return Err(BattleStateError::EmptyRoster(side));
    }
    if player.team.len() > MAX_TEAM_SIZE {
        return Err(BattleStateError::RosterTooLarge {
            side,
            size: player.team.len(),
        });
    }
    if !player.has_healthy_pokemon() {
        return Err(BattleStateError::NoHealthyPokemon(side));
    }
    Ok(())
}
