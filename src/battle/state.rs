use crate::items::Item;
use crate::player::{BattlePlayer, PlayerAction};
use crate::pokemon::PokemonInst;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::{StatType, StatusType, Weather};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// One of the two sides of a battle. The player side is always index 0.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn to_index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Opponent => 1,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    pub fn both() -> [Side; 2] {
        [Side::Player, Side::Opponent]
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "Player"),
            Side::Opponent => write!(f, "Opponent"),
        }
    }
}

/// What kind of encounter this is. Trainer kinds carry a default AI tier.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleKind {
    Wild,
    Trainer,
    GymLeader,
    EliteFour,
    Champion,
}

impl BattleKind {
    pub fn is_wild(&self) -> bool {
        matches!(self, BattleKind::Wild)
    }

    pub fn default_ai_tier(&self) -> u8 {
        match self {
            BattleKind::Wild => 1,
            BattleKind::Trainer => 2,
            BattleKind::GymLeader => 3,
            BattleKind::EliteFour => 4,
            BattleKind::Champion => 5,
        }
    }
}

impl fmt::Display for BattleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = match self {
            BattleKind::Wild => "Wild",
            BattleKind::Trainer => "Trainer",
            BattleKind::GymLeader => "Gym Leader",
            BattleKind::EliteFour => "Elite Four",
            BattleKind::Champion => "Champion",
        };
        write!(f, "{}", class)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Winner(Side),
    Fled,
    Captured,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    NotStarted,
    WaitingForActions,
    TurnInProgress,
    Finished(BattleOutcome),
}

impl GameState {
    pub fn is_over(&self) -> bool {
        matches!(self, GameState::Finished(_))
    }
}

/// Where a newly caught Pokemon ended up.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureDestination {
    Party(usize),
    Storage(usize),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CaptureRecord {
    pub pokemon: String,
    pub destination: CaptureDestination,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherState {
    pub weather: Weather,
    pub turns_remaining: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Battle Flow
    BattleStarted,
    WildPokemonAppeared {
        pokemon: String,
    },
    TrainerChallenged {
        kind: BattleKind,
        trainer: String,
    },
    TurnStarted {
        turn_number: u32,
    },
    TurnEnded,
    BattleEnded {
        outcome: BattleOutcome,
    },
    PrizeMoneyAwarded {
        amount: u32,
    },
    PlayerBlackedOut,

    // Pokemon Actions
    PokemonSentOut {
        side: Side,
        trainer: String,
        pokemon: String,
    },
    PokemonWithdrawn {
        side: Side,
        trainer: String,
        pokemon: String,
    },
    MoveUsed {
        pokemon: String,
        move_name: String,
    },
    NoMovesLeft {
        pokemon: String,
    },
    MoveMissed {
        attacker: String,
    },
    MoveFailed,
    NothingHappened,
    CriticalHit,
    AttackTypeEffectiveness {
        multiplier: f32,
    },
    DamageDealt {
        target: String,
        damage: u16,
        remaining_hp: u16,
    },
    PokemonHealed {
        target: String,
        amount: u16,
    },
    PokemonFainted {
        pokemon: String,
    },
    RecoilDamage {
        pokemon: String,
        damage: u16,
    },
    EnergyDrained {
        target: String,
    },

    // Status Effects
    StatusApplied {
        target: String,
        status: StatusType,
    },
    StatusCured {
        target: String,
        status: StatusType,
    },
    StatusDamage {
        target: String,
        status: StatusType,
        damage: u16,
    },
    WokeUp {
        pokemon: String,
    },
    FastAsleep {
        pokemon: String,
    },
    FullyParalyzed {
        pokemon: String,
    },
    ThawedOut {
        pokemon: String,
    },
    FrozenSolid {
        pokemon: String,
    },
    SnappedOutOfConfusion {
        pokemon: String,
    },
    IsConfused {
        pokemon: String,
    },
    HurtInConfusion {
        pokemon: String,
        damage: u16,
    },
    Flinched {
        pokemon: String,
    },

    // Stat Stages
    StatStageChanged {
        target: String,
        stat: StatType,
        delta: i8,
    },
    StatStageBlocked {
        target: String,
        stat: StatType,
        rising: bool,
    },

    // Weather
    WeatherStarted {
        weather: Weather,
    },
    WeatherEnded {
        weather: Weather,
    },
    WeatherDamage {
        target: String,
        weather: Weather,
        damage: u16,
    },

    // Progression
    ExperienceGained {
        pokemon: String,
        amount: u32,
    },
    LevelUp {
        pokemon: String,
        new_level: u8,
    },
    TryingToLearnMove {
        pokemon: String,
        move_name: String,
    },
    MoveLearned {
        pokemon: String,
        move_name: String,
    },

    // Items, Capture and Escape
    ItemUsed {
        trainer: String,
        item: Item,
    },
    ItemResult {
        message: String,
    },
    BallThrown {
        trainer: String,
        ball: Item,
    },
    BallShook,
    PokemonCaught {
        pokemon: String,
    },
    AddedToParty {
        pokemon: String,
    },
    SentToStorage {
        pokemon: String,
    },
    BrokeFree {
        pokemon: String,
        shakes: u8,
    },
    FleeSucceeded,
    FleeFailed,
    ActionFailed {
        reason: ActionFailureReason,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ActionFailureReason {
    SwitchTargetFainted,
    SwitchTargetActive,
    NoSuchPokemon,
    ItemNotAvailable,
    CaptureNotAllowed,
    FleeNotAllowed,
}

fn stat_change_verb(delta: i8) -> &'static str {
    match delta {
        1 => "rose!",
        2 => "rose sharply!",
        d if d >= 3 => "rose drastically!",
        -1 => "fell!",
        -2 => "fell harshly!",
        _ => "fell severely!",
    }
}

impl BattleEvent {
    /// Human-readable text for the battle log. Silent bookkeeping events return `None`.
    pub fn format(&self) -> Option<String> {
        let text = match self {
            BattleEvent::BattleStarted => "Battle started!".to_string(),
            BattleEvent::WildPokemonAppeared { pokemon } => format!("A wild {} appeared!", pokemon),
            BattleEvent::TrainerChallenged { kind, trainer } => {
                format!("{} {} wants to battle!", kind, trainer)
            }
            BattleEvent::TurnStarted { turn_number } => format!("=== Turn {} ===", turn_number),
            BattleEvent::TurnEnded => return None,
            BattleEvent::BattleEnded { outcome } => match outcome {
                BattleOutcome::Winner(Side::Player) => "You won!".to_string(),
                BattleOutcome::Winner(Side::Opponent) => "You lost!".to_string(),
                BattleOutcome::Fled | BattleOutcome::Captured => return None,
            },
            BattleEvent::PrizeMoneyAwarded { amount } => {
                format!("You got ${} for winning!", amount)
            }
            BattleEvent::PlayerBlackedOut => "You blacked out!".to_string(),

            BattleEvent::PokemonSentOut { side, trainer, pokemon } => match side {
                Side::Player => format!("Go! {}!", pokemon),
                Side::Opponent => format!("{} sent out {}!", trainer, pokemon),
            },
            BattleEvent::PokemonWithdrawn { side, trainer, pokemon } => match side {
                Side::Player => format!("Come back, {}!", pokemon),
                Side::Opponent => format!("{} withdrew {}!", trainer, pokemon),
            },
            BattleEvent::MoveUsed { pokemon, move_name } => {
                format!("{} used {}!", pokemon, move_name)
            }
            BattleEvent::NoMovesLeft { pokemon } => format!("{} has no moves left!", pokemon),
            BattleEvent::MoveMissed { attacker } => format!("{}'s attack missed!", attacker),
            BattleEvent::MoveFailed => "But it failed!".to_string(),
            BattleEvent::NothingHappened => "But nothing happened!".to_string(),
            BattleEvent::CriticalHit => "A critical hit!".to_string(),
            BattleEvent::AttackTypeEffectiveness { multiplier } => {
                if *multiplier > 1.0 {
                    "It's super effective!".to_string()
                } else if *multiplier == 0.0 {
                    "It had no effect!".to_string()
                } else if *multiplier < 1.0 {
                    "It's not very effective...".to_string()
                } else {
                    return None;
                }
            }
            BattleEvent::DamageDealt { target, damage, .. } => {
                format!("{} took {} damage!", target, damage)
            }
            BattleEvent::PokemonHealed { target, .. } => format!("{} restored its HP!", target),
            BattleEvent::PokemonFainted { pokemon } => format!("{} fainted!", pokemon),
            BattleEvent::RecoilDamage { pokemon, .. } => {
                format!("{} was damaged by recoil!", pokemon)
            }
            BattleEvent::EnergyDrained { target } => {
                format!("{} had its energy drained!", target)
            }

            BattleEvent::StatusApplied { target, status } => match status {
                StatusType::Sleep => format!("{} fell asleep!", target),
                StatusType::Poison => format!("{} was poisoned!", target),
                StatusType::BadlyPoison => format!("{} was badly poisoned!", target),
                StatusType::Burn => format!("{} was burned!", target),
                StatusType::Freeze => format!("{} was frozen solid!", target),
                StatusType::Paralysis => {
                    format!("{} is paralyzed! It may be unable to move!", target)
                }
                StatusType::Confusion => format!("{} became confused!", target),
            },
            BattleEvent::StatusCured { target, status } => {
                format!("{} was cured of its {}!", target, status)
            }
            BattleEvent::StatusDamage { target, status, .. } => match status {
                StatusType::Burn => format!("{} is hurt by its burn!", target),
                _ => format!("{} is hurt by poison!", target),
            },
            BattleEvent::WokeUp { pokemon } => format!("{} woke up!", pokemon),
            BattleEvent::FastAsleep { pokemon } => format!("{} is fast asleep!", pokemon),
            BattleEvent::FullyParalyzed { pokemon } => {
                format!("{} is paralyzed! It can't move!", pokemon)
            }
            BattleEvent::ThawedOut { pokemon } => format!("{} thawed out!", pokemon),
            BattleEvent::FrozenSolid { pokemon } => format!("{} is frozen solid!", pokemon),
            BattleEvent::SnappedOutOfConfusion { pokemon } => {
                format!("{} snapped out of confusion!", pokemon)
            }
            BattleEvent::IsConfused { pokemon } => format!("{} is confused!", pokemon),
            BattleEvent::HurtInConfusion { pokemon, .. } => {
                format!("{} hurt itself in confusion!", pokemon)
            }
            BattleEvent::Flinched { pokemon } => format!("{} flinched and couldn't move!", pokemon),

            BattleEvent::StatStageChanged { target, stat, delta } => {
                format!("{}'s {} {}", target, stat, stat_change_verb(*delta))
            }
            BattleEvent::StatStageBlocked { target, stat, rising } => {
                let direction = if *rising { "higher" } else { "lower" };
                format!("{}'s {} won't go any {}!", target, stat, direction)
            }

            BattleEvent::WeatherStarted { weather } => weather.start_message().to_string(),
            BattleEvent::WeatherEnded { weather } => weather.end_message().to_string(),
            BattleEvent::WeatherDamage { target, weather, .. } => {
                format!("{} {}!", target, weather.damage_verb())
            }

            BattleEvent::ExperienceGained { pokemon, amount } => {
                format!("{} gained {} Exp. Points!", pokemon, amount)
            }
            BattleEvent::LevelUp { pokemon, new_level } => {
                format!("{} grew to level {}!", pokemon, new_level)
            }
            BattleEvent::TryingToLearnMove { pokemon, move_name } => {
                format!("{} is trying to learn {}!", pokemon, move_name)
            }
            BattleEvent::MoveLearned { pokemon, move_name } => {
                format!("{} learned {}!", pokemon, move_name)
            }

            BattleEvent::ItemUsed { trainer, item } => format!("{} used {}!", trainer, item),
            BattleEvent::ItemResult { message } => message.clone(),
            BattleEvent::BallThrown { trainer, ball } => format!("{} threw a {}!", trainer, ball),
            BattleEvent::BallShook => "*shake*".to_string(),
            BattleEvent::PokemonCaught { pokemon } => format!("Gotcha! {} was caught!", pokemon),
            BattleEvent::AddedToParty { pokemon } => {
                format!("{} was added to your party!", pokemon)
            }
            BattleEvent::SentToStorage { pokemon } => format!("{} was sent to the PC!", pokemon),
            BattleEvent::BrokeFree { pokemon, shakes } => {
                let commentary = match shakes {
                    0 => "It didn't even shake!",
                    1 => "Darn! It appeared to be caught!",
                    2 => "Aargh! Almost had it!",
                    _ => "Shoot! It was so close, too!",
                };
                format!("Oh no! {} broke free! {}", pokemon, commentary)
            }
            BattleEvent::FleeSucceeded => "Got away safely!".to_string(),
            BattleEvent::FleeFailed => "Can't escape!".to_string(),
            BattleEvent::ActionFailed { reason } => match reason {
                ActionFailureReason::SwitchTargetFainted => {
                    "There's no will to fight!".to_string()
                }
                ActionFailureReason::SwitchTargetActive => "It's already in battle!".to_string(),
                ActionFailureReason::NoSuchPokemon => "There's no Pokemon there!".to_string(),
                ActionFailureReason::ItemNotAvailable => "There's no such item left!".to_string(),
                ActionFailureReason::CaptureNotAllowed => {
                    "You can't catch a trainer's Pokemon!".to_string()
                }
                ActionFailureReason::FleeNotAllowed => {
                    "There's no running from a trainer battle!".to_string()
                }
            },
        };
        Some(text)
    }
}

/// Ordered collection of events produced while resolving one step of a battle.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = BattleEvent>) {
        self.events.extend(events);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Formatted lines for every event that has display text.
    pub fn formatted_lines(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }
}

impl fmt::Display for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.formatted_lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum RngSource {
    Seeded(StdRng),
    Scripted { outcomes: Vec<u32>, index: usize },
}

/// The single source of randomness for a battle.
///
/// Seeded mode draws from a `StdRng`. Scripted mode replays a fixed list of
/// values for tests, clamping each into the requested range and repeating the
/// last value once the script runs out.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

impl TurnRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn new_random() -> Self {
        Self::from_seed(rand::rng().random())
    }

    pub fn new_for_test(outcomes: Vec<u32>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    /// Inclusive draw in `lo..=hi`.
    pub fn range(&mut self, reason: &str, lo: u32, hi: u32) -> u32 {
        let outcome = match &mut self.source {
            RngSource::Seeded(rng) => rng.random_range(lo..=hi),
            RngSource::Scripted { outcomes, index } => {
                let raw = outcomes
                    .get(*index)
                    .or_else(|| outcomes.last())
                    .copied()
                    .unwrap_or(50);
                *index += 1;
                raw.clamp(lo, hi)
            }
        };
        trace!(reason, outcome, "rng");
        outcome
    }

    /// Percentile roll in `1..=100`.
    pub fn percent(&mut self, reason: &str) -> u8 {
        self.range(reason, 1, 100) as u8
    }

    /// True with `chance` percent probability. 0 and 100 do not draw.
    pub fn chance(&mut self, reason: &str, chance: u8) -> bool {
        match chance {
            0 => false,
            c if c >= 100 => true,
            c => self.percent(reason) <= c,
        }
    }

    /// Uniform index into a collection of `len` items.
    pub fn pick(&mut self, reason: &str, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.range(reason, 0, (len - 1) as u32) as usize
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattleState {
    pub battle_id: String,
    pub kind: BattleKind,
    pub players: [BattlePlayer; 2],
    pub turn_number: u32,
    pub game_state: GameState,
    pub action_queue: [Option<PlayerAction>; 2],
    pub weather: Option<WeatherState>,
    pub flee_attempts: u32,
    pub capture: Option<CaptureRecord>,
}

impl BattleState {
    pub fn new(battle_id: String, kind: BattleKind, player: BattlePlayer, opponent: BattlePlayer) -> Self {
        Self {
            battle_id,
            kind,
            players: [player, opponent],
            turn_number: 0,
            game_state: GameState::NotStarted,
            action_queue: [None, None],
            weather: None,
            flee_attempts: 0,
            capture: None,
        }
    }

    pub fn player(&self, side: Side) -> &BattlePlayer {
        &self.players[side.to_index()]
    }

    pub fn player_mut(&mut self, side: Side) -> &mut BattlePlayer {
        &mut self.players[side.to_index()]
    }

    pub fn active(&self, side: Side) -> Option<&PokemonInst> {
        self.player(side).active_pokemon()
    }

    pub fn active_mut(&mut self, side: Side) -> Option<&mut PokemonInst> {
        self.player_mut(side).active_pokemon_mut()
    }

    /// Mutable access to both active Pokemon at once, ordered (actor, other).
    pub fn active_pair_mut(&mut self, actor: Side) -> Option<(&mut PokemonInst, &mut PokemonInst)> {
        let [player, opponent] = &mut self.players;
        let (acting, other) = match actor {
            Side::Player => (player, opponent),
            Side::Opponent => (opponent, player),
        };
        Some((acting.active_pokemon_mut()?, other.active_pokemon_mut()?))
    }

    pub fn is_over(&self) -> bool {
        self.game_state.is_over()
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self.game_state {
            GameState::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Marks the battle finished and records the closing lines.
    pub fn end_battle(&mut self, outcome: BattleOutcome, bus: &mut EventBus) {
        self.game_state = GameState::Finished(outcome);
        self.action_queue = [None, None];
        bus.push(BattleEvent::BattleEnded { outcome });

        match outcome {
            BattleOutcome::Winner(Side::Player) => {
                let prize = self.player(Side::Opponent).prize_money;
                if prize > 0 {
                    bus.push(BattleEvent::PrizeMoneyAwarded { amount: prize });
                }
            }
            BattleOutcome::Winner(Side::Opponent) => {
                if !self.kind.is_wild() {
                    bus.push(BattleEvent::PlayerBlackedOut);
                }
            }
            BattleOutcome::Fled | BattleOutcome::Captured => {}
        }
    }
}
