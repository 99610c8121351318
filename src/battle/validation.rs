//! Legality checks for submitted actions. Nothing here mutates the battle.

use crate::battle::state::{BattleState, Side};
use crate::errors::ActionError;
use crate::items::Item;
use crate::player::{BattlePlayer, PlayerAction};

/// Checks `action` against the current state of `side`. The resolver assumes
/// every queued action passed through here.
pub fn validate_player_action(
    battle_state: &BattleState,
    side: Side,
    action: &PlayerAction,
) -> Result<(), ActionError> {
    let player = battle_state.player(side);

    match action {
        PlayerAction::UseMove { move_index } => {
            let pokemon = player
                .active_pokemon()
                .ok_or(ActionError::InvalidPokemonIndex(player.active_pokemon_index))?;
            let move_instance = pokemon
                .moves
                .get(*move_index)
                .ok_or(ActionError::InvalidMoveIndex(*move_index))?;
            // An empty moveset falls back to Struggle when the move resolves.
            if move_instance.pp == 0 && pokemon.has_usable_moves() {
                return Err(ActionError::NoPpRemaining(*move_index));
            }
        }
        PlayerAction::Struggle => {
            if player.active_pokemon().is_some_and(|p| p.has_usable_moves()) {
                return Err(ActionError::StruggleNotNeeded);
            }
        }
        PlayerAction::SwitchPokemon { team_index } => {
            validate_switch_target(player, *team_index)?;
        }
        PlayerAction::UseItem {
            item,
            target_index,
            ..
        } => validate_item(battle_state, side, *item, *target_index)?,
        PlayerAction::Flee => {
            if !battle_state.kind.is_wild() {
                return Err(ActionError::FleeNotAllowed);
            }
        }
    }

    Ok(())
}

fn validate_switch_target(player: &BattlePlayer, team_index: usize) -> Result<(), ActionError> {
    let target = player
        .team
        .get(team_index)
        .ok_or(ActionError::InvalidPokemonIndex(team_index))?;
    if target.is_fainted() {
        return Err(ActionError::SwitchToFainted(team_index));
    }
    if team_index == player.active_pokemon_index {
        return Err(ActionError::SwitchToActive(team_index));
    }
    Ok(())
}

fn validate_item(
    battle_state: &BattleState,
    side: Side,
    item: Item,
    target_index: usize,
) -> Result<(), ActionError> {
    let player = battle_state.player(side);
    if player.item_count(item) == 0 {
        return Err(ActionError::ItemNotInBag(item));
    }
    if !item.usable_in_battle() {
        return Err(ActionError::ItemNotUsableInBattle(item));
    }
    if item.is_ball() {
        // Only the player can throw, and only at wild Pokemon.
        if !battle_state.kind.is_wild() || side != Side::Player {
            return Err(ActionError::CaptureNotAllowed);
        }
        return Ok(());
    }
    if !item.targets_active_only() && target_index >= player.team.len() {
        return Err(ActionError::InvalidPokemonIndex(target_index));
    }
    Ok(())
}

/// Every action `side` could legally submit right now.
pub fn valid_actions(battle_state: &BattleState, side: Side) -> Vec<PlayerAction> {
    let player = battle_state.player(side);
    let mut actions = Vec::new();

    if let Some(pokemon) = player.active_pokemon() {
        if pokemon.has_usable_moves() {
            actions.extend(
                pokemon
                    .moves
                    .iter()
                    .enumerate()
                    .filter(|(_, m)| m.pp > 0)
                    .map(|(move_index, _)| PlayerAction::UseMove { move_index }),
            );
        } else {
            actions.push(PlayerAction::Struggle);
        }
    }

    actions.extend(
        (0..player.team.len())
            .filter(|&team_index| validate_switch_target(player, team_index).is_ok())
            .map(|team_index| PlayerAction::SwitchPokemon { team_index }),
    );

    let mut items: Vec<Item> = player.bag.keys().copied().collect();
    items.sort_by_key(|item| item.to_string());
    for item in items {
        let targets: Vec<usize> = if item.is_ball() || item.targets_active_only() {
            vec![player.active_pokemon_index]
        } else {
            (0..player.team.len()).collect()
        };
        for target_index in targets {
            let action = PlayerAction::UseItem {
                item,
                target_index,
                move_index: None,
            };
            if validate_player_action(battle_state, side, &action).is_ok() {
                actions.push(action);
            }
        }
    }

    if battle_state.kind.is_wild() {
        actions.push(PlayerAction::Flee);
    }

    actions
}
