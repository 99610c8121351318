use std::cmp::Reverse;
use std::collections::VecDeque;

use crate::battle::state::{BattleState, Side};
use crate::battle::stats::effective_speed;
use crate::items::Item;
use crate::player::PlayerAction;
use tracing::debug;

/// Internal action types for the action stack.
/// Each one remembers which roster slot queued it so a stale move can be skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleAction {
    Move {
        side: Side,
        actor_index: usize,
        move_index: usize,
    },
    Struggle {
        side: Side,
        actor_index: usize,
    },
    Switch {
        side: Side,
        team_index: usize,
    },
    UseItem {
        side: Side,
        item: Item,
        target_index: usize,
        move_index: Option<usize>,
    },
    Flee {
        side: Side,
    },
}

impl BattleAction {
    pub fn side(&self) -> Side {
        match self {
            BattleAction::Move { side, .. }
            | BattleAction::Struggle { side, .. }
            | BattleAction::Switch { side, .. }
            | BattleAction::UseItem { side, .. }
            | BattleAction::Flee { side } => *side,
        }
    }
}

#[derive(Debug, Default)]
pub struct ActionStack {
    actions: VecDeque<BattleAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct ActionPriority {
    action_priority: i8, // Switch, item and flee: 6, moves: 0
    move_priority: i8,
    speed: u16,
}

const NON_MOVE_PRIORITY: i8 = 6;

impl ActionStack {
    /// Builds this turn's ordered actions from the queued choices. Higher action
    /// priority first, then move priority, then effective speed. Exact ties keep
    /// submission order, which puts the player side first.
    pub fn build_initial(battle_state: &BattleState) -> Self {
        let mut queued: Vec<(BattleAction, ActionPriority)> = Side::both()
            .into_iter()
            .filter_map(|side| {
                let action = battle_state.action_queue[side.to_index()].as_ref()?;
                let battle_action = Self::convert_player_action(side, action, battle_state);
                let priority = Self::calculate_action_priority(&battle_action, battle_state);
                Some((battle_action, priority))
            })
            .collect();

        queued.sort_by_key(|(_, priority)| Reverse(*priority));
        debug!(order = ?queued.iter().map(|(a, _)| a.side()).collect::<Vec<_>>(), "action order");

        Self {
            actions: queued.into_iter().map(|(action, _)| action).collect(),
        }
    }

    pub fn pop_front(&mut self) -> Option<BattleAction> {
        self.actions.pop_front()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    fn convert_player_action(side: Side, action: &PlayerAction, state: &BattleState) -> BattleAction {
        let actor_index = state.player(side).active_pokemon_index;
        match action {
            PlayerAction::UseMove { move_index } => BattleAction::Move {
                side,
                actor_index,
                move_index: *move_index,
            },
            PlayerAction::Struggle => BattleAction::Struggle { side, actor_index },
            PlayerAction::SwitchPokemon { team_index } => BattleAction::Switch {
                side,
                team_index: *team_index,
            },
            PlayerAction::UseItem {
                item,
                target_index,
                move_index,
            } => BattleAction::UseItem {
                side,
                item: *item,
                target_index: *target_index,
                move_index: *move_index,
            },
            PlayerAction::Flee => BattleAction::Flee { side },
        }
    }

    fn calculate_action_priority(action: &BattleAction, state: &BattleState) -> ActionPriority {
        let speed = state.active(action.side()).map(effective_speed).unwrap_or(0);
        match action {
            BattleAction::Switch { .. } | BattleAction::UseItem { .. } | BattleAction::Flee { .. } => {
                ActionPriority {
                    action_priority: NON_MOVE_PRIORITY,
                    move_priority: 0,
                    speed,
                }
            }
            BattleAction::Move {
                side, move_index, ..
            } => {
                let move_priority = state
                    .active(*side)
                    .and_then(|p| p.moves.get(*move_index))
                    .map(|m| m.data.priority)
                    .unwrap_or(0);
                ActionPriority {
                    action_priority: 0,
                    move_priority,
                    speed,
                }
            }
            BattleAction::Struggle { .. } => ActionPriority {
                action_priority: 0,
                move_priority: 0,
                speed,
            },
        }
    }
}
