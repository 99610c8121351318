//! Throwing capture devices at wild Pokemon.

pub mod calculation;

pub use calculation::*;

use crate::battle::state::{
    ActionFailureReason, BattleEvent, BattleOutcome, BattleState, CaptureDestination,
    CaptureRecord, EventBus, Side, TurnRng,
};
use crate::items::Item;
use tracing::info;

/// Resolves a ball thrown by `side`. The ball is spent whether or not the
/// capture works. A successful capture moves a copy of the wild Pokemon into
/// the thrower's party (or storage) and ends the battle.
pub fn resolve_ball_throw(
    state: &mut BattleState,
    side: Side,
    ball: Item,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) {
    let Some(multiplier) = ball.ball_multiplier() else {
        bus.push(BattleEvent::ActionFailed {
            reason: ActionFailureReason::ItemNotAvailable,
        });
        return;
    };
    if !state.kind.is_wild() || side != Side::Player {
        bus.push(BattleEvent::ActionFailed {
            reason: ActionFailureReason::CaptureNotAllowed,
        });
        return;
    }
    if !state.player_mut(side).take_item(ball) {
        bus.push(BattleEvent::ActionFailed {
            reason: ActionFailureReason::ItemNotAvailable,
        });
        return;
    }

    bus.push(BattleEvent::BallThrown {
        trainer: state.player(side).player_name.clone(),
        ball,
    });

    let Some(target) = state.active(side.opponent()) else {
        return;
    };
    let attempt = attempt_capture(target, multiplier, rng);
    let visible_shakes = attempt.shakes.min(SHAKES_TO_CATCH - 1);
    for _ in 0..visible_shakes {
        bus.push(BattleEvent::BallShook);
    }

    if !attempt.caught {
        bus.push(BattleEvent::BrokeFree {
            pokemon: target.name.clone(),
            shakes: attempt.shakes,
        });
        return;
    }

    let mut caught = target.clone();
    caught.clear_volatile_state();
    let name = caught.name.clone();
    info!(pokemon = %name, %ball, "capture succeeded");
    bus.push(BattleEvent::PokemonCaught {
        pokemon: name.clone(),
    });

    let destination = state.player_mut(side).receive_pokemon(caught);
    bus.push(match destination {
        CaptureDestination::Party(_) => BattleEvent::AddedToParty {
            pokemon: name.clone(),
        },
        CaptureDestination::Storage(_) => BattleEvent::SentToStorage {
            pokemon: name.clone(),
        },
    });
    state.capture = Some(CaptureRecord {
        pokemon: name,
        destination,
    });
    state.end_battle(BattleOutcome::Captured, bus);
}
