use crate::battle::state::TurnRng;
use crate::pokemon::{PokemonInst, StatusCondition};

/// Ball multipliers at or above this catch without rolling.
pub const GUARANTEED_CAPTURE: f32 = 255.0;

/// Successful shakes needed to keep the Pokemon in the ball.
pub const SHAKES_TO_CATCH: u8 = 4;

const SHAKE_ROLL_MAX: u32 = 65535;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureAttempt {
    /// Shakes that succeeded before the Pokemon broke free (or all four).
    pub shakes: u8,
    pub caught: bool,
}

/// Modified catch value:
/// `((3 * max_hp - 2 * current_hp) * catch_rate * ball * status) / (3 * max_hp)`.
pub fn calculate_catch_rate(target: &PokemonInst, ball_multiplier: f32) -> f32 {
    let max_hp = target.max_hp() as f32;
    if max_hp == 0.0 {
        return 0.0;
    }
    let current_hp = target.current_hp() as f32;
    let hp_factor = 3.0 * max_hp - 2.0 * current_hp;

    hp_factor * target.catch_rate as f32 * ball_multiplier * status_multiplier(&target.status)
        / (3.0 * max_hp)
}

/// Sleep and freeze double the odds; the other primary statuses add half.
pub fn status_multiplier(status: &Option<StatusCondition>) -> f32 {
    match status {
        Some(StatusCondition::Sleep(_)) | Some(StatusCondition::Freeze) => 2.0,
        Some(StatusCondition::Paralysis)
        | Some(StatusCondition::Burn)
        | Some(StatusCondition::Poison)
        | Some(StatusCondition::BadlyPoisoned(_)) => 1.5,
        None => 1.0,
    }
}

/// Per-shake threshold out of 65536: `65536 / (255 / rate)^0.1875`.
pub fn shake_probability(catch_rate: f32) -> f64 {
    if catch_rate <= 0.0 {
        return 0.0;
    }
    65536.0 / (255.0 / catch_rate as f64).powf(0.1875)
}

/// Throws a ball at `target`. Each shake passes when `0..=65535` rolls under the
/// shake threshold, and the first failure ends the attempt.
pub fn attempt_capture(target: &PokemonInst, ball_multiplier: f32, rng: &mut TurnRng) -> CaptureAttempt {
    if ball_multiplier >= GUARANTEED_CAPTURE {
        return CaptureAttempt {
            shakes: SHAKES_TO_CATCH,
            caught: true,
        };
    }

    let threshold = shake_probability(calculate_catch_rate(target, ball_multiplier));
    let mut shakes = 0;
    while shakes < SHAKES_TO_CATCH {
        let roll = rng.range("capture shake", 0, SHAKE_ROLL_MAX);
        if (roll as f64) >= threshold {
            break;
        }
        shakes += 1;
    }

    CaptureAttempt {
        shakes,
        caught: shakes == SHAKES_TO_CATCH,
    }
}
