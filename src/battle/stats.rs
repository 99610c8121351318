use crate::battle::state::TurnRng;
use crate::pokemon::PokemonInst;
use schema::{MoveData, StatType};

/// Effective speed including stat stages and paralysis.
pub fn effective_speed(pokemon: &PokemonInst) -> u16 {
    pokemon.modified_stat(StatType::Spe)
}

/// Decide whether a move connects. Moves without an accuracy value never miss
/// and do not consume a roll.
pub fn move_hits(
    attacker: &PokemonInst,
    defender: &PokemonInst,
    move_data: &MoveData,
    rng: &mut TurnRng,
) -> bool {
    let Some(base_accuracy) = move_data.accuracy else {
        return true;
    };

    let threshold = base_accuracy as f64
        * accuracy_stage_multiplier(attacker.stat_stage(StatType::Acc))
        * evasion_stage_multiplier(defender.stat_stage(StatType::Eva));

    let roll = rng.percent("accuracy");
    roll as f64 <= threshold
}

/// Apply the stage multiplier table: (2+s)/2 for positive stages, 2/(2-s) for negative.
pub fn apply_stat_stage_multiplier(base_stat: u16, stage: i8) -> u16 {
    let stage = stage.clamp(-6, 6) as i32;
    let base = base_stat as i32;
    let value = if stage >= 0 {
        base * (2 + stage) / 2
    } else {
        base * 2 / (2 - stage)
    };
    value as u16
}

/// Accuracy stages scale by thirds: (3+s)/3 up, 3/(3-s) down.
pub fn accuracy_stage_multiplier(stage: i8) -> f64 {
    let stage = stage.clamp(-6, 6) as f64;
    if stage >= 0.0 {
        (3.0 + stage) / 3.0
    } else {
        3.0 / (3.0 - stage)
    }
}

/// Evasion works against the attacker, so its table is the inverse of accuracy's.
pub fn evasion_stage_multiplier(stage: i8) -> f64 {
    1.0 / accuracy_stage_multiplier(stage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 100)]
    #[case(1, 150)]
    #[case(2, 200)]
    #[case(6, 400)]
    #[case(-1, 66)]
    #[case(-2, 50)]
    #[case(-6, 25)]
    #[case(9, 400)]
    fn stage_multiplier_table(#[case] stage: i8, #[case] expected: u16) {
        assert_eq!(apply_stat_stage_multiplier(100, stage), expected);
    }

    #[test]
    fn accuracy_and_evasion_are_inverse() {
        assert_eq!(accuracy_stage_multiplier(0), 1.0);
        assert_eq!(accuracy_stage_multiplier(3), 2.0);
        assert_eq!(accuracy_stage_multiplier(-3), 0.5);
        assert_eq!(evasion_stage_multiplier(3), 0.5);
        assert_eq!(evasion_stage_multiplier(-3), 2.0);
    }
}
