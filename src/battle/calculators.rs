use crate::battle::state::TurnRng;
use crate::battle::stats::move_hits;
use crate::pokemon::PokemonInst;
use schema::{MoveCategory, MoveData, PokemonType, StatType};

/// Result of resolving one damaging (or status) move against a defender.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub hit: bool,
    pub damage: u16,
    pub effectiveness: f32,
    pub critical: bool,
}

impl DamageOutcome {
    fn miss() -> Self {
        Self {
            hit: false,
            damage: 0,
            effectiveness: 1.0,
            critical: false,
        }
    }
}

const CRITICAL_MULTIPLIER: f64 = 1.5;
const STAB_MULTIPLIER: f64 = 1.5;

fn offense_and_defense(
    attacker: &PokemonInst,
    defender: &PokemonInst,
    category: MoveCategory,
) -> Option<(u16, u16)> {
    match category {
        MoveCategory::Physical => Some((
            attacker.modified_stat(StatType::Atk),
            defender.modified_stat(StatType::Def),
        )),
        MoveCategory::Special => Some((
            attacker.modified_stat(StatType::SpAtk),
            defender.modified_stat(StatType::SpDef),
        )),
        MoveCategory::Status => None,
    }
}

fn base_damage(level: u8, power: u16, attack: u16, defense: u16) -> f64 {
    let level_factor = (2.0 * level as f64 + 10.0) / 250.0;
    level_factor * power as f64 * (attack as f64 / defense.max(1) as f64) + 2.0
}

/// Accuracy check, then damage. Draw order: accuracy, critical hit, variance.
/// Fully immune targets take exactly 0 and consume no further draws.
pub fn calculate_damage(
    attacker: &PokemonInst,
    defender: &PokemonInst,
    move_data: &MoveData,
    force_crit: bool,
    rng: &mut TurnRng,
) -> DamageOutcome {
    if !move_hits(attacker, defender, move_data, rng) {
        return DamageOutcome::miss();
    }

    let effectiveness = PokemonType::effectiveness_against(move_data.move_type, &defender.types);
    let stats = offense_and_defense(attacker, defender, move_data.category);
    let (Some((attack, defense)), true) = (stats, move_data.power > 0) else {
        return DamageOutcome {
            hit: true,
            damage: 0,
            effectiveness,
            critical: false,
        };
    };

    if effectiveness == 0.0 {
        return DamageOutcome {
            hit: true,
            damage: 0,
            effectiveness,
            critical: false,
        };
    }

    let critical = force_crit || rng.range("critical hit", 1, 16) == 1;
    let variance = rng.range("damage variance", 85, 100) as f64 / 100.0;

    let mut damage = base_damage(attacker.level, move_data.power, attack, defense);
    if critical {
        damage *= CRITICAL_MULTIPLIER;
    }
    damage *= effectiveness as f64;
    if attacker.types.contains(&move_data.move_type) {
        damage *= STAB_MULTIPLIER;
    }
    damage *= variance;

    DamageOutcome {
        hit: true,
        damage: (damage.floor() as u16).max(1),
        effectiveness,
        critical,
    }
}

/// Deterministic estimate used by the opponent policy: no critical hit and a
/// fixed 0.9 variance.
pub fn estimate_damage(attacker: &PokemonInst, defender: &PokemonInst, move_data: &MoveData) -> u16 {
    let effectiveness = PokemonType::effectiveness_against(move_data.move_type, &defender.types);
    let Some((attack, defense)) = offense_and_defense(attacker, defender, move_data.category) else {
        return 0;
    };
    if effectiveness == 0.0 || move_data.power == 0 {
        return 0;
    }
    let mut damage = base_damage(attacker.level, move_data.power, attack, defense);
    damage *= effectiveness as f64;
    if attacker.types.contains(&move_data.move_type) {
        damage *= STAB_MULTIPLIER;
    }
    ((damage * 0.9).floor() as u16).max(1)
}

/// A 40-power typeless physical hit against the confused Pokemon itself.
pub fn confusion_damage(pokemon: &PokemonInst) -> u16 {
    let damage = base_damage(
        pokemon.level,
        40,
        pokemon.modified_stat(StatType::Atk),
        pokemon.modified_stat(StatType::Def),
    );
    (damage.floor() as u16).max(1)
}

/// Experience awarded for defeating `defeated`.
pub fn experience_for_defeat(defeated: &PokemonInst) -> u32 {
    defeated.base_exp as u32 * defeated.level as u32 / 7
}

/// Struggle recoil: a quarter of the user's max HP, at least 1.
pub fn struggle_recoil(user: &PokemonInst) -> u16 {
    (user.max_hp() / 4).max(1)
}
