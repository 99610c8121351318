use crate::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

impl BaseStats {
    /// Base values in stat-block order: HP, Atk, Def, SpA, SpD, Spe.
    pub fn as_array(&self) -> [u8; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.sp_attack,
            self.sp_defense,
            self.speed,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub description: String,
}

/// Level-up learnset as ordered (level, move name) pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Learnset(pub Vec<(u8, String)>);

impl Learnset {
    pub fn learns_at_level(&self, level: u8) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(move |(learn_level, _)| *learn_level == level)
            .map(|(_, name)| name.as_str())
    }

    /// The four most recently learned moves at or below `level`, oldest first.
    pub fn moves_known_at(&self, level: u8) -> Vec<&str> {
        let mut learned: Vec<&str> = Vec::new();
        for (learn_level, name) in &self.0 {
            if *learn_level <= level && !learned.contains(&name.as_str()) {
                learned.push(name.as_str());
            }
        }
        let skip = learned.len().saturating_sub(4);
        learned.into_iter().skip(skip).collect()
    }

    pub fn move_names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, name)| name.as_str())
    }
}

/// Experience growth curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceGroup {
    Fast,
    MediumFast,
    MediumSlow,
    Slow,
}

impl ExperienceGroup {
    /// Total experience needed to reach `level`.
    pub fn exp_for_level(&self, level: u8) -> u32 {
        if level <= 1 {
            return 0;
        }
        let n = level as i64;
        let cube = n * n * n;
        let exp = match self {
            ExperienceGroup::Fast => cube * 4 / 5,
            ExperienceGroup::MediumFast => cube,
            ExperienceGroup::MediumSlow => cube * 6 / 5 - 15 * n * n + 100 * n - 140,
            ExperienceGroup::Slow => cube * 5 / 4,
        };
        exp.max(0) as u32
    }
}

impl fmt::Display for ExperienceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExperienceGroup::Fast => "Fast",
            ExperienceGroup::MediumFast => "Medium Fast",
            ExperienceGroup::MediumSlow => "Medium Slow",
            ExperienceGroup::Slow => "Slow",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonSpecies {
    pub pokedex_number: u16,
    pub name: String,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    pub abilities: Vec<Ability>,
    pub learnset: Learnset,
    pub catch_rate: u8,
    pub base_exp: u16,
    pub growth_rate: ExperienceGroup,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medium_slow_curve_matches_published_values() {
        assert_eq!(ExperienceGroup::MediumSlow.exp_for_level(1), 0);
        assert_eq!(ExperienceGroup::MediumSlow.exp_for_level(5), 135);
        assert_eq!(ExperienceGroup::MediumSlow.exp_for_level(100), 1_059_860);
    }

    #[test]
    fn fast_and_slow_curves() {
        assert_eq!(ExperienceGroup::Fast.exp_for_level(10), 800);
        assert_eq!(ExperienceGroup::MediumFast.exp_for_level(10), 1000);
        assert_eq!(ExperienceGroup::Slow.exp_for_level(10), 1250);
    }

    #[test]
    fn learnset_keeps_the_last_four_moves() {
        let learnset = Learnset(vec![
            (1, "Tackle".to_string()),
            (1, "Growl".to_string()),
            (3, "Vine Whip".to_string()),
            (7, "Leech Seed".to_string()),
            (9, "Razor Leaf".to_string()),
        ]);
        assert_eq!(learnset.moves_known_at(2), vec!["Tackle", "Growl"]);
        assert_eq!(
            learnset.moves_known_at(9),
            vec!["Growl", "Vine Whip", "Leech Seed", "Razor Leaf"]
        );
        assert_eq!(learnset.learns_at_level(7).collect::<Vec<_>>(), vec!["Leech Seed"]);
    }
}
