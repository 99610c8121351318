use crate::StatType;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Nature {
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

impl Nature {
    /// (raised, lowered) stat pair. Neutral natures return `None`.
    pub fn modifiers(&self) -> Option<(StatType, StatType)> {
        use Nature::*;
        use StatType::*;

        match self {
            Hardy | Docile | Serious | Bashful | Quirky => None,
            Lonely => Some((Atk, Def)),
            Brave => Some((Atk, Spe)),
            Adamant => Some((Atk, SpAtk)),
            Naughty => Some((Atk, SpDef)),
            Bold => Some((Def, Atk)),
            Relaxed => Some((Def, Spe)),
            Impish => Some((Def, SpAtk)),
            Lax => Some((Def, SpDef)),
            Timid => Some((Spe, Atk)),
            Hasty => Some((Spe, Def)),
            Jolly => Some((Spe, SpAtk)),
            Naive => Some((Spe, SpDef)),
            Modest => Some((SpAtk, Atk)),
            Mild => Some((SpAtk, Def)),
            Quiet => Some((SpAtk, Spe)),
            Rash => Some((SpAtk, SpDef)),
            Calm => Some((SpDef, Atk)),
            Gentle => Some((SpDef, Def)),
            Sassy => Some((SpDef, Spe)),
            Careful => Some((SpDef, SpAtk)),
        }
    }

    /// Multiplier this nature applies to `stat`: 1.1, 0.9 or 1.0.
    pub fn multiplier(&self, stat: StatType) -> f64 {
        match self.modifiers() {
            Some((up, _)) if up == stat => 1.1,
            Some((_, down)) if down == stat => 0.9,
            _ => 1.0,
        }
    }
}

impl fmt::Display for Nature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn five_natures_are_neutral() {
        let neutral = Nature::iter().filter(|n| n.modifiers().is_none()).count();
        assert_eq!(Nature::iter().count(), 25);
        assert_eq!(neutral, 5);
    }

    #[test]
    fn adamant_trades_special_attack_for_attack() {
        assert_eq!(Nature::Adamant.multiplier(StatType::Atk), 1.1);
        assert_eq!(Nature::Adamant.multiplier(StatType::SpAtk), 0.9);
        assert_eq!(Nature::Adamant.multiplier(StatType::Spe), 1.0);
    }
}
