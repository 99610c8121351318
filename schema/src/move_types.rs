use crate::{PokemonType, Weather};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl fmt::Display for MoveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveCategory::Physical => write!(f, "Physical"),
            MoveCategory::Special => write!(f, "Special"),
            MoveCategory::Status => write!(f, "Status"),
        }
    }
}

/// Stats that carry an in-battle stage modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum StatType {
    Atk,
    Def,
    SpAtk,
    SpDef,
    Spe,
    Acc,
    Eva,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatType::Atk => write!(f, "Attack"),
            StatType::Def => write!(f, "Defense"),
            StatType::SpAtk => write!(f, "Sp. Atk"),
            StatType::SpDef => write!(f, "Sp. Def"),
            StatType::Spe => write!(f, "Speed"),
            StatType::Acc => write!(f, "accuracy"),
            StatType::Eva => write!(f, "evasiveness"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    User,
    Target,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::User => write!(f, "User"),
            Target::Target => write!(f, "Target"),
        }
    }
}

/// Conditions a move or item can try to inflict. Confusion rides alongside
/// the primary status rather than replacing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusType {
    Sleep,
    Poison,
    BadlyPoison,
    Burn,
    Freeze,
    Paralysis,
    Confusion,
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusType::Sleep => "sleep",
            StatusType::Poison => "poison",
            StatusType::BadlyPoison => "bad poison",
            StatusType::Burn => "burn",
            StatusType::Freeze => "freeze",
            StatusType::Paralysis => "paralysis",
            StatusType::Confusion => "confusion",
        };
        write!(f, "{}", name)
    }
}

/// Secondary effect attached to a move record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MoveEffect {
    Burn,
    Freeze,
    Paralyze,
    Poison,
    BadlyPoison,
    Sleep,
    Confuse,
    Flinch,
    StatChange {
        target: Target,
        stat: StatType,
        stages: i8,
    },
    MultiStatChange {
        target: Target,
        changes: Vec<(StatType, i8)>,
    },
    /// Restores a percentage of the user's max HP.
    Heal(u8),
    Weather(Weather),
    /// User takes a percentage of the damage it dealt.
    Recoil(u8),
    /// User recovers a percentage of the damage it dealt.
    Drain(u8),
}

impl MoveEffect {
    /// Effects that only touch the user or the field skip the accuracy check
    /// when they come from a status move.
    pub fn is_self_targeted(&self) -> bool {
        match self {
            MoveEffect::StatChange { target, .. } | MoveEffect::MultiStatChange { target, .. } => {
                *target == Target::User
            }
            MoveEffect::Heal(_) | MoveEffect::Weather(_) => true,
            _ => false,
        }
    }

    /// True for effects that raise at least one of the user's stats.
    pub fn raises_user_stats(&self) -> bool {
        match self {
            MoveEffect::StatChange {
                target: Target::User,
                stages,
                ..
            } => *stages > 0,
            MoveEffect::MultiStatChange {
                target: Target::User,
                changes,
            } => changes.iter().any(|(_, stages)| *stages > 0),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    pub power: u16,
    /// `None` never misses.
    pub accuracy: Option<u8>,
    pub max_pp: u8,
    #[serde(default)]
    pub priority: i8,
    #[serde(default)]
    pub effect: Option<MoveEffect>,
    #[serde(default)]
    pub effect_chance: u8,
}

impl MoveData {
    /// The fallback move used when a creature has no PP left anywhere.
    pub fn struggle() -> Self {
        MoveData {
            name: "Struggle".to_string(),
            move_type: PokemonType::Typeless,
            category: MoveCategory::Physical,
            power: 50,
            accuracy: None,
            max_pp: 1,
            priority: 0,
            effect: None,
            effect_chance: 0,
        }
    }

    pub fn is_damaging(&self) -> bool {
        self.category != MoveCategory::Status && self.power > 0
    }
}

impl fmt::Display for MoveData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
