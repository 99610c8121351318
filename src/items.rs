//! The fixed set of bag items and what each one does to a Pokemon.

use crate::pokemon::PokemonInst;
use schema::{StatType, StatusType};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Item {
    // Healing
    Potion,
    SuperPotion,
    HyperPotion,
    MaxPotion,
    FullRestore,
    FreshWater,
    SodaPop,
    Lemonade,
    MoomooMilk,
    // Status cures
    Antidote,
    BurnHeal,
    IceHeal,
    Awakening,
    ParalyzeHeal,
    FullHeal,
    // Revival
    Revive,
    MaxRevive,
    // Capture devices
    PokeBall,
    GreatBall,
    UltraBall,
    MasterBall,
    // PP restoration
    Ether,
    MaxEther,
    Elixir,
    MaxElixir,
    // Battle boosts
    XAttack,
    XDefense,
    XSpeed,
    XSpecial,
    XSpDef,
    XAccuracy,
}

/// Which primary statuses a cure item removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCure {
    Poison,
    Burn,
    Freeze,
    Sleep,
    Paralysis,
    /// Every primary status and confusion.
    All,
}

impl StatusCure {
    fn cures(&self, status: StatusType) -> bool {
        match self {
            StatusCure::Poison => matches!(status, StatusType::Poison | StatusType::BadlyPoison),
            StatusCure::Burn => status == StatusType::Burn,
            StatusCure::Freeze => status == StatusType::Freeze,
            StatusCure::Sleep => status == StatusType::Sleep,
            StatusCure::Paralysis => status == StatusType::Paralysis,
            StatusCure::All => true,
        }
    }
}

/// Item categories. Every item maps to exactly one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemEffect {
    /// `None` restores to full.
    Heal(Option<u16>),
    CureStatus(StatusCure),
    /// Full heal plus full status cure.
    FullRestore,
    /// Percentage of max HP restored on revival.
    Revive(u8),
    Ball(f32),
    /// `None` restores to full. `all_moves` covers every move instead of one.
    RestorePp { amount: Option<u8>, all_moves: bool },
    StatBoost(StatType),
}

/// Uniform result of using an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub success: bool,
    pub message: String,
}

impl ItemOutcome {
    fn success(message: String) -> Self {
        Self { success: true, message }
    }

    fn no_effect() -> Self {
        Self {
            success: false,
            message: "It won't have any effect.".to_string(),
        }
    }
}

impl Item {
    pub fn effect(&self) -> ItemEffect {
        use Item::*;
        match self {
            Potion => ItemEffect::Heal(Some(20)),
            SuperPotion => ItemEffect::Heal(Some(50)),
            HyperPotion => ItemEffect::Heal(Some(200)),
            MaxPotion => ItemEffect::Heal(None),
            FullRestore => ItemEffect::FullRestore,
            FreshWater => ItemEffect::Heal(Some(50)),
            SodaPop => ItemEffect::Heal(Some(60)),
            Lemonade => ItemEffect::Heal(Some(80)),
            MoomooMilk => ItemEffect::Heal(Some(100)),
            Antidote => ItemEffect::CureStatus(StatusCure::Poison),
            BurnHeal => ItemEffect::CureStatus(StatusCure::Burn),
            IceHeal => ItemEffect::CureStatus(StatusCure::Freeze),
            Awakening => ItemEffect::CureStatus(StatusCure::Sleep),
            ParalyzeHeal => ItemEffect::CureStatus(StatusCure::Paralysis),
            FullHeal => ItemEffect::CureStatus(StatusCure::All),
            Revive => ItemEffect::Revive(50),
            MaxRevive => ItemEffect::Revive(100),
            PokeBall => ItemEffect::Ball(1.0),
            GreatBall => ItemEffect::Ball(1.5),
            UltraBall => ItemEffect::Ball(2.0),
            MasterBall => ItemEffect::Ball(255.0),
            Ether => ItemEffect::RestorePp {
                amount: Some(10),
                all_moves: false,
            },
            MaxEther => ItemEffect::RestorePp {
                amount: None,
                all_moves: false,
            },
            Elixir => ItemEffect::RestorePp {
                amount: Some(10),
                all_moves: true,
            },
            MaxElixir => ItemEffect::RestorePp {
                amount: None,
                all_moves: true,
            },
            XAttack => ItemEffect::StatBoost(StatType::Atk),
            XDefense => ItemEffect::StatBoost(StatType::Def),
            XSpeed => ItemEffect::StatBoost(StatType::Spe),
            XSpecial => ItemEffect::StatBoost(StatType::SpAtk),
            XSpDef => ItemEffect::StatBoost(StatType::SpDef),
            XAccuracy => ItemEffect::StatBoost(StatType::Acc),
        }
    }

    /// Revives and PP restorers are field-only.
    pub fn usable_in_battle(&self) -> bool {
        !matches!(
            self.effect(),
            ItemEffect::Revive(_) | ItemEffect::RestorePp { .. }
        )
    }

    pub fn is_ball(&self) -> bool {
        matches!(self.effect(), ItemEffect::Ball(_))
    }

    pub fn ball_multiplier(&self) -> Option<f32> {
        match self.effect() {
            ItemEffect::Ball(multiplier) => Some(multiplier),
            _ => None,
        }
    }

    /// Stat boosts only make sense on the Pokemon currently in battle.
    pub fn targets_active_only(&self) -> bool {
        matches!(self.effect(), ItemEffect::StatBoost(_))
    }

    /// Applies this item to `target`. Capture devices are thrown, not used, and
    /// always report no effect here.
    pub fn use_on(&self, target: &mut PokemonInst, move_slot: Option<usize>) -> ItemOutcome {
        match self.effect() {
            ItemEffect::Heal(amount) => heal_target(target, amount),
            ItemEffect::FullRestore => {
                let cured = cure_target(target, StatusCure::All);
                let healed = heal_target(target, None);
                match (healed.success, cured) {
                    (true, _) => healed,
                    (false, Some(message)) => ItemOutcome::success(message),
                    (false, None) => ItemOutcome::no_effect(),
                }
            }
            ItemEffect::CureStatus(cure) => match cure_target(target, cure) {
                Some(message) => ItemOutcome::success(message),
                None => ItemOutcome::no_effect(),
            },
            ItemEffect::Revive(percent) => {
                if target.revive(percent) {
                    ItemOutcome::success(format!("{} was revived!", target.name))
                } else {
                    ItemOutcome::no_effect()
                }
            }
            ItemEffect::RestorePp { amount, all_moves } => {
                restore_pp(target, amount, all_moves, move_slot)
            }
            ItemEffect::StatBoost(stat) => {
                if target.is_fainted() {
                    return ItemOutcome::no_effect();
                }
                let (changed, event) = target.modify_stat_stage(stat, 1);
                ItemOutcome {
                    success: changed,
                    message: event.format().unwrap_or_default(),
                }
            }
            ItemEffect::Ball(_) => ItemOutcome::no_effect(),
        }
    }
}

fn heal_target(target: &mut PokemonInst, amount: Option<u16>) -> ItemOutcome {
    if target.is_fainted() {
        return ItemOutcome::no_effect();
    }
    if target.current_hp() >= target.max_hp() {
        return ItemOutcome {
            success: false,
            message: format!("{} already has full HP!", target.name),
        };
    }
    let before = target.current_hp();
    target.heal(amount.unwrap_or(target.max_hp()));
    let restored = target.current_hp() - before;
    ItemOutcome::success(format!("{} recovered {} HP!", target.name, restored))
}

fn cure_target(target: &mut PokemonInst, cure: StatusCure) -> Option<String> {
    if target.is_fainted() {
        return None;
    }
    let cured_primary = match target.status {
        Some(status) if cure.cures(status.kind()) => target.cure_status().map(|s| s.kind()),
        _ => None,
    };
    let cured_confusion = cure == StatusCure::All && target.cure_confusion();

    match (cured_primary, cured_confusion) {
        (Some(status), _) => Some(format!("{} was cured of its {}!", target.name, status)),
        (None, true) => Some(format!("{} snapped out of confusion!", target.name)),
        (None, false) => None,
    }
}

fn restore_pp(
    target: &mut PokemonInst,
    amount: Option<u8>,
    all_moves: bool,
    move_slot: Option<usize>,
) -> ItemOutcome {
    let slots: Vec<usize> = if all_moves {
        (0..target.moves.len()).collect()
    } else {
        match move_slot {
            Some(slot) if slot < target.moves.len() => vec![slot],
            _ => return ItemOutcome::no_effect(),
        }
    };

    let mut restored = 0u32;
    for slot in slots {
        let move_instance = &mut target.moves[slot];
        let amount = amount.unwrap_or(move_instance.max_pp());
        restored += move_instance.restore_pp(amount) as u32;
    }

    if restored == 0 {
        return ItemOutcome::no_effect();
    }
    let message = match (all_moves, move_slot.and_then(|s| target.moves.get(s))) {
        (false, Some(move_instance)) => {
            format!("{}'s {} PP was restored!", target.name, move_instance.name())
        }
        _ => format!("{}'s PP was restored!", target.name),
    };
    ItemOutcome::success(message)
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Item::*;
        let name = match self {
            Potion => "Potion",
            SuperPotion => "Super Potion",
            HyperPotion => "Hyper Potion",
            MaxPotion => "Max Potion",
            FullRestore => "Full Restore",
            FreshWater => "Fresh Water",
            SodaPop => "Soda Pop",
            Lemonade => "Lemonade",
            MoomooMilk => "Moomoo Milk",
            Antidote => "Antidote",
            BurnHeal => "Burn Heal",
            IceHeal => "Ice Heal",
            Awakening => "Awakening",
            ParalyzeHeal => "Paralyze Heal",
            FullHeal => "Full Heal",
            Revive => "Revive",
            MaxRevive => "Max Revive",
            PokeBall => "Poke Ball",
            GreatBall => "Great Ball",
            UltraBall => "Ultra Ball",
            MasterBall => "Master Ball",
            Ether => "Ether",
            MaxEther => "Max Ether",
            Elixir => "Elixir",
            MaxElixir => "Max Elixir",
            XAttack => "X Attack",
            XDefense => "X Defense",
            XSpeed => "X Speed",
            XSpecial => "X Special",
            XSpDef => "X Sp. Def",
            XAccuracy => "X Accuracy",
        };
        write!(f, "{}", name)
    }
}
