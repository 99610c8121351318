use crate::battle::calculators::{self, DamageOutcome};
use crate::battle::state::{BattleEvent, TurnRng};
use crate::battle::stats::apply_stat_stage_multiplier;
use crate::catalog::Catalog;
use crate::errors::{BattleResult, SpeciesDataError};
use rand::seq::IndexedRandom;
use rand::Rng;
use schema::{
    BaseStats, ExperienceGroup, MoveData, Nature, PokemonSpecies, PokemonType, StatType,
    StatusType,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::IntoEnumIterator;

pub const MAX_LEVEL: u8 = 100;
pub const MAX_IV: u8 = 31;
pub const MAX_EV: u8 = 252;
pub const MAX_MOVES: usize = 4;
pub const MAX_STAGE: i8 = 6;
pub const MAX_TOXIC_COUNTER: u8 = 15;

/// Primary status. Mutually exclusive; confusion is tracked separately.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCondition {
    /// Turns of sleep remaining.
    Sleep(u8),
    Poison,
    /// Escalating damage multiplier, capped at 15.
    BadlyPoisoned(u8),
    Burn,
    Freeze,
    Paralysis,
}

impl StatusCondition {
    pub fn kind(&self) -> StatusType {
        match self {
            StatusCondition::Sleep(_) => StatusType::Sleep,
            StatusCondition::Poison => StatusType::Poison,
            StatusCondition::BadlyPoisoned(_) => StatusType::BadlyPoison,
            StatusCondition::Burn => StatusType::Burn,
            StatusCondition::Freeze => StatusType::Freeze,
            StatusCondition::Paralysis => StatusType::Paralysis,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MoveInstance {
    pub data: MoveData,
    pub pp: u8,
}

impl MoveInstance {
    pub fn new(data: MoveData) -> Self {
        let pp = data.max_pp;
        Self { data, pp }
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn max_pp(&self) -> u8 {
        self.data.max_pp
    }

    /// Spends one PP. Returns false if none was left.
    pub fn use_move(&mut self) -> bool {
        if self.pp == 0 {
            return false;
        }
        self.pp -= 1;
        true
    }

    /// Restores up to `amount` PP and returns how much was restored.
    pub fn restore_pp(&mut self, amount: u8) -> u8 {
        let before = self.pp;
        self.pp = self.pp.saturating_add(amount).min(self.max_pp());
        self.pp - before
    }
}

/// A live Pokemon: species snapshot, individual values and mutable battle state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PokemonInst {
    pub name: String,
    pub species_id: u16,
    pub species_name: String,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    pub growth_rate: ExperienceGroup,
    pub base_exp: u16,
    pub catch_rate: u8,
    pub ability: Option<String>,
    pub level: u8,
    pub curr_exp: u32,
    pub nature: Nature,
    pub ivs: [u8; 6],
    pub evs: [u8; 6],
    /// HP, Atk, Def, SpA, SpD, Spe.
    pub curr_stats: [u16; 6],
    curr_hp: u16,
    pub moves: Vec<MoveInstance>,
    pub status: Option<StatusCondition>,
    pub confusion_turns: u8,
    pub flinched: bool,
    stat_stages: HashMap<StatType, i8>,
}

fn stat_index(stat: StatType) -> Option<usize> {
    match stat {
        StatType::Atk => Some(1),
        StatType::Def => Some(2),
        StatType::SpAtk => Some(3),
        StatType::SpDef => Some(4),
        StatType::Spe => Some(5),
        StatType::Acc | StatType::Eva => None,
    }
}

impl PokemonInst {
    /// Computes the stat block from base stats, level, IVs, EVs and nature.
    pub fn compute_stats(
        base_stats: &BaseStats,
        level: u8,
        ivs: &[u8; 6],
        evs: &[u8; 6],
        nature: Nature,
    ) -> [u16; 6] {
        let base = base_stats.as_array();
        let level = level as u32;
        let mut stats = [0u16; 6];

        for i in 0..6 {
            let core = 2 * base[i] as u32 + ivs[i] as u32 + evs[i] as u32 / 4;
            stats[i] = if i == 0 {
                (core * level / 100 + level + 10) as u16
            } else {
                let raw = core * level / 100 + 5;
                let scaled = match nature.modifiers() {
                    Some((up, _)) if stat_index(up) == Some(i) => raw * 11 / 10,
                    Some((_, down)) if stat_index(down) == Some(i) => raw * 9 / 10,
                    _ => raw,
                };
                scaled as u16
            };
        }

        stats
    }

    /// Recomputes stats after a level or EV change. Current HP moves by the
    /// exact max-HP delta unless the Pokemon has fainted.
    pub fn recalculate_stats(&mut self) {
        let old_max = self.max_hp();
        self.curr_stats =
            Self::compute_stats(&self.base_stats, self.level, &self.ivs, &self.evs, self.nature);
        if !self.is_fainted() {
            let new_max = self.max_hp();
            let delta = new_max.saturating_sub(old_max);
            self.curr_hp = (self.curr_hp + delta).min(new_max);
        }
    }

    pub fn max_hp(&self) -> u16 {
        self.curr_stats[0]
    }

    pub fn current_hp(&self) -> u16 {
        self.curr_hp
    }

    pub fn is_fainted(&self) -> bool {
        self.curr_hp == 0
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp() == 0 {
            return 0.0;
        }
        self.curr_hp as f32 / self.max_hp() as f32
    }

    /// Sets HP directly, clamped to the valid range. Reaching 0 faints the
    /// Pokemon and clears its status.
    pub fn set_hp(&mut self, hp: u16) {
        self.curr_hp = hp.min(self.max_hp());
        if self.curr_hp == 0 {
            self.status = None;
            self.confusion_turns = 0;
            self.flinched = false;
        }
    }

    pub fn set_hp_to_max(&mut self) {
        self.curr_hp = self.max_hp();
    }

    pub fn take_damage(&mut self, amount: u16) -> Vec<BattleEvent> {
        if self.is_fainted() {
            return Vec::new();
        }
        self.curr_hp = self.curr_hp.saturating_sub(amount);
        if self.curr_hp == 0 {
            self.status = None;
            self.confusion_turns = 0;
            self.flinched = false;
            return vec![BattleEvent::PokemonFainted {
                pokemon: self.name.clone(),
            }];
        }
        Vec::new()
    }

    /// Restores HP. Fainted or full-health Pokemon are left alone.
    pub fn heal(&mut self, amount: u16) -> bool {
        if self.is_fainted() || self.curr_hp >= self.max_hp() || amount == 0 {
            return false;
        }
        self.curr_hp = self.curr_hp.saturating_add(amount).min(self.max_hp());
        true
    }

    /// Brings a fainted Pokemon back with `percent` of its max HP (at least 1).
    pub fn revive(&mut self, percent: u8) -> bool {
        if !self.is_fainted() {
            return false;
        }
        let restored = (self.max_hp() as u32 * percent.min(100) as u32 / 100).max(1);
        self.curr_hp = restored as u16;
        true
    }

    fn is_immune_to(&self, status: StatusType) -> bool {
        let has = |t: PokemonType| self.types.contains(&t);
        match status {
            StatusType::Burn => has(PokemonType::Fire),
            StatusType::Freeze => has(PokemonType::Ice),
            StatusType::Poison | StatusType::BadlyPoison => {
                has(PokemonType::Poison) || has(PokemonType::Steel)
            }
            StatusType::Paralysis => has(PokemonType::Electric),
            StatusType::Sleep | StatusType::Confusion => false,
        }
    }

    /// Tries to inflict `status`. Returns false, leaving state untouched, when the
    /// Pokemon has fainted, is immune by type, or already carries a primary status
    /// (or is already confused, for confusion).
    pub fn apply_status(&mut self, status: StatusType, rng: &mut TurnRng) -> bool {
        if self.is_fainted() || self.is_immune_to(status) {
            return false;
        }

        if status == StatusType::Confusion {
            if self.confusion_turns > 0 {
                return false;
            }
            self.confusion_turns = rng.range("confusion duration", 1, 4) as u8;
            return true;
        }

        if self.status.is_some() {
            return false;
        }

        self.status = Some(match status {
            StatusType::Sleep => StatusCondition::Sleep(rng.range("sleep duration", 1, 3) as u8),
            StatusType::Poison => StatusCondition::Poison,
            StatusType::BadlyPoison => StatusCondition::BadlyPoisoned(1),
            StatusType::Burn => StatusCondition::Burn,
            StatusType::Freeze => StatusCondition::Freeze,
            StatusType::Paralysis => StatusCondition::Paralysis,
            StatusType::Confusion => return false,
        });
        true
    }

    pub fn cure_status(&mut self) -> Option<StatusCondition> {
        self.status.take()
    }

    pub fn is_confused(&self) -> bool {
        self.confusion_turns > 0
    }

    /// Returns whether the Pokemon was confused.
    pub fn cure_confusion(&mut self) -> bool {
        let was_confused = self.is_confused();
        self.confusion_turns = 0;
        was_confused
    }

    /// Runs before this Pokemon acts. Returns whether it may act, plus the
    /// events describing what happened.
    pub fn process_status_start(&mut self, rng: &mut TurnRng) -> (bool, Vec<BattleEvent>) {
        let mut events = Vec::new();
        let name = self.name.clone();
        let mut can_move = true;

        match self.status {
            Some(StatusCondition::Sleep(turns)) => {
                let remaining = turns.saturating_sub(1);
                if remaining == 0 {
                    self.status = None;
                    events.push(BattleEvent::WokeUp { pokemon: name.clone() });
                } else {
                    self.status = Some(StatusCondition::Sleep(remaining));
                    events.push(BattleEvent::FastAsleep { pokemon: name.clone() });
                    can_move = false;
                }
            }
            Some(StatusCondition::Paralysis) => {
                if rng.percent("full paralysis") <= 25 {
                    events.push(BattleEvent::FullyParalyzed { pokemon: name.clone() });
                    can_move = false;
                }
            }
            Some(StatusCondition::Freeze) => {
                if rng.percent("thaw") <= 20 {
                    self.status = None;
                    events.push(BattleEvent::ThawedOut { pokemon: name.clone() });
                } else {
                    events.push(BattleEvent::FrozenSolid { pokemon: name.clone() });
                    can_move = false;
                }
            }
            _ => {}
        }

        if self.confusion_turns > 0 {
            self.confusion_turns -= 1;
            if self.confusion_turns == 0 {
                events.push(BattleEvent::SnappedOutOfConfusion { pokemon: name });
            } else if can_move {
                events.push(BattleEvent::IsConfused { pokemon: name.clone() });
                if rng.percent("confusion self-hit") <= 33 {
                    let damage = calculators::confusion_damage(self);
                    events.push(BattleEvent::HurtInConfusion { pokemon: name, damage });
                    events.extend(self.take_damage(damage));
                    can_move = false;
                }
            }
        }

        (can_move, events)
    }

    /// Burn and poison damage dealt at the end of each turn.
    pub fn apply_end_of_turn_damage(&mut self) -> Vec<BattleEvent> {
        if self.is_fainted() {
            return Vec::new();
        }
        let max_hp = self.max_hp();
        let (status, damage) = match self.status {
            Some(StatusCondition::Burn) => (StatusType::Burn, (max_hp / 16).max(1)),
            Some(StatusCondition::Poison) => (StatusType::Poison, (max_hp / 8).max(1)),
            Some(StatusCondition::BadlyPoisoned(counter)) => {
                let damage = ((max_hp / 16) * counter as u16).max(1);
                self.status = Some(StatusCondition::BadlyPoisoned(
                    (counter + 1).min(MAX_TOXIC_COUNTER),
                ));
                (StatusType::BadlyPoison, damage)
            }
            _ => return Vec::new(),
        };

        let mut events = vec![BattleEvent::StatusDamage {
            target: self.name.clone(),
            status,
            damage: damage.min(self.curr_hp),
        }];
        events.extend(self.take_damage(damage));
        events
    }

    pub fn stat_stage(&self, stat: StatType) -> i8 {
        self.stat_stages.get(&stat).copied().unwrap_or(0)
    }

    /// Shifts a stat stage by `delta`, clamped to -6..=6. Returns whether the
    /// stage moved, plus the matching event. The event carries the change
    /// actually applied, not the requested one.
    pub fn modify_stat_stage(&mut self, stat: StatType, delta: i8) -> (bool, BattleEvent) {
        let current = self.stat_stage(stat);
        let updated = (current as i16 + delta as i16).clamp(-(MAX_STAGE as i16), MAX_STAGE as i16) as i8;

        if updated == current || delta == 0 {
            return (
                false,
                BattleEvent::StatStageBlocked {
                    target: self.name.clone(),
                    stat,
                    rising: delta >= 0,
                },
            );
        }

        if updated == 0 {
            self.stat_stages.remove(&stat);
        } else {
            self.stat_stages.insert(stat, updated);
        }
        (
            true,
            BattleEvent::StatStageChanged {
                target: self.name.clone(),
                stat,
                delta: updated - current,
            },
        )
    }

    pub fn reset_stat_stages(&mut self) {
        self.stat_stages.clear();
    }

    /// Clears everything that does not survive leaving the field.
    pub fn clear_volatile_state(&mut self) {
        self.reset_stat_stages();
        self.confusion_turns = 0;
        self.flinched = false;
    }

    /// Stat after stages and status penalties. Accuracy and evasion have no
    /// base value and are reported as a percentage of neutral.
    pub fn modified_stat(&self, stat: StatType) -> u16 {
        let stage = self.stat_stage(stat);
        match stat_index(stat) {
            Some(index) => {
                let mut value = apply_stat_stage_multiplier(self.curr_stats[index], stage);
                match (stat, self.status) {
                    (StatType::Atk, Some(StatusCondition::Burn)) => value /= 2,
                    (StatType::Spe, Some(StatusCondition::Paralysis)) => value /= 4,
                    _ => {}
                }
                value
            }
            None => {
                let multiplier = match stat {
                    StatType::Eva => crate::battle::stats::evasion_stage_multiplier(stage),
                    _ => crate::battle::stats::accuracy_stage_multiplier(stage),
                };
                (100.0 * multiplier) as u16
            }
        }
    }

    pub fn calculate_damage(
        &self,
        move_data: &MoveData,
        defender: &PokemonInst,
        force_crit: bool,
        rng: &mut TurnRng,
    ) -> DamageOutcome {
        calculators::calculate_damage(self, defender, move_data, force_crit, rng)
    }

    /// True if any known move still has PP.
    pub fn has_usable_moves(&self) -> bool {
        self.moves.iter().any(|m| m.pp > 0)
    }

    pub fn knows_move(&self, name: &str) -> bool {
        self.moves.iter().any(|m| m.name() == name)
    }
}

/// Builds a [`PokemonInst`] from the catalog. Anything not overridden is
/// rolled: IVs 0-31, a random nature and ability. EVs default to zero and the
/// moveset to the last four learnset moves at or below the level.
#[derive(Debug, Clone)]
pub struct PokemonBuilder {
    species_id: u16,
    level: u8,
    nickname: Option<String>,
    ivs: Option<[u8; 6]>,
    evs: Option<[u8; 6]>,
    nature: Option<Nature>,
    moves: Option<Vec<String>>,
}

impl PokemonBuilder {
    pub fn new(species_id: u16, level: u8) -> Self {
        Self {
            species_id,
            level,
            nickname: None,
            ivs: None,
            evs: None,
            nature: None,
            moves: None,
        }
    }

    pub fn nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn ivs(mut self, ivs: [u8; 6]) -> Self {
        self.ivs = Some(ivs);
        self
    }

    pub fn evs(mut self, evs: [u8; 6]) -> Self {
        self.evs = Some(evs);
        self
    }

    pub fn nature(mut self, nature: Nature) -> Self {
        self.nature = Some(nature);
        self
    }

    pub fn moves<S: Into<String>>(mut self, moves: impl IntoIterator<Item = S>) -> Self {
        self.moves = Some(moves.into_iter().map(Into::into).collect());
        self
    }

    pub fn build<R: Rng>(self, catalog: &Catalog, rng: &mut R) -> BattleResult<PokemonInst> {
        if !(1..=MAX_LEVEL).contains(&self.level) {
            return Err(SpeciesDataError::InvalidLevel(self.level).into());
        }
        let species = catalog.species(self.species_id)?;

        let move_names: Vec<String> = match self.moves {
            Some(names) => names,
            None => species
                .learnset
                .moves_known_at(self.level)
                .into_iter()
                .map(str::to_string)
                .collect(),
        };
        if move_names.is_empty() {
            return Err(SpeciesDataError::EmptyMoveset(species.name.clone()).into());
        }
        if move_names.len() > MAX_MOVES {
            return Err(SpeciesDataError::TooManyMoves {
                species: species.name.clone(),
                count: move_names.len(),
            }
            .into());
        }
        let moves = move_names
            .iter()
            .map(|name| catalog.move_data(name).map(|data| MoveInstance::new(data.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        let ivs = self
            .ivs
            .unwrap_or_else(|| std::array::from_fn(|_| rng.random_range(0..=MAX_IV)))
            .map(|iv| iv.min(MAX_IV));
        let evs = self.evs.unwrap_or([0; 6]).map(|ev| ev.min(MAX_EV));
        let nature = match self.nature {
            Some(nature) => nature,
            None => {
                let natures: Vec<Nature> = Nature::iter().collect();
                natures.choose(rng).copied().unwrap_or(Nature::Hardy)
            }
        };
        let ability = species.abilities.choose(rng).map(|a| a.name.clone());

        Ok(Self::assemble(
            species,
            self.level,
            self.nickname,
            ivs,
            evs,
            nature,
            ability,
            moves,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        species: &PokemonSpecies,
        level: u8,
        nickname: Option<String>,
        ivs: [u8; 6],
        evs: [u8; 6],
        nature: Nature,
        ability: Option<String>,
        moves: Vec<MoveInstance>,
    ) -> PokemonInst {
        let curr_stats = PokemonInst::compute_stats(&species.base_stats, level, &ivs, &evs, nature);
        PokemonInst {
            name: nickname.unwrap_or_else(|| species.name.clone()),
            species_id: species.pokedex_number,
            species_name: species.name.clone(),
            types: species.types.clone(),
            base_stats: species.base_stats.clone(),
            growth_rate: species.growth_rate,
            base_exp: species.base_exp,
            catch_rate: species.catch_rate,
            ability,
            level,
            curr_exp: species.growth_rate.exp_for_level(level),
            nature,
            ivs,
            evs,
            curr_stats,
            curr_hp: curr_stats[0],
            moves,
            status: None,
            confusion_turns: 0,
            flinched: false,
            stat_stages: HashMap::new(),
        }
    }
}
