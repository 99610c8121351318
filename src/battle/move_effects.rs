//! Secondary move effects. One handler per `MoveEffect` variant; adding a
//! variant without a handler is a compile error.

use crate::battle::state::{BattleEvent, TurnRng};
use crate::pokemon::PokemonInst;
use schema::{MoveEffect, StatType, StatusType, Target, Weather};

/// The two Pokemon a move effect may touch, plus how much damage the move dealt.
pub struct EffectContext<'a> {
    pub attacker: &'a mut PokemonInst,
    pub defender: &'a mut PokemonInst,
    pub damage_dealt: u16,
}

impl EffectContext<'_> {
    fn target_mut(&mut self, target: Target) -> &mut PokemonInst {
        match target {
            Target::User => &mut *self.attacker,
            Target::Target => &mut *self.defender,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectResult {
    /// Whether the effect changed anything.
    pub applied: bool,
    pub events: Vec<BattleEvent>,
    /// Weather is field state, so the engine installs it.
    pub weather: Option<Weather>,
}

impl EffectResult {
    fn failed() -> Self {
        Self::default()
    }

    fn with_events(applied: bool, events: Vec<BattleEvent>) -> Self {
        Self {
            applied,
            events,
            weather: None,
        }
    }
}

pub fn apply_move_effect(
    effect: &MoveEffect,
    context: &mut EffectContext<'_>,
    rng: &mut TurnRng,
) -> EffectResult {
    match effect {
        MoveEffect::Burn => inflict_status(context.defender, StatusType::Burn, rng),
        MoveEffect::Freeze => inflict_status(context.defender, StatusType::Freeze, rng),
        MoveEffect::Paralyze => inflict_status(context.defender, StatusType::Paralysis, rng),
        MoveEffect::Poison => inflict_status(context.defender, StatusType::Poison, rng),
        MoveEffect::BadlyPoison => inflict_status(context.defender, StatusType::BadlyPoison, rng),
        MoveEffect::Sleep => inflict_status(context.defender, StatusType::Sleep, rng),
        MoveEffect::Confuse => inflict_status(context.defender, StatusType::Confusion, rng),
        MoveEffect::Flinch => {
            if context.defender.is_fainted() {
                return EffectResult::failed();
            }
            context.defender.flinched = true;
            EffectResult::with_events(true, Vec::new())
        }
        MoveEffect::StatChange {
            target,
            stat,
            stages,
        } => change_stats(context.target_mut(*target), &[(*stat, *stages)]),
        MoveEffect::MultiStatChange { target, changes } => {
            change_stats(context.target_mut(*target), changes)
        }
        MoveEffect::Heal(percent) => {
            let user = &mut *context.attacker;
            let amount = (user.max_hp() as u32 * *percent as u32 / 100).max(1) as u16;
            let before = user.current_hp();
            if !user.heal(amount) {
                return EffectResult::failed();
            }
            let event = BattleEvent::PokemonHealed {
                target: user.name.clone(),
                amount: user.current_hp() - before,
            };
            EffectResult::with_events(true, vec![event])
        }
        MoveEffect::Weather(weather) => EffectResult {
            applied: true,
            events: Vec::new(),
            weather: Some(*weather),
        },
        MoveEffect::Recoil(percent) => {
            if context.damage_dealt == 0 || context.attacker.is_fainted() {
                return EffectResult::failed();
            }
            let recoil = share_of(context.damage_dealt, *percent);
            let user = &mut *context.attacker;
            let mut events = vec![BattleEvent::RecoilDamage {
                pokemon: user.name.clone(),
                damage: recoil.min(user.current_hp()),
            }];
            events.extend(user.take_damage(recoil));
            EffectResult::with_events(true, events)
        }
        MoveEffect::Drain(percent) => {
            if context.damage_dealt == 0 {
                return EffectResult::failed();
            }
            let restored = share_of(context.damage_dealt, *percent);
            if !context.attacker.heal(restored) {
                return EffectResult::failed();
            }
            let event = BattleEvent::EnergyDrained {
                target: context.defender.name.clone(),
            };
            EffectResult::with_events(true, vec![event])
        }
    }
}

fn share_of(damage: u16, percent: u8) -> u16 {
    (damage as u32 * percent as u32 / 100).max(1) as u16
}

fn inflict_status(target: &mut PokemonInst, status: StatusType, rng: &mut TurnRng) -> EffectResult {
    if !target.apply_status(status, rng) {
        return EffectResult::failed();
    }
    let event = BattleEvent::StatusApplied {
        target: target.name.clone(),
        status,
    };
    EffectResult::with_events(true, vec![event])
}

fn change_stats(target: &mut PokemonInst, changes: &[(StatType, i8)]) -> EffectResult {
    if target.is_fainted() {
        return EffectResult::failed();
    }
    let mut applied = false;
    let mut events = Vec::with_capacity(changes.len());
    for (stat, stages) in changes {
        let (changed, event) = target.modify_stat_stage(*stat, *stages);
        applied |= changed;
        events.push(event);
    }
    EffectResult::with_events(applied, events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{predictable_rng, TestPokemonBuilder};
    use pretty_assertions::assert_eq;

    #[test]
    fn recoil_is_a_share_of_damage_dealt() {
        let mut attacker = TestPokemonBuilder::new(1, 20).build();
        let mut defender = TestPokemonBuilder::new(4, 20).build();
        let before = attacker.current_hp();
        let mut context = EffectContext {
            attacker: &mut attacker,
            defender: &mut defender,
            damage_dealt: 20,
        };

        let result = apply_move_effect(&MoveEffect::Recoil(25), &mut context, &mut predictable_rng());

        assert!(result.applied);
        assert_eq!(attacker.current_hp(), before - 5);
    }

    #[test]
    fn blocked_stat_change_reports_but_does_not_apply() {
        let mut attacker = TestPokemonBuilder::new(1, 20).build();
        let mut defender = TestPokemonBuilder::new(4, 20).build();
        attacker.modify_stat_stage(StatType::Atk, 6);
        let mut context = EffectContext {
            attacker: &mut attacker,
            defender: &mut defender,
            damage_dealt: 0,
        };
        let effect = MoveEffect::StatChange {
            target: Target::User,
            stat: StatType::Atk,
            stages: 2,
        };

        let result = apply_move_effect(&effect, &mut context, &mut predictable_rng());

        assert!(!result.applied);
        assert_eq!(
            result.events,
            vec![BattleEvent::StatStageBlocked {
                target: "Bulbasaur".to_string(),
                stat: StatType::Atk,
                rising: true,
            }]
        );
    }

    #[test]
    fn weather_is_left_to_the_engine() {
        let mut attacker = TestPokemonBuilder::new(1, 20).build();
        let mut defender = TestPokemonBuilder::new(4, 20).build();
        let mut context = EffectContext {
            attacker: &mut attacker,
            defender: &mut defender,
            damage_dealt: 0,
        };

        let result = apply_move_effect(
            &MoveEffect::Weather(Weather::Sandstorm),
            &mut context,
            &mut predictable_rng(),
        );

        assert_eq!(result.weather, Some(Weather::Sandstorm));
        assert!(result.events.is_empty());
    }
}
