//! A module for defining AI behaviors for battle opponents.

use crate::battle::calculators::estimate_damage;
use crate::battle::state::{BattleState, Side, TurnRng};
use crate::battle::stats::effective_speed;
use crate::player::PlayerAction;
use crate::pokemon::PokemonInst;
use ordered_float::OrderedFloat;
use schema::{MoveEffect, MoveData, PokemonType, Target};
use tracing::debug;

pub const MIN_AI_TIER: u8 = 1;
pub const MAX_AI_TIER: u8 = 5;

/// A trait for any system that can decide on a battle action.
/// Implementations only read the battle; the returned action is submitted
/// like any other.
pub trait Behavior {
    fn decide_action(&self, side: Side, battle_state: &BattleState, rng: &mut TurnRng) -> PlayerAction;
}

/// Tiered opponent policy. Tier 1 picks at random; every tier above it adds
/// one more layer of judgement on top of the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringAI {
    tier: u8,
}

const UNFAVORABLE_MATCHUP: f32 = 2.0;
const MATCHUP_SWITCH_CHANCE: u8 = 70;
const LOW_HP_SWITCH_CHANCE: u8 = 80;
const LETHAL_BONUS: f32 = 100.0;
const SETUP_BONUS: f32 = 50.0;

impl ScoringAI {
    pub fn new(tier: u8) -> Self {
        Self {
            tier: tier.clamp(MIN_AI_TIER, MAX_AI_TIER),
        }
    }

    pub fn tier(&self) -> u8 {
        self.tier
    }

    /// Switch decision, made before any move is considered. Returns the
    /// roster slot to switch to.
    fn choose_switch(
        &self,
        side: Side,
        battle_state: &BattleState,
        rng: &mut TurnRng,
    ) -> Option<usize> {
        let player = battle_state.player(side);
        let current = player.active_pokemon()?;
        let foe = battle_state.active(side.opponent())?;
        player.next_healthy_reserve()?;

        let threatened = PokemonType::best_matchup(&foe.types, &current.types) >= UNFAVORABLE_MATCHUP;
        let wants_switch = if threatened && current.hp_fraction() > 0.5 {
            rng.percent("ai matchup switch") <= MATCHUP_SWITCH_CHANCE
        } else if current.hp_fraction() < 0.25 && effective_speed(current) < effective_speed(foe) {
            rng.percent("ai low hp switch") <= LOW_HP_SWITCH_CHANCE
        } else {
            false
        };
        if !wants_switch {
            return None;
        }

        let best = player
            .team
            .iter()
            .enumerate()
            .filter(|(i, p)| *i != player.active_pokemon_index && !p.is_fainted())
            .map(|(i, candidate)| (i, Self::score_replacement(candidate, foe)))
            .rev()
            .max_by_key(|(_, score)| OrderedFloat(*score))
            .map(|(i, _)| i);
        debug!(?side, ?best, "ai switching");
        best
    }

    /// Defensive matchup, HP, speed and a clean status all count.
    fn score_replacement(candidate: &PokemonInst, foe: &PokemonInst) -> f32 {
        let matchup = PokemonType::best_matchup(&foe.types, &candidate.types);
        let mut score = (2.0 - matchup) * 50.0 + candidate.hp_fraction() * 30.0;
        if effective_speed(candidate) > effective_speed(foe) {
            score += 20.0;
        }
        if candidate.status.is_none() {
            score += 15.0;
        }
        score
    }

    fn score_move(
        &self,
        move_data: &MoveData,
        user: &PokemonInst,
        foe: &PokemonInst,
        weather_active: bool,
    ) -> f32 {
        let effectiveness = PokemonType::effectiveness_against(move_data.move_type, &foe.types);

        let mut score = if move_data.is_damaging() {
            let (attack, defense) = match move_data.category {
                schema::MoveCategory::Special => (
                    user.modified_stat(schema::StatType::SpAtk),
                    foe.modified_stat(schema::StatType::SpDef),
                ),
                _ => (
                    user.modified_stat(schema::StatType::Atk),
                    foe.modified_stat(schema::StatType::Def),
                ),
            };
            let stab = if user.types.contains(&move_data.move_type) {
                1.5
            } else {
                1.0
            };
            move_data.power as f32 * effectiveness * stab * (attack as f32 / defense.max(1) as f32)
        } else {
            move_data
                .effect
                .as_ref()
                .map(|effect| Self::score_status_effect(effect, user, foe, weather_active))
                .unwrap_or(0.0)
        };

        if self.tier >= 3 {
            score *= move_data.accuracy.map(|a| a as f32 / 100.0).unwrap_or(1.0);
            if move_data.is_damaging() && effectiveness == 0.0 {
                score = 0.0;
            }
        }

        if self.tier >= 4 {
            if move_data.is_damaging() && estimate_damage(user, foe, move_data) >= foe.current_hp() {
                score += LETHAL_BONUS;
            }
            let safe_window = user.hp_fraction() > 0.7 && foe.hp_fraction() < 0.3;
            if safe_window && move_data.effect.as_ref().is_some_and(MoveEffect::raises_user_stats) {
                score += SETUP_BONUS;
            }
        }

        score
    }

    /// Fixed bonuses for status moves, only when the effect would land.
    fn score_status_effect(
        effect: &MoveEffect,
        user: &PokemonInst,
        foe: &PokemonInst,
        weather_active: bool,
    ) -> f32 {
        let foe_clean = foe.status.is_none();
        match effect {
            MoveEffect::Sleep if foe_clean => 80.0,
            MoveEffect::Paralyze if foe_clean => 60.0,
            MoveEffect::Burn if foe_clean => 50.0,
            MoveEffect::Poison | MoveEffect::BadlyPoison if foe_clean => 40.0,
            MoveEffect::Freeze if foe_clean => 40.0,
            MoveEffect::Confuse if !foe.is_confused() => 30.0,
            MoveEffect::StatChange {
                target: Target::User,
                stat,
                stages,
            } if *stages > 0 && user.stat_stage(*stat) < 6 => 40.0,
            MoveEffect::MultiStatChange {
                target: Target::User,
                changes,
            } if changes
                .iter()
                .any(|(stat, stages)| *stages > 0 && user.stat_stage(*stat) < 6) =>
            {
                40.0
            }
            MoveEffect::StatChange {
                target: Target::Target,
                stat,
                stages,
            } if *stages < 0 && foe.stat_stage(*stat) > -6 => 20.0,
            MoveEffect::MultiStatChange {
                target: Target::Target,
                ..
            } => 20.0,
            MoveEffect::Heal(_) if user.hp_fraction() < 0.5 => 50.0,
            MoveEffect::Weather(_) if !weather_active => 10.0,
            _ => 0.0,
        }
    }
}

impl Behavior for ScoringAI {
    fn decide_action(&self, side: Side, battle_state: &BattleState, rng: &mut TurnRng) -> PlayerAction {
        let Some(user) = battle_state.active(side) else {
            return PlayerAction::Struggle;
        };

        if self.tier >= 2 {
            if let Some(team_index) = self.choose_switch(side, battle_state, rng) {
                return PlayerAction::SwitchPokemon { team_index };
            }
        }

        let usable: Vec<usize> = user
            .moves
            .iter()
            .enumerate()
            .filter(|(_, m)| m.pp > 0)
            .map(|(i, _)| i)
            .collect();
        if usable.is_empty() {
            return PlayerAction::Struggle;
        }

        let foe = battle_state.active(side.opponent());
        let move_index = match foe {
            Some(foe) if self.tier >= 2 => {
                let scored: Vec<(usize, f32)> = usable
                    .iter()
                    .map(|&i| {
                        let data = &user.moves[i].data;
                        (i, self.score_move(data, user, foe, battle_state.weather.is_some()))
                    })
                    .collect();
                debug!(?side, tier = self.tier, ?scored, "ai move scores");
                // Reversed so ties resolve to the earliest slot.
                scored
                    .into_iter()
                    .rev()
                    .max_by_key(|(_, score)| OrderedFloat(*score))
                    .map(|(i, _)| i)
                    .unwrap_or(usable[0])
            }
            _ => usable[rng.pick("ai random move", usable.len())],
        };

        PlayerAction::UseMove { move_index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{create_test_battle, predictable_rng, TestPokemonBuilder};
    use crate::player::BattlePlayer;
    use pretty_assertions::assert_eq;

    #[test]
    fn tier_is_clamped() {
        assert_eq!(ScoringAI::new(0).tier(), 1);
        assert_eq!(ScoringAI::new(9).tier(), 5);
    }

    #[test]
    fn tier_one_picks_from_moves_with_pp() {
        let mut user = TestPokemonBuilder::new(25, 20)
            .with_moves(vec!["Thunder Shock", "Quick Attack", "Growl"])
            .build();
        user.moves[0].pp = 0;
        user.moves[1].pp = 0;
        let foe = TestPokemonBuilder::new(16, 20).build();
        let state = create_test_battle(foe, user);

        let mut rng = TurnRng::new_for_test(vec![0]);
        let action = ScoringAI::new(1).decide_action(Side::Opponent, &state, &mut rng);

        assert_eq!(action, PlayerAction::UseMove { move_index: 2 });
    }

    #[test]
    fn no_pp_anywhere_means_struggle() {
        let mut user = TestPokemonBuilder::new(25, 20).build();
        for m in user.moves.iter_mut() {
            m.pp = 0;
        }
        let foe = TestPokemonBuilder::new(16, 20).build();
        let state = create_test_battle(foe, user);

        let action = ScoringAI::new(4).decide_action(Side::Opponent, &state, &mut predictable_rng());

        assert_eq!(action, PlayerAction::Struggle);
    }

    #[test]
    fn tier_two_prefers_super_effective_damage() {
        // Squirtle vs Charmander
        let user = TestPokemonBuilder::new(7, 20)
            .with_moves(vec!["Tackle", "Water Gun"])
            .build();
        let foe = TestPokemonBuilder::new(4, 20).build();
        let state = create_test_battle(foe, user);

        let action = ScoringAI::new(2).decide_action(Side::Opponent, &state, &mut predictable_rng());

        assert_eq!(action, PlayerAction::UseMove { move_index: 1 });
    }

    #[test]
    fn tier_three_avoids_immune_moves() {
        // Normal moves cannot touch Gengar
        let user = TestPokemonBuilder::new(19, 20)
            .with_moves(vec!["Tackle", "Tail Whip"])
            .build();
        let foe = TestPokemonBuilder::new(94, 20).build();
        let state = create_test_battle(foe, user);

        let action = ScoringAI::new(3).decide_action(Side::Opponent, &state, &mut predictable_rng());

        assert_eq!(action, PlayerAction::UseMove { move_index: 1 });
    }

    #[test]
    fn tier_four_takes_the_knockout() {
        let user = TestPokemonBuilder::new(25, 30)
            .with_moves(vec!["Thunder Wave", "Quick Attack"])
            .build();
        let foe = TestPokemonBuilder::new(16, 30).with_hp(3).build();
        let state = create_test_battle(foe, user);

        let action = ScoringAI::new(4).decide_action(Side::Opponent, &state, &mut predictable_rng());

        assert_eq!(action, PlayerAction::UseMove { move_index: 1 });
    }

    #[test]
    fn threatened_trainer_switches_to_the_safest_reserve() {
        // Charmander facing Squirtle, with Geodude and Pikachu in reserve
        let charmander = TestPokemonBuilder::new(4, 20).build();
        let geodude = TestPokemonBuilder::new(74, 20).build();
        let pikachu = TestPokemonBuilder::new(25, 20).build();
        let squirtle = TestPokemonBuilder::new(7, 20).build();
        let mut state = create_test_battle(squirtle, charmander);
        state.players[1] = BattlePlayer::new(
            "rival".to_string(),
            "Rival".to_string(),
            vec![
                TestPokemonBuilder::new(4, 20).build(),
                geodude,
                pikachu,
            ],
        );

        let mut rng = TurnRng::new_for_test(vec![1]);
        let action = ScoringAI::new(2).decide_action(Side::Opponent, &state, &mut rng);

        // Water is super effective on Geodude, so Pikachu is the pick
        assert_eq!(action, PlayerAction::SwitchPokemon { team_index: 2 });
    }

    #[test]
    fn tier_one_never_switches() {
        let squirtle = TestPokemonBuilder::new(7, 20).build();
        let mut state = create_test_battle(squirtle, TestPokemonBuilder::new(4, 20).build());
        state.players[1].team.push(TestPokemonBuilder::new(25, 20).build());

        let mut rng = TurnRng::new_for_test(vec![1]);
        let action = ScoringAI::new(1).decide_action(Side::Opponent, &state, &mut rng);

        assert!(matches!(action, PlayerAction::UseMove { .. }));
    }
}
