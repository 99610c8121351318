//! Experience and level-up handling for Pokemon after a defeat.

use crate::battle::state::BattleEvent;
use crate::catalog::Catalog;
use crate::pokemon::{MoveInstance, PokemonInst, MAX_LEVEL, MAX_MOVES};
use tracing::{debug, warn};

impl PokemonInst {
    /// Experience still needed to reach the next level, or `None` at the cap.
    pub fn exp_to_next_level(&self) -> Option<u32> {
        if self.level >= MAX_LEVEL {
            return None;
        }
        let threshold = self.growth_rate.exp_for_level(self.level + 1);
        Some(threshold.saturating_sub(self.curr_exp))
    }

    /// Adds experience and levels up as many times as the total allows. Each
    /// new level recomputes stats (current HP rises by the max-HP delta) and
    /// tries to learn the moves the species gets at that level. A Pokemon that
    /// already knows four moves only announces the attempt.
    pub fn gain_experience(&mut self, amount: u32, catalog: &Catalog) -> Vec<BattleEvent> {
        let mut events = vec![BattleEvent::ExperienceGained {
            pokemon: self.name.clone(),
            amount,
        }];
        self.curr_exp = self.curr_exp.saturating_add(amount);

        while let Some(0) = self.exp_to_next_level() {
            self.level += 1;
            self.recalculate_stats();
            debug!(pokemon = %self.name, level = self.level, "level up");
            events.push(BattleEvent::LevelUp {
                pokemon: self.name.clone(),
                new_level: self.level,
            });
            events.extend(self.learn_level_up_moves(catalog));
        }

        events
    }

    fn learn_level_up_moves(&mut self, catalog: &Catalog) -> Vec<BattleEvent> {
        let species = match catalog.species(self.species_id) {
            Ok(species) => species,
            Err(err) => {
                warn!(%err, "skipping level-up moves");
                return Vec::new();
            }
        };

        let mut events = Vec::new();
        for move_name in species.learnset.learns_at_level(self.level) {
            if self.knows_move(move_name) {
                continue;
            }
            if self.moves.len() >= MAX_MOVES {
                events.push(BattleEvent::TryingToLearnMove {
                    pokemon: self.name.clone(),
                    move_name: move_name.to_string(),
                });
                continue;
            }
            match catalog.move_data(move_name) {
                Ok(data) => {
                    self.moves.push(MoveInstance::new(data.clone()));
                    events.push(BattleEvent::MoveLearned {
                        pokemon: self.name.clone(),
                        move_name: move_name.to_string(),
                    });
                }
                Err(err) => warn!(%err, "level-up move missing from catalog"),
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{test_catalog, TestPokemonBuilder};
    use pretty_assertions::assert_eq;

    #[test]
    fn level_up_raises_current_hp_by_the_max_hp_delta() {
        let catalog = test_catalog();
        let mut bulbasaur = TestPokemonBuilder::new(1, 5).with_hp(10).build();
        let old_max = bulbasaur.max_hp();
        let needed = bulbasaur.exp_to_next_level().unwrap_or_default();

        let events = bulbasaur.gain_experience(needed, &catalog);

        assert_eq!(bulbasaur.level, 6);
        assert_eq!(bulbasaur.current_hp(), 10 + (bulbasaur.max_hp() - old_max));
        assert!(events.contains(&BattleEvent::LevelUp {
            pokemon: "Bulbasaur".to_string(),
            new_level: 6,
        }));
    }

    #[test]
    fn crossing_several_thresholds_levels_repeatedly() {
        let catalog = test_catalog();
        let mut bulbasaur = TestPokemonBuilder::new(1, 5).build();
        let target = bulbasaur.growth_rate.exp_for_level(10);

        bulbasaur.gain_experience(target - bulbasaur.curr_exp, &catalog);

        assert_eq!(bulbasaur.level, 10);
    }

    #[test]
    fn full_moveset_only_announces_the_new_move() {
        let catalog = test_catalog();
        let mut bulbasaur = TestPokemonBuilder::new(1, 8)
            .with_moves(vec!["Tackle", "Growl", "Vine Whip", "Leech Seed"])
            .build();
        let needed = bulbasaur.exp_to_next_level().unwrap_or_default();

        let events = bulbasaur.gain_experience(needed, &catalog);

        assert_eq!(bulbasaur.moves.len(), 4);
        assert!(!bulbasaur.knows_move("Razor Leaf"));
        assert!(events.contains(&BattleEvent::TryingToLearnMove {
            pokemon: "Bulbasaur".to_string(),
            move_name: "Razor Leaf".to_string(),
        }));
    }

    #[test]
    fn open_slot_learns_the_new_move() {
        let catalog = test_catalog();
        let mut bulbasaur = TestPokemonBuilder::new(1, 8)
            .with_moves(vec!["Tackle", "Growl"])
            .build();
        let needed = bulbasaur.exp_to_next_level().unwrap_or_default();

        let events = bulbasaur.gain_experience(needed, &catalog);

        assert!(bulbasaur.knows_move("Razor Leaf"));
        assert!(events.contains(&BattleEvent::MoveLearned {
            pokemon: "Bulbasaur".to_string(),
            move_name: "Razor Leaf".to_string(),
        }));
    }

    #[test]
    fn max_level_stops_leveling() {
        let catalog = test_catalog();
        let mut mew = TestPokemonBuilder::new(151, 100).build();

        mew.gain_experience(1_000_000, &catalog);

        assert_eq!(mew.level, 100);
        assert_eq!(mew.exp_to_next_level(), None);
    }
}
