use crate::battle::calculators::{calculate_damage, estimate_damage, experience_for_defeat};
use crate::battle::state::TurnRng;
use crate::battle::tests::common::{test_catalog, TestPokemonBuilder};
use pretty_assertions::assert_eq;

#[test]
fn ember_damage_matches_the_formula() {
    // Charmander L20 (Sp. Atk 29) into Pikachu L20 (Sp. Def 25):
    // 0.2 * 40 * 29/25 + 2 = 11.28, then STAB 1.5 = 16.92
    let catalog = test_catalog();
    let charmander = TestPokemonBuilder::new(4, 20).with_moves(vec!["Ember"]).build();
    let pikachu = TestPokemonBuilder::new(25, 20).build();
    let ember = catalog.move_data("Ember").unwrap();

    let mut rng = TurnRng::new_for_test(vec![1, 2, 100]);
    let outcome = calculate_damage(&charmander, &pikachu, ember, false, &mut rng);

    assert!(outcome.hit);
    assert!(!outcome.critical);
    assert_eq!(outcome.effectiveness, 1.0);
    assert_eq!(outcome.damage, 16);
}

#[test]
fn critical_hits_multiply_by_one_and_a_half() {
    let catalog = test_catalog();
    let charmander = TestPokemonBuilder::new(4, 20).with_moves(vec!["Ember"]).build();
    let pikachu = TestPokemonBuilder::new(25, 20).build();
    let ember = catalog.move_data("Ember").unwrap();

    let mut rng = TurnRng::new_for_test(vec![1, 1, 100]);
    let outcome = calculate_damage(&charmander, &pikachu, ember, false, &mut rng);

    assert!(outcome.critical);
    assert_eq!(outcome.damage, 25);
}

#[test]
fn misses_deal_nothing_and_stop_rolling() {
    let catalog = test_catalog();
    let squirtle = TestPokemonBuilder::new(7, 20).build();
    let charmander = TestPokemonBuilder::new(4, 20).build();
    let sheer_cold = catalog.move_data("Sheer Cold").unwrap();

    let outcome = calculate_damage(&squirtle, &charmander, sheer_cold, false, &mut TurnRng::new_for_test(vec![31]));

    assert!(!outcome.hit);
    assert_eq!(outcome.damage, 0);
}

#[test]
fn effectiveness_multiplies_across_both_types() {
    let catalog = test_catalog();
    let articuno = TestPokemonBuilder::new(144, 50).build();
    let dragonite = TestPokemonBuilder::new(149, 50).build();
    let sheer_cold = catalog.move_data("Sheer Cold").unwrap();

    let outcome = calculate_damage(&articuno, &dragonite, sheer_cold, false, &mut TurnRng::new_for_test(vec![1, 16, 85]));

    assert_eq!(outcome.effectiveness, 4.0);
}

#[test]
fn resisted_chip_damage_is_at_least_one() {
    // Caterpie L2 Tackle into Geodude L100: 2.07 * 0.5 * 0.85 rounds down to 0
    let catalog = test_catalog();
    let caterpie = TestPokemonBuilder::new(10, 2).with_moves(vec!["Tackle"]).build();
    let geodude = TestPokemonBuilder::new(74, 100).build();
    let tackle = catalog.move_data("Tackle").unwrap();

    let outcome = calculate_damage(&caterpie, &geodude, tackle, false, &mut TurnRng::new_for_test(vec![1, 16, 85]));

    assert_eq!(outcome.effectiveness, 0.5);
    assert_eq!(outcome.damage, 1);
}

#[test]
fn status_moves_deal_no_damage() {
    let catalog = test_catalog();
    let pikachu = TestPokemonBuilder::new(25, 20).build();
    let squirtle = TestPokemonBuilder::new(7, 20).build();
    let growl = catalog.move_data("Growl").unwrap();

    let outcome = calculate_damage(&pikachu, &squirtle, growl, false, &mut TurnRng::new_for_test(vec![1]));

    assert!(outcome.hit);
    assert_eq!(outcome.damage, 0);
    assert_eq!(estimate_damage(&pikachu, &squirtle, growl), 0);
}

#[test]
fn estimate_uses_a_fixed_variance_and_no_crit() {
    let catalog = test_catalog();
    let charmander = TestPokemonBuilder::new(4, 20).build();
    let pikachu = TestPokemonBuilder::new(25, 20).build();
    let ember = catalog.move_data("Ember").unwrap();

    // 16.92 * 0.9
    assert_eq!(estimate_damage(&charmander, &pikachu, ember), 15);
}

#[test]
fn experience_yield_scales_with_level() {
    // Pidgey yields 50 base experience
    let pidgey = TestPokemonBuilder::new(16, 14).build();
    assert_eq!(experience_for_defeat(&pidgey), 100);
}
