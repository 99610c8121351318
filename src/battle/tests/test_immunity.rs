use crate::battle::calculators::calculate_damage;
use crate::battle::state::TurnRng;
use crate::battle::tests::common::{test_catalog, TestPokemonBuilder};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case(19, 5, "Tackle", 94, 5)] // Normal into Ghost
#[case(143, 100, "Body Slam", 94, 5)]
#[case(25, 50, "Thunder Shock", 74, 50)] // Electric into Ground
#[case(25, 100, "Thunder Shock", 74, 1)]
#[case(94, 60, "Lick", 133, 60)] // Ghost into Normal
fn immune_targets_take_exactly_zero(
    #[case] attacker_id: u16,
    #[case] attacker_level: u8,
    #[case] move_name: &str,
    #[case] defender_id: u16,
    #[case] defender_level: u8,
) {
    let catalog = test_catalog();
    let attacker = TestPokemonBuilder::new(attacker_id, attacker_level)
        .with_moves(vec![move_name])
        .build();
    let defender = TestPokemonBuilder::new(defender_id, defender_level).build();
    let move_data = catalog.move_data(move_name).unwrap();

    // forced crit and a top variance roll change nothing
    let mut rng = TurnRng::new_for_test(vec![1, 1, 100]);
    let outcome = calculate_damage(&attacker, &defender, move_data, true, &mut rng);

    assert!(outcome.hit);
    assert_eq!(outcome.damage, 0);
    assert_eq!(outcome.effectiveness, 0.0);
    assert!(!outcome.critical);
}

#[test]
fn immunity_comes_from_either_defending_type() {
    // Pidgey is Normal/Flying; Ground moves cannot reach it
    let catalog = test_catalog();
    let geodude = TestPokemonBuilder::new(74, 30).build();
    let pidgey = TestPokemonBuilder::new(16, 30).build();
    let mut move_data = catalog.move_data("Tackle").unwrap().clone();
    move_data.move_type = schema::PokemonType::Ground;

    let outcome = calculate_damage(&geodude, &pidgey, &move_data, false, &mut TurnRng::new_for_test(vec![1]));

    assert_eq!(outcome.damage, 0);
    assert_eq!(outcome.effectiveness, 0.0);
}
