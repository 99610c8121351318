use crate::battle::engine::{flee_odds, resolve_turn};
use crate::battle::state::{ActionFailureReason, BattleEvent, BattleOutcome, TurnRng};
use crate::battle::tests::common::{
    create_test_battle, create_wild_battle, predictable_rng, test_catalog, TestPokemonBuilder,
};
use crate::player::PlayerAction;
use crate::pokemon::PokemonInst;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn squirtle() -> PokemonInst {
    TestPokemonBuilder::new(7, 20).with_moves(vec!["Tackle"]).build()
}

fn wild_pikachu() -> PokemonInst {
    TestPokemonBuilder::new(25, 20).with_moves(vec!["Growl"]).build()
}

fn flee_turn() -> [Option<PlayerAction>; 2] {
    [
        Some(PlayerAction::Flee),
        Some(PlayerAction::UseMove { move_index: 0 }),
    ]
}

#[rstest]
#[case(41, 27, 0, 218)]
#[case(100, 20, 0, 128)]
#[case(10, 2, 0, 64)]
#[case(22, 41, 0, 70)]
#[case(22, 41, 2, 130)]
fn escape_odds(#[case] own: u16, #[case] theirs: u16, #[case] attempts: u32, #[case] expected: u32) {
    assert_eq!(flee_odds(own, theirs, attempts), expected);
}

#[test]
fn successful_escape_ends_the_battle() {
    let catalog = test_catalog();
    let mut state = create_wild_battle(vec![squirtle()], wild_pikachu());
    state.action_queue = flee_turn();

    let bus = resolve_turn(&mut state, &catalog, &mut TurnRng::new_for_test(vec![0]));

    assert_eq!(state.outcome(), Some(BattleOutcome::Fled));
    let lines = bus.formatted_lines();
    assert!(lines.contains(&"Got away safely!".to_string()));
    assert!(!lines.contains(&"Pikachu used Growl!".to_string()));
}

#[test]
fn failed_escapes_make_the_next_one_easier() {
    let catalog = test_catalog();
    let mut state = create_wild_battle(vec![squirtle()], wild_pikachu());

    // Odds start at 70.
    state.action_queue = flee_turn();
    let bus = resolve_turn(&mut state, &catalog, &mut TurnRng::new_for_test(vec![99, 50]));
    assert!(bus.events().contains(&BattleEvent::FleeFailed));
    assert!(bus.formatted_lines().contains(&"Pikachu used Growl!".to_string()));
    assert_eq!(state.flee_attempts, 1);
    assert!(!state.is_over());

    // One failure later the same roll gets away.
    state.action_queue = flee_turn();
    resolve_turn(&mut state, &catalog, &mut TurnRng::new_for_test(vec![99]));
    assert_eq!(state.outcome(), Some(BattleOutcome::Fled));
}

#[test]
fn odds_past_255_never_roll() {
    let catalog = test_catalog();
    let mut state = create_wild_battle(vec![squirtle()], wild_pikachu());
    state.flee_attempts = 7;
    state.action_queue = flee_turn();

    resolve_turn(&mut state, &catalog, &mut TurnRng::new_for_test(vec![255]));

    assert_eq!(state.outcome(), Some(BattleOutcome::Fled));
}

#[test]
fn trainer_battles_cannot_be_fled() {
    let catalog = test_catalog();
    let mut state = create_test_battle(squirtle(), wild_pikachu());
    state.action_queue = flee_turn();

    let bus = resolve_turn(&mut state, &catalog, &mut predictable_rng());

    assert!(bus.events().contains(&BattleEvent::ActionFailed {
        reason: ActionFailureReason::FleeNotAllowed
    }));
    assert!(bus
        .formatted_lines()
        .contains(&"There's no running from a trainer battle!".to_string()));
    assert!(!state.is_over());
    assert_eq!(state.flee_attempts, 0);
}
