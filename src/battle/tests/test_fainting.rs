use crate::battle::engine::resolve_turn;
use crate::battle::state::{BattleEvent, BattleOutcome, GameState, Side};
use crate::battle::tests::common::{
    create_team_battle, create_test_battle, predictable_rng, test_catalog, TestPokemonBuilder,
};
use crate::player::PlayerAction;
use crate::pokemon::StatusCondition;
use pretty_assertions::assert_eq;
use schema::StatType;

fn both_use_first_move() -> [Option<PlayerAction>; 2] {
    [
        Some(PlayerAction::UseMove { move_index: 0 }),
        Some(PlayerAction::UseMove { move_index: 0 }),
    ]
}

#[test]
fn fainted_pokemon_is_replaced_and_its_move_skipped() {
    let catalog = test_catalog();
    let mut pidgey = TestPokemonBuilder::new(16, 20).with_moves(vec!["Tackle"]).with_hp(1).build();
    pidgey.modify_stat_stage(StatType::Atk, 2);
    let rattata = TestPokemonBuilder::new(19, 20).with_moves(vec!["Tackle"]).build();
    let pikachu = TestPokemonBuilder::new(25, 20).with_moves(vec!["Quick Attack"]).build();
    let mut state = create_team_battle(vec![pidgey, rattata], vec![pikachu]);
    state.action_queue = both_use_first_move();

    let bus = resolve_turn(&mut state, &catalog, &mut predictable_rng());
    let events = bus.events();

    assert_eq!(state.players[0].active_pokemon_index, 1);
    assert_eq!(state.players[0].team[0].stat_stage(StatType::Atk), 0);
    assert!(events.contains(&BattleEvent::PokemonFainted {
        pokemon: "Pidgey".to_string()
    }));
    assert!(bus.formatted_lines().contains(&"Go! Rattata!".to_string()));
    assert!(!events.iter().any(|event| matches!(
        event,
        BattleEvent::MoveUsed { pokemon, .. } if pokemon != "Pikachu"
    )));
    assert_eq!(state.game_state, GameState::WaitingForActions);
}

#[test]
fn knockout_awards_experience_to_the_victor() {
    let catalog = test_catalog();
    let pidgey = TestPokemonBuilder::new(16, 20).with_moves(vec!["Tackle"]).with_hp(1).build();
    let rattata = TestPokemonBuilder::new(19, 20).with_moves(vec!["Tackle"]).build();
    let pikachu = TestPokemonBuilder::new(25, 20).with_moves(vec!["Quick Attack"]).build();
    let exp_before = pikachu.curr_exp;
    let mut state = create_team_battle(vec![pidgey, rattata], vec![pikachu]);
    state.action_queue = both_use_first_move();

    let bus = resolve_turn(&mut state, &catalog, &mut predictable_rng());

    // 50 base experience * level 20 / 7
    assert!(bus.events().contains(&BattleEvent::ExperienceGained {
        pokemon: "Pikachu".to_string(),
        amount: 142,
    }));
    assert_eq!(state.players[1].team[0].curr_exp, exp_before + 142);
}

#[test]
fn last_faint_ends_the_battle_and_drops_remaining_actions() {
    let catalog = test_catalog();
    let pikachu = TestPokemonBuilder::new(25, 20).with_moves(vec!["Thunder Shock"]).build();
    let pidgey = TestPokemonBuilder::new(16, 20).with_moves(vec!["Tackle"]).with_hp(1).build();
    let mut state = create_test_battle(pikachu, pidgey);
    state.players[1].prize_money = 300;
    state.action_queue = both_use_first_move();

    let bus = resolve_turn(&mut state, &catalog, &mut predictable_rng());

    assert_eq!(state.game_state, GameState::Finished(BattleOutcome::Winner(Side::Player)));
    let pikachu = &state.players[0].team[0];
    assert_eq!(pikachu.current_hp(), pikachu.max_hp());
    assert!(!bus.events().iter().any(|event| matches!(
        event,
        BattleEvent::MoveUsed { pokemon, .. } if pokemon == "Pidgey"
    )));
    let lines = bus.formatted_lines();
    assert!(lines.contains(&"You won!".to_string()));
    assert!(lines.contains(&"You got $300 for winning!".to_string()));
}

#[test]
fn losing_a_trainer_battle_blacks_out() {
    let catalog = test_catalog();
    let pidgey = TestPokemonBuilder::new(16, 20).with_moves(vec!["Tackle"]).with_hp(1).build();
    let pikachu = TestPokemonBuilder::new(25, 20).with_moves(vec!["Thunder Shock"]).build();
    let mut state = create_test_battle(pidgey, pikachu);
    state.action_queue = both_use_first_move();

    let bus = resolve_turn(&mut state, &catalog, &mut predictable_rng());

    assert_eq!(state.outcome(), Some(BattleOutcome::Winner(Side::Opponent)));
    let lines = bus.formatted_lines();
    assert!(lines.contains(&"You lost!".to_string()));
    assert!(lines.contains(&"You blacked out!".to_string()));
}

#[test]
fn simultaneous_end_of_turn_faints_go_to_the_opponent() {
    let catalog = test_catalog();
    let pikachu = TestPokemonBuilder::new(25, 20)
        .with_moves(vec!["Growl"])
        .with_status(StatusCondition::Poison)
        .with_hp(1)
        .build();
    let pidgey = TestPokemonBuilder::new(16, 20)
        .with_moves(vec!["Growl"])
        .with_status(StatusCondition::Poison)
        .with_hp(1)
        .build();
    let mut state = create_test_battle(pikachu, pidgey);
    state.action_queue = both_use_first_move();

    let bus = resolve_turn(&mut state, &catalog, &mut predictable_rng());

    assert!(state.players[0].team[0].is_fainted());
    assert!(state.players[1].team[0].is_fainted());
    assert_eq!(state.outcome(), Some(BattleOutcome::Winner(Side::Opponent)));
    assert!(!bus
        .events()
        .iter()
        .any(|event| matches!(event, BattleEvent::ExperienceGained { .. })));
}

#[test]
fn end_of_turn_faint_promotes_the_next_pokemon() {
    let catalog = test_catalog();
    let pikachu = TestPokemonBuilder::new(25, 20)
        .with_moves(vec!["Growl"])
        .with_status(StatusCondition::Burn)
        .with_hp(1)
        .build();
    let squirtle = TestPokemonBuilder::new(7, 20).with_moves(vec!["Tackle"]).build();
    let pidgey = TestPokemonBuilder::new(16, 20).with_moves(vec!["Growl"]).build();
    let mut state = create_team_battle(vec![pikachu, squirtle], vec![pidgey]);
    state.action_queue = both_use_first_move();

    let bus = resolve_turn(&mut state, &catalog, &mut predictable_rng());

    assert_eq!(state.players[0].active_pokemon_index, 1);
    assert!(!state.is_over());
    assert!(bus.formatted_lines().contains(&"Pikachu is hurt by its burn!".to_string()));
    assert!(bus.formatted_lines().contains(&"Go! Squirtle!".to_string()));
}

#[test]
fn both_faint_paths_clear_volatile_state() {
    let knocked_out = |direct: bool| {
        let mut pokemon = TestPokemonBuilder::new(25, 20)
            .with_moves(vec!["Thunder Shock"])
            .with_status(StatusCondition::Paralysis)
            .build();
        pokemon.confusion_turns = 2;
        pokemon.flinched = true;
        if direct {
            pokemon.set_hp(0);
        } else {
            pokemon.take_damage(u16::MAX);
        }
        pokemon
    };

    for pokemon in [knocked_out(true), knocked_out(false)] {
        assert!(pokemon.is_fainted());
        assert_eq!(pokemon.status, None);
        assert_eq!(pokemon.confusion_turns, 0);
        assert!(!pokemon.flinched);
    }
}
