use crate::battle::action_stack::{ActionStack, BattleAction};
use crate::battle::calculators::{self, experience_for_defeat, struggle_recoil};
use crate::battle::catch::resolve_ball_throw;
use crate::battle::move_effects::{apply_move_effect, EffectContext};
use crate::battle::state::{
    ActionFailureReason, BattleEvent, BattleOutcome, BattleState, EventBus, GameState, Side,
    TurnRng, WeatherState,
};
use crate::battle::stats::{effective_speed, move_hits};
use crate::catalog::Catalog;
use crate::items::Item;
use schema::{MoveData, Weather};
use tracing::{debug, info};

/// Both sides have an action queued and the battle is waiting on them.
pub fn ready_for_turn_resolution(battle_state: &BattleState) -> bool {
    battle_state.game_state == GameState::WaitingForActions
        && battle_state.action_queue.iter().all(Option::is_some)
}

/// Main entry point for turn resolution.
/// Executes one complete turn against the queued actions and returns every
/// event that happened, in order.
pub fn resolve_turn(battle_state: &mut BattleState, catalog: &Catalog, rng: &mut TurnRng) -> EventBus {
    let mut bus = EventBus::new();

    initialize_turn(battle_state, &mut bus);

    let mut action_stack = ActionStack::build_initial(battle_state);
    while let Some(action) = action_stack.pop_front() {
        if battle_state.is_over() {
            action_stack.clear();
            break;
        }
        execute_battle_action(action, battle_state, catalog, rng, &mut bus);
    }

    if !battle_state.is_over() {
        execute_end_turn_phase(battle_state, catalog, &mut bus);
    }

    finalize_turn(battle_state, &mut bus);
    bus
}

fn initialize_turn(battle_state: &mut BattleState, bus: &mut EventBus) {
    battle_state.turn_number += 1;
    battle_state.game_state = GameState::TurnInProgress;
    bus.push(BattleEvent::TurnStarted {
        turn_number: battle_state.turn_number,
    });
}

fn finalize_turn(battle_state: &mut BattleState, bus: &mut EventBus) {
    battle_state.action_queue = [None, None];
    for side in Side::both() {
        if let Some(pokemon) = battle_state.active_mut(side) {
            pokemon.flinched = false;
        }
    }
    if !battle_state.is_over() {
        battle_state.game_state = GameState::WaitingForActions;
    }
    bus.push(BattleEvent::TurnEnded);
}

/// A move queued by a Pokemon that has since fainted or left the field does nothing.
fn actor_still_active(battle_state: &BattleState, side: Side, actor_index: usize) -> bool {
    let player = battle_state.player(side);
    player.active_pokemon_index == actor_index
        && player.active_pokemon().is_some_and(|p| !p.is_fainted())
}

pub fn execute_battle_action(
    action: BattleAction,
    battle_state: &mut BattleState,
    catalog: &Catalog,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) {
    debug!(?action, "executing");
    match action {
        BattleAction::Move {
            side,
            actor_index,
            move_index,
        } => {
            if actor_still_active(battle_state, side, actor_index) {
                execute_move(battle_state, side, Some(move_index), catalog, rng, bus);
            }
        }
        BattleAction::Struggle { side, actor_index } => {
            if actor_still_active(battle_state, side, actor_index) {
                execute_move(battle_state, side, None, catalog, rng, bus);
            }
        }
        BattleAction::Switch { side, team_index } => {
            execute_switch(battle_state, side, team_index, bus);
        }
        BattleAction::UseItem {
            side,
            item,
            target_index,
            move_index,
        } => {
            execute_item(battle_state, side, item, target_index, move_index, rng, bus);
        }
        BattleAction::Flee { side } => execute_flee(battle_state, side, rng, bus),
    }
}

/// Runs one move for `side`'s active Pokemon. `None` (or a slot without PP)
/// means Struggle.
fn execute_move(
    battle_state: &mut BattleState,
    side: Side,
    move_slot: Option<usize>,
    catalog: &Catalog,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) {
    let Some((attacker, defender)) = battle_state.active_pair_mut(side) else {
        return;
    };

    let (can_move, status_events) = attacker.process_status_start(rng);
    bus.extend(status_events);
    if attacker.is_fainted() {
        handle_faint(battle_state, side, catalog, bus);
        return;
    }
    if !can_move {
        return;
    }
    if attacker.flinched {
        attacker.flinched = false;
        bus.push(BattleEvent::Flinched {
            pokemon: attacker.name.clone(),
        });
        return;
    }

    let usable_slot = move_slot.filter(|&i| attacker.moves.get(i).is_some_and(|m| m.pp > 0));
    let (move_data, is_struggle) = match usable_slot {
        Some(slot) => {
            let move_instance = &mut attacker.moves[slot];
            move_instance.use_move();
            (move_instance.data.clone(), false)
        }
        None => {
            bus.push(BattleEvent::NoMovesLeft {
                pokemon: attacker.name.clone(),
            });
            (MoveData::struggle(), true)
        }
    };
    bus.push(BattleEvent::MoveUsed {
        pokemon: attacker.name.clone(),
        move_name: move_data.name.clone(),
    });

    let mut new_weather = None;

    if move_data.is_damaging() {
        let outcome = calculators::calculate_damage(attacker, defender, &move_data, false, rng);
        if !outcome.hit {
            bus.push(BattleEvent::MoveMissed {
                attacker: attacker.name.clone(),
            });
            return;
        }
        if outcome.effectiveness == 0.0 {
            bus.push(BattleEvent::AttackTypeEffectiveness { multiplier: 0.0 });
            return;
        }
        if outcome.critical {
            bus.push(BattleEvent::CriticalHit);
        }

        let dealt = outcome.damage.min(defender.current_hp());
        bus.push(BattleEvent::DamageDealt {
            target: defender.name.clone(),
            damage: dealt,
            remaining_hp: defender.current_hp() - dealt,
        });
        let faint_events = defender.take_damage(outcome.damage);
        bus.push(BattleEvent::AttackTypeEffectiveness {
            multiplier: outcome.effectiveness,
        });
        bus.extend(faint_events);

        if is_struggle {
            let recoil = struggle_recoil(attacker);
            bus.push(BattleEvent::RecoilDamage {
                pokemon: attacker.name.clone(),
                damage: recoil.min(attacker.current_hp()),
            });
            bus.extend(attacker.take_damage(recoil));
        }

        if let Some(effect) = &move_data.effect {
            if dealt > 0 && rng.chance("secondary effect", move_data.effect_chance) {
                let mut context = EffectContext {
                    attacker: &mut *attacker,
                    defender: &mut *defender,
                    damage_dealt: dealt,
                };
                let result = apply_move_effect(effect, &mut context, rng);
                bus.extend(result.events);
                new_weather = result.weather;
            }
        }
    } else {
        let Some(effect) = &move_data.effect else {
            bus.push(BattleEvent::NothingHappened);
            return;
        };
        let self_targeted = effect.is_self_targeted();
        if !self_targeted && defender.is_fainted() {
            bus.push(BattleEvent::MoveFailed);
            return;
        }
        if !self_targeted && !move_hits(attacker, defender, &move_data, rng) {
            bus.push(BattleEvent::MoveMissed {
                attacker: attacker.name.clone(),
            });
            return;
        }

        let mut context = EffectContext {
            attacker: &mut *attacker,
            defender: &mut *defender,
            damage_dealt: 0,
        };
        let result = apply_move_effect(effect, &mut context, rng);
        if !result.applied && result.events.is_empty() {
            bus.push(BattleEvent::MoveFailed);
        }
        bus.extend(result.events);
        new_weather = result.weather;
    }

    let defender_fainted = defender.is_fainted();
    let attacker_fainted = attacker.is_fainted();

    if let Some(weather) = new_weather {
        start_weather(battle_state, weather, bus);
    }
    if defender_fainted {
        handle_faint(battle_state, side.opponent(), catalog, bus);
    }
    if attacker_fainted && !battle_state.is_over() {
        handle_faint(battle_state, side, catalog, bus);
    }
}

fn start_weather(battle_state: &mut BattleState, weather: Weather, bus: &mut EventBus) {
    if battle_state.weather.is_some_and(|w| w.weather == weather) {
        bus.push(BattleEvent::MoveFailed);
        return;
    }
    battle_state.weather = Some(WeatherState {
        weather,
        turns_remaining: Weather::DEFAULT_DURATION,
    });
    bus.push(BattleEvent::WeatherStarted { weather });
}

/// Deals with `fainted_side`'s active Pokemon having fainted: experience for
/// the Pokemon that is still standing on the other side, then the next
/// healthy roster member is sent out, or the battle ends.
pub fn handle_faint(battle_state: &mut BattleState, fainted_side: Side, catalog: &Catalog, bus: &mut EventBus) {
    let victor_side = fainted_side.opponent();
    let experience = battle_state.active(fainted_side).map(experience_for_defeat);

    if let (Some(amount), Some(victor)) = (experience, battle_state.active_mut(victor_side)) {
        if amount > 0 && !victor.is_fainted() {
            bus.extend(victor.gain_experience(amount, catalog));
        }
    }

    let player = battle_state.player_mut(fainted_side);
    match player.first_healthy_index() {
        Some(next) => {
            player.switch_pokemon(next);
            if let Some(sent_out) = player.active_pokemon() {
                bus.push(BattleEvent::PokemonSentOut {
                    side: fainted_side,
                    trainer: player.player_name.clone(),
                    pokemon: sent_out.name.clone(),
                });
            }
        }
        None => {
            if let Some(fainted) = player.active_pokemon_mut() {
                fainted.clear_volatile_state();
            }
            info!(winner = %victor_side, "battle decided");
            battle_state.end_battle(BattleOutcome::Winner(victor_side), bus);
        }
    }
}

fn execute_switch(battle_state: &mut BattleState, side: Side, team_index: usize, bus: &mut EventBus) {
    let player = battle_state.player_mut(side);
    let failure = match player.team.get(team_index) {
        None => Some(ActionFailureReason::NoSuchPokemon),
        Some(p) if p.is_fainted() => Some(ActionFailureReason::SwitchTargetFainted),
        Some(_) if team_index == player.active_pokemon_index => {
            Some(ActionFailureReason::SwitchTargetActive)
        }
        Some(_) => None,
    };
    if let Some(reason) = failure {
        bus.push(BattleEvent::ActionFailed { reason });
        return;
    }

    if let Some(outgoing) = player.active_pokemon() {
        bus.push(BattleEvent::PokemonWithdrawn {
            side,
            trainer: player.player_name.clone(),
            pokemon: outgoing.name.clone(),
        });
    }
    player.switch_pokemon(team_index);
    if let Some(incoming) = player.active_pokemon() {
        bus.push(BattleEvent::PokemonSentOut {
            side,
            trainer: player.player_name.clone(),
            pokemon: incoming.name.clone(),
        });
    }
}

fn execute_item(
    battle_state: &mut BattleState,
    side: Side,
    item: Item,
    target_index: usize,
    move_index: Option<usize>,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) {
    if item.is_ball() {
        resolve_ball_throw(battle_state, side, item, rng, bus);
        return;
    }

    let player = battle_state.player_mut(side);
    if player.item_count(item) == 0 {
        bus.push(BattleEvent::ActionFailed {
            reason: ActionFailureReason::ItemNotAvailable,
        });
        return;
    }
    let target_index = if item.targets_active_only() {
        player.active_pokemon_index
    } else {
        target_index
    };
    let trainer = player.player_name.clone();
    let Some(target) = player.team.get_mut(target_index) else {
        bus.push(BattleEvent::ActionFailed {
            reason: ActionFailureReason::NoSuchPokemon,
        });
        return;
    };

    bus.push(BattleEvent::ItemUsed { trainer, item });
    let outcome = item.use_on(target, move_index);
    if outcome.success {
        player.take_item(item);
    }
    bus.push(BattleEvent::ItemResult {
        message: outcome.message,
    });
}

/// Escape odds: `((own_speed * 32) / max(1, their_speed / 4)) % 256 + 30 * attempts`.
pub fn flee_odds(own_speed: u16, their_speed: u16, previous_attempts: u32) -> u32 {
    let divisor = (their_speed as u32 / 4).max(1);
    (own_speed as u32 * 32 / divisor) % 256 + 30 * previous_attempts
}

fn execute_flee(battle_state: &mut BattleState, side: Side, rng: &mut TurnRng, bus: &mut EventBus) {
    if !battle_state.kind.is_wild() {
        bus.push(BattleEvent::ActionFailed {
            reason: ActionFailureReason::FleeNotAllowed,
        });
        return;
    }

    let own_speed = battle_state.active(side).map(effective_speed).unwrap_or(0);
    let their_speed = battle_state.active(side.opponent()).map(effective_speed).unwrap_or(0);
    let odds = flee_odds(own_speed, their_speed, battle_state.flee_attempts);

    if odds >= 256 || rng.range("flee", 0, 255) < odds {
        bus.push(BattleEvent::FleeSucceeded);
        battle_state.end_battle(BattleOutcome::Fled, bus);
    } else {
        battle_state.flee_attempts += 1;
        bus.push(BattleEvent::FleeFailed);
    }
}

/// Weather, then burn and poison, then faint checks (player side first).
fn execute_end_turn_phase(battle_state: &mut BattleState, catalog: &Catalog, bus: &mut EventBus) {
    if let Some(mut weather_state) = battle_state.weather {
        weather_state.turns_remaining = weather_state.turns_remaining.saturating_sub(1);
        apply_weather_damage(battle_state, weather_state.weather, bus);
        if weather_state.turns_remaining == 0 {
            battle_state.weather = None;
            bus.push(BattleEvent::WeatherEnded {
                weather: weather_state.weather,
            });
        } else {
            battle_state.weather = Some(weather_state);
        }
    }

    for side in Side::both() {
        if let Some(pokemon) = battle_state.active_mut(side) {
            bus.extend(pokemon.apply_end_of_turn_damage());
        }
    }

    for side in Side::both() {
        if battle_state.is_over() {
            break;
        }
        if battle_state.active(side).is_some_and(|p| p.is_fainted()) {
            handle_faint(battle_state, side, catalog, bus);
        }
    }
}

fn apply_weather_damage(battle_state: &mut BattleState, weather: Weather, bus: &mut EventBus) {
    let Some(immune_types) = weather.immune_types() else {
        return;
    };
    for side in Side::both() {
        let Some(pokemon) = battle_state.active_mut(side) else {
            continue;
        };
        if pokemon.is_fainted() || pokemon.types.iter().any(|t| immune_types.contains(t)) {
            continue;
        }
        let damage = (pokemon.max_hp() / 16).max(1);
        bus.push(BattleEvent::WeatherDamage {
            target: pokemon.name.clone(),
            weather,
            damage: damage.min(pokemon.current_hp()),
        });
        bus.extend(pokemon.take_damage(damage));
    }
}
