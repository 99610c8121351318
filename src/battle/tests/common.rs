use crate::battle::state::{BattleKind, BattleState, GameState, TurnRng};
use crate::catalog::Catalog;
use crate::errors::BattleResult;
use crate::player::BattlePlayer;
use crate::pokemon::{PokemonBuilder, PokemonInst, StatusCondition};
use rand::rngs::StdRng;
use rand::SeedableRng;
use schema::Nature;
use std::sync::{Arc, OnceLock};

/// The embedded catalog, parsed once per test binary.
pub fn test_catalog() -> Arc<Catalog> {
    static CATALOG: OnceLock<Arc<Catalog>> = OnceLock::new();
    CATALOG
        .get_or_init(|| match Catalog::load_default() {
            Ok(catalog) => Arc::new(catalog),
            Err(err) => panic!("Failed to load the embedded catalog: {}", err),
        })
        .clone()
}

/// A builder for creating test Pokemon instances with common defaults:
/// zero IVs and EVs, a neutral nature and the default learnset moves.
///
/// # Example
/// ```ignore
/// let pokemon = TestPokemonBuilder::new(25, 25)
///     .with_moves(vec!["Tackle"])
///     .with_status(StatusCondition::Paralysis)
///     .build();
/// ```
pub struct TestPokemonBuilder {
    species_id: u16,
    level: u8,
    moves: Option<Vec<String>>,
    status: Option<StatusCondition>,
    current_hp: Option<u16>,
}

impl TestPokemonBuilder {
    /// Creates a new builder for a given pokedex number and level.
    pub fn new(species_id: u16, level: u8) -> Self {
        Self {
            species_id,
            level,
            moves: None,
            status: None,
            current_hp: None,
        }
    }

    /// Sets the moves for the test Pokemon by name.
    pub fn with_moves(mut self, moves: Vec<&str>) -> Self {
        self.moves = Some(moves.into_iter().map(str::to_string).collect());
        self
    }

    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the current HP for the test Pokemon. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn build(self) -> PokemonInst {
        let catalog = test_catalog();
        let mut builder = PokemonBuilder::new(self.species_id, self.level)
            .ivs([0; 6])
            .evs([0; 6])
            .nature(Nature::Hardy);
        if let Some(moves) = self.moves {
            builder = builder.moves(moves);
        }
        let mut rng = StdRng::seed_from_u64(0);
        let mut pokemon = match builder.build(&catalog, &mut rng) {
            Ok(pokemon) => pokemon,
            Err(err) => panic!("Failed to build species #{}: {}", self.species_id, err),
        };

        if let Some(hp) = self.current_hp {
            pokemon.set_hp(hp);
        }
        if self.status.is_some() {
            pokemon.status = self.status;
        }
        pokemon
    }
}

/// Creates a default test player with a given ID, name, and team.
pub fn create_test_player(id: &str, name: &str, team: Vec<PokemonInst>) -> BattlePlayer {
    BattlePlayer::new(id.to_string(), name.to_string(), team)
}

/// Creates a trainer battle with full teams, already waiting for actions.
pub fn create_team_battle(player_team: Vec<PokemonInst>, opponent_team: Vec<PokemonInst>) -> BattleState {
    let player = create_test_player("player", "Red", player_team);
    let opponent = create_test_player("rival", "Blue", opponent_team);
    let mut state = BattleState::new("test_battle".to_string(), BattleKind::Trainer, player, opponent);
    state.game_state = GameState::WaitingForActions;
    state
}

/// Creates a standard 1v1 trainer battle for testing.
pub fn create_test_battle(player_pokemon: PokemonInst, opponent_pokemon: PokemonInst) -> BattleState {
    create_team_battle(vec![player_pokemon], vec![opponent_pokemon])
}

/// Creates a wild encounter against a single Pokemon.
pub fn create_wild_battle(player_team: Vec<PokemonInst>, wild: PokemonInst) -> BattleState {
    let player = create_test_player("player", "Red", player_team);
    let opponent = create_test_player("wild", "Wild", vec![wild]);
    let mut state = BattleState::new("wild_battle".to_string(), BattleKind::Wild, player, opponent);
    state.game_state = GameState::WaitingForActions;
    state
}

/// Creates a `TurnRng` whose every draw is 50, clamped into range.
/// Useful for tests where the specific RNG outcome is not important.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50])
}

/// Helper function to assert that a Result is Ok and return the value.
/// Provides clear error messages in tests when functions unexpectedly fail.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
