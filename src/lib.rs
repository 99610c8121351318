//! Pokemon Battle Engine
//!
//! A turn-based battle core: creatures built from a static catalog, a turn
//! resolver, capture and escape rules, a tiered opponent policy and a session
//! that owns one battle from the opening line to the result.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod items;
pub mod player;
pub mod pokemon;
pub mod progression;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
// Static data definitions shared with the catalog tables.
pub use schema::{
    BaseStats, ExperienceGroup, MoveCategory, MoveData, MoveEffect, Nature, PokemonSpecies,
    PokemonType, StatType, StatusType, Target, Weather,
};

// --- From this crate's modules (`src/`) ---

// Driving a battle.
pub use battle::ai::{Behavior, ScoringAI};
pub use battle::session::{BattleReport, BattleSession, BattleStatus};
pub use battle::state::{BattleEvent, BattleKind, BattleOutcome, BattleState, GameState, Side, TurnRng};

// Core runtime types for a battle.
pub use catalog::Catalog;
pub use config::BattleConfig;
pub use items::{Item, ItemOutcome};
pub use player::{BattlePlayer, PlayerAction, PlayerType};
pub use pokemon::{MoveInstance, PokemonBuilder, PokemonInst, StatusCondition};

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleEngineError, BattleResult, BattleStateError, ConfigError, MoveDataError,
    MoveDataResult, SpeciesDataError, SpeciesDataResult,
};
