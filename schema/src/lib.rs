// Battle Engine Schema - Shared data definitions
// This crate holds the static catalog records (species, moves, types, natures)
// that the engine deserializes from its embedded RON tables.

// Re-export the main types
pub use battle_data::*;
pub use move_types::*;
pub use natures::*;
pub use pokemon_types::*;
pub use species_data::*;

pub mod battle_data;
pub mod move_types;
pub mod natures;
pub mod pokemon_types;
pub mod species_data;
