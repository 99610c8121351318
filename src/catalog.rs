//! Read-only species and move tables.
//!
//! The default tables ship inside the binary as RON and are parsed once into a
//! [`Catalog`], which callers share by reference (typically behind an `Arc`).

use crate::errors::{BattleResult, MoveDataError, MoveDataResult, SpeciesDataError, SpeciesDataResult};
use schema::{MoveData, PokemonSpecies};
use std::collections::HashMap;
use tracing::debug;

const SPECIES_RON: &str = include_str!("../data/species.ron");
const MOVES_RON: &str = include_str!("../data/moves.ron");

#[derive(Debug, Clone)]
pub struct Catalog {
    species: HashMap<u16, PokemonSpecies>,
    moves: HashMap<String, MoveData>,
}

impl Catalog {
    /// Parses the embedded tables.
    pub fn load_default() -> BattleResult<Self> {
        Self::from_ron_str(SPECIES_RON, MOVES_RON)
    }

    /// Builds a catalog from RON text and checks that every learnset entry
    /// names a move in the move table.
    pub fn from_ron_str(species_ron: &str, moves_ron: &str) -> BattleResult<Self> {
        let move_list: Vec<MoveData> = ron::from_str(moves_ron)
            .map_err(|e| MoveDataError::MalformedData(e.to_string()))?;
        let species_list: Vec<PokemonSpecies> =
            ron::from_str(species_ron).map_err(|e| SpeciesDataError::MalformedData(e.to_string()))?;

        let moves: HashMap<String, MoveData> = move_list
            .into_iter()
            .map(|data| (data.name.clone(), data))
            .collect();

        let mut species = HashMap::with_capacity(species_list.len());
        for record in species_list {
            if let Some(missing) = record
                .learnset
                .move_names()
                .find(|name| !moves.contains_key(*name))
            {
                return Err(SpeciesDataError::MalformedData(format!(
                    "{} learns unknown move {}",
                    record.name, missing
                ))
                .into());
            }
            if record.types.is_empty() || record.types.len() > 2 {
                return Err(SpeciesDataError::MalformedData(format!(
                    "{} must have one or two types",
                    record.name
                ))
                .into());
            }
            species.insert(record.pokedex_number, record);
        }

        debug!(species = species.len(), moves = moves.len(), "catalog loaded");
        Ok(Self { species, moves })
    }

    pub fn species(&self, pokedex_number: u16) -> SpeciesDataResult<&PokemonSpecies> {
        self.species
            .get(&pokedex_number)
            .ok_or(SpeciesDataError::SpeciesNotFound(pokedex_number))
    }

    pub fn species_by_name(&self, name: &str) -> Option<&PokemonSpecies> {
        self.species
            .values()
            .find(|record| record.name.eq_ignore_ascii_case(name))
    }

    pub fn move_data(&self, name: &str) -> MoveDataResult<&MoveData> {
        self.moves
            .get(name)
            .ok_or_else(|| MoveDataError::MoveNotFound(name.to_string()))
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }
}
