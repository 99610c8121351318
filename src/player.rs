use crate::battle::state::CaptureDestination;
use crate::items::Item;
use crate::pokemon::PokemonInst;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const MAX_TEAM_SIZE: usize = 6;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum PlayerAction {
    // The index refers to the move's position (0-3) in the active Pokémon's move list.
    UseMove { move_index: usize },

    // The index refers to the Pokémon's position (0-5) in the player's team.
    SwitchPokemon { team_index: usize },

    /// `target_index` is a team position; `move_index` picks the move for PP items.
    UseItem {
        item: Item,
        target_index: usize,
        move_index: Option<usize>,
    },

    Flee,

    /// Only legal once every known move is out of PP.
    Struggle,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerType {
    Human,
    /// Driven by the opponent policy at the given difficulty tier.
    Npc { ai_tier: u8 },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattlePlayer {
    // A unique identifier. For an NPC, this could be "gym_brock".
    pub player_id: String,
    pub player_name: String,
    pub player_type: PlayerType,

    // The player's team of up to 6 Pokémon, in roster order.
    pub team: Vec<PokemonInst>,

    // The index of the Pokémon in `team` that is currently active.
    pub active_pokemon_index: usize,

    pub bag: HashMap<Item, u32>,

    /// Overflow for catches made with a full team.
    pub storage: Vec<PokemonInst>,

    /// Paid to the other side when this player loses.
    pub prize_money: u32,
}

impl BattlePlayer {
    pub fn new(player_id: String, player_name: String, team: Vec<PokemonInst>) -> Self {
        Self {
            player_id,
            player_name,
            player_type: PlayerType::Human,
            team,
            active_pokemon_index: 0,
            bag: HashMap::new(),
            storage: Vec::new(),
            prize_money: 0,
        }
    }

    pub fn with_player_type(mut self, player_type: PlayerType) -> Self {
        self.player_type = player_type;
        self
    }

    pub fn with_prize_money(mut self, prize_money: u32) -> Self {
        self.prize_money = prize_money;
        self
    }

    pub fn with_item(mut self, item: Item, count: u32) -> Self {
        self.add_item(item, count);
        self
    }

    pub fn active_pokemon(&self) -> Option<&PokemonInst> {
        self.team.get(self.active_pokemon_index)
    }

    pub fn active_pokemon_mut(&mut self) -> Option<&mut PokemonInst> {
        self.team.get_mut(self.active_pokemon_index)
    }

    /// Makes `team_index` the active Pokemon. The outgoing Pokemon loses its
    /// stat stages and volatile conditions.
    pub fn switch_pokemon(&mut self, team_index: usize) {
        if let Some(outgoing) = self.active_pokemon_mut() {
            outgoing.clear_volatile_state();
        }
        self.active_pokemon_index = team_index;
    }

    pub fn first_healthy_index(&self) -> Option<usize> {
        self.team.iter().position(|p| !p.is_fainted())
    }

    /// First non-fainted team member other than the active one.
    pub fn next_healthy_reserve(&self) -> Option<usize> {
        self.team
            .iter()
            .enumerate()
            .find(|(i, p)| *i != self.active_pokemon_index && !p.is_fainted())
            .map(|(i, _)| i)
    }

    pub fn has_healthy_pokemon(&self) -> bool {
        self.team.iter().any(|p| !p.is_fainted())
    }

    pub fn add_item(&mut self, item: Item, count: u32) {
        *self.bag.entry(item).or_insert(0) += count;
    }

    pub fn item_count(&self, item: Item) -> u32 {
        self.bag.get(&item).copied().unwrap_or(0)
    }

    /// Removes one of `item` from the bag. Returns false if there was none.
    pub fn take_item(&mut self, item: Item) -> bool {
        match self.bag.get_mut(&item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    self.bag.remove(&item);
                }
                true
            }
            _ => false,
        }
    }

    /// Adds a caught Pokemon to the team, or to storage when the team is full.
    pub fn receive_pokemon(&mut self, pokemon: PokemonInst) -> CaptureDestination {
        if self.team.len() < MAX_TEAM_SIZE {
            self.team.push(pokemon);
            CaptureDestination::Party(self.team.len() - 1)
        } else {
            self.storage.push(pokemon);
            CaptureDestination::Storage(self.storage.len() - 1)
        }
    }
}
