//! RON battle descriptions: who fights, with what, under which rules.

use crate::battle::session::BattleSession;
use crate::battle::state::{BattleKind, TurnRng};
use crate::catalog::Catalog;
use crate::errors::{BattleResult, ConfigError};
use crate::items::Item;
use crate::player::{BattlePlayer, PlayerType};
use crate::pokemon::{PokemonBuilder, PokemonInst};
use rand::rngs::StdRng;
use rand::SeedableRng;
use schema::Nature;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// The battle the demo binary plays when no config file is given.
pub const DEFAULT_CONFIG: &str = include_str!("../demos/rival_battle.ron");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Seeds both creature generation and the battle RNG.
    #[serde(default)]
    pub seed: Option<u64>,
    pub kind: BattleKind,
    /// Overrides the kind's default difficulty for the opponent.
    #[serde(default)]
    pub ai_tier: Option<u8>,
    pub player: TrainerConfig,
    pub opponent: TrainerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    pub name: String,
    pub team: Vec<PokemonConfig>,
    #[serde(default)]
    pub bag: HashMap<Item, u32>,
    #[serde(default)]
    pub prize_money: u32,
}

/// One roster entry. Anything left out is rolled or taken from the learnset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonConfig {
    pub species: u16,
    pub level: u8,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub ivs: Option<[u8; 6]>,
    #[serde(default)]
    pub evs: Option<[u8; 6]>,
    #[serde(default)]
    pub nature: Option<Nature>,
    #[serde(default)]
    pub moves: Option<Vec<String>>,
}

impl PokemonConfig {
    fn build(&self, catalog: &Catalog, rng: &mut StdRng) -> BattleResult<PokemonInst> {
        let mut builder = PokemonBuilder::new(self.species, self.level);
        if let Some(nickname) = &self.nickname {
            builder = builder.nickname(nickname.clone());
        }
        if let Some(ivs) = self.ivs {
            builder = builder.ivs(ivs);
        }
        if let Some(evs) = self.evs {
            builder = builder.evs(evs);
        }
        if let Some(nature) = self.nature {
            builder = builder.nature(nature);
        }
        if let Some(moves) = &self.moves {
            builder = builder.moves(moves.iter().cloned());
        }
        builder.build(catalog, rng)
    }
}

impl TrainerConfig {
    fn build_player(
        &self,
        player_id: &str,
        player_type: PlayerType,
        catalog: &Catalog,
        rng: &mut StdRng,
    ) -> BattleResult<BattlePlayer> {
        let team = self
            .team
            .iter()
            .map(|entry| entry.build(catalog, rng))
            .collect::<BattleResult<Vec<_>>>()?;

        let mut player = BattlePlayer::new(player_id.to_string(), self.name.clone(), team)
            .with_player_type(player_type)
            .with_prize_money(self.prize_money);
        for (item, count) in &self.bag {
            player.add_item(*item, *count);
        }
        Ok(player)
    }
}

impl BattleConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    pub fn default_demo() -> Result<Self, ConfigError> {
        Self::from_ron_str(DEFAULT_CONFIG)
    }

    /// Builds every creature through the catalog and returns an unstarted session.
    pub fn build_session(&self, catalog: &Arc<Catalog>) -> BattleResult<BattleSession> {
        let mut creature_rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let opponent_tier = self.ai_tier.unwrap_or(self.kind.default_ai_tier());

        let player = self
            .player
            .build_player("player", PlayerType::Human, catalog, &mut creature_rng)?;
        let opponent = self.opponent.build_player(
            "opponent",
            PlayerType::Npc {
                ai_tier: opponent_tier,
            },
            catalog,
            &mut creature_rng,
        )?;
        debug!(kind = %self.kind, opponent_tier, seed = ?self.seed, "session configured");

        let rng = match self.seed {
            Some(seed) => TurnRng::from_seed(seed),
            None => TurnRng::new_random(),
        };
        BattleSession::new(Arc::clone(catalog), self.kind, player, opponent, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::test_catalog;
    use crate::errors::{BattleEngineError, BattleStateError, SpeciesDataError};
    use pretty_assertions::assert_eq;

    const WILD: &str = r#"(
        seed: Some(7),
        kind: Wild,
        player: (
            name: "Red",
            team: [(species: 25, level: 12, moves: Some(["Thunder Shock", "Quick Attack"]))],
            bag: {PokeBall: 3, Potion: 1},
        ),
        opponent: (
            name: "Wild",
            team: [(species: 16, level: 5)],
        ),
    )"#;

    #[test]
    fn parses_and_builds_a_wild_session() {
        let config = BattleConfig::from_ron_str(WILD).unwrap();
        assert_eq!(config.kind, BattleKind::Wild);
        assert_eq!(config.player.bag.get(&Item::PokeBall), Some(&3));

        let session = config.build_session(&test_catalog()).unwrap();
        let player = &session.state().players[0];
        assert_eq!(player.team[0].name, "Pikachu");
        assert_eq!(player.team[0].moves.len(), 2);
        assert_eq!(
            session.state().players[1].player_type,
            PlayerType::Npc { ai_tier: 1 }
        );
    }

    #[test]
    fn same_seed_builds_the_same_rosters() {
        let config = BattleConfig::from_ron_str(WILD).unwrap();
        let a = config.build_session(&test_catalog()).unwrap().into_players();
        let b = config.build_session(&test_catalog()).unwrap().into_players();
        assert_eq!(a[1].team, b[1].team);
    }

    #[test]
    fn unknown_species_is_a_catalog_error() {
        let text = WILD.replace("species: 16", "species: 999");
        let config = BattleConfig::from_ron_str(&text).unwrap();
        let err = config.build_session(&test_catalog()).unwrap_err();
        assert!(matches!(
            err,
            BattleEngineError::SpeciesData(SpeciesDataError::SpeciesNotFound(999))
        ));
    }

    #[test]
    fn empty_team_is_rejected() {
        let text = WILD.replace("team: [(species: 16, level: 5)]", "team: []");
        let config = BattleConfig::from_ron_str(&text).unwrap();
        let err = config.build_session(&test_catalog()).unwrap_err();
        assert!(matches!(
            err,
            BattleEngineError::BattleState(BattleStateError::EmptyRoster(_))
        ));
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        let err = BattleConfig::from_ron_str("(kind: Wild").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn bundled_demo_parses() {
        let config = BattleConfig::default_demo().unwrap();
        assert_eq!(config.kind, BattleKind::Trainer);
        assert!(config.build_session(&test_catalog()).is_ok());
    }
}
