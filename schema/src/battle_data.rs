use crate::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Global field weather. At most one is active at a time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Copy)]
pub enum Weather {
    Rain,
    Sun,
    Hail,
    Sandstorm,
}

impl Weather {
    pub const DEFAULT_DURATION: u8 = 5;

    /// Types that take no passive damage from this weather. `None` means the
    /// weather never deals damage.
    pub fn immune_types(&self) -> Option<&'static [PokemonType]> {
        match self {
            Weather::Hail => Some(&[PokemonType::Ice]),
            Weather::Sandstorm => Some(&[PokemonType::Rock, PokemonType::Ground, PokemonType::Steel]),
            Weather::Rain | Weather::Sun => None,
        }
    }

    pub fn start_message(&self) -> &'static str {
        match self {
            Weather::Rain => "It started to rain!",
            Weather::Sun => "The sunlight turned harsh!",
            Weather::Hail => "It started to hail!",
            Weather::Sandstorm => "A sandstorm kicked up!",
        }
    }

    pub fn end_message(&self) -> &'static str {
        match self {
            Weather::Rain => "The rain stopped.",
            Weather::Sun => "The sunlight faded.",
            Weather::Hail => "The hail stopped.",
            Weather::Sandstorm => "The sandstorm subsided.",
        }
    }

    pub fn damage_verb(&self) -> &'static str {
        match self {
            Weather::Hail => "is buffeted by the hail",
            Weather::Sandstorm => "is buffeted by the sandstorm",
            Weather::Rain | Weather::Sun => "is unaffected by the weather",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            Weather::Rain => "Rain",
            Weather::Sun => "Harsh Sunlight",
            Weather::Hail => "Hail",
            Weather::Sandstorm => "Sandstorm",
        };
        write!(f, "{}", display_name)
    }
}
