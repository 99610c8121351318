use crate::battle::state::Side;
use crate::items::Item;
use thiserror::Error;

/// Main error type for the battle engine
#[derive(Debug, Error)]
pub enum BattleEngineError {
    /// Error related to move data lookup or processing
    #[error("Move data error: {0}")]
    MoveData(#[from] MoveDataError),
    /// Error related to species data lookup or processing
    #[error("Species data error: {0}")]
    SpeciesData(#[from] SpeciesDataError),
    /// Error related to invalid battle state
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    /// Error related to invalid player actions
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    /// Error loading a battle configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to move data operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveDataError {
    /// The specified move was not found in the catalog
    #[error("Move not found: {0}")]
    MoveNotFound(String),
    /// Move table could not be parsed
    #[error("Malformed move data: {0}")]
    MalformedData(String),
}

/// Errors related to species data operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeciesDataError {
    /// The specified species was not found in the catalog
    #[error("Species not found: #{0}")]
    SpeciesNotFound(u16),
    #[error("Invalid level {0}, expected 1-100")]
    InvalidLevel(u8),
    /// Neither the learnset nor the caller supplied a usable move
    #[error("{0} would know no moves at this level")]
    EmptyMoveset(String),
    #[error("{species} cannot know more than four moves (got {count})")]
    TooManyMoves { species: String, count: usize },
    /// Species table could not be parsed
    #[error("Malformed species data: {0}")]
    MalformedData(String),
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    #[error("{0} has an empty roster")]
    EmptyRoster(Side),
    #[error("{side} roster holds {size} Pokemon, the limit is 6")]
    RosterTooLarge { side: Side, size: usize },
    #[error("{0} has no Pokemon able to battle")]
    NoHealthyPokemon(Side),
    #[error("The battle has not started")]
    NotStarted,
    #[error("The battle has already started")]
    AlreadyStarted,
    #[error("The battle is already over")]
    BattleOver,
    /// Both sides must have a pending action before the turn resolves
    #[error("Waiting on an action from {0}")]
    AwaitingAction(Side),
}

/// Errors related to player actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Move index is out of bounds
    #[error("No move in slot {0}")]
    InvalidMoveIndex(usize),
    #[error("The move in slot {0} has no PP left")]
    NoPpRemaining(usize),
    /// Pokemon index is out of bounds
    #[error("No Pokemon at roster index {0}")]
    InvalidPokemonIndex(usize),
    #[error("The Pokemon at roster index {0} has fainted")]
    SwitchToFainted(usize),
    #[error("The Pokemon at roster index {0} is already in battle")]
    SwitchToActive(usize),
    #[error("Struggle is only available when no move has PP")]
    StruggleNotNeeded,
    #[error("There's no running from a trainer battle!")]
    FleeNotAllowed,
    #[error("You can't catch a trainer's Pokemon!")]
    CaptureNotAllowed,
    #[error("No {0} left in the bag")]
    ItemNotInBag(Item),
    #[error("{0} can't be used in battle")]
    ItemNotUsableInBattle(Item),
    #[error("{0} has already chosen an action")]
    ActionAlreadyPending(Side),
    #[error("The battle is not accepting actions")]
    NotAcceptingActions,
}

/// Errors raised while loading a battle configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Convenience type alias for Results with BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Convenience type alias for move data operations
pub type MoveDataResult<T> = Result<T, MoveDataError>;

/// Convenience type alias for species data operations
pub type SpeciesDataResult<T> = Result<T, SpeciesDataError>;
