pub mod action_stack;
pub mod ai;
pub mod calculators;
pub mod catch;
pub mod engine;
pub mod move_effects;
pub mod session;
pub mod state;
pub mod stats;
pub mod validation;

#[cfg(test)]
pub(crate) mod tests;
