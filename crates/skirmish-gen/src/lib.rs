//! Skirmish Gen - Deterministic skirmish log generator
//!
//! Simulates two teams fighting in a square arena and writes every spawn,
//! move, attack, damage and death as an NDJSON event record. Output is fully
//! determined by the seed, so generated logs double as replay fixtures.

mod error;
mod rng;
mod skirmish;

pub use error::{Error, Result};
pub use rng::SkirmishRng;
pub use skirmish::{GeneratorConfig, Skirmish, ATTACK_RANGE, MIN_MOVE_DISTANCE, MOVE_SPEED};
