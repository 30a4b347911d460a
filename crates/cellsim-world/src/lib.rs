//! Grid simulation engine.
//!
//! This module implements the bounded 2D grid and the two rule sets that run
//! on it: a game-of-life variant and a predator-prey ecosystem. Both advance
//! in two phases per tick, a rule pass that stages what happens next and a
//! second pass that commits it.

pub mod grid;
pub mod life;
pub mod ecosystem;

pub use grid::{Cell, Grid};
pub use life::{Life, LifeCell};
pub use ecosystem::{
    Census, Creature, CreatureCell, CreatureKind, Ecosystem, EcosystemStats, PREDATOR_SYMBOL,
    PREY_SYMBOL,
};
