//! Error types for the simulation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid grid dimensions {width}x{height}: both must be positive")]
    InvalidDimension { width: i32, height: i32 },

    #[error("coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    #[error("cell ({x}, {y}) already holds a creature")]
    OccupancyViolation { x: i32, y: i32 },
}
