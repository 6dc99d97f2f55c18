// error.rs - Error kinds reported by the engine and the run controller

use thiserror::Error;

/// Invalid construction parameters. Fatal to the construction attempt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    ZeroDimension { rows: usize, cols: usize },

    #[error("neighbor count {0} is outside 0..=8")]
    NeighborCount(usize),

    #[error("fill probability {0} is outside 0..=1")]
    FillProbability(f64),

    #[error("invalid rule notation {0:?}, expected something like B3/S23")]
    RuleSyntax(String),

    #[error("unknown boundary condition {0:?}, expected periodic, empty or full")]
    UnknownBoundary(String),
}

/// A request the current state cannot honour. Reported, never fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidOperation {
    #[error("already running")]
    AlreadyRunning,

    #[error("not running")]
    NotRunning,

    #[error("not allowed while running")]
    Running,

    #[error("cell ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },

    #[error("speed factor {0} must be finite and positive")]
    SpeedFactor(f64),
}
