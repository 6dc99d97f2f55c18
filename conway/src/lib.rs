// lib.rs - Game of Life engine with arbitrary birth/survival rules
//
// `Grid` owns the cells and evolves them one generation at a time;
// `Runner` steps a shared grid on a timer from a background tokio task.

pub mod boundary;
pub mod error;
pub mod grid;
pub mod patterns;
pub mod rule;
pub mod runner;

pub use boundary::Boundary;
pub use error::{ConfigError, InvalidOperation};
pub use grid::{Generation, Grid, GridConfig};
pub use patterns::{Pattern, PATTERNS};
pub use rule::{Rule, Rules};
pub use runner::{Runner, SharedGrid};
