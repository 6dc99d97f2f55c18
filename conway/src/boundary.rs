// boundary.rs - Policies for resolving lookups outside the grid

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// How a lookup outside `[0, rows) x [0, cols)` is answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// Coordinates wrap around on both axes (torus).
    #[default]
    Periodic,
    /// Everything outside is dead.
    Empty,
    /// Everything outside is alive.
    Full,
}

impl Boundary {
    pub const ALL: [Boundary; 3] = [Boundary::Periodic, Boundary::Empty, Boundary::Full];

    pub fn name(self) -> &'static str {
        match self {
            Boundary::Periodic => "periodic",
            Boundary::Empty    => "empty",
            Boundary::Full     => "full",
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the names and the numeric codes of the old `-border` flag.
impl FromStr for Boundary {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "periodic" | "0" => Ok(Boundary::Periodic),
            "empty"    | "1" => Ok(Boundary::Empty),
            "full"     | "2" => Ok(Boundary::Full),
            _ => Err(ConfigError::UnknownBoundary(s.to_string())),
        }
    }
}
