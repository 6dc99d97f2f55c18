// rule.rs - Birth and survival tables indexed by neighbor count

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Slots in a rule table. Only 0..=8 can ever be set; slot 9 stays false.
pub const RULE_SLOTS: usize = 10;

/// Highest neighbor count a cell can see.
pub const MAX_NEIGHBORS: usize = 8;

/// Maps a neighbor count to a "born" or "stays alive" flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rule([bool; RULE_SLOTS]);

impl Rule {
    /// A rule that never fires.
    pub const fn none() -> Self {
        Rule([false; RULE_SLOTS])
    }

    /// Builds a table where exactly `counts` map to true.
    pub fn from_counts(counts: &[usize]) -> Result<Self, ConfigError> {
        let mut table = [false; RULE_SLOTS];
        for &count in counts {
            if count > MAX_NEIGHBORS {
                return Err(ConfigError::NeighborCount(count));
            }
            table[count] = true;
        }
        Ok(Rule(table))
    }

    pub fn contains(&self, neighbors: usize) -> bool {
        self.0.get(neighbors).copied().unwrap_or(false)
    }

    /// The neighbor counts for which the rule fires, ascending.
    pub fn counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().enumerate().filter(|&(_, &on)| on).map(|(n, _)| n)
    }

    pub fn is_empty(&self) -> bool {
        !self.0.contains(&true)
    }
}

/// The pair of tables that defines an automaton.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rules {
    pub birth: Rule,    // applied to dead cells
    pub survival: Rule, // applied to alive cells
}

impl Rules {
    pub fn new(birth: Rule, survival: Rule) -> Self {
        Rules { birth, survival }
    }

    /// Conway's Game of Life, B3/S23.
    pub fn classic() -> Self {
        let mut birth = [false; RULE_SLOTS];
        let mut survival = [false; RULE_SLOTS];
        birth[3] = true;
        survival[2] = true;
        survival[3] = true;
        Rules { birth: Rule(birth), survival: Rule(survival) }
    }
}

impl fmt::Display for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("B")?;
        for n in self.birth.counts() {
            write!(f, "{n}")?;
        }
        f.write_str("/S")?;
        for n in self.survival.counts() {
            write!(f, "{n}")?;
        }
        Ok(())
    }
}

/// Parses `B3/S23` notation. Either half may come first; case is ignored.
impl FromStr for Rules {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let syntax = || ConfigError::RuleSyntax(s.to_string());

        let (left, right) = s.trim().split_once('/').ok_or_else(syntax)?;
        let mut birth = None;
        let mut survival = None;

        for part in [left, right] {
            let mut chars = part.trim().chars();
            let slot = match chars.next().map(|c| c.to_ascii_uppercase()) {
                Some('B') => &mut birth,
                Some('S') => &mut survival,
                _ => return Err(syntax()),
            };
            if slot.is_some() {
                return Err(syntax());
            }
            let counts = chars
                .map(|c| c.to_digit(10).map(|d| d as usize).ok_or_else(syntax))
                .collect::<Result<Vec<_>, _>>()?;
            *slot = Some(Rule::from_counts(&counts)?);
        }

        match (birth, survival) {
            (Some(birth), Some(survival)) => Ok(Rules { birth, survival }),
            _ => Err(syntax()),
        }
    }
}
