// grid.rs - The cell matrix and its evolution

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::boundary::Boundary;
use crate::error::{ConfigError, InvalidOperation};
use crate::rule::{Rule, Rules};

/// Everything needed to build a [`Grid`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    pub rules: Rules,
    pub boundary: Boundary,
    pub fill_probability: f64,  // chance for each cell to start alive
    pub seed: Option<u64>,      // None seeds from entropy
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            rules: Rules::classic(),
            boundary: Boundary::Periodic,
            fill_probability: 0.3,
            seed: None,
        }
    }
}

/// Summary of one completed evolution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation {
    pub step: u64,
    pub alive: usize,
    pub births: usize,
    pub deaths: usize,
}

/// A fixed-size board of boolean cells.
///
/// `alive` is maintained incrementally by every mutation and always equals
/// the number of live cells in `cells`.
#[derive(Debug, Clone)]
pub struct Grid {
    cells     : Vec<bool>,  // row-major, rows * cols
    next      : Vec<bool>,  // back buffer for step()
    rows      : usize,
    cols      : usize,
    alive     : usize,
    steps     : u64,
    boundary  : Boundary,
    rules     : Rules,
    rng       : StdRng,
}

impl Grid {
    /// Builds a grid where each cell is independently alive with
    /// probability `fill_probability`.
    pub fn new(
        rows: usize,
        cols: usize,
        birth: Rule,
        survival: Rule,
        boundary: Boundary,
        fill_probability: f64,
    ) -> Result<Self, ConfigError> {
        Self::from_config(GridConfig {
            rows,
            cols,
            rules: Rules::new(birth, survival),
            boundary,
            fill_probability,
            seed: None,
        })
    }

    pub fn from_config(config: GridConfig) -> Result<Self, ConfigError> {
        let GridConfig { rows, cols, rules, boundary, fill_probability, seed } = config;

        if rows == 0 || cols == 0 {
            return Err(ConfigError::ZeroDimension { rows, cols });
        }
        if !(0.0..=1.0).contains(&fill_probability) {
            return Err(ConfigError::FillProbability(fill_probability));
        }

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let cells: Vec<bool> = (0..rows * cols)
            .map(|_| rng.gen_bool(fill_probability))
            .collect();
        let alive = cells.iter().filter(|&&c| c).count();

        debug!(rows, cols, alive, %boundary, %rules, "grid created");

        Ok(Self {
            next: vec![false; cells.len()],
            cells,
            rows,
            cols,
            alive,
            steps: 0,
            boundary,
            rules,
            rng,
        })
    }

    pub fn rows(&self) -> usize { self.rows }
    pub fn cols(&self) -> usize { self.cols }
    pub fn dimensions(&self) -> (usize, usize) { (self.rows, self.cols) }
    pub fn alive(&self) -> usize { self.alive }
    pub fn steps(&self) -> u64 { self.steps }
    pub fn rules(&self) -> Rules { self.rules }
    pub fn boundary(&self) -> Boundary { self.boundary }

    pub fn set_boundary(&mut self, boundary: Boundary) {
        self.boundary = boundary;
    }

    /// The committed cells, row-major.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.cols)
    }

    /// In-bounds lookup only; `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Boundary-aware lookup for any signed coordinate.
    pub fn cell(&self, i: isize, j: isize) -> bool {
        let (rows, cols) = (self.rows as isize, self.cols as isize);
        if (0..rows).contains(&i) && (0..cols).contains(&j) {
            return self.cells[i as usize * self.cols + j as usize];
        }

        match self.boundary {
            Boundary::Empty => false,
            Boundary::Full => true,
            Boundary::Periodic => {
                let r = i.rem_euclid(rows) as usize;
                let c = j.rem_euclid(cols) as usize;
                self.cells[r * self.cols + c]
            }
        }
    }

    /// Live cells among the eight surrounding `(i, j)`.
    pub fn neighbors(&self, i: isize, j: isize) -> usize {
        let mut count = 0;
        for di in -1..=1 {
            for dj in -1..=1 {
                if self.cell(i + di, j + dj) { count += 1; }
            }
        }
        if self.cell(i, j) { count -= 1; }
        count
    }

    /// Advances one generation. Every transition reads the previous
    /// generation; the result is built in the back buffer and swapped in.
    pub fn step(&mut self) -> Generation {
        self.steps += 1;

        let mut next = std::mem::take(&mut self.next);
        let mut births = 0;
        let mut deaths = 0;

        for row in 0..self.rows {
            for col in 0..self.cols {
                let idx = row * self.cols + col;
                let alive = self.cells[idx];
                let n = self.neighbors(row as isize, col as isize);

                next[idx] = match alive {
                    true if !self.rules.survival.contains(n) => { deaths += 1; false }
                    false if self.rules.birth.contains(n)    => { births += 1; true }
                    unchanged => unchanged,
                };
            }
        }

        self.alive = self.alive + births - deaths;
        self.next = std::mem::replace(&mut self.cells, next);

        Generation { step: self.steps, alive: self.alive, births, deaths }
    }

    /// Flips one cell and returns its new state.
    pub fn toggle(&mut self, row: usize, col: usize) -> Result<bool, InvalidOperation> {
        let idx = self.index(row, col).ok_or(InvalidOperation::OutOfBounds { row, col })?;
        let now = !self.cells[idx];
        self.write(idx, now);
        Ok(now)
    }

    /// Forces one cell to `alive`; returns whether it changed.
    pub fn set(&mut self, row: usize, col: usize, alive: bool) -> Result<bool, InvalidOperation> {
        let idx = self.index(row, col).ok_or(InvalidOperation::OutOfBounds { row, col })?;
        let changed = self.cells[idx] != alive;
        if changed {
            self.write(idx, alive);
        }
        Ok(changed)
    }

    /// Brings `fraction` of the currently dead cells to life, chosen
    /// uniformly. Returns how many were flipped.
    pub fn fill(&mut self, fraction: f64) -> usize {
        self.flip_fraction(false, fraction)
    }

    /// Kills `fraction` of the currently alive cells, chosen uniformly.
    /// Returns how many were flipped.
    pub fn clear(&mut self, fraction: f64) -> usize {
        self.flip_fraction(true, fraction)
    }

    fn flip_fraction(&mut self, from: bool, fraction: f64) -> usize {
        let candidates: Vec<usize> = self.cells.iter()
            .enumerate()
            .filter(|&(_, &c)| c == from)
            .map(|(idx, _)| idx)
            .collect();

        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        let amount = ((candidates.len() as f64) * fraction).round() as usize;

        for pick in index::sample(&mut self.rng, candidates.len(), amount) {
            self.write(candidates[pick], !from);
        }
        debug!(from, amount, alive = self.alive, "flipped cells");
        amount
    }

    fn write(&mut self, idx: usize, alive: bool) {
        if self.cells[idx] == alive { return; }
        self.cells[idx] = alive;
        if alive { self.alive += 1 } else { self.alive -= 1 }
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }
}

/// The field plus a one-cell halo resolved through the boundary policy.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = (self.rows as isize, self.cols as isize);
        for i in -1..=rows {
            for j in -1..=cols {
                if j > -1 { f.write_str(" ")?; }
                f.write_str(if self.cell(i, j) { "x" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
