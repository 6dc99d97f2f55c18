// patterns.rs - Named seed patterns, stored as offsets from their top-left corner

use crate::grid::Grid;

pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(usize, usize)],
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "Glider",
        cells: &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
    },
    Pattern {
        name: "Blinker",
        cells: &[(0, 0), (0, 1), (0, 2)],
    },
    Pattern {
        name: "Toad",
        cells: &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
    },
    Pattern {
        name: "Beacon",
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 2), (2, 3), (3, 2), (3, 3)],
    },
    Pattern {
        name: "Pulsar",
        cells: &[
            // Top half
            (0, 2), (0, 3), (0, 4), (0, 8), (0, 9), (0, 10),
            (2, 0), (2, 5), (2, 7), (2, 12),
            (3, 0), (3, 5), (3, 7), (3, 12),
            (4, 0), (4, 5), (4, 7), (4, 12),
            (5, 2), (5, 3), (5, 4), (5, 8), (5, 9), (5, 10),
            // Bottom half (mirrored)
            (7, 2), (7, 3), (7, 4), (7, 8), (7, 9), (7, 10),
            (8, 0), (8, 5), (8, 7), (8, 12),
            (9, 0), (9, 5), (9, 7), (9, 12),
            (10, 0), (10, 5), (10, 7), (10, 12),
            (12, 2), (12, 3), (12, 4), (12, 8), (12, 9), (12, 10),
        ],
    },
    Pattern {
        name: "R-pentomino",
        cells: &[(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)],
    },
    Pattern {
        name: "Gosper Glider Gun",
        cells: &[
            (4, 0), (4, 1), (5, 0), (5, 1),
            (4, 10), (5, 10), (6, 10), (3, 11), (7, 11), (2, 12), (8, 12),
            (2, 13), (8, 13), (5, 14), (3, 15), (7, 15), (4, 16), (5, 16),
            (6, 16), (5, 17), (2, 20), (3, 20), (4, 20), (2, 21), (3, 21),
            (4, 21), (1, 22), (5, 22), (0, 24), (1, 24), (5, 24), (6, 24),
            (2, 34), (3, 34), (2, 35), (3, 35),
        ],
    },
];

/// Looks a pattern up by name, ignoring case, spaces, dashes and underscores.
pub fn find(name: &str) -> Option<&'static Pattern> {
    let key = normalize(name);
    PATTERNS.iter().find(|p| normalize(p.name) == key)
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|&c| !matches!(c, ' ' | '-' | '_'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl Pattern {
    /// Bounding box as (rows, cols).
    pub fn size(&self) -> (usize, usize) {
        self.cells.iter().fold((0, 0), |(h, w), &(r, c)| (h.max(r + 1), w.max(c + 1)))
    }

    /// Sets the pattern's cells alive with its top-left corner at
    /// `(row, col)`. Cells that fall outside the grid are dropped.
    /// Returns how many cells were newly brought to life.
    pub fn stamp(&self, grid: &mut Grid, row: usize, col: usize) -> usize {
        self.cells
            .iter()
            .filter_map(|&(r, c)| grid.set(row + r, col + c, true).ok())
            .filter(|&changed| changed)
            .count()
    }

    /// Stamps the pattern centered on the grid.
    pub fn stamp_centered(&self, grid: &mut Grid) -> usize {
        let (h, w) = self.size();
        let row = grid.rows().saturating_sub(h) / 2;
        let col = grid.cols().saturating_sub(w) / 2;
        self.stamp(grid, row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Boundary, GridConfig};

    fn blank(rows: usize, cols: usize) -> Grid {
        Grid::from_config(GridConfig {
            rows,
            cols,
            boundary: Boundary::Periodic,
            fill_probability: 0.0,
            seed: Some(0),
            ..GridConfig::default()
        })
        .unwrap()
    }

    fn alive_cells(grid: &Grid) -> Vec<(usize, usize)> {
        let cols = grid.cols();
        grid.cells()
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c)
            .map(|(idx, _)| (idx / cols, idx % cols))
            .collect()
    }

    #[test]
    fn find_is_lenient() {
        assert_eq!(find("glider").map(|p| p.name), Some("Glider"));
        assert_eq!(find("r_pentomino").map(|p| p.name), Some("R-pentomino"));
        assert_eq!(find("GosperGliderGun").map(|p| p.name), Some("Gosper Glider Gun"));
        assert!(find("spaceship").is_none());
    }

    #[test]
    fn sizes() {
        assert_eq!(find("glider").unwrap().size(), (3, 3));
        assert_eq!(find("pulsar").unwrap().size(), (13, 13));
        assert_eq!(find("gosper glider gun").unwrap().size(), (9, 36));
    }

    #[test]
    fn stamp_clips_at_edges() {
        let mut grid = blank(4, 4);
        let placed = find("beacon").unwrap().stamp(&mut grid, 2, 2);
        assert_eq!(placed, 4);
        assert_eq!(grid.alive(), 4);
        assert_eq!(alive_cells(&grid), vec![(2, 2), (2, 3), (3, 2), (3, 3)]);
    }

    #[test]
    fn glider_translates_every_four_generations() {
        let mut grid = blank(8, 8);
        find("glider").unwrap().stamp(&mut grid, 1, 1);
        let start = alive_cells(&grid);

        for _ in 0..4 {
            grid.step();
        }

        let moved: Vec<_> = start.iter().map(|&(r, c)| (r + 1, c + 1)).collect();
        assert_eq!(alive_cells(&grid), moved);
        assert_eq!(grid.alive(), 5);
    }

    #[test]
    fn glider_wraps_on_torus() {
        let mut grid = blank(6, 6);
        find("glider").unwrap().stamp_centered(&mut grid);
        // 6x6 torus: after 24 generations the glider is back where it began.
        let start = alive_cells(&grid);
        for _ in 0..24 {
            grid.step();
            assert_eq!(grid.alive(), 5);
        }
        assert_eq!(alive_cells(&grid), start);
    }

    #[test]
    fn pulsar_has_period_three() {
        let mut grid = blank(19, 19);
        find("pulsar").unwrap().stamp_centered(&mut grid);
        let start = alive_cells(&grid);
        assert_eq!(start.len(), 48);
        grid.step();
        assert_ne!(alive_cells(&grid), start);
        grid.step();
        grid.step();
        assert_eq!(alive_cells(&grid), start);
    }
}
