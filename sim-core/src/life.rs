//! Conway's Game of Life on a toroidal grid.

use crate::error::{Error, Result};
use rand::Rng;

/// Row-major boolean grid whose edges wrap around.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

/// A cell whose state differs between two generations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellChange {
    pub row: usize,
    pub col: usize,
    pub alive: bool,
}

impl Grid {
    /// All-dead grid. Zero-sized dimensions are rejected.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyGrid);
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        })
    }

    /// Builds a grid from rows of `0`/non-zero values.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let expected = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut grid = Self::new(rows.len(), expected)?;
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != expected {
                return Err(Error::RaggedGrid {
                    row: r,
                    expected,
                    found: row.len(),
                });
            }
            for (c, &v) in row.iter().enumerate() {
                grid.set(r, c, v != 0);
            }
        }
        Ok(grid)
    }

    /// Each cell is alive with probability `density`.
    pub fn random(rows: usize, cols: usize, density: f64, rng: &mut impl Rng) -> Result<Self> {
        if !(0.0..=1.0).contains(&density) {
            return Err(Error::invalid(
                "life.density",
                format!("{density} is outside [0, 1]"),
            ));
        }
        let mut grid = Self::new(rows, cols)?;
        for cell in &mut grid.cells {
            *cell = rng.random_bool(density);
        }
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, alive: bool) {
        self.cells[row * self.cols + col] = alive;
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Live cells among the 8 surrounding cells, wrapping at the edges.
    ///
    /// On grids narrower than 3 a neighbour may be visited more than
    /// once through the wraparound; it is counted every time.
    pub fn live_neighbors(&self, row: usize, col: usize) -> u8 {
        let mut n = 0;
        for dr in [self.rows - 1, 0, 1] {
            for dc in [self.cols - 1, 0, 1] {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let r = (row + dr) % self.rows;
                let c = (col + dc) % self.cols;
                n += self.get(r, c) as u8;
            }
        }
        n
    }

    /// Next generation under the B3/S23 rule.
    pub fn step(&self) -> Grid {
        let mut next = self.clone();
        for r in 0..self.rows {
            for c in 0..self.cols {
                let n = self.live_neighbors(r, c);
                let alive = match (self.get(r, c), n) {
                    (true, 2) | (true, 3) => true,
                    (false, 3) => true,
                    _ => false,
                };
                next.set(r, c, alive);
            }
        }
        next
    }

    /// Cells whose state differs in `next`, in row-major order.
    ///
    /// # Panics
    /// If the grids have different dimensions.
    pub fn changes(&self, next: &Grid) -> Vec<CellChange> {
        assert_eq!((self.rows, self.cols), (next.rows, next.cols));
        self.cells
            .iter()
            .zip(&next.cells)
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, (_, &alive))| CellChange {
                row: i / self.cols,
                col: i % self.cols,
                alive,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn lone_cell_dies() {
        let mut g = Grid::new(5, 5).unwrap();
        g.set(2, 2, true);
        let next = g.step();
        assert_eq!(next.population(), 0);
    }

    #[test]
    fn block_is_a_still_life() {
        let g = Grid::from_rows(&[
            [0u8, 0, 0, 0],
            [0, 1, 1, 0],
            [0, 1, 1, 0],
            [0, 0, 0, 0],
        ])
        .unwrap();
        assert_eq!(g.step(), g);
    }

    #[test]
    fn blinker_oscillates_with_period_two() {
        let g = Grid::from_rows(&[
            [0u8, 0, 0, 0, 0],
            [0, 0, 1, 0, 0],
            [0, 0, 1, 0, 0],
            [0, 0, 1, 0, 0],
            [0, 0, 0, 0, 0],
        ])
        .unwrap();
        let once = g.step();
        assert!(once.get(2, 1) && once.get(2, 2) && once.get(2, 3));
        assert_eq!(once.population(), 3);
        assert_eq!(once.step(), g);
    }

    #[test]
    fn neighbors_wrap_around_edges() {
        let mut g = Grid::new(4, 4).unwrap();
        g.set(0, 0, true);
        g.set(3, 3, true);
        g.set(0, 3, true);
        assert_eq!(g.live_neighbors(0, 0), 2);
        assert_eq!(g.live_neighbors(3, 0), 3);
    }

    #[test]
    fn birth_across_the_seam() {
        // Three live cells in the last column border (1, 0) through the wrap.
        let mut g = Grid::new(4, 4).unwrap();
        g.set(0, 3, true);
        g.set(1, 3, true);
        g.set(2, 3, true);
        assert!(g.step().get(1, 0));
    }

    #[test]
    fn changes_lists_only_flipped_cells() {
        let mut g = Grid::new(3, 3).unwrap();
        g.set(1, 1, true);
        let next = g.step();
        assert_eq!(
            g.changes(&next),
            vec![CellChange {
                row: 1,
                col: 1,
                alive: false
            }]
        );
    }

    #[test]
    fn rejects_empty_and_ragged_rows() {
        let empty: [[u8; 0]; 0] = [];
        assert!(matches!(Grid::from_rows(&empty), Err(Error::EmptyGrid)));

        let ragged: [&[u8]; 2] = [&[1, 0, 1], &[1, 0]];
        assert!(matches!(
            Grid::from_rows(&ragged),
            Err(Error::RaggedGrid {
                row: 1,
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn random_grid_is_reproducible_and_respects_density() {
        let grid = |seed| Grid::random(30, 30, 0.3, &mut StdRng::seed_from_u64(seed));
        let a = grid(123).unwrap();
        let b = grid(123).unwrap();
        assert_eq!(a, b);
        let pop = a.population();
        assert!(pop > 150 && pop < 400, "population {pop}");

        let mut rng = StdRng::seed_from_u64(0);
        assert!(Grid::random(3, 3, 1.5, &mut rng).is_err());
    }
}
