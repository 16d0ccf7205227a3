//! Maze generation by randomized depth-first carving, plus the escape game
//! played on top of it.
//!
//! The grid is row-major. Cells at odd coordinates form the carving lattice;
//! the cell between two lattice neighbours is the wall that gets knocked out
//! when the carver moves between them. The result is a perfect maze: a
//! spanning tree over the lattice with no cycles and no isolated pockets.
use std::collections::VecDeque;

use rand::Rng;
use serde::Serialize;

use crate::error::{ArcadeError, Result};
use crate::grid::GridPos;

mod session;

pub use session::{MazeConfig, MazeEvent, MazeGame, MazeSnapshot, MazeStatus};

/// Smallest lattice the generator accepts on either axis.
pub const MIN_DIMENSION: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    Wall,
    Open,
}

#[derive(Clone, Debug)]
pub struct Maze {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Maze {
    /// Carve a perfect maze starting from (1,1). Both dimensions must be odd.
    pub fn generate<R: Rng + ?Sized>(cols: usize, rows: usize, rng: &mut R) -> Result<Self> {
        if cols < MIN_DIMENSION || rows < MIN_DIMENSION || cols % 2 == 0 || rows % 2 == 0 {
            return Err(ArcadeError::InvalidMazeSize { cols, rows });
        }

        let mut maze = Maze {
            cols,
            rows,
            cells: vec![Cell::Wall; cols * rows],
        };
        let mut visited = vec![false; cols * rows];
        let mut stack: Vec<(usize, usize)> = Vec::new();

        let start = (1, 1);
        maze.open(start.0, start.1);
        visited[start.1 * cols + start.0] = true;
        stack.push(start);

        while let Some(&(col, row)) = stack.last() {
            let neighbors = maze.unvisited_neighbors(col, row, &visited);
            if neighbors.is_empty() {
                stack.pop();
                continue;
            }
            let (next_col, next_row) = neighbors[rng.gen_range(0..neighbors.len())];
            // wall sits halfway between the two lattice cells
            maze.open((col + next_col) / 2, (row + next_row) / 2);
            maze.open(next_col, next_row);
            visited[next_row * cols + next_col] = true;
            stack.push((next_col, next_row));
        }

        Ok(maze)
    }

    fn unvisited_neighbors(&self, col: usize, row: usize, visited: &[bool]) -> Vec<(usize, usize)> {
        let (col, row) = (col as isize, row as isize);
        [(0, -2), (0, 2), (-2, 0), (2, 0)]
            .into_iter()
            .map(|(dc, dr)| (col + dc, row + dr))
            .filter(|&(c, r)| {
                c > 0 && r > 0 && c < self.cols as isize - 1 && r < self.rows as isize - 1
            })
            .map(|(c, r)| (c as usize, r as usize))
            .filter(|&(c, r)| !visited[r * self.cols + c])
            .collect()
    }

    fn open(&mut self, col: usize, row: usize) {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = Cell::Open;
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell(&self, col: usize, row: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    /// Out-of-bounds positions count as walls.
    pub fn is_open(&self, pos: GridPos) -> bool {
        pos.in_bounds(self.cols as i32, self.rows as i32)
            && self.cells[pos.index(self.cols as i32)] == Cell::Open
    }

    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Open).count()
    }

    /// Number of open cells reachable from `start` through 4-connected moves.
    pub fn reachable_from(&self, start: GridPos) -> usize {
        if !self.is_open(start) {
            return 0;
        }
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::from([start]);
        seen[start.index(self.cols as i32)] = true;
        let mut count = 0;
        while let Some(pos) = queue.pop_front() {
            count += 1;
            for (dc, dr) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
                let next = GridPos::new(pos.col + dc, pos.row + dr);
                if self.is_open(next) {
                    let idx = next.index(self.cols as i32);
                    if !seen[idx] {
                        seen[idx] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        count
    }

    /// Shortest path length in moves between two open cells.
    pub fn path_length(&self, from: GridPos, to: GridPos) -> Option<usize> {
        if !self.is_open(from) || !self.is_open(to) {
            return None;
        }
        let mut dist = vec![usize::MAX; self.cells.len()];
        let mut queue = VecDeque::from([from]);
        dist[from.index(self.cols as i32)] = 0;
        while let Some(pos) = queue.pop_front() {
            let d = dist[pos.index(self.cols as i32)];
            if pos == to {
                return Some(d);
            }
            for (dc, dr) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
                let next = GridPos::new(pos.col + dc, pos.row + dr);
                if self.is_open(next) && dist[next.index(self.cols as i32)] == usize::MAX {
                    dist[next.index(self.cols as i32)] = d + 1;
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Rows of `#` (wall) and `.` (open), handy for logs and test failures.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                out.push(match self.cell(col, row) {
                    Cell::Wall => '#',
                    Cell::Open => '.',
                });
            }
            out.push('\n');
        }
        out
    }
}

/// Grid size for a play area of `width` x `height` pixels: about ten pixels
/// per tile, odd on both axes, never below 15. Returns `(cols, rows, tile)`.
pub fn fit_dimensions(width: f64, height: f64) -> (usize, usize, f64) {
    let mut cols = (width / 10.0).floor().max(0.0) as usize;
    if cols % 2 == 0 {
        cols = cols.saturating_sub(1);
    }
    let cols = cols.max(15);
    let tile = width / cols as f64;

    let mut rows = if tile > 0.0 {
        (height / tile).floor().max(0.0) as usize
    } else {
        0
    };
    if rows % 2 == 0 {
        rows = rows.saturating_sub(1);
    }
    (cols, rows.max(15), tile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn lattice_cells(cols: usize, rows: usize) -> usize {
        (cols / 2) * (rows / 2)
    }

    #[test]
    fn rejects_even_or_tiny_dimensions() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            Maze::generate(20, 15, &mut rng),
            Err(ArcadeError::InvalidMazeSize { cols: 20, rows: 15 })
        ));
        assert!(Maze::generate(21, 14, &mut rng).is_err());
        assert!(Maze::generate(3, 3, &mut rng).is_err());
    }

    #[test]
    fn scenario_21x15_start_reaches_goal() {
        let mut rng = StdRng::seed_from_u64(2024);
        let maze = Maze::generate(21, 15, &mut rng).unwrap();
        let start = GridPos::new(21 - 2, 15 - 2);
        let goal = GridPos::new(1, 1);
        assert!(maze.is_open(start));
        assert!(maze.is_open(goal));
        assert_eq!(maze.reachable_from(start), maze.open_count());
        assert!(maze.path_length(start, goal).is_some());
    }

    #[test]
    fn every_open_cell_is_reachable_for_many_seeds() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let cols = 5 + 2 * (seed as usize % 9);
            let rows = 5 + 2 * (seed as usize % 7);
            let maze = Maze::generate(cols, rows, &mut rng).unwrap();
            assert_eq!(
                maze.reachable_from(GridPos::new(1, 1)),
                maze.open_count(),
                "disconnected maze for seed {seed}:\n{}",
                maze.render_ascii()
            );
        }
    }

    #[test]
    fn carving_forms_a_spanning_tree() {
        let mut rng = StdRng::seed_from_u64(7);
        let maze = Maze::generate(31, 21, &mut rng).unwrap();
        let lattice = lattice_cells(31, 21);
        // every lattice cell plus one wall per tree edge
        assert_eq!(maze.open_count(), 2 * lattice - 1);
        for col in (1..31).step_by(2) {
            for row in (1..21).step_by(2) {
                assert_eq!(maze.cell(col, row), Cell::Open);
            }
        }
    }

    #[test]
    fn border_stays_solid() {
        let mut rng = StdRng::seed_from_u64(11);
        let maze = Maze::generate(15, 15, &mut rng).unwrap();
        for i in 0..15 {
            assert_eq!(maze.cell(i, 0), Cell::Wall);
            assert_eq!(maze.cell(i, 14), Cell::Wall);
            assert_eq!(maze.cell(0, i), Cell::Wall);
            assert_eq!(maze.cell(14, i), Cell::Wall);
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let a = Maze::generate(25, 17, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = Maze::generate(25, 17, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a.render_ascii(), b.render_ascii());
    }

    #[test]
    fn fit_dimensions_keeps_odd_minimums() {
        assert_eq!(fit_dimensions(320.0, 240.0).0, 31);
        let (cols, rows, tile) = fit_dimensions(320.0, 240.0);
        assert!((tile - 320.0 / 31.0).abs() < 1e-9);
        assert_eq!(rows % 2, 1);
        assert_eq!(cols % 2, 1);
        assert_eq!(fit_dimensions(50.0, 40.0), (15, 15, 50.0 / 15.0));
    }
}
