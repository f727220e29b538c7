//! # Maze Carving
//!
//! Randomized depth-first corridor carving on an odd-sided tree grid.
//!
//! The carver walks a lattice with step 2, knocking out the wall cell between
//! two corridor cells, and widens each segment with a perpendicular band. A
//! braiding pass afterwards turns some walls into shortcuts so the result is
//! not a strict tree.

use crate::game::{ChunkGrid, LocalCoord, Tile};
use crate::GenerationConfig;
use rand::seq::SliceRandom;
use rand::Rng;

const STEPS: [(i32, i32); 4] = [(2, 0), (0, 2), (-2, 0), (0, -2)];
const ORTHOGONAL: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Counters describing one carving run.
///
/// `path_cells` is the carver's running estimate (2 per corridor step, 1 per
/// braid), not an exact count of grass tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarveReport {
    pub path_cells: usize,
    pub target_path_cells: usize,
}

impl CarveReport {
    /// Whether the carver hit its target before running out of moves.
    pub fn reached_target(&self) -> bool {
        self.path_cells >= self.target_path_cells
    }
}

/// Carves maze corridors into a chunk grid.
#[derive(Debug, Clone)]
pub struct MazeCarver {
    /// Inclusive range of corridor widths
    pub path_width_range: (u32, u32),
    /// Attempts made by the braiding pass
    pub extra_path_attempts: u32,
}

impl MazeCarver {
    pub fn new(path_width_range: (u32, u32), extra_path_attempts: u32) -> Self {
        Self {
            path_width_range,
            extra_path_attempts,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.path_width_range, config.extra_path_attempts)
    }

    /// A corridor width drawn from `path_width_range`.
    pub fn random_width<R: Rng>(&self, rng: &mut R) -> u32 {
        let (min_width, max_width) = self.path_width_range;
        rng.gen_range(min_width..=max_width.max(min_width))
    }

    /// Carves corridors outward from `start` until about half the grid is grass.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::SeedableRng;
    /// use thicket::{ChunkGrid, LocalCoord, MazeCarver, Tile};
    ///
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(3);
    /// let mut grid = ChunkGrid::filled(11, Tile::Tree { variant: 0 });
    /// let carver = MazeCarver::new((1, 2), 200);
    ///
    /// carver.carve(&mut grid, LocalCoord::new(5, 5), &mut rng);
    /// assert_eq!(grid.get(5, 5), Some(Tile::Grass));
    /// ```
    pub fn carve<R: Rng>(&self, grid: &mut ChunkGrid, start: LocalCoord, rng: &mut R) -> CarveReport {
        let size = grid.size();
        let (start_x, start_y) = (start.x as i32, start.y as i32);

        let blob_width = self.random_width(rng).max(1);
        carve_square(grid, start_x, start_y, blob_width);

        let mut stack = vec![(start_x, start_y)];
        let mut directions = STEPS;
        let mut path_cells = 1;
        let target_path_cells = size * size / 2;

        while path_cells < target_path_cells {
            let Some(&(x, y)) = stack.last() else {
                break;
            };
            directions.shuffle(rng);

            let next = directions
                .iter()
                .map(|(dx, dy)| (x + dx, y + dy))
                .find(|&(nx, ny)| grid.in_bounds(nx, ny) && grid.is_tree(nx, ny));

            match next {
                Some((nx, ny)) => {
                    let width = self.random_width(rng);
                    carve_between(grid, (x, y), (nx, ny), width);
                    path_cells += 2;
                    stack.push((nx, ny));
                }
                None => {
                    stack.pop();
                }
            }
        }

        path_cells = self.add_extra_paths(grid, path_cells, target_path_cells, rng);

        CarveReport {
            path_cells,
            target_path_cells,
        }
    }

    /// Braids the maze: random interior walls with at least two grass
    /// neighbours become grass. Returns the updated counter.
    pub fn add_extra_paths<R: Rng>(
        &self,
        grid: &mut ChunkGrid,
        mut path_cells: usize,
        target_path_cells: usize,
        rng: &mut R,
    ) -> usize {
        let size = grid.size() as i32;
        if size < 3 {
            return path_cells;
        }

        let mut attempts = 0;
        while path_cells < target_path_cells && attempts < self.extra_path_attempts {
            let x = rng.gen_range(1..=size - 2);
            let y = rng.gen_range(1..=size - 2);
            if grid.is_tree(x, y) {
                let adjacent_paths = ORTHOGONAL
                    .iter()
                    .filter(|(dx, dy)| grid.is_grass(x + dx, y + dy))
                    .count();
                if adjacent_paths >= 2 {
                    grid.set_if_in_bounds(x, y, Tile::Grass);
                    path_cells += 1;
                }
            }
            attempts += 1;
        }
        path_cells
    }
}

/// Carves a square of side `2 * (width / 2) + 1` centred on `(x, y)`.
pub fn carve_square(grid: &mut ChunkGrid, x: i32, y: i32, width: u32) {
    let half = (width / 2) as i32;
    for dy in -half..=half {
        for dx in -half..=half {
            grid.set_if_in_bounds(x + dx, y + dy, Tile::Grass);
        }
    }
}

/// Carves a straight step between two cells plus a perpendicular band of
/// half-width `width / 2` at the start, midpoint, and end.
pub fn carve_between(grid: &mut ChunkGrid, from: (i32, i32), to: (i32, i32), width: u32) {
    let (x1, y1) = from;
    let (x2, y2) = to;
    let (dx, dy) = (x2 - x1, y2 - y1);
    let half = (width / 2) as i32;
    let (mid_x, mid_y) = (x1 + dx / 2, y1 + dy / 2);

    for offset in -half..=half {
        if dx != 0 {
            for x in [x1, mid_x, x2] {
                grid.set_if_in_bounds(x, y1 + offset, Tile::Grass);
            }
        } else {
            for y in [y1, mid_y, y2] {
                grid.set_if_in_bounds(x1 + offset, y, Tile::Grass);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tree_grid(size: usize) -> ChunkGrid {
        ChunkGrid::filled(size, Tile::Tree { variant: 0 })
    }

    fn grass_count(grid: &ChunkGrid) -> usize {
        grid.count_where(|tile| tile == Tile::Grass)
    }

    #[test]
    fn test_carve_between_horizontal_band() {
        let mut grid = tree_grid(7);
        carve_between(&mut grid, (1, 3), (3, 3), 2);
        // Three columns, band rows 2..=4
        assert_eq!(grass_count(&grid), 9);
        assert!(grid.is_grass(2, 2));
        assert!(grid.is_grass(3, 4));
        assert!(grid.is_tree(4, 3));
    }

    #[test]
    fn test_carve_between_clips_at_edges() {
        let mut grid = tree_grid(5);
        carve_between(&mut grid, (0, 0), (0, 2), 2);
        // Column -1 is skipped, columns 0 and 1 are carved for rows 0..=2.
        assert_eq!(grass_count(&grid), 6);
    }

    #[test]
    fn test_carve_square_width_one_is_single_cell() {
        let mut grid = tree_grid(5);
        carve_square(&mut grid, 2, 2, 1);
        assert_eq!(grass_count(&grid), 1);
        carve_square(&mut grid, 0, 0, 3);
        assert_eq!(grass_count(&grid), 5);
    }

    #[test]
    fn test_carve_covers_a_large_share_of_the_grid() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut grid = tree_grid(21);
            let report = MazeCarver::new((1, 2), 200).carve(&mut grid, LocalCoord::new(10, 10), &mut rng);

            assert_eq!(report.target_path_cells, 220);
            assert!(grid.is_grass(10, 10));
            // Each corridor step turns at least its destination into grass.
            assert!(grass_count(&grid) >= 21 * 21 / 4, "seed {} carved too little", seed);
        }
    }

    #[test]
    fn test_extra_paths_respects_target() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut grid = tree_grid(9);
        let carver = MazeCarver::new((1, 1), 200);
        let counter = carver.add_extra_paths(&mut grid, 40, 40, &mut rng);
        assert_eq!(counter, 40);
        assert_eq!(grass_count(&grid), 0);
    }

    #[test]
    fn test_extra_paths_needs_two_grass_neighbours() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut grid = tree_grid(5);
        grid.set(1, 2, Tile::Grass).unwrap();
        grid.set(3, 2, Tile::Grass).unwrap();

        let carver = MazeCarver::new((1, 1), 500);
        carver.add_extra_paths(&mut grid, 0, 1, &mut rng);
        assert!(grid.is_grass(2, 2));
        assert_eq!(grass_count(&grid), 3);
    }
}
