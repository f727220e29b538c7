//! # Reachability
//!
//! Flood-fill checks over chunk grids, used to verify that carved mazes are
//! connected.

use crate::game::{ChunkGrid, LocalCoord, Tile};
use crate::{ThicketError, ThicketResult};
use pathfinding::prelude::bfs_reach;
use std::collections::HashSet;

/// Walkable orthogonal neighbours of `cell`.
fn walkable_neighbors(grid: &ChunkGrid, cell: &LocalCoord) -> Vec<LocalCoord> {
    let (x, y) = (cell.x as i32, cell.y as i32);
    [(1, 0), (-1, 0), (0, 1), (0, -1)]
        .into_iter()
        .map(|(dx, dy)| (x + dx, y + dy))
        .filter(|&(nx, ny)| grid.get_signed(nx, ny).map_or(false, Tile::is_floor))
        .map(|(nx, ny)| LocalCoord::new(nx as usize, ny as usize))
        .collect()
}

/// Every walkable cell reachable from `start` by orthogonal steps.
///
/// Returns an empty set when `start` itself is not walkable.
pub fn reachable_cells(grid: &ChunkGrid, start: LocalCoord) -> HashSet<LocalCoord> {
    if !grid.get(start.x, start.y).map_or(false, Tile::is_floor) {
        return HashSet::new();
    }
    bfs_reach(start, |cell| walkable_neighbors(grid, cell)).collect()
}

/// Grass cells that cannot be reached from `start`.
pub fn unreachable_grass(grid: &ChunkGrid, start: LocalCoord) -> Vec<LocalCoord> {
    let reachable = reachable_cells(grid, start);
    grid.cells_where(|tile| tile == Tile::Grass)
        .into_iter()
        .filter(|cell| !reachable.contains(cell))
        .collect()
}

/// Fails when any grass cell is cut off from `start`.
pub fn validate_maze_connectivity(grid: &ChunkGrid, start: LocalCoord) -> ThicketResult<()> {
    let unreachable = unreachable_grass(grid, start);
    if let Some(first) = unreachable.first() {
        return Err(ThicketError::GenerationFailed(format!(
            "{} grass cells unreachable from ({}, {}), first at ({}, {})",
            unreachable.len(),
            start.x,
            start.y,
            first.x,
            first.y
        )));
    }
    Ok(())
}
