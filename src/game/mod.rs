//! # Game Module
//!
//! World state, entities, and the rules that act on them.
//!
//! This module contains the fundamental building blocks of Thicket:
//! - Tiles, chunk addressing, and the lazily generated world map
//! - The gem inventory and its persistence
//! - Chests, portals, and the player
//! - Player actions and random events expressed as result values

pub mod actions;
pub mod entities;
pub mod events;
pub mod gems;
pub mod inventory;
pub mod map;
pub mod persistence;
pub mod world;

pub use actions::*;
pub use entities::*;
pub use events::*;
pub use gems::*;
pub use inventory::*;
pub use map::*;
pub use persistence::*;
pub use world::*;

use serde::{Deserialize, Serialize};

/// Represents a 2D coordinate in the infinite world.
///
/// # Examples
///
/// ```
/// use thicket::Position;
///
/// let pos = Position::new(10, -5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, -5);
///
/// let around = pos.neighborhood();
/// assert_eq!(around.len(), 9); // The cell itself plus its 8 neighbours
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Returns the 3×3 block centred on this position, including itself.
    ///
    /// Cells come column by column, top to bottom. Chest and portal
    /// interactions pick the first match in this order.
    pub fn neighborhood(self) -> Vec<Position> {
        let mut cells = Vec::with_capacity(9);
        for dx in -1..=1 {
            for dy in -1..=1 {
                cells.push(Position::new(self.x + dx, self.y + dy));
            }
        }
        cells
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

/// Axis-aligned movement directions. The world has no diagonal movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Converts a direction to a position delta. North is negative `y`.
    ///
    /// # Examples
    ///
    /// ```
    /// use thicket::{Direction, Position};
    ///
    /// let delta = Direction::North.to_delta();
    /// assert_eq!(delta, Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::North => Position::new(0, -1),
            Direction::South => Position::new(0, 1),
            Direction::East => Position::new(1, 0),
            Direction::West => Position::new(-1, 0),
        }
    }

    /// Returns all 4 directions.
    pub fn all() -> [Direction; 4] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ]
    }
}
