//! # World Representation
//!
//! Tiles, chunk addressing, and the per-chunk tile grid.
//!
//! The world is an unbounded plane of tiles cut into square chunks of odd side
//! length. World coordinates are plain signed integers; chunk and local
//! coordinates are derived with floor semantics so that negative coordinates
//! land in the right chunk.

use crate::game::Position;
use crate::{ThicketError, ThicketResult};
use serde::{Deserialize, Serialize};

/// A single cell of terrain.
///
/// Trees are impassable walls, grass is a maze corridor, and clear tiles make
/// up open clearings where chests and portals live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Impassable tree with a fixed sprite variant
    Tree { variant: u8 },
    /// Carved corridor floor
    Grass,
    /// Open clearing floor
    Clear,
}

impl Tile {
    /// Returns true if this tile blocks movement on its own.
    pub fn is_wall(self) -> bool {
        matches!(self, Tile::Tree { .. })
    }

    /// Returns true for the walkable floor kinds.
    pub fn is_floor(self) -> bool {
        !self.is_wall()
    }

    /// ASCII glyph used by text views.
    pub fn glyph(self) -> char {
        match self {
            Tile::Tree { .. } => '#',
            Tile::Grass => '.',
            Tile::Clear => ' ',
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Tree { variant: 0 }
    }
}

/// Which generator produced a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChunkArchetype {
    /// Carved corridors through a tree grid
    Maze,
    /// Open clear ground with a few scattered trees
    Clearing,
}

/// Integer coordinates of a chunk in the chunk lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The chunk `(dx, dy)` steps away from this one.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// The 3×3 block of chunks centred on this one, row by row.
    pub fn block_around(self) -> Vec<ChunkCoord> {
        let mut block = Vec::with_capacity(9);
        for dy in -1..=1 {
            for dx in -1..=1 {
                block.push(self.offset(dx, dy));
            }
        }
        block
    }

    /// World position of this chunk's top-left cell.
    pub fn origin(self, chunk_size: usize) -> Position {
        let n = chunk_size as i32;
        Position::new(self.x * n, self.y * n)
    }
}

/// Coordinates of a cell within its chunk, always in `[0, chunk_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalCoord {
    pub x: usize,
    pub y: usize,
}

impl LocalCoord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Splits a world coordinate into its chunk and local parts.
///
/// Uses Euclidean division, so `-1` maps to the last cell of chunk `-1`.
///
/// # Examples
///
/// ```
/// use thicket::{split_world_coord, ChunkCoord, LocalCoord};
///
/// let (chunk, local) = split_world_coord(-1, -1, 21);
/// assert_eq!(chunk, ChunkCoord::new(-1, -1));
/// assert_eq!(local, LocalCoord::new(20, 20));
/// ```
pub fn split_world_coord(x: i32, y: i32, chunk_size: usize) -> (ChunkCoord, LocalCoord) {
    let n = chunk_size as i32;
    (
        ChunkCoord::new(x.div_euclid(n), y.div_euclid(n)),
        LocalCoord::new(x.rem_euclid(n) as usize, y.rem_euclid(n) as usize),
    )
}

/// Renderer-facing description of what occupies a cell.
///
/// The core never touches pixels; a front end maps these keys to sprites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKey {
    Tree { variant: u8 },
    Grass,
    Clear,
    Chest { opened: bool, large: bool },
    Portal { activated: bool },
}

impl From<Tile> for SpriteKey {
    fn from(tile: Tile) -> Self {
        match tile {
            Tile::Tree { variant } => SpriteKey::Tree { variant },
            Tile::Grass => SpriteKey::Grass,
            Tile::Clear => SpriteKey::Clear,
        }
    }
}

/// Square tile grid backing one chunk, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkGrid {
    size: usize,
    tiles: Vec<Tile>,
}

impl ChunkGrid {
    /// Creates a `size × size` grid filled with `tile`.
    pub fn filled(size: usize, tile: Tile) -> Self {
        Self {
            size,
            tiles: vec![tile; size * size],
        }
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Index of the centre cell along either axis.
    pub fn center(&self) -> usize {
        self.size / 2
    }

    /// Whether signed local coordinates fall inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }

    /// Tile at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<Tile> {
        if x < self.size && y < self.size {
            Some(self.tiles[y * self.size + x])
        } else {
            None
        }
    }

    /// Tile at signed coordinates, or `None` outside the grid.
    pub fn get_signed(&self, x: i32, y: i32) -> Option<Tile> {
        if self.in_bounds(x, y) {
            self.get(x as usize, y as usize)
        } else {
            None
        }
    }

    /// Overwrites the tile at `(x, y)`.
    pub fn set(&mut self, x: usize, y: usize, tile: Tile) -> ThicketResult<()> {
        if x >= self.size || y >= self.size {
            return Err(ThicketError::InvalidState(format!(
                "Cell ({}, {}) outside {}×{} chunk",
                x, y, self.size, self.size
            )));
        }
        self.tiles[y * self.size + x] = tile;
        Ok(())
    }

    /// Writes `tile` if the signed coordinates are in bounds; otherwise does nothing.
    pub fn set_if_in_bounds(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y) {
            self.tiles[y as usize * self.size + x as usize] = tile;
        }
    }

    /// Whether the cell holds a tree. Out-of-range cells count as walls.
    pub fn is_tree(&self, x: i32, y: i32) -> bool {
        self.get_signed(x, y).map_or(true, Tile::is_wall)
    }

    /// Whether the cell holds grass.
    pub fn is_grass(&self, x: i32, y: i32) -> bool {
        self.get_signed(x, y) == Some(Tile::Grass)
    }

    /// Whether the cell holds clear ground.
    pub fn is_clear(&self, x: i32, y: i32) -> bool {
        self.get_signed(x, y) == Some(Tile::Clear)
    }

    /// Local coordinates of every cell matching `predicate`, row by row.
    pub fn cells_where<F>(&self, predicate: F) -> Vec<LocalCoord>
    where
        F: Fn(Tile) -> bool,
    {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| predicate(**tile))
            .map(|(index, _)| LocalCoord::new(index % self.size, index / self.size))
            .collect()
    }

    /// Number of cells matching `predicate`.
    pub fn count_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(Tile) -> bool,
    {
        self.tiles.iter().filter(|tile| predicate(**tile)).count()
    }

    /// Iterates over `(local, tile)` pairs row by row.
    pub fn iter(&self) -> impl Iterator<Item = (LocalCoord, Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(move |(index, tile)| (LocalCoord::new(index % self.size, index / self.size), *tile))
    }

    /// Renders the grid with one glyph per tile, one line per row.
    pub fn to_ascii(&self) -> String {
        self.tiles
            .chunks(self.size)
            .map(|row| row.iter().map(|tile| tile.glyph()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
