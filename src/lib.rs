//! # Thicket
//!
//! World-generation and persistent world-state engine for an endless forest
//! maze exploration game.
//!
//! ## Architecture Overview
//!
//! The core is organised around a handful of concepts:
//!
//! - **Map**: a lazily materialised, infinite grid split into square chunks.
//!   Chunks are generated on first access and cached for the lifetime of the map.
//! - **Generation System**: maze carving, clearing layout, and entity placement
//!   (gems, chests, portals), all driven by an explicit seeded RNG.
//! - **Inventory**: an ordered multiset of gems keyed by power, stored as a
//!   binary search tree and persisted as pre-order text records.
//! - **Actions and Events**: movement, pickups, chest/portal interactions, and
//!   thief/trap events expressed as plain result values.
//!
//! Rendering, audio, and input live outside this crate; the map only exposes
//! sprite *keys* for a renderer to interpret.

pub mod game;
pub mod generation;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use utils::*;

pub use game::{
    // From actions
    ActionOutcome,
    ActionStatus,
    // From entities
    Chest,
    ChestLike,
    GemCost,
    LootEntry,
    MimicChoice,
    Player,
    Portal,
    // From inventory
    GemNode,
    GemStore,
    Inventory,
    // From map
    TileMap,
    WorldMap,
    // From persistence
    InventoryStore,
    // From world
    ChunkArchetype,
    ChunkCoord,
    ChunkGrid,
    LocalCoord,
    SpriteKey,
    Tile,
};

pub use generation::{
    ChestFactory, ChunkFactory, ChunkGenerator, GenerationConfig, Generator, LootGenerator,
    MazeCarver,
};

/// Core error type for the Thicket engine.
///
/// Ordinary gameplay conditions (an empty cell, an inventory that cannot pay a
/// cost) are never errors; they are reported through `Option` or
/// [`ActionOutcome`]. Only exceptional conditions end up here.
#[derive(thiserror::Error, Debug)]
pub enum ThicketError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A saved inventory record could not be parsed
    #[error("Malformed save record on line {line}: {content:?}")]
    MalformedSave { line: usize, content: String },

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// World state is inconsistent
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type used throughout the Thicket codebase.
pub type ThicketResult<T> = Result<T, ThicketError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine configuration constants.
pub mod config {
    /// Default chunk side length (already odd)
    pub const DEFAULT_CHUNK_SIZE: usize = 21;

    /// Smallest chunk side the generators accept
    pub const MIN_CHUNK_SIZE: usize = 5;

    /// Default inclusive corridor width range
    pub const DEFAULT_PATH_WIDTH_RANGE: (u32, u32) = (1, 2);

    /// Number of distinct tree sprites
    pub const DEFAULT_TREE_VARIANTS: u8 = 4;

    /// Random attempts made by the braiding pass after maze carving
    pub const EXTRA_PATH_ATTEMPTS: u32 = 200;

    /// File name of the inventory save inside the data directory
    pub const SAVE_FILE_NAME: &str = "save_inventory.txt";

    /// Inclusive range of Obsidian gems a portal asks for
    pub const PORTAL_COST_RANGE: (u32, u32) = (50, 100);
}
