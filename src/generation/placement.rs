//! # Entity Placement
//!
//! Scatters gems, chests, and portals over freshly generated chunks.
//!
//! Each manager keeps one layer of the world keyed by chunk coordinate. A
//! chunk's layer is materialised exactly once; later placement calls for the
//! same chunk are no-ops, so population can never run twice.

use crate::game::gems::GROUND_GEM_POWERS;
use crate::game::{Chest, ChunkCoord, ChunkGrid, LocalCoord, Portal, Tile};
use crate::generation::items::{ChestFactory, PortalFactory};
use crate::GenerationConfig;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Gems lying on grass, at most one per cell.
#[derive(Debug, Clone)]
pub struct GemManager {
    gem_probability: f64,
    gems: HashMap<ChunkCoord, HashMap<LocalCoord, i32>>,
}

impl GemManager {
    pub fn new(gem_probability: f64) -> Self {
        Self {
            gem_probability,
            gems: HashMap::new(),
        }
    }

    /// Rolls a gem on every grass cell of the chunk. Returns how many were placed.
    pub fn place_gems_in_chunk<R: Rng>(&mut self, coord: ChunkCoord, grid: &ChunkGrid, rng: &mut R) -> usize {
        if self.gems.contains_key(&coord) {
            return 0;
        }

        let mut layer = HashMap::new();
        for (local, tile) in grid.iter() {
            if tile == Tile::Grass && rng.gen::<f64>() < self.gem_probability {
                if let Some(&power) = GROUND_GEM_POWERS.choose(rng) {
                    layer.insert(local, power);
                }
            }
        }

        let placed = layer.len();
        debug!("Placed {} gems in chunk ({}, {})", placed, coord.x, coord.y);
        self.gems.insert(coord, layer);
        placed
    }

    /// Whether the chunk's gem layer exists.
    pub fn is_populated(&self, coord: ChunkCoord) -> bool {
        self.gems.contains_key(&coord)
    }

    pub fn get_gem(&self, coord: ChunkCoord, local: LocalCoord) -> Option<i32> {
        self.gems.get(&coord)?.get(&local).copied()
    }

    /// Removes and returns the gem at the cell.
    pub fn collect_gem(&mut self, coord: ChunkCoord, local: LocalCoord) -> Option<i32> {
        self.gems.get_mut(&coord)?.remove(&local)
    }

    /// Places a gem by hand, replacing any gem already there.
    pub fn insert_gem(&mut self, coord: ChunkCoord, local: LocalCoord, power: i32) {
        self.gems.entry(coord).or_default().insert(local, power);
    }

    /// Gems still lying in the chunk, sorted by position.
    pub fn gems_in_chunk(&self, coord: ChunkCoord) -> Vec<(LocalCoord, i32)> {
        let mut gems: Vec<(LocalCoord, i32)> = self
            .gems
            .get(&coord)
            .map(|layer| layer.iter().map(|(&local, &power)| (local, power)).collect())
            .unwrap_or_default();
        gems.sort_by_key(|(local, _)| (local.y, local.x));
        gems
    }
}

/// Chests standing on clear ground.
#[derive(Debug, Clone)]
pub struct ChestManager {
    chest_probability: f64,
    require_clear_neighborhood: bool,
    factory: ChestFactory,
    chests: HashMap<ChunkCoord, HashMap<LocalCoord, Chest>>,
}

impl ChestManager {
    pub fn new(chest_probability: f64, require_clear_neighborhood: bool, factory: ChestFactory) -> Self {
        Self {
            chest_probability,
            require_clear_neighborhood,
            factory,
            chests: HashMap::new(),
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(
            config.chest_probability,
            config.require_clear_neighborhood,
            ChestFactory::from_config(config),
        )
    }

    /// Whether the 3×3 block around `(x, y)` is inside the grid and all clear.
    fn is_area_clear(grid: &ChunkGrid, x: i32, y: i32) -> bool {
        (-1..=1).all(|dy| (-1..=1).all(|dx| grid.is_clear(x + dx, y + dy)))
    }

    /// Rolls a chest on every eligible clear cell. Returns how many were placed.
    pub fn place_chests_in_chunk<R: Rng>(&mut self, coord: ChunkCoord, grid: &ChunkGrid, rng: &mut R) -> usize {
        if self.chests.contains_key(&coord) {
            return 0;
        }

        let mut layer = HashMap::new();
        for (local, tile) in grid.iter() {
            if tile != Tile::Clear {
                continue;
            }
            if self.require_clear_neighborhood && !Self::is_area_clear(grid, local.x as i32, local.y as i32) {
                continue;
            }
            if rng.gen::<f64>() < self.chest_probability {
                layer.insert(local, self.factory.create_chest(None, rng));
            }
        }

        let placed = layer.len();
        debug!("Placed {} chests in chunk ({}, {})", placed, coord.x, coord.y);
        self.chests.insert(coord, layer);
        placed
    }

    pub fn get_chest(&self, coord: ChunkCoord, local: LocalCoord) -> Option<&Chest> {
        self.chests.get(&coord)?.get(&local)
    }

    pub fn get_chest_mut(&mut self, coord: ChunkCoord, local: LocalCoord) -> Option<&mut Chest> {
        self.chests.get_mut(&coord)?.get_mut(&local)
    }

    /// Places a chest by hand, replacing any chest already there.
    pub fn insert_chest(&mut self, coord: ChunkCoord, local: LocalCoord, chest: Chest) {
        self.chests.entry(coord).or_default().insert(local, chest);
    }

    /// Cells holding a chest in the chunk, sorted by position.
    pub fn chest_positions(&self, coord: ChunkCoord) -> Vec<LocalCoord> {
        let mut positions: Vec<LocalCoord> = self
            .chests
            .get(&coord)
            .map(|layer| layer.keys().copied().collect())
            .unwrap_or_default();
        positions.sort_by_key(|local| (local.y, local.x));
        positions
    }
}

/// At most one portal per chunk.
#[derive(Debug, Clone)]
pub struct PortalManager {
    portal_probability: f64,
    factory: PortalFactory,
    // `None` records that the chunk rolled and got no portal.
    portals: HashMap<ChunkCoord, Option<(LocalCoord, Portal)>>,
}

impl PortalManager {
    pub fn new(portal_probability: f64, factory: PortalFactory) -> Self {
        Self {
            portal_probability,
            factory,
            portals: HashMap::new(),
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.portal_probability, PortalFactory::default())
    }

    /// Rolls once for the chunk and places a portal on a random clear cell
    /// not listed in `occupied`. Returns where it landed.
    pub fn place_portal_in_chunk<R: Rng>(
        &mut self,
        coord: ChunkCoord,
        grid: &ChunkGrid,
        occupied: &[LocalCoord],
        rng: &mut R,
    ) -> Option<LocalCoord> {
        if self.portals.contains_key(&coord) {
            return None;
        }

        let mut placed = None;
        if rng.gen::<f64>() < self.portal_probability {
            let candidates: Vec<LocalCoord> = grid
                .cells_where(|tile| tile == Tile::Clear)
                .into_iter()
                .filter(|cell| !occupied.contains(cell))
                .collect();
            if let Some(&local) = candidates.choose(rng) {
                placed = Some((local, self.factory.create_portal(rng)));
            }
        }

        let position = placed.as_ref().map(|(local, _)| *local);
        if let Some(local) = position {
            debug!("Placed portal in chunk ({}, {}) at ({}, {})", coord.x, coord.y, local.x, local.y);
        }
        self.portals.insert(coord, placed);
        position
    }

    /// The chunk's portal and its local position.
    pub fn get_portal_info(&self, coord: ChunkCoord) -> Option<(LocalCoord, &Portal)> {
        self.portals
            .get(&coord)?
            .as_ref()
            .map(|(local, portal)| (*local, portal))
    }

    pub fn get_portal_mut(&mut self, coord: ChunkCoord) -> Option<(LocalCoord, &mut Portal)> {
        self.portals
            .get_mut(&coord)?
            .as_mut()
            .map(|(local, portal)| (*local, portal))
    }

    /// Places a portal by hand, replacing the chunk's portal if any.
    pub fn insert_portal(&mut self, coord: ChunkCoord, local: LocalCoord, portal: Portal) {
        self.portals.insert(coord, Some((local, portal)));
    }
}
