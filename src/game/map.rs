//! # World Map
//!
//! The spatial coordinator. Owns the chunk cache, the entity layers, and the
//! seeded RNG every generator draws from.
//!
//! Chunks are materialised lazily: any query that needs a tile generates the
//! owning chunk first, then scatters gems, chests, and the portal over it.
//! Nothing is ever regenerated, so a map built from the same seed and asked
//! the same questions in the same order always answers identically.

use crate::game::actions::{self, ActionOutcome, MimicChoice};
use crate::game::world::split_world_coord;
use crate::game::{
    Chest, ChestLike, ChunkArchetype, ChunkCoord, ChunkGrid, LocalCoord, Player, Portal, Position,
    SpriteKey, Tile,
};
use crate::generation::{
    ChestManager, ChunkGenerator, GemManager, GeneratedChunk, GenerationConfig, Neighbors,
    PortalManager,
};
use crate::ThicketResult;
use log::{debug, info};
use rand::rngs::StdRng;
use std::collections::HashMap;

/// Query surface that movement and pickup logic needs from a map.
///
/// Implemented by [`WorldMap`]; tests implement it on small fixed grids.
pub trait TileMap {
    /// Tile at a world position, generating it if needed.
    fn get_tile(&mut self, x: i32, y: i32) -> Tile;

    /// Whether the player may not step onto the position.
    fn is_blocked(&mut self, x: i32, y: i32) -> bool;

    /// Removes and returns the gem lying at the position.
    fn collect_gem(&mut self, x: i32, y: i32) -> Option<i32>;

    /// Makes sure the chunks around the position exist.
    fn ensure_area(&mut self, x: i32, y: i32);

    fn is_wall(&mut self, x: i32, y: i32) -> bool {
        self.get_tile(x, y).is_wall()
    }
}

/// Infinite chunked forest.
///
/// # Examples
///
/// ```
/// use thicket::{GenerationConfig, WorldMap};
///
/// let mut map = WorldMap::new(GenerationConfig::new(7)).unwrap();
/// let spawn = map.spawn_position();
/// assert!(!map.is_wall(spawn.x, spawn.y));
/// assert_eq!(map.generated_chunk_count(), 1);
/// ```
#[derive(Debug)]
pub struct WorldMap {
    config: GenerationConfig,
    chunk_size: usize,
    rng: StdRng,
    generator: ChunkGenerator,
    chunks: HashMap<ChunkCoord, GeneratedChunk>,
    gems: GemManager,
    chests: ChestManager,
    portals: PortalManager,
}

impl WorldMap {
    /// Creates an empty map after validating `config`.
    pub fn new(config: GenerationConfig) -> ThicketResult<Self> {
        config.validate()?;
        info!(
            "Creating world map with seed {} and chunk size {}",
            config.seed,
            config.effective_chunk_size()
        );

        Ok(Self {
            chunk_size: config.effective_chunk_size(),
            rng: config.create_rng(),
            generator: ChunkGenerator::from_config(&config),
            chunks: HashMap::new(),
            gems: GemManager::new(config.gem_probability),
            chests: ChestManager::from_config(&config),
            portals: PortalManager::from_config(&config),
            config,
        })
    }

    /// Shorthand for a map with the standard configuration.
    pub fn with_seed(seed: u64) -> ThicketResult<Self> {
        Self::new(GenerationConfig::new(seed))
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// The map's RNG, for events that should share the world's random stream.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Chunk containing a world position.
    pub fn get_chunk_key(&self, x: i32, y: i32) -> ChunkCoord {
        self.split(x, y).0
    }

    /// Chunk and in-chunk offset of a world position.
    pub fn split(&self, x: i32, y: i32) -> (ChunkCoord, LocalCoord) {
        split_world_coord(x, y, self.chunk_size)
    }

    /// Centre cell of the origin chunk, always walkable.
    pub fn spawn_position(&mut self) -> Position {
        self.ensure_chunk(0, 0);
        let center = (self.chunk_size / 2) as i32;
        ChunkCoord::new(0, 0).origin(self.chunk_size) + Position::new(center, center)
    }

    pub fn is_generated(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn generated_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// The generated chunk at `coord`, without generating it.
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&GeneratedChunk> {
        self.chunks.get(&coord)
    }

    pub fn chunk_grid(&self, coord: ChunkCoord) -> Option<&ChunkGrid> {
        self.chunks.get(&coord).map(|chunk| &chunk.grid)
    }

    /// Generates and populates the chunk if it does not exist yet.
    pub fn ensure_chunk(&mut self, cx: i32, cy: i32) {
        let coord = ChunkCoord::new(cx, cy);
        if self.chunks.contains_key(&coord) {
            return;
        }

        let chunk = {
            let chunks = &self.chunks;
            let grid_at = move |dx: i32, dy: i32| chunks.get(&coord.offset(dx, dy)).map(|chunk| &chunk.grid);
            let neighbors = Neighbors {
                west: grid_at(-1, 0),
                east: grid_at(1, 0),
                north: grid_at(0, -1),
                south: grid_at(0, 1),
            };
            self.generator.generate_chunk(coord, &neighbors, &mut self.rng)
        };

        self.gems.place_gems_in_chunk(coord, &chunk.grid, &mut self.rng);
        self.chests.place_chests_in_chunk(coord, &chunk.grid, &mut self.rng);
        let occupied = self.chests.chest_positions(coord);
        self.portals
            .place_portal_in_chunk(coord, &chunk.grid, &occupied, &mut self.rng);

        debug_assert_eq!(chunk.grid.size(), self.chunk_size);
        self.chunks.insert(coord, chunk);
        debug!("Chunk ({}, {}) ready, {} chunks cached", cx, cy, self.chunks.len());
    }

    /// Ensures the 3×3 block of chunks around the chunk containing `(x, y)`.
    pub fn ensure_area(&mut self, x: i32, y: i32) {
        for coord in self.get_chunk_key(x, y).block_around() {
            self.ensure_chunk(coord.x, coord.y);
        }
    }

    pub fn get_tile(&mut self, x: i32, y: i32) -> Tile {
        let (coord, local) = self.split(x, y);
        self.ensure_chunk(coord.x, coord.y);
        self.chunks
            .get(&coord)
            .and_then(|chunk| chunk.grid.get(local.x, local.y))
            .unwrap_or_default()
    }

    /// What a renderer should draw at the position: chest, then portal, then tile.
    pub fn get_sprite_key(&mut self, x: i32, y: i32) -> SpriteKey {
        let tile = self.get_tile(x, y);
        if let Some(chest) = self.get_chest(x, y) {
            return SpriteKey::Chest {
                opened: chest.is_opened(),
                large: chest.is_large(),
            };
        }
        if let Some((portal, _)) = self.get_portal(x, y) {
            return SpriteKey::Portal {
                activated: portal.is_activated(),
            };
        }
        SpriteKey::from(tile)
    }

    pub fn get_gem(&self, x: i32, y: i32) -> Option<i32> {
        let (coord, local) = self.split(x, y);
        self.gems.get_gem(coord, local)
    }

    pub fn collect_gem(&mut self, x: i32, y: i32) -> Option<i32> {
        let (coord, local) = self.split(x, y);
        self.gems.collect_gem(coord, local)
    }

    pub fn get_chest(&self, x: i32, y: i32) -> Option<&Chest> {
        let (coord, local) = self.split(x, y);
        self.chests.get_chest(coord, local)
    }

    pub fn get_chest_mut(&mut self, x: i32, y: i32) -> Option<&mut Chest> {
        let (coord, local) = self.split(x, y);
        self.chests.get_chest_mut(coord, local)
    }

    /// The portal standing exactly at `(x, y)` and its world position.
    pub fn get_portal(&self, x: i32, y: i32) -> Option<(&Portal, Position)> {
        let (coord, local) = self.split(x, y);
        let (portal_local, portal) = self.portals.get_portal_info(coord)?;
        (portal_local == local).then(|| (portal, Position::new(x, y)))
    }

    /// The portal of the chunk containing `(x, y)`, wherever it stands.
    pub fn portal_in_chunk(&self, x: i32, y: i32) -> Option<(&Portal, Position)> {
        let coord = self.get_chunk_key(x, y);
        let (local, portal) = self.portals.get_portal_info(coord)?;
        let at = coord.origin(self.chunk_size) + Position::new(local.x as i32, local.y as i32);
        Some((portal, at))
    }

    pub fn is_wall(&mut self, x: i32, y: i32) -> bool {
        self.get_tile(x, y).is_wall()
    }

    /// Whether the chunk containing `(x, y)` is a generated clearing.
    pub fn is_clearing(&self, x: i32, y: i32) -> bool {
        self.chunks
            .get(&self.get_chunk_key(x, y))
            .is_some_and(|chunk| chunk.archetype == ChunkArchetype::Clearing)
    }

    /// Walls, unopened chests, and portals block movement.
    pub fn is_blocked(&mut self, x: i32, y: i32) -> bool {
        if self.is_wall(x, y) {
            return true;
        }
        let closed_chest = self.get_chest(x, y).is_some_and(|chest| !chest.is_opened());
        closed_chest || self.get_portal(x, y).is_some()
    }

    /// Puts a gem on the map by hand, generating the chunk first.
    pub fn place_gem(&mut self, x: i32, y: i32, power: i32) {
        let (coord, local) = self.split(x, y);
        self.ensure_chunk(coord.x, coord.y);
        self.gems.insert_gem(coord, local, power);
    }

    /// Puts a chest on the map by hand, generating the chunk first.
    pub fn place_chest(&mut self, x: i32, y: i32, chest: Chest) {
        let (coord, local) = self.split(x, y);
        self.ensure_chunk(coord.x, coord.y);
        self.chests.insert_chest(coord, local, chest);
    }

    /// Puts a portal on the map by hand, replacing the chunk's own.
    pub fn place_portal(&mut self, x: i32, y: i32, portal: Portal) {
        let (coord, local) = self.split(x, y);
        self.ensure_chunk(coord.x, coord.y);
        self.portals.insert_portal(coord, local, portal);
    }

    /// Runs the chest protocol on the chest at `(x, y)`.
    pub fn open_chest(&mut self, x: i32, y: i32, player: &mut Player) -> Option<ActionOutcome> {
        let chest = self.get_chest_mut(x, y)?;
        Some(actions::open_chest(chest, player))
    }

    /// Settles a revealed mimic at `(x, y)` using the map's RNG.
    pub fn resolve_mimic(
        &mut self,
        x: i32,
        y: i32,
        player: &mut Player,
        choice: MimicChoice,
    ) -> Option<ActionOutcome> {
        let (coord, local) = self.split(x, y);
        let chest = self.chests.get_chest_mut(coord, local)?;
        Some(actions::resolve_mimic(
            chest,
            player,
            choice,
            self.config.mimic_fight_death_chance,
            &mut self.rng,
        ))
    }

    /// Tries to activate the portal at `(x, y)`.
    pub fn activate_portal(&mut self, x: i32, y: i32, player: &mut Player) -> Option<ActionOutcome> {
        let (coord, local) = self.split(x, y);
        match self.portals.get_portal_mut(coord) {
            Some((portal_local, portal)) if portal_local == local => Some(actions::activate_portal(portal, player)),
            _ => None,
        }
    }

    /// ASCII view of the square of side `2 * radius + 1` centred on `center`.
    ///
    /// `@` marks the centre, `C`/`c` closed and opened chests, `O`/`o` idle and
    /// active portals, `*` gems; other cells use [`Tile::glyph`].
    pub fn render_ascii(&mut self, center: Position, radius: i32) -> String {
        let mut view = String::new();
        for y in center.y - radius..=center.y + radius {
            for x in center.x - radius..=center.x + radius {
                let glyph = if (x, y) == (center.x, center.y) {
                    '@'
                } else {
                    match self.get_sprite_key(x, y) {
                        SpriteKey::Chest { opened: false, .. } => 'C',
                        SpriteKey::Chest { opened: true, .. } => 'c',
                        SpriteKey::Portal { activated: false } => 'O',
                        SpriteKey::Portal { activated: true } => 'o',
                        _ if self.get_gem(x, y).is_some() => '*',
                        _ => self.get_tile(x, y).glyph(),
                    }
                };
                view.push(glyph);
            }
            view.push('\n');
        }
        view
    }
}

impl TileMap for WorldMap {
    fn get_tile(&mut self, x: i32, y: i32) -> Tile {
        WorldMap::get_tile(self, x, y)
    }

    fn is_blocked(&mut self, x: i32, y: i32) -> bool {
        WorldMap::is_blocked(self, x, y)
    }

    fn collect_gem(&mut self, x: i32, y: i32) -> Option<i32> {
        WorldMap::collect_gem(self, x, y)
    }

    fn ensure_area(&mut self, x: i32, y: i32) {
        WorldMap::ensure_area(self, x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GemCost, GemStore, LootEntry};

    fn test_map(seed: u64) -> WorldMap {
        WorldMap::new(GenerationConfig::for_testing(seed)).unwrap()
    }

    type CellEntities = (Position, Option<i32>, Option<Chest>, Option<Portal>);

    /// Every gem, chest, and portal in one chunk, cell by cell.
    fn chunk_entities(map: &WorldMap, cx: i32, cy: i32) -> Vec<CellEntities> {
        let size = map.chunk_size() as i32;
        let mut cells = Vec::new();
        for y in cy * size..(cy + 1) * size {
            for x in cx * size..(cx + 1) * size {
                cells.push((
                    Position::new(x, y),
                    map.get_gem(x, y),
                    map.get_chest(x, y).cloned(),
                    map.get_portal(x, y).map(|(portal, _)| portal.clone()),
                ));
            }
        }
        cells
    }

    fn plain_chest() -> Chest {
        Chest::new(
            vec![LootEntry::new(10, 2)],
            GemCost::from([(5, 1)]),
            GemCost::new(),
            false,
            false,
        )
    }

    /// First grass cell of the origin chunk, in world coordinates.
    fn origin_grass(map: &mut WorldMap) -> Position {
        map.ensure_chunk(0, 0);
        let local = map
            .chunk_grid(ChunkCoord::new(0, 0))
            .unwrap()
            .cells_where(|tile| tile == Tile::Grass)[0];
        Position::new(local.x as i32, local.y as i32)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = GenerationConfig {
            clearing_probability: 2.0,
            ..GenerationConfig::default()
        };
        assert!(WorldMap::new(config).is_err());
    }

    #[test]
    fn test_same_seed_same_world() {
        let mut a = test_map(11);
        let mut b = test_map(11);
        for (x, y) in [(0, 0), (-3, 17), (40, -25), (-12, -12)] {
            assert_eq!(a.get_tile(x, y), b.get_tile(x, y));
            assert_eq!(a.get_gem(x, y), b.get_gem(x, y));
        }
        let coord = ChunkCoord::new(0, 0);
        assert_eq!(a.chunk_grid(coord), b.chunk_grid(coord));
    }

    #[test]
    fn test_ensure_chunk_is_idempotent() {
        let mut map = test_map(3);
        map.ensure_chunk(2, -1);
        let before = map.chunk_grid(ChunkCoord::new(2, -1)).cloned();
        let entities_before = chunk_entities(&map, 2, -1);
        map.ensure_chunk(2, -1);
        assert_eq!(map.generated_chunk_count(), 1);
        assert_eq!(map.chunk_grid(ChunkCoord::new(2, -1)).cloned(), before);
        assert_eq!(chunk_entities(&map, 2, -1), entities_before);
    }

    #[test]
    fn test_negative_coordinates_map_to_negative_chunks() {
        let mut map = test_map(4);
        assert_eq!(map.get_chunk_key(-1, -1), ChunkCoord::new(-1, -1));
        assert_eq!(map.split(-1, 0), (ChunkCoord::new(-1, 0), LocalCoord::new(10, 0)));

        map.get_tile(-1, -1);
        assert!(map.is_generated(ChunkCoord::new(-1, -1)));
    }

    #[test]
    fn test_ensure_area_builds_three_by_three() {
        let mut map = test_map(5);
        map.ensure_area(0, 0);
        assert_eq!(map.generated_chunk_count(), 9);
        for coord in ChunkCoord::new(0, 0).block_around() {
            assert!(map.is_generated(coord));
        }
    }

    #[test]
    fn test_spawn_is_walkable() {
        for seed in 0..10 {
            let mut map = test_map(seed);
            let spawn = map.spawn_position();
            assert_eq!(spawn, Position::new(5, 5));
            assert!(!map.is_wall(spawn.x, spawn.y));
        }
    }

    #[test]
    fn test_chest_blocks_until_opened() {
        let mut map = test_map(6);
        let at = origin_grass(&mut map);
        assert!(!map.is_blocked(at.x, at.y));

        map.place_chest(at.x, at.y, plain_chest());
        assert!(map.is_blocked(at.x, at.y));
        assert_eq!(
            map.get_sprite_key(at.x, at.y),
            SpriteKey::Chest {
                opened: false,
                large: false
            }
        );

        let mut player = Player::new(Position::origin());
        player.inventory.insert(5, 1);
        let outcome = map.open_chest(at.x, at.y, &mut player).unwrap();
        assert!(outcome.is_success());
        assert!(!map.is_blocked(at.x, at.y));
    }

    #[test]
    fn test_portal_only_at_exact_cell() {
        let mut map = test_map(8);
        let at = origin_grass(&mut map);
        map.place_portal(at.x, at.y, Portal::new(1));

        let (_, position) = map.get_portal(at.x, at.y).unwrap();
        assert_eq!(position, at);
        assert!(map.get_portal(at.x, at.y + 1).is_none());
        assert!(map.is_blocked(at.x, at.y));
        assert_eq!(
            map.get_sprite_key(at.x, at.y),
            SpriteKey::Portal { activated: false }
        );
        assert_eq!(map.portal_in_chunk(0, 0).map(|(_, p)| p), Some(at));
    }

    #[test]
    fn test_activate_portal_through_map() {
        let mut map = test_map(9);
        let at = origin_grass(&mut map);
        map.place_portal(at.x, at.y, Portal::new(3));

        let mut player = Player::new(Position::origin());
        assert!(map.activate_portal(at.x, at.y, &mut player).unwrap().is_failure());

        player.inventory.insert(50, 4);
        assert!(map.activate_portal(at.x, at.y, &mut player).unwrap().is_success());
        assert_eq!(player.inventory.quantity_of(50), 1);
        assert!(map.activate_portal(at.x + 100, at.y, &mut player).is_none());
    }

    #[test]
    fn test_collect_placed_gem() {
        let mut map = test_map(10);
        let at = origin_grass(&mut map);
        map.place_gem(at.x, at.y, 15);
        assert_eq!(map.get_gem(at.x, at.y), Some(15));
        assert_eq!(map.collect_gem(at.x, at.y), Some(15));
        assert_eq!(map.get_gem(at.x, at.y), None);
    }

    #[test]
    fn test_render_ascii_marks_centre() {
        let mut map = test_map(12);
        let spawn = map.spawn_position();
        let view = map.render_ascii(spawn, 2);
        let lines: Vec<&str> = view.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|line| line.chars().count() == 5));
        assert_eq!(lines[2].chars().nth(2), Some('@'));
    }

    #[test]
    fn test_origin_is_never_a_clearing() {
        let mut map = test_map(13);
        map.ensure_chunk(0, 0);
        assert!(!map.is_clearing(0, 0));
        assert!(!map.is_clearing(500, 500));
    }
}
