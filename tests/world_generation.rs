//! World generation properties checked through the public API.

use rand::rngs::StdRng;
use rand::SeedableRng;
use thicket::utils::reachability::{reachable_cells, validate_maze_connectivity};
use thicket::{
    ChestLike, ChunkArchetype, ChunkCoord, ChunkFactory, ChunkGenerator, GenerationConfig, LocalCoord,
    Neighbors, ThicketResult, Tile, WorldMap,
};

fn maze_only(seed: u64) -> GenerationConfig {
    GenerationConfig {
        clearing_probability: 0.0,
        ..GenerationConfig::new(seed)
    }
}

#[test]
fn test_same_seed_same_chunks() -> ThicketResult<()> {
    let mut first = WorldMap::new(GenerationConfig::new(31337))?;
    let mut second = WorldMap::new(GenerationConfig::new(31337))?;
    first.ensure_area(0, 0);
    second.ensure_area(0, 0);

    for coord in ChunkCoord::new(0, 0).block_around() {
        assert_eq!(first.chunk_grid(coord), second.chunk_grid(coord));
        assert_eq!(
            first.chunk(coord).map(|chunk| chunk.archetype),
            second.chunk(coord).map(|chunk| chunk.archetype)
        );
    }
    Ok(())
}

#[test]
fn test_different_seeds_differ() -> ThicketResult<()> {
    let mut a = WorldMap::new(GenerationConfig::new(1))?;
    let mut b = WorldMap::new(GenerationConfig::new(2))?;
    a.ensure_chunk(0, 0);
    b.ensure_chunk(0, 0);
    assert_ne!(a.chunk_grid(ChunkCoord::new(0, 0)), b.chunk_grid(ChunkCoord::new(0, 0)));
    Ok(())
}

#[test]
fn test_chunk_tiles_follow_archetype() -> ThicketResult<()> {
    let mut map = WorldMap::new(GenerationConfig::new(8))?;
    for cy in -3..=3 {
        for cx in -3..=3 {
            map.ensure_chunk(cx, cy);
        }
    }

    for cy in -3..=3 {
        for cx in -3..=3 {
            let chunk = map.chunk(ChunkCoord::new(cx, cy)).unwrap();
            let n = chunk.grid.size();
            match chunk.archetype {
                ChunkArchetype::Maze => {
                    assert_eq!(chunk.grid.count_where(|tile| tile == Tile::Clear), 0);
                    assert!(chunk.grid.count_where(|tile| tile == Tile::Grass) >= n * n / 4);
                }
                ChunkArchetype::Clearing => {
                    assert_eq!(chunk.grid.count_where(|tile| tile == Tile::Grass), 0);
                    assert!(chunk.grid.count_where(Tile::is_wall) <= n / 8);
                    // Trees stay off the two outer rings.
                    for (local, tile) in chunk.grid.iter() {
                        let edge = local.x < 2 || local.y < 2 || local.x > n - 3 || local.y > n - 3;
                        if edge {
                            assert_eq!(tile, Tile::Clear);
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

#[test]
fn test_tree_variants_are_in_range() -> ThicketResult<()> {
    let mut map = WorldMap::new(GenerationConfig::new(64))?;
    map.ensure_area(0, 0);
    for coord in ChunkCoord::new(0, 0).block_around() {
        for (_, tile) in map.chunk_grid(coord).unwrap().iter() {
            if let Tile::Tree { variant } = tile {
                assert!(variant < 4);
            }
        }
    }
    Ok(())
}

#[test]
fn test_entities_sit_on_matching_tiles() -> ThicketResult<()> {
    let config = GenerationConfig {
        gem_probability: 0.1,
        chest_probability: 0.05,
        ..GenerationConfig::new(90)
    };
    let mut map = WorldMap::new(config)?;
    let size = map.chunk_size() as i32;

    for cy in -2..=2 {
        for cx in -2..=2 {
            map.ensure_chunk(cx, cy);
        }
    }

    for y in -2 * size..3 * size {
        for x in -2 * size..3 * size {
            let tile = map.get_tile(x, y);
            if map.get_gem(x, y).is_some() {
                assert_eq!(tile, Tile::Grass, "gem on {:?} at ({}, {})", tile, x, y);
            }
            if let Some(chest) = map.get_chest(x, y) {
                assert_eq!(tile, Tile::Clear, "chest on {:?} at ({}, {})", tile, x, y);
                assert!(!chest.is_opened());
                assert!(!chest.open_cost().is_empty());
                assert_eq!(chest.is_mimic(), !chest.mimic_cost().is_empty());
            }
            if map.get_portal(x, y).is_some() {
                assert_eq!(tile, Tile::Clear);
                assert!(map.get_chest(x, y).is_none());
            }
        }
    }
    Ok(())
}

#[test]
fn test_clearings_get_exactly_one_portal() -> ThicketResult<()> {
    let config = GenerationConfig {
        clearing_probability: 1.0,
        ..GenerationConfig::new(5)
    };
    let mut map = WorldMap::new(config)?;
    let size = map.chunk_size() as i32;

    for cx in 1..=4 {
        map.ensure_chunk(cx, 0);
        let count = (0..size)
            .flat_map(|y| (0..size).map(move |x| (cx * size + x, y)))
            .filter(|&(x, y)| map.get_portal(x, y).is_some())
            .count();
        assert_eq!(count, 1, "chunk {} has {} portals", cx, count);
    }
    Ok(())
}

#[test]
fn test_legacy_preset_has_no_portals() -> ThicketResult<()> {
    let mut map = WorldMap::new(GenerationConfig::legacy(5))?;
    map.ensure_area(0, 0);
    for coord in ChunkCoord::new(0, 0).block_around() {
        let origin = coord.origin(map.chunk_size());
        assert!(map.portal_in_chunk(origin.x, origin.y).is_none());
    }
    Ok(())
}

#[test]
fn test_fresh_mazes_are_connected() {
    let config = GenerationConfig::new(0);
    let factory = ChunkFactory::from_config(&config);

    for seed in 0..25 {
        let mut rng = StdRng::seed_from_u64(seed);
        let start = LocalCoord::new(10, 10);
        let (grid, _) = factory.maze_chunk(Some(start), &mut rng);
        assert!(
            validate_maze_connectivity(&grid, start).is_ok(),
            "seed {} left grass unreachable",
            seed
        );
    }
}

#[test]
fn test_edge_started_mazes_are_connected() {
    let config = GenerationConfig::new(0);
    let factory = ChunkFactory::from_config(&config);

    for (seed, start) in [(1, LocalCoord::new(1, 10)), (2, LocalCoord::new(19, 10)), (3, LocalCoord::new(10, 1))] {
        let mut rng = StdRng::seed_from_u64(seed);
        let (grid, _) = factory.maze_chunk(Some(start), &mut rng);
        assert!(validate_maze_connectivity(&grid, start).is_ok());
        assert!(reachable_cells(&grid, start).len() > 21 * 21 / 4);
    }
}

#[test]
fn test_seam_connects_to_western_maze() {
    let config = maze_only(17);
    let generator = ChunkGenerator::from_config(&config);
    let mut rng = config.create_rng();

    let mut west = generator.generate_chunk(ChunkCoord::new(0, 0), &Neighbors::default(), &mut rng).grid;
    let c = west.center();
    west.set(19, c, Tile::Grass).unwrap();

    let neighbors = Neighbors {
        west: Some(&west),
        ..Neighbors::default()
    };
    let east = generator.generate_chunk(ChunkCoord::new(1, 0), &neighbors, &mut rng);

    assert_eq!(east.archetype, ChunkArchetype::Maze);
    assert_eq!(east.start, Some(LocalCoord::new(1, c)));
    assert_eq!(east.grid.get(0, c), Some(Tile::Grass));
    assert_eq!(east.grid.get(1, c), Some(Tile::Grass));
}

#[test]
fn test_map_stitches_chunks_across_seams() -> ThicketResult<()> {
    let mut map = WorldMap::new(maze_only(23))?;
    map.ensure_chunk(0, 0);
    map.ensure_chunk(1, 0);

    let n = map.chunk_size() as i32;
    let c = n / 2;
    if map.get_tile(n - 2, c) == Tile::Grass {
        assert_eq!(map.get_tile(n, c), Tile::Grass);
        assert_eq!(map.get_tile(n + 1, c), Tile::Grass);
    }
    Ok(())
}
