//! # Chunk Generation
//!
//! Builds the tile grid of a single chunk.
//!
//! [`ChunkFactory`] knows how to build each archetype; [`ChunkGenerator`]
//! picks the archetype, chooses where carving starts based on which
//! neighbours already exist, and punches corridors through shared edges so
//! mazes connect across chunk seams.

use crate::game::{ChunkArchetype, ChunkCoord, ChunkGrid, LocalCoord, Tile};
use crate::generation::maze::{CarveReport, MazeCarver};
use crate::utils::reachability::validate_maze_connectivity;
use crate::{GenerationConfig, Generator, ThicketError, ThicketResult};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

/// Builds raw tile grids for both chunk archetypes.
#[derive(Debug, Clone)]
pub struct ChunkFactory {
    chunk_size: usize,
    num_tree_variants: u8,
    carver: MazeCarver,
}

impl ChunkFactory {
    /// Creates a factory; even sizes are bumped to the next odd size.
    pub fn new(chunk_size: usize, num_tree_variants: u8, carver: MazeCarver) -> Self {
        let chunk_size = if chunk_size % 2 == 0 {
            chunk_size + 1
        } else {
            chunk_size
        };
        Self {
            chunk_size,
            num_tree_variants: num_tree_variants.max(1),
            carver,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(
            config.effective_chunk_size(),
            config.num_tree_variants,
            MazeCarver::from_config(config),
        )
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn carver(&self) -> &MazeCarver {
        &self.carver
    }

    /// A random tree tile.
    pub fn make_tree<R: Rng>(&self, rng: &mut R) -> Tile {
        Tile::Tree {
            variant: rng.gen_range(0..self.num_tree_variants),
        }
    }

    /// A grid of trees with random variants.
    pub fn tree_grid<R: Rng>(&self, rng: &mut R) -> ChunkGrid {
        let mut grid = ChunkGrid::filled(self.chunk_size, Tile::Tree { variant: 0 });
        for y in 0..self.chunk_size {
            for x in 0..self.chunk_size {
                grid.set_if_in_bounds(x as i32, y as i32, self.make_tree(rng));
            }
        }
        grid
    }

    /// A tree grid carved into a maze from `start` (the centre if `None`).
    pub fn maze_chunk<R: Rng>(&self, start: Option<LocalCoord>, rng: &mut R) -> (ChunkGrid, CarveReport) {
        let center = self.chunk_size / 2;
        let start = start.unwrap_or(LocalCoord::new(center, center));
        let mut grid = self.tree_grid(rng);
        let report = self.carver.carve(&mut grid, start, rng);
        (grid, report)
    }

    /// An all-clear grid with up to `N / 8` trees scattered in the interior.
    pub fn clearing_chunk<R: Rng>(&self, rng: &mut R) -> ChunkGrid {
        let size = self.chunk_size;
        let mut grid = ChunkGrid::filled(size, Tile::Clear);
        let num_trees = rng.gen_range(0..=size / 8);
        for _ in 0..num_trees {
            let x = rng.gen_range(2..=size - 3);
            let y = rng.gen_range(2..=size - 3);
            let tree = self.make_tree(rng);
            grid.set_if_in_bounds(x as i32, y as i32, tree);
        }
        grid
    }
}

impl Generator<ChunkGrid> for ChunkFactory {
    fn generate(&self, _config: &GenerationConfig, rng: &mut StdRng) -> ThicketResult<ChunkGrid> {
        let (grid, _) = self.maze_chunk(None, rng);
        Ok(grid)
    }

    fn validate(&self, grid: &ChunkGrid, _config: &GenerationConfig) -> ThicketResult<()> {
        if grid.size() != self.chunk_size {
            return Err(ThicketError::GenerationFailed(format!(
                "Chunk is {} wide, expected {}",
                grid.size(),
                self.chunk_size
            )));
        }
        if grid.count_where(Tile::is_floor) == 0 {
            return Err(ThicketError::GenerationFailed(
                "Chunk has no walkable tiles".to_string(),
            ));
        }
        let center = self.chunk_size / 2;
        validate_maze_connectivity(grid, LocalCoord::new(center, center))
    }

    fn generator_type(&self) -> &'static str {
        "ChunkFactory"
    }
}

/// Already generated orthogonal neighbours of the chunk being built.
#[derive(Debug, Clone, Copy, Default)]
pub struct Neighbors<'a> {
    pub west: Option<&'a ChunkGrid>,
    pub east: Option<&'a ChunkGrid>,
    pub north: Option<&'a ChunkGrid>,
    pub south: Option<&'a ChunkGrid>,
}

impl Neighbors<'_> {
    pub fn is_empty(&self) -> bool {
        self.west.is_none() && self.east.is_none() && self.north.is_none() && self.south.is_none()
    }
}

/// Output of [`ChunkGenerator::generate_chunk`].
#[derive(Debug, Clone)]
pub struct GeneratedChunk {
    pub grid: ChunkGrid,
    pub archetype: ChunkArchetype,
    /// Where carving started (mazes only)
    pub start: Option<LocalCoord>,
    /// Carving statistics (mazes only)
    pub report: Option<CarveReport>,
}

/// Chooses the archetype and connectivity of each new chunk.
#[derive(Debug, Clone)]
pub struct ChunkGenerator {
    factory: ChunkFactory,
    clearing_probability: f64,
}

impl ChunkGenerator {
    pub fn new(factory: ChunkFactory, clearing_probability: f64) -> Self {
        Self {
            factory,
            clearing_probability,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(ChunkFactory::from_config(config), config.clearing_probability)
    }

    pub fn chunk_size(&self) -> usize {
        self.factory.chunk_size()
    }

    pub fn factory(&self) -> &ChunkFactory {
        &self.factory
    }

    /// Generates the chunk at `coord`.
    ///
    /// The origin chunk is always a maze carved from its centre so the spawn
    /// cell is walkable.
    pub fn generate_chunk<R: Rng>(&self, coord: ChunkCoord, neighbors: &Neighbors<'_>, rng: &mut R) -> GeneratedChunk {
        let is_origin = coord == ChunkCoord::new(0, 0);
        let archetype = if !is_origin && rng.gen::<f64>() < self.clearing_probability {
            ChunkArchetype::Clearing
        } else {
            ChunkArchetype::Maze
        };

        let chunk = match archetype {
            ChunkArchetype::Clearing => GeneratedChunk {
                grid: self.factory.clearing_chunk(rng),
                archetype,
                start: None,
                report: None,
            },
            ChunkArchetype::Maze => {
                let start = if is_origin {
                    self.center()
                } else {
                    self.start_position(neighbors)
                };
                let (mut grid, report) = self.factory.maze_chunk(Some(start), rng);
                self.connect_to_neighbors(&mut grid, neighbors, rng);
                GeneratedChunk {
                    grid,
                    archetype,
                    start: Some(start),
                    report: Some(report),
                }
            }
        };

        debug!(
            "Generated {:?} chunk ({}, {}) with {} grass tiles",
            chunk.archetype,
            coord.x,
            coord.y,
            chunk.grid.count_where(|tile| tile == Tile::Grass)
        );
        chunk
    }

    fn center(&self) -> LocalCoord {
        let center = self.chunk_size() / 2;
        LocalCoord::new(center, center)
    }

    /// Edge midpoint facing the first existing neighbour (west, east, north,
    /// south), or the centre when the chunk has no neighbours yet.
    pub fn start_position(&self, neighbors: &Neighbors<'_>) -> LocalCoord {
        let n = self.chunk_size();
        let c = n / 2;
        if neighbors.west.is_some() {
            LocalCoord::new(1, c)
        } else if neighbors.east.is_some() {
            LocalCoord::new(n - 2, c)
        } else if neighbors.north.is_some() {
            LocalCoord::new(c, 1)
        } else if neighbors.south.is_some() {
            LocalCoord::new(c, n - 2)
        } else {
            self.center()
        }
    }

    /// Punches a grass band through the two boundary lines facing every
    /// neighbour whose cell next to the shared edge is grass.
    pub fn connect_to_neighbors<R: Rng>(&self, grid: &mut ChunkGrid, neighbors: &Neighbors<'_>, rng: &mut R) {
        let n = self.chunk_size() as i32;
        let c = n / 2;

        // (neighbour, neighbour cell checked, boundary lines, horizontal band)
        let sides = [
            (neighbors.west, (n - 2, c), [0, 1], true),
            (neighbors.east, (1, c), [n - 1, n - 2], true),
            (neighbors.north, (c, n - 2), [0, 1], false),
            (neighbors.south, (c, 1), [n - 1, n - 2], false),
        ];

        for (neighbor, (check_x, check_y), lines, across_columns) in sides {
            let Some(neighbor) = neighbor else {
                continue;
            };
            if !neighbor.is_grass(check_x, check_y) {
                continue;
            }

            let half = (self.factory.carver().random_width(rng) / 2) as i32;
            for offset in -half..=half {
                for line in lines {
                    if across_columns {
                        grid.set_if_in_bounds(line, c + offset, Tile::Grass);
                    } else {
                        grid.set_if_in_bounds(c + offset, line, Tile::Grass);
                    }
                }
            }
        }
    }
}
