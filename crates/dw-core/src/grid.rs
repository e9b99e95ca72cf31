use std::collections::HashMap;

use rand::Rng;
use tracing::debug;

use crate::error::{DwError, DwResult};
use crate::generation::{FillMode, GenerationConfig};
use crate::geometry::Point;
use crate::random::{random_int, random_probability};
use crate::terrain::{TerrainType, WorldCell};

/// Wall count in a 3x3 block at or above which a cell becomes wall on refinement.
pub const WALL_THRESHOLD: usize = 5;

/// Square terrain grid with procedural generation and adjacency queries.
///
/// Cells are stored row-major. `Point::x` is the column and `Point::y` the
/// row. Every call to [`WorldGrid::generate`] and every [`WorldGrid::refine`]
/// that changes a cell bumps the generation stamp, so readers holding a
/// snapshot can tell which version of the terrain they saw.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldGrid {
    size: usize,
    has_bounding_wall: bool,
    cells: Vec<WorldCell>,
    config: GenerationConfig,
    generation: u64,
}

impl WorldGrid {
    /// Build and generate a grid from `config`.
    pub fn new<R: Rng + ?Sized>(config: GenerationConfig, rng: &mut R) -> DwResult<Self> {
        config.validate()?;
        let mut grid = Self {
            size: config.size,
            has_bounding_wall: config.with_bounding_wall,
            cells: Vec::new(),
            config,
            generation: 0,
        };
        grid.fill(rng);
        Ok(grid)
    }

    /// Build a grid from an ASCII map.
    ///
    /// The map must have `n` rows of exactly `n` characters. The grid is
    /// generated with the default all-rock fill and no bounding wall, then
    /// every non-blank character becomes a wall.
    pub fn from_ascii<S: AsRef<str>>(rows: &[S]) -> DwResult<Self> {
        let size = rows.len();
        let config = GenerationConfig::new(size);
        config.validate()?;
        let mut grid = Self {
            size,
            has_bounding_wall: false,
            cells: vec![WorldCell::ROCK; size * size],
            config,
            generation: 1,
        };
        grid.overlay_ascii(rows)?;
        Ok(grid)
    }

    /// Overwrite every cell whose map character is non-blank with wall.
    ///
    /// Terrain under blank characters is left untouched. The map must match
    /// the grid's dimensions; on mismatch nothing is modified.
    pub fn overlay_ascii<S: AsRef<str>>(&mut self, rows: &[S]) -> DwResult<()> {
        if rows.len() != self.size {
            return Err(DwError::config(format!(
                "ASCII map must have {} rows, got {}",
                self.size,
                rows.len()
            )));
        }
        for (row, line) in rows.iter().enumerate() {
            let width = line.as_ref().chars().count();
            if width != self.size {
                return Err(DwError::config(format!(
                    "ASCII map row {row} must have {} characters, got {width}",
                    self.size
                )));
            }
        }

        let mut changed = false;
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.as_ref().chars().enumerate() {
                let index = row * self.size + col;
                if ch != ' ' && self.cells[index] != WorldCell::WALL {
                    self.cells[index] = WorldCell::WALL;
                    changed = true;
                }
            }
        }
        if changed {
            self.generation += 1;
        }
        Ok(())
    }

    /// Regenerate with a new configuration. The grid may change size.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        config: GenerationConfig,
        rng: &mut R,
    ) -> DwResult<()> {
        config.validate()?;
        self.size = config.size;
        self.has_bounding_wall = config.with_bounding_wall;
        self.config = config;
        self.fill(rng);
        Ok(())
    }

    /// Regenerate with the configuration the grid was last generated from.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.fill(rng);
    }

    fn fill<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let count = self.size * self.size;
        self.cells = match self.config.fill {
            FillMode::Uniform(terrain) => vec![WorldCell::new(terrain); count],
            FillMode::RatioWeighted(weights) => match weights.normalized() {
                Ok(ratios) => (0..count)
                    .map(|_| WorldCell::new(ratios.terrain_for(random_probability(rng))))
                    .collect(),
                // validated on entry; fall back to a neutral floor
                Err(_) => vec![WorldCell::ROCK; count],
            },
            FillMode::FloorWall { floor_probability } => (0..count)
                .map(|_| {
                    if random_probability(rng) < floor_probability {
                        WorldCell::ROCK
                    } else {
                        WorldCell::WALL
                    }
                })
                .collect(),
        };
        self.apply_bounding_wall();
        self.generation += 1;
        debug!(
            size = self.size,
            generation = self.generation,
            bounding_wall = self.has_bounding_wall,
            "grid generated"
        );
    }

    fn apply_bounding_wall(&mut self) {
        if !self.has_bounding_wall || self.size == 0 {
            return;
        }
        let last = self.size - 1;
        for i in 0..self.size {
            self.cells[i] = WorldCell::WALL;
            self.cells[last * self.size + i] = WorldCell::WALL;
            self.cells[i * self.size] = WorldCell::WALL;
            self.cells[i * self.size + last] = WorldCell::WALL;
        }
    }

    /// Run one cellular-automaton smoothing pass.
    ///
    /// Every interior cell becomes wall if at least [`WALL_THRESHOLD`] of the
    /// cells in its 3x3 block (itself included) are wall, rock otherwise.
    /// All cells are evaluated against the grid as it was before the pass.
    /// Border cells are never touched. Returns `true` if any cell changed.
    pub fn refine(&mut self) -> bool {
        if self.size < 3 {
            return false;
        }
        let before = self.cells.clone();
        let mut changed = false;
        for row in 1..self.size - 1 {
            for col in 1..self.size - 1 {
                let walls = count_walls_in_block(&before, self.size, row, col);
                let evolved = if walls >= WALL_THRESHOLD {
                    WorldCell::WALL
                } else {
                    WorldCell::ROCK
                };
                let index = row * self.size + col;
                if self.cells[index] != evolved {
                    self.cells[index] = evolved;
                    changed = true;
                }
            }
        }
        if changed {
            self.generation += 1;
        }
        debug!(changed, generation = self.generation, "grid refined");
        changed
    }

    /// Refine until a pass changes nothing or `max_passes` is reached.
    /// Returns the number of passes run.
    pub fn refine_until_stable(&mut self, max_passes: usize) -> usize {
        let mut passes = 0;
        while passes < max_passes {
            passes += 1;
            if !self.refine() {
                break;
            }
        }
        passes
    }

    /// Neighbours of `centre` that a walker may step onto.
    ///
    /// Orthogonal neighbours are included when they are not wall. A diagonal
    /// is included only when it and both orthogonals flanking it are not
    /// wall, so paths never squeeze through a wall corner. Out-of-bounds
    /// cells count as wall.
    pub fn adjacent_reachable_cells(&self, centre: Point) -> Vec<Point> {
        let north = centre.offset(0, -1);
        let south = centre.offset(0, 1);
        let east = centre.offset(1, 0);
        let west = centre.offset(-1, 0);
        let north_east = centre.offset(1, -1);
        let north_west = centre.offset(-1, -1);
        let south_east = centre.offset(1, 1);
        let south_west = centre.offset(-1, 1);

        // Coordinates past the i32 range count as wall like any other
        // out-of-bounds cell.
        let open = |point: Option<Point>| point.is_some_and(|p| !self.is_wall(p));
        let north_free = open(north);
        let south_free = open(south);
        let east_free = open(east);
        let west_free = open(west);

        let candidates = [
            (north, north_free),
            (south, south_free),
            (east, east_free),
            (west, west_free),
            (north_east, north_free && east_free && open(north_east)),
            (north_west, north_free && west_free && open(north_west)),
            (south_east, south_free && east_free && open(south_east)),
            (south_west, south_free && west_free && open(south_west)),
        ];
        candidates
            .into_iter()
            .filter_map(|(point, free)| point.filter(|_| free))
            .collect()
    }

    /// Grid dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether generation forces a wall ring on the border.
    pub fn has_bounding_wall(&self) -> bool {
        self.has_bounding_wall
    }

    /// The configuration used by the last generation pass.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Monotonic stamp bumped by every generation and every changing refinement.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The cell at `(row, col)`, or `None` when out of bounds.
    pub fn grid_cell(&self, row: usize, col: usize) -> Option<WorldCell> {
        if row < self.size && col < self.size {
            Some(self.cells[row * self.size + col])
        } else {
            None
        }
    }

    /// The cell at `point`, or `None` when out of bounds.
    pub fn cell(&self, point: Point) -> Option<WorldCell> {
        self.index_of(point).map(|i| self.cells[i])
    }

    /// Replace the terrain at `point`. Returns the previous terrain, or
    /// `None` (and changes nothing) when out of bounds.
    pub fn set_terrain(&mut self, point: Point, terrain: TerrainType) -> Option<TerrainType> {
        let index = self.index_of(point)?;
        let previous = self.cells[index].terrain;
        if previous != terrain {
            self.cells[index] = WorldCell::new(terrain);
            self.generation += 1;
        }
        Some(previous)
    }

    /// Returns `true` if `point` lies inside the grid.
    pub fn is_valid_cell(&self, point: Point) -> bool {
        self.index_of(point).is_some()
    }

    /// Returns `true` if `point` is wall or out of bounds.
    pub fn is_wall(&self, point: Point) -> bool {
        self.cell(point).is_none_or(|c| c.terrain.is_wall())
    }

    /// Returns `true` if `point` lies on the outermost ring of the grid.
    pub fn is_bounding_wall(&self, point: Point) -> bool {
        let last = self.size as i64 - 1;
        let (x, y) = (i64::from(point.x), i64::from(point.y));
        x == 0 || y == 0 || x == last || y == last
    }

    /// Rows of cells, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[WorldCell]> {
        self.cells.chunks(self.size.max(1))
    }

    /// Render one string per row using [`TerrainType::glyph`].
    pub fn to_ascii(&self) -> Vec<String> {
        self.rows()
            .map(|row| row.iter().map(|c| c.terrain.glyph()).collect())
            .collect()
    }

    /// Number of cells of each terrain.
    pub fn terrain_counts(&self) -> HashMap<TerrainType, usize> {
        let mut counts = HashMap::new();
        for cell in &self.cells {
            *counts.entry(cell.terrain).or_insert(0) += 1;
        }
        counts
    }

    /// A uniformly chosen non-wall cell, or `None` if every cell is wall.
    pub fn random_open_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Point> {
        let open: Vec<Point> = self
            .points()
            .filter(|p| !self.is_wall(*p))
            .collect();
        match open.len() {
            0 => None,
            1 => Some(open[0]),
            n => {
                let index = random_int(rng, 0, n as i64 - 1).ok()?;
                open.get(index as usize).copied()
            }
        }
    }

    /// Every point in the grid, row by row.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        let size = self.size as i32;
        (0..size).flat_map(move |y| (0..size).map(move |x| Point::new(x, y)))
    }

    fn index_of(&self, point: Point) -> Option<usize> {
        let col = usize::try_from(point.x).ok()?;
        let row = usize::try_from(point.y).ok()?;
        (row < self.size && col < self.size).then(|| row * self.size + col)
    }
}

/// Walls in the 3x3 block centred on `(row, col)`, clipped at the grid edge.
fn count_walls_in_block(cells: &[WorldCell], size: usize, row: usize, col: usize) -> usize {
    let rows = row.saturating_sub(1)..=(row + 1).min(size - 1);
    rows.flat_map(|r| {
        let cols = col.saturating_sub(1)..=(col + 1).min(size - 1);
        cols.map(move |c| r * size + c)
    })
    .filter(|&i| cells[i].terrain.is_wall())
    .count()
}
