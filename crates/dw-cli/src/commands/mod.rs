pub mod generate;
pub mod path;
pub mod simulate;

use std::fs;
use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use dw_core::{GenerationConfig, Point, TerrainType, TerrainWeights, WorldGrid};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Options shared by every command that builds a grid.
#[derive(Args, Debug, Clone)]
pub struct GridArgs {
    /// Grid dimension
    #[arg(short, long, default_value = "20")]
    pub size: usize,

    /// RNG seed for deterministic generation
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Force a wall around the border
    #[arg(short, long)]
    pub wall: bool,

    /// Cave seeding: chance of each cell being floor
    #[arg(short, long, conflicts_with = "weights")]
    pub floor_probability: Option<f64>,

    /// Terrain weights as `water,rock,sand,soil`
    #[arg(long, value_parser = parse_weights)]
    pub weights: Option<TerrainWeights>,

    /// Maximum refinement passes after generation
    #[arg(short, long, default_value = "0")]
    pub refine: usize,

    /// Read the generation config from a JSON file
    #[arg(short, long, conflicts_with_all = ["size", "wall", "floor_probability", "weights"])]
    pub config: Option<PathBuf>,

    /// Build from an ASCII map file; non-blank characters become wall
    #[arg(short, long, conflicts_with = "config")]
    pub map: Option<PathBuf>,
}

impl GridArgs {
    /// Seeded generator for this invocation.
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    fn generation_config(&self) -> Result<GenerationConfig, String> {
        if let Some(path) = &self.config {
            let json = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            return GenerationConfig::from_json(&json).map_err(|e| e.to_string());
        }
        let mut config = GenerationConfig::new(self.size).with_bounding_wall(self.wall);
        if let Some(p) = self.floor_probability {
            config = config.with_floor_probability(p);
        }
        if let Some(weights) = self.weights {
            config = config.with_terrain_weights(weights);
        }
        Ok(config)
    }
}

/// Build the grid described by `args`, refined as requested.
pub fn build_grid(args: &GridArgs, rng: &mut StdRng) -> Result<WorldGrid, String> {
    let mut grid = match &args.map {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            let rows: Vec<&str> = text.lines().collect();
            WorldGrid::from_ascii(&rows).map_err(|e| e.to_string())?
        }
        None => WorldGrid::new(args.generation_config()?, rng).map_err(|e| e.to_string())?,
    };
    if args.refine > 0 {
        let passes = grid.refine_until_stable(args.refine);
        tracing::debug!(passes, "refinement finished");
    }
    Ok(grid)
}

/// Parse `x,y` into a point.
pub fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<i32>()
            .map_err(|e| format!("bad coordinate '{v}': {e}"))
    };
    Ok(Point::new(parse(x)?, parse(y)?))
}

/// Parse `water,rock,sand,soil` into terrain weights.
pub fn parse_weights(s: &str) -> Result<TerrainWeights, String> {
    let values = s
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("bad weight '{v}': {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match values.as_slice() {
        [water, rock, sand, soil] => Ok(TerrainWeights::new(*water, *rock, *sand, *soil)),
        _ => Err(format!("expected four weights `water,rock,sand,soil`, got '{s}'")),
    }
}

/// Render one row, colouring each glyph by terrain. `overlay` may replace
/// the glyph of individual columns.
pub fn render_row(
    grid: &WorldGrid,
    row: usize,
    overlay: impl Fn(Point) -> Option<colored::ColoredString>,
) -> String {
    let mut line = String::new();
    for col in 0..grid.size() {
        let point = Point::new(col as i32, row as i32);
        let glyph = match overlay(point) {
            Some(marked) => marked,
            None => match grid.grid_cell(row, col) {
                Some(cell) => colour_terrain(cell.terrain),
                None => " ".normal(),
            },
        };
        line.push_str(&glyph.to_string());
    }
    line
}

fn colour_terrain(terrain: TerrainType) -> colored::ColoredString {
    let glyph = terrain.glyph().to_string();
    match terrain {
        TerrainType::Water => glyph.blue(),
        TerrainType::Soil => glyph.green(),
        TerrainType::Sand => glyph.yellow(),
        TerrainType::Rock => glyph.normal(),
        TerrainType::Wall => glyph.bright_black(),
    }
}
