//! Generation configuration: grid size, bounding wall, and fill mode.

use serde::{Deserialize, Serialize};

use crate::error::{DwError, DwResult};
use crate::terrain::TerrainType;

/// Floor probability used when cave generation is requested without one.
pub const DEFAULT_FLOOR_PROBABILITY: f64 = 0.45;

/// Relative, non-negative weights for the ratio-weighted fill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainWeights {
    /// Weight of water.
    pub water: f64,
    /// Weight of rock.
    pub rock: f64,
    /// Weight of sand.
    pub sand: f64,
    /// Weight of soil.
    pub soil: f64,
}

impl TerrainWeights {
    /// Create a weight set.
    pub fn new(water: f64, rock: f64, sand: f64, soil: f64) -> Self {
        Self {
            water,
            rock,
            sand,
            soil,
        }
    }

    /// Reject negative, non-finite, or all-zero weights.
    pub fn validate(&self) -> DwResult<()> {
        let named = [
            ("water", self.water),
            ("rock", self.rock),
            ("sand", self.sand),
            ("soil", self.soil),
        ];
        for (name, weight) in named {
            if !weight.is_finite() || weight < 0.0 {
                return Err(DwError::config(format!(
                    "{name} weight must be a non-negative number, got {weight}"
                )));
            }
        }
        if self.total() <= 0.0 {
            return Err(DwError::config("terrain weights must not all be zero"));
        }
        Ok(())
    }

    /// Sum of all four weights.
    pub fn total(&self) -> f64 {
        self.water + self.rock + self.sand + self.soil
    }

    /// Scale the weights so they sum to 1.
    pub fn normalized(&self) -> DwResult<TerrainRatios> {
        self.validate()?;
        let total = self.total();
        Ok(TerrainRatios {
            water: self.water / total,
            rock: self.rock / total,
            sand: self.sand / total,
            soil: self.soil / total,
        })
    }
}

/// Normalized terrain fractions. The four fields sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainRatios {
    /// Fraction of water.
    pub water: f64,
    /// Fraction of rock.
    pub rock: f64,
    /// Fraction of sand.
    pub sand: f64,
    /// Fraction of soil.
    pub soil: f64,
}

impl TerrainRatios {
    /// The fraction assigned to `terrain`. Walls are never drawn by the ratio fill.
    pub fn get(&self, terrain: TerrainType) -> f64 {
        match terrain {
            TerrainType::Water => self.water,
            TerrainType::Rock => self.rock,
            TerrainType::Sand => self.sand,
            TerrainType::Soil => self.soil,
            TerrainType::Wall => 0.0,
        }
    }

    /// Map a uniform draw `r` in `[0, 1]` onto a terrain.
    ///
    /// Bands are laid out water, rock, sand, soil. Each band includes its
    /// lower edge and excludes its upper edge; soil absorbs everything from
    /// its lower edge up to and including 1.
    pub fn terrain_for(&self, r: f64) -> TerrainType {
        let mut upper = self.water;
        if r < upper {
            return TerrainType::Water;
        }
        upper += self.rock;
        if r < upper {
            return TerrainType::Rock;
        }
        upper += self.sand;
        if r < upper {
            return TerrainType::Sand;
        }
        TerrainType::Soil
    }
}

/// How cells are filled before the bounding wall is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillMode {
    /// Every cell gets the same terrain.
    Uniform(TerrainType),
    /// Each cell draws a terrain from normalized weights.
    RatioWeighted(TerrainWeights),
    /// Each cell is rock with `floor_probability`, wall otherwise. Seeds
    /// cellular-automaton refinement.
    FloorWall {
        /// Probability of a cell being floor.
        floor_probability: f64,
    },
}

impl Default for FillMode {
    fn default() -> Self {
        Self::Uniform(TerrainType::Rock)
    }
}

/// Everything needed to (re)generate a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGenerationConfig", into = "RawGenerationConfig")]
pub struct GenerationConfig {
    /// Grid dimension; the grid is `size x size`.
    pub size: usize,
    /// Force every border cell to wall after filling.
    pub with_bounding_wall: bool,
    /// The fill applied to every cell.
    pub fill: FillMode,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            size: 10,
            with_bounding_wall: false,
            fill: FillMode::default(),
        }
    }
}

impl GenerationConfig {
    /// A config of the given size with the default (all-rock) fill.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Set the grid dimension.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Enable or disable the bounding wall.
    pub fn with_bounding_wall(mut self, enabled: bool) -> Self {
        self.with_bounding_wall = enabled;
        self
    }

    /// Use the ratio-weighted fill.
    pub fn with_terrain_weights(mut self, weights: TerrainWeights) -> Self {
        self.fill = FillMode::RatioWeighted(weights);
        self
    }

    /// Use the binary floor/wall fill.
    pub fn with_floor_probability(mut self, floor_probability: f64) -> Self {
        self.fill = FillMode::FloorWall { floor_probability };
        self
    }

    /// Fill every cell with one terrain.
    pub fn with_uniform(mut self, terrain: TerrainType) -> Self {
        self.fill = FillMode::Uniform(terrain);
        self
    }

    /// Check size, weights, and probability ranges.
    pub fn validate(&self) -> DwResult<()> {
        if self.size == 0 {
            return Err(DwError::config("grid size must be at least 1"));
        }
        match self.fill {
            FillMode::Uniform(_) => Ok(()),
            FillMode::RatioWeighted(weights) => weights.validate(),
            FillMode::FloorWall { floor_probability } => {
                if (0.0..=1.0).contains(&floor_probability) {
                    Ok(())
                } else {
                    Err(DwError::config(format!(
                        "floor probability must lie in [0, 1], got {floor_probability}"
                    )))
                }
            }
        }
    }

    /// Parse and validate a JSON generation config.
    ///
    /// The fill mode is chosen by which of `floor_probability`,
    /// `terrain_weights`, or `terrain` is present; supplying more than one
    /// is an error.
    pub fn from_json(json: &str) -> DwResult<Self> {
        serde_json::from_str(json).map_err(|e| DwError::config(e.to_string()))
    }
}

/// Flat wire shape of [`GenerationConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGenerationConfig {
    size: usize,
    #[serde(default)]
    with_bounding_wall: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    floor_probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    terrain_weights: Option<TerrainWeights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    terrain: Option<TerrainType>,
}

impl TryFrom<RawGenerationConfig> for GenerationConfig {
    type Error = DwError;

    fn try_from(raw: RawGenerationConfig) -> DwResult<Self> {
        let fill = match (raw.floor_probability, raw.terrain_weights, raw.terrain) {
            (Some(floor_probability), None, None) => FillMode::FloorWall { floor_probability },
            (None, Some(weights), None) => FillMode::RatioWeighted(weights),
            (None, None, Some(terrain)) => FillMode::Uniform(terrain),
            (None, None, None) => FillMode::default(),
            _ => {
                return Err(DwError::config(
                    "supply at most one of floor_probability, terrain_weights, terrain",
                ));
            }
        };
        let config = GenerationConfig {
            size: raw.size,
            with_bounding_wall: raw.with_bounding_wall,
            fill,
        };
        config.validate()?;
        Ok(config)
    }
}

impl From<GenerationConfig> for RawGenerationConfig {
    fn from(config: GenerationConfig) -> Self {
        let mut raw = RawGenerationConfig {
            size: config.size,
            with_bounding_wall: config.with_bounding_wall,
            ..Default::default()
        };
        match config.fill {
            FillMode::Uniform(terrain) => raw.terrain = Some(terrain),
            FillMode::RatioWeighted(weights) => raw.terrain_weights = Some(weights),
            FillMode::FloorWall { floor_probability } => {
                raw.floor_probability = Some(floor_probability)
            }
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_terrain_ratios() {
        let ratios = TerrainWeights::new(200.0, 50.0, 25.0, 25.0)
            .normalized()
            .unwrap();
        let tolerance = 1e-4;
        assert!((ratios.water - 0.6667).abs() < tolerance);
        assert!((ratios.rock - 0.1667).abs() < tolerance);
        assert!((ratios.sand - 0.0833).abs() < tolerance);
        assert!((ratios.soil - 0.0833).abs() < tolerance);
        let total = ratios.water + ratios.rock + ratios.sand + ratios.soil;
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn terrain_for_r_value_boundaries() {
        let ratios = TerrainWeights::new(60.0, 20.0, 10.0, 10.0)
            .normalized()
            .unwrap();
        let table = [
            (0.0, TerrainType::Water),
            (0.59, TerrainType::Water),
            (0.60, TerrainType::Rock),
            (0.61, TerrainType::Rock),
            (0.79, TerrainType::Rock),
            (0.80, TerrainType::Sand),
            (0.95, TerrainType::Soil),
            (1.0, TerrainType::Soil),
        ];
        for (r, expected) in table {
            assert_eq!(ratios.terrain_for(r), expected, "r = {r}");
        }
    }

    #[test]
    fn zero_weight_band_is_skipped() {
        let ratios = TerrainWeights::new(0.0, 1.0, 0.0, 0.0).normalized().unwrap();
        assert_eq!(ratios.terrain_for(0.0), TerrainType::Rock);
        assert_eq!(ratios.terrain_for(0.999), TerrainType::Rock);
        assert!(ratios.get(TerrainType::Wall).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_weights_rejected() {
        assert!(matches!(
            TerrainWeights::new(0.0, 0.0, 0.0, 0.0).normalized(),
            Err(DwError::Configuration(_))
        ));
        assert!(TerrainWeights::new(-1.0, 2.0, 0.0, 0.0).validate().is_err());
        assert!(TerrainWeights::new(f64::NAN, 2.0, 0.0, 0.0).validate().is_err());
    }

    #[test]
    fn probability_range_checked() {
        assert!(
            GenerationConfig::new(5)
                .with_floor_probability(1.5)
                .validate()
                .is_err()
        );
        assert!(
            GenerationConfig::new(5)
                .with_floor_probability(0.45)
                .validate()
                .is_ok()
        );
        assert!(GenerationConfig::new(0).validate().is_err());
    }

    #[test]
    fn builder_selects_last_fill() {
        let config = GenerationConfig::new(8)
            .with_floor_probability(0.3)
            .with_terrain_weights(TerrainWeights::new(1.0, 1.0, 1.0, 1.0))
            .with_bounding_wall(true);
        assert!(matches!(config.fill, FillMode::RatioWeighted(_)));
        assert!(config.with_bounding_wall);
        assert_eq!(config.size, 8);
    }

    #[test]
    fn json_selects_fill_by_field() {
        let cave =
            GenerationConfig::from_json(r#"{"size": 20, "with_bounding_wall": true, "floor_probability": 0.45}"#)
                .unwrap();
        assert_eq!(cave.fill, FillMode::FloorWall { floor_probability: 0.45 });
        assert!(cave.with_bounding_wall);

        let land = GenerationConfig::from_json(
            r#"{"size": 4, "terrain_weights": {"water": 60, "rock": 20, "sand": 10, "soil": 10}}"#,
        )
        .unwrap();
        assert!(matches!(land.fill, FillMode::RatioWeighted(_)));
        assert!(!land.with_bounding_wall);

        let plain = GenerationConfig::from_json(r#"{"size": 3}"#).unwrap();
        assert_eq!(plain.fill, FillMode::Uniform(TerrainType::Rock));
    }

    #[test]
    fn json_rejects_two_fill_modes() {
        let err = GenerationConfig::from_json(
            r#"{"size": 4, "floor_probability": 0.5, "terrain": "sand"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DwError::Configuration(_)));
    }

    #[test]
    fn json_rejects_invalid_values() {
        assert!(GenerationConfig::from_json(r#"{"size": 0}"#).is_err());
        assert!(GenerationConfig::from_json(r#"{"size": 4, "floor_probability": -0.1}"#).is_err());
    }

    #[test]
    fn json_round_trip_keeps_fill() {
        let config = GenerationConfig::new(12)
            .with_bounding_wall(true)
            .with_floor_probability(0.4);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(GenerationConfig::from_json(&json).unwrap(), config);
    }
}
