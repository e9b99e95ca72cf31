use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    /// Open water.
    Water,
    /// Farmable soil.
    Soil,
    /// Loose sand.
    Sand,
    /// Bare rock. Doubles as "floor" for cave generation.
    Rock,
    /// Impassable wall.
    Wall,
}

impl TerrainType {
    /// Every terrain type, in declaration order.
    pub const ALL: [TerrainType; 5] = [
        TerrainType::Water,
        TerrainType::Soil,
        TerrainType::Sand,
        TerrainType::Rock,
        TerrainType::Wall,
    ];

    /// Single-character glyph used by the ASCII renderer.
    pub fn glyph(self) -> char {
        match self {
            Self::Water => '~',
            Self::Soil => ',',
            Self::Sand => ':',
            Self::Rock => '.',
            Self::Wall => '#',
        }
    }

    /// Returns `true` for [`TerrainType::Wall`].
    pub fn is_wall(self) -> bool {
        self == Self::Wall
    }
}

impl fmt::Display for TerrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Water => write!(f, "water"),
            Self::Soil => write!(f, "soil"),
            Self::Sand => write!(f, "sand"),
            Self::Rock => write!(f, "rock"),
            Self::Wall => write!(f, "wall"),
        }
    }
}

/// One cell of the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldCell {
    /// The cell's terrain.
    pub terrain: TerrainType,
}

impl WorldCell {
    /// Create a cell of the given terrain.
    pub const fn new(terrain: TerrainType) -> Self {
        Self { terrain }
    }

    /// A wall cell.
    pub const WALL: WorldCell = WorldCell::new(TerrainType::Wall);

    /// A rock (floor) cell.
    pub const ROCK: WorldCell = WorldCell::new(TerrainType::Rock);
}

impl From<TerrainType> for WorldCell {
    fn from(terrain: TerrainType) -> Self {
        Self::new(terrain)
    }
}
