//! Behavioural facets that can be attached to a [`Node`](crate::entity::Node).
//!
//! The set is closed: every facet is a variant of [`Behaviour`] and is keyed
//! by its [`BehaviourType`]. Facets are plain values; systems replace them
//! wholesale instead of mutating them in place.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Vector, degrees_to_radians};

/// Tag identifying a behaviour variant. A node holds at most one per tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviourType {
    /// Has a location.
    Positioned,
    /// Has a facing.
    Oriented,
    /// Has physical extent and mass.
    Sized,
    /// Moves under kinematic integration.
    Mover,
}

impl fmt::Display for BehaviourType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positioned => write!(f, "positioned"),
            Self::Oriented => write!(f, "oriented"),
            Self::Sized => write!(f, "sized"),
            Self::Mover => write!(f, "mover"),
        }
    }
}

/// A fixed location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Positioned {
    /// World-space centre.
    pub center: Vector,
}

/// A facing, in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Oriented {
    /// Bearing in radians.
    pub bearing: f64,
}

impl Oriented {
    /// Build from a bearing in degrees.
    pub fn from_degrees(degrees: f64) -> Self {
        Self {
            bearing: degrees_to_radians(degrees),
        }
    }
}

/// Physical extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Collision radius.
    pub radius: f64,
    /// Mass, for systems that need it.
    pub mass: f64,
}

/// Linear kinematic state with speed and acceleration limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    /// Current position.
    pub position: Vector,
    /// Current velocity.
    pub velocity: Vector,
    /// Current acceleration.
    pub acceleration: Vector,
    /// Terminal speed.
    pub max_velocity: f64,
    /// Acceleration limit for steering code that sets `acceleration`.
    /// Integration applies `acceleration` as given and does not clamp it.
    pub max_acceleration: f64,
}

impl Mover {
    /// A mover at rest at `position`.
    pub fn at(position: Vector, max_velocity: f64, max_acceleration: f64) -> Self {
        Self {
            position,
            velocity: Vector::ZERO,
            acceleration: Vector::ZERO,
            max_velocity,
            max_acceleration,
        }
    }

    /// Set the velocity.
    pub fn with_velocity(mut self, velocity: Vector) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the acceleration.
    pub fn with_acceleration(mut self, acceleration: Vector) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Current speed.
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }
}

/// A behavioural facet together with its payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Behaviour {
    /// See [`Positioned`].
    Positioned(Positioned),
    /// See [`Oriented`].
    Oriented(Oriented),
    /// See [`Body`].
    Sized(Body),
    /// See [`Mover`].
    Mover(Mover),
}

impl Behaviour {
    /// The tag this behaviour is stored under.
    pub fn behaviour_type(&self) -> BehaviourType {
        match self {
            Self::Positioned(_) => BehaviourType::Positioned,
            Self::Oriented(_) => BehaviourType::Oriented,
            Self::Sized(_) => BehaviourType::Sized,
            Self::Mover(_) => BehaviourType::Mover,
        }
    }
}

impl From<Positioned> for Behaviour {
    fn from(value: Positioned) -> Self {
        Self::Positioned(value)
    }
}

impl From<Oriented> for Behaviour {
    fn from(value: Oriented) -> Self {
        Self::Oriented(value)
    }
}

impl From<Body> for Behaviour {
    fn from(value: Body) -> Self {
        Self::Sized(value)
    }
}

impl From<Mover> for Behaviour {
    fn from(value: Mover) -> Self {
        Self::Mover(value)
    }
}
