use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::behaviour::{Behaviour, BehaviourType, Body, Mover, Oriented, Positioned};

/// Unique identifier for every node in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Generate a new random node ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// A simulated entity: an identity plus at most one behaviour per type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    behaviours: HashMap<BehaviourType, Behaviour>,
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl Node {
    /// Create a node with a random ID and no behaviours.
    pub fn new() -> Self {
        Self::with_id(NodeId::new())
    }

    /// Create a node with a pre-assigned ID.
    pub fn with_id(id: NodeId) -> Self {
        Self {
            id,
            behaviours: HashMap::new(),
        }
    }

    /// This node's identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Attach a behaviour, replacing any existing one of the same type.
    /// Returns the replaced behaviour.
    pub fn add_behaviour(&mut self, behaviour: impl Into<Behaviour>) -> Option<Behaviour> {
        let behaviour = behaviour.into();
        self.behaviours
            .insert(behaviour.behaviour_type(), behaviour)
    }

    /// Builder form of [`Node::add_behaviour`].
    pub fn with(mut self, behaviour: impl Into<Behaviour>) -> Self {
        self.add_behaviour(behaviour);
        self
    }

    /// The behaviour stored under `tag`.
    pub fn behaviour(&self, tag: BehaviourType) -> Option<&Behaviour> {
        self.behaviours.get(&tag)
    }

    /// Returns `true` if a behaviour of type `tag` is attached.
    pub fn has_behaviour(&self, tag: BehaviourType) -> bool {
        self.behaviours.contains_key(&tag)
    }

    /// Detach and return the behaviour stored under `tag`.
    pub fn remove_behaviour(&mut self, tag: BehaviourType) -> Option<Behaviour> {
        self.behaviours.remove(&tag)
    }

    /// All attached behaviours, in no particular order.
    pub fn behaviours(&self) -> impl Iterator<Item = &Behaviour> {
        self.behaviours.values()
    }

    /// The [`Positioned`] facet, if attached.
    pub fn positioned(&self) -> Option<Positioned> {
        match self.behaviour(BehaviourType::Positioned)? {
            Behaviour::Positioned(p) => Some(*p),
            _ => None,
        }
    }

    /// The [`Oriented`] facet, if attached.
    pub fn oriented(&self) -> Option<Oriented> {
        match self.behaviour(BehaviourType::Oriented)? {
            Behaviour::Oriented(o) => Some(*o),
            _ => None,
        }
    }

    /// The [`Body`] facet, if attached.
    pub fn body(&self) -> Option<Body> {
        match self.behaviour(BehaviourType::Sized)? {
            Behaviour::Sized(b) => Some(*b),
            _ => None,
        }
    }

    /// The [`Mover`] facet, if attached.
    pub fn mover(&self) -> Option<Mover> {
        match self.behaviour(BehaviourType::Mover)? {
            Behaviour::Mover(m) => Some(*m),
            _ => None,
        }
    }
}
