use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use crate::behaviour::{Behaviour, BehaviourType};
use crate::entity::{Node, NodeId};
use crate::error::{DwError, DwResult};
use crate::generation::GenerationConfig;
use crate::grid::WorldGrid;

/// The simulation aggregate: terrain plus the ordered node population.
///
/// The grid is shared as an immutable snapshot. Readers such as navigators
/// hold an `Arc` clone; any mutation through [`World::grid_mut`] copies the
/// grid first if a snapshot is still out, so readers never observe a
/// half-refined terrain.
#[derive(Debug, Clone)]
pub struct World {
    grid: Arc<WorldGrid>,
    nodes: Vec<Node>,
}

impl World {
    /// Wrap an existing grid with an empty population.
    pub fn new(grid: WorldGrid) -> Self {
        Self {
            grid: Arc::new(grid),
            nodes: Vec::new(),
        }
    }

    /// Generate a grid from `config` and wrap it.
    pub fn generate<R: Rng + ?Sized>(config: GenerationConfig, rng: &mut R) -> DwResult<Self> {
        Ok(Self::new(WorldGrid::new(config, rng)?))
    }

    // -----------------------------------------------------------------------
    // Terrain
    // -----------------------------------------------------------------------

    /// Read access to the current grid.
    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    /// A shareable snapshot of the current grid.
    pub fn grid_snapshot(&self) -> Arc<WorldGrid> {
        Arc::clone(&self.grid)
    }

    /// Mutable access to the grid, detaching it from outstanding snapshots.
    pub fn grid_mut(&mut self) -> &mut WorldGrid {
        Arc::make_mut(&mut self.grid)
    }

    /// Regenerate the terrain from its current configuration.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.grid_mut().regenerate(rng);
    }

    /// One refinement pass. Returns whether any cell changed.
    pub fn refine(&mut self) -> bool {
        let changed = self.grid_mut().refine();
        debug!(generation = self.grid.generation(), changed, "refined world grid");
        changed
    }

    /// Grid dimension.
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    // -----------------------------------------------------------------------
    // Nodes
    // -----------------------------------------------------------------------

    /// Append a node. Returns its ID.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id();
        self.nodes.push(node);
        id
    }

    /// Create an empty node and return its ID.
    pub fn spawn(&mut self) -> NodeId {
        self.add_node(Node::new())
    }

    /// Look up a node by ID.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    /// Look up a node by ID for mutation.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id() == id)
    }

    /// Attach a behaviour to the node `id`, replacing any of the same type.
    pub fn add_behaviour(
        &mut self,
        id: NodeId,
        behaviour: impl Into<Behaviour>,
    ) -> DwResult<Option<Behaviour>> {
        let node = self.node_mut(id).ok_or(DwError::NodeNotFound(id))?;
        Ok(node.add_behaviour(behaviour))
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All nodes in creation order, mutable.
    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Nodes carrying a behaviour of type `tag`, in creation order.
    pub fn nodes_with(&self, tag: BehaviourType) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.has_behaviour(tag))
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
