//! Directed decay graph over particle row ids.
//!
//! Nodes are every particle of an event; edges run `parent -> daughter`.
//! The input is expected to be acyclic, but nothing here relies on it:
//! ancestor and descendant sets are breadth-first reachable sets, which
//! terminate on any finite graph.

use edmview_foundation::{Error, ParticleId, ParticleSet, Result, RowId};
use petgraph::Direction::{Incoming, Outgoing};
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::{Bfs, IntoNeighbors, Reversed, Visitable};

/// Directed graph of particle ancestry.
#[derive(Clone, Debug, Default)]
pub struct DecayGraph {
    graph: DiGraphMap<ParticleId, ()>,
}

impl DecayGraph {
    /// Builds a graph with `node_count` particle nodes and the given
    /// `parent -> daughter` edges.
    ///
    /// Particles without edges become isolated nodes. Repeated edges collapse
    /// into one.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if an edge endpoint is not below `node_count`.
    pub fn from_edges<I>(node_count: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (ParticleId, ParticleId)>,
    {
        let mut graph = DiGraphMap::with_capacity(node_count, node_count);
        for id in (0..node_count).map_while(ParticleId::from_index) {
            graph.add_node(id);
        }
        for (parent, daughter) in edges {
            for end in [parent, daughter] {
                if end.index() >= node_count {
                    return Err(Error::not_found(end, node_count));
                }
            }
            graph.add_edge(parent, daughter, ());
        }
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built decay graph"
        );
        Ok(Self { graph })
    }

    /// Number of particle nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct `parent -> daughter` edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns true if `id` is a node of the graph.
    #[must_use]
    pub fn contains(&self, id: ParticleId) -> bool {
        self.graph.contains_node(id)
    }

    /// Returns true if the edge `parent -> daughter` exists.
    #[must_use]
    pub fn has_edge(&self, parent: ParticleId, daughter: ParticleId) -> bool {
        self.graph.contains_edge(parent, daughter)
    }

    /// Iterates over all `(parent, daughter)` edges.
    pub fn edges(&self) -> impl Iterator<Item = (ParticleId, ParticleId)> + '_ {
        self.graph.all_edges().map(|(parent, daughter, _)| (parent, daughter))
    }

    /// Direct daughters of a particle, in edge insertion order.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if `id` is not a node.
    pub fn daughters(&self, id: ParticleId) -> Result<Vec<ParticleId>> {
        self.check(id)?;
        Ok(self.graph.neighbors_directed(id, Outgoing).collect())
    }

    /// Direct parents of a particle.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if `id` is not a node.
    pub fn parents(&self, id: ParticleId) -> Result<Vec<ParticleId>> {
        self.check(id)?;
        Ok(self.graph.neighbors_directed(id, Incoming).collect())
    }

    /// All particles with a directed path ending at `id`, excluding `id`.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if `id` is not a node.
    pub fn ancestors(&self, id: ParticleId) -> Result<ParticleSet> {
        self.check(id)?;
        Ok(reachable(Reversed(&self.graph), id))
    }

    /// All particles reachable by a directed path from `id`, excluding `id`.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if `id` is not a node.
    pub fn descendants(&self, id: ParticleId) -> Result<ParticleSet> {
        self.check(id)?;
        Ok(reachable(&self.graph, id))
    }

    /// Particles with no parent edge (primaries and isolated particles).
    pub fn roots(&self) -> impl Iterator<Item = ParticleId> + '_ {
        self.graph
            .nodes()
            .filter(|&n| self.graph.neighbors_directed(n, Incoming).next().is_none())
    }

    /// Particles with no daughter edge (final-state and isolated particles).
    pub fn leaves(&self) -> impl Iterator<Item = ParticleId> + '_ {
        self.graph
            .nodes()
            .filter(|&n| self.graph.neighbors_directed(n, Outgoing).next().is_none())
    }

    fn check(&self, id: ParticleId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(Error::not_found(id, self.node_count()))
        }
    }
}

fn reachable<G>(graph: G, start: ParticleId) -> ParticleSet
where
    G: IntoNeighbors<NodeId = ParticleId> + Visitable<NodeId = ParticleId>,
{
    let mut bfs = Bfs::new(graph, start);
    let mut found = ParticleSet::new();
    while let Some(node) = bfs.next(graph) {
        if node != start {
            found.insert(node);
        }
    }
    found
}
