//! Deterministic ordering of chunk groups.
//!
//! Manifest entries must respect the build graph's dependency structure:
//! a group's chunks come after the chunks of every group it depends on.
//! Groups sort topologically over the parent-to-child edges, with ties
//! between unrelated groups resolved to the host's enumeration order, so
//! identical graphs order identically run after run.

use std::collections::{BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use thiserror::Error;

use crate::graph::{Chunk, ChunkGroup, ChunkGroupId, ChunkId};

/// Errors from chunk-group ordering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
  /// The parent relation contains a cycle. Host build graphs are acyclic,
  /// so this always indicates a corrupted handover.
  #[error("dependency cycle detected among chunk groups")]
  CycleDetected,
  /// A group names a parent the graph does not define.
  #[error("chunk group '{0}' is referenced as a parent but not defined")]
  UnknownGroup(ChunkGroupId),
}

/// The chunk-group dependency graph of one pass.
///
/// Nodes carry the group's position in the input slice; edges run from
/// parent to child.
pub struct GroupDag {
  graph: DiGraph<usize, ()>,
}

impl GroupDag {
  /// Builds the DAG from the pass's chunk groups.
  ///
  /// # Errors
  ///
  /// Returns `UnknownGroup` if a parent reference points outside the group
  /// list.
  pub fn from_groups(groups: &[ChunkGroup]) -> Result<Self, OrderError> {
    let mut graph = DiGraph::with_capacity(groups.len(), groups.len());
    let mut nodes: HashMap<&ChunkGroupId, NodeIndex> = HashMap::with_capacity(groups.len());

    for (position, group) in groups.iter().enumerate() {
      let idx = graph.add_node(position);
      nodes.insert(&group.id, idx);
    }

    for group in groups {
      let child = nodes[&group.id];
      for parent in &group.parents {
        let Some(&parent_idx) = nodes.get(parent) else {
          return Err(OrderError::UnknownGroup(parent.clone()));
        };
        graph.add_edge(parent_idx, child, ());
      }
    }

    Ok(Self { graph })
  }

  /// Input positions in topological order.
  ///
  /// Kahn's algorithm over the parent edges; whenever several groups are
  /// ready at once, the smallest input position goes first. Node indices
  /// follow insertion order, so ordering ready nodes by index is ordering
  /// them by input position.
  ///
  /// # Errors
  ///
  /// Returns `CycleDetected` when the edges do not form a DAG.
  pub fn sorted_positions(&self) -> Result<Vec<usize>, OrderError> {
    let mut in_degree: HashMap<NodeIndex, usize> = self
      .graph
      .node_indices()
      .map(|idx| (idx, self.graph.neighbors_directed(idx, Direction::Incoming).count()))
      .collect();

    let mut ready: BTreeSet<NodeIndex> =
      in_degree.iter().filter(|(_, degree)| **degree == 0).map(|(idx, _)| *idx).collect();

    let mut sorted = Vec::with_capacity(self.graph.node_count());
    while let Some(idx) = ready.pop_first() {
      sorted.push(self.graph[idx]);
      for child in self.graph.neighbors_directed(idx, Direction::Outgoing) {
        if let Some(degree) = in_degree.get_mut(&child) {
          *degree -= 1;
          if *degree == 0 {
            ready.insert(child);
          }
        }
      }
    }

    if sorted.len() != self.graph.node_count() {
      return Err(OrderError::CycleDetected);
    }
    Ok(sorted)
  }
}

/// Sorts chunk groups so every parent precedes its children, deterministically.
///
/// # Errors
///
/// Returns `CycleDetected` or `UnknownGroup` when the parent relation is not
/// a well-formed DAG over the given groups.
pub fn sort_groups(groups: &[ChunkGroup]) -> Result<Vec<&ChunkGroup>, OrderError> {
  let dag = GroupDag::from_groups(groups)?;
  let order = dag.sorted_positions()?;
  Ok(order.into_iter().map(|position| &groups[position]).collect())
}

/// Flattens sorted groups into their chunks, keeping each group's declared
/// chunk order and resolving ids through `chunks`. References absent from
/// the map are dropped; a chunk listed by several groups appears once per
/// listing.
pub fn flatten_chunks<'a>(
  sorted: &[&ChunkGroup],
  chunks: &HashMap<&ChunkId, &'a Chunk>,
) -> Vec<&'a Chunk> {
  sorted
    .iter()
    .flat_map(|group| group.chunks.iter())
    .filter_map(|id| chunks.get(id).copied())
    .collect()
}
