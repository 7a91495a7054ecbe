//! Build-graph model handed over by a host bundler.
//!
//! Hosts reduce their internal compilation state to these types once per
//! finished pass: the chunk groups with their parent links, the chunks they
//! own, and the final stats snapshot of emitted assets. Everything here is
//! plain data; the walking and ordering live in `collect` and `order`.

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Identifier of a chunk within one build pass.
///
/// Hosts assign these; numeric ids stringify on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkId(pub String);

impl fmt::Display for ChunkId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<&str> for ChunkId {
  fn from(id: &str) -> Self {
    Self(id.to_string())
  }
}

/// Identifier of a chunk group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkGroupId(pub String);

impl fmt::Display for ChunkGroupId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<&str> for ChunkGroupId {
  fn from(id: &str) -> Self {
    Self(id.to_string())
  }
}

/// One unit of emitted code: a set of modules bundled together, with the
/// files the host wrote for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
  /// Host-assigned chunk identifier.
  pub id: ChunkId,
  /// Human-readable names; the first one names manifest entries.
  pub names: Vec<String>,
  /// True when the chunk loads on page entry rather than on demand.
  pub initial: bool,
  /// True when the chunk is reachable only through entry points. Hosts
  /// without the finer distinction mirror `initial` here.
  pub only_initial: bool,
  /// Files emitted for this chunk, in the host's emit order.
  pub files: Vec<String>,
}

impl Chunk {
  /// The chunk's primary name, if it has one.
  pub fn name(&self) -> Option<&str> {
    self.names.first().map(String::as_str).filter(|n| !n.is_empty())
  }

  /// Whether the chunk yields named manifest entries: it must carry a
  /// non-empty name and be fully initial. On-demand and mixed chunks are
  /// excluded.
  pub fn is_named_initial(&self) -> bool {
    self.name().is_some() && self.initial && self.only_initial
  }
}

/// A group of chunks produced together, with parent links forming the
/// dependency graph walked by `order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkGroup {
  /// Host-assigned group identifier, unique within a pass.
  pub id: ChunkGroupId,
  /// Groups this one depends on; their chunks precede this group's in the
  /// manifest.
  pub parents: Vec<ChunkGroupId>,
  /// Owned chunks, in the group's declared order.
  pub chunks: Vec<ChunkId>,
}

/// The finished build graph of one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildGraph {
  /// Chunk groups in the host's enumeration order, which also breaks ties
  /// between unrelated groups when sorting.
  pub groups: Vec<ChunkGroup>,
  /// All chunks of the pass.
  pub chunks: Vec<Chunk>,
}

/// One emitted asset as reported by the build's stats snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetStat {
  /// Emitted path, relative to the output directory.
  pub name: String,
  /// Size in bytes.
  pub size: u64,
  /// Ids of the chunks the asset belongs to; empty for standalone assets
  /// such as copied files.
  pub chunks: Vec<ChunkId>,
}

/// Final stats snapshot of a pass, reduced to the asset list the manifest
/// needs. Richer host stats (modules, origins, timings) are not consumed
/// here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildStats {
  /// Every asset the pass emitted.
  pub assets: Vec<AssetStat>,
}

/// Output configuration the host resolved for a build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputOptions {
  /// Absolute directory receiving emitted files.
  pub path: PathBuf,
  /// Public path prefix of served assets. An explicit
  /// `ManifestOptions::public_path` takes precedence over this default.
  pub public_path: Option<String>,
}

/// A named artifact registered into a pass's output set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedArtifact {
  name: String,
  content: String,
}

impl EmittedArtifact {
  pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
    Self { name: name.into(), content: content.into() }
  }

  /// Output name, relative to the output directory.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// The artifact's content.
  pub fn source(&self) -> &str {
    &self.content
  }

  /// Content length in bytes.
  pub fn size(&self) -> usize {
    self.content.len()
  }
}

/// One finished build pass, handed to the manifest builder at finalize time.
#[derive(Debug, Default)]
pub struct BuildPass {
  /// The completed build graph.
  pub graph: BuildGraph,
  /// The pass's stats snapshot.
  pub stats: BuildStats,
  /// Output configuration the pass ran with.
  pub output: OutputOptions,
  /// Artifacts registered into the pass's output set, keyed by output name.
  /// The manifest adds itself here when it publishes.
  pub artifacts: IndexMap<String, EmittedArtifact>,
}

impl BuildPass {
  pub fn new(graph: BuildGraph, stats: BuildStats, output: OutputOptions) -> Self {
    Self { graph, stats, output, artifacts: IndexMap::new() }
  }
}
