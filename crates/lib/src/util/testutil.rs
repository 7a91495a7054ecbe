//! Test utilities for waybill-lib.
//!
//! Fixture builders for the small build graphs the collection and assembly
//! tests work over.

use std::path::Path;

use crate::graph::{
  AssetStat, BuildGraph, BuildPass, BuildStats, Chunk, ChunkGroup, ChunkGroupId, ChunkId,
  OutputOptions,
};

/// A named chunk that loads on page entry. Its id equals its name.
pub fn initial_chunk(name: &str, files: &[&str]) -> Chunk {
  Chunk {
    id: ChunkId::from(name),
    names: vec![name.to_string()],
    initial: true,
    only_initial: true,
    files: files.iter().map(|f| f.to_string()).collect(),
  }
}

/// A named chunk loaded on demand.
pub fn async_chunk(name: &str, files: &[&str]) -> Chunk {
  Chunk { initial: false, only_initial: false, ..initial_chunk(name, files) }
}

/// A chunk with explicit flags and names.
pub fn chunk_with(
  id: &str,
  names: &[&str],
  initial: bool,
  only_initial: bool,
  files: &[&str],
) -> Chunk {
  Chunk {
    id: ChunkId::from(id),
    names: names.iter().map(|n| n.to_string()).collect(),
    initial,
    only_initial,
    files: files.iter().map(|f| f.to_string()).collect(),
  }
}

pub fn group(id: &str, parents: &[&str], chunks: &[&str]) -> ChunkGroup {
  ChunkGroup {
    id: ChunkGroupId::from(id),
    parents: parents.iter().map(|p| ChunkGroupId::from(*p)).collect(),
    chunks: chunks.iter().map(|c| ChunkId::from(*c)).collect(),
  }
}

pub fn asset(name: &str, chunks: &[&str]) -> AssetStat {
  AssetStat {
    name: name.to_string(),
    size: name.len() as u64,
    chunks: chunks.iter().map(|c| ChunkId::from(*c)).collect(),
  }
}

pub fn graph(groups: Vec<ChunkGroup>, chunks: Vec<Chunk>) -> BuildGraph {
  BuildGraph { groups, chunks }
}

/// A graph with a single entry: one group owning one initial chunk, both
/// named `name`.
pub fn entry_graph(name: &str, files: &[&str]) -> BuildGraph {
  graph(vec![group(name, &[], &[name])], vec![initial_chunk(name, files)])
}

pub fn output_at(dir: &Path) -> OutputOptions {
  OutputOptions { path: dir.to_path_buf(), public_path: None }
}

/// A finished pass over `graph` with the given stats assets, emitting into
/// `dir`.
pub fn pass_at(graph: BuildGraph, assets: Vec<AssetStat>, dir: &Path) -> BuildPass {
  BuildPass::new(graph, BuildStats { assets }, output_at(dir))
}
