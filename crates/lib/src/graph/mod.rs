//! Build-graph types shared across the crate.

mod types;

pub use types::{
  AssetStat, BuildGraph, BuildPass, BuildStats, Chunk, ChunkGroup, ChunkGroupId, ChunkId,
  EmittedArtifact, OutputOptions,
};
