//! Asset collection: from build graph to ordered manifest entries.
//!
//! The collector walks the pass's named initial chunks in dependency order,
//! then its stats asset list, accumulating an insertion-ordered map keyed by
//! logical name. Later writers win, so a chunk-file entry yields to a module
//! asset claiming the same name. The result is a flat entry list ready for
//! the assembler's shaping hooks.

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::{BuildGraph, BuildStats, Chunk, ChunkId};
use crate::options::TransformExtensions;
use crate::order::{self, OrderError};
use crate::util::paths;

/// One manifest entry candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
  /// Logical name, the manifest key.
  pub name: String,
  /// Emitted path, the manifest value.
  pub path: String,
  /// Owning chunk, for entries derived from chunk files.
  pub chunk: Option<ChunkId>,
  /// True when the entry came from a module-produced asset rather than a
  /// chunk file.
  pub is_module_asset: bool,
}

/// Per-pass index mapping emitted file paths back to readable names.
///
/// Generated file names carry no meaning on their own; when the host reports
/// that a module produced a file, the index derives a name from the emitted
/// file's directory and the module request's base name, so `img/5f3a.png`
/// produced by a request ending in `logo.png` indexes as `img/logo.png`.
#[derive(Debug, Clone, Default)]
pub struct ModuleAssetIndex {
  names: HashMap<String, String>,
}

impl ModuleAssetIndex {
  pub fn new() -> Self {
    Self::default()
  }

  /// Records one module-produced file. Reports without a usable module
  /// request are ignored.
  pub fn record(&mut self, module_request: &str, file: &str) {
    let Some(base) = Path::new(module_request).file_name().and_then(|n| n.to_str()) else {
      return;
    };
    let name = match Path::new(file).parent() {
      Some(dir) if !dir.as_os_str().is_empty() => format!("{}/{}", dir.display(), base),
      _ => base.to_string(),
    };
    self.names.insert(file.to_string(), name);
  }

  /// The indexed name for an emitted path, if any module produced it.
  pub fn name_for(&self, file: &str) -> Option<&str> {
    self.names.get(file).map(String::as_str)
  }

  /// Forgets everything recorded so far. Called between passes; an index
  /// never carries names across builds.
  pub fn clear(&mut self) {
    self.names.clear();
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }
}

/// Configuration for one collection run.
#[derive(Debug, Clone, Default)]
pub struct CollectConfig {
  /// Prefix prepended to logical names.
  pub base_path: Option<String>,
  /// Prefix prepended to emitted paths, the effective public path.
  pub public_path: Option<String>,
  /// Extensions computing two-segment file types.
  pub transform_extensions: TransformExtensions,
}

/// Collects the ordered manifest entries of a finished build.
///
/// Chunk files come first, in topological group order; stats assets follow,
/// contributing module assets and standalone files. An entry whose logical
/// name was already taken replaces the earlier path without moving the name.
/// Prefixes and separator normalization apply to the final list.
///
/// # Errors
///
/// Propagates ordering failures; a cyclic or dangling group graph aborts the
/// pass.
pub fn collect_entries(
  graph: &BuildGraph,
  stats: &BuildStats,
  module_assets: &ModuleAssetIndex,
  config: &CollectConfig,
) -> Result<Vec<FileEntry>, OrderError> {
  let qualifying: HashMap<&ChunkId, &Chunk> =
    graph.chunks.iter().filter(|c| c.is_named_initial()).map(|c| (&c.id, c)).collect();

  let sorted_groups = order::sort_groups(&graph.groups)?;
  let sorted_chunks = order::flatten_chunks(&sorted_groups, &qualifying);

  let mut entries: IndexMap<String, FileEntry> = IndexMap::new();

  for chunk in sorted_chunks {
    for file in &chunk.files {
      let name = match chunk.name() {
        Some(chunk_name) => {
          format!("{chunk_name}.{}", paths::file_type(file, &config.transform_extensions))
        }
        None => file.clone(),
      };
      entries.insert(
        name.clone(),
        FileEntry { name, path: file.clone(), chunk: Some(chunk.id.clone()), is_module_asset: false },
      );
    }
  }

  for asset in &stats.assets {
    if let Some(name) = module_assets.name_for(&asset.name) {
      entries.insert(
        name.to_string(),
        FileEntry {
          name: name.to_string(),
          path: asset.name.clone(),
          chunk: None,
          is_module_asset: true,
        },
      );
      continue;
    }
    if !asset.chunks.is_empty() {
      // Chunk-owned assets were already named by the chunk walk; whatever
      // the walk rejected stays out rather than entering under a raw path.
      continue;
    }
    entries.insert(
      asset.name.clone(),
      FileEntry { name: asset.name.clone(), path: asset.name.clone(), chunk: None, is_module_asset: false },
    );
  }

  let mut entries: Vec<FileEntry> = entries.into_values().collect();

  for entry in &mut entries {
    if let Some(base) = &config.base_path {
      entry.name = format!("{base}{}", entry.name);
    }
    if let Some(public) = &config.public_path {
      entry.path = format!("{public}{}", entry.path);
    }
    entry.name = paths::normalize_separators(&entry.name);
    entry.path = paths::normalize_separators(&entry.path);
  }

  debug!(entries = entries.len(), "collected manifest entries");
  Ok(entries)
}
