//! Manifest assembly and publication.
//!
//! The assembler turns collected entries into the final manifest and, on a
//! cycle's last pass, into an emitted artifact: it applies the configured
//! shaping hooks, merges entries over the seed, serializes once, registers
//! the result into the pass's output set, and optionally flushes it to disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::collect::FileEntry;
use crate::consts::HOT_UPDATE_MARKER;
use crate::coordinator::BuildCoordinator;
use crate::graph::{BuildPass, EmittedArtifact};
use crate::manifest::Manifest;
use crate::options::{HookError, ManifestOptions};

/// Errors from manifest assembly or publication.
#[derive(Debug, Error)]
pub enum AssembleError {
  #[error("generate hook failed: {0}")]
  Generate(HookError),

  #[error("manifest serialization failed: {0}")]
  Serialize(HookError),

  #[error("failed to write manifest to {}: {source}", path.display())]
  Write { path: PathBuf, source: std::io::Error },
}

/// Merges collected entries into a manifest according to the configured
/// policy.
///
/// With a `generate` hook installed, the hook receives the seed, every
/// collected entry unfiltered, and the pass, and its result is the manifest
/// verbatim. Otherwise entries pass through filter, map, and sort, then
/// merge over the seed in order, skipping hot-update artifacts and files
/// that are themselves manifest targets of this pipeline.
///
/// # Errors
///
/// Returns `Generate` when the hook fails.
pub fn assemble(
  options: &ManifestOptions,
  mut entries: Vec<FileEntry>,
  pass: &BuildPass,
  coordinator: &BuildCoordinator,
  output_dir: &Path,
) -> Result<Manifest, AssembleError> {
  let seed = options.seed.clone().unwrap_or_default();

  if let Some(generate) = &options.generate {
    return generate(seed, &entries, pass).map_err(AssembleError::Generate);
  }

  if let Some(filter) = &options.filter {
    entries.retain(|entry| filter(entry));
  }
  if let Some(map) = &options.map {
    entries = entries.into_iter().map(|entry| map(entry)).collect();
  }
  if let Some(sort) = &options.sort {
    entries.sort_by(|a, b| sort(a, b));
  }

  let mut manifest = seed;
  for entry in entries {
    if entry.path.contains(HOT_UPDATE_MARKER) {
      continue;
    }
    if coordinator.is_tracked(&output_dir.join(&entry.name)) {
      debug!(name = %entry.name, "entry is a sibling manifest target, skipped");
      continue;
    }
    manifest.insert(entry.name, entry.path);
  }
  Ok(manifest)
}

/// Serializes the manifest, registers it into the pass's artifact set, and
/// optionally writes it to `output_file`.
///
/// # Errors
///
/// Returns `Serialize` when serialization fails and `Write` when the
/// synchronous disk write fails. A failed write aborts the pass; nothing
/// retries it.
pub fn publish(
  options: &ManifestOptions,
  manifest: &Manifest,
  pass: &mut BuildPass,
  output_name: &str,
  output_file: &Path,
) -> Result<EmittedArtifact, AssembleError> {
  let content = match &options.serialize {
    Some(serialize) => serialize(manifest).map_err(AssembleError::Serialize)?,
    None => manifest.to_json_pretty().map_err(|e| AssembleError::Serialize(Box::new(e)))?,
  };

  let artifact = EmittedArtifact::new(output_name, content);
  pass.artifacts.insert(output_name.to_string(), artifact.clone());

  if options.write_to_file_emit {
    fs::write(output_file, artifact.source())
      .map_err(|source| AssembleError::Write { path: output_file.to_path_buf(), source })?;
    info!(path = %output_file.display(), bytes = artifact.size(), "manifest written to disk");
  }

  Ok(artifact)
}

#[cfg(test)]
mod tests {
  use std::cmp::Reverse;
  use std::path::Path;

  use super::*;
  use crate::graph::ChunkId;
  use crate::util::testutil::{entry_graph, pass_at};

  fn entry(name: &str, path: &str) -> FileEntry {
    FileEntry { name: name.to_string(), path: path.to_string(), chunk: None, is_module_asset: false }
  }

  fn dist() -> &'static Path {
    Path::new("/dist")
  }

  fn empty_pass() -> BuildPass {
    pass_at(entry_graph("main", &[]), vec![], dist())
  }

  fn assemble_with(options: &ManifestOptions, entries: Vec<FileEntry>) -> Manifest {
    assemble(options, entries, &empty_pass(), &BuildCoordinator::new(), dist()).unwrap()
  }

  #[test]
  fn entries_merge_in_order() {
    let manifest = assemble_with(
      &ManifestOptions::default(),
      vec![entry("main.js", "main.1a.js"), entry("main.css", "main.2b.css")],
    );
    let keys: Vec<&str> = manifest.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["main.js", "main.css"]);
    assert_eq!(manifest.get("main.js"), Some("main.1a.js"));
  }

  #[test]
  fn seed_entries_survive_unless_overwritten() {
    let mut seed = Manifest::new();
    seed.insert("extra.txt", "static/extra.txt");
    seed.insert("main.js", "stale.js");
    let options = ManifestOptions::default().with_seed(seed);

    let manifest = assemble_with(&options, vec![entry("main.js", "main.1a.js")]);
    assert_eq!(manifest.get("extra.txt"), Some("static/extra.txt"));
    assert_eq!(manifest.get("main.js"), Some("main.1a.js"));
  }

  #[test]
  fn empty_build_returns_seed_verbatim() {
    let mut seed = Manifest::new();
    seed.insert("extra.txt", "static/extra.txt");
    let options = ManifestOptions::default().with_seed(seed.clone());

    let manifest = assemble_with(&options, vec![]);
    assert_eq!(manifest, seed);
  }

  #[test]
  fn hot_update_artifacts_never_enter() {
    let manifest = assemble_with(
      &ManifestOptions::default(),
      vec![entry("main.js", "main.1a.js"), entry("main.hot-update.js", "main.0f3a.hot-update.js")],
    );
    assert_eq!(manifest.len(), 1);
    assert!(!manifest.contains("main.hot-update.js"));
  }

  #[test]
  fn sibling_manifest_targets_are_skipped() {
    let coordinator = BuildCoordinator::new();
    coordinator.begin_pass(&dist().join("other-manifest.json"));

    let manifest = assemble(
      &ManifestOptions::default(),
      vec![entry("other-manifest.json", "other-manifest.json"), entry("main.js", "main.js")],
      &empty_pass(),
      &coordinator,
      dist(),
    )
    .unwrap();

    assert_eq!(manifest.len(), 1);
    assert!(manifest.contains("main.js"));
  }

  #[test]
  fn filter_runs_before_map_and_sort() {
    let options = ManifestOptions::default()
      .with_filter(|entry| !entry.name.ends_with(".map"))
      .with_map(|mut entry| {
        entry.name = format!("assets/{}", entry.name);
        entry
      })
      .with_sort(|a, b| Reverse(&a.name).cmp(&Reverse(&b.name)));

    let manifest = assemble_with(
      &options,
      vec![
        entry("a.js", "a.1.js"),
        entry("b.js", "b.2.js"),
        entry("a.js.map", "a.1.js.map"),
      ],
    );

    let keys: Vec<&str> = manifest.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["assets/b.js", "assets/a.js"]);
  }

  #[test]
  fn generate_hook_replaces_default_policy() {
    let options = ManifestOptions::default().with_generate(|seed, entries, _pass| {
      let mut manifest = seed;
      manifest.insert("count", entries.len().to_string());
      Ok(manifest)
    });

    let manifest = assemble_with(
      &options,
      vec![entry("main.js", "main.js"), entry("x.hot-update.js", "x.hot-update.js")],
    );

    // The generator sees every entry, hot-update included, and its output
    // is taken verbatim.
    assert_eq!(manifest.get("count"), Some("2"));
    assert_eq!(manifest.len(), 1);
  }

  #[test]
  fn generate_hook_can_rebuild_from_entries() {
    let options = ManifestOptions::default().with_generate(|_seed, entries, _pass| {
      Ok(entries.iter().map(|e| (format!("v2/{}", e.name), e.path.clone())).collect())
    });

    let manifest = assemble_with(
      &options,
      vec![entry("main.js", "main.1a.js"), entry("main.css", "main.2b.css")],
    );

    let keys: Vec<&str> = manifest.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["v2/main.js", "v2/main.css"]);
    assert_eq!(manifest.get("v2/main.js"), Some("main.1a.js"));
  }

  #[test]
  fn failing_generate_hook_aborts() {
    let options =
      ManifestOptions::default().with_generate(|_seed, _entries, _pass| Err("boom".into()));
    let err = assemble(
      &options,
      vec![],
      &empty_pass(),
      &BuildCoordinator::new(),
      dist(),
    )
    .unwrap_err();
    assert!(matches!(err, AssembleError::Generate(_)));
  }

  #[test]
  fn publish_registers_pretty_json_artifact() {
    let mut pass = empty_pass();
    let mut manifest = Manifest::new();
    manifest.insert("main.js", "main.1a.js");

    let artifact = publish(
      &ManifestOptions::default(),
      &manifest,
      &mut pass,
      "manifest.json",
      &dist().join("manifest.json"),
    )
    .unwrap();

    assert_eq!(artifact.source(), "{\n  \"main.js\": \"main.1a.js\"\n}");
    assert_eq!(pass.artifacts.get("manifest.json"), Some(&artifact));
  }

  #[test]
  fn custom_serializer_wins() {
    let options = ManifestOptions::default().with_serialize(|manifest| {
      let mut out = String::new();
      for (name, path) in manifest {
        out.push_str(&format!("{name} {path}\n"));
      }
      Ok(out)
    });
    let mut pass = empty_pass();
    let mut manifest = Manifest::new();
    manifest.insert("main.js", "main.1a.js");
    manifest.insert("main.css", "main.2b.css");

    let artifact =
      publish(&options, &manifest, &mut pass, "manifest.json", &dist().join("manifest.json"))
        .unwrap();
    assert_eq!(artifact.source(), "main.js main.1a.js\nmain.css main.2b.css\n");
  }

  #[test]
  fn failing_serializer_aborts() {
    let options =
      ManifestOptions::default().with_serialize(|_manifest| Err("not today".into()));
    let mut pass = empty_pass();
    let err = publish(
      &options,
      &Manifest::new(),
      &mut pass,
      "manifest.json",
      &dist().join("manifest.json"),
    )
    .unwrap_err();
    assert!(matches!(err, AssembleError::Serialize(_)));
    assert!(pass.artifacts.is_empty());
  }

  #[test]
  fn write_to_file_emit_flushes_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let output_file = dir.path().join("manifest.json");
    let options = ManifestOptions::default().with_write_to_file_emit(true);
    let mut pass = pass_at(entry_graph("main", &[]), vec![], dir.path());
    let mut manifest = Manifest::new();
    manifest.insert("main.js", "main.1a.js");

    publish(&options, &manifest, &mut pass, "manifest.json", &output_file).unwrap();

    let written = std::fs::read_to_string(&output_file).unwrap();
    assert_eq!(written, "{\n  \"main.js\": \"main.1a.js\"\n}");
  }

  #[test]
  fn failed_disk_write_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let options = ManifestOptions::default().with_write_to_file_emit(true);
    let mut pass = pass_at(entry_graph("main", &[]), vec![], dir.path());

    // The target is the directory itself, so the write cannot succeed.
    let err = publish(&options, &Manifest::new(), &mut pass, "manifest.json", dir.path())
      .unwrap_err();
    assert!(matches!(err, AssembleError::Write { .. }));
  }

  #[test]
  fn entry_chunk_field_survives_hooks() {
    let options = ManifestOptions::default().with_filter(|entry| entry.chunk.is_some());
    let mut chunk_entry = entry("main.js", "main.js");
    chunk_entry.chunk = Some(ChunkId::from("main"));

    let manifest = assemble_with(&options, vec![chunk_entry, entry("loose.txt", "loose.txt")]);
    assert_eq!(manifest.len(), 1);
    assert!(manifest.contains("main.js"));
  }
}
