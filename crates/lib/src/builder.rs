//! The manifest builder lifecycle.
//!
//! One `ManifestBuilder` serves one manifest target for a host pipeline's
//! whole lifetime, including every watch-triggered rebuild. Hosts drive it
//! through three calls per pass: `begin_pass` when a build attempt starts,
//! `record_module_asset` as the build reports produced files, and
//! `finalize_pass` once the graph is complete and output is about to be
//! written. The `observer` module carries the same surface as a trait for
//! adapter-based hosts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::assemble::{self, AssembleError};
use crate::collect::{self, CollectConfig, ModuleAssetIndex};
use crate::coordinator::BuildCoordinator;
use crate::graph::{BuildPass, EmittedArtifact, OutputOptions};
use crate::manifest::Manifest;
use crate::options::ManifestOptions;
use crate::order::OrderError;
use crate::util::paths;

/// Errors detected when a builder is constructed.
#[derive(Debug, Error)]
pub enum SetupError {
  #[error("output directory is not configured")]
  MissingOutputDir,

  #[error("output directory {} is not absolute", path.display())]
  RelativeOutputDir { path: PathBuf },
}

/// Errors aborting a build pass during finalization.
#[derive(Debug, Error)]
pub enum FinalizeError {
  #[error("chunk group ordering failed: {0}")]
  Order(#[from] OrderError),

  #[error("manifest assembly failed: {0}")]
  Assemble(#[from] AssembleError),
}

/// Listener invoked with the assembled manifest after every pass.
pub type FinalizedListener = Box<dyn FnMut(&mut Manifest) + Send>;

/// What a finalized pass produced.
#[derive(Debug)]
pub struct FinalizeOutcome {
  /// The assembled manifest, after listener transforms.
  pub manifest: Manifest,
  /// The artifact registered this pass. `None` when sibling passes are
  /// still pending and publication was deferred to the cycle's last one.
  pub artifact: Option<EmittedArtifact>,
}

impl FinalizeOutcome {
  /// Whether this pass published the manifest.
  pub fn published(&self) -> bool {
    self.artifact.is_some()
  }
}

/// Derives an asset manifest as a side effect of a host bundler's builds.
pub struct ManifestBuilder {
  options: ManifestOptions,
  coordinator: Arc<BuildCoordinator>,
  /// Resolved absolute path of the manifest file, the coordination key.
  output_file: PathBuf,
  /// Output directory the target resolved against.
  output_dir: PathBuf,
  /// Artifact name, relative to the output directory where possible.
  output_name: String,
  module_assets: ModuleAssetIndex,
  listeners: Vec<FinalizedListener>,
}

impl ManifestBuilder {
  /// Binds a builder to one manifest target.
  ///
  /// The target is `options.file_name` resolved against the host's output
  /// directory; an absolute file name escapes it. Resolution happens here,
  /// once, with `.` and `..` components collapsed, so every pass and every
  /// sibling instance keys the coordinator identically regardless of how
  /// the same location was spelled.
  ///
  /// # Errors
  ///
  /// The output directory must be present and absolute, otherwise the
  /// resolved target would be ambiguous across instances.
  pub fn new(
    options: ManifestOptions,
    output: &OutputOptions,
    coordinator: Arc<BuildCoordinator>,
  ) -> Result<Self, SetupError> {
    if output.path.as_os_str().is_empty() {
      return Err(SetupError::MissingOutputDir);
    }
    if !output.path.is_absolute() {
      return Err(SetupError::RelativeOutputDir { path: output.path.clone() });
    }

    let output_dir = paths::normalize_components(&output.path);
    let output_file = paths::normalize_components(&output_dir.join(&options.file_name));
    let output_name = match output_file.strip_prefix(&output_dir) {
      Ok(relative) => paths::normalize_separators(&relative.to_string_lossy()),
      Err(_) => paths::normalize_separators(&output_file.to_string_lossy()),
    };
    debug!(target = %output_file.display(), artifact = %output_name, "manifest builder bound");

    Ok(Self {
      options,
      coordinator,
      output_dir,
      output_file,
      output_name,
      module_assets: ModuleAssetIndex::new(),
      listeners: Vec::new(),
    })
  }

  /// Registers a listener invoked with the assembled manifest after every
  /// pass, published or not. Listeners run in registration order and may
  /// transform the manifest handed onward; the already-serialized artifact
  /// is not re-rendered.
  pub fn on_finalized(&mut self, listener: impl FnMut(&mut Manifest) + Send + 'static) {
    self.listeners.push(Box::new(listener));
  }

  /// The resolved absolute manifest path.
  pub fn output_file(&self) -> &Path {
    &self.output_file
  }

  /// The artifact name the manifest registers under.
  pub fn output_name(&self) -> &str {
    &self.output_name
  }

  /// Marks the start of a build attempt: registers the pending pass with
  /// the coordinator and drops module-asset state from the previous pass.
  pub fn begin_pass(&mut self) {
    self.coordinator.begin_pass(&self.output_file);
    self.module_assets.clear();
  }

  /// Records a module-produced asset reported by the running build.
  pub fn record_module_asset(&mut self, module_request: &str, file: &str) {
    self.module_assets.record(module_request, file);
  }

  /// Assembles the manifest for a finished pass.
  ///
  /// Collection and assembly run on every pass; serialization, artifact
  /// registration, and the optional disk write happen only when the
  /// coordinator reports this as the cycle's last pending pass. Finalized
  /// listeners run afterwards either way.
  ///
  /// # Errors
  ///
  /// Ordering, assembly, serialization, and disk-write failures all abort
  /// the pass.
  pub fn finalize_pass(&mut self, pass: &mut BuildPass) -> Result<FinalizeOutcome, FinalizeError> {
    let is_last = self.coordinator.end_pass(&self.output_file);

    let config = CollectConfig {
      base_path: self.options.base_path.clone(),
      public_path: self.options.public_path.clone().or_else(|| pass.output.public_path.clone()),
      transform_extensions: self.options.transform_extensions.clone(),
    };
    let entries = collect::collect_entries(&pass.graph, &pass.stats, &self.module_assets, &config)?;

    let mut manifest =
      assemble::assemble(&self.options, entries, pass, &self.coordinator, &self.output_dir)?;

    let artifact = if is_last {
      let artifact =
        assemble::publish(&self.options, &manifest, pass, &self.output_name, &self.output_file)?;
      info!(artifact = %self.output_name, entries = manifest.len(), "manifest published");
      Some(artifact)
    } else {
      debug!(target = %self.output_file.display(), "sibling passes pending, publication deferred");
      None
    };

    for listener in &mut self.listeners {
      listener(&mut manifest);
    }

    Ok(FinalizeOutcome { manifest, artifact })
  }
}
