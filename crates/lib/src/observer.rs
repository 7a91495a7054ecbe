//! Lifecycle observation seam between host pipelines and the builder.
//!
//! Hosts of any vintage reduce their build events to three notifications.
//! `BuildObserver` names that capability; `ManifestBuilder` implements it
//! directly, and the `adapters` module translates concrete host event
//! vocabularies onto it, so the core never branches on host shape.

use crate::builder::{FinalizeError, FinalizeOutcome, ManifestBuilder};
use crate::graph::BuildPass;

/// The build-lifecycle notifications a manifest consumer reacts to.
///
/// All notifications are synchronous; bridging from an asynchronous host is
/// the adapter's responsibility, and a notification is complete when the
/// call returns.
pub trait BuildObserver {
  /// A build attempt is starting, whether the initial build or a
  /// watch-triggered rebuild.
  fn pass_started(&mut self);

  /// The running build reports that the module identified by
  /// `module_request` produced the file `file`.
  fn module_asset(&mut self, module_request: &str, file: &str);

  /// The build graph is complete and output is about to be written.
  fn pass_finishing(&mut self, pass: &mut BuildPass) -> Result<FinalizeOutcome, FinalizeError>;
}

impl BuildObserver for ManifestBuilder {
  fn pass_started(&mut self) {
    self.begin_pass();
  }

  fn module_asset(&mut self, module_request: &str, file: &str) {
    self.record_module_asset(module_request, file);
  }

  fn pass_finishing(&mut self, pass: &mut BuildPass) -> Result<FinalizeOutcome, FinalizeError> {
    self.finalize_pass(pass)
  }
}
