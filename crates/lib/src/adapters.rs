//! Adapters from concrete host event vocabularies to `BuildObserver`.
//!
//! Two host families exist in practice. Hook hosts expose named tap points
//! (run, watch-run, module-asset, emit) that plugins subscribe to
//! individually; stream hosts deliver one typed event sequence through a
//! single callback. Both reduce to the same three observer notifications,
//! and each adapter owns that reduction so observers stay host-agnostic.

use crate::builder::{FinalizeError, FinalizeOutcome};
use crate::graph::BuildPass;
use crate::observer::BuildObserver;

/// Adapter for hosts exposing named lifecycle hooks.
///
/// The host wires each tap method to the matching hook; `run` and
/// `watch_run` both mark a pass start, mirroring hosts that fire one or the
/// other depending on watch mode.
pub struct HookAdapter<O> {
  observer: O,
}

impl<O: BuildObserver> HookAdapter<O> {
  pub fn new(observer: O) -> Self {
    Self { observer }
  }

  /// Tap for the host's initial-run hook.
  pub fn run(&mut self) {
    self.observer.pass_started();
  }

  /// Tap for the host's watch-rebuild hook.
  pub fn watch_run(&mut self) {
    self.observer.pass_started();
  }

  /// Tap for the per-compilation module-asset hook.
  pub fn module_asset(&mut self, module_request: &str, file: &str) {
    self.observer.module_asset(module_request, file);
  }

  /// Tap for the emit hook, firing once the pass's graph is final.
  pub fn emit(&mut self, pass: &mut BuildPass) -> Result<FinalizeOutcome, FinalizeError> {
    self.observer.pass_finishing(pass)
  }

  /// Releases the wrapped observer.
  pub fn into_inner(self) -> O {
    self.observer
  }
}

/// A lifecycle event as delivered by single-stream hosts.
#[derive(Debug)]
pub enum PassEvent<'a> {
  /// A build attempt began.
  Started,
  /// A module produced an output file.
  ModuleAsset {
    module_request: &'a str,
    file: &'a str,
  },
  /// The pass's graph is final and output is being emitted.
  Emitting(&'a mut BuildPass),
}

/// Adapter for hosts that deliver lifecycle notifications as one event
/// stream rather than named hooks.
pub struct EventStreamAdapter<O> {
  observer: O,
}

impl<O: BuildObserver> EventStreamAdapter<O> {
  pub fn new(observer: O) -> Self {
    Self { observer }
  }

  /// Dispatches one host event onto the observer. Only `Emitting` produces
  /// an outcome.
  pub fn dispatch(&mut self, event: PassEvent<'_>) -> Result<Option<FinalizeOutcome>, FinalizeError> {
    match event {
      PassEvent::Started => {
        self.observer.pass_started();
        Ok(None)
      }
      PassEvent::ModuleAsset { module_request, file } => {
        self.observer.module_asset(module_request, file);
        Ok(None)
      }
      PassEvent::Emitting(pass) => self.observer.pass_finishing(pass).map(Some),
    }
  }

  /// Releases the wrapped observer.
  pub fn into_inner(self) -> O {
    self.observer
  }
}
