//! Cross-instance build-pass accounting.
//!
//! Several builder instances may feed manifests within one host pipeline,
//! and watch mode re-runs passes indefinitely. The coordinator counts
//! pending passes per resolved output target so each manifest publishes
//! exactly once per build cycle, on the cycle's last pass, and so no
//! instance ever lists another instance's manifest as an entry.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

/// Tracks pending build passes per output target.
///
/// One coordinator lives for a host pipeline's whole lifetime and is shared
/// (typically through an `Arc`) by every builder instance in it. Distinct
/// targets count independently; instances resolving to the same target share
/// one counter and therefore one publication gate.
#[derive(Debug, Default)]
pub struct BuildCoordinator {
  counters: Mutex<HashMap<PathBuf, usize>>,
}

impl BuildCoordinator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers one pending pass for `target`. Called at the start of every
  /// build attempt, including each watch-triggered rebuild.
  pub fn begin_pass(&self, target: &Path) {
    let mut counters = self.lock();
    let pending = counters.entry(target.to_path_buf()).or_insert(0);
    *pending += 1;
    debug!(target = %target.display(), pending = *pending, "build pass registered");
  }

  /// Unregisters one pending pass for `target`. Returns true only when this
  /// call empties the counter, meaning the caller runs the cycle's last pass
  /// and must publish.
  ///
  /// A call without a matching `begin_pass` returns false and leaves the
  /// counter untouched.
  pub fn end_pass(&self, target: &Path) -> bool {
    let mut counters = self.lock();
    match counters.get_mut(target) {
      Some(pending) if *pending > 0 => {
        *pending -= 1;
        let last = *pending == 0;
        debug!(target = %target.display(), pending = *pending, last, "build pass completed");
        last
      }
      _ => {
        warn!(target = %target.display(), "end_pass without matching begin_pass");
        false
      }
    }
  }

  /// Whether `path` has ever been registered as an output target. Used to
  /// recognize sibling manifests among emitted entries.
  pub fn is_tracked(&self, path: &Path) -> bool {
    self.lock().contains_key(path)
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, usize>> {
    self.counters.lock().unwrap_or_else(PoisonError::into_inner)
  }
}
