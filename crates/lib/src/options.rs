//! Configuration surface for the manifest builder.
//!
//! The plain-data fields deserialize from host configuration, with defaults
//! for anything omitted and unknown keys ignored. The hook fields are
//! code-only: hosts install them through the `with_*` builders.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::collect::FileEntry;
use crate::consts::{DEFAULT_FILE_NAME, DEFAULT_TRANSFORM_EXTENSIONS};
use crate::graph::BuildPass;
use crate::manifest::Manifest;

/// Error type produced by user hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Keep predicate over collected entries.
pub type FilterFn = Box<dyn Fn(&FileEntry) -> bool + Send + Sync>;

/// Per-entry transform applied after filtering.
pub type MapFn = Box<dyn Fn(FileEntry) -> FileEntry + Send + Sync>;

/// Comparator ordering entries just before the merge loop.
pub type SortFn = Box<dyn Fn(&FileEntry, &FileEntry) -> Ordering + Send + Sync>;

/// Full-control manifest producer. When installed it replaces the default
/// merge policy entirely: it receives the seed, every collected entry
/// unfiltered, and the finished pass, and its result becomes the manifest.
pub type GenerateFn =
  Box<dyn Fn(Manifest, &[FileEntry], &BuildPass) -> Result<Manifest, HookError> + Send + Sync>;

/// Manifest serializer replacing the default pretty-printed JSON.
pub type SerializeFn = Box<dyn Fn(&Manifest) -> Result<String, HookError> + Send + Sync>;

/// Extensions that keep their preceding dot-segment when a file type is
/// computed, so `.js.map`-style names survive as two-segment types.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct TransformExtensions(Vec<String>);

impl TransformExtensions {
  pub fn new(extensions: impl IntoIterator<Item = impl Into<String>>) -> Self {
    Self(extensions.into_iter().map(Into::into).collect())
  }

  /// Case-insensitive membership test.
  pub fn matches(&self, extension: &str) -> bool {
    self.0.iter().any(|e| e.eq_ignore_ascii_case(extension))
  }
}

impl Default for TransformExtensions {
  fn default() -> Self {
    Self::new(DEFAULT_TRANSFORM_EXTENSIONS.iter().copied())
  }
}

/// Options controlling manifest derivation for one builder instance.
#[derive(Deserialize)]
#[serde(default)]
pub struct ManifestOptions {
  /// Prefix for entry paths. `None` inherits the build's public path; an
  /// explicit empty string disables prefixing altogether.
  pub public_path: Option<String>,
  /// Prefix for manifest keys.
  pub base_path: Option<String>,
  /// Output artifact name, resolved against the output directory. May point
  /// outside it.
  pub file_name: String,
  /// Extensions computing two-segment file types.
  pub transform_extensions: TransformExtensions,
  /// Also write the manifest synchronously to the resolved output path when
  /// it publishes.
  pub write_to_file_emit: bool,
  /// Initial manifest contents, preserved unless an entry shares a key.
  pub seed: Option<Manifest>,
  /// Keep predicate; entries rejected here never reach the manifest.
  #[serde(skip)]
  pub filter: Option<FilterFn>,
  /// Per-entry transform.
  #[serde(skip)]
  pub map: Option<MapFn>,
  /// Entry comparator.
  #[serde(skip)]
  pub sort: Option<SortFn>,
  /// Full-control manifest producer.
  #[serde(skip)]
  pub generate: Option<GenerateFn>,
  /// Custom serializer.
  #[serde(skip)]
  pub serialize: Option<SerializeFn>,
}

impl Default for ManifestOptions {
  fn default() -> Self {
    Self {
      public_path: None,
      base_path: None,
      file_name: DEFAULT_FILE_NAME.to_string(),
      transform_extensions: TransformExtensions::default(),
      write_to_file_emit: false,
      seed: None,
      filter: None,
      map: None,
      sort: None,
      generate: None,
      serialize: None,
    }
  }
}

impl ManifestOptions {
  pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
    self.file_name = file_name.into();
    self
  }

  pub fn with_public_path(mut self, public_path: impl Into<String>) -> Self {
    self.public_path = Some(public_path.into());
    self
  }

  pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
    self.base_path = Some(base_path.into());
    self
  }

  pub fn with_seed(mut self, seed: Manifest) -> Self {
    self.seed = Some(seed);
    self
  }

  pub fn with_write_to_file_emit(mut self, write: bool) -> Self {
    self.write_to_file_emit = write;
    self
  }

  pub fn with_filter(mut self, filter: impl Fn(&FileEntry) -> bool + Send + Sync + 'static) -> Self {
    self.filter = Some(Box::new(filter));
    self
  }

  pub fn with_map(mut self, map: impl Fn(FileEntry) -> FileEntry + Send + Sync + 'static) -> Self {
    self.map = Some(Box::new(map));
    self
  }

  pub fn with_sort(
    mut self,
    sort: impl Fn(&FileEntry, &FileEntry) -> Ordering + Send + Sync + 'static,
  ) -> Self {
    self.sort = Some(Box::new(sort));
    self
  }

  pub fn with_generate(
    mut self,
    generate: impl Fn(Manifest, &[FileEntry], &BuildPass) -> Result<Manifest, HookError>
    + Send
    + Sync
    + 'static,
  ) -> Self {
    self.generate = Some(Box::new(generate));
    self
  }

  pub fn with_serialize(
    mut self,
    serialize: impl Fn(&Manifest) -> Result<String, HookError> + Send + Sync + 'static,
  ) -> Self {
    self.serialize = Some(Box::new(serialize));
    self
  }
}
