//! Path shaping helpers.
//!
//! Manifest keys and values are plain strings, not filesystem paths: hosts
//! hand over whatever their output layer produced, including Windows
//! separators and query-suffixed URLs. These helpers normalize that input
//! without touching the filesystem.

use std::path::{Component, Path, PathBuf};

use crate::options::TransformExtensions;

/// Replaces every backslash with a forward slash, so manifests read the same
/// regardless of the platform the build ran on.
pub fn normalize_separators(path: &str) -> String {
  path.replace('\\', "/")
}

/// Collapses `.` and `..` components without touching the filesystem, so
/// equivalent spellings of one location compare equal. A `..` at the root
/// stays at the root.
pub fn normalize_components(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::ParentDir => {
        normalized.pop();
      }
      Component::CurDir => {}
      _ => normalized.push(component),
    }
  }
  normalized
}

/// Drops a trailing `?query` suffix, if any.
pub fn strip_query(path: &str) -> &str {
  match path.split_once('?') {
    Some((stripped, _)) => stripped,
    None => path,
  }
}

/// Computes the file type of an emitted path: the trailing dot-segment after
/// query stripping, extended to two segments for transform extensions so
/// `main.8f7be.js.map` types as `js.map`. A path without any dot types as
/// itself.
pub fn file_type<'a>(path: &'a str, transform: &TransformExtensions) -> &'a str {
  let stripped = strip_query(path);
  let Some(last_dot) = stripped.rfind('.') else {
    return stripped;
  };
  let extension = &stripped[last_dot + 1..];
  if transform.matches(extension) {
    return match stripped[..last_dot].rfind('.') {
      Some(prev_dot) => &stripped[prev_dot + 1..],
      None => stripped,
    };
  }
  extension
}

#[cfg(test)]
mod tests {
  use super::*;

  fn exts() -> TransformExtensions {
    TransformExtensions::default()
  }

  #[test]
  fn plain_extension() {
    assert_eq!(file_type("main.a1b2c3.js", &exts()), "js");
  }

  #[test]
  fn query_is_stripped_before_typing() {
    assert_eq!(file_type("styles.css?v=abc123", &exts()), "css");
  }

  #[test]
  fn transform_extension_keeps_previous_segment() {
    assert_eq!(file_type("main.8f7be.js.map", &exts()), "js.map");
    assert_eq!(file_type("vendor.bundle.js.gz", &exts()), "js.gz");
  }

  #[test]
  fn transform_extension_is_case_insensitive() {
    assert_eq!(file_type("report.data.JSON.GZ", &exts()), "JSON.GZ");
  }

  #[test]
  fn dotless_path_types_as_itself() {
    assert_eq!(file_type("LICENSE", &exts()), "LICENSE");
  }

  #[test]
  fn backslashes_become_forward_slashes() {
    assert_eq!(normalize_separators(r"js\main.js"), "js/main.js");
    assert_eq!(normalize_separators("already/fine.js"), "already/fine.js");
  }

  #[test]
  fn dot_components_collapse() {
    assert_eq!(
      normalize_components(Path::new("/dist/./static/../manifest.json")),
      Path::new("/dist/manifest.json")
    );
    assert_eq!(normalize_components(Path::new("out/./nested/assets.json")), Path::new("out/nested/assets.json"));
  }

  #[test]
  fn parent_components_stop_at_the_root() {
    assert_eq!(
      normalize_components(Path::new("/dist/../../manifest.json")),
      Path::new("/manifest.json")
    );
  }
}
