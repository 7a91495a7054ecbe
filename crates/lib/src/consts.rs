//! Crate-wide constants.

/// Default name of the emitted manifest artifact.
pub const DEFAULT_FILE_NAME: &str = "manifest.json";

/// Marker substring of hot-module-replacement update files. Paths containing
/// it are incremental watch artifacts and never enter the default-policy
/// manifest.
pub const HOT_UPDATE_MARKER: &str = "hot-update";

/// Extensions that keep their preceding dot-segment when a file type is
/// computed, so `app.8f7be.js.map` yields `js.map` rather than `map`.
/// Matched case-insensitively.
pub const DEFAULT_TRANSFORM_EXTENSIONS: &[&str] = &["gz", "map"];
