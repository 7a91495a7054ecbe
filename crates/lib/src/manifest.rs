//! The manifest type and its default serialization.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The assembled manifest: logical asset name to final path.
///
/// Key order is insertion order and serialization preserves it, so two
/// identical builds serialize to byte-identical manifests. Re-inserting an
/// existing key replaces the value in place without moving the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(IndexMap<String, String>);

impl Manifest {
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts an entry, returning the previous path under `name` if any.
  pub fn insert(&mut self, name: impl Into<String>, path: impl Into<String>) -> Option<String> {
    self.0.insert(name.into(), path.into())
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.0.get(name).map(String::as_str)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.0.contains_key(name)
  }

  pub fn remove(&mut self, name: &str) -> Option<String> {
    self.0.shift_remove(name)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Entries in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  /// Serializes as pretty-printed JSON with keys in insertion order, the
  /// default output format.
  pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(self)
  }
}

impl FromIterator<(String, String)> for Manifest {
  fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
    Self(iter.into_iter().collect())
  }
}

impl<'a> IntoIterator for &'a Manifest {
  type Item = (&'a String, &'a String);
  type IntoIter = indexmap::map::Iter<'a, String, String>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn serialization_preserves_insertion_order() {
    let mut manifest = Manifest::new();
    manifest.insert("zebra.js", "/zebra.1a.js");
    manifest.insert("apple.js", "/apple.2b.js");
    manifest.insert("mango.css", "/mango.3c.css");

    let json = manifest.to_json_pretty().unwrap();
    let zebra = json.find("zebra.js").unwrap();
    let apple = json.find("apple.js").unwrap();
    let mango = json.find("mango.css").unwrap();
    assert!(zebra < apple && apple < mango);
  }

  #[test]
  fn reinsert_replaces_value_in_place() {
    let mut manifest = Manifest::new();
    manifest.insert("main.js", "main.old.js");
    manifest.insert("style.css", "style.1.css");
    let previous = manifest.insert("main.js", "main.new.js");

    assert_eq!(previous.as_deref(), Some("main.old.js"));
    assert_eq!(manifest.get("main.js"), Some("main.new.js"));
    let keys: Vec<&str> = manifest.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["main.js", "style.css"]);
  }

  #[test]
  fn remove_returns_path_and_preserves_order() {
    let mut manifest = Manifest::new();
    manifest.insert("a.js", "a.1.js");
    manifest.insert("b.js", "b.2.js");
    manifest.insert("c.css", "c.3.css");

    assert_eq!(manifest.remove("b.js").as_deref(), Some("b.2.js"));
    assert_eq!(manifest.remove("b.js"), None);
    let keys: Vec<&str> = manifest.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["a.js", "c.css"]);
  }

  #[test]
  fn empty_manifest_serializes_as_empty_object() {
    assert_eq!(Manifest::new().to_json_pretty().unwrap(), "{}");
  }

  #[test]
  fn deserializes_from_json_object() {
    let manifest: Manifest = serde_json::from_str(r#"{"a.js": "a.1.js", "b.js": "b.2.js"}"#).unwrap();
    assert_eq!(manifest.len(), 2);
    assert_eq!(manifest.get("a.js"), Some("a.1.js"));
  }
}
