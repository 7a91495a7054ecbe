//! waybill-lib: Core types and logic for Waybill
//!
//! This crate derives flat asset manifests from a host bundler's builds:
//! - `ManifestBuilder`: per-target lifecycle, from pass start to publication
//! - `BuildCoordinator`: pass accounting across instances and watch rebuilds
//! - `collect`: walking chunks and stats into ordered manifest entries
//! - `order`: deterministic dependency ordering of chunk groups
//! - `assemble`: seed merge, shaping hooks, serialization, disk write
//! - `adapters`: bridges from concrete host event vocabularies

pub mod adapters;
pub mod assemble;
pub mod builder;
pub mod collect;
pub mod consts;
pub mod coordinator;
pub mod graph;
pub mod manifest;
pub mod observer;
pub mod options;
pub mod order;
pub mod util;
