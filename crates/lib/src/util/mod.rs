//! Shared utilities.
//!
//! Common utilities used across the crate including path shaping and test
//! helpers.

pub mod paths;

#[cfg(test)]
pub mod testutil;
