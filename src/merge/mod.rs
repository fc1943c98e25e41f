//! Object merging ("extend").
//!
//! Copies the entries of one or more sources onto a target, left to right,
//! so later sources win. Shallow merges copy top-level entries as they
//! are; deep merges recurse into mappings and sequences:
//! - Mappings: merged key by key
//! - Sequences: merged index by index (not replaced)
//! - Everything else: assigned, never recursed into

mod extend;
mod options;

pub use extend::{extend, merge_layers};
pub use options::{ConfigError, MergeOptions};
