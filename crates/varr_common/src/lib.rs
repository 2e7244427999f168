//! Core container crate: a contiguous growable array that owns its backing
//! buffer, with a pluggable growth strategy and serde support.

pub mod collections;
