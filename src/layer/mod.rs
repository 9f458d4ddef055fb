//! Layered key-value stores and their merge engine.
//!
//! This module handles:
//! - The per-source directive store with its multiplicity scheme
//! - Deterministic merging of ordered layer sequences
//! - Layer file reading/writing
//! - Key filtering of rendered output

pub mod filter;
pub mod loader;
pub mod merge;
pub mod store;

pub use filter::{compile_filter, render_filtered};
pub use loader::{load_layer_file, load_layer_file_strict, write_layer_file};
pub use merge::{merge, merge_schemes_only};
pub use store::ConfigLayer;
