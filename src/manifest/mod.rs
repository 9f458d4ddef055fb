//! Manifest loading and discovery.
//!
//! This module handles:
//! - TOML manifest parsing (multiplicity scheme + ordered layer list)
//! - Directory walk-up discovery with a user-level fallback
//! - Seeding layers with a manifest's scheme

pub mod locate;
pub mod parser;
pub mod types;

pub use locate::{MANIFEST_FILE_NAME, discover_manifest, locate_manifest, user_manifest_path};
pub use parser::{parse_manifest_file, parse_manifest_str};
pub use types::{LoadedManifest, Manifest};
