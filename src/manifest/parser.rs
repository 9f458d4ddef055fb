use crate::error::{DirconfError, Result};
use crate::manifest::types::Manifest;
use std::path::Path;

/// Parse a manifest file from the given path.
pub fn parse_manifest_file(path: &Path) -> Result<Manifest> {
	let content =
		std::fs::read_to_string(path).map_err(|source| DirconfError::ManifestReadError {
			path: path.to_path_buf(),
			source,
		})?;

	parse_manifest_str(&content, path)
}

/// Parse a manifest from a string (useful for testing).
pub fn parse_manifest_str(content: &str, path: &Path) -> Result<Manifest> {
	let manifest: Manifest =
		toml::from_str(content).map_err(|source| DirconfError::ManifestParseError {
			path: path.to_path_buf(),
			source,
		})?;

	// Validate the parsed manifest
	manifest.validate()?;

	Ok(manifest)
}
