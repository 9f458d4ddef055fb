use crate::error::{DirconfError, Result};
use crate::manifest::parser::parse_manifest_file;
use crate::manifest::types::LoadedManifest;
use std::path::{Path, PathBuf};

/// File name looked up during manifest discovery.
pub const MANIFEST_FILE_NAME: &str = ".dirconf.toml";

/// Walk up the directory tree from `start_dir` looking for the closest
/// manifest file.
pub fn locate_manifest(start_dir: &Path) -> Option<PathBuf> {
	let mut current_dir = start_dir.to_path_buf();

	loop {
		let candidate = current_dir.join(MANIFEST_FILE_NAME);
		if candidate.exists() {
			return Some(candidate);
		}

		// Move to parent directory
		if let Some(parent) = current_dir.parent() {
			current_dir = parent.to_path_buf();
		} else {
			return None;
		}
	}
}

/// Get the path to the user's manifest file.
pub fn user_manifest_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(DirconfError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(MANIFEST_FILE_NAME))
}

/// Discover and load the manifest governing `start_dir`: the closest one up
/// the directory tree wins, then the user's manifest, then none.
pub fn discover_manifest(start_dir: &Path) -> Result<Option<LoadedManifest>> {
	let path = match locate_manifest(start_dir) {
		Some(path) => Some(path),
		None => match user_manifest_path() {
			Ok(user_path) if user_path.exists() => Some(user_path),
			// A missing home directory only matters when we actually need
			// the fallback; treat it as "no manifest".
			_ => None,
		},
	};

	match path {
		Some(path) => {
			let manifest = parse_manifest_file(&path)?;
			Ok(Some(LoadedManifest { manifest, path }))
		}
		None => Ok(None),
	}
}
