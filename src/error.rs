use std::path::PathBuf;

/// Library-level structured errors for dirconf.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum DirconfError {
	#[error("Failed to read layer file: {path}")]
	LayerReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write layer file: {path}")]
	LayerWriteError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read manifest file: {path}")]
	ManifestReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse manifest file: {path}")]
	ManifestParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid key name: {name:?} (must be non-empty, without whitespace)")]
	InvalidKeyName { name: String },

	#[error("Invalid filter pattern: {pattern}")]
	InvalidFilter {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using DirconfError.
pub type Result<T> = std::result::Result<T, DirconfError>;
