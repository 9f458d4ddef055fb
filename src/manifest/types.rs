use crate::entry::types::validate_key_name;
use crate::error::Result;
use crate::layer::store::ConfigLayer;
use serde::Deserialize;
use std::path::PathBuf;

/// Sidecar manifest describing how layer files should be read.
///
/// The multiplicity scheme must be known before ingestion, so it travels in
/// a small TOML file next to the layer files rather than in the line format
/// itself.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Manifest {
	/// Keys that may repeat with distinct values.
	#[serde(default)]
	pub multi_keys: Vec<String>,

	/// Layer files in merge order, least specific first. Relative paths
	/// resolve against the manifest's own directory.
	#[serde(default)]
	pub layers: Vec<PathBuf>,
}

impl Manifest {
	/// Validate that every declared repeatable key is usable as a directive
	/// name.
	pub fn validate(&self) -> Result<()> {
		for name in &self.multi_keys {
			validate_key_name(name)?;
		}
		Ok(())
	}

	/// Mark this manifest's repeatable keys on an existing layer.
	pub fn apply_scheme(&self, layer: &mut ConfigLayer) {
		for name in &self.multi_keys {
			layer.set_key_multiple(name, true);
		}
	}

	/// A fresh empty layer carrying this manifest's multiplicity scheme.
	pub fn seed_layer(&self) -> ConfigLayer {
		let mut layer = ConfigLayer::new();
		self.apply_scheme(&mut layer);
		layer
	}
}

/// A parsed manifest with its source path for path resolution and display.
#[derive(Debug, Clone)]
pub struct LoadedManifest {
	/// The parsed manifest.
	pub manifest: Manifest,

	/// The path this manifest was loaded from.
	pub path: PathBuf,
}

impl LoadedManifest {
	/// The manifest's layer list with relative paths resolved against the
	/// manifest's directory.
	pub fn resolve_layers(&self) -> Vec<PathBuf> {
		let base = self.path.parent();
		self.manifest
			.layers
			.iter()
			.map(|layer| match base {
				Some(dir) if layer.is_relative() => dir.join(layer),
				_ => layer.clone(),
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_validate_accepts_directive_names() {
		let manifest = Manifest {
			multi_keys: vec!["sync".to_string(), "sync-neighbour".to_string()],
			layers: Vec::new(),
		};
		assert!(manifest.validate().is_ok());
	}

	#[test]
	fn test_validate_rejects_whitespace_names() {
		let manifest = Manifest {
			multi_keys: vec!["sync neighbour".to_string()],
			layers: Vec::new(),
		};
		assert!(manifest.validate().is_err());
	}

	#[test]
	fn test_seed_layer_carries_scheme() {
		let manifest = Manifest {
			multi_keys: vec!["sync".to_string()],
			layers: Vec::new(),
		};
		let layer = manifest.seed_layer();
		assert!(layer.is_empty());
		assert!(layer.is_multiple("sync"));
		assert!(!layer.is_multiple("pcap-pool"));
	}

	#[test]
	fn test_resolve_layers_against_manifest_dir() {
		let loaded = LoadedManifest {
			manifest: Manifest {
				multi_keys: Vec::new(),
				layers: vec![PathBuf::from("base.conf"), PathBuf::from("/abs/site.conf")],
			},
			path: PathBuf::from("/etc/dirconf/.dirconf.toml"),
		};

		let resolved = loaded.resolve_layers();
		assert_eq!(resolved[0], PathBuf::from("/etc/dirconf/base.conf"));
		assert_eq!(resolved[1], PathBuf::from("/abs/site.conf"));
	}
}
