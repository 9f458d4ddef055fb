use crate::error::{DirconfError, Result};
use crate::layer::store::ConfigLayer;
use regex::Regex;

/// Compile a key-filter pattern.
pub fn compile_filter(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| DirconfError::InvalidFilter {
		pattern: pattern.to_string(),
		source,
	})
}

/// Render a layer's serialized form, keeping only keys whose name matches
/// the filter. `None` renders everything.
pub fn render_filtered(layer: &ConfigLayer, filter: Option<&Regex>) -> String {
	match filter {
		None => layer.to_string(),
		Some(regex) => {
			let mut lines = Vec::new();
			for (name, record) in layer.iter() {
				if regex.is_match(name) {
					let rendered = record.to_string();
					if !rendered.is_empty() {
						lines.push(rendered);
					}
				}
			}
			lines.join("\n")
		}
	}
}
