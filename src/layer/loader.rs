use crate::entry::parser::ParseDiagnostic;
use crate::error::{DirconfError, Result};
use crate::layer::store::ConfigLayer;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Read a layer file permissively.
///
/// The returned layer copies the template's multiplicity scheme before
/// ingesting, so repeatable keys take their multi-valued shape from the first
/// line on. Malformed lines are dropped.
pub fn load_layer_file(path: &Path, template: &ConfigLayer) -> Result<ConfigLayer> {
	let content = read_layer(path)?;
	let mut layer = template.copy_scheme();
	layer.ingest_str(&content);
	Ok(layer)
}

/// Read a layer file strictly, returning the layer together with a
/// diagnostic for every malformed line.
pub fn load_layer_file_strict(
	path: &Path,
	template: &ConfigLayer,
) -> Result<(ConfigLayer, Vec<ParseDiagnostic>)> {
	let content = read_layer(path)?;
	let mut layer = template.copy_scheme();
	let diagnostics = layer.ingest_str_strict(&content);
	Ok((layer, diagnostics))
}

fn read_layer(path: &Path) -> Result<String> {
	std::fs::read_to_string(path).map_err(|source| DirconfError::LayerReadError {
		path: path.to_path_buf(),
		source,
	})
}

/// Write a layer's serialized form to a file, keys in lexicographic order,
/// one directive per line.
pub fn write_layer_file(layer: &ConfigLayer, path: &Path) -> Result<()> {
	let to_write_error = |source| DirconfError::LayerWriteError {
		path: path.to_path_buf(),
		source,
	};

	let file = std::fs::File::create(path).map_err(to_write_error)?;
	let mut writer = BufWriter::new(file);
	layer.write_to(&mut writer).map_err(to_write_error)?;
	writer.flush().map_err(to_write_error)
}
