use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use regex::Regex;
use std::path::PathBuf;
use std::process::ExitCode;

use dirconf_cli::layer::{
	ConfigLayer, compile_filter, load_layer_file, load_layer_file_strict, merge, render_filtered,
	write_layer_file,
};
use dirconf_cli::manifest::{LoadedManifest, discover_manifest, parse_manifest_file};

#[derive(Parser)]
#[command(name = "dirconf")]
#[command(
	author,
	version,
	about = "CLI tool for parsing and merging layered directive config files"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Merge layer files, least specific first, and print or write the result
	Merge {
		/// Layer files in merge order (defaults to the manifest's layer list)
		layers: Vec<PathBuf>,

		/// Manifest file to use instead of discovery
		#[arg(long, value_name = "PATH")]
		manifest: Option<PathBuf>,

		/// Run without any manifest, even if one would be discovered
		#[arg(long, conflicts_with = "manifest")]
		no_manifest: bool,

		/// Write the merged result to a file instead of stdout
		#[arg(short, long, value_name = "FILE")]
		output: Option<PathBuf>,

		/// Only emit keys whose name matches this regex
		#[arg(long, value_name = "REGEX")]
		filter: Option<String>,
	},

	/// Parse one layer file permissively and print its canonical form
	Show {
		/// Layer file to read
		layer: PathBuf,

		/// Manifest file to use instead of discovery
		#[arg(long, value_name = "PATH")]
		manifest: Option<PathBuf>,

		/// Run without any manifest, even if one would be discovered
		#[arg(long, conflicts_with = "manifest")]
		no_manifest: bool,

		/// Only emit keys whose name matches this regex
		#[arg(long, value_name = "REGEX")]
		filter: Option<String>,
	},

	/// Strictly check layer files, reporting every malformed line
	Validate {
		/// Layer files to check (defaults to the manifest's layer list)
		layers: Vec<PathBuf>,

		/// Manifest file to use instead of discovery
		#[arg(long, value_name = "PATH")]
		manifest: Option<PathBuf>,

		/// Run without any manifest, even if one would be discovered
		#[arg(long, conflicts_with = "manifest")]
		no_manifest: bool,
	},
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Merge {
			layers,
			manifest,
			no_manifest,
			output,
			filter,
		} => handle_merge(layers, manifest, no_manifest, output, filter),
		Commands::Show {
			layer,
			manifest,
			no_manifest,
			filter,
		} => handle_show(layer, manifest, no_manifest, filter),
		Commands::Validate {
			layers,
			manifest,
			no_manifest,
		} => handle_validate(layers, manifest, no_manifest),
	}
}

/// Load the governing manifest: an explicit path wins, otherwise discovery
/// from the current directory, unless disabled.
fn resolve_manifest(
	explicit: Option<PathBuf>,
	no_manifest: bool,
) -> Result<Option<LoadedManifest>> {
	if no_manifest {
		return Ok(None);
	}

	if let Some(path) = explicit {
		let manifest = parse_manifest_file(&path)
			.with_context(|| format!("Failed to load manifest {}", path.display()))?;
		return Ok(Some(LoadedManifest { manifest, path }));
	}

	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	discover_manifest(&cwd).context("Failed to load discovered manifest")
}

/// The layer paths to operate on: explicit arguments win over the
/// manifest's own list.
fn resolve_layer_paths(
	given: Vec<PathBuf>,
	manifest: Option<&LoadedManifest>,
) -> Result<Vec<PathBuf>> {
	let paths = if given.is_empty() {
		manifest.map(LoadedManifest::resolve_layers).unwrap_or_default()
	} else {
		given
	};

	if paths.is_empty() {
		anyhow::bail!("No layer files given (pass paths, or list them in a manifest)");
	}
	Ok(paths)
}

fn template_layer(manifest: Option<&LoadedManifest>) -> ConfigLayer {
	match manifest {
		Some(loaded) => loaded.manifest.seed_layer(),
		None => ConfigLayer::new(),
	}
}

fn parse_filter(filter: Option<&str>) -> Result<Option<Regex>> {
	filter
		.map(|pattern| {
			compile_filter(pattern)
				.with_context(|| format!("Failed to compile filter {pattern:?}"))
		})
		.transpose()
}

fn handle_merge(
	layers: Vec<PathBuf>,
	manifest: Option<PathBuf>,
	no_manifest: bool,
	output: Option<PathBuf>,
	filter: Option<String>,
) -> Result<ExitCode> {
	let filter = parse_filter(filter.as_deref())?;
	let loaded_manifest = resolve_manifest(manifest, no_manifest)?;
	let paths = resolve_layer_paths(layers, loaded_manifest.as_ref())?;
	let template = template_layer(loaded_manifest.as_ref());

	let mut loaded = Vec::new();
	for path in &paths {
		let layer = load_layer_file(path, &template)
			.with_context(|| format!("Failed to load layer {}", path.display()))?;
		loaded.push(layer);
	}

	let layer_refs: Vec<Option<&ConfigLayer>> = loaded.iter().map(Some).collect();
	let merged = merge(&layer_refs).context("Nothing to merge")?;

	match output {
		Some(out) => {
			match &filter {
				None => write_layer_file(&merged, &out)
					.with_context(|| format!("Failed to write {}", out.display()))?,
				Some(regex) => {
					let mut rendered = render_filtered(&merged, Some(regex));
					if !rendered.is_empty() {
						rendered.push('\n');
					}
					std::fs::write(&out, rendered)
						.with_context(|| format!("Failed to write {}", out.display()))?;
				}
			}
			println!("Wrote {}", out.display());
		}
		None => {
			let rendered = render_filtered(&merged, filter.as_ref());
			if !rendered.is_empty() {
				println!("{rendered}");
			}
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_show(
	layer: PathBuf,
	manifest: Option<PathBuf>,
	no_manifest: bool,
	filter: Option<String>,
) -> Result<ExitCode> {
	let filter = parse_filter(filter.as_deref())?;
	let loaded_manifest = resolve_manifest(manifest, no_manifest)?;
	let template = template_layer(loaded_manifest.as_ref());

	let parsed = load_layer_file(&layer, &template)
		.with_context(|| format!("Failed to load layer {}", layer.display()))?;

	let rendered = render_filtered(&parsed, filter.as_ref());
	if !rendered.is_empty() {
		println!("{rendered}");
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_validate(
	layers: Vec<PathBuf>,
	manifest: Option<PathBuf>,
	no_manifest: bool,
) -> Result<ExitCode> {
	let loaded_manifest = resolve_manifest(manifest, no_manifest)?;
	let paths = resolve_layer_paths(layers, loaded_manifest.as_ref())?;
	let template = template_layer(loaded_manifest.as_ref());

	let mut malformed = 0usize;
	for path in &paths {
		let (parsed, diagnostics) = load_layer_file_strict(path, &template)
			.with_context(|| format!("Failed to load layer {}", path.display()))?;

		if diagnostics.is_empty() {
			println!("  {} ({} keys)", path.display(), parsed.len());
		} else {
			for diagnostic in &diagnostics {
				eprintln!(
					"{}:{}: {}: {}",
					path.display(),
					diagnostic.line,
					diagnostic.error,
					diagnostic.text
				);
			}
			malformed += diagnostics.len();
		}
	}

	if malformed > 0 {
		eprintln!("{malformed} malformed line(s)");
		Ok(ExitCode::FAILURE)
	} else {
		println!("All layer files are valid");
		Ok(ExitCode::SUCCESS)
	}
}
