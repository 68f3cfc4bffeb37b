use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::GlossError;
use crate::GlossResult;
use crate::engine::BuildOptions;
use crate::entries::DuplicateKeyPolicy;
use crate::macros::DEFAULT_MAX_EXPANSION_PASSES;

/// Configuration loaded from a `texgloss.toml` file.
///
/// ```toml
/// [build]
/// duplicate_keys = "first-wins"
/// heuristic_links = false
/// max_expansion_passes = 10
///
/// [sources]
/// patterns = ["**/*.tex"]
///
/// [exclude]
/// patterns = ["build/**"]
///
/// [output]
/// dir = "flattened"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct TexglossConfig {
	/// Build-policy flags.
	#[serde(default)]
	pub build: BuildConfig,
	/// Which files supply macro and entry declarations.
	#[serde(default)]
	pub sources: SourcesConfig,
	/// Exclusion configuration.
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// Where artifacts are written.
	#[serde(default)]
	pub output: OutputConfig,
}

/// Build-policy flags as they appear in `texgloss.toml`.
#[derive(Debug, Deserialize)]
pub struct BuildConfig {
	/// Cross-source duplicate-key policy.
	#[serde(default)]
	pub duplicate_keys: DuplicateKeyPolicy,
	/// Enable whole-word plain-text linking in the graph.
	#[serde(default)]
	pub heuristic_links: bool,
	/// Cap on whole-text macro expansion passes.
	#[serde(default = "default_max_expansion_passes")]
	pub max_expansion_passes: usize,
}

impl Default for BuildConfig {
	fn default() -> Self {
		Self {
			duplicate_keys: DuplicateKeyPolicy::default(),
			heuristic_links: false,
			max_expansion_passes: DEFAULT_MAX_EXPANSION_PASSES,
		}
	}
}

fn default_max_expansion_passes() -> usize {
	DEFAULT_MAX_EXPANSION_PASSES
}

/// Glob patterns selecting source documents, relative to the project root.
#[derive(Debug, Deserialize)]
pub struct SourcesConfig {
	#[serde(default = "default_source_patterns")]
	pub patterns: Vec<String>,
}

impl Default for SourcesConfig {
	fn default() -> Self {
		Self {
			patterns: default_source_patterns(),
		}
	}
}

fn default_source_patterns() -> Vec<String> {
	vec!["**/*.tex".to_string()]
}

/// Glob patterns for files or directories to skip.
#[derive(Debug, Default, Deserialize)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

/// Output locations for flattened sources and exported artifacts.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
	/// Directory (relative to the root) receiving flattened sources,
	/// `entries.json`, and `graph.json`.
	#[serde(default = "default_output_dir")]
	pub dir: PathBuf,
}

impl Default for OutputConfig {
	fn default() -> Self {
		Self {
			dir: default_output_dir(),
		}
	}
}

fn default_output_dir() -> PathBuf {
	PathBuf::from("flattened")
}

impl TexglossConfig {
	/// Load the config from `texgloss.toml` at the given root directory.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> GlossResult<Option<TexglossConfig>> {
		let config_path = root.join("texgloss.toml");

		if !config_path.exists() {
			return Ok(None);
		}

		let content = std::fs::read_to_string(&config_path)?;
		let config: TexglossConfig =
			toml::from_str(&content).map_err(|e| GlossError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}

	/// The engine-facing policy flags carried by this config.
	pub fn build_options(&self) -> BuildOptions {
		BuildOptions {
			duplicate_keys: self.build.duplicate_keys,
			heuristic_links: self.build.heuristic_links,
			max_expansion_passes: self.build.max_expansion_passes,
		}
	}
}
