use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::WalkBuilder;
use texgloss_cli::Commands;
use texgloss_cli::TexglossCli;
use texgloss_core::AnyEmptyResult;
use texgloss_core::BuildOutput;
use texgloss_core::GlossError;
use texgloss_core::SourceText;
use texgloss_core::TexglossConfig;
use texgloss_core::build_corpus;

fn main() {
	let args = TexglossCli::parse();

	let filter = if args.verbose { "debug" } else { "warn" };
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::new(filter))
		.with_writer(std::io::stderr)
		.init();

	let result = match args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Build { dry_run }) => run_build(&args, dry_run),
		Some(Commands::Check) => run_check(&args),
		Some(Commands::Graph { top }) => run_graph(&args, top),
		None => {
			eprintln!("No subcommand specified. Run `texgloss --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Render through miette for rich diagnostics with help text and
		// error codes.
		match e.downcast::<GlossError>() {
			Ok(gloss_err) => {
				let report: miette::Report = (*gloss_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("error: {e}");
			}
		}
		process::exit(1);
	}
}

fn resolve_root(args: &TexglossCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn run_init(args: &TexglossCli) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config_path = root.join("texgloss.toml");

	if config_path.exists() {
		println!("Config file already exists: {}", config_path.display());
		return Ok(());
	}

	let sample = "[build]\n\
	              duplicate_keys = \"first-wins\"\n\
	              heuristic_links = false\n\
	              max_expansion_passes = 10\n\
	              \n\
	              [sources]\n\
	              patterns = [\"**/*.tex\"]\n\
	              \n\
	              [output]\n\
	              dir = \"flattened\"\n";

	std::fs::write(&config_path, sample)?;
	println!("Created config file: {}", config_path.display());

	Ok(())
}

fn run_build(args: &TexglossCli, dry_run: bool) -> AnyEmptyResult {
	let root = resolve_root(args);
	let (config, output) = build_at(&root)?;
	let summary = output.summary();

	println!(
		"Flattened {} source(s): {} entries, {} graph edge(s)",
		output.sources.len(),
		output.entries.len(),
		output.graph.edge_count()
	);

	if args.verbose {
		for diagnostic in &output.diagnostics {
			eprintln!("warning: {}: {}", diagnostic.source, diagnostic.message());
		}
	}

	if summary != texgloss_core::DiagnosticSummary::default() {
		eprintln!(
			"warnings: {} skipped entries, {} dangling references, {} expansion cap hits",
			summary.skipped_entries, summary.dangling_references, summary.expansion_cap_hits
		);
	}

	if dry_run {
		println!("Dry run; nothing written.");
		return Ok(());
	}

	let out_dir = root.join(&config.output.dir);
	std::fs::create_dir_all(&out_dir)?;

	for source in &output.sources {
		let path = out_dir.join(&source.id);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(&path, &source.text)?;
	}

	write_artifact(&out_dir.join("entries.json"), &output.entries.records())?;
	write_artifact(&out_dir.join("graph.json"), &output.graph.artifact())?;

	println!("Artifacts written to {}", out_dir.display());

	Ok(())
}

fn run_check(args: &TexglossCli) -> AnyEmptyResult {
	let root = resolve_root(args);
	let (_, output) = build_at(&root)?;

	if output.diagnostics.is_empty() {
		println!("No diagnostics; corpus is clean.");
		return Ok(());
	}

	for diagnostic in &output.diagnostics {
		eprintln!("{}: {}", diagnostic.source, diagnostic.message());
	}

	eprintln!("\n{} diagnostic(s) found.", output.diagnostics.len());
	process::exit(1);
}

fn run_graph(args: &TexglossCli, top: usize) -> AnyEmptyResult {
	let root = resolve_root(args);
	let (_, output) = build_at(&root)?;

	for (key, in_degree) in output.graph.top_by_in_degree(top) {
		let name = output
			.entries
			.get(&key)
			.map_or_else(|| key.clone(), |entry| entry.name().to_string());
		println!("{in_degree:>5}  {key}  ({name})");
	}

	Ok(())
}

/// Load the config, discover and read sources, and run the pipeline.
fn build_at(root: &Path) -> Result<(TexglossConfig, BuildOutput), texgloss_core::AnyError> {
	let config = TexglossConfig::load(root)?.unwrap_or_default();
	let sources = load_sources(root, &config)?;
	let output = build_corpus(&sources, &config.build_options())?;

	Ok((config, output))
}

/// Discover and read every source document under `root` matching the config
/// patterns. An unreadable file aborts the build; this is the one hard
/// failure class.
fn load_sources(root: &Path, config: &TexglossConfig) -> Result<Vec<SourceText>, GlossError> {
	let include = glob_set(&config.sources.patterns)?;
	let exclude = glob_set(&config.exclude.patterns)?;
	let out_dir = root.join(&config.output.dir);

	let mut sources = Vec::new();

	for result in WalkBuilder::new(root).build() {
		let entry = result.map_err(|e| GlossError::Io(std::io::Error::other(e)))?;

		if !entry.file_type().is_some_and(|t| t.is_file()) {
			continue;
		}

		// Never rescan our own output.
		if entry.path().starts_with(&out_dir) {
			continue;
		}

		let Ok(relative) = entry.path().strip_prefix(root) else {
			continue;
		};

		if !include.is_match(relative) || exclude.is_match(relative) {
			continue;
		}

		let text = std::fs::read_to_string(entry.path())?;
		sources.push(SourceText::new(relative.display().to_string(), text));
	}

	// Walk order is platform-dependent; declaration order must not be.
	sources.sort_by(|a, b| a.id.cmp(&b.id));

	Ok(sources)
}

fn glob_set(patterns: &[String]) -> Result<GlobSet, GlossError> {
	let mut builder = GlobSetBuilder::new();

	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| GlossError::ConfigParse(e.to_string()))?;
		builder.add(glob);
	}

	builder
		.build()
		.map_err(|e| GlossError::ConfigParse(e.to_string()))
}

fn write_artifact<T: serde::Serialize>(path: &Path, value: &T) -> AnyEmptyResult {
	let json = serde_json::to_string_pretty(value).map_err(|e| {
		GlossError::ArtifactSerialize {
			artifact: path.display().to_string(),
			reason: e.to_string(),
		}
	})?;

	std::fs::write(path, json)?;

	Ok(())
}
