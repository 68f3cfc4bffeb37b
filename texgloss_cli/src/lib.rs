use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct TexglossCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the corpus root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Initialize a project by creating a sample texgloss.toml.
	Init,
	/// Expand macros, resolve references, and write the flattened sources
	/// plus the entry and graph artifacts.
	Build {
		/// Run the pipeline and report, without writing files.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// Run the pipeline and report every diagnostic; exit non-zero when any
	/// were produced.
	Check,
	/// Print the most-referenced entries by in-degree.
	Graph {
		/// How many entries to list.
		#[arg(long, default_value_t = 10)]
		top: usize,
	},
}
