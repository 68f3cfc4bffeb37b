//! The build pipeline: strip comments → expand macros → extract entries →
//! resolve references → build the graph.
//!
//! A build is synchronous and atomic per invocation; all intermediate state
//! lives in the per-call context, so independent corpora can be built
//! concurrently without shared mutable state. Local failures (one bad macro
//! call, one malformed entry) degrade into diagnostics; the build always
//! produces usable output.

use std::collections::HashMap;

use serde::Serialize;

use crate::GlossResult;
use crate::entries::DuplicateKeyPolicy;
use crate::entries::Entry;
use crate::entries::EntryTable;
use crate::entries::extract_entries;
use crate::graph::DependencyGraph;
use crate::macros::DEFAULT_MAX_EXPANSION_PASSES;
use crate::macros::MacroTable;
use crate::macros::expand;
use crate::resolver::resolve_references;
use crate::scanner::strip_comments;

/// Build-wide policy flags.
#[derive(Debug, Clone)]
pub struct BuildOptions {
	/// How duplicate entry keys across sources are handled.
	pub duplicate_keys: DuplicateKeyPolicy,
	/// Also link entries on whole-word plain-text mentions. Off by default.
	pub heuristic_links: bool,
	/// Cap on whole-text macro expansion passes.
	pub max_expansion_passes: usize,
}

impl Default for BuildOptions {
	fn default() -> Self {
		Self {
			duplicate_keys: DuplicateKeyPolicy::default(),
			heuristic_links: false,
			max_expansion_passes: DEFAULT_MAX_EXPANSION_PASSES,
		}
	}
}

/// A caller-supplied source document. The core performs no file I/O; reading
/// is the caller's responsibility.
#[derive(Debug, Clone)]
pub struct SourceText {
	/// Stable identifier, typically a relative path.
	pub id: String,
	pub text: String,
}

impl SourceText {
	pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			text: text.into(),
		}
	}
}

/// A source after macro expansion and reference resolution, ready for an
/// external renderer.
#[derive(Debug, Clone)]
pub struct RenderedSource {
	pub id: String,
	pub text: String,
}

/// The kind of diagnostic produced during a build.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub enum DiagnosticKind {
	/// An entry declaration had no usable `description` field and was
	/// dropped from the table.
	MissingDescription { key: String },
	/// A reference named a key absent from the entry table; the edge was
	/// omitted and the text fell back to the literal key.
	DanglingReference { source_key: String, target: String },
	/// The expansion pass cap was hit while substitutions were still being
	/// made; some macro was left partially expanded.
	ExpansionCapReached { passes: usize },
	/// An invocation of a known macro could not capture a required argument
	/// and was left as literal text.
	MissingMacroArgument { name: String },
	/// Entry declarations whose key or body group never closed.
	MalformedEntries { count: usize },
}

/// A non-fatal condition encountered during a build, attributed to the
/// source it arose in.
#[derive(Debug, Clone, Serialize)]
pub struct BuildDiagnostic {
	/// Identifier of the source the condition arose in.
	pub source: String,
	pub kind: DiagnosticKind,
}

impl BuildDiagnostic {
	/// Human-readable message for this diagnostic.
	pub fn message(&self) -> String {
		match &self.kind {
			DiagnosticKind::MissingDescription { key } => {
				format!("entry `{key}` has no description field and was dropped")
			}
			DiagnosticKind::DanglingReference { source_key, target } => {
				format!("entry `{source_key}` references unknown key `{target}`")
			}
			DiagnosticKind::ExpansionCapReached { passes } => {
				format!("macro expansion stopped after {passes} passes without reaching a fixed point")
			}
			DiagnosticKind::MissingMacroArgument { name } => {
				format!("invocation of `\\{name}` is missing a required argument")
			}
			DiagnosticKind::MalformedEntries { count } => {
				format!("{count} entry declaration(s) could not be delimited and were skipped")
			}
		}
	}
}

/// Per-kind counts over a build's diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticSummary {
	pub skipped_entries: usize,
	pub dangling_references: usize,
	pub expansion_cap_hits: usize,
	pub missing_macro_arguments: usize,
	pub malformed_entries: usize,
}

/// Everything a build produces. External collaborators consume the rendered
/// sources, the normalized entry records, and the graph artifact.
#[derive(Debug)]
pub struct BuildOutput {
	/// Per-source fully expanded and reference-resolved text, in input
	/// order.
	pub sources: Vec<RenderedSource>,
	/// The canonical entry table.
	pub entries: EntryTable,
	/// The inter-entry dependency graph.
	pub graph: DependencyGraph,
	/// Non-fatal conditions aggregated across the whole build.
	pub diagnostics: Vec<BuildDiagnostic>,
}

impl BuildOutput {
	/// Per-kind diagnostic counts.
	pub fn summary(&self) -> DiagnosticSummary {
		let mut summary = DiagnosticSummary::default();

		for diagnostic in &self.diagnostics {
			match &diagnostic.kind {
				DiagnosticKind::MissingDescription { .. } => summary.skipped_entries += 1,
				DiagnosticKind::DanglingReference { .. } => summary.dangling_references += 1,
				DiagnosticKind::ExpansionCapReached { .. } => summary.expansion_cap_hits += 1,
				DiagnosticKind::MissingMacroArgument { .. } => {
					summary.missing_macro_arguments += 1;
				}
				DiagnosticKind::MalformedEntries { count } => {
					summary.malformed_entries += count;
				}
			}
		}

		summary
	}
}

/// Run the full pipeline over an ordered collection of sources.
#[tracing::instrument(skip_all, fields(sources = sources.len()))]
pub fn build_corpus(sources: &[SourceText], options: &BuildOptions) -> GlossResult<BuildOutput> {
	let mut diagnostics = Vec::new();

	// Comments go first so commented-out declarations never register.
	let stripped: Vec<(String, String)> = sources
		.iter()
		.map(|source| (source.id.clone(), strip_comments(&source.text)))
		.collect();

	let mut macros = MacroTable::default();
	for (_, text) in &stripped {
		macros.collect(text);
	}
	tracing::debug!(macros = macros.len(), "collected macro definitions");

	let mut expanded = Vec::with_capacity(stripped.len());
	for (id, text) in &stripped {
		let outcome = expand(text, &macros, options.max_expansion_passes);

		if outcome.cap_reached {
			diagnostics.push(BuildDiagnostic {
				source: id.clone(),
				kind: DiagnosticKind::ExpansionCapReached {
					passes: outcome.passes,
				},
			});
		}

		for name in outcome.missing_args {
			diagnostics.push(BuildDiagnostic {
				source: id.clone(),
				kind: DiagnosticKind::MissingMacroArgument { name },
			});
		}

		expanded.push((id.clone(), outcome.text));
	}

	let mut entries = EntryTable::default();
	let mut declared_in: HashMap<String, String> = HashMap::new();

	for (id, text) in &expanded {
		let outcome = extract_entries(text);

		if outcome.malformed > 0 {
			diagnostics.push(BuildDiagnostic {
				source: id.clone(),
				kind: DiagnosticKind::MalformedEntries {
					count: outcome.malformed,
				},
			});
		}

		for raw in outcome.entries {
			let description = raw.fields.get("description").map_or("", String::as_str);

			if description.trim().is_empty() {
				diagnostics.push(BuildDiagnostic {
					source: id.clone(),
					kind: DiagnosticKind::MissingDescription { key: raw.key },
				});
				continue;
			}

			let entry = Entry {
				key: raw.key.clone(),
				resolved_description: description.to_string(),
				fields: raw.fields,
				outgoing_refs: Vec::new(),
			};

			if entries.insert(entry, options.duplicate_keys) {
				declared_in.insert(raw.key, id.clone());
			}
		}
	}
	tracing::debug!(entries = entries.len(), "extracted entry table");

	// Descriptions resolve against the finished table, so compute first and
	// write back after.
	let mut keys: Vec<String> = entries.keys().cloned().collect();
	keys.sort();

	let resolutions: Vec<(String, crate::resolver::Resolution)> = keys
		.iter()
		.map(|key| {
			let entry = &entries[key];
			(key.clone(), resolve_references(entry.description(), &entries))
		})
		.collect();

	for (key, resolution) in resolutions {
		if let Some(entry) = entries.get_mut(&key) {
			entry.resolved_description = resolution.text;
			entry.outgoing_refs = resolution.references;
		}
	}

	let (graph, dangling) = DependencyGraph::build(&entries, options.heuristic_links);
	for reference in dangling {
		diagnostics.push(BuildDiagnostic {
			source: declared_in
				.get(&reference.source)
				.cloned()
				.unwrap_or_default(),
			kind: DiagnosticKind::DanglingReference {
				source_key: reference.source,
				target: reference.target,
			},
		});
	}
	tracing::debug!(
		nodes = graph.node_count(),
		edges = graph.edge_count(),
		"built dependency graph"
	);

	let rendered = expanded
		.into_iter()
		.map(|(id, text)| {
			RenderedSource {
				text: resolve_references(&text, &entries).text,
				id,
			}
		})
		.collect();

	Ok(BuildOutput {
		sources: rendered,
		entries,
		graph,
		diagnostics,
	})
}
