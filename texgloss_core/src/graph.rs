//! Dependency graph construction and degree queries.
//!
//! Nodes are entry keys; an edge `(source, target)` exists when the source
//! entry's description references the target entry. Edges are deduplicated
//! per pair and self-loops are never emitted. The only query an external
//! visualization collaborator needs is degrees plus a deterministic
//! top-K-by-in-degree listing, so that is all this module exposes.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Serialize;

use crate::entries::EntryTable;

/// A reference whose target key is absent from the entry table. The edge is
/// omitted; the occurrence is reported as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
	/// Key of the referencing entry.
	pub source: String,
	/// The key that was referenced but never declared.
	pub target: String,
}

/// Directed graph of inter-entry references.
#[derive(Debug, Default)]
pub struct DependencyGraph {
	nodes: BTreeSet<String>,
	edges: BTreeSet<(String, String)>,
}

impl DependencyGraph {
	/// Build the graph from a resolved entry table. Returns the graph and
	/// the dangling references encountered, deduplicated per (source, target)
	/// pair to mirror edge deduplication.
	pub fn build(table: &EntryTable, heuristic_links: bool) -> (Self, Vec<DanglingReference>) {
		let mut graph = Self::default();
		let mut dangling = BTreeSet::new();

		for key in table.keys() {
			graph.nodes.insert(key.clone());
		}

		for entry in table.values() {
			for target in &entry.outgoing_refs {
				if !table.contains_key(target) {
					dangling.insert((entry.key.clone(), target.clone()));
					continue;
				}

				if target != &entry.key {
					graph.edges.insert((entry.key.clone(), target.clone()));
				}
			}

			if heuristic_links {
				graph.add_heuristic_links(entry.key.as_str(), &entry.resolved_description, table);
			}
		}

		let dangling = dangling
			.into_iter()
			.map(|(source, target)| DanglingReference { source, target })
			.collect();

		(graph, dangling)
	}

	/// Plain-text linking: an edge to any other entry whose key or display
	/// name appears as a whole, case-insensitive word in the description.
	/// Off by default because of its materially higher false-positive rate.
	fn add_heuristic_links(&mut self, source: &str, description: &str, table: &EntryTable) {
		let haystack = description.to_ascii_lowercase();

		for entry in table.values() {
			if entry.key == source {
				continue;
			}

			let key_hit = contains_whole_word(&haystack, &entry.key.to_ascii_lowercase());
			let name_hit =
				|| contains_whole_word(&haystack, &entry.name().to_ascii_lowercase());

			if key_hit || name_hit() {
				self.edges.insert((source.to_string(), entry.key.clone()));
			}
		}
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	pub fn contains_edge(&self, source: &str, target: &str) -> bool {
		self.edges
			.contains(&(source.to_string(), target.to_string()))
	}

	pub fn in_degree(&self, key: &str) -> usize {
		self.edges.iter().filter(|(_, target)| target == key).count()
	}

	pub fn out_degree(&self, key: &str) -> usize {
		self.edges.iter().filter(|(source, _)| source == key).count()
	}

	/// The top `k` nodes by in-degree, descending, ties broken by ascending
	/// key. Deterministic for any input.
	pub fn top_by_in_degree(&self, k: usize) -> Vec<(String, usize)> {
		let mut in_degrees: BTreeMap<&str, usize> =
			self.nodes.iter().map(|key| (key.as_str(), 0)).collect();

		for (_, target) in &self.edges {
			if let Some(count) = in_degrees.get_mut(target.as_str()) {
				*count += 1;
			}
		}

		let mut ranked: Vec<(String, usize)> = in_degrees
			.into_iter()
			.map(|(key, count)| (key.to_string(), count))
			.collect();

		// BTreeMap iteration is already key-ascending, and the sort is
		// stable, so equal degrees keep ascending-key order.
		ranked.sort_by(|a, b| b.1.cmp(&a.1));
		ranked.truncate(k);
		ranked
	}

	/// Serializable artifact for external visualization or export.
	pub fn artifact(&self) -> GraphArtifact {
		let nodes = self
			.nodes
			.iter()
			.map(|key| {
				NodeRecord {
					key: key.clone(),
					in_degree: self.in_degree(key),
					out_degree: self.out_degree(key),
				}
			})
			.collect();

		let edges = self
			.edges
			.iter()
			.map(|(source, target)| {
				EdgeRecord {
					source: source.clone(),
					target: target.clone(),
				}
			})
			.collect();

		GraphArtifact { nodes, edges }
	}
}

/// Whole-word containment over ASCII-lowercased text: the match may not be
/// bordered by an alphanumeric byte on either side.
fn contains_whole_word(haystack: &str, needle: &str) -> bool {
	if needle.is_empty() {
		return false;
	}

	let haystack_bytes = haystack.as_bytes();
	let mut from = 0;

	while let Some(found) = haystack[from..].find(needle) {
		let start = from + found;
		let end = start + needle.len();

		let left_ok = start == 0 || !haystack_bytes[start - 1].is_ascii_alphanumeric();
		let right_ok =
			end == haystack_bytes.len() || !haystack_bytes[end].is_ascii_alphanumeric();

		if left_ok && right_ok {
			return true;
		}

		from = start + 1;
	}

	false
}

/// The exported graph: node list with degrees plus a sorted edge list.
#[derive(Debug, Serialize)]
pub struct GraphArtifact {
	pub nodes: Vec<NodeRecord>,
	pub edges: Vec<EdgeRecord>,
}

/// A node together with its degree statistics.
#[derive(Debug, Serialize)]
pub struct NodeRecord {
	pub key: String,
	pub in_degree: usize,
	pub out_degree: usize,
}

/// A directed edge between two existing entry keys.
#[derive(Debug, Serialize)]
pub struct EdgeRecord {
	pub source: String,
	pub target: String,
}
