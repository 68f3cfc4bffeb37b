//! Entry extraction and the keyed entry table.
//!
//! An entry declaration has the shape `\newglossaryentry{key}{field=value,
//! ...}`. The body is a comma-separated field list where separators only
//! count at brace-nesting depth zero, so commas or braces inside a value
//! (nested figures, math) never fragment a field.

use std::collections::HashMap;

use derive_more::Deref;
use serde::Deserialize;
use serde::Serialize;

use crate::lexer::control_words;
use crate::scanner::next_top_level_comma;
use crate::scanner::scan_balanced;
use crate::scanner::skip_whitespace;

/// Cross-source duplicate-key policy, applied once per build. Every
/// downstream read goes through this single switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateKeyPolicy {
	/// Later declarations of an already-seen key are ignored.
	#[default]
	FirstWins,
	/// Later declarations replace earlier ones.
	LastWins,
}

/// A uniquely keyed unit of field-based metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
	/// The declaration key, unique within a build under the active duplicate
	/// policy.
	pub key: String,
	/// Raw field text keyed by case-sensitive field name. Only the first
	/// top-level occurrence of a field name per entry body is kept.
	pub fields: HashMap<String, String>,
	/// The description after cross-reference resolution. Starts as the raw
	/// description text and is rewritten once all entries are known.
	pub resolved_description: String,
	/// Referenced keys in appearance order, duplicates retained.
	pub outgoing_refs: Vec<String>,
}

impl Entry {
	/// Display name, falling back to the key when no `name` field exists.
	pub fn name(&self) -> &str {
		self.fields.get("name").map_or(&self.key, String::as_str)
	}

	pub fn field(&self, name: &str) -> Option<&str> {
		self.fields.get(name).map(String::as_str)
	}

	/// Raw description text. Present on every entry in a final table;
	/// declarations without one never make it in.
	pub fn description(&self) -> &str {
		self.fields.get("description").map_or("", String::as_str)
	}
}

/// The canonical keyed table for one build, produced by a single extraction
/// phase and consumed by every later stage.
#[derive(Debug, Default, Deref)]
pub struct EntryTable {
	entries: HashMap<String, Entry>,
}

impl EntryTable {
	/// Insert under the build's duplicate-key policy. Returns true when the
	/// entry was stored.
	pub fn insert(&mut self, entry: Entry, policy: DuplicateKeyPolicy) -> bool {
		match policy {
			DuplicateKeyPolicy::FirstWins => {
				if self.entries.contains_key(&entry.key) {
					return false;
				}
				self.entries.insert(entry.key.clone(), entry);
				true
			}
			DuplicateKeyPolicy::LastWins => {
				self.entries.insert(entry.key.clone(), entry);
				true
			}
		}
	}

	pub fn get_mut(&mut self, key: &str) -> Option<&mut Entry> {
		self.entries.get_mut(key)
	}

	/// Normalized records sorted by key, for the exported entry artifact.
	pub fn records(&self) -> Vec<EntryRecord> {
		let mut records: Vec<EntryRecord> = self
			.entries
			.values()
			.map(|entry| {
				EntryRecord {
					key: entry.key.clone(),
					name: entry.name().to_string(),
					description: entry.resolved_description.clone(),
					references: entry.outgoing_refs.clone(),
				}
			})
			.collect();

		records.sort_by(|a, b| a.key.cmp(&b.key));
		records
	}
}

/// A normalized entry as exposed to external collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct EntryRecord {
	pub key: String,
	pub name: String,
	/// Description text after reference resolution.
	pub description: String,
	/// Outgoing reference keys in appearance order.
	pub references: Vec<String>,
}

/// An entry declaration as found in one source, before table policies apply.
#[derive(Debug, Clone)]
pub struct ExtractedEntry {
	pub key: String,
	pub fields: HashMap<String, String>,
}

/// Result of scanning one source text for entry declarations.
#[derive(Debug, Default)]
pub struct ExtractOutcome {
	/// Declarations in appearance order.
	pub entries: Vec<ExtractedEntry>,
	/// Declarations skipped because their key or body group never closed.
	pub malformed: usize,
}

/// Find every `\newglossaryentry` declaration in `text`. An unbalanced
/// declaration is skipped and counted; it never aborts the scan.
pub fn extract_entries(text: &str) -> ExtractOutcome {
	let bytes = text.as_bytes();
	let mut outcome = ExtractOutcome::default();
	let mut cursor = 0usize;

	for word in control_words(text) {
		if word.start < cursor || word.name != "newglossaryentry" {
			continue;
		}

		let key_open = skip_whitespace(text, word.end);
		if bytes.get(key_open) != Some(&b'{') {
			outcome.malformed += 1;
			continue;
		}

		let Ok((key, after_key)) = scan_balanced(text, key_open, b'{', b'}') else {
			outcome.malformed += 1;
			continue;
		};

		let body_open = skip_whitespace(text, after_key);
		if bytes.get(body_open) != Some(&b'{') {
			outcome.malformed += 1;
			cursor = after_key;
			continue;
		}

		let Ok((body, after_body)) = scan_balanced(text, body_open, b'{', b'}') else {
			outcome.malformed += 1;
			cursor = after_key;
			continue;
		};

		let mut fields = HashMap::new();
		for (name, value) in split_top_level_fields(body) {
			fields.entry(name).or_insert(value);
		}

		outcome.entries.push(ExtractedEntry {
			key: key.trim().to_string(),
			fields,
		});
		cursor = after_body;
	}

	outcome
}

/// Split an entry body into `(name, value)` pairs at depth-zero commas.
/// Values are balanced `{...}` groups or unbraced text up to the next
/// depth-zero comma. Malformed stretches are skipped to the next separator.
pub fn split_top_level_fields(body: &str) -> Vec<(String, String)> {
	let bytes = body.as_bytes();
	let mut pairs = Vec::new();
	let mut i = 0usize;

	while i < bytes.len() {
		// Skip separators and whitespace between fields.
		while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b',') {
			i += 1;
		}
		if i >= bytes.len() {
			break;
		}

		let name_start = i;
		while i < bytes.len() && is_field_name_byte(bytes[i]) {
			i += 1;
		}
		let name = &body[name_start..i];

		let eq = skip_whitespace(body, i);
		if name.is_empty() || bytes.get(eq) != Some(&b'=') {
			// No `name=` here; resynchronize at the next top-level comma.
			i = next_top_level_comma(body, i).map_or(bytes.len(), |comma| comma + 1);
			continue;
		}

		i = skip_whitespace(body, eq + 1);

		let value = if bytes.get(i) == Some(&b'{') {
			match scan_balanced(body, i, b'{', b'}') {
				Ok((value, next)) => {
					i = next;
					value.trim().to_string()
				}
				Err(_) => {
					// The rest of the body cannot be delimited reliably.
					break;
				}
			}
		} else {
			let end = next_top_level_comma(body, i).unwrap_or(bytes.len());
			let value = body[i..end].trim().to_string();
			i = end;
			value
		};

		pairs.push((name.to_string(), value));
	}

	pairs
}

fn is_field_name_byte(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' || byte == b'@'
}
