//! Cross-reference resolution.
//!
//! Four invocation shapes are recognized: `\gls{key}`, `\glspl{key}`,
//! `\Gls{key}`, and `\Glspl{key}`. Starred variants (`\gls*{key}`) and a
//! bracketed option (`\gls[hyper=false]{key}`) are accepted and ignored.
//! Each resolves to replacement text drawn
//! from the referenced entry's fields with a fixed priority, falling back to
//! the literal key — resolution never fails. Every occurrence of a reference
//! to the same key resolves identically; no first-use state is tracked.

use crate::entries::Entry;
use crate::entries::EntryTable;
use crate::lexer::control_words;
use crate::scanner::scan_balanced;
use crate::scanner::skip_whitespace;

/// A rewritten text plus the references it contained.
#[derive(Debug)]
pub struct Resolution {
	/// The text with every parseable reference invocation replaced.
	pub text: String,
	/// Referenced keys in appearance order, duplicates retained. Targets
	/// missing from the table are included; the graph builder filters and
	/// counts them.
	pub references: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum ReferenceShape {
	Singular,
	Plural,
	CapitalSingular,
	CapitalPlural,
}

impl ReferenceShape {
	fn from_name(name: &str) -> Option<Self> {
		match name {
			"gls" => Some(Self::Singular),
			"glspl" => Some(Self::Plural),
			"Gls" => Some(Self::CapitalSingular),
			"Glspl" => Some(Self::CapitalPlural),
			_ => None,
		}
	}

	fn is_plural(self) -> bool {
		matches!(self, Self::Plural | Self::CapitalPlural)
	}

	fn is_capitalized(self) -> bool {
		matches!(self, Self::CapitalSingular | Self::CapitalPlural)
	}
}

/// Rewrite every reference invocation in `text` against the entry table.
/// Invocations whose `{key}` argument cannot be scanned are left as literal
/// text.
pub fn resolve_references(text: &str, table: &EntryTable) -> Resolution {
	let bytes = text.as_bytes();
	let mut out = String::with_capacity(text.len());
	let mut references = Vec::new();
	let mut cursor = 0usize;

	for word in control_words(text) {
		if word.start < cursor {
			continue;
		}

		let Some(shape) = ReferenceShape::from_name(word.name) else {
			continue;
		};

		// A star suffix and a bracketed option may sit between the command
		// and the key group; both are accepted and discarded.
		let mut open = word.end;
		if bytes.get(open) == Some(&b'*') {
			open += 1;
		}
		open = skip_whitespace(text, open);

		if bytes.get(open) == Some(&b'[') {
			let Ok((_, next)) = scan_balanced(text, open, b'[', b']') else {
				continue;
			};
			open = skip_whitespace(text, next);
		}

		if bytes.get(open) != Some(&b'{') {
			continue;
		}

		let Ok((raw_key, after)) = scan_balanced(text, open, b'{', b'}') else {
			continue;
		};

		let key = raw_key.trim();
		out.push_str(&text[cursor..word.start]);
		out.push_str(&resolve_one(key, shape, table));
		references.push(key.to_string());
		cursor = after;
	}

	out.push_str(&text[cursor..]);

	Resolution {
		text: out,
		references,
	}
}

/// Replacement text for a single reference, per shape.
fn resolve_one(key: &str, shape: ReferenceShape, table: &EntryTable) -> String {
	let entry = table.get(key);
	let base = entry.map_or(key, base_text);

	let resolved = if shape.is_plural() {
		entry
			.and_then(explicit_plural)
			.map_or_else(|| pluralize(base), str::to_string)
	} else {
		base.to_string()
	};

	if shape.is_capitalized() {
		capitalize_first(&resolved)
	} else {
		resolved
	}
}

/// Singular replacement text: `first`, then `name`, then `text`, then the
/// literal key.
fn base_text(entry: &Entry) -> &str {
	["first", "name", "text"]
		.iter()
		.find_map(|field| entry.field(field).filter(|value| !value.is_empty()))
		.unwrap_or(&entry.key)
}

/// An explicitly declared plural form, if any.
fn explicit_plural(entry: &Entry) -> Option<&str> {
	["firstplural", "plural"]
		.iter()
		.find_map(|field| entry.field(field).filter(|value| !value.is_empty()))
}

/// Heuristic plural: consonant + `y` becomes `ies`, otherwise append `s`.
fn pluralize(word: &str) -> String {
	if let Some(stem) = word.strip_suffix('y') {
		let before = stem.chars().next_back();

		if before.is_some_and(|c| c.is_alphabetic() && !is_vowel(c)) {
			return format!("{stem}ies");
		}
	}

	format!("{word}s")
}

fn is_vowel(c: char) -> bool {
	matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Uppercase only the first character.
fn capitalize_first(text: &str) -> String {
	let mut chars = text.chars();

	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}
