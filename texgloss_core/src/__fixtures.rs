//! Shared inputs for the unit tests.

use std::collections::HashMap;

use crate::Entry;
use crate::EntryTable;
use crate::SourceText;
use crate::entries::DuplicateKeyPolicy;

/// A corpus slice with a handful of macros exercising arity 0, arity 2, and
/// an optional first slot.
pub fn macro_preamble() -> &'static str {
	"\\newcommand{\\ml}{machine learning}\n\
	 \\newcommand{\\pair}[2]{(#1,#2)}\n\
	 \\newcommand{\\greet}[2][Hello]{#1, #2!}\n"
}

/// Two glossary entries: `bar` supplies a display name, `term` references it.
pub fn glossary_source() -> &'static str {
	"\\newglossaryentry{bar}{\n\
	 name={Bar},\n\
	 description={A standalone thing.}\n\
	 }\n\
	 \\newglossaryentry{term}{\n\
	 name={Term},\n\
	 description={A \\gls{bar} thing.}\n\
	 }\n"
}

pub fn corpus(text: &str) -> Vec<SourceText> {
	vec![SourceText::new("corpus.tex", text)]
}

/// An entry with the given key, fields, and pre-resolved outgoing refs, for
/// driving the graph builder directly.
pub fn entry_with_refs(key: &str, refs: &[&str]) -> Entry {
	Entry {
		key: key.to_string(),
		fields: HashMap::from([(
			"description".to_string(),
			format!("entry {key} description"),
		)]),
		resolved_description: format!("entry {key} description"),
		outgoing_refs: refs.iter().map(ToString::to_string).collect(),
	}
}

/// An entry with the given raw fields, for driving the resolver directly.
pub fn entry_with_fields(key: &str, fields: &[(&str, &str)]) -> Entry {
	let fields: HashMap<String, String> = fields
		.iter()
		.map(|(name, value)| ((*name).to_string(), (*value).to_string()))
		.collect();

	Entry {
		key: key.to_string(),
		resolved_description: fields.get("description").cloned().unwrap_or_default(),
		fields,
		outgoing_refs: Vec::new(),
	}
}

/// A table built from [`entry_with_fields`] rows.
pub fn table_with_fields(rows: &[(&str, &[(&str, &str)])]) -> EntryTable {
	let mut table = EntryTable::default();

	for (key, fields) in rows {
		table.insert(entry_with_fields(key, fields), DuplicateKeyPolicy::FirstWins);
	}

	table
}

/// A table whose entries carry explicit reference lists.
pub fn table_with_refs(entries: &[(&str, &[&str])]) -> EntryTable {
	let mut table = EntryTable::default();

	for (key, refs) in entries {
		table.insert(entry_with_refs(key, refs), DuplicateKeyPolicy::FirstWins);
	}

	table
}
