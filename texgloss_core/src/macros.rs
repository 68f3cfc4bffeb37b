//! Macro table and fixed-point expansion.
//!
//! Declarations follow the `\newcommand{\name}[n][default]{body}` shape: an
//! arity of `n` positional slots referenced as `#1..#n` in the body, and an
//! optional bracketed default that makes the first slot optional at call
//! sites. Expansion rewrites invocations pass by pass until a pass performs
//! no substitutions or the pass cap is reached.

use std::collections::HashMap;

use derive_more::Deref;

use crate::lexer::control_words;
use crate::scanner::scan_balanced;
use crate::scanner::skip_whitespace;

/// Default whole-text pass cap for [`expand`].
pub const DEFAULT_MAX_EXPANSION_PASSES: usize = 10;

/// A user-defined macro: name, arity, optional first-slot default, and a body
/// template containing `#1..#n` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroDefinition {
	/// Case-sensitive command name, without the leading backslash.
	pub name: String,
	/// Number of positional slots (0–9). When `default` is present the first
	/// slot is filled from a bracketed value or the default, not a brace
	/// group.
	pub required_args: u8,
	/// Default value for the first slot, making it optional at call sites.
	pub default: Option<String>,
	/// Body template with `#1..#n` placeholders.
	pub body: String,
}

impl MacroDefinition {
	/// Number of `{...}` arguments consumed at a call site.
	fn brace_args(&self) -> usize {
		let slots = usize::from(self.required_args);

		if self.default.is_some() && slots > 0 {
			slots - 1
		} else {
			slots
		}
	}
}

/// All macro definitions for one build, keyed by name. The first declaration
/// of a name wins; later redeclarations are ignored.
#[derive(Debug, Default, Deref)]
pub struct MacroTable {
	definitions: HashMap<String, MacroDefinition>,
}

impl MacroTable {
	/// Collect every well-formed `\newcommand` declaration in `text`.
	/// Malformed declarations are skipped.
	pub fn collect(&mut self, text: &str) {
		for word in control_words(text) {
			if word.name != "newcommand" {
				continue;
			}

			let Some((definition, _)) = parse_declaration(text, word.end) else {
				tracing::debug!(offset = word.start, "skipping malformed \\newcommand");
				continue;
			};

			self.definitions
				.entry(definition.name.clone())
				.or_insert(definition);
		}
	}

	/// Insert a definition directly. First insertion of a name wins.
	pub fn define(&mut self, definition: MacroDefinition) {
		self.definitions
			.entry(definition.name.clone())
			.or_insert(definition);
	}
}

/// Parse the remainder of a `\newcommand` declaration starting just past the
/// `\newcommand` token. Returns the definition and the index one past the
/// body group, or `None` when any part is malformed.
fn parse_declaration(text: &str, after: usize) -> Option<(MacroDefinition, usize)> {
	let bytes = text.as_bytes();

	// {\name}
	let mut i = skip_whitespace(text, after);
	if bytes.get(i) != Some(&b'{') {
		return None;
	}
	let (name_group, next) = scan_balanced(text, i, b'{', b'}').ok()?;
	let name = name_group.trim().strip_prefix('\\')?;
	if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphabetic() || b == b'@') {
		return None;
	}
	i = skip_whitespace(text, next);

	// [n]
	let mut required_args = 0u8;
	if bytes.get(i) == Some(&b'[') {
		let (digits, next) = scan_balanced(text, i, b'[', b']').ok()?;
		required_args = digits.trim().parse().ok().filter(|n| *n <= 9)?;
		i = skip_whitespace(text, next);
	}

	// [default]
	let mut default = None;
	if bytes.get(i) == Some(&b'[') {
		let (value, next) = scan_balanced(text, i, b'[', b']').ok()?;
		default = Some(value.to_string());
		i = skip_whitespace(text, next);
	}

	// {body}
	if bytes.get(i) != Some(&b'{') {
		return None;
	}
	let (body, end) = scan_balanced(text, i, b'{', b'}').ok()?;

	Some((
		MacroDefinition {
			name: name.to_string(),
			required_args,
			default,
			body: body.to_string(),
		},
		end,
	))
}

/// Result of a single left-to-right expansion pass.
#[derive(Debug)]
pub struct PassOutcome {
	/// The rewritten text.
	pub text: String,
	/// Number of invocations substituted during the pass.
	pub substitutions: usize,
	/// Names of known macros whose invocations could not capture their
	/// arguments and were left as literal text.
	pub missing_args: Vec<String>,
}

/// Result of a full fixed-point expansion.
#[derive(Debug)]
pub struct ExpandOutcome {
	/// The expanded text.
	pub text: String,
	/// Number of passes executed.
	pub passes: usize,
	/// True when the pass cap was hit while substitutions were still being
	/// made — some macro (possibly self-referential) is only partially
	/// expanded.
	pub cap_reached: bool,
	/// Invocations still missing arguments once expansion settled, one name
	/// per occurrence.
	pub missing_args: Vec<String>,
}

/// One whole-text pass: substitute every parseable invocation of a known
/// macro, left to right. Substituted output is spliced in and scanning
/// resumes after it, so freshly produced invocations wait for the next pass.
pub fn expand_pass(text: &str, table: &MacroTable) -> PassOutcome {
	let mut out = String::with_capacity(text.len());
	let mut cursor = 0usize;
	let mut substitutions = 0usize;
	let mut missing_args = Vec::new();

	for word in control_words(text) {
		// Occurrences inside an already-consumed argument group.
		if word.start < cursor {
			continue;
		}

		// Declarations pass through untouched; a macro name occurring inside
		// its own `\newcommand` must not be treated as an invocation.
		if word.name == "newcommand" {
			if let Some((_, end)) = parse_declaration(text, word.end) {
				out.push_str(&text[cursor..end]);
				cursor = end;
			}
			continue;
		}

		let Some(definition) = table.get(word.name) else {
			continue;
		};

		out.push_str(&text[cursor..word.start]);

		match capture_arguments(text, word.end, definition) {
			Ok((args, after)) => {
				out.push_str(&substitute(&definition.body, &args));
				cursor = after;
				substitutions += 1;
			}
			Err(stopped_at) => {
				// A malformed invocation never aborts the pass: keep the
				// occurrence as literal text and resume past it.
				out.push_str(&text[word.start..stopped_at]);
				cursor = stopped_at;
				missing_args.push(word.name.to_string());
			}
		}
	}

	out.push_str(&text[cursor..]);

	PassOutcome {
		text: out,
		substitutions,
		missing_args,
	}
}

/// Capture the optional bracket value (when the macro has one) followed by
/// exactly the remaining required `{...}` arguments. On failure, returns the
/// offset up to which text was consumed so the caller can keep it literal.
fn capture_arguments(
	text: &str,
	after: usize,
	definition: &MacroDefinition,
) -> Result<(Vec<String>, usize), usize> {
	let bytes = text.as_bytes();
	let mut args = Vec::with_capacity(usize::from(definition.required_args));
	let mut i = after;

	if definition.default.is_some() && definition.required_args > 0 {
		let probe = skip_whitespace(text, i);

		if bytes.get(probe) == Some(&b'[') {
			let Ok((value, next)) = scan_balanced(text, probe, b'[', b']') else {
				return Err(i);
			};
			args.push(value.to_string());
			i = next;
		} else if let Some(default) = &definition.default {
			args.push(default.clone());
		}
	}

	for _ in 0..definition.brace_args() {
		let probe = skip_whitespace(text, i);

		if bytes.get(probe) != Some(&b'{') {
			return Err(i);
		}

		let Ok((value, next)) = scan_balanced(text, probe, b'{', b'}') else {
			return Err(i);
		};

		args.push(value.to_string());
		i = next;
	}

	Ok((args, i))
}

/// Replace `#1..#n` with the captured arguments, higher indices first so `#1`
/// never matches inside a longer placeholder.
fn substitute(body: &str, args: &[String]) -> String {
	let mut out = body.to_string();

	for (index, arg) in args.iter().enumerate().rev() {
		out = out.replace(&format!("#{}", index + 1), arg);
	}

	out
}

/// Expand `text` to a fixed point, bounded by `max_passes`. Hitting the cap
/// while substitutions are still happening is reported, not raised — the
/// caller gets the partially expanded text either way.
pub fn expand(text: &str, table: &MacroTable, max_passes: usize) -> ExpandOutcome {
	let mut current = text.to_string();
	let mut passes = 0usize;
	let mut cap_reached = false;
	let mut missing_args = Vec::new();

	while passes < max_passes {
		let outcome = expand_pass(&current, table);
		passes += 1;
		current = outcome.text;
		// Unexpandable invocations survive every pass; keeping only the
		// latest pass's list avoids counting them once per pass.
		missing_args = outcome.missing_args;

		if outcome.substitutions == 0 {
			return ExpandOutcome {
				text: current,
				passes,
				cap_reached: false,
				missing_args,
			};
		}

		if passes == max_passes {
			cap_reached = true;
		}
	}

	ExpandOutcome {
		text: current,
		passes,
		cap_reached,
		missing_args,
	}
}
