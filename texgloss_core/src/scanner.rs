//! Balanced-delimiter scanning and comment stripping.
//!
//! Every higher layer that needs to match a `{...}` or `[...]` group goes
//! through [`scan_balanced`]. Nothing else in the crate re-derives brace
//! matching, so the escape and nesting rules live in exactly one place.

use crate::GlossError;
use crate::GlossResult;

/// Extract the balanced group opened at `open_index`, honoring backslash
/// escapes. The byte at `open_index` must be `open`.
///
/// A backslash immediately preceding a delimiter makes it non-structural, so
/// `\{` and `\}` are plain text while `\\{` still opens a group (the first
/// backslash escapes the second, not the brace).
///
/// Returns the inner span (excluding the outer pair) and the index one past
/// the matching close.
pub fn scan_balanced(
	text: &str,
	open_index: usize,
	open: u8,
	close: u8,
) -> GlossResult<(&str, usize)> {
	let bytes = text.as_bytes();
	debug_assert_eq!(bytes.get(open_index), Some(&open));

	let mut depth = 0usize;
	let mut i = open_index;

	while i < bytes.len() {
		let byte = bytes[i];

		if byte == b'\\' {
			// Skip the escape pair in one step.
			i += 2;
			continue;
		}

		if byte == open {
			depth += 1;
		} else if byte == close {
			depth -= 1;

			if depth == 0 {
				return Ok((&text[open_index + 1..i], i + 1));
			}
		}

		i += 1;
	}

	Err(GlossError::UnbalancedDelimiter {
		open: open as char,
		offset: open_index,
	})
}

/// Remove `%` line comments while preserving escaped `\%` markers.
///
/// `\\%` is still a comment: the double backslash escapes itself, leaving the
/// percent sign structural.
pub fn strip_comments(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut first = true;

	for line in text.lines() {
		if !first {
			out.push('\n');
		}
		first = false;

		out.push_str(&line[..comment_start(line).unwrap_or(line.len())]);
	}

	if text.ends_with('\n') {
		out.push('\n');
	}

	out
}

/// Byte index of the first unescaped `%` in a line, if any.
fn comment_start(line: &str) -> Option<usize> {
	let bytes = line.as_bytes();
	let mut i = 0;

	while i < bytes.len() {
		match bytes[i] {
			b'\\' => i += 2,
			b'%' => return Some(i),
			_ => i += 1,
		}
	}

	None
}

/// Find the next comma at brace-nesting depth zero, starting at `from`.
///
/// Shares the scanner's escape rules so commas inside nested `{...}` groups
/// (or escaped braces) never count as separators.
pub fn next_top_level_comma(text: &str, from: usize) -> Option<usize> {
	let bytes = text.as_bytes();
	let mut depth = 0usize;
	let mut i = from;

	while i < bytes.len() {
		match bytes[i] {
			b'\\' => {
				i += 2;
				continue;
			}
			b'{' => depth += 1,
			b'}' => depth = depth.saturating_sub(1),
			b',' if depth == 0 => return Some(i),
			_ => {}
		}

		i += 1;
	}

	None
}

/// Advance past ASCII whitespace starting at `from`.
pub(crate) fn skip_whitespace(text: &str, from: usize) -> usize {
	let bytes = text.as_bytes();
	let mut i = from;

	while i < bytes.len() && bytes[i].is_ascii_whitespace() {
		i += 1;
	}

	i
}
