use logos::Logos;

/// Raw tokens produced by logos over TeX text. Only control sequences are
/// interesting; everything else is skipped.
#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[^\\]+")]
enum RawToken {
	/// `\foo` — a named command. Maximal munch means a shorter macro name can
	/// never match as a prefix of a longer one.
	#[regex(r"\\[a-zA-Z@]+")]
	ControlWord,
	/// `\%`, `\{`, `\\`, ... — a backslash-escaped single character, never a
	/// command occurrence.
	#[regex(r"\\[^a-zA-Z@]")]
	ControlSymbol,
}

/// A control-word occurrence in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ControlWord<'a> {
	/// The command name without the leading backslash.
	pub name: &'a str,
	/// Byte offset of the backslash.
	pub start: usize,
	/// Byte offset one past the last name character.
	pub end: usize,
}

/// All control-word occurrences in `text`, in order of appearance.
///
/// This is the single "find the next command" primitive shared by macro
/// collection, macro expansion, entry discovery, and reference resolution.
pub(crate) fn control_words(text: &str) -> Vec<ControlWord<'_>> {
	let mut words = Vec::new();

	for (token, span) in RawToken::lexer(text).spanned() {
		// Errors are stray trailing backslashes; skip them like plain text.
		if matches!(token, Ok(RawToken::ControlWord)) {
			words.push(ControlWord {
				name: &text[span.start + 1..span.end],
				start: span.start,
				end: span.end,
			});
		}
	}

	words
}
