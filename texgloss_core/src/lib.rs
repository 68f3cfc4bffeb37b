//! `texgloss_core` is the engine behind the [texgloss](https://github.com/texgloss/texgloss)
//! glossary flattener. It expands user-defined TeX macros to a fixed point,
//! extracts `\newglossaryentry` declarations, resolves `\gls`-family
//! cross-references against the entry table, and builds a directed dependency
//! graph of inter-entry references.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source text
//!   → Comment stripper (drops `%` line comments, keeps `\%`)
//!   → Macro expander (bounded whole-text passes over the macro table)
//!   → Entry extractor (balanced-brace scanning, top-level field parsing)
//!   → Reference resolver (rewrites \gls/\glspl/\Gls/\Glspl invocations)
//!   → Graph builder (deduplicated edges, degree statistics, top-K query)
//! ```
//!
//! The core performs no file I/O: callers hand in `(source id, text)` pairs
//! and receive rendered texts, a normalized entry table, a graph artifact,
//! and an aggregated diagnostics list. A build always produces usable
//! output; local failures degrade into diagnostics instead of aborting.

pub use config::*;
pub use engine::*;
pub use entries::*;
pub use error::*;
pub use graph::*;
pub use macros::*;
pub use resolver::*;
pub use scanner::*;

pub mod config;
mod engine;
mod entries;
mod error;
pub mod graph;
pub(crate) mod lexer;
mod macros;
mod resolver;
mod scanner;

#[cfg(test)]
mod __fixtures;
