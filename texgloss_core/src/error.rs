use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum GlossError {
	#[error(transparent)]
	#[diagnostic(code(texgloss::io_error))]
	Io(#[from] std::io::Error),

	#[error("unbalanced `{open}` opened at byte {offset}")]
	#[diagnostic(
		code(texgloss::unbalanced_delimiter),
		help("every `{open}` must have a matching close; escape literal delimiters with a backslash")
	)]
	UnbalancedDelimiter { open: char, offset: usize },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(texgloss::config_parse),
		help("check that texgloss.toml is valid TOML with [build], [sources] and/or [output] sections")
	)]
	ConfigParse(String),

	#[error("failed to serialize `{artifact}` artifact: {reason}")]
	#[diagnostic(code(texgloss::artifact_serialize))]
	ArtifactSerialize { artifact: String, reason: String },
}

pub type GlossResult<T> = Result<T, GlossError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
