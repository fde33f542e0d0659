use std::path::PathBuf;

use thiserror::Error;

use crate::grammar::Rule;

#[derive(Error, Debug)]
pub enum SelconvError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Grammar mismatch: {message}")]
    GrammarMismatch { message: String, line: Option<usize>, col: Option<usize> },
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
    #[error("Empty result: no facets and no requests")]
    EmptyResult,
    #[error("I/O error on {path:?}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },
    #[error("Output already exists: {0:?}")]
    OutputExists(PathBuf),
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl SelconvError {
    /// Conditions that are reported but are not failures of the input.
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::EmptyResult)
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, SelconvError>;

// Helper conversions
impl From<pest::error::Error<Rule>> for SelconvError {
    fn from(e: pest::error::Error<Rule>) -> Self {
        let (line, col) = match e.line_col {
            pest::error::LineColLocation::Pos((line, col)) => (line, col),
            pest::error::LineColLocation::Span((line, col), _) => (line, col),
        };
        let message = format!("line {}, column {}: {}", line, col, e.variant.message());
        Self::GrammarMismatch { message, line: Some(line), col: Some(col) }
    }
}

impl From<config::ConfigError> for SelconvError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}

impl From<serde_json::Error> for SelconvError {
    fn from(e: serde_json::Error) -> Self { Self::Serialize(e.to_string()) }
}
