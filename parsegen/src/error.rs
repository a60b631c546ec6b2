use abnf::CompileError;
use thiserror::Error;

/// Failures declaring rules or running them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("rule '{rule}': {source}")]
    Compile {
        rule: String,
        #[source]
        source: CompileError,
    },
    #[error("rule '{0}' is already declared")]
    DuplicateRule(String),
    #[error("unknown rule '{0}'")]
    UnknownRule(String),
    #[error("rules nested more than {limit} deep invoking '{rule}'")]
    RecursionLimit { rule: String, limit: usize },
    /// The rule did not match. `position` is the furthest offset any
    /// literal was tried at.
    #[error("input does not match rule '{rule}', furthest position {position}")]
    ParseFailure { rule: String, position: usize },
    #[error("rule '{rule}' matched up to position {position} but input continues")]
    TrailingInput { rule: String, position: usize },
}
