use thiserror::Error;

/// Failures turning rule text into constructs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Text that fits none of the recognized constructs.
    #[error("does not parse: '{0}'")]
    DoesNotParse(String),
    #[error("invalid repetition '{0}': minimum exceeds maximum")]
    InvalidRepetition(String),
    #[error("numeric terminal '{0}' is not a valid character")]
    InvalidCharacter(String),
    #[error("rule body contains a reserved character (U+E000 or U+E001)")]
    ReservedCharacter,
    #[error("malformed rule definition: '{0}'")]
    MalformedRule(String),
}

impl From<nom::Err<nom::error::Error<&str>>> for CompileError {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> CompileError {
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                CompileError::MalformedRule(e.input.to_owned())
            }
            nom::Err::Incomplete(_) => CompileError::MalformedRule(String::new()),
        }
    }
}
