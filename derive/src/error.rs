use proc_macro2::{Span, TokenStream};
use std::fmt::{self, Display};

pub type Result<T> = std::result::Result<T, DeriveError>;

#[derive(Debug, Clone, PartialEq)]
pub enum DeriveError {
    MissingGrammarSource,
    MultipleGrammarSources,
    ReadFile { path: String, msg: String },
    /// A rule list or rule body that doesn't compile. `rule` is empty when
    /// the rule list itself is malformed.
    Compile { rule: String, msg: String },
    DuplicateRule(String),
    UnknownRule { rule: String, reference: String },
    Other(String),
}

impl DeriveError {
    pub fn to_compile_error(&self) -> TokenStream {
        syn::Error::new(Span::call_site(), self).to_compile_error()
    }
}

impl Display for DeriveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DeriveError::MissingGrammarSource => write!(f, "No grammar source provided"),
            DeriveError::MultipleGrammarSources => {
                write!(f, "At most one grammar source can be provided")
            }
            DeriveError::ReadFile { ref path, ref msg } => {
                write!(f, "Failed to read abnf file {}: {}", path, msg)
            }
            DeriveError::Compile { ref rule, ref msg } if rule.is_empty() => {
                write!(f, "Invalid rule list: {}", msg)
            }
            DeriveError::Compile { ref rule, ref msg } => {
                write!(f, "Invalid rule '{}': {}", rule, msg)
            }
            DeriveError::DuplicateRule(ref rule) => write!(f, "Rule '{}' declared twice", rule),
            DeriveError::UnknownRule {
                ref rule,
                ref reference,
            } => write!(f, "Rule '{}' references undeclared rule '{}'", rule, reference),
            DeriveError::Other(ref s) => write!(f, "Derive error: {}", s),
        }
    }
}

impl std::error::Error for DeriveError {}

impl From<syn::Error> for DeriveError {
    fn from(e: syn::Error) -> DeriveError {
        DeriveError::Other(format!("syn error: {}", e))
    }
}
