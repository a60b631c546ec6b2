//! Runtime support for parsers built from ABNF rules.
//!
//! Parsers are either assembled at runtime in a [`Registry`], or generated
//! at build time by the `derive` crate. Both drive a [`State`] through the
//! same combinators.

use anyhow::Result;
use std::fmt::Debug;

mod action;
mod config;
mod error;
mod position;
mod registry;
mod reserve;
mod span;
mod state;
mod tokens;

pub use action::Action;
pub use config::{Config, DuplicatePolicy};
pub use error::Error;
pub use position::Position;
pub use registry::{Registry, RuleId};
pub use span::Span;
pub use state::{State, StateResult};
pub use tokens::Token;

pub trait ParserRule: Copy + Debug + Eq {}

impl<T: Copy + Debug + Eq> ParserRule for T {}

pub trait Parser<R: ParserRule> {
    fn parse(rule: R, input: &str) -> Result<Vec<Token<'_, R>>>;
}
