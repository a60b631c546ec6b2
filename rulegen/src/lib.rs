//! Parsers from ABNF rules.
//!
//! Rules can be declared at runtime in a [`Registry`], or turned into a
//! parser at build time with `#[derive(Parser)]`. Both run the same way.
//!
//! ```
//! use rulegen::Registry;
//!
//! let mut registry = Registry::new();
//! registry
//!     .declare_rulelist("pair = key \"=\" key\nkey = 1*(\"a\" / \"b\")\n")
//!     .unwrap();
//! let tokens = registry.parse_complete("pair", "ab=ba").unwrap().tokens();
//! assert_eq!(tokens.len(), 3);
//! ```

pub use abnf::{
    compile, Case, CompileError, CompileOptions, Compiler, Construct, Identifier, Repeat,
    Rulelist, Terminal,
};
pub use derive::Parser;
pub use parsegen::{
    Action, Config, DuplicatePolicy, Error, Parser, Registry, RuleId, State, StateResult, Token,
};

pub mod datetime;
