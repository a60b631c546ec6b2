//! Registry configuration.
//!
//! ```
//! use abnf::Case;
//! use parsegen::{Config, DuplicatePolicy};
//!
//! let config = Config::default()
//!     .with_string_case(Case::Insensitive)
//!     .with_duplicates(DuplicatePolicy::Shadow)
//!     .with_max_depth(32);
//! assert_eq!(config.max_depth, 32);
//! ```

use abnf::{Case, CompileOptions};

/// What to do when a rule name is declared a second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail the second declaration.
    Reject,
    /// The later declaration replaces the earlier one. Tokens keep reporting
    /// the same rule id.
    Shadow,
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        DuplicatePolicy::Reject
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Options passed to the compiler for every declared rule.
    pub compile: CompileOptions,
    pub duplicates: DuplicatePolicy,
    /// Maximum number of rule invocations active at once. Guards against
    /// left recursion exhausting the stack, so it has to stay small enough
    /// for every nested invocation to fit in a default 2 MiB thread stack.
    /// Raise it only for threads spawned with a larger stack.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            compile: CompileOptions::default(),
            duplicates: DuplicatePolicy::default(),
            max_depth: 64,
        }
    }
}

impl Config {
    pub fn with_string_case(mut self, case: Case) -> Self {
        self.compile = self.compile.with_string_case(case);
        self
    }

    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
