//! The rule language: an ABNF-like notation for the right hand side of
//! grammar rules, and the compiler that reduces a rule body to a tree of
//! constructs.
//!
//! ```
//! use abnf::{compile, Construct};
//!
//! let root = compile(r#"foo ( "bar" / baz )"#).unwrap();
//! assert!(matches!(root, Construct::Concatenation(_, _)));
//! assert_eq!(root.to_string(), r#"foo ("bar" / baz)"#);
//! ```

use std::fmt::{self, Display};

mod compile;
mod error;
mod extract;
mod rulelist;

pub use compile::{compile, CompileOptions, Compiler};
pub use error::CompileError;
pub use rulelist::{Rule, Rulelist};

/// A name identifying a rule.
#[derive(PartialEq, Eq, Hash, Debug, Clone)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// How a terminal compares against input.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Case {
    Sensitive,
    Insensitive,
}

impl Default for Case {
    fn default() -> Self {
        Case::Sensitive
    }
}

/// A literal string.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Terminal {
    pub value: String,
    pub case: Case,
}

impl Terminal {
    pub fn new(value: impl Into<String>, case: Case) -> Self {
        Terminal {
            value: value.into(),
            case,
        }
    }
}

impl Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut chars = self.value.chars();
        // Anything that can't sit between double quotes goes back to its
        // numeric form.
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c == '"' || c.is_control() {
                return write!(f, "%x{:X}", c as u32);
            }
        }
        match self.case {
            Case::Sensitive => write!(f, "\"{}\"", self.value),
            Case::Insensitive => write!(f, "%i\"{}\"", self.value),
        }
    }
}

impl From<&str> for Terminal {
    fn from(s: &str) -> Self {
        Terminal::new(s, Case::Sensitive)
    }
}

/// Bounds on a repetition. `max` of `None` is unbounded.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Repeat {
    pub min: usize,
    pub max: Option<usize>,
}

impl Repeat {
    pub fn exactly(n: usize) -> Self {
        Repeat {
            min: n,
            max: Some(n),
        }
    }
}

impl Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.min, self.max) {
            (min, Some(max)) if min == max => write!(f, "{}", min),
            (0, None) => write!(f, "*"),
            (0, Some(max)) => write!(f, "*{}", max),
            (min, None) => write!(f, "{}*", min),
            (min, Some(max)) => write!(f, "{}*{}", min, max),
        }
    }
}

/// A compiled rule body.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Construct {
    Literal(Terminal),
    RuleReference(Identifier),
    Concatenation(Box<Construct>, Box<Construct>),
    Alternation(Box<Construct>, Box<Construct>),
    Grouping(Box<Construct>),
    Optional(Box<Construct>),
    Repetition(Repeat, Box<Construct>),
    /// A construct annotated with a trailing comment. The comment has no
    /// effect on parsing.
    Comment(Box<Construct>, String),
}

impl Construct {
    /// Visit this construct and every construct nested inside it, parents
    /// before children, left operands before right.
    pub fn walk<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a Construct),
    {
        f(self);
        match self {
            Construct::Literal(_) | Construct::RuleReference(_) => (),
            Construct::Concatenation(left, right) | Construct::Alternation(left, right) => {
                left.walk(f);
                right.walk(f);
            }
            Construct::Grouping(inner)
            | Construct::Optional(inner)
            | Construct::Repetition(_, inner)
            | Construct::Comment(inner, _) => inner.walk(f),
        }
    }

    /// Rule names referenced anywhere in this construct, in order of
    /// appearance. Names referenced more than once appear more than once.
    pub fn references(&self) -> Vec<&Identifier> {
        let mut refs = Vec::new();
        self.walk(&mut |c| {
            if let Construct::RuleReference(name) = c {
                refs.push(name);
            }
        });
        refs
    }
}

impl Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Construct::Literal(term) => write!(f, "{}", term),
            Construct::RuleReference(name) => write!(f, "{}", name),
            Construct::Concatenation(left, right) => write!(f, "{} {}", left, right),
            Construct::Alternation(left, right) => write!(f, "{} / {}", left, right),
            Construct::Grouping(inner) => write!(f, "({})", inner),
            Construct::Optional(inner) => write!(f, "[{}]", inner),
            Construct::Repetition(repeat, inner) => write!(f, "{}{}", repeat, inner),
            Construct::Comment(inner, text) => write!(f, "{} ; {}", inner, text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reference(name: &str) -> Box<Construct> {
        Box::new(Construct::RuleReference(name.into()))
    }

    #[test]
    fn display_recompiles() {
        let tests = vec![
            Construct::Alternation(
                Box::new(Construct::Literal("hello".into())),
                Box::new(Construct::Grouping(Box::new(Construct::Concatenation(
                    reference("a"),
                    reference("b"),
                )))),
            ),
            Construct::Concatenation(
                Box::new(Construct::Optional(reference("sign"))),
                Box::new(Construct::Repetition(
                    Repeat { min: 1, max: None },
                    reference("digit"),
                )),
            ),
            Construct::Concatenation(
                Box::new(Construct::Literal(Terminal::new("select", Case::Insensitive))),
                Box::new(Construct::Literal("\"".into())),
            ),
        ];

        for test in tests {
            let s = test.to_string();
            let got = compile(&s).unwrap();
            assert_eq!(test, got, "To string:\n{}\n", s);
        }
    }

    #[test]
    fn display_repeat() {
        let tests = vec![
            (Repeat::exactly(3), "3"),
            (Repeat { min: 0, max: None }, "*"),
            (Repeat { min: 0, max: Some(4) }, "*4"),
            (Repeat { min: 2, max: None }, "2*"),
            (Repeat { min: 2, max: Some(4) }, "2*4"),
        ];
        for (repeat, expected) in tests {
            assert_eq!(repeat.to_string(), expected);
        }
    }

    #[test]
    fn references_in_order() {
        let root = compile(r#"a ("x" / b) [a] *c"#).unwrap();
        let names: Vec<&str> = root.references().into_iter().map(|id| id.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "a", "c"]);
    }
}
