use log::{log_enabled, trace, Level};
use std::collections::HashMap;
use std::fmt::Write;

use crate::extract::{extract, placeholder, placeholder_token, Extraction, Shape, SIGIL, SIGIL_END};
use crate::{Case, CompileError, Construct};

/// Knobs affecting how rule text is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompileOptions {
    /// Case handling for quoted strings without a `%s` or `%i` prefix.
    pub string_case: Case,
}

impl CompileOptions {
    pub fn with_string_case(mut self, case: Case) -> Self {
        self.string_case = case;
        self
    }
}

/// Compile a rule body using the default options.
pub fn compile(body: &str) -> Result<Construct, CompileError> {
    Compiler::new(CompileOptions::default()).compile(body)
}

/// Compiles a single rule body.
///
/// The body is reduced one construct at a time. Each reduction replaces the
/// construct's text with a placeholder, so that constructs found later see
/// anything already reduced as a single opaque token. Reduction ends when
/// the body is exactly one placeholder.
///
/// A compiler is consumed by [`Compiler::compile`], keeping placeholder
/// numbering private to one rule.
#[derive(Debug)]
pub struct Compiler {
    options: CompileOptions,
    counter: usize,
    nodes: HashMap<usize, Construct>,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Compiler {
            options,
            counter: 0,
            nodes: HashMap::new(),
        }
    }

    pub fn compile(mut self, body: &str) -> Result<Construct, CompileError> {
        if body.contains(|c| c == SIGIL || c == SIGIL_END) {
            return Err(CompileError::ReservedCharacter);
        }
        self.reduce(body)
    }

    fn next_placeholder(&mut self) -> usize {
        self.counter += 1;
        self.counter
    }

    fn reduce(&mut self, body: &str) -> Result<Construct, CompileError> {
        if log_enabled!(Level::Trace) {
            trace!("reduce\t{}", self.render(body));
        }

        let Extraction {
            before,
            shape,
            after,
        } = match extract(body, &self.options)? {
            Some(extraction) => extraction,
            None => return self.finish(body),
        };

        let node = match shape {
            Shape::Comment(text) => {
                // Comments annotate the whole rule rather than taking a place
                // in it.
                let inner = self.reduce(&format!("{}{}", before, after))?;
                return Ok(Construct::Comment(Box::new(inner), text));
            }
            Shape::Literal(term) => Construct::Literal(term),
            Shape::RuleName(name) => Construct::RuleReference(name),
            Shape::Repetition(repeat, id) => Construct::Repetition(repeat, self.take(id)?),
            Shape::Grouping(id) => Construct::Grouping(self.take(id)?),
            Shape::Optional(id) => Construct::Optional(self.take(id)?),
            Shape::Concatenation(left, right) => {
                Construct::Concatenation(self.take(left)?, self.take(right)?)
            }
            Shape::Alternation(left, right) => {
                Construct::Alternation(self.take(left)?, self.take(right)?)
            }
        };

        let id = self.next_placeholder();
        self.nodes.insert(id, node);
        self.reduce(&format!("{}{}{}", before, placeholder_token(id), after))
    }

    /// Nothing left to extract. Succeeds only if the body is a single
    /// placeholder.
    fn finish(&mut self, body: &str) -> Result<Construct, CompileError> {
        let trimmed = body.trim();
        match placeholder(trimmed) {
            Ok(("", id)) => self.take(id).map(|node| *node),
            _ => Err(CompileError::DoesNotParse(self.render(trimmed))),
        }
    }

    fn take(&mut self, id: usize) -> Result<Box<Construct>, CompileError> {
        self.nodes
            .remove(&id)
            .map(Box::new)
            .ok_or_else(|| CompileError::DoesNotParse(placeholder_token(id)))
    }

    /// Write out a partially reduced body with every placeholder replaced by
    /// the text of its construct.
    fn render(&self, body: &str) -> String {
        let mut out = String::with_capacity(body.len());
        let mut rest = body;
        while let Some(start) = rest.find(SIGIL) {
            out.push_str(&rest[..start]);
            match placeholder(&rest[start..]) {
                Ok((after, id)) => {
                    match self.nodes.get(&id) {
                        Some(node) => {
                            let _ = write!(out, "{}", node);
                        }
                        None => out.push_str(&rest[start..rest.len() - after.len()]),
                    }
                    rest = after;
                }
                Err(_) => {
                    out.push(SIGIL);
                    rest = &rest[start + SIGIL.len_utf8()..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Repeat, Terminal};
    use pretty_assertions::assert_eq;

    fn lit(s: &str) -> Box<Construct> {
        Box::new(Construct::Literal(s.into()))
    }

    fn name(s: &str) -> Box<Construct> {
        Box::new(Construct::RuleReference(s.into()))
    }

    fn concat(left: Box<Construct>, right: Box<Construct>) -> Box<Construct> {
        Box::new(Construct::Concatenation(left, right))
    }

    fn alt(left: Box<Construct>, right: Box<Construct>) -> Box<Construct> {
        Box::new(Construct::Alternation(left, right))
    }

    fn group(inner: Box<Construct>) -> Box<Construct> {
        Box::new(Construct::Grouping(inner))
    }

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn compile_terminals() {
        init();
        let tests = vec![
            (r#""foo""#, lit("foo")),
            (r#""bar" "baz""#, concat(lit("bar"), lit("baz"))),
            ("%x42", lit("B")),
            ("%d65 %b1000010", concat(lit("A"), lit("B"))),
            (
                r#"%i"foo""#,
                Box::new(Construct::Literal(Terminal::new("foo", Case::Insensitive))),
            ),
        ];
        for (body, expected) in tests {
            assert_eq!(compile(body).unwrap(), *expected, "body: {}", body);
        }
    }

    #[test]
    fn compile_precedence() {
        init();
        let tests = vec![
            ("foo / bar / baz", alt(alt(name("foo"), name("bar")), name("baz"))),
            ("foo / bar baz", alt(name("foo"), concat(name("bar"), name("baz")))),
            ("foo bar / baz", alt(concat(name("foo"), name("bar")), name("baz"))),
            (
                "(foo bar) / baz",
                alt(group(concat(name("foo"), name("bar"))), name("baz")),
            ),
            (
                "foo (bar / baz)",
                concat(name("foo"), group(alt(name("bar"), name("baz")))),
            ),
            (
                "(elem (foo / bar) elem)",
                group(concat(
                    concat(name("elem"), group(alt(name("foo"), name("bar")))),
                    name("elem"),
                )),
            ),
            (
                r#"["foz"] "bar""#,
                concat(Box::new(Construct::Optional(lit("foz"))), lit("bar")),
            ),
            ("<foo> bar", concat(name("foo"), name("bar"))),
        ];
        for (body, expected) in tests {
            assert_eq!(compile(body).unwrap(), *expected, "body: {}", body);
        }
    }

    #[test]
    fn grouping_whitespace_is_insignificant() {
        let expected = compile("foo (bar / baz)").unwrap();
        for body in &[
            "foo (bar / baz )",
            "foo ( bar / baz)",
            "foo ( bar / baz )",
            "foo (bar/baz)",
        ] {
            assert_eq!(compile(body).unwrap(), expected, "body: {}", body);
        }
    }

    #[test]
    fn compile_repetition() {
        let tests = vec![
            (
                "*foo",
                Construct::Repetition(Repeat { min: 0, max: None }, name("foo")),
            ),
            (
                "4*10line",
                Construct::Repetition(Repeat { min: 4, max: Some(10) }, name("line")),
            ),
            ("3foo", Construct::Repetition(Repeat::exactly(3), name("foo"))),
            (
                "42(foz quux)",
                Construct::Repetition(
                    Repeat::exactly(42),
                    group(concat(name("foz"), name("quux"))),
                ),
            ),
        ];
        for (body, expected) in tests {
            assert_eq!(compile(body).unwrap(), expected, "body: {}", body);
        }
    }

    #[test]
    fn compile_comments() {
        let got = compile(r#""foo" "bar"; foo followed by bar"#).unwrap();
        assert_eq!(
            got,
            Construct::Comment(concat(lit("foo"), lit("bar")), "foo followed by bar".into())
        );

        let got = compile(r#"";" ; semicolon"#).unwrap();
        assert_eq!(got, Construct::Comment(lit(";"), "semicolon".into()));

        let got = compile("\"a\" ; first\n    / \"b\"").unwrap();
        assert_eq!(got, Construct::Comment(alt(lit("a"), lit("b")), "first".into()));
    }

    #[test]
    fn compile_errors() {
        let tests = vec![
            ("foo 3", CompileError::DoesNotParse("foo 3".into())),
            (r#""foo" )"#, CompileError::DoesNotParse(r#""foo" )"#.into())),
            ("", CompileError::DoesNotParse("".into())),
            ("; nothing but a comment", CompileError::DoesNotParse("".into())),
            ("5*2foo", CompileError::InvalidRepetition("5*2".into())),
            ("%x4242ab", CompileError::InvalidCharacter("%x4242ab".into())),
            ("\u{E000}1", CompileError::ReservedCharacter),
            ("foo \u{E001}", CompileError::ReservedCharacter),
            // Digits right after a construct aren't part of its placeholder.
            (r#""x"3 "y""#, CompileError::DoesNotParse(r#""x"3 "y""#.into())),
        ];
        for (body, expected) in tests {
            assert_eq!(compile(body).unwrap_err(), expected, "body: {}", body);
        }
    }

    #[test]
    fn string_case_option() {
        let options = CompileOptions::default().with_string_case(Case::Insensitive);
        let got = Compiler::new(options).compile(r#""foo" %s"Bar""#).unwrap();
        assert_eq!(
            got,
            Construct::Concatenation(
                Box::new(Construct::Literal(Terminal::new("foo", Case::Insensitive))),
                Box::new(Construct::Literal(Terminal::new("Bar", Case::Sensitive))),
            )
        );
    }
}
