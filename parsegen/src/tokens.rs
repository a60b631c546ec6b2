use crate::{span::Span, ParserRule};

/// A token represents a span over some text that satisifies some parser rule.
#[derive(Debug, Clone, Copy)]
pub struct Token<'a, R: ParserRule> {
    pub rule: R,
    pub span: Span<'a>,
}

impl<'a, R: ParserRule> Token<'a, R> {
    /// Create a new token using the provided rule and span.
    pub fn new(rule: R, span: Span<'a>) -> Self {
        Token { rule, span }
    }

    pub fn rule(&self) -> R {
        self.rule
    }

    pub fn as_str(&self) -> &'a str {
        self.span.as_str()
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }
}
