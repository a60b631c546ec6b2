use crate::error::Error;
use crate::position::Position;
use crate::reserve::ReserveVec;
use crate::span::Span;
use crate::{ParserRule, Token};

/// `Ok` carries the state after a match, `Err` the state after a failed
/// attempt. Either way the state can keep being used.
pub type StateResult<T> = Result<T, T>;

/// Where a state can be rewound to.
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    idx: usize,
    tokens: usize,
}

/// Parser state.
///
/// Failures never move the cursor: every operation that fails hands back
/// the state as it was before the operation started.
#[derive(Debug)]
pub struct State<'a, R: ParserRule> {
    /// Tokens that have been matched, parents before children.
    tokens: ReserveVec<Token<'a, R>>,
    cursor: Position<'a>,
    /// Furthest index a failed match was attempted at.
    furthest: usize,
    /// Rule invocations currently active.
    depth: usize,
    /// Set when parsing has to stop outright, rather than try something
    /// else. Boxed to keep the state small, since it's moved by value
    /// through every nested invocation.
    fault: Option<Box<Error>>,
}

impl<'a, R: ParserRule> State<'a, R> {
    pub fn new(input: &'a str) -> Self {
        Self::from_position(Position::start(input))
    }

    /// Create a state starting part way through `input`.
    pub fn at(input: &'a str, start: usize) -> Result<Self, anyhow::Error> {
        Ok(Self::from_position(Position::new(input, start)?))
    }

    fn from_position(cursor: Position<'a>) -> Self {
        State {
            tokens: ReserveVec::new(),
            furthest: cursor.idx(),
            cursor,
            depth: 0,
            fault: None,
        }
    }

    /// Returns a vector of parsed tokens. A rule's token comes before the
    /// tokens of the rules it matched through.
    ///
    /// # Examples
    ///
    /// ```
    /// use parsegen::{State, StateResult};
    /// #[allow(non_camel_case_types)]
    /// #[derive(Copy, Debug, Eq, Clone, PartialEq)]
    /// enum Rule {
    ///     a,
    ///     b,
    ///     ab,
    ///     ababa,
    /// }
    ///
    /// let input = "ababa";
    /// let state = State::new(input);
    /// fn a(state: State<Rule>) -> StateResult<State<Rule>> {
    ///     state.tokenize(Rule::a, |s| s.match_str("a"))
    /// }
    /// fn b(state: State<Rule>) -> StateResult<State<Rule>> {
    ///     state.tokenize(Rule::b, |s| s.match_str("b"))
    /// }
    /// fn ab(state: State<Rule>) -> StateResult<State<Rule>> {
    ///     state.tokenize(Rule::ab, |s| s.sequence(a, b))
    /// }
    /// fn ababa(state: State<Rule>) -> StateResult<State<Rule>> {
    ///     state.tokenize(Rule::ababa, |s| s.sequence(ab, |s| s.sequence(ab, a)))
    /// }
    ///
    /// let toks = ababa(state).unwrap().tokens();
    /// assert_eq!(toks.len(), 8);
    /// assert_eq!(toks[0].rule(), Rule::ababa);
    /// assert_eq!(toks[1].rule(), Rule::ab);
    /// assert_eq!(toks[2].rule(), Rule::a);
    /// assert_eq!(toks[3].rule(), Rule::b);
    /// assert_eq!(toks[4].rule(), Rule::ab);
    /// assert_eq!(toks[5].rule(), Rule::a);
    /// assert_eq!(toks[6].rule(), Rule::b);
    /// assert_eq!(toks[7].rule(), Rule::a);
    /// ```
    pub fn tokens(self) -> Vec<Token<'a, R>> {
        self.tokens.into()
    }

    /// Current index into the input.
    pub fn position(&self) -> usize {
        self.cursor.idx()
    }

    /// The input not yet consumed.
    pub fn rest(&self) -> &'a str {
        self.cursor.rest()
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    /// Furthest index any match was attempted at. Useful for reporting where
    /// a failed parse went wrong.
    pub fn furthest(&self) -> usize {
        self.furthest.max(self.cursor.idx())
    }

    /// The error that stopped parsing, if any.
    pub fn fault(&self) -> Option<&Error> {
        self.fault.as_deref()
    }

    pub(crate) fn take_fault(&mut self) -> Option<Error> {
        self.fault.take().map(|err| *err)
    }

    /// Stop parsing with an error that no alternative can recover from.
    pub(crate) fn fail_with(mut self, err: Error) -> StateResult<Self> {
        self.fault = Some(Box::new(err));
        Err(self)
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    /// Apply `f` one rule invocation deeper.
    pub(crate) fn descend<F>(mut self, f: F) -> StateResult<Self>
    where
        F: FnOnce(Self) -> StateResult<Self>,
    {
        self.depth += 1;
        match f(self) {
            Ok(mut state) => {
                state.depth -= 1;
                Ok(state)
            }
            Err(mut state) => {
                state.depth -= 1;
                Err(state)
            }
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            idx: self.cursor.idx(),
            tokens: self.tokens.len(),
        }
    }

    fn rewind(mut self, checkpoint: Checkpoint) -> Self {
        self.cursor.reset(checkpoint.idx);
        self.tokens.truncate(checkpoint.tokens);
        self
    }

    fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }

    /// Tokenizes for some rule using the provided function. Errors resulting
    /// from the function will result in an unmodified state.
    pub fn tokenize<F>(mut self, rule: R, f: F) -> StateResult<Self>
    where
        F: FnOnce(Self) -> StateResult<Self>,
    {
        // Keep track of starting position so we can keep an accurate span for
        // the rule.
        let start = self.cursor.clone();
        let checkpoint = self.checkpoint();
        // The rule's token goes ahead of anything produced by `f`.
        let slot = self.tokens.reserve_next();

        match f(self) {
            Ok(mut state) => {
                let span = Span::between(&start, &state.cursor);
                state.tokens.insert_at_reserved(slot, Token::new(rule, span));
                Ok(state)
            }
            Err(state) => Err(state.rewind(checkpoint)),
        }
    }

    /// Apply a function to state, returning the result vebatim.
    pub fn apply<F>(self, f: F) -> StateResult<Self>
    where
        F: FnOnce(Self) -> StateResult<Self>,
    {
        f(self)
    }

    /// Apply `f` then `g`. Succeeds only if both do, and `g` is only tried if
    /// `f` succeeded.
    pub fn sequence<F, G>(self, f: F, g: G) -> StateResult<Self>
    where
        F: FnOnce(Self) -> StateResult<Self>,
        G: FnOnce(Self) -> StateResult<Self>,
    {
        let checkpoint = self.checkpoint();
        match f(self).and_then(g) {
            Ok(state) => Ok(state),
            Err(state) => Err(state.rewind(checkpoint)),
        }
    }

    /// Apply `f`, and if that fails apply `g` from the same starting point.
    pub fn choice<F, G>(self, f: F, g: G) -> StateResult<Self>
    where
        F: FnOnce(Self) -> StateResult<Self>,
        G: FnOnce(Self) -> StateResult<Self>,
    {
        let checkpoint = self.checkpoint();
        match f(self) {
            Ok(state) => Ok(state),
            Err(state) if state.is_faulted() => Err(state.rewind(checkpoint)),
            Err(state) => g(state.rewind(checkpoint)).map_err(|state| state.rewind(checkpoint)),
        }
    }

    /// Attempt to apply some func to state, returning Ok regardless of what the
    /// function returns. A failed attempt leaves the state as it was.
    pub fn optional<F>(self, f: F) -> StateResult<Self>
    where
        F: FnOnce(Self) -> StateResult<Self>,
    {
        let checkpoint = self.checkpoint();
        match f(self) {
            Ok(state) => Ok(state),
            Err(state) if state.is_faulted() => Err(state.rewind(checkpoint)),
            Err(state) => Ok(state.rewind(checkpoint)),
        }
    }

    /// Repeatedly applies some func to state, at least `min` and at most
    /// `max` times. Stops early once an application consumes nothing.
    pub fn repeat<F>(self, min: usize, max: Option<usize>, f: F) -> StateResult<Self>
    where
        F: Fn(Self) -> StateResult<Self>,
    {
        let checkpoint = self.checkpoint();
        let mut state = self;
        let mut count = 0;
        while max.map_or(true, |max| count < max) {
            let before = state.position();
            match f(state) {
                Ok(next) => {
                    count += 1;
                    state = next;
                    if state.position() == before {
                        // Matching nothing again would match nothing forever.
                        count = count.max(min);
                        break;
                    }
                }
                Err(next) if next.is_faulted() => return Err(next.rewind(checkpoint)),
                Err(next) => {
                    state = next;
                    break;
                }
            }
        }

        if count >= min {
            Ok(state)
        } else {
            Err(state.rewind(checkpoint))
        }
    }

    /// Attempt to match the given string on input. State is updated only if the
    /// string successfully matches.
    pub fn match_str(mut self, s: &str) -> StateResult<Self> {
        if self.cursor.match_str(s) {
            Ok(self)
        } else {
            self.record_miss();
            Err(self)
        }
    }

    /// Like `match_str`, ignoring case.
    pub fn match_str_ignore_case(mut self, s: &str) -> StateResult<Self> {
        if self.cursor.match_str_ignore_case(s) {
            Ok(self)
        } else {
            self.record_miss();
            Err(self)
        }
    }

    fn record_miss(&mut self) {
        self.furthest = self.furthest.max(self.cursor.idx());
    }
}
