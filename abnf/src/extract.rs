//! Finds the next construct to reduce in a partially reduced rule body.
//!
//! Constructs already reduced are stood in for by placeholders: the
//! [`SIGIL`], a decimal id and [`SIGIL_END`]. Every matcher here is anchored; the
//! unanchored, leftmost behavior comes from [`search`].

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while, take_while1, take_while_m_n},
    character::complete::{char, digit0, digit1, multispace0, multispace1},
    combinator::{map, map_res, opt, recognize},
    sequence::{delimited, pair, preceded, separated_pair, tuple},
    IResult,
};

use crate::{Case, CompileError, CompileOptions, Identifier, Repeat, Terminal};

/// Marks the start of a placeholder. Private use, so never part of a real
/// grammar.
pub(crate) const SIGIL: char = '\u{E000}';

/// Marks the end of a placeholder, so digits written right after a construct
/// stay out of its id.
pub(crate) const SIGIL_END: char = '\u{E001}';

pub(crate) fn placeholder_token(id: usize) -> String {
    format!("{}{}{}", SIGIL, id, SIGIL_END)
}

/// A construct found in a body. Operands are placeholder ids.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Shape {
    Comment(String),
    Literal(Terminal),
    RuleName(Identifier),
    Repetition(Repeat, usize),
    Grouping(usize),
    Optional(usize),
    Concatenation(usize, usize),
    Alternation(usize, usize),
}

/// A construct along with the text surrounding it.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Extraction<'a> {
    pub before: &'a str,
    pub shape: Shape,
    pub after: &'a str,
}

struct Found<'a, O> {
    before: &'a str,
    matched: &'a str,
    value: O,
    after: &'a str,
}

impl<'a, O> Found<'a, O> {
    fn into_extraction<F>(self, f: F) -> Extraction<'a>
    where
        F: FnOnce(O) -> Shape,
    {
        Extraction {
            before: self.before,
            shape: f(self.value),
            after: self.after,
        }
    }
}

/// Run `parser` at every offset of `body`, returning the leftmost match.
///
/// Offsets inside a placeholder or inside a quoted string are skipped.
fn search<'a, O, P>(body: &'a str, mut parser: P) -> Option<Found<'a, O>>
where
    P: FnMut(&'a str) -> IResult<&'a str, O>,
{
    let mut in_placeholder = false;
    let mut in_quote = false;
    for (offset, c) in body.char_indices() {
        if in_quote {
            in_quote = c != '"';
            continue;
        }
        if in_placeholder {
            in_placeholder = c != SIGIL_END;
            continue;
        }

        if let Ok((after, value)) = parser(&body[offset..]) {
            return Some(Found {
                before: &body[..offset],
                matched: &body[offset..body.len() - after.len()],
                value,
                after,
            });
        }
        in_quote = c == '"';
        in_placeholder = c == SIGIL;
    }
    None
}

pub(crate) fn placeholder(input: &str) -> IResult<&str, usize> {
    delimited(
        char(SIGIL),
        map_res(digit1, |d: &str| d.parse::<usize>()),
        char(SIGIL_END),
    )(input)
}

pub(crate) fn identifier(input: &str) -> IResult<&str, Identifier> {
    map(
        recognize(pair(
            take_while_m_n(1, 1, |c: char| c.is_ascii_alphabetic()),
            take_while(|c: char| c.is_ascii_alphanumeric() || c == '-'),
        )),
        |s: &str| Identifier::from(s),
    )(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    preceded(char(';'), take_while(|c: char| c != '\n'))(input)
}

fn binary(input: &str) -> IResult<&str, &str> {
    preceded(tag("%b"), take_while1(|c: char| c.is_digit(2)))(input)
}

fn decimal(input: &str) -> IResult<&str, &str> {
    preceded(tag("%d"), take_while1(|c: char| c.is_digit(10)))(input)
}

fn hexadecimal(input: &str) -> IResult<&str, &str> {
    preceded(tag("%x"), take_while1(|c: char| c.is_digit(16)))(input)
}

fn quoted(input: &str) -> IResult<&str, (Option<&str>, &str)> {
    pair(
        opt(alt((tag("%s"), tag("%i")))),
        delimited(char('"'), is_not("\""), char('"')),
    )(input)
}

fn rule_name(input: &str) -> IResult<&str, Identifier> {
    alt((delimited(char('<'), identifier, char('>')), identifier))(input)
}

fn range_repetition(input: &str) -> IResult<&str, (&str, &str, usize)> {
    tuple((digit0, preceded(char('*'), digit0), placeholder))(input)
}

fn exact_repetition(input: &str) -> IResult<&str, (&str, usize)> {
    pair(digit1, placeholder)(input)
}

fn grouping(input: &str) -> IResult<&str, usize> {
    delimited(
        pair(char('('), multispace0),
        placeholder,
        pair(multispace0, char(')')),
    )(input)
}

fn optional(input: &str) -> IResult<&str, usize> {
    delimited(
        pair(char('['), multispace0),
        placeholder,
        pair(multispace0, char(']')),
    )(input)
}

fn concatenation(input: &str) -> IResult<&str, (usize, usize)> {
    separated_pair(placeholder, multispace1, placeholder)(input)
}

fn alternation(input: &str) -> IResult<&str, (usize, usize)> {
    separated_pair(
        placeholder,
        tuple((multispace0, char('/'), multispace0)),
        placeholder,
    )(input)
}

type Matcher = for<'i> fn(&'i str) -> IResult<&'i str, &'i str>;

/// Parse a repetition count. Empty digits mean no bound.
fn count(digits: &str, bounds: &str) -> Result<Option<usize>, CompileError> {
    if digits.is_empty() {
        return Ok(None);
    }
    digits
        .parse()
        .map(Some)
        .map_err(|_| CompileError::InvalidRepetition(bounds.to_owned()))
}

/// The repetition prefix of a matched repetition, without its operand.
fn repetition_bounds(matched: &str) -> &str {
    matched.split(SIGIL).next().unwrap_or("")
}

/// Find the first construct in `body`, checking shapes in priority order.
///
/// Returns `None` when nothing matches, which is either a fully reduced body
/// or a malformed one.
pub(crate) fn extract<'a>(
    body: &'a str,
    options: &CompileOptions,
) -> Result<Option<Extraction<'a>>, CompileError> {
    if let Some(found) = search(body, comment) {
        return Ok(Some(
            found.into_extraction(|text| Shape::Comment(text.trim().to_owned())),
        ));
    }

    let numerics: [(Matcher, u32); 3] = [(binary, 2), (decimal, 10), (hexadecimal, 16)];
    for &(matcher, radix) in numerics.iter() {
        if let Some(found) = search(body, matcher) {
            let literal = u32::from_str_radix(found.value, radix)
                .ok()
                .and_then(std::char::from_u32)
                .ok_or_else(|| CompileError::InvalidCharacter(found.matched.to_owned()))?;
            return Ok(Some(found.into_extraction(|_| {
                Shape::Literal(Terminal::new(literal.to_string(), Case::Sensitive))
            })));
        }
    }

    if let Some(found) = search(body, quoted) {
        return Ok(Some(found.into_extraction(|(prefix, value)| {
            let case = match prefix {
                Some("%i") => Case::Insensitive,
                Some(_) => Case::Sensitive,
                None => options.string_case,
            };
            Shape::Literal(Terminal::new(value, case))
        })));
    }

    if let Some(found) = search(body, rule_name) {
        return Ok(Some(found.into_extraction(Shape::RuleName)));
    }

    if let Some(found) = search(body, range_repetition) {
        let bounds = repetition_bounds(found.matched);
        let (min, max, _) = found.value;
        let repeat = Repeat {
            min: count(min, bounds)?.unwrap_or(0),
            max: count(max, bounds)?,
        };
        if repeat.max.map_or(false, |max| repeat.min > max) {
            return Err(CompileError::InvalidRepetition(bounds.to_owned()));
        }
        return Ok(Some(found.into_extraction(|(_, _, id)| {
            Shape::Repetition(repeat, id)
        })));
    }

    if let Some(found) = search(body, exact_repetition) {
        let bounds = repetition_bounds(found.matched);
        let n = count(found.value.0, bounds)?.unwrap_or(0);
        return Ok(Some(found.into_extraction(|(_, id)| {
            Shape::Repetition(Repeat::exactly(n), id)
        })));
    }

    if let Some(found) = search(body, grouping) {
        return Ok(Some(found.into_extraction(Shape::Grouping)));
    }

    if let Some(found) = search(body, optional) {
        return Ok(Some(found.into_extraction(Shape::Optional)));
    }

    if let Some(found) = search(body, concatenation) {
        return Ok(Some(
            found.into_extraction(|(left, right)| Shape::Concatenation(left, right)),
        ));
    }

    if let Some(found) = search(body, alternation) {
        return Ok(Some(
            found.into_extraction(|(left, right)| Shape::Alternation(left, right)),
        ));
    }

    Ok(None)
}
