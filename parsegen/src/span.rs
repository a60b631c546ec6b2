use anyhow::anyhow;

use crate::position::Position;

/// A region over a string.
#[derive(Debug, Clone, Copy)]
pub struct Span<'a> {
    pub s: &'a str,
    pub start: usize,
    pub end: usize,
}

impl<'a> Span<'a> {
    pub fn from_positions(start: &Position<'a>, end: &Position<'a>) -> Result<Self, anyhow::Error> {
        if start.input() != end.input() {
            Err(anyhow!(
                "positions on different strings: '{}', '{}'",
                start.input(),
                end.input()
            ))
        } else if start.idx() > end.idx() {
            Err(anyhow!(
                "start idx after end idx, start: {}, end: {}",
                start.idx(),
                end.idx()
            ))
        } else {
            Ok(Self::between(start, end))
        }
    }

    /// Span two positions already known to be ordered and on the same input.
    pub(crate) fn between(start: &Position<'a>, end: &Position<'a>) -> Self {
        debug_assert!(start.idx() <= end.idx());
        Span {
            s: start.input(),
            start: start.idx(),
            end: end.idx(),
        }
    }

    pub fn as_str(&self) -> &'a str {
        &self.s[self.start..self.end]
    }

    /// Check if this span contains the entirety of the other span. Both spans
    /// should be referencing the same input.
    pub fn contains(&self, other: &Self) -> Result<bool, anyhow::Error> {
        if self.s != other.s {
            return Err(anyhow!(
                "span inputs differ, self: '{}', other: '{}'",
                self.s,
                other.s
            ));
        }
        Ok(self.start <= other.start && self.end >= other.end)
    }
}

impl<'a> PartialEq for Span<'a> {
    fn eq(&self, other: &Span<'a>) -> bool {
        self.as_str() == other.as_str()
    }
}
