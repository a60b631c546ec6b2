use anyhow::anyhow;

/// Keep track of a position within a str, updating on successful operations.
#[derive(Debug, Clone)]
pub struct Position<'a> {
    input: &'a str,
    idx: usize,
}

impl<'a> Position<'a> {
    /// Create a new cursor, ensuring that `start` is within bounds.
    pub fn new(input: &'a str, start: usize) -> Result<Self, anyhow::Error> {
        if start <= input.len() && input.is_char_boundary(start) {
            Ok(Position { input, idx: start })
        } else {
            Err(anyhow!(
                "start not a valid offset into input, start: {}, len: {}, input: {}",
                start,
                input.len(),
                input
            ))
        }
    }

    /// A cursor at the start of `input`.
    pub(crate) fn start(input: &'a str) -> Self {
        Position { input, idx: 0 }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    pub fn idx(&self) -> usize {
        self.idx
    }

    /// The input not yet consumed.
    pub fn rest(&self) -> &'a str {
        self.input.get(self.idx..).unwrap_or("")
    }

    pub fn is_at_end(&self) -> bool {
        self.idx >= self.input.len()
    }

    /// Check if a string matches the current input starting at the current
    /// index. The index will be updated on match.
    pub fn match_str(&mut self, s: &str) -> bool {
        let end = self.idx + s.len();
        if self.input.get(self.idx..end) == Some(s) {
            self.idx = end;
            true
        } else {
            false
        }
    }

    /// Like `match_str`, comparing characters by their lowercase mapping.
    /// The index advances by the length of the input that matched, which
    /// may differ from the length of `s`.
    pub fn match_str_ignore_case(&mut self, s: &str) -> bool {
        let mut input = self.rest().chars();
        let mut consumed = 0;
        for expected in s.chars() {
            match input.next() {
                Some(c) if c == expected || c.to_lowercase().eq(expected.to_lowercase()) => {
                    consumed += c.len_utf8();
                }
                _ => return false,
            }
        }
        self.idx += consumed;
        true
    }

    /// Move back to an earlier index.
    pub(crate) fn reset(&mut self, idx: usize) {
        debug_assert!(idx <= self.idx, "reset forward: {} > {}", idx, self.idx);
        self.idx = idx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_match_str_simple() {
        let tests = vec![
            ("", 0, "", true),
            ("hello", 0, "world", false),
            ("hello", 0, "hello", true),
            ("hello", 0, "ello", false),
            ("hello", 1, "ello", true),
            ("hello", 0, "hello world", false),
        ];
        for test in tests {
            let mut c = Position::new(test.0, test.1).unwrap();
            let got = c.match_str(test.2);
            assert_eq!(got, test.3, "test case: {:?}", test);
        }
    }

    #[test]
    fn position_match_str_idx_multiple() {
        let mut c = Position::new("hello", 0).unwrap();
        let got1 = c.match_str("he");
        let got2 = c.match_str("llo");
        assert!(got1);
        assert!(got2, "cursor: {:?}", c);
        assert!(c.is_at_end());
    }

    #[test]
    fn position_failed_match_keeps_idx() {
        let mut c = Position::new("hello", 1).unwrap();
        assert!(!c.match_str("x"));
        assert!(!c.match_str_ignore_case("x"));
        assert_eq!(c.idx(), 1);
        assert_eq!(c.rest(), "ello");
    }

    #[test]
    fn position_match_str_ignore_case() {
        let tests = vec![
            ("SELECT *", "select", true, 6),
            ("Select *", "sElEcT", true, 6),
            ("selec", "select", false, 0),
            ("ÉTÉ", "été", true, 6),
            ("from", "select", false, 0),
        ];
        for test in tests {
            let mut c = Position::new(test.0, 0).unwrap();
            let got = c.match_str_ignore_case(test.1);
            assert_eq!(got, test.2, "test case: {:?}", test);
            assert_eq!(c.idx(), test.3, "test case: {:?}", test);
        }
    }

    #[test]
    fn position_start_out_of_bounds() {
        assert!(Position::new("abc", 4).is_err());
        assert!(Position::new("é", 1).is_err());
        assert!(Position::new("abc", 3).is_ok());
    }
}
