use std::fmt;

/// A 1-based source line number.
///
/// The lexer stamps every token with the line it started on; every AST
/// node inherits its token's line so later stages can report diagnostics
/// without carrying the source text around.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Line(pub u32);

impl Line {
    /// Placeholder used before the first real line is known.
    pub const DUMMY: Line = Line(0);

    #[inline]
    pub const fn new(n: u32) -> Self {
        Line(n)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Line {
    fn from(n: u32) -> Self {
        Line(n)
    }
}
