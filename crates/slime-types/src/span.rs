use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location of an AST node, as reported by the parser that built it.
///
/// Line and column are 1-based. Nodes built by hand (tests, generated
/// programs) may use [`Span::unknown`], which is `0:0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// A span for nodes with no source text behind them.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Whether this span points at real source text.
    pub fn is_known(self) -> bool {
        self.line > 0
    }

    /// The earlier of two spans, used to report a construct by its first token.
    pub fn min(self, other: Span) -> Span {
        if (other.line, other.column) < (self.line, self.column) && other.is_known() {
            other
        } else if self.is_known() {
            self
        } else {
            other
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "{}:{}", self.line, self.column)
        } else {
            write!(f, "<unknown>")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_display() {
        assert_eq!(format!("{}", Span::new(3, 7)), "3:7");
        assert_eq!(format!("{}", Span::unknown()), "<unknown>");
    }

    #[test]
    fn test_span_min_prefers_earlier_known() {
        let a = Span::new(2, 5);
        let b = Span::new(1, 9);
        assert_eq!(a.min(b), b);
        assert_eq!(b.min(a), b);
        assert_eq!(a.min(Span::unknown()), a);
        assert_eq!(Span::unknown().min(a), a);
    }

    #[test]
    fn test_span_json_field_names() {
        let json = serde_json::to_string(&Span::new(4, 2)).unwrap();
        assert_eq!(json, r#"{"line":4,"column":2}"#);
    }
}
