//! Labeled source spans for diagnostic messages.

use crate::span::Span;

/// A message attached to a span of the input.
///
/// A diagnostic has one primary label marking where the problem is, and
/// may carry secondary labels for related places such as the first
/// definition of a duplicated id:
///
/// ```text
/// error[E200]: duplicate node id `1`
///   |
/// 3 |   {"id": "1", "type": "start", "label": "Begin"},
///   |   ---------------------------------------------- first defined here
/// 4 |   {"id": "1", "type": "end", "label": "Done"}
///   |   ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^ duplicate node
/// ```
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    /// Get the span this label applies to.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the label message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a primary label.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Check if this is a secondary label.
    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_label() {
        let label = Label::primary(Span::new(10..20), "duplicate node");

        assert_eq!(label.span(), Span::new(10..20));
        assert_eq!(label.message(), "duplicate node");
        assert!(label.is_primary());
        assert!(!label.is_secondary());
    }

    #[test]
    fn test_secondary_label() {
        let label = Label::secondary(Span::new(5..15), "first defined here");

        assert_eq!(label.span().len(), 10);
        assert!(label.is_secondary());
    }
}
