//! Diagnostics reported to the host build tool.
//!
//! A [`TransformError`] carries byte offsets into the component source. Hosts
//! usually want line/column positions, so errors are mapped into this shape
//! before reaching the user.

use oxc_span::Span;

use crate::TransformError;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
}

/// A labeled source span within a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticLabel {
    /// Optional label text (e.g. "first update").
    pub text: Option<String>,
    /// Byte offset of the span start.
    pub start: u32,
    /// Byte offset of the span end (exclusive).
    pub end: u32,
    /// 1-based line number.
    pub line: u32,
    /// 0-based column number.
    pub column: u32,
}

impl DiagnosticLabel {
    /// Create a label from a span, computing line/column from source text.
    pub fn new(text: Option<String>, span: Span, source_text: &str) -> Self {
        let (line, column) = byte_offset_to_line_column(source_text, span.start as usize);
        Self {
            text,
            start: span.start,
            end: span.end,
            line,
            column,
        }
    }
}

/// A single diagnostic message produced by the transform.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    /// Human-readable message text.
    pub text: String,
    /// Optional hint for fixing the issue; empty when there is none.
    pub hint: String,
    /// Labeled source spans.
    pub labels: Vec<DiagnosticLabel>,
}

impl Diagnostic {
    pub fn from_transform_error(source_text: &str, err: &TransformError) -> Self {
        let (hint, labels) = match err {
            TransformError::Generation { .. } => (
                "check the style engine configuration for rules used by this component".to_string(),
                Vec::new(),
            ),
            TransformError::OverlappingUpdates { first, second, .. } => (
                String::new(),
                vec![
                    DiagnosticLabel::new(Some("first update".to_string()), *first, source_text),
                    DiagnosticLabel::new(Some("overlaps this update".to_string()), *second, source_text),
                ],
            ),
            TransformError::PatchOutOfBounds { span, .. } => {
                // The span itself may not be addressable; label its clamped start.
                let start = span.start.min(u32::try_from(source_text.len()).unwrap_or(u32::MAX));
                (String::new(), vec![DiagnosticLabel::new(None, Span::new(start, start), source_text)])
            }
        };

        Self {
            severity: DiagnosticSeverity::Error,
            text: err.to_string(),
            hint,
            labels,
        }
    }
}

/// Convert a UTF-8 byte offset to a 1-based line and 0-based column.
fn byte_offset_to_line_column(source: &str, offset: usize) -> (u32, u32) {
    let mut line = 1u32;
    let mut col = 0u32;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (line, col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineError;

    #[test]
    fn test_overlap_labels_both_spans() {
        let source = "<div>\n  <p class=\"mb-1 mr-1\"></p>\n</div>";
        let err = TransformError::OverlappingUpdates {
            filename: "Foo.svelte".to_string(),
            first: Span::new(18, 22),
            second: Span::new(20, 27),
        };
        let diagnostic = Diagnostic::from_transform_error(source, &err);

        assert_eq!(diagnostic.severity, DiagnosticSeverity::Error);
        assert_eq!(diagnostic.labels.len(), 2);
        assert_eq!((diagnostic.labels[0].line, diagnostic.labels[0].column), (2, 12));
        assert_eq!((diagnostic.labels[1].line, diagnostic.labels[1].column), (2, 14));
        assert_eq!(diagnostic.labels[1].end, 27);
    }

    #[test]
    fn test_generation_has_hint_and_no_labels() {
        let err = TransformError::Generation {
            filename: "Foo.svelte".to_string(),
            source: EngineError::new("boom"),
        };
        let diagnostic = Diagnostic::from_transform_error("", &err);
        assert!(diagnostic.labels.is_empty());
        assert!(!diagnostic.hint.is_empty());
        assert_eq!(diagnostic.text, "failed to generate styles for Foo.svelte: boom");
    }

    #[test]
    fn test_out_of_bounds_is_clamped() {
        let err = TransformError::PatchOutOfBounds {
            filename: "Foo.svelte".to_string(),
            span: Span::new(40, 50),
        };
        let diagnostic = Diagnostic::from_transform_error("ab\ncd", &err);
        assert_eq!(diagnostic.labels[0].start, 5);
        assert_eq!((diagnostic.labels[0].line, diagnostic.labels[0].column), (2, 2));
    }

    #[test]
    fn test_byte_offset_to_line_column() {
        assert_eq!(byte_offset_to_line_column("abc", 0), (1, 0));
        assert_eq!(byte_offset_to_line_column("abc\ndef", 5), (2, 1));
    }
}
