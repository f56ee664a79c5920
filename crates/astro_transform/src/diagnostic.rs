//! Diagnostics produced by the transform stage.
//!
//! The transform never rejects a document. Anything worth telling the author
//! about (such as a `client:*` directive that is ignored) is reported here and
//! handed to the driver alongside the transformed tree.

use oxc_span::Span;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
    Hint,
}

/// A labeled source span within a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticLabel {
    /// Optional label text (e.g. "ignored directive").
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
        Self { text, start: span.start, end: span.end, line, column }
    }
}

/// A single diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    /// Human-readable message text.
    pub text: String,
    /// Optional hint/suggestion for fixing the issue.
    pub hint: String,
    /// Labeled source spans.
    pub labels: Vec<DiagnosticLabel>,
}

impl Diagnostic {
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            text: text.into(),
            hint: String::new(),
            labels: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    #[must_use]
    pub fn with_label(mut self, text: Option<String>, span: Span, source_text: &str) -> Self {
        self.labels.push(DiagnosticLabel::new(text, span, source_text));
        self
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
