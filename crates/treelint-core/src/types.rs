//! Core value types: text ranges, severities, diagnostics, fixes, suggestions.

use miette::{Diagnostic as MietteDiagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open byte range `[start, end)` into a file's text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    // Invariant: start <= end
    start: usize,
    end: usize,
}

impl TextRange {
    /// Creates a new range.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    #[inline]
    #[must_use]
    pub fn new(start: usize, end: usize) -> TextRange {
        assert!(start <= end, "invalid range {start}..{end}");
        TextRange { start, end }
    }

    /// Creates an empty range anchored at `offset`.
    #[inline]
    #[must_use]
    pub fn empty(offset: usize) -> TextRange {
        TextRange {
            start: offset,
            end: offset,
        }
    }

    /// The start offset.
    #[inline]
    #[must_use]
    pub fn start(self) -> usize {
        self.start
    }

    /// The end offset (exclusive).
    #[inline]
    #[must_use]
    pub fn end(self) -> usize {
        self.end
    }

    /// The length in bytes.
    #[inline]
    #[must_use]
    pub fn len(self) -> usize {
        self.end - self.start
    }

    /// Returns true if the range is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Returns true if `self` fully contains `other`.
    #[must_use]
    pub fn contains_range(self, other: TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns true if the ranges share at least one byte.
    ///
    /// Ranges that merely touch at a boundary do not overlap.
    #[must_use]
    pub fn overlaps(self, other: TextRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The smallest range covering both inputs.
    #[must_use]
    pub fn cover(self, other: TextRange) -> TextRange {
        TextRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail a run.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single textual edit: replace `range` with `replacement`.
///
/// The range is always relative to the text version the diagnostic was
/// computed against; the engine never renumbers fixes across passes — it
/// recomputes them fresh each pass instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    /// Byte range to replace.
    pub range: TextRange,
    /// Replacement text (may be empty for deletions).
    pub replacement: String,
}

impl Fix {
    /// Creates a replacement edit.
    #[must_use]
    pub fn replace(range: TextRange, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    /// Creates a deletion edit.
    #[must_use]
    pub fn delete(range: TextRange) -> Self {
        Self {
            range,
            replacement: String::new(),
        }
    }

    /// Creates an insertion edit at `offset`.
    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range: TextRange::empty(offset),
            replacement: text.into(),
        }
    }
}

/// An alternative fix a human must explicitly choose; never auto-applied.
///
/// Suggestions attached to one diagnostic are mutually exclusive alternatives
/// and are never combined with each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Stable identifier of the suggestion message.
    pub message_id: String,
    /// Rendered human-readable description.
    pub message: String,
    /// The self-consistent edit set implementing this alternative.
    pub fixes: Vec<Fix>,
}

/// One reported problem, optionally carrying an atomic fix-set or suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule name (e.g. "prefer-const").
    pub rule: String,
    /// Rule code (e.g. "TL001").
    pub code: String,
    /// Stable message identifier (e.g. "useConst").
    pub message_id: String,
    /// Rendered human-readable message.
    pub message: String,
    /// Severity of this diagnostic.
    pub severity: Severity,
    /// Primary range, relative to the text version it was computed against.
    pub range: TextRange,
    /// Edits applied together as one atomic fix. Empty = pure report.
    pub fixes: Vec<Fix>,
    /// Alternative fixes requiring explicit user selection.
    pub suggestions: Vec<Suggestion>,
}

impl Diagnostic {
    /// Returns true if this diagnostic carries an auto-applicable fix.
    #[must_use]
    pub fn is_fixable(&self) -> bool {
        !self.fixes.is_empty()
    }
}

/// Converts a [`Diagnostic`] into a miette diagnostic for rich terminal
/// rendering.
#[derive(Debug, thiserror::Error, MietteDiagnostic)]
#[error("{message}")]
pub struct RenderedDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label}")]
    span: SourceSpan,
    label: String,
}

impl From<&Diagnostic> for RenderedDiagnostic {
    fn from(d: &Diagnostic) -> Self {
        Self {
            message: format!("[{}] {}", d.code, d.message),
            help: d.suggestions.first().map(|s| s.message.clone()),
            span: SourceSpan::from((d.range.start(), d.range.len())),
            label: d.rule.clone(),
        }
    }
}

/// Precomputed line-start table for byte offset to line/column conversion.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Builds the index for `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut line_starts = Vec::with_capacity(text.len() / 40 + 1);
        line_starts.push(0);
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a byte offset to 1-indexed (line, column).
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let column = offset - self.line_starts[line] + 1;
        (line + 1, column)
    }

    /// Returns the 1-indexed line containing `offset`.
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_col(offset).0
    }
}
