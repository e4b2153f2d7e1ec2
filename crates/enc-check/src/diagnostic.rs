//! Location primitives for diagnostics.
use std::ops::Range;

/// Byte index in a source unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteIndex(usize);

impl ByteIndex {
    /// Get the index as a usize, for slicing.
    pub const fn to_usize(self) -> usize {
        self.0
    }
}

impl From<usize> for ByteIndex {
    fn from(n: usize) -> Self {
        Self(n)
    }
}

/// Source code location structure, identifying a range of source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    start: ByteIndex,
    end: ByteIndex,
}

impl SourceLocation {
    /// Create a source code range.
    pub const fn new(range: Range<ByteIndex>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }

    /// Return the start of the range.
    pub const fn start(self) -> ByteIndex {
        self.start
    }

    /// Return the end of the range.
    pub const fn end(self) -> ByteIndex {
        self.end
    }

    /// Return the range as plain byte offsets.
    pub const fn to_range(self) -> Range<usize> {
        Range {
            start: self.start.to_usize(),
            end: self.end.to_usize(),
        }
    }
}

/// Severity of a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Error,
}
