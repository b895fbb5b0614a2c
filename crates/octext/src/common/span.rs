//! Byte ranges into message text

use std::ops::Range;

/// Half-open byte range `start..end` into a message's tagged text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `pos`
    pub fn point(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}
