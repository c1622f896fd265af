//! Cursor positions and the offset ↔ line/column mapping.

use std::fmt;

pub use text_size::TextRange;
pub use text_size::TextSize;

/// A cursor position as the editor reports it.
///
/// Both fields are 0-indexed. The column counts UTF-8 bytes; converting from
/// UTF-16 happens at the protocol boundary, outside this crate.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl fmt::Debug for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Line start table for one text snapshot.
///
/// Lookups never fail: offsets past the end map to the last line, and
/// positions past the end of a line are clamped to that line's end.
#[derive(Clone, Debug)]
pub struct LineIndex {
    /// Byte offset of the first character of every line.
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .map(|offset| TextSize::from(offset as u32))
            .collect();

        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    /// Line and column of a byte offset.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);

        LineCol {
            line: line as u32,
            col: (offset - self.line_starts[line]).into(),
        }
    }

    /// Byte offset of a position, clamped into the document.
    ///
    /// The result may still fall inside a multi-byte character; callers
    /// holding the text snap it with [`LineIndex::offset_in`].
    pub fn offset(&self, pos: LineCol) -> TextSize {
        match self.line_range(pos.line) {
            Some(range) => range
                .start()
                .checked_add(TextSize::from(pos.col))
                .map_or(range.end(), |offset| offset.min(range.end())),
            None => self.len,
        }
    }

    /// Like [`LineIndex::offset`], but moved back onto a char boundary of `text`.
    pub fn offset_in(&self, text: &str, pos: LineCol) -> TextSize {
        let mut offset = usize::from(self.offset(pos)).min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        TextSize::from(offset as u32)
    }

    /// Range of a line's content, excluding the `\n` terminator.
    pub fn line_range(&self, line: u32) -> Option<TextRange> {
        let line = line as usize;
        let start = *self.line_starts.get(line)?;
        let end = match self.line_starts.get(line + 1) {
            Some(&next) => next - TextSize::from(1),
            None => self.len,
        };
        Some(TextRange::new(start, end))
    }

    pub fn len(&self) -> usize {
        self.line_starts.len()
    }

    /// Always false: even the empty text has one (empty) line.
    pub fn is_empty(&self) -> bool {
        self.line_starts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_display_is_one_indexed() {
        assert_eq!(format!("{}", LineCol::new(0, 0)), "1:1");
        assert_eq!(format!("{}", LineCol::new(5, 10)), "6:11");
    }

    #[test]
    fn test_line_col_of_offsets() {
        let index = LineIndex::new("fn a() {\n}\nx := 1");

        assert_eq!(index.line_col(TextSize::from(0)), LineCol::new(0, 0));
        assert_eq!(index.line_col(TextSize::from(8)), LineCol::new(0, 8));
        assert_eq!(index.line_col(TextSize::from(9)), LineCol::new(1, 0));
        assert_eq!(index.line_col(TextSize::from(11)), LineCol::new(2, 0));
        assert_eq!(index.line_col(TextSize::from(999)), LineCol::new(2, 6));
    }

    #[test]
    fn test_offset_clamps_to_line_end() {
        let index = LineIndex::new("ab\ncd");

        assert_eq!(index.offset(LineCol::new(1, 1)), TextSize::from(4));
        assert_eq!(index.offset(LineCol::new(0, 40)), TextSize::from(2));
        assert_eq!(index.offset(LineCol::new(7, 0)), TextSize::from(5));
    }

    #[test]
    fn test_offset_in_snaps_to_char_boundary() {
        let text = "é := 1";
        let index = LineIndex::new(text);

        assert_eq!(index.offset_in(text, LineCol::new(0, 1)), TextSize::from(0));
        assert_eq!(index.offset_in(text, LineCol::new(0, 2)), TextSize::from(2));
    }

    #[test]
    fn test_line_range_excludes_newline() {
        let index = LineIndex::new("ab\ncd\n");

        assert_eq!(index.len(), 3);
        assert_eq!(
            index.line_range(0),
            Some(TextRange::new(TextSize::from(0), TextSize::from(2)))
        );
        assert_eq!(
            index.line_range(2),
            Some(TextRange::new(TextSize::from(6), TextSize::from(6)))
        );
        assert_eq!(index.line_range(3), None);
    }
}
