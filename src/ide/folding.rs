//! Folding ranges: collapsible brace blocks and block comments.
//!
//! Ranges come straight from the scanner's structural brace pairs, so braces
//! in literals and comments never fold.

use crate::base::{LineIndex, TextSize};
use crate::syntax::{Brace, CharClass, Scanner};

/// What a folding range covers, when it is not plain code.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FoldKind {
    Comment,
}

/// A folding range with line information.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoldRange {
    /// Start line (0-indexed)
    pub start_line: u32,
    /// End line (0-indexed). For a block this is the line before its `}`,
    /// which stays visible; for a comment it is the line of `*/`.
    pub end_line: u32,
    pub kind: Option<FoldKind>,
}

impl FoldRange {
    pub fn is_comment(&self) -> bool {
        self.kind == Some(FoldKind::Comment)
    }
}

/// Get folding ranges for a file.
///
/// A `{ ... }` pair folds from its opening line to the line before its
/// closing brace, and a closed block comment from `/*` to `*/`. Either folds
/// only when that covers more than one line. Unmatched braces and an
/// unterminated comment fold nothing.
pub fn folding_ranges(text: &str) -> Vec<FoldRange> {
    let lines = LineIndex::new(text);
    let line_of = |offset| lines.line_col(offset).line;

    let mut scanner = Scanner::new(text);
    let mut ranges: Vec<FoldRange> = scanner
        .by_ref()
        .filter_map(|scanned| match scanned.brace {
            Some(Brace::Close { open: Some(open) }) => Some((open, scanned.offset)),
            _ => None,
        })
        .map(|(open, close)| FoldRange {
            start_line: line_of(open),
            end_line: line_of(close).saturating_sub(1),
            kind: None,
        })
        .collect();

    let map = scanner.finish();
    ranges.extend(
        map.regions()
            .iter()
            .filter(|region| region.class == CharClass::BlockComment && region.terminated)
            .map(|region| FoldRange {
                start_line: line_of(region.range.start()),
                end_line: line_of(region.range.end() - TextSize::from(1)),
                kind: Some(FoldKind::Comment),
            }),
    );

    ranges.retain(|r| r.end_line > r.start_line);

    // Sort by start line
    ranges.sort_by_key(|r| r.start_line);

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(text: &str) -> Vec<(u32, u32, bool)> {
        folding_ranges(text)
            .into_iter()
            .map(|r| (r.start_line, r.end_line, r.is_comment()))
            .collect()
    }

    #[test]
    fn test_function_body_folds() {
        assert_eq!(spans("fn f() {\n  x := 1\n}"), vec![(0, 1, false)]);
    }

    #[test]
    fn test_single_line_block_does_not_fold() {
        assert!(spans("fn f() { x := 1 }").is_empty());
    }

    #[test]
    fn test_empty_body_on_two_lines_does_not_fold() {
        assert!(spans("fn f() {\n}").is_empty());
        assert_eq!(spans("if a {\n  b()\n} else {\n  c()\n}"), vec![(0, 1, false), (2, 3, false)]);
    }

    #[test]
    fn test_nested_blocks_sorted_by_start() {
        let text = "fn f() {\n  if x {\n    y()\n  }\n}\n";
        assert_eq!(spans(text), vec![(0, 3, false), (1, 2, false)]);
    }

    #[test]
    fn test_braces_in_strings_and_comments_are_ignored() {
        let text = "s := \"{\"\n// {\nfn f() {\n  t := '}'\n}";
        assert_eq!(spans(text), vec![(2, 3, false)]);
    }

    #[test]
    fn test_block_comment_folds() {
        let text = "/*\n * doc\n */\nfn f() {}";
        assert_eq!(spans(text), vec![(0, 2, true)]);
    }

    #[test]
    fn test_unterminated_comment_and_unmatched_braces() {
        assert!(spans("fn f() {\n  x := 1\n").is_empty());
        assert!(spans("}\n}\n").is_empty());
        assert!(spans("/* never\n closed {\n}").is_empty());
    }

    #[test]
    fn test_multiline_template_keeps_braces_inert() {
        let text = "msg := `{\n}`\nfn f() {\n  g()\n}";
        assert_eq!(spans(text), vec![(2, 3, false)]);
    }
}
