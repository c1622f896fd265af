//! Call-argument position: which argument slot of which call a cursor is in.
//!
//! Parameter lists in [`scopes`](super::scopes) are split with the same
//! [`walk_arguments`].

use crate::base::{TextRange, TextSize};
use crate::syntax::ident::{is_word_start, leading_ident};
use crate::syntax::lines::skip_blanks;
use crate::syntax::{Quote, ScanMap};

/// The enclosing call a cursor was resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgumentPosition<'a> {
    /// Offset of the function name.
    pub name_offset: TextSize,
    /// Offset of the call's `(`.
    pub open_paren: TextSize,
    /// 0-based argument slot of the cursor.
    pub index: usize,
    /// Text between the `(` and the cursor.
    pub raw_text: &'a str,
    /// The current argument up to the cursor, without a `name:` label.
    pub current: &'a str,
    /// Whether `current` starts with a quote.
    pub is_quoted_literal: bool,
}

/// Result of walking an argument list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArgumentWalk {
    /// Offsets of the top-level commas seen.
    pub commas: Vec<TextSize>,
    /// Offset of the `)` that closed the list, if it appeared.
    pub close: Option<TextSize>,
}

/// Walk `range` as the inside of an argument list.
///
/// Only code counts: commas and brackets in literals or comments are
/// skipped. Nested `()`, `[]` and `{}` hide their commas. The walk stops at
/// the first top-level `)`.
pub fn walk_arguments(text: &str, map: &ScanMap, range: TextRange) -> ArgumentWalk {
    let mut walk = ArgumentWalk::default();
    let mut depth = 0usize;

    for (i, ch) in text[range].char_indices() {
        let offset = range.start() + TextSize::from(i as u32);
        if !map.is_code(offset) {
            continue;
        }
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' if depth == 0 => {
                walk.close = Some(offset);
                break;
            }
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => walk.commas.push(offset),
            _ => {}
        }
    }

    walk
}

/// Split the inside of an argument or parameter list at top-level commas.
pub fn split_top_level(text: &str, map: &ScanMap, range: TextRange) -> Vec<TextRange> {
    let walk = walk_arguments(text, map, range);
    let end = walk.close.unwrap_or(range.end());

    let mut start = range.start();
    let mut parts = Vec::with_capacity(walk.commas.len() + 1);
    for comma in walk.commas {
        parts.push(TextRange::new(start, comma));
        start = comma + TextSize::from(1);
    }
    parts.push(TextRange::new(start, end));
    parts
}

/// First offset in `range` that is neither whitespace nor comment.
fn skip_trivia(text: &str, map: &ScanMap, range: TextRange) -> TextSize {
    text[range]
        .char_indices()
        .map(|(i, ch)| (range.start() + TextSize::from(i as u32), ch))
        .find(|&(offset, ch)| !ch.is_whitespace() && !map.class_at(offset).is_comment())
        .map_or(range.end(), |(offset, _)| offset)
}

/// Drop a leading `name:` label from a named argument.
fn strip_label(arg: &str) -> &str {
    let Some(name) = leading_ident(arg) else {
        return arg;
    };
    let rest = skip_blanks(&arg[name.len()..]);
    match rest.strip_prefix(':') {
        Some(value) if !value.starts_with('=') => value.trim_start(),
        _ => arg,
    }
}

/// Find the innermost unclosed call to `function` around `cursor`.
///
/// Scans the current line backwards; the nearest `function(` that is code,
/// starts a word, and has not been closed before the cursor wins. The name
/// comparison is case sensitive.
pub fn resolve_argument_position<'a>(
    text: &'a str,
    cursor: TextSize,
    function: &str,
) -> Option<ArgumentPosition<'a>> {
    resolve_argument_position_in(text, &ScanMap::new(text), cursor, function)
}

/// [`resolve_argument_position`] against an existing scan of `text`.
pub fn resolve_argument_position_in<'a>(
    text: &'a str,
    map: &ScanMap,
    cursor: TextSize,
    function: &str,
) -> Option<ArgumentPosition<'a>> {
    if function.is_empty() {
        return None;
    }
    let mut cursor = usize::from(cursor).min(text.len());
    while !text.is_char_boundary(cursor) {
        cursor -= 1;
    }

    let line_start = text[..cursor].rfind('\n').map_or(0, |i| i + 1);
    let line = &text[line_start..cursor];

    for (rel, _) in line.rmatch_indices(function) {
        let name_at = line_start + rel;
        if !map.is_code(TextSize::from(name_at as u32)) || !is_word_start(text, name_at) {
            continue;
        }

        let after_name = name_at + function.len();
        let gap = text[after_name..cursor].len() - skip_blanks(&text[after_name..cursor]).len();
        let paren_at = after_name + gap;
        if !text[paren_at..cursor].starts_with('(') {
            continue;
        }

        let args = TextRange::new(
            TextSize::from(paren_at as u32 + 1),
            TextSize::from(cursor as u32),
        );
        let walk = walk_arguments(text, map, args);
        if walk.close.is_some() {
            continue;
        }

        let current_start = walk
            .commas
            .last()
            .map_or(args.start(), |&comma| comma + TextSize::from(1));
        let current_start = skip_trivia(text, map, TextRange::new(current_start, args.end()));
        let current = strip_label(&text[TextRange::new(current_start, args.end())]);

        return Some(ArgumentPosition {
            name_offset: TextSize::from(name_at as u32),
            open_paren: TextSize::from(paren_at as u32),
            index: walk.commas.len(),
            raw_text: &text[args],
            current,
            is_quoted_literal: current.chars().next().and_then(Quote::from_char).is_some(),
        });
    }

    None
}
