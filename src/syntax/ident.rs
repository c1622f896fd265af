//! Identifier classes and word lookup.

use crate::base::{TextRange, TextSize};

#[inline]
pub fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

#[inline]
pub fn is_ident_continue(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

/// Byte length of the identifier at the start of `s` (0 if none).
pub fn ident_len(s: &str) -> usize {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if is_ident_start(c) => chars
            .find(|&(_, c)| !is_ident_continue(c))
            .map_or(s.len(), |(i, _)| i),
        _ => 0,
    }
}

/// Leading identifier of `s`, if any.
pub fn leading_ident(s: &str) -> Option<&str> {
    match ident_len(s) {
        0 => None,
        len => Some(&s[..len]),
    }
}

/// Whether an identifier may start at byte `at` of `text`, i.e. the previous
/// character does not continue one.
pub fn is_word_start(text: &str, at: usize) -> bool {
    !text[..at].chars().next_back().is_some_and(is_ident_continue)
}

/// Whether an identifier ending at byte `at` of `text` is complete.
pub fn is_word_end(text: &str, at: usize) -> bool {
    !text[at..].chars().next().is_some_and(is_ident_continue)
}

/// Identifier touching `offset`, from either side.
///
/// `offset` must lie on a char boundary of `text`.
pub fn word_at(text: &str, offset: TextSize) -> Option<TextRange> {
    let offset = usize::from(offset).min(text.len());

    let start = text[..offset]
        .char_indices()
        .rev()
        .take_while(|&(_, c)| is_ident_continue(c))
        .last()
        .map_or(offset, |(i, _)| i);
    let end = text[offset..]
        .char_indices()
        .find(|&(_, c)| !is_ident_continue(c))
        .map_or(text.len(), |(i, _)| offset + i);

    if start == end {
        return None;
    }
    // `9abc` is not a word; trim leading digits rather than reject it.
    let start = start + text[start..end].find(is_ident_start)?;
    Some(TextRange::new(
        TextSize::from(start as u32),
        TextSize::from(end as u32),
    ))
}
