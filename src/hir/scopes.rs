//! Function scopes: bodies, parameters and locals.
//!
//! A function is `fn name(params)`, an optional `-> Type`, then `{`. The body
//! ends at the structural match of that brace. Scopes form a flat list in
//! source order; a nested function literal yields its own scope that overlaps
//! the outer one, and its locals are also counted as locals of the outer one.

use smol_str::SmolStr;

use super::call_args::{split_top_level, walk_arguments};
use crate::base::{TextRange, TextSize};
use crate::syntax::ident::{is_word_start, leading_ident};
use crate::syntax::lines::{FN_KEYWORD, param_name};
use crate::syntax::{ScanMap, ident};

/// A recognised `fn name(...)` header, with or without a body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: SmolStr,
    /// Offset of the `fn` keyword.
    pub start: TextSize,
    pub params: Vec<SmolStr>,
    /// Offset of the body's `{`, when one follows the header.
    pub body_open: Option<TextSize>,
}

/// Lexical extent of a function body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scope {
    pub name: SmolStr,
    /// Offset of the `fn` keyword.
    pub start: TextSize,
    /// Offset of the closing `}`.
    pub end: TextSize,
    pub params: Vec<SmolStr>,
    /// `name :=` declarations in the body, in source order, repeats kept.
    pub locals: Vec<SmolStr>,
}

impl Scope {
    /// Inclusive at both ends.
    pub fn contains(&self, offset: TextSize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Parameters, then locals.
    pub fn names(&self) -> impl Iterator<Item = &SmolStr> {
        self.params.iter().chain(&self.locals)
    }
}

/// Every function header in `text`.
pub fn function_signatures(text: &str, map: &ScanMap) -> Vec<FunctionSignature> {
    text.match_indices(FN_KEYWORD)
        .filter_map(|(at, _)| parse_signature(text, map, at))
        .collect()
}

fn parse_signature(text: &str, map: &ScanMap, at: usize) -> Option<FunctionSignature> {
    if !map.is_code(TextSize::from(at as u32)) || !is_word_start(text, at) {
        return None;
    }

    let after_kw = at + FN_KEYWORD.len();
    let rest = &text[after_kw..];
    let name_at = after_kw + (rest.len() - rest.trim_start().len());
    if name_at == after_kw {
        return None;
    }
    let name = leading_ident(&text[name_at..])?;

    let rest = &text[name_at + name.len()..];
    let paren_at = name_at + name.len() + (rest.len() - rest.trim_start().len());
    if !text[paren_at..].starts_with('(') || !map.is_code(TextSize::from(paren_at as u32)) {
        return None;
    }

    let inside = TextRange::new(TextSize::from(paren_at as u32 + 1), map.len());
    let close = walk_arguments(text, map, inside).close?;
    let params = split_top_level(text, map, TextRange::new(inside.start(), close))
        .into_iter()
        .filter_map(|part| param_name(&text[part]))
        .map(SmolStr::new)
        .collect();

    Some(FunctionSignature {
        name: SmolStr::new(name),
        start: TextSize::from(at as u32),
        params,
        body_open: body_open(text, map, usize::from(close) + 1),
    })
}

/// The `{` opening a body after the parameter list ending before `from`.
///
/// A return annotation runs to the end of its line, and the body may open
/// on the line after it. Anything that ends a statement first means there
/// is no body.
fn body_open(text: &str, map: &ScanMap, from: usize) -> Option<TextSize> {
    let rest = &text[from..];
    let (i, c) = rest.char_indices().find(|&(_, c)| !c.is_whitespace())?;
    if c == '{' {
        return Some(TextSize::from((from + i) as u32));
    }
    if !rest[i..].starts_with("->") {
        return None;
    }
    let (end, c) = rest[i..]
        .char_indices()
        .map(|(j, c)| (from + i + j, c))
        .filter(|&(at, _)| map.is_code(TextSize::from(at as u32)))
        .find(|&(_, c)| matches!(c, '{' | '}' | ';' | '\n'))?;
    match c {
        '{' => Some(TextSize::from(end as u32)),
        '\n' => brace_after_blanks(text, end + 1),
        _ => None,
    }
}

fn brace_after_blanks(text: &str, from: usize) -> Option<TextSize> {
    text[from..]
        .char_indices()
        .find(|&(_, c)| !c.is_whitespace())
        .filter(|&(_, c)| c == '{')
        .map(|(i, _)| TextSize::from((from + i) as u32))
}

/// `(offset, name)` of every code-level `name :=` inside `range`.
pub fn declared_variables(text: &str, map: &ScanMap, range: TextRange) -> Vec<(TextSize, SmolStr)> {
    let mut found = Vec::new();

    for (rel, _) in text[range].match_indices(':') {
        let colon = usize::from(range.start()) + rel;
        if !text[colon..].starts_with(":=") || !map.is_code(TextSize::from(colon as u32)) {
            continue;
        }

        let before = text[..colon].trim_end_matches([' ', '\t']);
        let name_at = before
            .char_indices()
            .rev()
            .take_while(|&(_, c)| ident::is_ident_continue(c))
            .last()
            .map_or(before.len(), |(i, _)| i);
        let Some(name) = leading_ident(&before[name_at..]) else {
            continue;
        };
        if name_at < usize::from(range.start())
            || !is_word_start(text, name_at)
            || !map.is_code(TextSize::from(name_at as u32))
        {
            continue;
        }
        found.push((TextSize::from(name_at as u32), SmolStr::new(name)));
    }

    found
}

/// Function scopes of `text`, scanning it first.
pub fn extract_scopes(text: &str) -> Vec<Scope> {
    scopes_in(text, &ScanMap::new(text))
}

/// Function scopes of `text` against an existing scan.
///
/// A header whose `{` never finds its `}` produces no scope.
pub fn scopes_in(text: &str, map: &ScanMap) -> Vec<Scope> {
    function_signatures(text, map)
        .into_iter()
        .filter_map(|sig| {
            let open = sig.body_open?;
            let end = map.matching_brace(open)?;
            let body = TextRange::new(open + TextSize::from(1), end);
            let locals = declared_variables(text, map, body)
                .into_iter()
                .map(|(_, name)| name)
                .collect();

            Some(Scope {
                name: sig.name,
                start: sig.start,
                end,
                params: sig.params,
                locals,
            })
        })
        .collect()
}

/// First scope in source order containing `offset`, the outermost one when
/// function literals nest.
pub fn find_scope_at_offset(scopes: &[Scope], offset: TextSize) -> Option<&Scope> {
    scopes.iter().find(|scope| scope.contains(offset))
}

/// The most deeply nested scope containing `offset`.
pub fn innermost_scope_at_offset(scopes: &[Scope], offset: TextSize) -> Option<&Scope> {
    scopes.iter().rev().find(|scope| scope.contains(offset))
}

/// Every scope containing `offset`, innermost first.
pub fn enclosing_scopes(scopes: &[Scope], offset: TextSize) -> Vec<&Scope> {
    scopes.iter().rev().filter(|scope| scope.contains(offset)).collect()
}
