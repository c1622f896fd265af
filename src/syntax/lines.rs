//! Line-anchored declaration patterns.
//!
//! Every matcher takes one line without its terminator and returns byte
//! columns into that line. Whether the match sits in code is left to the
//! caller, which holds the [`ScanMap`](super::ScanMap) for the whole text.

use super::ident::{ident_len, leading_ident};

/// The declaration keyword for functions.
pub const FN_KEYWORD: &str = "fn";
/// Declare-and-assign operator introducing a variable.
pub const DECLARE_ASSIGN: &str = ":=";
/// Qualifier that may prefix a parameter name.
pub const MUT_QUALIFIER: &str = "mut";

fn indent(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Strip horizontal whitespace only; these patterns never span lines.
pub fn skip_blanks(s: &str) -> &str {
    s.trim_start_matches([' ', '\t'])
}

/// `^\s*fn\s+`: column right after the keyword's trailing whitespace.
pub fn after_fn_keyword(line: &str) -> Option<usize> {
    let start = indent(line);
    let rest = line[start..].strip_prefix(FN_KEYWORD)?;
    let gap = rest.len() - rest.trim_start().len();
    (gap > 0).then_some(start + FN_KEYWORD.len() + gap)
}

/// `^\s*fn\s+(name)\s*\(`: column and text of `name`.
pub fn fn_declaration(line: &str) -> Option<(usize, &str)> {
    let col = after_fn_keyword(line)?;
    let name = leading_ident(&line[col..])?;
    skip_blanks(&line[col + name.len()..])
        .starts_with('(')
        .then_some((col, name))
}

/// `^\s*(name)\s*:=`: column and text of `name`.
pub fn var_declaration(line: &str) -> Option<(usize, &str)> {
    let col = indent(line);
    let name = leading_ident(&line[col..])?;
    starts_with_declare_assign(&line[col + name.len()..]).then_some((col, name))
}

/// `^\s*(name)\s*:`: the key a YAML line declares.
pub fn key_declaration(line: &str) -> Option<(usize, &str)> {
    let col = indent(line);
    let name = leading_ident(&line[col..])?;
    skip_blanks(&line[col + name.len()..])
        .starts_with(':')
        .then_some((col, name))
}

/// `^\s*<key>\s*:` for an arbitrary key: column of the key.
pub fn declares_key(line: &str, key: &str) -> Option<usize> {
    let col = indent(line);
    let rest = line[col..].strip_prefix(key)?;
    skip_blanks(rest).starts_with(':').then_some(col)
}

/// `^\s*:=`
pub fn starts_with_declare_assign(rest: &str) -> bool {
    skip_blanks(rest).starts_with(DECLARE_ASSIGN)
}

/// Name declared by one parameter-list entry.
///
/// Drops a `mut` qualifier, a `: Type` annotation and an `= default`.
pub fn param_name(param: &str) -> Option<&str> {
    let param = param.trim();
    let param = match param.strip_prefix(MUT_QUALIFIER) {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => param,
    };
    let name = param.split([':', '=']).next()?.trim();
    (!name.is_empty() && ident_len(name) == name.len()).then_some(name)
}
