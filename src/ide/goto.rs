//! Go-to-declaration: config keys behind string literals, and in-file
//! functions and variables.
//!
//! In-file lookups are line anchored: a function is declared by a line
//! starting `fn name(`, a variable by a line starting `name :=`. Only code
//! positions count on either side.

use crate::base::{LineCol, SymbolLocation, TextRange, TextSize};
use crate::config::{BindingTable, ConfigBinding, ConfigIndex};
use crate::hir::{Document, resolve_argument_position_in};
use crate::syntax::ScanMap;
use crate::syntax::ident::word_at;
use crate::syntax::lines::{fn_declaration, var_declaration};

/// A string literal passed as the bound argument of a config-backed call.
#[derive(Clone, Debug)]
pub struct BoundLiteral<'a> {
    pub binding: &'a ConfigBinding,
    /// Literal text without quotes.
    pub key: &'a str,
    /// The literal with its quotes.
    pub range: TextRange,
}

/// The bound literal a cursor at `offset` touches, from just before its
/// opening quote to just after its closing one.
///
/// The literal must make up the start of the argument: `locale("a" + x)`
/// binds `a`, but the second literal in `locale(x + "b")` binds nothing.
pub fn bound_literal_at<'a>(
    bindings: &'a BindingTable,
    text: &'a str,
    map: &ScanMap,
    offset: TextSize,
) -> Option<BoundLiteral<'a>> {
    let region = map.string_near_cursor(offset)?;
    let inside = region.range.start() + TextSize::from(1);

    let binding = bindings.iter().find(|binding| {
        resolve_argument_position_in(text, map, inside, &binding.function).is_some_and(|pos| {
            pos.index == binding.argument
                && pos.is_quoted_literal
                && pos.current.len() == 1
        })
    })?;

    Some(BoundLiteral {
        binding,
        key: region.contents(text),
        range: region.range,
    })
}

/// Identifier under the cursor, when it sits in code.
pub(crate) fn code_word_at(text: &str, map: &ScanMap, offset: TextSize) -> Option<TextRange> {
    let word = word_at(text, offset)?;
    map.is_code(word.start()).then_some(word)
}

/// Declaration of the config key in the literal under the cursor.
pub fn declaration_of_literal_key(
    index: &ConfigIndex,
    doc: &Document,
    pos: LineCol,
) -> Option<SymbolLocation> {
    let map = ScanMap::new(doc.text());
    declaration_of_literal_key_in(index, doc, &map, doc.offset(pos))
}

pub fn declaration_of_literal_key_in(
    index: &ConfigIndex,
    doc: &Document,
    map: &ScanMap,
    offset: TextSize,
) -> Option<SymbolLocation> {
    let literal = bound_literal_at(index.bindings(), doc.text(), map, offset)?;
    index.declaration_of_key(literal.binding, literal.key)
}

/// `fn name(` declaration of the identifier under the cursor.
pub fn function_declaration(doc: &Document, pos: LineCol) -> Option<SymbolLocation> {
    let map = ScanMap::new(doc.text());
    function_declaration_in(doc, &map, doc.offset(pos))
}

pub fn function_declaration_in(doc: &Document, map: &ScanMap, offset: TextSize) -> Option<SymbolLocation> {
    let word = code_word_at(doc.text(), map, offset)?;
    find_function(doc, map, &doc.text()[word])
}

/// First line declaring function `name`.
pub(crate) fn find_function(doc: &Document, map: &ScanMap, name: &str) -> Option<SymbolLocation> {
    doc.lines().find_map(|(_, start, line)| {
        let (col, found) = fn_declaration(line)?;
        let at = start + TextSize::from(col as u32);
        (found == name && map.is_code(at)).then(|| doc.location(TextRange::at(at, TextSize::of(name))))
    })
}

/// First `name :=` at or above the cursor line, for the identifier under
/// the cursor.
pub fn variable_declaration(doc: &Document, pos: LineCol) -> Option<SymbolLocation> {
    let map = ScanMap::new(doc.text());
    variable_declaration_in(doc, &map, doc.offset(pos))
}

pub fn variable_declaration_in(doc: &Document, map: &ScanMap, offset: TextSize) -> Option<SymbolLocation> {
    let word = code_word_at(doc.text(), map, offset)?;
    let cursor_line = doc.line_col(offset).line;
    find_variable(doc, map, &doc.text()[word], cursor_line)
}

/// First line up to `last_line` declaring variable `name`.
pub(crate) fn find_variable(
    doc: &Document,
    map: &ScanMap,
    name: &str,
    last_line: u32,
) -> Option<SymbolLocation> {
    doc.lines()
        .take_while(|&(line, _, _)| line <= last_line)
        .find_map(|(_, start, line)| {
            let (col, found) = var_declaration(line)?;
            let at = start + TextSize::from(col as u32);
            (found == name && map.is_code(at))
                .then(|| doc.location(TextRange::at(at, TextSize::of(name))))
        })
}
