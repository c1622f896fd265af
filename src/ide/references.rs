//! Find-references across open documents (config keys) and within one
//! document (functions and variables).

use crate::base::{LineCol, SymbolLocation, TextRange, TextSize};
use crate::config::ConfigIndex;
use crate::hir::{Document, DocumentSet};
use crate::syntax::ident::{is_word_end, is_word_start};
use crate::syntax::lines::{DECLARE_ASSIGN, after_fn_keyword, key_declaration, skip_blanks};
use crate::syntax::{CharClass, Quote, ScanMap};

use super::goto::{code_word_at, find_function, find_variable};

/// Every `"key"` or `'key'` literal in the open script documents.
///
/// Locations span the key without its quotes. Config documents are skipped.
pub fn references_to_key(key: &str, docs: &DocumentSet) -> Vec<SymbolLocation> {
    docs.sources()
        .flat_map(|doc| literal_key_references(doc, &ScanMap::new(doc.text()), key))
        .collect()
}

/// Closed `"key"` and `'key'` literals of one document.
pub fn literal_key_references(doc: &Document, map: &ScanMap, key: &str) -> Vec<SymbolLocation> {
    map.regions()
        .iter()
        .filter(|region| {
            matches!(region.class, CharClass::String(Quote::Double | Quote::Single))
                && region.terminated
                && region.contents(doc.text()) == key
        })
        .map(|region| {
            let start = region.range.start() + TextSize::from(1);
            doc.location(TextRange::at(start, TextSize::of(key)))
        })
        .collect()
}

/// References to the key declared on the cursor line of a config document.
///
/// When the document is the file of some binding, only keys that binding
/// extracts count; a section header such as `lang:` has no references.
pub fn config_key_references(
    index: &ConfigIndex,
    config_doc: &Document,
    pos: LineCol,
    include_declaration: bool,
    docs: &DocumentSet,
) -> Vec<SymbolLocation> {
    let Some(line) = config_doc.line(pos.line) else {
        return Vec::new();
    };
    let Some((col, key)) = key_declaration(line) else {
        return Vec::new();
    };
    if let Some(binding) = index.binding_for_uri(config_doc.uri()) {
        if !index.entry(binding).contains(key) {
            return Vec::new();
        }
    }

    let mut refs = Vec::new();
    if include_declaration {
        refs.push(SymbolLocation::new(
            config_doc.uri().clone(),
            pos.line,
            col as u32,
            (col + key.len()) as u32,
        ));
    }
    refs.extend(references_to_key(key, docs));
    refs
}

/// References to the function named under the cursor.
///
/// `None` when the identifier is not declared as a function in `doc`.
pub fn function_references(doc: &Document, pos: LineCol, include_declaration: bool) -> Option<Vec<SymbolLocation>> {
    let map = ScanMap::new(doc.text());
    function_references_in(doc, &map, doc.offset(pos), include_declaration)
}

pub fn function_references_in(
    doc: &Document,
    map: &ScanMap,
    offset: TextSize,
    include_declaration: bool,
) -> Option<Vec<SymbolLocation>> {
    let word = code_word_at(doc.text(), map, offset)?;
    let name = &doc.text()[word];
    let declaration = find_function(doc, map, name)?;

    let mut refs = Vec::new();
    if include_declaration {
        refs.push(declaration);
    }
    for (_, start, line) in doc.lines() {
        if after_fn_keyword(line).is_some() {
            continue;
        }
        refs.extend(
            word_occurrences(doc.text(), map, start, line, name)
                .filter(|&at| {
                    let after = usize::from(at) - usize::from(start) + name.len();
                    skip_blanks(&line[after..]).starts_with('(')
                })
                .map(|at| doc.location(TextRange::at(at, TextSize::of(name)))),
        );
    }
    Some(refs)
}

/// References to the variable named under the cursor.
///
/// Matching starts at the first declaration in the document, wherever the
/// cursor is, and runs to the end of the document; uses above it never
/// match. A later `name :=` is a redeclaration and is not reported.
pub fn variable_references(doc: &Document, pos: LineCol, include_declaration: bool) -> Option<Vec<SymbolLocation>> {
    let map = ScanMap::new(doc.text());
    variable_references_in(doc, &map, doc.offset(pos), include_declaration)
}

pub fn variable_references_in(
    doc: &Document,
    map: &ScanMap,
    offset: TextSize,
    include_declaration: bool,
) -> Option<Vec<SymbolLocation>> {
    let word = code_word_at(doc.text(), map, offset)?;
    let name = &doc.text()[word];
    let declaration = find_variable(doc, map, name, u32::MAX)?;

    let mut refs = Vec::new();
    if include_declaration {
        refs.push(declaration.clone());
    }
    for (_, start, line) in doc.lines().skip(declaration.line as usize) {
        refs.extend(
            word_occurrences(doc.text(), map, start, line, name)
                .filter(|&at| {
                    let after = usize::from(at) - usize::from(start) + name.len();
                    !skip_blanks(&line[after..]).starts_with(DECLARE_ASSIGN)
                })
                .map(|at| doc.location(TextRange::at(at, TextSize::of(name)))),
        );
    }
    Some(refs)
}

/// Whole-word code occurrences of `name` in one line starting at `start`.
fn word_occurrences<'a>(
    text: &'a str,
    map: &'a ScanMap,
    start: TextSize,
    line: &'a str,
    name: &'a str,
) -> impl Iterator<Item = TextSize> + 'a {
    line.match_indices(name).filter_map(move |(col, _)| {
        let at = usize::from(start) + col;
        let whole = is_word_start(text, at) && is_word_end(text, at + name.len());
        let at = TextSize::from(at as u32);
        (whole && map.is_code(at)).then_some(at)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(marked: &str) -> (Document, LineCol) {
        let offset = marked.find('|').expect("cursor marker");
        let doc = Document::new("file:///main.avi", marked.replacen('|', "", 1));
        let pos = doc.line_col(TextSize::from(offset as u32));
        (doc, pos)
    }

    fn spans(refs: Option<Vec<SymbolLocation>>) -> Option<Vec<(u32, u32)>> {
        refs.map(|refs| refs.into_iter().map(|l| (l.line, l.col_start)).collect())
    }

    #[test]
    fn test_variable_references_skip_redeclaration() {
        let (d, pos) = doc("cou|nt := 0\nprint(count)\ncount := 1");

        assert_eq!(spans(variable_references(&d, pos, true)), Some(vec![(0, 0), (1, 6)]));
        assert_eq!(spans(variable_references(&d, pos, false)), Some(vec![(1, 6)]));
    }

    #[test]
    fn test_variable_references_are_forward_only() {
        let (d, pos) = doc("print(total)\ntot|al := 1\nsay(total, subtotal)");

        assert_eq!(spans(variable_references(&d, pos, true)), Some(vec![(1, 0), (2, 4)]));
    }

    #[test]
    fn test_variable_references_anchor_below_cursor() {
        let (d, pos) = doc("print(to|tal)\ntotal := 1\nsay(total)");

        assert_eq!(spans(variable_references(&d, pos, true)), Some(vec![(1, 0), (2, 4)]));
        assert_eq!(spans(variable_references(&d, pos, false)), Some(vec![(2, 4)]));
    }

    #[test]
    fn test_variable_references_ignore_literals_and_comments() {
        let (d, pos) = doc("n| := 1\nsay(\"n\") // n\nn + 1");

        assert_eq!(spans(variable_references(&d, pos, false)), Some(vec![(2, 0)]));
    }

    #[test]
    fn test_function_references() {
        let (d, pos) = doc("fn greet(name) {\n  say(name)\n}\ngreet|(\"a\")\nx := greet (\"b\") + greeter()");

        assert_eq!(
            spans(function_references(&d, pos, true)),
            Some(vec![(0, 3), (3, 0), (4, 5)])
        );
        assert_eq!(spans(function_references(&d, pos, false)), Some(vec![(3, 0), (4, 5)]));
    }

    #[test]
    fn test_function_references_need_a_declaration() {
        let (d, pos) = doc("pri|nt(\"x\")");
        assert_eq!(function_references(&d, pos, true), None);
    }

    #[test]
    fn test_literal_key_references() {
        let docs: DocumentSet = [
            Document::new("file:///a.avi", "locale(\"hello\")\nsay('hello', \"hello world\")"),
            Document::new("file:///b.avi", "// \"hello\"\nx := `hello`\nlocale(\"hello"),
            Document::new("file:///en.lang", "lang:\n  hello: \"hello\"\n"),
        ]
        .into_iter()
        .collect();

        let refs: Vec<_> = references_to_key("hello", &docs)
            .into_iter()
            .map(|l| (l.uri.to_string(), l.line, l.col_start, l.col_end))
            .collect();

        assert_eq!(
            refs,
            vec![
                ("file:///a.avi".to_string(), 0, 8, 13),
                ("file:///a.avi".to_string(), 1, 5, 10),
            ]
        );
    }
}
