//! Hover: documentation and signature of the built-in under the cursor.

use crate::base::{LineCol, SymbolLocation, TextSize};
use crate::config::{Builtin, BuiltinTable};
use crate::hir::Document;
use crate::syntax::ScanMap;

use super::completion::split_mandatory_args;
use super::goto::code_word_at;

/// Hover contents for one identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverResult {
    /// Markdown: the documentation, then `Signature: <detail>`.
    pub contents: String,
    /// The hovered identifier.
    pub location: SymbolLocation,
}

pub fn hover(builtins: &BuiltinTable, doc: &Document, pos: LineCol) -> Option<HoverResult> {
    let map = ScanMap::new(doc.text());
    hover_in(builtins, doc, &map, doc.offset(pos))
}

/// The first built-in whose base label (`name` of `name__a_b`) is the code
/// identifier at `offset`. A built-in with neither documentation nor a
/// signature has nothing to show.
pub fn hover_in(
    builtins: &BuiltinTable,
    doc: &Document,
    map: &ScanMap,
    offset: TextSize,
) -> Option<HoverResult> {
    let word = code_word_at(doc.text(), map, offset)?;
    let name = &doc.text()[word];
    let builtin = builtins
        .iter()
        .find(|builtin| split_mandatory_args(&builtin.label).0 == name)?;

    Some(HoverResult {
        contents: hover_contents(builtin)?,
        location: doc.location(word),
    })
}

fn hover_contents(builtin: &Builtin) -> Option<String> {
    let mut contents = builtin.documentation.clone().unwrap_or_default();
    if let Some(detail) = &builtin.detail {
        contents.push_str("\n\nSignature: ");
        contents.push_str(detail);
    }
    (!contents.is_empty()).then_some(contents)
}
