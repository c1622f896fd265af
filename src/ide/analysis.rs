//! The request-level entry point tying the IDE features to one project.

use tracing::debug;

use crate::base::{LineCol, SymbolLocation};
use crate::config::{BuiltinTable, ConfigIndex};
use crate::hir::{Document, DocumentSet};
use crate::syntax::ScanMap;

use super::completion::{self, CompletionItem};
use super::folding::{self, FoldRange};
use super::goto::{bound_literal_at, function_declaration_in, variable_declaration_in};
use super::hover::{self, HoverResult};
use super::references::{
    config_key_references, function_references_in, references_to_key, variable_references_in,
};

/// IDE queries over one project's config index and the language built-ins.
///
/// Every query works on the snapshot it is given and keeps nothing; the only
/// shared state is the index's cache. `Analysis` is `Send + Sync`.
#[derive(Debug)]
pub struct Analysis {
    index: ConfigIndex,
    builtins: BuiltinTable,
}

impl Analysis {
    pub fn new(index: ConfigIndex, builtins: BuiltinTable) -> Self {
        Self { index, builtins }
    }

    pub fn config(&self) -> &ConfigIndex {
        &self.index
    }

    pub fn builtins(&self) -> &BuiltinTable {
        &self.builtins
    }

    pub fn folding_ranges(&self, doc: &Document) -> Vec<FoldRange> {
        debug!(uri = %doc.uri(), "folding_ranges");
        folding::folding_ranges(doc.text())
    }

    pub fn completions(&self, doc: &Document, pos: LineCol) -> Vec<CompletionItem> {
        debug!(uri = %doc.uri(), %pos, "completions");
        completion::completions(&self.index, &self.builtins, doc, pos)
    }

    pub fn hover(&self, doc: &Document, pos: LineCol) -> Option<HoverResult> {
        debug!(uri = %doc.uri(), %pos, "hover");
        hover::hover(&self.builtins, doc, pos)
    }

    /// Declaration of the symbol at `pos`.
    ///
    /// Inside a bound key literal only the config file is consulted.
    /// Otherwise a function declaration wins over a variable one.
    pub fn goto_declaration(&self, doc: &Document, pos: LineCol) -> Option<SymbolLocation> {
        debug!(uri = %doc.uri(), %pos, "goto_declaration");
        let map = ScanMap::new(doc.text());
        let offset = doc.offset(pos);

        if let Some(literal) = bound_literal_at(self.index.bindings(), doc.text(), &map, offset) {
            return self.index.declaration_of_key(literal.binding, literal.key);
        }
        function_declaration_in(doc, &map, offset).or_else(|| variable_declaration_in(doc, &map, offset))
    }

    /// In-file definition of the function or variable at `pos`.
    pub fn goto_definition(&self, doc: &Document, pos: LineCol) -> Option<SymbolLocation> {
        debug!(uri = %doc.uri(), %pos, "goto_definition");
        let map = ScanMap::new(doc.text());
        let offset = doc.offset(pos);

        function_declaration_in(doc, &map, offset).or_else(|| variable_declaration_in(doc, &map, offset))
    }

    /// References to the symbol at `pos`.
    ///
    /// From a config document, the key on the cursor line is looked up in
    /// `open`. From a bound key literal, the same key is. Anything else is
    /// resolved in `doc` alone, as a function first and a variable second.
    pub fn find_references(
        &self,
        doc: &Document,
        pos: LineCol,
        include_declaration: bool,
        open: &DocumentSet,
    ) -> Vec<SymbolLocation> {
        debug!(uri = %doc.uri(), %pos, include_declaration, "find_references");

        if doc.is_config() {
            return config_key_references(&self.index, doc, pos, include_declaration, open);
        }

        let map = ScanMap::new(doc.text());
        let offset = doc.offset(pos);

        if let Some(literal) = bound_literal_at(self.index.bindings(), doc.text(), &map, offset) {
            let mut refs = Vec::new();
            if include_declaration {
                refs.extend(self.index.declaration_of_key(literal.binding, literal.key));
            }
            refs.extend(references_to_key(literal.key, open));
            return refs;
        }

        function_references_in(doc, &map, offset, include_declaration)
            .or_else(|| variable_references_in(doc, &map, offset, include_declaration))
            .unwrap_or_default()
    }

    /// Re-read every bound config file.
    pub fn reload(&self) {
        self.index.reload();
    }

    pub fn clear_cache(&self) {
        self.index.clear_cache();
    }
}
