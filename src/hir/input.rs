//! Document snapshots handed in by the editor layer.

use indexmap::IndexMap;
use std::path::Path;
use std::sync::Arc;

use crate::base::{LineCol, LineIndex, SymbolLocation, TextRange, TextSize};

/// File extensions of structured-data documents (translations, settings,
/// constants) as opposed to script sources.
pub const CONFIG_EXTENSIONS: &[&str] = &["config", "lang"];

/// Whether a URI or path names a config document.
pub fn is_config_uri(uri: &str) -> bool {
    Path::new(uri)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CONFIG_EXTENSIONS.contains(&ext))
}

/// An immutable text snapshot with its URI.
#[derive(Clone, Debug)]
pub struct Document {
    uri: Arc<str>,
    text: Arc<str>,
    line_index: LineIndex,
}

impl Document {
    pub fn new(uri: impl Into<Arc<str>>, text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        Self {
            uri: uri.into(),
            line_index: LineIndex::new(&text),
            text,
        }
    }

    pub fn uri(&self) -> &Arc<str> {
        &self.uri
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn is_config(&self) -> bool {
        is_config_uri(&self.uri)
    }

    /// Byte offset of an editor position, clamped onto a char boundary.
    pub fn offset(&self, pos: LineCol) -> TextSize {
        self.line_index.offset_in(&self.text, pos)
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        self.line_index.line_col(offset)
    }

    /// Content of one line, without `\n` or a trailing `\r`.
    pub fn line(&self, line: u32) -> Option<&str> {
        let range = self.line_index.line_range(line)?;
        let text = &self.text[range];
        Some(text.strip_suffix('\r').unwrap_or(text))
    }

    /// `(line number, start offset, content)` for every line.
    pub fn lines(&self) -> impl Iterator<Item = (u32, TextSize, &str)> + '_ {
        (0..self.line_index.len() as u32).filter_map(move |line| {
            let start = self.line_index.line_range(line)?.start();
            Some((line, start, self.line(line)?))
        })
    }

    /// Location of a range that starts on a single line.
    pub fn location(&self, range: TextRange) -> SymbolLocation {
        let start = self.line_col(range.start());
        SymbolLocation::new(
            self.uri.clone(),
            start.line,
            start.col,
            start.col + u32::from(range.len()),
        )
    }
}

/// The documents currently open in the editor, in the order they were opened.
#[derive(Clone, Debug, Default)]
pub struct DocumentSet {
    documents: IndexMap<Arc<str>, Document>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document, keyed by its URI.
    pub fn insert(&mut self, document: Document) -> Option<Document> {
        self.documents.insert(document.uri().clone(), document)
    }

    pub fn remove(&mut self, uri: &str) -> Option<Document> {
        self.documents.shift_remove(uri)
    }

    pub fn get(&self, uri: &str) -> Option<&Document> {
        self.documents.get(uri)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.documents.contains_key(uri)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> + '_ {
        self.documents.values()
    }

    /// Script documents only; config documents are skipped.
    pub fn sources(&self) -> impl Iterator<Item = &Document> + '_ {
        self.iter().filter(|doc| !doc.is_config())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FromIterator<Document> for DocumentSet {
    fn from_iter<T: IntoIterator<Item = Document>>(iter: T) -> Self {
        let mut set = Self::new();
        for doc in iter {
            set.insert(doc);
        }
        set
    }
}
