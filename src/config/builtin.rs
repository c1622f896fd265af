//! Built-in symbols of the language: keywords, types, literals and library
//! functions, with their signatures and documentation.
//!
//! The table is injected by the host, which owns the actual list; this
//! crate only turns it into completions and hovers.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use smol_str::SmolStr;

use super::error::{ConfigError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinKind {
    Keyword,
    Type,
    Value,
    Function,
}

/// One built-in symbol.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Builtin {
    /// Name, optionally followed by `__a_b` mandatory arguments.
    pub label: SmolStr,
    pub kind: BuiltinKind,
    /// Signature, such as `(message: str) -> f64`.
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub documentation: Option<String>,
    /// Snippet inserted instead of the label, with `${n:..}` tab stops.
    #[serde(default)]
    pub snippet: Option<String>,
}

impl Builtin {
    pub fn new(label: impl Into<SmolStr>, kind: BuiltinKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            documentation: None,
            snippet: None,
        }
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}

/// Built-in symbols in the order completions list them.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BuiltinTable {
    builtins: Vec<Builtin>,
}

impl BuiltinTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, builtin: Builtin) -> Self {
        self.push(builtin);
        self
    }

    pub fn push(&mut self, builtin: Builtin) {
        self.builtins.push(builtin);
    }

    /// Parse a table of the form `builtins: [{label, kind, detail, documentation, snippet}]`.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Builtin> + '_ {
        self.builtins.iter()
    }

    pub fn len(&self) -> usize {
        self.builtins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builtins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_from_yaml() {
        let table = BuiltinTable::from_yaml_str(
            "builtins:\n\
             \x20 - label: if\n\
             \x20   kind: keyword\n\
             \x20   snippet: \"if (${1:condition}) {\\n\\t$0\\n}\"\n\
             \x20 - label: read_number\n\
             \x20   kind: function\n\
             \x20   detail: \"(message: str) -> f64\"\n\
             \x20   documentation: Reads a number from stdin\n",
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        let builtins: Vec<_> = table.iter().collect();
        assert_eq!(builtins[0].kind, BuiltinKind::Keyword);
        assert_eq!(builtins[0].snippet.as_deref(), Some("if (${1:condition}) {\n\t$0\n}"));
        assert_eq!(
            *builtins[1],
            Builtin::new("read_number", BuiltinKind::Function)
                .detail("(message: str) -> f64")
                .documentation("Reads a number from stdin")
        );
    }

    #[test]
    fn test_unknown_kind_is_an_error() {
        let err = BuiltinTable::from_yaml_str("builtins:\n  - label: x\n    kind: macro\n").unwrap_err();
        assert!(matches!(err, ConfigError::Table(_)));
    }

    #[test]
    fn test_load_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let err = BuiltinTable::load(&dir.path().join("builtins.yaml")).unwrap_err();
        assert!(err.is_not_found());
    }
}
