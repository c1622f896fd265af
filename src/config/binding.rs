//! Bindings from call arguments to config files.
//!
//! A binding says: the string literal passed as argument `argument` to
//! `function` is a key of the YAML file at `path`, where the keys are found
//! by `keys`. The table is injected; [`BindingTable::avi_defaults`] is the
//! stock one.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexSet;
use serde::Deserialize;
use serde_yaml::Value;
use smol_str::SmolStr;

use super::error::{ConfigError, Result};

/// Caller-supplied key extraction.
#[derive(Clone)]
pub struct CustomExtractor(Arc<dyn Fn(&Value) -> Vec<String> + Send + Sync>);

impl CustomExtractor {
    pub fn new(f: impl Fn(&Value) -> Vec<String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for CustomExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomExtractor(..)")
    }
}

/// How a parsed config document yields its keys.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyExtractor {
    /// Keys of the root mapping.
    TopLevel,
    /// Keys of the mapping under `root[section]`.
    Section { section: SmolStr },
    /// Keys of every mapping one level below the root, in file order.
    Nested,
    #[serde(skip)]
    Custom(CustomExtractor),
}

impl KeyExtractor {
    pub fn section(name: impl Into<SmolStr>) -> Self {
        KeyExtractor::Section {
            section: name.into(),
        }
    }

    pub fn custom(f: impl Fn(&Value) -> Vec<String> + Send + Sync + 'static) -> Self {
        KeyExtractor::Custom(CustomExtractor::new(f))
    }

    /// Keys of `doc`, in file order, without repeats.
    ///
    /// Anything that is not the expected mapping yields no keys.
    pub fn extract(&self, doc: &Value) -> IndexSet<SmolStr> {
        match self {
            KeyExtractor::TopLevel => mapping_keys(doc).collect(),
            KeyExtractor::Section { section } => doc
                .get(section.as_str())
                .map(|inner| mapping_keys(inner).collect())
                .unwrap_or_default(),
            KeyExtractor::Nested => doc
                .as_mapping()
                .into_iter()
                .flat_map(|map| map.values())
                .flat_map(mapping_keys)
                .collect(),
            KeyExtractor::Custom(CustomExtractor(f)) => f(doc).into_iter().map(SmolStr::from).collect(),
        }
    }
}

fn mapping_keys(value: &Value) -> impl Iterator<Item = SmolStr> + '_ {
    value
        .as_mapping()
        .into_iter()
        .flat_map(|map| map.keys())
        .filter_map(scalar_key)
}

/// String form of a scalar mapping key; `None` for nested structures.
fn scalar_key(key: &Value) -> Option<SmolStr> {
    match key {
        Value::String(s) => Some(SmolStr::new(s)),
        Value::Number(n) => Some(SmolStr::new(n.to_string())),
        Value::Bool(b) => Some(SmolStr::new(if *b { "true" } else { "false" })),
        _ => None,
    }
}

/// One `function(argument)` → config file binding.
#[derive(Clone, Debug, Deserialize)]
pub struct ConfigBinding {
    pub function: SmolStr,
    /// 0-based argument slot holding the key.
    #[serde(default)]
    pub argument: usize,
    /// Relative to the project root.
    pub path: PathBuf,
    pub keys: KeyExtractor,
}

impl ConfigBinding {
    pub fn new(
        function: impl Into<SmolStr>,
        argument: usize,
        path: impl Into<PathBuf>,
        keys: KeyExtractor,
    ) -> Self {
        Self {
            function: function.into(),
            argument,
            path: path.into(),
            keys,
        }
    }
}

/// The set of bindings an index resolves against.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BindingTable {
    bindings: Vec<ConfigBinding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, binding: ConfigBinding) -> Self {
        self.push(binding);
        self
    }

    pub fn push(&mut self, binding: ConfigBinding) {
        self.bindings.push(binding);
    }

    /// Parse a table of the form `bindings: [{function, argument, path, keys}]`.
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

    /// Translation, constant and setting lookups of a stock Avi project.
    pub fn avi_defaults() -> Self {
        let lang = || KeyExtractor::section("lang");
        let constants = || KeyExtractor::section("constants");
        let settings = || KeyExtractor::section("settings");

        Self::new()
            .with(ConfigBinding::new("locale", 0, "responses/en.lang", lang()))
            .with(ConfigBinding::new("get_constant", 0, "config/const.config", constants()))
            .with(ConfigBinding::new("has_constant", 0, "config/const.config", constants()))
            .with(ConfigBinding::new("get_setting", 0, "config/settings.config", settings()))
            .with(ConfigBinding::new("has_setting", 0, "config/settings.config", settings()))
            .with(ConfigBinding::new("get_setting_full", 0, "config/settings.config", settings()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigBinding> + '_ {
        self.bindings.iter()
    }

    /// First binding for `function`; names compare case sensitively.
    pub fn first_for(&self, function: &str) -> Option<&ConfigBinding> {
        self.bindings.iter().find(|b| b.function == function)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    fn keys(extractor: &KeyExtractor, doc: &str) -> Vec<String> {
        extractor.extract(&yaml(doc)).into_iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_section_keys_in_file_order() {
        let doc = "lang:\n  zebra: Z\n  apple: A\nother:\n  x: 1\n";
        assert_eq!(keys(&KeyExtractor::section("lang"), doc), vec!["zebra", "apple"]);
        assert!(keys(&KeyExtractor::section("missing"), doc).is_empty());
    }

    #[test]
    fn test_top_level_keys() {
        let doc = "a: 1\nb:\n  c: 2\n";
        assert_eq!(keys(&KeyExtractor::TopLevel, doc), vec!["a", "b"]);
    }

    #[test]
    fn test_nested_keys_deduplicate_across_categories() {
        let doc = "colors:\n  red: 1\n  blue: 2\nmoods:\n  blue: sad\n  calm: ok\n";
        assert_eq!(keys(&KeyExtractor::Nested, doc), vec!["red", "blue", "calm"]);
    }

    #[test]
    fn test_scalar_keys_are_stringified() {
        let doc = "lang:\n  404: Not found\n  true: yes\n";
        assert_eq!(keys(&KeyExtractor::section("lang"), doc), vec!["404", "true"]);
    }

    #[test]
    fn test_non_mapping_yields_nothing() {
        assert!(keys(&KeyExtractor::TopLevel, "- a\n- b\n").is_empty());
        assert!(keys(&KeyExtractor::section("lang"), "lang: plain\n").is_empty());
    }

    #[test]
    fn test_custom_extractor() {
        let extractor = KeyExtractor::custom(|doc| {
            doc.as_sequence()
                .into_iter()
                .flatten()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        });
        assert_eq!(keys(&extractor, "- one\n- two\n- one\n"), vec!["one", "two"]);
    }

    #[test]
    fn test_table_from_yaml() {
        let table = BindingTable::from_yaml_str(
            "bindings:\n\
             \x20 - function: locale\n\
             \x20   path: responses/en.lang\n\
             \x20   keys: { kind: section, section: lang }\n\
             \x20 - function: t\n\
             \x20   argument: 1\n\
             \x20   path: strings.config\n\
             \x20   keys: { kind: top_level }\n",
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        let t = table.first_for("t").unwrap();
        assert_eq!(t.argument, 1);
        assert!(matches!(t.keys, KeyExtractor::TopLevel));
        assert_eq!(table.first_for("locale").unwrap().argument, 0);
        assert!(table.first_for("Locale").is_none());
    }

    #[test]
    fn test_invalid_table_is_an_error() {
        let err = BindingTable::from_yaml_str("bindings:\n  - function: x\n    keys: { kind: bogus }\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Table(_)));
    }

    #[test]
    fn test_load_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let err = BindingTable::load(&dir.path().join("bindings.yaml")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_defaults() {
        let table = BindingTable::avi_defaults();
        assert_eq!(table.len(), 6);
        let locale = table.first_for("locale").unwrap();
        assert_eq!(locale.path, Path::new("responses/en.lang"));
        assert!(matches!(&locale.keys, KeyExtractor::Section { section } if section == "lang"));
    }
}
