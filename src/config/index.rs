//! Lazily loaded, explicitly refreshed key sets of bound config files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

use super::binding::{BindingTable, ConfigBinding, KeyExtractor};
use super::error::{ConfigError, Result};
use crate::base::{SymbolLocation, file_uri};
use crate::syntax::lines::declares_key;

/// A loaded config file: its text and the keys its binding extracted.
#[derive(Clone, Debug, Default)]
pub struct ConfigEntry {
    raw_text: Arc<str>,
    keys: IndexSet<SmolStr>,
}

impl ConfigEntry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse `text` as YAML and extract its keys.
    pub fn parse(path: &Path, text: &str, extractor: &KeyExtractor) -> Result<Self> {
        let doc: serde_yaml::Value = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            raw_text: Arc::from(text),
            keys: extractor.extract(&doc),
        })
    }

    fn read(path: &Path, extractor: &KeyExtractor) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text, extractor)
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn keys(&self) -> &IndexSet<SmolStr> {
        &self.keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// `(line, column)` of the first line declaring `key`.
    ///
    /// This is a textual match: a key repeated in several sections resolves
    /// to its first appearance in the file.
    pub fn key_position(&self, key: &str) -> Option<(u32, u32)> {
        self.raw_text.lines().enumerate().find_map(|(line, text)| {
            let text = text.strip_suffix('\r').unwrap_or(text);
            declares_key(text, key).map(|col| (line as u32, col as u32))
        })
    }
}

#[derive(Debug, Default)]
struct CacheState {
    /// Bumped by every reload and clear.
    generation: u64,
    entries: FxHashMap<PathBuf, Arc<ConfigEntry>>,
}

/// Key sets of every bound config file of one project.
///
/// Entries are loaded on first use and then kept until [`reload`] or
/// [`clear_cache`]; edits on disk are not noticed on their own. A file that
/// is missing or does not parse is cached with no keys.
///
/// Entries are keyed by absolute path. When several bindings name one file,
/// the binding that loads it decides which keys it has.
///
/// [`reload`]: ConfigIndex::reload
/// [`clear_cache`]: ConfigIndex::clear_cache
#[derive(Debug)]
pub struct ConfigIndex {
    root: PathBuf,
    bindings: BindingTable,
    cache: RwLock<CacheState>,
    /// Held by `reload` and `clear_cache` from first read to swap.
    refresh: Mutex<()>,
}

impl ConfigIndex {
    pub fn new(root: impl Into<PathBuf>, bindings: BindingTable) -> Self {
        Self {
            root: root.into(),
            bindings,
            cache: RwLock::new(CacheState::default()),
            refresh: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn config_path(&self, binding: &ConfigBinding) -> PathBuf {
        self.root.join(&binding.path)
    }

    /// The entry for `binding`'s file, loading it if needed.
    pub fn entry(&self, binding: &ConfigBinding) -> Arc<ConfigEntry> {
        let path = self.config_path(binding);

        // Fast path: already cached (read lock)
        let generation = {
            let cache = self.cache.read();
            if let Some(entry) = cache.entries.get(&path) {
                return entry.clone();
            }
            cache.generation
        };

        let entry = Arc::new(load_entry(&path, &binding.keys));

        let mut cache = self.cache.write();
        if cache.generation != generation {
            // A reload or clear ran while we were reading; its view wins.
            trace!(path = %path.display(), "discarding load that raced a reload");
            return cache.entries.get(&path).cloned().unwrap_or(entry);
        }
        cache.entries.entry(path).or_insert(entry).clone()
    }

    /// Keys usable as `function`'s bound argument, in file order.
    ///
    /// Empty for a function without a binding.
    pub fn keys(&self, function: &str) -> Vec<SmolStr> {
        self.bindings
            .first_for(function)
            .map(|binding| self.entry(binding).keys().iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn contains_key(&self, function: &str, key: &str) -> bool {
        self.bindings
            .first_for(function)
            .is_some_and(|binding| self.entry(binding).contains(key))
    }

    /// Where `key` is declared in `binding`'s file, if it is one of its keys.
    pub fn declaration_of_key(&self, binding: &ConfigBinding, key: &str) -> Option<SymbolLocation> {
        let entry = self.entry(binding);
        if !entry.contains(key) {
            return None;
        }
        let (line, col) = entry.key_position(key)?;
        let uri = file_uri(&self.config_path(binding));
        Some(SymbolLocation::new(uri, line, col, col + key.len() as u32))
    }

    /// First binding whose file has the URI `uri`.
    pub fn binding_for_uri(&self, uri: &str) -> Option<&ConfigBinding> {
        self.bindings
            .iter()
            .find(|b| &*file_uri(&self.config_path(b)) == uri)
    }

    /// Re-read every bound file and swap the results in at once.
    ///
    /// Files are read before the write lock is taken, so concurrent readers
    /// keep seeing the previous entries until the swap. Reloads run one at a
    /// time: a reload that returns has read the files after every reload
    /// that returned before it.
    pub fn reload(&self) {
        let _refresh = self.refresh.lock();

        let mut entries: FxHashMap<PathBuf, Arc<ConfigEntry>> = FxHashMap::default();
        for binding in self.bindings.iter() {
            let path = self.config_path(binding);
            if !entries.contains_key(&path) {
                let entry = load_entry(&path, &binding.keys);
                entries.insert(path, Arc::new(entry));
            }
        }

        let mut cache = self.cache.write();
        cache.generation += 1;
        cache.entries = entries;
        debug!(
            generation = cache.generation,
            files = cache.entries.len(),
            "config cache reloaded"
        );
    }

    /// Drop every entry; files load again on next use.
    pub fn clear_cache(&self) {
        let _refresh = self.refresh.lock();
        let mut cache = self.cache.write();
        cache.generation += 1;
        cache.entries.clear();
        debug!(generation = cache.generation, "config cache cleared");
    }

    /// Number of files currently cached.
    pub fn cached_len(&self) -> usize {
        self.cache.read().entries.len()
    }
}

fn load_entry(path: &Path, extractor: &KeyExtractor) -> ConfigEntry {
    match ConfigEntry::read(path, extractor) {
        Ok(entry) => {
            debug!(path = %path.display(), keys = entry.keys().len(), "loaded config file");
            entry
        }
        Err(err) if err.is_not_found() => {
            debug!(path = %path.display(), "config file not found");
            ConfigEntry::empty()
        }
        Err(err) => {
            warn!(error = %err, "config file unusable, treating as empty");
            ConfigEntry::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (path, text) in files {
            let path = dir.path().join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, text).unwrap();
        }
        dir
    }

    #[test]
    fn test_keys_load_lazily() {
        let dir = project(&[("responses/en.lang", "lang:\n  hello: Hi\n  bye: Bye\n")]);
        let index = ConfigIndex::new(dir.path(), BindingTable::avi_defaults());

        assert_eq!(index.cached_len(), 0);
        assert_eq!(index.keys("locale"), vec!["hello", "bye"]);
        assert_eq!(index.cached_len(), 1);
        assert!(index.keys("unbound").is_empty());
    }

    #[test]
    fn test_missing_and_malformed_files_are_empty() {
        let dir = project(&[("config/const.config", "constants: [unclosed\n")]);
        let index = ConfigIndex::new(dir.path(), BindingTable::avi_defaults());

        assert!(index.keys("locale").is_empty());
        assert!(index.keys("get_constant").is_empty());
        assert_eq!(index.cached_len(), 2);
    }

    #[test]
    fn test_shared_file_is_cached_once() {
        let dir = project(&[("config/settings.config", "settings:\n  volume: 3\n")]);
        let index = ConfigIndex::new(dir.path(), BindingTable::avi_defaults());

        assert!(index.contains_key("get_setting", "volume"));
        assert!(index.contains_key("has_setting", "volume"));
        assert_eq!(index.cached_len(), 1);
    }

    #[test]
    fn test_reload_and_clear() {
        let dir = project(&[("responses/en.lang", "lang:\n  a: A\n")]);
        let index = ConfigIndex::new(dir.path(), BindingTable::avi_defaults());
        assert_eq!(index.keys("locale"), vec!["a"]);

        fs::write(dir.path().join("responses/en.lang"), "lang:\n  b: B\n").unwrap();
        assert_eq!(index.keys("locale"), vec!["a"]);

        index.reload();
        assert_eq!(index.keys("locale"), vec!["b"]);

        fs::write(dir.path().join("responses/en.lang"), "lang:\n  c: C\n").unwrap();
        index.clear_cache();
        assert_eq!(index.cached_len(), 0);
        assert_eq!(index.keys("locale"), vec!["c"]);
    }

    #[test]
    fn test_overlapping_reloads_keep_latest_files() {
        let dir = project(&[("responses/en.lang", "lang:\n  v0: x\n")]);
        let index = ConfigIndex::new(dir.path(), BindingTable::avi_defaults());
        let lang = dir.path().join("responses/en.lang");

        for i in 1..40 {
            std::thread::scope(|s| {
                s.spawn(|| index.reload());
                fs::write(&lang, format!("lang:\n  v{i}: x\n")).unwrap();
                index.reload();
            });
            assert_eq!(index.keys("locale"), vec![SmolStr::new(format!("v{i}"))]);
        }
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let dir = project(&[("responses/en.lang", "lang:\n  hello: Hi\n")]);
        let index = ConfigIndex::new(dir.path(), BindingTable::avi_defaults());
        let locale = index.bindings().first_for("locale").unwrap();

        assert!(index.contains_key("locale", "hello"));
        assert!(!index.contains_key("locale", "Hello"));
        assert!(index.declaration_of_key(locale, "Hello").is_none());
    }

    #[test]
    fn test_declaration_of_key() {
        let dir = project(&[("responses/en.lang", "lang:\n  hello: Hi\n  hello_there: Yo\n")]);
        let index = ConfigIndex::new(dir.path(), BindingTable::avi_defaults());
        let locale = index.bindings().first_for("locale").unwrap();

        let loc = index.declaration_of_key(locale, "hello").unwrap();
        assert_eq!((loc.line, loc.col_start, loc.col_end), (1, 2, 7));
        assert!(loc.uri.ends_with("responses/en.lang"));

        assert!(index.declaration_of_key(locale, "lang").is_none());
        assert!(index.declaration_of_key(locale, "absent").is_none());
    }

    #[test]
    fn test_binding_for_uri() {
        let dir = project(&[]);
        let index = ConfigIndex::new(dir.path(), BindingTable::avi_defaults());
        let uri = file_uri(&dir.path().join("config/settings.config"));

        assert_eq!(index.binding_for_uri(&uri).unwrap().function, "get_setting");
        assert!(index.binding_for_uri("file:///elsewhere.config").is_none());
    }

    #[test]
    fn test_binding_for_uri_with_space_in_root() {
        let dir = project(&[]);
        let root = dir.path().join("my skills");
        let index = ConfigIndex::new(root.clone(), BindingTable::avi_defaults());
        let editor_uri = format!("{}/responses/en.lang", file_uri(&root));

        assert!(editor_uri.contains("my%20skills"));
        assert_eq!(index.binding_for_uri(&editor_uri).unwrap().function, "locale");
    }

    #[test]
    fn test_key_position_skips_partial_names() {
        let entry = ConfigEntry::parse(
            Path::new("x.lang"),
            "lang:\r\n  hello_world: a\r\n  hello: b\r\n",
            &KeyExtractor::section("lang"),
        )
        .unwrap();

        assert_eq!(entry.key_position("hello"), Some((2, 2)));
    }
}
