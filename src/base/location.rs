//! Result locations handed back to the request layer.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use url::Url;

/// A single-line span inside some document, addressed by URI.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SymbolLocation {
    pub uri: Arc<str>,
    /// 0-indexed line
    pub line: u32,
    /// First byte column of the symbol
    pub col_start: u32,
    /// Byte column one past the symbol
    pub col_end: u32,
}

impl SymbolLocation {
    pub fn new(uri: impl Into<Arc<str>>, line: u32, col_start: u32, col_end: u32) -> Self {
        Self {
            uri: uri.into(),
            line,
            col_start,
            col_end,
        }
    }
}

impl fmt::Debug for SymbolLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}:{}-{}",
            self.uri,
            self.line + 1,
            self.col_start + 1,
            self.col_end + 1
        )
    }
}

/// `file://` URI for an absolute path on disk, percent-encoded the way
/// editors send them.
///
/// A relative path cannot be a file URL; it is appended to `file:///` as is.
pub fn file_uri(path: &Path) -> Arc<str> {
    match Url::from_file_path(path) {
        Ok(url) => url.as_str().into(),
        Err(()) => format!("file:///{}", path.to_string_lossy().replace('\\', "/")).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn test_file_uri_unix_path() {
        assert_eq!(
            &*file_uri(Path::new("/skill/responses/en.lang")),
            "file:///skill/responses/en.lang"
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_file_uri_encodes_reserved_characters() {
        assert_eq!(
            &*file_uri(Path::new("/my skills/50%/en.lang")),
            "file:///my%20skills/50%25/en.lang"
        );
    }

    #[test]
    fn test_debug_is_one_indexed() {
        let loc = SymbolLocation::new("file:///a.avi", 0, 4, 9);
        assert_eq!(format!("{loc:?}"), "file:///a.avi@1:5-10");
    }
}
