//! Foundation types for the Avi tooling core.
//!
//! - [`TextRange`], [`TextSize`] - byte offsets into a document
//! - [`LineCol`], [`LineIndex`] - line/column conversion
//! - [`SymbolLocation`] - results returned to the request layer
//!
//! This module has NO dependencies on other avi modules.

mod location;
mod span;

pub use location::{SymbolLocation, file_uri};
pub use span::{LineCol, LineIndex, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
