//! # avi-base
//!
//! Editor tooling core for the Avi scripting language: folding, completion,
//! hover, go-to-declaration and find-references over source text that is
//! usually mid-edit and often malformed.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide     → IDE features (completion, folding, goto, hover, references)
//!   ↓
//! hir     → Documents, function scopes, call-argument positions
//! config  → Bindings from call arguments to YAML keys, builtin table
//!   ↓
//! syntax  → Character-class scanner, identifiers, line patterns
//!   ↓
//! base    → Primitives (LineIndex, LineCol, SymbolLocation)
//! ```
//!
//! There is no parser. Every feature reads the text through one shared
//! scanner, so braces, commas and quotes inside literals and comments are
//! never structural for any of them.

/// Foundation types: offsets, line index, result locations
pub mod base;

/// Config-file bindings with their key index, and the builtin table
pub mod config;

/// Per-document semantic views: scopes and call arguments
pub mod hir;

/// IDE features: completion, folding, hover, goto-declaration, find-references
pub mod ide;

/// Lexical layer: scanner, identifiers, line patterns
pub mod syntax;

// Re-export foundation types
pub use base::{LineCol, LineIndex, SymbolLocation, TextRange, TextSize};
pub use config::{
    BindingTable, BuiltinTable, ConfigBinding, ConfigError, ConfigIndex, KeyExtractor,
};
pub use hir::{Document, DocumentSet};
pub use ide::Analysis;
