//! IDE features: high-level APIs for editor requests.
//!
//! This module sits between the per-document views in [`hir`](crate::hir),
//! the config index in [`config`](crate::config), and whatever speaks the
//! editor protocol. Each function answers one request.
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: Take a document snapshot in, return data out
//! 2. **No protocol types**: Uses our own types, converted at the boundary
//! 3. **Never fail**: Malformed input yields partial or empty results
//!
//! ## Usage
//!
//! The recommended way to use this module is through [`Analysis`]:
//!
//! ```ignore
//! use avi::config::{BindingTable, BuiltinTable, ConfigIndex};
//! use avi::hir::Document;
//! use avi::ide::Analysis;
//!
//! let index = ConfigIndex::new(root, BindingTable::avi_defaults());
//! let analysis = Analysis::new(index, BuiltinTable::load(&builtins_path)?);
//! let doc = Document::new("file:///skill/main.avi", text);
//! let target = analysis.goto_declaration(&doc, LineCol::new(3, 12));
//! ```

mod analysis;
mod completion;
mod folding;
mod goto;
mod hover;
mod references;

pub use analysis::Analysis;
pub use completion::{
    CompletionItem, CompletionKind, builtin_completions, completions, config_completions,
    file_completions, make_snippet, scope_completions, signature_params, split_mandatory_args,
};
pub use folding::{FoldKind, FoldRange, folding_ranges};
pub use goto::{
    BoundLiteral, bound_literal_at, declaration_of_literal_key, declaration_of_literal_key_in,
    function_declaration, function_declaration_in, variable_declaration, variable_declaration_in,
};
pub use hover::{HoverResult, hover, hover_in};
pub use references::{
    config_key_references, function_references, function_references_in, literal_key_references,
    references_to_key, variable_references, variable_references_in,
};
