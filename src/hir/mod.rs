//! HIR: the per-request semantic view of a document.
//!
//! Nothing here is persisted. Each query takes a [`Document`] snapshot,
//! scans it once and derives what it needs:
//!
//! - [`scopes`]: function bodies, parameters and locals
//! - [`call_args`]: which argument of which call a cursor is in
//!
//! The open documents themselves live in a [`DocumentSet`].

mod input;

pub mod call_args;
pub mod scopes;

pub use call_args::{
    ArgumentPosition, ArgumentWalk, resolve_argument_position, resolve_argument_position_in,
    split_top_level, walk_arguments,
};
pub use input::{CONFIG_EXTENSIONS, Document, DocumentSet, is_config_uri};
pub use scopes::{
    FunctionSignature, Scope, declared_variables, enclosing_scopes, extract_scopes,
    find_scope_at_offset, function_signatures, innermost_scope_at_offset, scopes_in,
};
