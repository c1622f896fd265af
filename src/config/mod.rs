//! Config-backed string keys.
//!
//! Some calls take a key into a YAML file as a string literal:
//! `locale("hello")` names the `hello` entry of `responses/en.lang`. A
//! [`BindingTable`] lists those calls; a [`ConfigIndex`] loads and caches the
//! key sets of the files they point at.
//!
//! The [`BuiltinTable`] of language built-ins is injected the same way.

mod binding;
mod builtin;
mod error;
mod index;

pub use binding::{BindingTable, ConfigBinding, CustomExtractor, KeyExtractor};
pub use builtin::{Builtin, BuiltinKind, BuiltinTable};
pub use error::{ConfigError, Result};
pub use index::{ConfigEntry, ConfigIndex};
