//! Lexical layer: the shared scanner plus identifier and line patterns.
//!
//! There is no parser. Every consumer works on raw text classified by
//! [`ScanMap`], which is cheap enough to rebuild on each request.

pub mod ident;
pub mod lines;
mod scanner;

pub use scanner::{Brace, CharClass, Quote, Region, ScanMap, Scanned, Scanner};
