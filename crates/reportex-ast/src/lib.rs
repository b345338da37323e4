//! reportex-ast - Document definitions
//!
//! This crate provides the in-memory representation of a report document:
//! title metadata plus an ordered list of content blocks. The JSON form of
//! these types is the intermediate representation produced by the analysis
//! step and consumed by the LaTeX renderer.

pub mod block;
pub mod document;

pub use block::{Block, Table};
pub use document::{Document, Meta};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
