//! reportex-validate - Document schema validation
//!
//! This crate checks that an arbitrary decoded JSON value conforms to the
//! report document schema before anything is rendered, and converts a
//! conforming value into a typed [`Document`].
//!
//! # Example
//!
//! ```
//! use reportex_validate::{parse_document, validate};
//! use serde_json::json;
//!
//! let value = json!({
//!     "meta": {"title": "Quarterly review"},
//!     "blocks": [{"type": "h1", "text": "Summary"}]
//! });
//!
//! validate(&value).unwrap();
//! let doc = parse_document(&value).unwrap();
//! assert_eq!(doc.blocks.len(), 1);
//! ```

pub mod schema;

pub use schema::{parse_document, validate, validate_all, SchemaError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
