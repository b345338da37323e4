//! Document root and metadata definitions

use serde::{Deserialize, Serialize};

use crate::block::Block;

/// A complete report document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Title block metadata
    pub meta: Meta,
    /// Content blocks in document order
    pub blocks: Vec<Block>,
}

/// Document metadata rendered into the title block
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Document title (required)
    pub title: String,
    /// Author line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Free-form date line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Document {
    /// Create an empty document with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            meta: Meta {
                title: title.into(),
                ..Meta::default()
            },
            blocks: Vec::new(),
        }
    }

    /// Append a block
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Builder-style variant of [`Document::push`]
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Number of blocks in the document
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the document has no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document() {
        let doc = Document::new("Q3 Review");
        assert_eq!(doc.meta.title, "Q3 Review");
        assert!(doc.meta.author.is_none());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_push_preserves_order() {
        let doc = Document::new("T")
            .with_block(Block::H1 {
                text: "First".to_string(),
            })
            .with_block(Block::Pagebreak {})
            .with_block(Block::P {
                text: "Last".to_string(),
            });

        assert_eq!(doc.len(), 3);
        assert_eq!(doc.blocks[1], Block::Pagebreak {});
        assert_eq!(doc.blocks[2].type_name(), "p");
    }

    #[test]
    fn test_meta_optional_fields_omitted() {
        let doc = Document::new("Only title");
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["meta"], serde_json::json!({ "title": "Only title" }));
    }

    #[test]
    fn test_deserialize_full_document() {
        let json = r#"{
            "meta": {"title": "T", "author": "Analyst", "date": "2025-01-31"},
            "blocks": [{"type": "h2", "text": "Overview"}]
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.meta.author.as_deref(), Some("Analyst"));
        assert_eq!(doc.meta.date.as_deref(), Some("2025-01-31"));
        assert_eq!(
            doc.blocks,
            vec![Block::H2 {
                text: "Overview".to_string()
            }]
        );
    }
}
