//! Block-level content elements
//!
//! A block is one discriminated content unit of a report. The JSON form is
//! internally tagged by `type`, e.g. `{"type": "p", "text": "..."}`.

use serde::{Deserialize, Serialize};

/// Block-level content element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    /// Top-level heading
    H1 { text: String },
    /// Second-level heading
    H2 { text: String },
    /// Third-level heading
    H3 { text: String },
    /// A paragraph of plain text
    P { text: String },
    /// Unordered list
    Bullets { items: Vec<String> },
    /// Ordered list
    Numbered { items: Vec<String> },
    /// A table of string cells
    Table(Table),
    /// Hard page break
    Pagebreak {},
}

impl Block {
    /// The wire name of this block's `type` tag
    pub fn type_name(&self) -> &'static str {
        match self {
            Block::H1 { .. } => "h1",
            Block::H2 { .. } => "h2",
            Block::H3 { .. } => "h3",
            Block::P { .. } => "p",
            Block::Bullets { .. } => "bullets",
            Block::Numbered { .. } => "numbered",
            Block::Table(_) => "table",
            Block::Pagebreak {} => "pagebreak",
        }
    }

    /// All recognised `type` tags
    pub const TYPE_NAMES: [&'static str; 8] = [
        "h1",
        "h2",
        "h3",
        "p",
        "bullets",
        "numbered",
        "table",
        "pagebreak",
    ];
}

/// A table block
///
/// Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Header labels
    pub columns: Vec<String>,
    /// Body rows
    pub rows: Vec<Vec<String>>,
    /// Optional caption shown above the table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl Table {
    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_serialization() {
        let block = Block::Bullets {
            items: vec!["a".to_string(), "b".to_string()],
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "bullets", "items": ["a", "b"] })
        );
    }

    #[test]
    fn test_pagebreak_has_no_fields() {
        let json = serde_json::to_value(Block::Pagebreak {}).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "pagebreak" }));

        let back: Block = serde_json::from_value(json).unwrap();
        assert_eq!(back, Block::Pagebreak {});
    }

    #[test]
    fn test_table_caption_optional() {
        let json = serde_json::json!({
            "type": "table",
            "columns": ["Metric", "FY24"],
            "rows": [["Revenue", "1.2bn"]]
        });
        let block: Block = serde_json::from_value(json).unwrap();
        match block {
            Block::Table(table) => {
                assert_eq!(table.width(), 2);
                assert!(table.caption.is_none());
            }
            other => panic!("Expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_type_names_cover_all_variants() {
        let blocks = [
            Block::H1 { text: String::new() },
            Block::H2 { text: String::new() },
            Block::H3 { text: String::new() },
            Block::P { text: String::new() },
            Block::Bullets { items: vec![] },
            Block::Numbered { items: vec![] },
            Block::Table(Table::default()),
            Block::Pagebreak {},
        ];
        let names: Vec<_> = blocks.iter().map(Block::type_name).collect();
        assert_eq!(names, Block::TYPE_NAMES);
    }
}
