//! Block schema checks
//!
//! The validator walks a decoded `serde_json::Value` and either produces a
//! typed [`Document`] or the first [`SchemaError`] it meets. Rendering only
//! ever sees documents that came through here.

use reportex_ast::{Block, Document, Meta, Table};
use serde_json::{Map, Value};
use thiserror::Error;

/// A violation of the document schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SchemaError {
    /// Index of the offending block, if the violation is inside `blocks`
    pub block: Option<usize>,
    /// Human-readable description naming the offending key
    pub message: String,
}

impl SchemaError {
    /// A violation outside of any block (top level or `meta`)
    pub fn document(message: impl Into<String>) -> Self {
        Self {
            block: None,
            message: message.into(),
        }
    }

    /// A violation inside block `index`
    pub fn block(index: usize, message: impl AsRef<str>) -> Self {
        Self {
            block: Some(index),
            message: format!("Block {}: {}", index, message.as_ref()),
        }
    }
}

/// Check a decoded JSON value against the document schema
///
/// Returns the first violation found.
pub fn validate(value: &Value) -> Result<(), SchemaError> {
    parse_document(value).map(|_| ())
}

/// Check every block and return all violations
///
/// A malformed top level (not an object, missing `meta` or `blocks`) stops
/// the walk early since nothing below it can be inspected. Otherwise each
/// block contributes at most one error.
pub fn validate_all(value: &Value) -> Vec<SchemaError> {
    let (meta, blocks) = match split_root(value) {
        Ok(parts) => parts,
        Err(e) => return vec![e],
    };

    let mut errors = Vec::new();
    if let Err(e) = parse_meta(meta) {
        errors.push(e);
    }
    errors.extend(
        blocks
            .iter()
            .enumerate()
            .filter_map(|(i, block)| parse_block(i, block).err()),
    );
    errors
}

/// Validate and convert a decoded JSON value into a [`Document`]
pub fn parse_document(value: &Value) -> Result<Document, SchemaError> {
    let (meta, blocks) = split_root(value)?;
    let meta = parse_meta(meta)?;
    let blocks = blocks
        .iter()
        .enumerate()
        .map(|(i, block)| parse_block(i, block))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Document { meta, blocks })
}

fn split_root(value: &Value) -> Result<(&Map<String, Value>, &[Value]), SchemaError> {
    let root = value.as_object().ok_or_else(|| {
        SchemaError::document(format!(
            "Top-level JSON must be an object, got {}",
            json_type(value)
        ))
    })?;

    let meta = require(root, "meta")
        .and_then(|v| expect_object("meta", v))
        .map_err(SchemaError::document)?;
    let blocks = require(root, "blocks")
        .and_then(|v| expect_array("blocks", v))
        .map_err(SchemaError::document)?;

    Ok((meta, blocks))
}

fn parse_meta(meta: &Map<String, Value>) -> Result<Meta, SchemaError> {
    let check = || -> Result<Meta, String> {
        Ok(Meta {
            title: require_str(meta, "title")?.to_string(),
            author: optional_str(meta, "author")?.map(str::to_string),
            date: optional_str(meta, "date")?.map(str::to_string),
        })
    };
    check().map_err(|msg| SchemaError::document(format!("meta: {}", msg)))
}

fn parse_block(index: usize, value: &Value) -> Result<Block, SchemaError> {
    let obj = value.as_object().ok_or_else(|| {
        SchemaError::block(index, format!("must be an object, got {}", json_type(value)))
    })?;
    let block_type = require_str(obj, "type").map_err(|msg| SchemaError::block(index, msg))?;

    let block = match block_type {
        "h1" | "h2" | "h3" | "p" => {
            let text = require_str(obj, "text")
                .map_err(|msg| SchemaError::block(index, msg))?
                .to_string();
            match block_type {
                "h1" => Block::H1 { text },
                "h2" => Block::H2 { text },
                "h3" => Block::H3 { text },
                _ => Block::P { text },
            }
        }
        "bullets" | "numbered" => {
            let items = require(obj, "items")
                .and_then(|v| expect_array("items", v))
                .and_then(|values| string_list("items", values))
                .map_err(|msg| SchemaError::block(index, msg))?;
            if block_type == "bullets" {
                Block::Bullets { items }
            } else {
                Block::Numbered { items }
            }
        }
        "table" => Block::Table(parse_table(obj).map_err(|msg| SchemaError::block(index, msg))?),
        "pagebreak" => Block::Pagebreak {},
        other => {
            return Err(SchemaError::block(
                index,
                format!("unknown block type '{}'", other),
            ))
        }
    };

    Ok(block)
}

fn parse_table(obj: &Map<String, Value>) -> Result<Table, String> {
    let columns = require(obj, "columns")
        .and_then(|v| expect_array("columns", v))
        .and_then(|values| string_list("columns", values))?;
    if columns.is_empty() {
        return Err("'columns' must not be empty".to_string());
    }
    let row_values = require(obj, "rows").and_then(|v| expect_array("rows", v))?;

    let mut rows = Vec::with_capacity(row_values.len());
    for (r, row) in row_values.iter().enumerate() {
        let key = format!("rows[{}]", r);
        let cells = expect_array(&key, row).and_then(|values| string_list(&key, values))?;
        if cells.len() != columns.len() {
            return Err(format!(
                "{} has {} cells but the table has {} columns",
                key,
                cells.len(),
                columns.len()
            ));
        }
        rows.push(cells);
    }

    let caption = optional_str(obj, "caption")?.map(str::to_string);

    Ok(Table {
        columns,
        rows,
        caption,
    })
}

fn require<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a Value, String> {
    obj.get(key)
        .ok_or_else(|| format!("missing required key '{}'", key))
}

fn require_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a str, String> {
    require(obj, key).and_then(|v| expect_str(key, v))
}

fn optional_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<Option<&'a str>, String> {
    obj.get(key).map(|v| expect_str(key, v)).transpose()
}

fn expect_str<'a>(key: &str, value: &'a Value) -> Result<&'a str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("'{}' must be a string, got {}", key, json_type(value)))
}

fn expect_object<'a>(key: &str, value: &'a Value) -> Result<&'a Map<String, Value>, String> {
    value
        .as_object()
        .ok_or_else(|| format!("'{}' must be an object, got {}", key, json_type(value)))
}

fn expect_array<'a>(key: &str, value: &'a Value) -> Result<&'a [Value], String> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| format!("'{}' must be an array, got {}", key, json_type(value)))
}

fn string_list(key: &str, values: &[Value]) -> Result<Vec<String>, String> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_str().map(str::to_string).ok_or_else(|| {
                format!("'{}[{}]' must be a string, got {}", key, i, json_type(v))
            })
        })
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
