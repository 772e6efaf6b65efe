//! Schema file loading.
//!
//! A schema file is JSON in one of two shapes: a bare `{"columns": [...]}`
//! object, or CSVW table metadata carrying the columns under `tableSchema`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use csvw_model::Column;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct TableSchema {
    columns: Vec<Column>,
}

/// Parse schema JSON into columns.
pub fn parse_schema(json: &str) -> Result<Vec<Column>> {
    let mut document: serde_json::Value =
        serde_json::from_str(json).context("schema is not valid JSON")?;
    let schema = if document.get("tableSchema").is_some() {
        document["tableSchema"].take()
    } else {
        document
    };
    let schema: TableSchema = serde_json::from_value(schema).context("invalid table schema")?;
    Ok(schema.columns)
}

/// Read and parse a schema file.
pub fn load_schema(path: &Path) -> Result<Vec<Column>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("read schema {}", path.display()))?;
    let columns = parse_schema(&json).with_context(|| format!("parse schema {}", path.display()))?;
    debug!(path = %path.display(), columns = columns.len(), "loaded schema");
    Ok(columns)
}
