//! Table formatting for interpreted replies using tabled
//!
//! This module renders:
//! - Update counts as a two-column summary
//! - Write errors and aggregation documents as tables with dynamic columns

use bson::{Bson, Document};
use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Columns, object::Rows, width::Width},
};

use crate::error::Result;
use crate::executor::ResultData;

/// Maximum width for a single column (characters)
const DEFAULT_MAX_COLUMN_WIDTH: usize = 40;

/// Table formatter for interpreted replies
pub struct TableFormatter {
    /// Maximum column width
    max_column_width: usize,

    /// Table style
    style: TableStyle,
}

/// Available table styles
#[derive(Debug, Clone, Copy)]
pub enum TableStyle {
    /// Modern style with box-drawing characters
    Modern,
    /// ASCII style with basic characters
    Ascii,
    /// Markdown style
    Markdown,
}

impl TableFormatter {
    /// Create a new table formatter with default settings
    pub fn new() -> Self {
        Self {
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            style: TableStyle::Modern,
        }
    }

    /// Set the table style
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    /// Set maximum column width
    pub fn with_max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width;
        self
    }

    /// Format result data as tables
    ///
    /// # Arguments
    /// * `data` - Result data to format
    ///
    /// # Returns
    /// * `Result<String>` - Table string or error
    pub fn format(&self, data: &ResultData) -> Result<String> {
        match data {
            ResultData::Update {
                capability,
                acknowledged,
                matched,
                modified,
                upserted,
                write_errors,
            } => {
                let summary = self.build_table(
                    vec!["field".to_string(), "value".to_string()],
                    vec![
                        vec!["capability".to_string(), format!("{capability:?}")],
                        vec!["acknowledged".to_string(), acknowledged.to_string()],
                        vec!["matched".to_string(), matched.to_string()],
                        vec![
                            "modified".to_string(),
                            modified.map_or_else(|| "unknown".to_string(), |m| m.to_string()),
                        ],
                        vec!["upserted".to_string(), upserted.to_string()],
                    ],
                );

                if write_errors.is_empty() {
                    return Ok(summary);
                }
                Ok(format!(
                    "{}\nWrite errors:\n{}",
                    summary,
                    self.format_documents(write_errors)
                ))
            }
            ResultData::Aggregate {
                cursor_id,
                documents,
            } => {
                let body = if documents.is_empty() {
                    "(empty result set)".to_string()
                } else {
                    self.format_documents(documents)
                };
                Ok(format!("{body}\nCursor id: {cursor_id}"))
            }
            ResultData::None => Ok(String::new()),
        }
    }

    /// Format multiple documents as table
    ///
    /// # Arguments
    /// * `docs` - Documents to format
    ///
    /// # Returns
    /// * `String` - Table string
    fn format_documents(&self, docs: &[Document]) -> String {
        let fields = self.extract_field_names(docs);

        if fields.is_empty() {
            return "(no fields found)".to_string();
        }

        let rows = docs
            .iter()
            .map(|doc| {
                fields
                    .iter()
                    .map(|field| self.format_field_value(doc, field))
                    .collect()
            })
            .collect();

        self.build_table(fields, rows)
    }

    fn build_table(&self, header: Vec<String>, rows: Vec<Vec<String>>) -> String {
        let columns = header.len();
        let mut builder = Builder::default();
        builder.push_record(header);
        for row in rows {
            builder.push_record(row);
        }

        let mut table = builder.build();
        self.apply_style(&mut table);

        // Wrap long values instead of truncating them
        for i in 0..columns {
            table.with(Modify::new(Columns::new(i..=i)).with(Width::wrap(self.max_column_width)));
        }
        table.with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Extract all field names in first-seen order
    ///
    /// Write errors keep `index` first so rows read in operation order.
    fn extract_field_names(&self, docs: &[Document]) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();

        for doc in docs {
            for key in doc.keys() {
                if !fields.contains(key) {
                    fields.push(key.clone());
                }
            }
        }

        if let Some(pos) = fields.iter().position(|f| f == "index") {
            let index = fields.remove(pos);
            fields.insert(0, index);
        }

        fields
    }

    fn format_field_value(&self, doc: &Document, field: &str) -> String {
        match doc.get(field) {
            Some(value) => self.format_bson_value(value),
            None => String::from(""),
        }
    }

    /// Format a BSON value for table display
    fn format_bson_value(&self, value: &Bson) -> String {
        match value {
            Bson::ObjectId(oid) => format!("ObjectId('{}')", oid),
            Bson::Int64(n) => format!("Long('{}')", n),
            Bson::String(s) => s.clone(),
            Bson::Int32(n) => n.to_string(),
            Bson::Double(f) => {
                if f.fract() == 0.0 && f.abs() < 1e10 {
                    format!("{:.0}", f)
                } else {
                    format!("{}", f)
                }
            }
            Bson::Boolean(b) => b.to_string(),
            Bson::Null => String::from("null"),
            Bson::Array(arr) => {
                if arr.is_empty() {
                    String::from("[]")
                } else if arr.len() <= 3 {
                    let items: Vec<String> =
                        arr.iter().map(|v| self.format_bson_value(v)).collect();
                    format!("[{}]", items.join(", "))
                } else {
                    format!("[Array({})]", arr.len())
                }
            }
            Bson::Document(doc) => {
                if doc.is_empty() {
                    String::from("{}")
                } else if doc.len() <= 2 {
                    let fields: Vec<String> = doc
                        .iter()
                        .map(|(k, v)| format!("{}: {}", k, self.format_bson_value(v)))
                        .collect();
                    format!("{{{}}}", fields.join(", "))
                } else {
                    format!("{{Object({})}}", doc.len())
                }
            }
            other => other.to_string(),
        }
    }

    fn apply_style(&self, table: &mut Table) {
        match self.style {
            TableStyle::Modern => table.with(Style::modern()),
            TableStyle::Ascii => table.with(Style::ascii()),
            TableStyle::Markdown => table.with(Style::markdown()),
        };
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}
