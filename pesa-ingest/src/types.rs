use serde::{Deserialize, Serialize};

/// Source file formats the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementFormat {
    Pdf,
    Csv,
}

impl StatementFormat {
    /// Resolve from a file extension (without the dot), case-insensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(StatementFormat::Pdf),
            "csv" => Some(StatementFormat::Csv),
            _ => None,
        }
    }
}

/// Text attributed to one transaction: the code token and everything up to
/// the next code. Borrows from the statement text; lives only until extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSpan<'a> {
    pub code: &'a str,
    pub body: &'a str,
}
