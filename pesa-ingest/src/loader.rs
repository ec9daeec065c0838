//! Load statement files (PDF or CSV export) into raw text for the parser.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::StatementFormat;

/// Input errors reported before any parsing happens.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Unsupported file type '{0}'. Use .pdf or .csv")]
    UnsupportedFileType(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF text extraction failed for {path}: {message}")]
    Pdf { path: PathBuf, message: String },

    #[error("CSV read failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Detect the statement format from the file extension.
pub fn detect_format(path: &Path) -> Result<StatementFormat, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    StatementFormat::from_extension(ext)
        .ok_or_else(|| LoadError::UnsupportedFileType(format!(".{}", ext.to_ascii_lowercase())))
}

/// Read a statement file and return its raw text.
///
/// Fails fast on a missing file or unsupported extension.
pub fn load_statement(path: impl AsRef<Path>) -> Result<String, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let text = match detect_format(path)? {
        StatementFormat::Pdf => load_pdf(path)?,
        StatementFormat::Csv => load_csv(path)?,
    };

    tracing::debug!(path = %path.display(), chars = text.len(), "loaded statement text");
    Ok(text)
}

fn load_pdf(path: &Path) -> Result<String, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    pdf_extract::extract_text_from_mem(&bytes).map_err(|e| LoadError::Pdf {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Flatten a CSV export: non-empty cells of a row joined by a space, one row per line.
fn load_csv(path: &Path) -> Result<String, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path)?;

    let mut lines = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record
            .iter()
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !line.is_empty() {
            lines.push(line);
        }
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file() {
        let err = load_statement("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("statement.txt");
        fs::write(&path, "U123456789 Funds received 1.00").unwrap();

        let err = load_statement(&path).unwrap_err();
        match err {
            LoadError::UnsupportedFileType(ext) => assert_eq!(ext, ".txt"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_detect_format_is_case_insensitive() {
        assert_eq!(detect_format(Path::new("a.PDF")).unwrap(), StatementFormat::Pdf);
        assert_eq!(detect_format(Path::new("a.Csv")).unwrap(), StatementFormat::Csv);
        assert!(detect_format(Path::new("noext")).is_err());
    }

    #[test]
    fn test_csv_rows_become_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("statement.csv");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "Receipt No.,Completion Time,Details,Status,Paid In,Withdrawn,Balance").unwrap();
        writeln!(f, "U123456789,2024-01-05 10:00:00,Merchant Payment to Shop,Completed,,-500.00,\"4,500.00\"").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "U987654321,2024-01-06 11:00:00,Funds received,Completed,\"1,000.00\",,\"5,500.00\"").unwrap();
        drop(f);

        let text = load_statement(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "U123456789 2024-01-05 10:00:00 Merchant Payment to Shop Completed -500.00 4,500.00"
        );
    }
}
