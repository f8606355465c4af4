//! Report exports: a CSV sheet and a paginated PDF table.

mod csv_sheet;
mod pdf;

pub use csv_sheet::{render_csv, CSV_HEADERS};
pub use pdf::{render_pdf, PdfLayout, PdfPage, PdfRule, TextLine, PDF_TABLE_HEADERS};

use std::fmt;

/// Output format for a report download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }

    pub fn mime(self) -> mime::Mime {
        match self {
            Self::Csv => mime::TEXT_CSV,
            Self::Pdf => mime::APPLICATION_PDF,
        }
    }
}

/// `<title>_report.<ext>`, with characters that would break a `Content-Disposition`
/// header replaced.
pub fn download_filename(title: &str, format: ExportFormat) -> String {
    let safe: String = title
        .chars()
        .map(|ch| match ch {
            '"' | '\\' | '/' => '_',
            ch if ch.is_control() => '_',
            ch => ch,
        })
        .collect();
    format!("{safe}_report.{}", format.extension())
}

/// Rendered download ready to be streamed back to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(::csv::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(err) => write!(f, "failed to write export buffer: {}", err),
            ExportError::Csv(err) => write!(f, "failed to encode CSV export: {}", err),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(err) => Some(err),
            ExportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<::csv::Error> for ExportError {
    fn from(err: ::csv::Error) -> Self {
        Self::Csv(err)
    }
}
