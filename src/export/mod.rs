//! Export pipeline: CSV downloads and printable HTML reports.
//!
//! Both outputs describe the habit payload through [`detail::describe`], so a
//! row reads the same in the spreadsheet and on paper.

pub mod csv;
pub mod detail;
pub mod printable;

pub use self::csv::{export_csv, CsvDocument};
pub use self::detail::describe;
pub use self::printable::{export_printable, render_printable, PrintSurface, SurfaceBlocked};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Popup blocked: allow new windows for this site and try again")]
    Blocked,

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("CSV buffer error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output was not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<SurfaceBlocked> for ExportError {
    fn from(_: SurfaceBlocked) -> Self {
        ExportError::Blocked
    }
}

/// Localized yes/no token used for validation flags.
pub(crate) fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Ya"
    } else {
        "Tidak"
    }
}

/// Restrict a filename stem to characters safe inside a
/// `Content-Disposition` header. Falls back to `jurnal` when nothing is left.
pub fn sanitize_stem(stem: &str) -> String {
    let cleaned: String = stem
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('_').is_empty() {
        "jurnal".to_string()
    } else {
        cleaned
    }
}
