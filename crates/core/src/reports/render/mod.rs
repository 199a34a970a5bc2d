//! Rendering of report sections into downloadable artifacts.
//!
//! Two artifacts are supported: a paginated PDF document and an XLSX
//! workbook. Both are built fully in memory.

pub mod document;
pub mod spreadsheet;

use std::fmt;
use std::str::FromStr;

use super::aggregate::AggregateResult;
use super::error::ReportError;
use super::kind::KindSelector;
use super::source::DateRange;
use super::types::{ReportArtifact, ReportSection};

/// Output artifact format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    /// Paginated tabular document (PDF).
    Document,
    /// Workbook with one sheet per section (XLSX).
    Spreadsheet,
}

impl ReportFormat {
    /// MIME type of the artifact.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Document => "application/pdf",
            Self::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// File extension of the artifact.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Document => "pdf",
            Self::Spreadsheet => "xlsx",
        }
    }

    /// Canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Spreadsheet => "spreadsheet",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "document" | "pdf" => Ok(Self::Document),
            "spreadsheet" | "excel" | "xlsx" => Ok(Self::Spreadsheet),
            _ => Err(ReportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Request-level facts printed on, or encoded into, the artifact.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Document title.
    pub title: &'a str,
    /// Kinds the report covers.
    pub selector: KindSelector,
    /// Date filter applied.
    pub range: DateRange,
}

/// Renders sections and their aggregate into an artifact.
pub struct Renderer;

impl Renderer {
    /// Renders `sections` and `aggregate` as `format`.
    ///
    /// # Errors
    ///
    /// Returns `RenderFailure` if the artifact cannot be serialized.
    pub fn render(
        sections: &[ReportSection],
        aggregate: &AggregateResult,
        format: ReportFormat,
        context: &RenderContext<'_>,
    ) -> Result<ReportArtifact, ReportError> {
        let bytes = match format {
            ReportFormat::Document => {
                let lines = document::document_lines(sections, aggregate, context);
                document::write_pdf(&lines)?
            }
            ReportFormat::Spreadsheet => spreadsheet::write_workbook(sections)?,
        };

        Ok(ReportArtifact {
            bytes,
            mime_type: format.mime_type(),
            filename: suggested_filename(context.selector, &context.range, format),
        })
    }
}

/// Download filename encoding kind, range, and format, e.g.
/// `finance-report-offerings-2025-01-01-2025-03-31.pdf`.
#[must_use]
pub fn suggested_filename(selector: KindSelector, range: &DateRange, format: ReportFormat) -> String {
    let from = range
        .from()
        .map_or_else(|| "start".to_string(), |d| d.to_string());
    let to = range.to().map_or_else(|| "end".to_string(), |d| d.to_string());
    format!(
        "finance-report-{selector}-{from}-{to}.{}",
        format.extension()
    )
}
