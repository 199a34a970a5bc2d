//! Report request validation.

use chrono::NaiveDate;

use super::error::ReportError;
use super::kind::KindSelector;
use super::render::ReportFormat;
use super::source::DateRange;

/// A validated report request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportRequest {
    /// Kinds to report on.
    pub selector: KindSelector,
    /// Artifact format.
    pub format: ReportFormat,
    /// Date filter.
    pub range: DateRange,
}

impl ReportRequest {
    /// Creates a request from already-typed parts.
    #[must_use]
    pub const fn new(selector: KindSelector, format: ReportFormat, range: DateRange) -> Self {
        Self {
            selector,
            format,
            range,
        }
    }

    /// Validates raw request parameters.
    ///
    /// A missing kind selects every kind; a missing format selects the PDF
    /// document. Blank values count as missing.
    ///
    /// # Errors
    ///
    /// Returns `UnknownKind`, `UnsupportedFormat`, `InvalidDate`, or
    /// `InvalidRange`, checked in that order.
    pub fn parse(
        kind: Option<&str>,
        format: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Self, ReportError> {
        let selector = match present(kind) {
            Some(kind) => kind
                .parse::<KindSelector>()
                .map_err(ReportError::UnknownKind)?,
            None => KindSelector::All,
        };
        let format = match present(format) {
            Some(format) => format.parse::<ReportFormat>()?,
            None => ReportFormat::Document,
        };
        let from = present(from).map(parse_date).transpose()?;
        let to = present(to).map(parse_date).transpose()?;
        let range = DateRange::new(from, to)?;

        Ok(Self::new(selector, format, range))
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parses a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns `InvalidDate` for anything else.
pub fn parse_date(value: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ReportError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::kind::RecordKind;

    #[test]
    fn test_parse_full_request() {
        let request = ReportRequest::parse(
            Some("church-accounts"),
            Some("excel"),
            Some("2025-01-01"),
            Some("2025-03-31"),
        )
        .unwrap();

        assert_eq!(request.selector, KindSelector::Single(RecordKind::Offerings));
        assert_eq!(request.format, ReportFormat::Spreadsheet);
        assert_eq!(request.range.from(), NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(request.range.to(), NaiveDate::from_ymd_opt(2025, 3, 31));
    }

    #[test]
    fn test_parse_defaults() {
        let request = ReportRequest::parse(None, Some(""), None, Some("  ")).unwrap();
        assert_eq!(request.selector, KindSelector::All);
        assert_eq!(request.format, ReportFormat::Document);
        assert!(request.range.is_unbounded());
    }

    #[test]
    fn test_parse_rejects_bad_parameters() {
        assert!(matches!(
            ReportRequest::parse(Some("tithes"), None, None, None),
            Err(ReportError::UnknownKind(_))
        ));
        assert!(matches!(
            ReportRequest::parse(Some("all"), Some("csv"), None, None),
            Err(ReportError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            ReportRequest::parse(Some("all"), None, Some("01/02/2025"), None),
            Err(ReportError::InvalidDate(_))
        ));
        assert!(matches!(
            ReportRequest::parse(Some("all"), None, Some("2025-03-01"), Some("2025-01-01")),
            Err(ReportError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_kind_checked_before_format() {
        let err = ReportRequest::parse(Some("tithes"), Some("csv"), None, None).unwrap_err();
        assert!(matches!(err, ReportError::UnknownKind(_)));
    }

    #[test]
    fn test_unknown_kind_message_names_input_once() {
        let err = ReportRequest::parse(Some(" pdf "), None, None, None).unwrap_err();
        assert_eq!(err.to_string(), "Unknown record kind: pdf");
    }
}
