//! XLSX workbook rendering: one worksheet per report section.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use super::document::NO_RECORDS;
use crate::reports::entry::LedgerEntry;
use crate::reports::error::ReportError;
use crate::reports::types::ReportSection;

const COLUMN_WIDTH: u16 = 20;

/// A column of a section sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// Record date.
    Date,
    /// A breakdown category, by key.
    Category(&'static str),
    /// Derived inflow total.
    InflowTotal,
    /// Derived outflow total.
    OutflowTotal,
    /// Whether the record closes its month.
    Closing,
    /// Free-text notes.
    Notes,
}

impl Column {
    /// Header text.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Category(key) => key,
            Self::InflowTotal => "inflow_total",
            Self::OutflowTotal => "outflow_total",
            Self::Closing => "closing",
            Self::Notes => "notes",
        }
    }

    fn cell(self, entry: &LedgerEntry) -> Cell {
        match self {
            Self::Date => Cell::Text(entry.date.to_string()),
            Self::Category(key) => entry
                .breakdown
                .get(key)
                .map_or_else(|| Cell::Text(String::new()), Cell::Amount),
            Self::InflowTotal => Cell::Amount(entry.inflow_total),
            Self::OutflowTotal => Cell::Amount(entry.outflow_total),
            Self::Closing => Cell::Text(if entry.is_closing() { "yes" } else { "" }.to_string()),
            Self::Notes => Cell::Text(entry.notes.clone().unwrap_or_default()),
        }
    }
}

/// A worksheet cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Plain text.
    Text(String),
    /// Money amount, written as a number.
    Amount(Decimal),
}

/// Columns of a section sheet, taken from the keys of its first entry.
#[must_use]
pub fn section_columns(first: &LedgerEntry) -> Vec<Column> {
    let mut columns = vec![Column::Date];
    columns.extend(first.breakdown.keys().map(Column::Category));
    columns.extend([Column::InflowTotal, Column::OutflowTotal, Column::Closing]);
    if first.notes.is_some() {
        columns.push(Column::Notes);
    }
    columns
}

/// Lays out one section as header plus data rows.
///
/// An empty section is a single `No records found` row.
#[must_use]
pub fn sheet_rows(section: &ReportSection) -> Vec<Vec<Cell>> {
    let Some(first) = section.entries.first() else {
        return vec![vec![Cell::Text(NO_RECORDS.to_string())]];
    };
    let columns = section_columns(first);

    let mut rows = Vec::with_capacity(section.entries.len() + 1);
    rows.push(
        columns
            .iter()
            .map(|c| Cell::Text(c.header().to_string()))
            .collect(),
    );
    for entry in &section.entries {
        rows.push(columns.iter().map(|c| c.cell(entry)).collect());
    }
    rows
}

fn render_error(err: XlsxError) -> ReportError {
    ReportError::RenderFailure(err.to_string())
}

/// Converts an amount to the number stored in its cell.
fn cell_number(amount: Decimal) -> Result<f64, ReportError> {
    amount.to_f64().ok_or_else(|| {
        ReportError::RenderFailure(format!("amount {amount} cannot be written as a number"))
    })
}

fn write_rows(
    worksheet: &mut Worksheet,
    rows: &[Vec<Cell>],
    has_header: bool,
) -> Result<(), ReportError> {
    let header = Format::new().set_bold();
    let money = Format::new().set_num_format("#,##0.00");

    for (r, row) in rows.iter().enumerate() {
        let r = u32::try_from(r).map_err(|e| ReportError::RenderFailure(e.to_string()))?;
        for (c, cell) in row.iter().enumerate() {
            let c = u16::try_from(c).map_err(|e| ReportError::RenderFailure(e.to_string()))?;
            let written = match cell {
                Cell::Text(text) if r == 0 && has_header => {
                    worksheet.write_string_with_format(r, c, text, &header)
                }
                Cell::Text(text) => worksheet.write_string(r, c, text),
                Cell::Amount(amount) => {
                    worksheet.write_number_with_format(r, c, cell_number(*amount)?, &money)
                }
            };
            written.map_err(render_error)?;
        }
    }

    let width = rows.first().map_or(1, Vec::len);
    for c in 0..width {
        let c = u16::try_from(c).map_err(|e| ReportError::RenderFailure(e.to_string()))?;
        worksheet
            .set_column_width(c, COLUMN_WIDTH)
            .map_err(render_error)?;
    }
    Ok(())
}

/// Writes every section to its own worksheet, named after the kind.
///
/// # Errors
///
/// Returns `RenderFailure` if a sheet or the workbook cannot be written.
pub fn write_workbook(sections: &[ReportSection]) -> Result<Vec<u8>, ReportError> {
    let mut workbook = Workbook::new();

    for section in sections {
        let rows = sheet_rows(section);
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(section.kind.title())
            .map_err(render_error)?;
        write_rows(worksheet, &rows, !section.is_empty())?;
    }

    workbook.save_to_buffer().map_err(render_error)
}
