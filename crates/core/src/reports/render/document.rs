//! PDF document rendering.
//!
//! Rendering happens in two passes: [`document_lines`] lays the report out
//! as styled text lines, and [`write_pdf`] paginates those lines onto A4
//! pages in a monospaced font.

use almoner_shared::types::format_amount;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use super::RenderContext;
use crate::reports::aggregate::AggregateResult;
use crate::reports::entry::{ClosingFigures, LedgerEntry};
use crate::reports::error::ReportError;
use crate::reports::kind::KindSelector;
use crate::reports::source::DateRange;
use crate::reports::types::ReportSection;

/// Text shown for a section with no entries.
pub const NO_RECORDS: &str = "No records found";

/// Printed under the grand totals when they combine kinds.
pub const MIXED_KINDS_CAVEAT: &str =
    "Note: grand totals combine record kinds whose inflows and outflows are not directly comparable.";

/// Characters per line at body size.
const LINE_WIDTH: usize = 90;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const FOOTER_Y: i64 = 30;

/// Visual weight of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Document title.
    Title,
    /// Section heading.
    Heading,
    /// Regular text.
    Body,
    /// Vertical gap.
    Blank,
}

impl LineStyle {
    const fn font_size(self) -> i64 {
        match self {
            Self::Title => 16,
            Self::Heading => 11,
            Self::Body | Self::Blank => 9,
        }
    }

    const fn leading(self) -> i64 {
        match self {
            Self::Title => 22,
            Self::Heading => 16,
            Self::Body => 12,
            Self::Blank => 8,
        }
    }

    const fn font(self) -> &'static str {
        match self {
            Self::Title | Self::Heading => "F2",
            Self::Body | Self::Blank => "F1",
        }
    }
}

/// One laid-out line of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLine {
    /// Visual weight.
    pub style: LineStyle,
    /// Text, already wrapped to fit the page.
    pub text: String,
}

impl DocumentLine {
    fn title(text: impl Into<String>) -> Self {
        Self {
            style: LineStyle::Title,
            text: text.into(),
        }
    }

    fn heading(text: impl Into<String>) -> Self {
        Self {
            style: LineStyle::Heading,
            text: text.into(),
        }
    }

    fn body(text: impl Into<String>) -> Self {
        Self {
            style: LineStyle::Body,
            text: text.into(),
        }
    }

    const fn blank() -> Self {
        Self {
            style: LineStyle::Blank,
            text: String::new(),
        }
    }
}

/// Lays out the full report as text lines.
///
/// Order: title block, one section per kind with its subtotal, monthly
/// overview, month-end closing totals, grand totals.
#[must_use]
pub fn document_lines(
    sections: &[ReportSection],
    aggregate: &AggregateResult,
    context: &RenderContext<'_>,
) -> Vec<DocumentLine> {
    let mut lines = vec![
        DocumentLine::title(context.title),
        DocumentLine::body(format!(
            "Records: {} | Period: {}",
            selector_label(context.selector),
            period_label(&context.range)
        )),
        DocumentLine::blank(),
    ];

    for section in sections {
        lines.push(DocumentLine::heading(section.kind.title().to_uppercase()));
        if section.is_empty() {
            lines.push(DocumentLine::body(NO_RECORDS));
        } else {
            for (index, entry) in section.entries.iter().enumerate() {
                push_wrapped(&mut lines, &entry_line(index + 1, entry));
                if let Some(notes) = &entry.notes {
                    push_wrapped(&mut lines, &format!("    Notes: {notes}"));
                }
            }
            let totals = section.totals();
            lines.push(DocumentLine::body(format!(
                "Subtotal: {} records | Inflow: {} | Outflow: {}",
                totals.count,
                format_amount(totals.inflow),
                format_amount(totals.outflow)
            )));
        }
        lines.push(DocumentLine::blank());
    }

    lines.push(DocumentLine::heading("MONTHLY OVERVIEW"));
    if aggregate.monthly.is_empty() {
        lines.push(DocumentLine::body(NO_RECORDS));
    }
    for bucket in &aggregate.monthly {
        let open = if bucket.is_open { " (open)" } else { "" };
        lines.push(DocumentLine::body(format!(
            "{}{open}: Inflow {} | Outflow {}",
            bucket.label,
            format_amount(bucket.inflow()),
            format_amount(bucket.outflow())
        )));
        if bucket.per_kind.len() > 1 {
            for (kind, totals) in &bucket.per_kind {
                lines.push(DocumentLine::body(format!(
                    "    {}: Inflow {} | Outflow {}",
                    kind.title(),
                    format_amount(totals.inflow),
                    format_amount(totals.outflow)
                )));
            }
        }
    }
    lines.push(DocumentLine::blank());

    lines.push(DocumentLine::heading("MONTH-END CLOSING"));
    lines.push(DocumentLine::body(format!(
        "Closing records: {}",
        aggregate.closing_count
    )));
    lines.extend(closing_lines(&aggregate.closing_totals));
    lines.push(DocumentLine::blank());

    let grand = &aggregate.grand_totals;
    lines.push(DocumentLine::heading("GRAND TOTALS"));
    lines.push(DocumentLine::body(format!("Records: {}", grand.record_count)));
    lines.push(DocumentLine::body(format!(
        "Total Inflow: {}",
        format_amount(grand.inflow)
    )));
    lines.push(DocumentLine::body(format!(
        "Total Outflow: {}",
        format_amount(grand.outflow)
    )));
    lines.push(DocumentLine::body(format!("Net: {}", format_amount(grand.net))));
    if context.selector == KindSelector::All {
        push_wrapped(&mut lines, MIXED_KINDS_CAVEAT);
    }

    lines
}

fn selector_label(selector: KindSelector) -> &'static str {
    match selector {
        KindSelector::Single(kind) => kind.title(),
        KindSelector::All => "All records",
    }
}

fn period_label(range: &DateRange) -> String {
    match (range.from(), range.to()) {
        (None, None) => "All dates".to_string(),
        (Some(from), None) => format!("{from} onwards"),
        (None, Some(to)) => format!("up to {to}"),
        (Some(from), Some(to)) => format!("{from} to {to}"),
    }
}

fn entry_line(number: usize, entry: &LedgerEntry) -> String {
    let mut parts: Vec<String> = entry
        .breakdown
        .items()
        .iter()
        .map(|item| format!("{}: {}", item.label, format_amount(item.amount)))
        .collect();
    parts.push(format!("In: {}", format_amount(entry.inflow_total)));
    parts.push(format!("Out: {}", format_amount(entry.outflow_total)));

    let marker = if entry.is_closing() { " [closing]" } else { "" };
    format!("{number}. {}{marker} | {}", entry.date, parts.join(" | "))
}

fn closing_lines(totals: &ClosingFigures) -> Vec<DocumentLine> {
    vec![
        DocumentLine::body(format!("Tithe: {}", format_amount(totals.tithe))),
        DocumentLine::body(format!("Apostolic: {}", format_amount(totals.apostolic))),
        DocumentLine::body(format!(
            "Transaction Fee: {}",
            format_amount(totals.transaction_fee)
        )),
        DocumentLine::body(format!("Total: {}", format_amount(totals.total()))),
    ]
}

/// Word-wraps `text` to the body width; continuation lines are indented.
fn push_wrapped(lines: &mut Vec<DocumentLine>, text: &str) {
    let mut current = String::new();
    for word in text.split_whitespace() {
        let started = !current.trim().is_empty();
        if started && current.len() + 1 + word.len() > LINE_WIDTH {
            lines.push(DocumentLine::body(std::mem::take(&mut current)));
            current.push_str("      ");
        } else if started {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.trim().is_empty() {
        lines.push(DocumentLine::body(current));
    }
}

/// Splits lines into pages, each line paired with its baseline y position.
fn paginate(lines: &[DocumentLine]) -> Vec<Vec<(i64, &DocumentLine)>> {
    let top = PAGE_HEIGHT - MARGIN;
    let mut pages = Vec::new();
    let mut page = Vec::new();
    let mut y = top;

    for line in lines {
        let leading = line.style.leading();
        if y - leading < MARGIN && !page.is_empty() {
            pages.push(std::mem::take(&mut page));
            y = top;
        }
        y -= leading;
        if line.style != LineStyle::Blank {
            page.push((y, line));
        }
    }
    if !page.is_empty() || pages.is_empty() {
        pages.push(page);
    }
    pages
}

/// Courier covers printable ASCII only.
fn printable(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

fn text_operations(x: i64, y: i64, font: &str, size: i64, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![Object::Name(font.as_bytes().to_vec()), Object::Integer(size)]),
        Operation::new("Td", vec![Object::Integer(x), Object::Integer(y)]),
        Operation::new("Tj", vec![Object::string_literal(printable(text))]),
        Operation::new("ET", vec![]),
    ]
}

fn render_error(err: impl std::fmt::Display) -> ReportError {
    ReportError::RenderFailure(err.to_string())
}

/// Paginates `lines` onto A4 pages and serializes the PDF.
///
/// # Errors
///
/// Returns `RenderFailure` if a page stream or the document cannot be encoded.
pub fn write_pdf(lines: &[DocumentLine]) -> Result<Vec<u8>, ReportError> {
    let pages = paginate(lines);
    let page_count = pages.len();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(page_count);
    for (index, page) in pages.iter().enumerate() {
        let mut operations = Vec::new();
        for (y, line) in page {
            operations.extend(text_operations(
                MARGIN,
                *y,
                line.style.font(),
                line.style.font_size(),
                &line.text,
            ));
        }
        operations.extend(text_operations(
            MARGIN,
            FOOTER_Y,
            "F1",
            8,
            &format!("Page {} of {page_count}", index + 1),
        ));

        let content = Content { operations };
        let stream = Stream::new(dictionary! {}, content.encode().map_err(render_error)?);
        let content_id = doc.add_object(stream);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = i64::try_from(kids.len()).map_err(render_error)?;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(render_error)?;
    Ok(bytes)
}
