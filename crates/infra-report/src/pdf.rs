// PDF Queue Report Renderer (lopdf)

use crate::error::RenderError;
use crate::layout::{
    fit_to_column, Cells, PageLayout, TableLayout, BODY_FONT_SIZE, COLUMNS, HEADER_FONT_SIZE,
    MARGIN, PAGE_HEIGHT, PAGE_WIDTH,
};
use crate::writer::write_atomic;
use chrono::format::{Item, StrftimeItems};
use chrono::{FixedOffset, Local, Offset, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, StringFormat, Stream};
use queuedesk_core::domain::Person;
use queuedesk_core::error::Result;
use queuedesk_core::port::DocumentRenderer;
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";
const DOCUMENT_TITLE: &str = "Queue";

/// Presentation options for the date column
#[derive(Debug, Clone)]
pub struct ReportOptions {
    datetime_format: String,
    utc_offset: FixedOffset,
}

impl ReportOptions {
    pub const DEFAULT_DATETIME_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    /// Validates the `strftime` format up front so rendering never hits a bad specifier.
    pub fn new(
        datetime_format: impl Into<String>,
        utc_offset: FixedOffset,
    ) -> std::result::Result<Self, RenderError> {
        let datetime_format = datetime_format.into();
        if StrftimeItems::new(&datetime_format).any(|item| matches!(item, Item::Error)) {
            return Err(RenderError::DateFormat(datetime_format));
        }

        Ok(Self {
            datetime_format,
            utc_offset,
        })
    }

    /// Host's current local offset
    pub fn local_offset() -> FixedOffset {
        Local::now().offset().fix()
    }

    fn format_timestamp(&self, person: &Person) -> std::result::Result<String, RenderError> {
        let local = person.timestamp.with_timezone(&self.utc_offset);
        let mut out = String::new();
        write!(out, "{}", local.format(&self.datetime_format))
            .map_err(|_| RenderError::DateFormat(self.datetime_format.clone()))?;
        Ok(out)
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            datetime_format: Self::DEFAULT_DATETIME_FORMAT.to_string(),
            utc_offset: Self::local_offset(),
        }
    }
}

/// Renders the queue as a paginated four-column table
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer {
    options: ReportOptions,
}

impl PdfRenderer {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Cell text for each person, in queue order
    pub fn table_rows(&self, people: &[Person]) -> std::result::Result<Vec<Cells>, RenderError> {
        people
            .iter()
            .enumerate()
            .map(|(i, person)| self.row_cells(i + 1, person))
            .collect()
    }

    /// Text cells are truncated to their column; the position never is.
    fn row_cells(&self, position: usize, person: &Person) -> std::result::Result<Cells, RenderError> {
        let date = self.options.format_timestamp(person)?;
        Ok([
            position.to_string(),
            fit_to_column(&person.name, &COLUMNS[1], BODY_FONT_SIZE),
            fit_to_column(&person.surname, &COLUMNS[2], BODY_FONT_SIZE),
            fit_to_column(&date, &COLUMNS[3], BODY_FONT_SIZE),
        ])
    }

    pub fn render_pdf(&self, people: &[Person]) -> std::result::Result<Vec<u8>, RenderError> {
        let layout = TableLayout::build(self.table_rows(people)?);
        let bytes = encode(&layout)?;

        debug!(
            rows = layout.row_count(),
            pages = layout.pages.len(),
            bytes = bytes.len(),
            "Rendered queue PDF"
        );

        Ok(bytes)
    }

    /// Render and write to `path`.
    ///
    /// Returns once the file is fully written and synced.
    pub fn render_to_path(&self, people: &[Person], path: &Path) -> Result<()> {
        let bytes = self.render_pdf(people)?;
        write_atomic(path, &bytes)?;
        Ok(())
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, people: &[Person]) -> Result<Vec<u8>> {
        Ok(self.render_pdf(people)?)
    }

    fn content_type(&self) -> &'static str {
        PDF_CONTENT_TYPE
    }
}

fn encode(layout: &TableLayout) -> std::result::Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT => regular_id,
            BOLD_FONT => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let content = page_content(page);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(to_win_ansi(DOCUMENT_TITLE), StringFormat::Literal),
        "Producer" => Object::string_literal(format!("queuedesk {}", queuedesk_core::VERSION)),
        "CreationDate" => Object::string_literal(Utc::now().format("D:%Y%m%d%H%M%SZ").to_string()),
    });
    doc.trailer.set("Info", info_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

fn page_content(page: &PageLayout) -> Content {
    let mut ops = Vec::new();

    let header: Vec<&str> = COLUMNS.iter().map(|c| c.title).collect();
    push_text_row(&mut ops, BOLD_FONT, HEADER_FONT_SIZE, page.header_baseline_y, &header);

    for row in &page.rows {
        let cells: Vec<&str> = row.cells.iter().map(String::as_str).collect();
        push_text_row(&mut ops, REGULAR_FONT, BODY_FONT_SIZE, row.baseline_y, &cells);
    }

    for rule in &page.rules {
        ops.push(Operation::new("w", vec![rule.weight.line_width().into()]));
        ops.push(Operation::new("m", vec![MARGIN.into(), rule.y.into()]));
        ops.push(Operation::new("l", vec![(PAGE_WIDTH - MARGIN).into(), rule.y.into()]));
        ops.push(Operation::new("S", vec![]));
    }

    Content { operations: ops }
}

fn push_text_row(ops: &mut Vec<Operation>, font: &str, size: f32, baseline_y: f32, cells: &[&str]) {
    for (column, text) in COLUMNS.iter().zip(cells) {
        if text.is_empty() {
            continue;
        }
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
        ops.push(Operation::new("Td", vec![column.x.into(), baseline_y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
}

/// Latin-1 passthrough; anything else becomes '?'
fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| if c as u32 <= 255 { c as u8 } else { b'?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::rows_per_page;
    use chrono::{DateTime, TimeZone};
    use queuedesk_core::domain::NewPerson;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, h, m, 0).unwrap()
    }

    fn person(id: i64, name: &str, surname: &str, ts: DateTime<Utc>) -> Person {
        NewPerson::new(name, surname, ts).unwrap().into_person(id)
    }

    fn utc_renderer() -> PdfRenderer {
        PdfRenderer::new(ReportOptions::new("%Y-%m-%d %H:%M", FixedOffset::east_opt(0).unwrap()).unwrap())
    }

    /// Text shown on each page, in drawing order
    fn page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|page_id| {
                let data = doc.get_page_content(*page_id).unwrap();
                Content::decode(&data)
                    .unwrap()
                    .operations
                    .iter()
                    .filter(|op| op.operator == "Tj")
                    .map(|op| latin1(op.operands[0].as_str().unwrap()))
                    .collect()
            })
            .collect()
    }

    fn latin1(bytes: &[u8]) -> String {
        bytes.iter().map(|&b| b as char).collect()
    }

    fn stroke_count(bytes: &[u8]) -> usize {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|page_id| {
                let data = doc.get_page_content(*page_id).unwrap();
                Content::decode(&data)
                    .unwrap()
                    .operations
                    .iter()
                    .filter(|op| op.operator == "S")
                    .count()
            })
            .sum()
    }

    #[test]
    fn test_empty_queue_renders_header_only() {
        let bytes = utc_renderer().render_pdf(&[]).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));

        let pages = page_texts(&bytes);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0], vec!["#", "Name", "Surname", "Date"]);
        assert_eq!(stroke_count(&bytes), 2);
    }

    #[test]
    fn test_rows_follow_input_order() {
        let people = vec![
            person(1, "John", "Doe", at(8, 30)),
            person(2, "Jane", "Roe", at(8, 31)),
        ];
        let bytes = utc_renderer().render_pdf(&people).unwrap();

        let pages = page_texts(&bytes);
        assert_eq!(
            pages[0][4..],
            [
                "1", "John", "Doe", "2024-05-20 08:30",
                "2", "Jane", "Roe", "2024-05-20 08:31",
            ]
        );
        // header rule, one separator, closing rule
        assert_eq!(stroke_count(&bytes), 3);
    }

    #[test]
    fn test_header_repeats_and_numbering_continues_across_pages() {
        let total = rows_per_page() + 2;
        let people: Vec<Person> = (0..total)
            .map(|i| person(i as i64 + 1, &format!("P{}", i), "Tester", at(9, 0)))
            .collect();
        let pages = page_texts(&utc_renderer().render_pdf(&people).unwrap());

        assert_eq!(pages.len(), 2);
        for page in &pages {
            assert_eq!(page[..4], ["#", "Name", "Surname", "Date"]);
        }
        assert_eq!(pages[1][4], (rows_per_page() + 1).to_string());
        assert_eq!(pages[1][8], total.to_string());
    }

    #[test]
    fn test_date_column_uses_configured_offset() {
        let options =
            ReportOptions::new("%H:%M %z", FixedOffset::east_opt(2 * 3600).unwrap()).unwrap();
        let rows = PdfRenderer::new(options)
            .table_rows(&[person(1, "John", "Doe", at(8, 30))])
            .unwrap();
        assert_eq!(rows[0][3], "10:30 +0200");
    }

    #[test]
    fn test_non_latin_text_is_replaced() {
        let bytes = utc_renderer()
            .render_pdf(&[person(1, "Zoë", "Łukasz", at(8, 0))])
            .unwrap();
        let pages = page_texts(&bytes);
        assert_eq!(pages[0][5], "Zoë");
        assert_eq!(pages[0][6], "?ukasz");
    }

    #[test]
    fn test_large_positions_are_never_truncated() {
        let renderer = utc_renderer();
        let john = person(1, "John", "Doe", at(8, 30));

        for position in [999_999, 1_000_000, 12_345_678] {
            let cells = renderer.row_cells(position, &john).unwrap();
            assert_eq!(cells[0], position.to_string());
        }
    }

    #[test]
    fn test_invalid_date_format_is_rejected() {
        let err = ReportOptions::new("%Q", FixedOffset::east_opt(0).unwrap()).unwrap_err();
        assert!(matches!(err, RenderError::DateFormat(_)));
    }

    #[test]
    fn test_document_info_is_set() {
        let bytes = utc_renderer().render_pdf(&[]).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let info = doc.get_dictionary(info_id).unwrap();
        assert_eq!(info.get(b"Title").unwrap().as_str().unwrap(), b"Queue");
    }

    #[test]
    fn test_render_to_path_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("queue.pdf");

        utc_renderer()
            .render_to_path(&[person(1, "John", "Doe", at(8, 30))], &path)
            .unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(page_texts(&written)[0][5], "John");
    }

    #[test]
    fn test_port_reports_pdf_type() {
        let renderer = utc_renderer();
        assert_eq!(renderer.content_type(), "application/pdf");
    }
}
