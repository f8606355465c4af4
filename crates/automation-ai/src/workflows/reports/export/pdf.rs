//! Minimal PDF 1.4 writer for report tables.
//!
//! Layout is computed first as a plain value so pagination can be inspected without parsing
//! PDF bytes. Rendering only uses the two standard Helvetica faces, so no fonts are embedded.

use std::io::Write;

use super::ExportError;
use crate::workflows::assessments::{Assessment, Factor};
use crate::workflows::reports::composer::ReportDocument;

pub const PDF_TABLE_HEADERS: [&str; 9] = [
    "Process Name",
    "Repetitiveness",
    "Rule-Based",
    "Complexity",
    "Volume",
    "Standardization",
    "Error Rate",
    "Total Score",
    "Suitability",
];

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 40.0;
const COLUMN_WIDTHS: [f32; 9] = [100.0, 52.0, 44.0, 44.0, 34.0, 56.0, 42.0, 44.0, 99.0];
const TABLE_FONT_SIZE: f32 = 7.0;
const TABLE_ROW_HEIGHT: f32 = 12.0;
const BODY_FONT_SIZE: f32 = 10.0;
const BODY_LINE_HEIGHT: f32 = 13.0;
const HEADING_FONT_SIZE: f32 = 14.0;
const TITLE_FONT_SIZE: f32 = 18.0;
const FOOTER_FONT_SIZE: f32 = 8.0;
// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH_RATIO: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub bold: bool,
    pub text: String,
}

/// Horizontal stroke spanning the content width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfRule {
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfPage {
    pub lines: Vec<TextLine>,
    pub rules: Vec<PdfRule>,
    /// Number of assessment rows placed on this page.
    pub table_rows: usize,
}

impl PdfPage {
    pub fn contains_text(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.text == needle)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    pub pages: Vec<PdfPage>,
}

struct LayoutCursor {
    pages: Vec<PdfPage>,
    current: PdfPage,
    y: f32,
}

impl LayoutCursor {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: PdfPage::default(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn remaining(&self) -> f32 {
        self.y - MARGIN - FOOTER_FONT_SIZE * 2.0
    }

    fn ensure(&mut self, height: f32) {
        if self.remaining() < height {
            self.break_page();
        }
    }

    fn break_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn text(&mut self, text: impl Into<String>, size: f32, bold: bool, advance: f32) {
        self.ensure(advance);
        self.y -= advance;
        self.current.lines.push(TextLine {
            x: MARGIN,
            y: self.y,
            size,
            bold,
            text: text.into(),
        });
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }

    fn table_row(&mut self, cells: &[String], bold: bool) {
        self.y -= TABLE_ROW_HEIGHT;
        let mut x = MARGIN;
        for (cell, width) in cells.iter().zip(COLUMN_WIDTHS) {
            self.current.lines.push(TextLine {
                x: x + 2.0,
                y: self.y + 3.0,
                size: TABLE_FONT_SIZE,
                bold,
                text: fit_to_width(cell, width, TABLE_FONT_SIZE),
            });
            x += width;
        }
        self.current.rules.push(PdfRule { y: self.y });
    }

    fn table_header(&mut self) {
        let header: Vec<String> = PDF_TABLE_HEADERS.iter().map(|label| label.to_string()).collect();
        self.current.rules.push(PdfRule { y: self.y });
        self.table_row(&header, true);
    }

    fn finish(mut self) -> Vec<PdfPage> {
        if !self.current.lines.is_empty() || self.pages.is_empty() {
            let last = std::mem::take(&mut self.current);
            self.pages.push(last);
        }
        self.pages
    }
}

impl PdfLayout {
    /// Lay out a report. At most `rows_per_page` assessment rows are placed on a page and
    /// the table header is repeated at the top of every page that continues the table.
    pub fn build(document: &ReportDocument, rows_per_page: usize) -> Self {
        let rows_per_page = rows_per_page.max(1);
        let mut cursor = LayoutCursor::new();

        cursor.text(
            "Process Automation Assessment Report",
            TITLE_FONT_SIZE,
            true,
            TITLE_FONT_SIZE,
        );
        cursor.gap(12.0);
        cursor.text(
            format!("Report: {}", document.title),
            HEADING_FONT_SIZE,
            true,
            HEADING_FONT_SIZE + 4.0,
        );
        cursor.text(
            format!("Generated: {}", document.generated_at.format("%Y-%m-%d %H:%M")),
            BODY_FONT_SIZE,
            false,
            BODY_LINE_HEIGHT,
        );
        cursor.gap(20.0);

        cursor.text("Summary", HEADING_FONT_SIZE, true, HEADING_FONT_SIZE + 4.0);
        let counts = document.counts;
        for line in [
            format!("Total Processes Assessed: {}", document.assessments.len()),
            format!("Highly Automatable: {}", counts.highly_automatable),
            format!("Possibly Automatable: {}", counts.possibly_automatable),
            format!("Not Suitable for Automation: {}", counts.not_suitable),
        ] {
            cursor.text(line, BODY_FONT_SIZE, false, BODY_LINE_HEIGHT);
        }
        cursor.gap(20.0);

        cursor.text(
            "Detailed Assessment",
            HEADING_FONT_SIZE,
            true,
            HEADING_FONT_SIZE + 4.0,
        );
        cursor.gap(4.0);
        cursor.ensure(TABLE_ROW_HEIGHT * 2.0);
        cursor.table_header();

        for assessment in &document.assessments {
            if cursor.current.table_rows >= rows_per_page
                || cursor.remaining() < TABLE_ROW_HEIGHT
            {
                cursor.break_page();
                cursor.table_header();
            }
            cursor.table_row(&table_cells(assessment), false);
            cursor.current.table_rows += 1;
        }

        if document.has_conclusion() {
            cursor.gap(20.0);
            cursor.ensure(HEADING_FONT_SIZE + 4.0 + BODY_LINE_HEIGHT);
            cursor.text(
                "AI-Generated Conclusion",
                HEADING_FONT_SIZE,
                true,
                HEADING_FONT_SIZE + 4.0,
            );
            let max_chars = max_chars_for(PAGE_WIDTH - 2.0 * MARGIN, BODY_FONT_SIZE);
            for paragraph in document.conclusion.lines() {
                if paragraph.trim().is_empty() {
                    cursor.gap(BODY_LINE_HEIGHT / 2.0);
                    continue;
                }
                for wrapped in wrap_words(paragraph, max_chars) {
                    cursor.text(wrapped, BODY_FONT_SIZE, false, BODY_LINE_HEIGHT);
                }
            }
        }

        let mut pages = cursor.finish();
        let total = pages.len();
        for (index, page) in pages.iter_mut().enumerate() {
            page.lines.push(TextLine {
                x: PAGE_WIDTH - MARGIN - 50.0,
                y: MARGIN - FOOTER_FONT_SIZE,
                size: FOOTER_FONT_SIZE,
                bold: false,
                text: format!("Page {} of {}", index + 1, total),
            });
        }

        Self { pages }
    }

    /// Serialise into PDF 1.4 bytes.
    pub fn render(&self) -> Result<Vec<u8>, ExportError> {
        let mut objects: Vec<Vec<u8>> = Vec::with_capacity(4 + self.pages.len() * 2);

        let kids: Vec<String> = (0..self.pages.len())
            .map(|index| format!("{} 0 R", page_object_id(index)))
            .collect();
        objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
        objects.push(
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                self.pages.len()
            )
            .into_bytes(),
        );
        objects.push(font_object("Helvetica"));
        objects.push(font_object("Helvetica-Bold"));

        for (index, page) in self.pages.iter().enumerate() {
            objects.push(
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH:.0} {PAGE_HEIGHT:.0}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                    page_object_id(index) + 1
                )
                .into_bytes(),
            );

            let content = page_content(page)?;
            let mut stream = Vec::with_capacity(content.len() + 64);
            writeln!(stream, "<< /Length {} >>\nstream", content.len())?;
            stream.extend_from_slice(&content);
            stream.extend_from_slice(b"\nendstream");
            objects.push(stream);
        }

        let mut out = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (index, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            writeln!(out, "{} 0 obj", index + 1)?;
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_offset = out.len();
        writeln!(out, "xref\n0 {}", objects.len() + 1)?;
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            writeln!(out, "{offset:010} 00000 n ")?;
        }
        writeln!(
            out,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF",
            objects.len() + 1,
            xref_offset
        )?;

        Ok(out)
    }
}

/// Lay out and render a report document.
pub fn render_pdf(document: &ReportDocument, rows_per_page: usize) -> Result<Vec<u8>, ExportError> {
    PdfLayout::build(document, rows_per_page).render()
}

fn page_object_id(index: usize) -> usize {
    5 + index * 2
}

fn font_object(base: &str) -> Vec<u8> {
    format!("<< /Type /Font /Subtype /Type1 /BaseFont /{base} /Encoding /WinAnsiEncoding >>")
        .into_bytes()
}

fn page_content(page: &PdfPage) -> Result<Vec<u8>, ExportError> {
    let mut content = Vec::new();
    if !page.rules.is_empty() {
        content.extend_from_slice(b"0.5 w\n");
        for rule in &page.rules {
            writeln!(
                content,
                "{MARGIN:.2} {y:.2} m {right:.2} {y:.2} l S",
                y = rule.y,
                right = PAGE_WIDTH - MARGIN
            )?;
        }
    }
    for line in &page.lines {
        let font = if line.bold { "F2" } else { "F1" };
        write!(
            content,
            "BT /{font} {:.1} Tf {:.2} {:.2} Td (",
            line.size, line.x, line.y
        )?;
        content.extend_from_slice(&encode_text(&line.text));
        content.extend_from_slice(b") Tj ET\n");
    }
    Ok(content)
}

/// Escape a string for a PDF literal using WinAnsi bytes.
fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '(' | ')' => {
                out.push(b'\\');
                out.push(ch as u8);
            }
            ' '..='~' => out.push(ch as u8),
            '\u{2014}' => out.extend_from_slice(b"\\227"),
            '\u{2013}' => out.extend_from_slice(b"\\226"),
            '\u{a0}'..='\u{ff}' => out.extend_from_slice(format!("\\{:03o}", ch as u32).as_bytes()),
            ch if ch.is_control() => out.push(b' '),
            _ => out.push(b'?'),
        }
    }
    out
}

fn table_cells(assessment: &Assessment) -> Vec<String> {
    let mut cells = Vec::with_capacity(PDF_TABLE_HEADERS.len());
    cells.push(assessment.process_name.clone());
    for factor in Factor::ordered() {
        cells.push(assessment.factors().get(factor).to_string());
    }
    cells.push(assessment.total_score().to_string());
    cells.push(assessment.suitability().label().to_string());
    cells
}

fn max_chars_for(width: f32, size: f32) -> usize {
    ((width / (size * GLYPH_WIDTH_RATIO)).floor() as usize).max(4)
}

fn fit_to_width(text: &str, width: f32, size: f32) -> String {
    let max_chars = max_chars_for(width - 4.0, size);
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars - 3).collect();
    truncated.push_str("...");
    truncated
}

fn wrap_words(paragraph: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in paragraph.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::reports::composer::compose_conclusion;
    use crate::workflows::testing::{assessment, report_document};

    fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack
            .windows(needle.len())
            .position(|window| window == needle)
    }

    fn members(count: u64) -> Vec<Assessment> {
        (1..=count)
            .map(|id| assessment(id, "analyst", &format!("Process {id}"), [4, 4, 3, 3, 3, 3]))
            .collect()
    }

    #[test]
    fn paginates_rows_and_repeats_header() {
        let document = report_document("Operations", members(70));
        let layout = PdfLayout::build(&document, 30);

        let row_counts: Vec<usize> = layout.pages.iter().map(|page| page.table_rows).collect();
        assert_eq!(row_counts.iter().sum::<usize>(), 70);
        assert!(row_counts.iter().all(|rows| *rows <= 30));
        assert!(layout.pages.len() >= 3);
        for page in layout.pages.iter().filter(|page| page.table_rows > 0) {
            assert!(page.contains_text("Process Name"));
            assert!(page.contains_text("Suitability"));
        }
        assert!(layout.pages[0].contains_text("Process Automation Assessment Report"));
        assert!(layout.pages[0].contains_text("Report: Operations"));
        assert!(layout.pages[0].contains_text("Total Processes Assessed: 70"));
    }

    #[test]
    fn conclusion_section_only_when_present() {
        let mut document = report_document("Ops", members(2));
        let without = PdfLayout::build(&document, 30);
        assert!(!without
            .pages
            .iter()
            .any(|page| page.contains_text("AI-Generated Conclusion")));

        document.conclusion = compose_conclusion(&document.counts);
        let with = PdfLayout::build(&document, 30);
        let last = with.pages.last().expect("at least one page");
        assert!(last.contains_text("AI-Generated Conclusion"));
        assert!(last
            .lines
            .iter()
            .any(|line| line.text.starts_with("Key Recommendations:")));
    }

    #[test]
    fn empty_report_still_renders_one_page() {
        let document = report_document("Empty", Vec::new());
        let layout = PdfLayout::build(&document, 30);
        assert_eq!(layout.pages.len(), 1);
        assert!(layout.pages[0].contains_text("Process Name"));
    }

    #[test]
    fn rendered_bytes_have_valid_envelope_and_xref() {
        let document = report_document("Q3 (draft)", members(3));
        let bytes = render_pdf(&document, 30).expect("pdf export");
        let text = String::from_utf8_lossy(&bytes);

        assert!(bytes.starts_with(b"%PDF-1.4\n"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
        assert!(text.contains("(Report: Q3 \\(draft\\)) Tj"));

        let marker = text.rfind("startxref\n").expect("startxref");
        let offset: usize = text[marker + "startxref\n".len()..]
            .lines()
            .next()
            .expect("offset line")
            .trim()
            .parse()
            .expect("numeric offset");
        assert!(bytes[offset..].starts_with(b"xref\n"));

        let first_object = find_bytes(&bytes, b"1 0 obj").expect("catalog object");
        let table_entry = format!("{first_object:010} 00000 n ");
        assert!(text.contains(&table_entry));
    }

    #[test]
    fn text_encoding_escapes_and_maps_winansi() {
        assert_eq!(encode_text("a(b)c\\"), b"a\\(b\\)c\\\\".to_vec());
        assert_eq!(encode_text("caf\u{e9}"), b"caf\\351".to_vec());
        assert_eq!(encode_text("x\u{2014}y"), b"x\\227y".to_vec());
        assert_eq!(encode_text("\u{4e2d}"), b"?".to_vec());
    }

    #[test]
    fn long_cells_are_truncated_and_paragraphs_wrapped() {
        let cell = fit_to_width(&"x".repeat(80), 100.0, 7.0);
        assert!(cell.ends_with("..."));
        assert!(cell.chars().count() <= max_chars_for(96.0, 7.0));

        let lines = wrap_words("alpha beta gamma delta", 11);
        assert_eq!(lines, vec!["alpha beta", "gamma delta"]);
    }
}
