//! Format-specific text extraction strategies

use crate::error::Result;
#[cfg(any(feature = "pdf", feature = "docx", feature = "xlsx"))]
use crate::error::Error;

/// MIME type for PDF documents
pub const PDF_MIME: &str = "application/pdf";
/// MIME type for Word documents (.docx)
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// MIME type for Excel workbooks (.xlsx)
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Converts a document's raw bytes into plain text.
///
/// Implementations run on the blocking thread pool and must not touch the
/// staged file themselves.
pub trait Extractor: Send + Sync {
    /// Short strategy name used in logs
    fn name(&self) -> &'static str;

    /// Extract plain text from the document bytes
    fn extract(&self, data: &[u8]) -> Result<String>;
}

/// PDF text extraction
#[cfg(feature = "pdf")]
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

#[cfg(feature = "pdf")]
impl Extractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn extract(&self, data: &[u8]) -> Result<String> {
        let content = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| Error::extraction("document.pdf", e.to_string()))?;

        Ok(content.trim().to_string())
    }
}

/// DOCX raw-text extraction
#[cfg(feature = "docx")]
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxExtractor;

#[cfg(feature = "docx")]
impl Extractor for DocxExtractor {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn extract(&self, data: &[u8]) -> Result<String> {
        let doc = docx_rs::read_docx(data)
            .map_err(|e| Error::extraction("document.docx", e.to_string()))?;

        let mut lines = Vec::new();
        for child in &doc.document.children {
            match child {
                docx_rs::DocumentChild::Paragraph(p) => lines.push(docx_paragraph_text(p)),
                docx_rs::DocumentChild::Table(t) => docx_table_lines(t, &mut lines),
                _ => {}
            }
        }

        Ok(lines.join("\n").trim_end().to_string())
    }
}

#[cfg(feature = "docx")]
fn docx_paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        match child {
            docx_rs::ParagraphChild::Run(run) => docx_run_text(run, &mut text),
            docx_rs::ParagraphChild::Hyperlink(link) => {
                for child in &link.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        docx_run_text(run, &mut text);
                    }
                }
            }
            _ => {}
        }
    }
    text
}

#[cfg(feature = "docx")]
fn docx_run_text(run: &docx_rs::Run, out: &mut String) {
    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(t) => out.push_str(&t.text),
            docx_rs::RunChild::Tab(_) => out.push('\t'),
            docx_rs::RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}

/// Table cells are flattened to one line per cell paragraph, row by row
#[cfg(feature = "docx")]
fn docx_table_lines(table: &docx_rs::Table, lines: &mut Vec<String>) {
    for row in &table.rows {
        let docx_rs::TableChild::TableRow(row) = row;
        for cell in &row.cells {
            let docx_rs::TableRowChild::TableCell(cell) = cell;
            for content in &cell.children {
                match content {
                    docx_rs::TableCellContent::Paragraph(p) => lines.push(docx_paragraph_text(p)),
                    docx_rs::TableCellContent::Table(t) => docx_table_lines(t, lines),
                    _ => {}
                }
            }
        }
    }
}

/// XLSX first-sheet to CSV conversion
#[cfg(feature = "xlsx")]
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxExtractor;

#[cfg(feature = "xlsx")]
impl Extractor for XlsxExtractor {
    fn name(&self) -> &'static str {
        "xlsx"
    }

    fn extract(&self, data: &[u8]) -> Result<String> {
        use calamine::Reader;

        let cursor = std::io::Cursor::new(data);
        let mut workbook = calamine::Xlsx::new(cursor)
            .map_err(|e| Error::extraction("spreadsheet.xlsx", e.to_string()))?;

        // Later sheets are ignored
        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range.map_err(|e| Error::extraction("spreadsheet.xlsx", e.to_string()))?,
            None => return Ok(String::new()),
        };

        sheet_to_csv(&range)
    }
}

#[cfg(feature = "xlsx")]
fn sheet_to_csv(range: &calamine::Range<calamine::Data>) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in range.rows() {
        let record: Vec<String> = row.iter().map(cell_text).collect();
        writer
            .write_record(&record)
            .map_err(|e| Error::extraction("spreadsheet.xlsx", e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::internal(format!("CSV buffer flush failed: {}", e)))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| Error::internal(format!("CSV output is not UTF-8: {}", e)))?;

    Ok(text.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(feature = "xlsx")]
fn cell_text(cell: &calamine::Data) -> String {
    use calamine::DataType;

    match cell {
        calamine::Data::Empty => String::new(),
        calamine::Data::String(s) => s.clone(),
        calamine::Data::Float(f) => f.to_string(),
        calamine::Data::Int(i) => i.to_string(),
        calamine::Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        calamine::Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) => format_datetime(dt),
            None => cell.to_string(),
        },
        other => other.to_string(),
    }
}

/// Dates without a time of day render as `YYYY-MM-DD`
#[cfg(feature = "xlsx")]
fn format_datetime(dt: chrono::NaiveDateTime) -> String {
    use chrono::Timelike;

    if dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0 {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
