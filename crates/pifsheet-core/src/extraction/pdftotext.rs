use crate::error::PifError;
use crate::extraction::{BBox, DocumentLayout, LayoutExtractor, PageLayout, TextLine, Word};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::io::Write;
use std::process::Command;

/// PDF layout backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -bbox-layout`, which reports every line and word together
/// with its bounding box.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutExtractor for PdftotextExtractor {
    fn extract_layout(&self, pdf_bytes: &[u8]) -> Result<DocumentLayout, PifError> {
        // pdftotext needs a real file to read from
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| PifError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| PifError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-bbox-layout")
            .arg(tmpfile.path())
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PifError::PdftotextNotFound
                } else {
                    PifError::Extraction(format!("pdftotext -bbox-layout failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(PifError::PdftotextFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        let layout = parse_bbox_xml(&xml)?;
        log::debug!(
            "pdftotext produced {} page(s), {} line(s)",
            layout.pages.len(),
            layout.pages.iter().map(|p| p.lines.len()).sum::<usize>()
        );
        Ok(layout)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Parse the XHTML written by `pdftotext -bbox-layout`.
///
/// Only `page`, `line` and `word` elements matter; flows and blocks are
/// transparent.
pub fn parse_bbox_xml(xml: &str) -> Result<DocumentLayout, PifError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    reader.config_mut().check_end_names = false;

    let mut pages: Vec<PageLayout> = Vec::new();
    let mut current_words: Vec<Word> = Vec::new();
    let mut current_word: Option<(BBox, String)> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| xml_error(reader.buffer_position(), e))?;

        match event {
            Event::Start(ref e) => match e.name().as_ref() {
                b"page" => pages.push(PageLayout {
                    page_number: pages.len() + 1,
                    width: attr_f32(e, "width")?.unwrap_or_default(),
                    height: attr_f32(e, "height")?.unwrap_or_default(),
                    lines: Vec::new(),
                }),
                b"line" => current_words.clear(),
                b"word" => current_word = parse_bbox(e)?.map(|b| (b, String::new())),
                _ => {}
            },
            Event::Text(ref t) => {
                if let Some((_, text)) = current_word.as_mut() {
                    let unescaped = t
                        .unescape()
                        .map_err(|e| xml_error(reader.buffer_position(), e))?;
                    text.push_str(&unescaped);
                }
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"word" => {
                    if let Some((bbox, text)) = current_word.take() {
                        let text = text.trim().to_string();
                        if !text.is_empty() {
                            current_words.push(Word { text, bbox });
                        }
                    }
                }
                b"line" => {
                    let words = std::mem::take(&mut current_words);
                    if let (Some(page), Some(line)) =
                        (pages.last_mut(), TextLine::from_words(words))
                    {
                        page.lines.push(line);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(DocumentLayout { pages })
}

fn xml_error(position: u64, e: impl std::fmt::Display) -> PifError {
    PifError::Extraction(format!("malformed pdftotext XML at byte {position}: {e}"))
}

fn attr_f32(tag: &BytesStart<'_>, name: &str) -> Result<Option<f32>, PifError> {
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| PifError::Extraction(e.to_string()))?;
        if attr.key.as_ref() == name.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|e| PifError::Extraction(e.to_string()))?;
            return Ok(value.trim().parse().ok());
        }
    }
    Ok(None)
}

fn parse_bbox(tag: &BytesStart<'_>) -> Result<Option<BBox>, PifError> {
    let (Some(x_min), Some(y_min), Some(x_max), Some(y_max)) = (
        attr_f32(tag, "xMin")?,
        attr_f32(tag, "yMin")?,
        attr_f32(tag, "xMax")?,
        attr_f32(tag, "yMax")?,
    ) else {
        return Ok(None);
    };
    Ok(Some(BBox::new(x_min, y_min, x_max, y_max)))
}
