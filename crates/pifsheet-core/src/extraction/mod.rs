pub mod pdftotext;
pub mod table;

use serde::{Deserialize, Serialize};

use crate::error::PifError;

/// Axis-aligned box in PDF points. The origin is the top-left corner of the
/// page, so `y_min` is the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BBox {
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        BBox {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// The same box moved `dy` points down the page (negative moves it up).
    pub fn shifted_y(&self, dy: f32) -> BBox {
        BBox {
            y_min: self.y_min + dy,
            y_max: self.y_max + dy,
            ..*self
        }
    }

    /// True if `other` lies entirely inside this box, allowing each edge to
    /// overshoot by `tolerance`.
    pub fn contains(&self, other: &BBox, tolerance: f32) -> bool {
        other.x_min >= self.x_min - tolerance
            && other.y_min >= self.y_min - tolerance
            && other.x_max <= self.x_max + tolerance
            && other.y_max <= self.y_max + tolerance
    }

    /// True if the two boxes share some area (touching edges do not count).
    pub fn intersects(&self, other: &BBox) -> bool {
        self.x_min < other.x_max
            && other.x_min < self.x_max
            && self.y_min < other.y_max
            && other.y_min < self.y_max
    }

    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    pub fn center_x(&self) -> f32 {
        (self.x_min + self.x_max) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub bbox: BBox,
}

/// One horizontal text line as reported by the layout backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    pub bbox: BBox,
    pub words: Vec<Word>,
}

impl TextLine {
    /// Build a line from its words; text and bbox are derived from them.
    /// Returns `None` for an empty word list.
    pub fn from_words(words: Vec<Word>) -> Option<TextLine> {
        let first = words.first()?.bbox;
        let bbox = words.iter().fold(first, |acc, w| acc.union(&w.bbox));
        let text = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Some(TextLine { text, bbox, words })
    }

    /// Bounding box of the first run of consecutive words whose joined text
    /// equals `label`.
    fn find_word_run(&self, label: &str) -> Option<BBox> {
        let label = normalize_ws(label);
        for start in 0..self.words.len() {
            let mut joined = String::new();
            let mut bbox = self.words[start].bbox;
            for word in &self.words[start..] {
                if !joined.is_empty() {
                    joined.push(' ');
                }
                joined.push_str(&word.text);
                bbox = bbox.union(&word.bbox);
                if joined == label {
                    return Some(bbox);
                }
                if joined.len() >= label.len() {
                    break;
                }
            }
        }
        None
    }
}

/// Layout of a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_number: usize,
    pub width: f32,
    pub height: f32,
    pub lines: Vec<TextLine>,
}

impl PageLayout {
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.lines.iter().flat_map(|l| l.words.iter())
    }

    /// First line whose text contains `label` (whitespace-normalized).
    pub fn find_line_containing(&self, label: &str) -> Option<&TextLine> {
        let needle = normalize_ws(label);
        self.lines
            .iter()
            .find(|l| normalize_ws(&l.text).contains(&needle))
    }

    /// Locate a caption on the page.
    ///
    /// An exact run of words is preferred, since the backend may glue
    /// neighbouring captions into one line. Falls back to the bbox of a line
    /// containing the caption.
    pub fn find_label(&self, label: &str) -> Option<BBox> {
        self.lines
            .iter()
            .find_map(|l| l.find_word_run(label))
            .or_else(|| self.find_line_containing(label).map(|l| l.bbox))
    }

    /// Whole lines lying inside `area`, in reading order.
    ///
    /// A line that only partly overlaps `area` is an `Err` carrying that
    /// line, since taking the inside part would cut its text short.
    pub fn lines_within(
        &self,
        area: &BBox,
        tolerance: f32,
    ) -> Result<Vec<&TextLine>, &TextLine> {
        let mut inside = Vec::new();
        for line in &self.lines {
            if area.contains(&line.bbox, tolerance) {
                inside.push(line);
            } else if area.intersects(&line.bbox) {
                return Err(line);
            }
        }
        Ok(inside)
    }
}

/// Text and geometry of a whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    /// First page (in document order) carrying `label`, with the label's bbox.
    pub fn find_label(&self, label: &str) -> Option<(&PageLayout, BBox)> {
        self.pages
            .iter()
            .find_map(|p| p.find_label(label).map(|b| (p, b)))
    }

    pub fn find_line_containing(&self, label: &str) -> Option<(&PageLayout, &TextLine)> {
        self.pages
            .iter()
            .find_map(|p| p.find_line_containing(label).map(|l| (p, l)))
    }
}

/// Trait for PDF layout extraction backends.
pub trait LayoutExtractor: Send + Sync {
    /// Extract the text layout of a PDF, one `PageLayout` per page.
    fn extract_layout(&self, pdf_bytes: &[u8]) -> Result<DocumentLayout, PifError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

pub(crate) fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
