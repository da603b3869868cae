use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One scored line item of an assessment table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AData {
    pub parameter: String,
    pub description: String,
    pub value: i64,
}

/// Something suspicious noticed while extracting a document that did not
/// stop extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssessmentWarning {
    /// Continuation lines at the end of the table that were never completed
    /// by a row with a numeric score.
    DanglingRow {
        parameter: String,
        description: String,
        score: String,
    },
    /// The header row never appeared in the extracted table.
    TableHeaderMissing,
    /// A parameter name occurred more than once in the same document.
    DuplicateParameter { parameter: String },
}

impl fmt::Display for AssessmentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssessmentWarning::DanglingRow {
                parameter,
                description,
                score,
            } => write!(
                f,
                "incomplete row dropped at end of table: '{parameter}' / '{description}' / '{score}'"
            ),
            AssessmentWarning::TableHeaderMissing => {
                write!(f, "table header row not found, no items extracted")
            }
            AssessmentWarning::DuplicateParameter { parameter } => {
                write!(f, "parameter '{parameter}' appears more than once")
            }
        }
    }
}

/// Everything extracted from one input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub name: String,
    pub source: PathBuf,
    pub items: Vec<AData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AssessmentWarning>,
}

impl Assessment {
    pub fn new(name: impl Into<String>, items: Vec<AData>) -> Self {
        Assessment {
            name: name.into(),
            source: PathBuf::new(),
            items,
            warnings: Vec::new(),
        }
    }
}
