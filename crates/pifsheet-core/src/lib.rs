pub mod assessment;
pub mod batch;
pub mod cache;
pub mod config;
pub mod error;
pub mod extraction;
pub mod model;
pub mod rows;
pub mod workbook;

use std::path::Path;

use assessment::AssessmentBuilder;
use config::{LayoutConfig, WorkbookConfig};
use error::PifError;
use extraction::LayoutExtractor;
use model::Assessment;
use workbook::ScoreTable;

/// Extract one assessment from PDF bytes.
pub fn process_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn LayoutExtractor,
    config: &LayoutConfig,
) -> Result<Assessment, PifError> {
    let layout = extractor.extract_layout(pdf_bytes)?;
    AssessmentBuilder::new(config.clone()).build(&layout)
}

/// Join the assessments on parameter name and write them to `output`.
pub fn export_assessments(
    assessments: &[Assessment],
    config: &WorkbookConfig,
    output: &Path,
) -> Result<(), PifError> {
    let table = ScoreTable::from_assessments(assessments);
    workbook::export_xlsx(&table, config, output)
}
