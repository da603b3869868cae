use pifsheet_core::error::PifError;
use pifsheet_core::model::Assessment;
use std::path::Path;

pub fn write(path: &Path, assessments: &[Assessment]) -> Result<(), PifError> {
    let json = serde_json::to_string_pretty(assessments)?;
    std::fs::write(path, json)?;
    log::info!(
        "Wrote {} assessment(s) to {}",
        assessments.len(),
        path.display()
    );
    Ok(())
}
