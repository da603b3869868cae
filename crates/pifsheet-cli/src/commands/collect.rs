use pifsheet_core::assessment::AssessmentBuilder;
use pifsheet_core::batch::BatchProcessor;
use pifsheet_core::cache::LayoutCache;
use pifsheet_core::config::{load_config, Config};
use pifsheet_core::error::PifError;
use pifsheet_core::extraction::pdftotext::PdftotextExtractor;
use std::path::PathBuf;

use crate::output;

pub struct Options {
    pub files: Vec<PathBuf>,
    pub output: PathBuf,
    pub use_caching: bool,
    pub cache_dir: Option<PathBuf>,
    pub layout: Option<PathBuf>,
    pub json: Option<PathBuf>,
    pub strict: bool,
}

pub fn run(options: Options) -> Result<(), PifError> {
    let config = match &options.layout {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    let extractor = PdftotextExtractor::new();
    let mut processor = BatchProcessor::new(&extractor, AssessmentBuilder::new(config.layout));
    if options.use_caching {
        let dir = options.cache_dir.unwrap_or_else(LayoutCache::default_dir);
        processor = processor.with_cache(LayoutCache::new(dir));
    }

    let assessments = processor.process_files(&options.files)?;

    let warning_count: usize = assessments.iter().map(|a| a.warnings.len()).sum();
    if warning_count > 0 {
        log::warn!(
            "{} warning(s) across {} document(s)",
            warning_count,
            assessments.iter().filter(|a| !a.warnings.is_empty()).count()
        );
    }

    if let Some(path) = &options.json {
        output::json::write(path, &assessments)?;
    }

    if options.strict && warning_count > 0 {
        return Err(PifError::StrictWarnings {
            count: warning_count,
        });
    }

    pifsheet_core::export_assessments(&assessments, &config.workbook, &options.output)
}
