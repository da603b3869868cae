use std::path::{Path, PathBuf};

use crate::assessment::AssessmentBuilder;
use crate::cache::LayoutCache;
use crate::error::PifError;
use crate::extraction::{DocumentLayout, LayoutExtractor};
use crate::model::Assessment;

/// Runs the [`AssessmentBuilder`] over input files one after another.
pub struct BatchProcessor<'a> {
    extractor: &'a dyn LayoutExtractor,
    builder: AssessmentBuilder,
    cache: Option<LayoutCache>,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(extractor: &'a dyn LayoutExtractor, builder: AssessmentBuilder) -> Self {
        BatchProcessor {
            extractor,
            builder,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: LayoutCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Process every file in order. The first failure aborts the batch.
    pub fn process_files(&self, files: &[PathBuf]) -> Result<Vec<Assessment>, PifError> {
        if let Some(cache) = &self.cache {
            log::warn!(
                "Using layout cache in {}, info might be incorrect",
                cache.dir().display()
            );
        }

        files
            .iter()
            .map(|path| {
                self.process_file(path).map_err(|e| PifError::Document {
                    path: path.clone(),
                    source: Box::new(e),
                })
            })
            .collect()
    }

    pub fn process_file(&self, path: &Path) -> Result<Assessment, PifError> {
        log::info!("Processing {}", path.display());
        let layout = self.load_layout(path)?;
        let mut assessment = self.builder.build(&layout)?;
        assessment.source = path.to_path_buf();
        Ok(assessment)
    }

    fn load_layout(&self, path: &Path) -> Result<DocumentLayout, PifError> {
        if let Some(cache) = &self.cache {
            match cache.load(path) {
                Ok(Some(layout)) => {
                    log::debug!("layout cache hit for {}", path.display());
                    return Ok(layout);
                }
                Ok(None) => {}
                Err(e) => log::warn!("ignoring layout cache entry: {e}"),
            }
        }

        let pdf_bytes = std::fs::read(path)?;
        log::debug!(
            "extracting layout of {} with {}",
            path.display(),
            self.extractor.backend_name()
        );
        let layout = self.extractor.extract_layout(&pdf_bytes)?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.store(path, &layout) {
                log::warn!("could not write layout cache: {e}");
            }
        }

        Ok(layout)
    }
}
