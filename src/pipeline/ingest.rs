//! Resume ingestion pipeline
//!
//! Validate, detect language, translate if needed, extract fields, embed and
//! store. A failure in any stage is recorded against the resume id and the
//! batch moves on; one bad file never aborts a directory run.

use crate::config::Config;
use crate::error::{PipelineStage, Result, ScreenerError};
use crate::matching::store::{DocumentKind, VectorStore};
use crate::pipeline::extraction::FieldExtractor;
use crate::pipeline::language::LanguageDetector;
use crate::pipeline::record::ResumeRecord;
use crate::pipeline::translation::TranslationService;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;

/// One failed document in a batch run.
#[derive(Debug)]
pub struct IngestFailure {
    pub id: String,
    pub error: ScreenerError,
}

/// Outcome of a directory ingestion.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub processed: usize,
    pub failures: Vec<IngestFailure>,
}

impl IngestReport {
    pub fn total(&self) -> usize {
        self.processed + self.failures.len()
    }
}

pub struct IngestPipeline {
    detector: LanguageDetector,
    translator: TranslationService,
    extractor: Arc<FieldExtractor>,
    store: Arc<VectorStore>,
    min_text_length: usize,
    max_text_length: usize,
}

impl IngestPipeline {
    pub fn new(
        detector: LanguageDetector,
        translator: TranslationService,
        extractor: Arc<FieldExtractor>,
        store: Arc<VectorStore>,
        config: &Config,
    ) -> Self {
        Self {
            detector,
            translator,
            extractor,
            store,
            min_text_length: config.processing.min_text_length,
            max_text_length: config.processing.max_text_length,
        }
    }

    /// Run one resume through the full pipeline and index it. The returned
    /// record is also the JSON artifact callers may write out.
    pub async fn ingest_text(&self, id: &str, raw_text: &str) -> Result<ResumeRecord> {
        let stage_err = |stage: PipelineStage, message: String| ScreenerError::ResumeProcessing {
            resume_id: id.to_string(),
            stage,
            message,
        };

        let trimmed = raw_text.trim();
        if trimmed.len() < self.min_text_length {
            return Err(stage_err(
                PipelineStage::Validate,
                format!(
                    "{} characters after trimming, minimum is {}",
                    trimmed.len(),
                    self.min_text_length
                ),
            ));
        }
        if trimmed.len() > self.max_text_length {
            return Err(stage_err(
                PipelineStage::Validate,
                format!(
                    "{} characters exceeds maximum of {}",
                    trimmed.len(),
                    self.max_text_length
                ),
            ));
        }

        let language = self
            .detector
            .detect(trimmed)
            .map_err(|e| stage_err(PipelineStage::Detect, e.to_string()))?;
        log::info!("resume {}: detected language {}", id, language);

        // Never fails: unsupported languages pass through, backend failures
        // degrade to the original text.
        let outcome = if language == "en" {
            None
        } else {
            Some(self.translator.translate(trimmed, &language).await)
        };
        let canonical_text = match &outcome {
            Some(outcome) => outcome.canonical_text(trimmed).to_string(),
            None => trimmed.to_string(),
        };
        if outcome.as_ref().is_some_and(|o| o.was_translated()) {
            log::info!("resume {}: translated {} -> en", id, language);
        }

        let extraction = self.extractor.extract(&canonical_text);

        self.store
            .upsert(
                id,
                &canonical_text,
                DocumentKind::Resume,
                Some(language.clone()),
                Some(extraction.confidence),
                None,
            )
            .map_err(|e| match e {
                e @ ScreenerError::Embedding(_) => {
                    stage_err(PipelineStage::Embed, e.to_string())
                }
                e => stage_err(PipelineStage::Store, e.to_string()),
            })?;

        Ok(ResumeRecord {
            id: id.to_string(),
            raw_text: trimmed.to_string(),
            original_language: language,
            canonical_text,
            structured_fields: extraction.fields,
            extraction_confidence: extraction.confidence,
            parsed_at: Utc::now(),
        })
    }

    /// Ingest every .txt and .pdf file under `dir`, writing one parsed JSON
    /// artifact per success into `parsed_dir`. Files that fail any stage are
    /// collected in the report; detection failures skip the document.
    pub async fn ingest_directory(&self, dir: &Path, parsed_dir: &Path) -> Result<IngestReport> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("txt") | Some("pdf")
                )
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            log::warn!("no .txt or .pdf files found in {}", dir.display());
            return Ok(IngestReport::default());
        }

        std::fs::create_dir_all(parsed_dir)?;

        let bar = ProgressBar::new(paths.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner} [{bar:40}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut report = IngestReport::default();
        for path in paths {
            let id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("resume")
                .to_string();
            bar.set_message(id.clone());

            match self.ingest_file(&id, &path, parsed_dir).await {
                Ok(()) => report.processed += 1,
                Err(error) => {
                    log::warn!("skipping {}: {}", path.display(), error);
                    report.failures.push(IngestFailure { id, error });
                }
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        log::info!(
            "ingested {}/{} resumes from {}",
            report.processed,
            report.total(),
            dir.display()
        );
        Ok(report)
    }

    async fn ingest_file(&self, id: &str, path: &Path, parsed_dir: &Path) -> Result<()> {
        let raw_text = read_resume_file(path)?;
        let record = self.ingest_text(id, &raw_text).await?;

        let artifact = parsed_dir.join(format!("{}.json", id));
        std::fs::write(&artifact, serde_json::to_string_pretty(&record)?)?;
        Ok(())
    }
}

/// Read resume text from a .txt or .pdf file.
pub fn read_resume_file(path: &Path) -> Result<String> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("pdf") => pdf_extract::extract_text(path).map_err(|e| {
            ScreenerError::InvalidInput(format!(
                "failed to extract text from {}: {}",
                path.display(),
                e
            ))
        }),
        Some("txt") => Ok(std::fs::read_to_string(path)?),
        _ => Err(ScreenerError::InvalidInput(format!(
            "unsupported file type: {}",
            path.display()
        ))),
    }
}
