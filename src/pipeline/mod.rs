//! Resume processing pipeline: detection, translation, extraction, ingestion

pub mod extraction;
pub mod ingest;
pub mod language;
pub mod record;
pub mod sections;
pub mod translation;

pub use extraction::{EntityRecognizer, Extraction, FieldExtractor, HeuristicRecognizer};
pub use ingest::{IngestPipeline, IngestReport};
pub use language::LanguageDetector;
pub use record::{JobDescription, ResumeRecord, StructuredFields};
pub use translation::{TranslationOutcome, TranslationService};
