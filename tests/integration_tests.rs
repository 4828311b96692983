//! End-to-end pipeline tests with stub model backends

use async_trait::async_trait;
use resume_screener::config::Config;
use resume_screener::error::Result;
use resume_screener::generation::generator::{QuestionGenerator, QuestionOutcome, TextGenerator};
use resume_screener::matching::embedder::Embedder;
use resume_screener::matching::matcher::Matcher;
use resume_screener::matching::store::{DocumentFilter, DocumentKind, VectorStore};
use resume_screener::pipeline::extraction::FieldExtractor;
use resume_screener::pipeline::ingest::IngestPipeline;
use resume_screener::pipeline::language::LanguageDetector;
use resume_screener::pipeline::record::JobDescription;
use resume_screener::pipeline::translation::{
    TranslationModel, TranslationModelLoader, TranslationService,
};
use std::path::Path;
use std::sync::Arc;

/// Word-overlap embedding over a fixed vocabulary. Deterministic, and
/// similar texts land close together, which is all ordering tests need.
struct VocabEmbedder;

const VOCAB: &[&str] = &[
    "python", "sql", "java", "react", "docker", "kubernetes", "aws", "excel", "tableau",
    "engineer", "developer", "analyst", "designer", "chef", "baking", "marketing", "sales",
    "backend", "frontend", "data", "cloud", "teaching", "nursing", "finance",
];

impl Embedder for VocabEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(VOCAB
            .iter()
            .map(|word| {
                if lower.contains(word) {
                    1.0
                } else {
                    0.0
                }
            })
            .collect())
    }

    fn model_id(&self) -> &str {
        "vocab-test"
    }
}

struct MarkerModel;

#[async_trait]
impl TranslationModel for MarkerModel {
    async fn translate(&self, text: &str) -> Result<String> {
        Ok(format!("translated to english: {}", text))
    }

    fn model_id(&self) -> &str {
        "marker-test"
    }
}

struct MarkerLoader;

impl TranslationModelLoader for MarkerLoader {
    fn load(&self, _language: &str) -> Result<Arc<dyn TranslationModel>> {
        Ok(Arc::new(MarkerModel))
    }
}

struct ListGenerator;

#[async_trait]
impl TextGenerator for ListGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok("1. Tell us about your Python work.\n2. How do you design schemas?\n3. Why this team?"
            .to_string())
    }
}

fn build_pipeline(dir: &Path) -> (IngestPipeline, Arc<VectorStore>) {
    let config = Config::default();
    let store = Arc::new(
        VectorStore::open(&dir.join("store.json"), Arc::new(VocabEmbedder), 50).unwrap(),
    );
    let pipeline = IngestPipeline::new(
        LanguageDetector::new().unwrap(),
        TranslationService::new(Box::new(MarkerLoader), vec!["fr".to_string(), "es".to_string()]),
        Arc::new(FieldExtractor::new(0.7, 1000).unwrap()),
        Arc::clone(&store),
        &config,
    );
    (pipeline, store)
}

const PYTHON_RESUME: &str = "Jane Doe\njane.doe@example.com\n(555) 123-4567\n\
Experienced backend developer who has built data platforms in production.\n\
Skills: Python, SQL, Docker\nEducation: Bachelor of Science, MIT, 2018";

const CHEF_RESUME: &str = "Sam Rivera\nsam.rivera@example.com\n\
Pastry chef with a decade of baking experience in busy restaurant kitchens, \
leading dessert menus and training junior kitchen staff.";

const FRENCH_RESUME: &str = "Ingénieur logiciel expérimenté avec une solide expérience dans \
les systèmes distribués et les bases de données relationnelles. J'ai dirigé des équipes \
de développement pendant plusieurs années.";

fn python_job() -> JobDescription {
    JobDescription {
        title: "Backend Python Developer".to_string(),
        description: "Build backend data services in python with sql.".to_string(),
        requirements: vec!["3+ years python".to_string()],
        skills: vec!["python".to_string(), "sql".to_string(), "docker".to_string()],
    }
}

#[tokio::test]
async fn test_ingest_then_match_ranks_relevant_resume_first() {
    let dir = tempfile::tempdir().unwrap();
    let (pipeline, store) = build_pipeline(dir.path());

    pipeline.ingest_text("r-python", PYTHON_RESUME).await.unwrap();
    pipeline.ingest_text("r-chef", CHEF_RESUME).await.unwrap();

    let matcher = Matcher::new(store);
    let results = matcher.find_matching_resumes(&python_job(), 5, 0.0).unwrap();

    assert_eq!(results[0].document_id, "r-python");
    assert!(results[0].similarity_score > results.last().unwrap().similarity_score);
    assert!(results.iter().all(|r| r.similarity_score >= 0.0 && r.similarity_score <= 1.0));
}

#[tokio::test]
async fn test_non_english_resume_is_translated_and_indexed() {
    let dir = tempfile::tempdir().unwrap();
    let (pipeline, store) = build_pipeline(dir.path());

    let record = pipeline.ingest_text("r-fr", FRENCH_RESUME).await.unwrap();

    assert_eq!(record.original_language, "fr");
    assert!(record.canonical_text.starts_with("translated to english:"));

    let stored = store.get("r-fr").unwrap();
    assert_eq!(stored.metadata.language.as_deref(), Some("fr"));
    assert!(stored.text.starts_with("translated to english:"));
}

#[tokio::test]
async fn test_reingestion_replaces_the_stored_document() {
    let dir = tempfile::tempdir().unwrap();
    let (pipeline, store) = build_pipeline(dir.path());

    pipeline.ingest_text("r1", PYTHON_RESUME).await.unwrap();
    pipeline.ingest_text("r1", CHEF_RESUME).await.unwrap();

    assert_eq!(store.count(&DocumentFilter::default()), 1);
    assert!(store.get("r1").unwrap().text.contains("Pastry chef"));
}

#[tokio::test]
async fn test_job_documents_do_not_appear_in_resume_matches() {
    let dir = tempfile::tempdir().unwrap();
    let (pipeline, store) = build_pipeline(dir.path());

    pipeline.ingest_text("r-python", PYTHON_RESUME).await.unwrap();
    store
        .upsert(
            "j-python",
            &python_job().canonical_text(),
            DocumentKind::Job,
            Some("en".to_string()),
            None,
            None,
        )
        .unwrap();

    let matcher = Matcher::new(store);
    let results = matcher.find_matching_resumes(&python_job(), 10, 0.0).unwrap();

    assert!(results.iter().all(|r| r.document_id != "j-python"));
    assert!(results.iter().any(|r| r.document_id == "r-python"));
}

#[tokio::test]
async fn test_extraction_survives_the_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let (pipeline, _store) = build_pipeline(dir.path());

    let record = pipeline.ingest_text("r-python", PYTHON_RESUME).await.unwrap();
    let fields = &record.structured_fields;

    assert_eq!(fields.email.as_deref(), Some("jane.doe@example.com"));
    assert_eq!(fields.name.as_deref(), Some("Jane Doe"));
    assert!(fields.skills.iter().any(|s| s.skill == "Python"));
    assert_eq!(fields.education.len(), 1);
    assert_eq!(fields.education[0].institution, "MIT");
    assert!(record.extraction_confidence > 0.5);
}

#[tokio::test]
async fn test_match_and_generate_questions_for_all_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let (pipeline, store) = build_pipeline(dir.path());

    pipeline.ingest_text("r-python", PYTHON_RESUME).await.unwrap();
    pipeline.ingest_text("r-chef", CHEF_RESUME).await.unwrap();

    let matcher = Matcher::new(store);
    let results = matcher.find_matching_resumes(&python_job(), 5, 0.0).unwrap();

    let questions = Arc::new(QuestionGenerator::new(Arc::new(ListGenerator), 30, 1000));
    let texts: Vec<String> = results.iter().map(|r| r.text.clone()).collect();
    let outcomes = questions.generate_all("Backend Python Developer", &texts).await;

    assert_eq!(outcomes.len(), results.len());
    assert!(outcomes.iter().all(QuestionOutcome::is_generated));
    assert!(outcomes[0].text().contains("1."));
}
