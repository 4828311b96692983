//! Semantic matching between jobs and resumes

use crate::error::Result;
use crate::matching::store::{DocumentFilter, DocumentKind, DocumentMetadata, VectorStore};
use crate::pipeline::record::JobDescription;
use serde::Serialize;
use std::sync::Arc;

/// One ranked hit. Scores are similarity (1 - cosine distance) clamped to
/// [0, 1] and rounded to four decimals so serialized results are stable.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub document_id: String,
    pub similarity_score: f32,
    /// 1-based position within this result set.
    pub rank: usize,
    pub text: String,
    pub metadata: DocumentMetadata,
}

pub struct Matcher {
    store: Arc<VectorStore>,
}

impl Matcher {
    pub fn new(store: Arc<VectorStore>) -> Self {
        Self { store }
    }

    /// Query the store for documents of `kind` similar to `query_text`,
    /// keeping at most `top_k` results scoring at least `min_score`.
    pub fn find_matches(
        &self,
        query_text: &str,
        kind: DocumentKind,
        top_k: usize,
        min_score: f32,
    ) -> Result<Vec<MatchResult>> {
        let hits = self
            .store
            .query(query_text, top_k, &DocumentFilter::kind(kind))?;

        let results: Vec<MatchResult> = hits
            .into_iter()
            .map(|hit| (round4((1.0 - hit.distance).clamp(0.0, 1.0)), hit.document))
            .filter(|(score, _)| *score >= min_score)
            .enumerate()
            .map(|(i, (score, document))| MatchResult {
                document_id: document.id,
                similarity_score: score,
                rank: i + 1,
                text: document.text,
                metadata: document.metadata,
            })
            .collect();

        log::debug!(
            "matched {} {}(s) for query of {} chars",
            results.len(),
            kind,
            query_text.len()
        );
        Ok(results)
    }

    pub fn find_matching_resumes(
        &self,
        job: &JobDescription,
        top_k: usize,
        min_score: f32,
    ) -> Result<Vec<MatchResult>> {
        self.find_matches(&job.canonical_text(), DocumentKind::Resume, top_k, min_score)
    }

    pub fn find_matching_jobs(
        &self,
        resume_text: &str,
        top_k: usize,
        min_score: f32,
    ) -> Result<Vec<MatchResult>> {
        self.find_matches(resume_text, DocumentKind::Job, top_k, min_score)
    }
}

fn round4(value: f32) -> f32 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::matching::embedder::Embedder;
    use std::path::Path;

    struct CharFrequencyEmbedder;

    impl Embedder for CharFrequencyEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let mut counts = vec![0.0f32; 27];
            for c in text.to_lowercase().chars() {
                if c.is_ascii_lowercase() {
                    counts[(c as usize) - ('a' as usize)] += 1.0;
                } else if c == ' ' {
                    counts[26] += 1.0;
                }
            }
            Ok(counts)
        }

        fn model_id(&self) -> &str {
            "char-frequency-test"
        }
    }

    fn matcher_with_fixtures(dir: &Path) -> Matcher {
        let store = Arc::new(
            VectorStore::open(
                &dir.join("store.json"),
                Arc::new(CharFrequencyEmbedder),
                3,
            )
            .unwrap(),
        );

        store
            .upsert(
                "r-python",
                "python developer with django and sql experience",
                DocumentKind::Resume,
                Some("en".to_string()),
                None,
                None,
            )
            .unwrap();
        store
            .upsert(
                "r-chef",
                "pastry chef skilled in desserts and baking",
                DocumentKind::Resume,
                Some("en".to_string()),
                None,
                None,
            )
            .unwrap();
        store
            .upsert(
                "j-backend",
                "python backend developer job with sql",
                DocumentKind::Job,
                Some("en".to_string()),
                None,
                None,
            )
            .unwrap();

        Matcher::new(store)
    }

    fn python_job() -> JobDescription {
        JobDescription {
            title: "Python Developer".to_string(),
            description: "Build backend services with python and sql.".to_string(),
            skills: vec!["python".to_string(), "sql".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_results_sorted_descending_with_ranks() {
        let dir = tempfile::tempdir().unwrap();
        let matcher = matcher_with_fixtures(dir.path());

        let results = matcher.find_matching_resumes(&python_job(), 5, 0.0).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].similarity_score >= results[1].similarity_score);
        assert_eq!(results[0].rank, 1);
        assert_eq!(results[1].rank, 2);
        assert_eq!(results[0].document_id, "r-python");
    }

    #[test]
    fn test_kind_filter_excludes_jobs_from_resume_search() {
        let dir = tempfile::tempdir().unwrap();
        let matcher = matcher_with_fixtures(dir.path());

        let results = matcher.find_matching_resumes(&python_job(), 10, 0.0).unwrap();
        assert!(results.iter().all(|r| r.metadata.kind == DocumentKind::Resume));
    }

    #[test]
    fn test_min_score_is_monotonic() {
        let dir = tempfile::tempdir().unwrap();
        let matcher = matcher_with_fixtures(dir.path());
        let job = python_job();

        let loose = matcher.find_matching_resumes(&job, 10, 0.0).unwrap();
        let strict = matcher.find_matching_resumes(&job, 10, 0.9).unwrap();
        assert!(strict.len() <= loose.len());
        assert!(strict.iter().all(|r| r.similarity_score >= 0.9));
    }

    #[test]
    fn test_scores_within_unit_interval() {
        let dir = tempfile::tempdir().unwrap();
        let matcher = matcher_with_fixtures(dir.path());

        let results = matcher
            .find_matching_jobs("python developer with sql", 10, 0.0)
            .unwrap();
        assert!(!results.is_empty());
        for result in &results {
            assert!(result.similarity_score >= 0.0);
            assert!(result.similarity_score <= 1.0);
        }
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(round4(1.0), 1.0);
    }
}
