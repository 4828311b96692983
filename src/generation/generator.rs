//! Interview question generation with per-candidate timeouts
//!
//! One slow or failing candidate must not sink the batch: each generation
//! runs under its own timeout and resolves to an explicit outcome, and the
//! batch fan-out preserves input order regardless of completion order.

use crate::error::Result;
use crate::generation::prompts::{question_prompt, truncate_snippet};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Text2text generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// How one candidate's generation resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionOutcome {
    Generated(String),
    TimedOut,
    Failed(String),
}

impl QuestionOutcome {
    /// User-facing text for this outcome; failures surface as placeholder
    /// strings rather than errors so a batch result is always complete.
    pub fn text(&self) -> String {
        match self {
            QuestionOutcome::Generated(text) => text.clone(),
            QuestionOutcome::TimedOut => {
                "Interview questions generation timed out. Please try again.".to_string()
            }
            QuestionOutcome::Failed(message) => {
                format!("Error generating questions: {}", message)
            }
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, QuestionOutcome::Generated(_))
    }
}

pub struct QuestionGenerator {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
    max_snippet_chars: usize,
}

impl QuestionGenerator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        timeout_secs: u64,
        max_snippet_chars: usize,
    ) -> Self {
        Self {
            generator,
            timeout: Duration::from_secs(timeout_secs),
            max_snippet_chars,
        }
    }

    /// Generate questions for a single job/resume pair, bounded by the
    /// configured timeout. Never returns an error.
    pub async fn generate(&self, job_title: &str, resume_text: &str) -> QuestionOutcome {
        if job_title.trim().is_empty() {
            return QuestionOutcome::Failed("job title is empty".to_string());
        }
        if resume_text.trim().is_empty() {
            return QuestionOutcome::Failed("resume text is empty".to_string());
        }

        let snippet = truncate_snippet(resume_text, self.max_snippet_chars);
        let prompt = question_prompt(job_title, &snippet);

        match tokio::time::timeout(self.timeout, self.generator.generate(&prompt)).await {
            Ok(Ok(text)) => QuestionOutcome::Generated(text.trim().to_string()),
            Ok(Err(e)) => {
                log::warn!("question generation failed for '{}': {}", job_title, e);
                QuestionOutcome::Failed(e.to_string())
            }
            Err(_) => {
                log::warn!(
                    "question generation for '{}' exceeded {:?}",
                    job_title,
                    self.timeout
                );
                QuestionOutcome::TimedOut
            }
        }
    }

    /// Generate questions for all candidates concurrently. The returned
    /// outcomes line up with `resume_texts` by index.
    pub async fn generate_all(
        self: &Arc<Self>,
        job_title: &str,
        resume_texts: &[String],
    ) -> Vec<QuestionOutcome> {
        let mut set = JoinSet::new();
        for (idx, resume_text) in resume_texts.iter().enumerate() {
            let this = Arc::clone(self);
            let job_title = job_title.to_string();
            let resume_text = resume_text.clone();
            set.spawn(async move { (idx, this.generate(&job_title, &resume_text).await) });
        }

        let mut outcomes: Vec<QuestionOutcome> =
            vec![QuestionOutcome::Failed("task panicked".to_string()); resume_texts.len()];
        while let Some(joined) = set.join_next().await {
            if let Ok((idx, outcome)) = joined {
                outcomes[idx] = outcome;
            }
        }
        outcomes
    }
}
