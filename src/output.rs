//! Result artifacts and console reporting

use crate::error::Result;
use crate::generation::generator::QuestionOutcome;
use crate::matching::matcher::MatchResult;
use crate::matching::store::DocumentMetadata;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One ranked candidate in a persisted match result file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchArtifact {
    pub rank: usize,
    pub resume_id: String,
    pub score: f32,
    pub resume_snippet: String,
    pub language: Option<String>,
}

/// Interview questions for one job/resume pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub job_title: String,
    pub resume_id: String,
    pub resume_snippet: String,
    pub interview_questions: String,
}

/// Turn a job title into a filesystem-safe stem: alphanumerics, spaces and
/// underscores survive, then spaces become underscores.
pub fn safe_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_')
        .collect::<String>()
        .replace(' ', "_")
}

fn snippet_of(text: &str, max_chars: usize) -> String {
    crate::generation::prompts::truncate_snippet(text, max_chars)
}

/// Write one `matches_{title}.json` artifact for a job's ranked candidates.
pub fn write_match_results(
    dir: &Path,
    job_title: &str,
    results: &[MatchResult],
    snippet_chars: usize,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let artifacts: Vec<MatchArtifact> = results
        .iter()
        .map(|r| MatchArtifact {
            rank: r.rank,
            resume_id: r.document_id.clone(),
            score: r.similarity_score,
            resume_snippet: snippet_of(&r.text, snippet_chars),
            language: r.metadata.language.clone(),
        })
        .collect();

    let path = dir.join(format!("matches_{}.json", safe_title(job_title)));
    std::fs::write(&path, serde_json::to_string_pretty(&artifacts)?)?;
    Ok(path)
}

/// Write one `questions_{title}.json` artifact pairing each candidate with
/// its generated questions. `results` and `outcomes` line up by index.
pub fn write_interview_questions(
    dir: &Path,
    job_title: &str,
    results: &[MatchResult],
    outcomes: &[QuestionOutcome],
    snippet_chars: usize,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let records: Vec<QuestionRecord> = results
        .iter()
        .zip(outcomes.iter())
        .map(|(result, outcome)| QuestionRecord {
            job_title: job_title.to_string(),
            resume_id: result.document_id.clone(),
            resume_snippet: snippet_of(&result.text, snippet_chars),
            interview_questions: outcome.text(),
        })
        .collect();

    let path = dir.join(format!("questions_{}.json", safe_title(job_title)));
    std::fs::write(&path, serde_json::to_string_pretty(&records)?)?;
    Ok(path)
}

pub fn print_match_results(job_title: &str, results: &[MatchResult]) {
    println!("\n{} {}", "Matches for:".bold(), job_title.cyan().bold());
    if results.is_empty() {
        println!("  {}", "no resumes above the score threshold".yellow());
        return;
    }

    for result in results {
        println!(
            "  {} {} {}",
            format!("{}.", result.rank).bold(),
            result.document_id.green(),
            format!("(score {:.4})", result.similarity_score).dimmed()
        );
        print_metadata_line(&result.metadata);
    }
}

fn print_metadata_line(metadata: &DocumentMetadata) {
    let language = metadata.language.as_deref().unwrap_or("unknown");
    let confidence = metadata
        .extraction_confidence
        .map(|c| format!("{:.2}", c))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "     {}",
        format!("language: {}, extraction confidence: {}", language, confidence).dimmed()
    );
}

pub fn print_question_outcomes(job_title: &str, results: &[MatchResult], outcomes: &[QuestionOutcome]) {
    println!(
        "\n{} {}",
        "Interview questions for:".bold(),
        job_title.cyan().bold()
    );
    for (result, outcome) in results.iter().zip(outcomes.iter()) {
        let marker = if outcome.is_generated() {
            "ok".green()
        } else {
            "failed".red()
        };
        println!("  {} [{}]", result.document_id.green(), marker);
        for line in outcome.text().lines() {
            println!("     {}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::store::{DocumentKind, DocumentMetadata};
    use chrono::Utc;

    fn fixture_result(id: &str, rank: usize, score: f32) -> MatchResult {
        MatchResult {
            document_id: id.to_string(),
            similarity_score: score,
            rank,
            text: "python developer resume text".to_string(),
            metadata: DocumentMetadata {
                kind: DocumentKind::Resume,
                language: Some("en".to_string()),
                extraction_confidence: Some(0.74),
                source: None,
                text_length: 28,
                indexed_at: Utc::now(),
            },
        }
    }

    #[test]
    fn test_safe_title() {
        assert_eq!(safe_title("Data Analyst"), "Data_Analyst");
        assert_eq!(safe_title("C++ / Systems (Sr.)"), "C__Systems_Sr");
        assert_eq!(safe_title("already_safe"), "already_safe");
    }

    #[test]
    fn test_write_match_results_creates_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let results = vec![fixture_result("r1", 1, 0.91)];

        let path = write_match_results(dir.path(), "Data Analyst", &results, 100).unwrap();
        assert!(path.ends_with("matches_Data_Analyst.json"));

        let content = std::fs::read_to_string(&path).unwrap();
        let artifacts: Vec<MatchArtifact> = serde_json::from_str(&content).unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].resume_id, "r1");
        assert_eq!(artifacts[0].rank, 1);
    }

    #[test]
    fn test_write_questions_pairs_results_with_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let results = vec![fixture_result("r1", 1, 0.91), fixture_result("r2", 2, 0.85)];
        let outcomes = vec![
            QuestionOutcome::Generated("1. Why Rust?".to_string()),
            QuestionOutcome::TimedOut,
        ];

        let path =
            write_interview_questions(dir.path(), "Data Analyst", &results, &outcomes, 100)
                .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let records: Vec<QuestionRecord> = serde_json::from_str(&content).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].interview_questions, "1. Why Rust?");
        assert!(records[1].interview_questions.contains("timed out"));
    }
}
