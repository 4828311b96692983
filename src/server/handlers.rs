//! Request handlers

use crate::error::ScreenerError;
use crate::pipeline::record::JobDescription;
use crate::server::{AppError, AppState};
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CandidateResponse {
    pub resume_id: String,
    pub resume_snippet: String,
    pub score: f32,
    pub interview_questions: String,
    pub language: Option<String>,
    pub contact_info: ContactInfo,
}

#[derive(Debug, Serialize)]
pub struct MatchCandidatesResponse {
    pub success: bool,
    pub job_title: String,
    pub candidates: Vec<CandidateResponse>,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Match a job against the indexed resumes and generate interview questions
/// for every hit concurrently. Question failures degrade to placeholder text
/// per candidate; the match list itself is unaffected.
pub async fn match_candidates(
    State(state): State<AppState>,
    Json(job): Json<JobDescription>,
) -> Result<Json<MatchCandidatesResponse>, AppError> {
    if job.title.trim().is_empty() {
        return Err(ScreenerError::DataValidation {
            field: "title".to_string(),
            message: "job title must not be empty".to_string(),
        }
        .into());
    }

    let results = state.matcher.find_matching_resumes(
        &job,
        state.config.matching.top_k,
        state.config.matching.min_score,
    )?;
    log::info!(
        "match-candidates: {} hit(s) for '{}'",
        results.len(),
        job.title
    );

    let texts: Vec<String> = results.iter().map(|r| r.text.clone()).collect();
    let outcomes = state.questions.generate_all(&job.title, &texts).await;

    let snippet_chars = state.config.generation.max_snippet_chars;
    let candidates = results
        .into_iter()
        .zip(outcomes)
        .map(|(result, outcome)| {
            let (email, phone) = state.extractor.contact_info(&result.text);
            CandidateResponse {
                resume_id: result.document_id,
                resume_snippet: crate::generation::prompts::truncate_snippet(
                    &result.text,
                    snippet_chars,
                ),
                score: result.similarity_score,
                interview_questions: outcome.text(),
                language: result.metadata.language,
                contact_info: ContactInfo { email, phone },
            }
        })
        .collect();

    Ok(Json(MatchCandidatesResponse {
        success: true,
        job_title: job.title,
        candidates,
    }))
}

/// Accept a resume upload (field `resume_file`, .pdf or .txt), run it
/// through the full ingestion pipeline and index it.
pub async fn upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError(ScreenerError::InvalidInput(format!(
            "malformed multipart body: {}",
            e
        )))
    })? {
        if field.name() == Some("resume_file") {
            let filename = field.file_name().unwrap_or("resume.txt").to_string();
            let bytes = field.bytes().await.map_err(|e| {
                AppError(ScreenerError::InvalidInput(format!(
                    "failed to read upload: {}",
                    e
                )))
            })?;
            upload = Some((filename, bytes.to_vec()));
        }
    }

    let (filename, bytes) = upload.ok_or_else(|| {
        AppError(ScreenerError::InvalidInput(
            "missing multipart field: resume_file".to_string(),
        ))
    })?;

    let text = extract_upload_text(&filename, &bytes)?;
    let id = format!("uploaded_{}", file_stem(&filename));
    let record = state.pipeline.ingest_text(&id, &text).await?;

    Ok(Json(json!({
        "success": true,
        "filename": filename,
        "resume_id": record.id,
        "message": format!(
            "Resume processed and indexed (detected language: {})",
            record.original_language
        ),
    })))
}

fn extract_upload_text(filename: &str, bytes: &[u8]) -> Result<String, AppError> {
    let lower = filename.to_lowercase();
    if lower.ends_with(".pdf") {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            AppError(ScreenerError::InvalidInput(format!(
                "failed to extract text from PDF: {}",
                e
            )))
        })
    } else if lower.ends_with(".txt") {
        String::from_utf8(bytes.to_vec()).map_err(|_| {
            AppError(ScreenerError::InvalidInput(
                "text file is not valid UTF-8".to_string(),
            ))
        })
    } else {
        Err(AppError(ScreenerError::InvalidInput(format!(
            "unsupported file type: {} (expected .pdf or .txt)",
            filename
        ))))
    }
}

fn file_stem(filename: &str) -> String {
    std::path::Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("resume")
        .to_string()
}
