//! Error handling for the resume screener

use thiserror::Error;

/// Pipeline stage a resume was in when processing failed. Translation and
/// extraction have no variant here: translation degrades to pass-through and
/// extraction leaves fields empty, so neither stage raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Validate,
    Detect,
    Embed,
    Store,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStage::Validate => "validate",
            PipelineStage::Detect => "detect",
            PipelineStage::Embed => "embed",
            PipelineStage::Store => "store",
        };
        write!(f, "{}", name)
    }
}

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Resume {resume_id} failed at stage {stage}: {message}")]
    ResumeProcessing {
        resume_id: String,
        stage: PipelineStage,
        message: String,
    },

    #[error("Language detection failed: {message}")]
    LanguageDetection { message: String },

    #[error("Model {model} failed to load: {message}")]
    ModelLoading { model: String, message: String },

    #[error("Validation failed for {field}: {message}")]
    DataValidation { field: String, message: String },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ScreenerError>;

/// Convert anyhow errors (surfaced by model backends) to our error type
impl From<anyhow::Error> for ScreenerError {
    fn from(err: anyhow::Error) -> Self {
        ScreenerError::Inference(err.to_string())
    }
}

impl From<reqwest::Error> for ScreenerError {
    fn from(err: reqwest::Error) -> Self {
        ScreenerError::Inference(err.to_string())
    }
}
