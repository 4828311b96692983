//! Configuration management for the resume screener

use crate::error::{Result, ScreenerError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub processing: ProcessingConfig,
    pub matching: MatchingConfig,
    pub generation: GenerationConfig,
    pub data: DataConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    /// Model2Vec model used for all document embeddings. Local directory
    /// under `models_dir` wins; otherwise treated as a Hugging Face repo id.
    pub embedding_model: String,
    /// Base URL of the text2text inference server backing translation and
    /// question generation.
    pub inference_endpoint: String,
    pub generation_model: String,
    /// Source languages with a dedicated opus-mt-{lang}-en translation model.
    pub supported_languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub min_text_length: usize,
    pub max_text_length: usize,
    /// Minimum confidence for a skill mention to be retained.
    pub confidence_threshold: f32,
    /// Entity recognition only looks at this many leading characters.
    pub ner_window: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub store_path: PathBuf,
    pub top_k: usize,
    pub min_score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub timeout_secs: u64,
    pub max_snippet_chars: usize,
    pub max_new_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub resumes_dir: PathBuf,
    pub jobs_dir: PathBuf,
    pub parsed_dir: PathBuf,
    pub match_results_dir: PathBuf,
    pub questions_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let app_dir = home.join(".resume-screener");

        Self {
            models: ModelConfig {
                models_dir: app_dir.join("models"),
                embedding_model: "minishlab/M2V_base_output".to_string(),
                inference_endpoint: "http://127.0.0.1:8085".to_string(),
                generation_model: "flan-t5-base".to_string(),
                supported_languages: vec![
                    "fr".to_string(),
                    "es".to_string(),
                    "de".to_string(),
                ],
            },
            processing: ProcessingConfig {
                min_text_length: 50,
                max_text_length: 50_000,
                confidence_threshold: 0.7,
                ner_window: 1000,
            },
            matching: MatchingConfig {
                store_path: app_dir.join("data").join("vector_store.json"),
                top_k: 5,
                min_score: 0.5,
            },
            generation: GenerationConfig {
                timeout_secs: 30,
                max_snippet_chars: 1000,
                max_new_tokens: 256,
                temperature: 0.7,
            },
            data: DataConfig {
                resumes_dir: PathBuf::from("data/resumes"),
                jobs_dir: PathBuf::from("data/job_descriptions"),
                parsed_dir: PathBuf::from("data/parsed_resumes"),
                match_results_dir: PathBuf::from("data/match_results"),
                questions_dir: PathBuf::from("data/interview_questions"),
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                ScreenerError::Configuration(format!("Failed to parse config: {}", e))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ScreenerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-screener")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.processing.confidence_threshold) {
            return Err(ScreenerError::DataValidation {
                field: "processing.confidence_threshold".to_string(),
                message: "must be between 0 and 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.matching.min_score) {
            return Err(ScreenerError::DataValidation {
                field: "matching.min_score".to_string(),
                message: "must be between 0 and 1".to_string(),
            });
        }
        if self.processing.min_text_length == 0 {
            return Err(ScreenerError::DataValidation {
                field: "processing.min_text_length".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Translation model id for a supported source language.
    pub fn translation_model_id(&self, language: &str) -> String {
        format!("opus-mt-{}-en", language)
    }

    pub fn ensure_data_dirs(&self) -> Result<()> {
        for dir in [
            &self.data.parsed_dir,
            &self.data.match_results_dir,
            &self.data.questions_dir,
        ] {
            std::fs::create_dir_all(dir)?;
        }
        if let Some(parent) = self.matching.store_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}
