//! Translation of non-English resumes to English
//!
//! Translation is best-effort by design: a backend failure degrades to the
//! original text so the rest of the pipeline keeps working on untranslated
//! input. The outcome enum makes the three cases explicit at call sites
//! instead of hiding them behind exception flow.

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A loaded per-language translation model. Implementations are stateless
/// with respect to their weights and shared across concurrent callers.
#[async_trait]
pub trait TranslationModel: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String>;
    fn model_id(&self) -> &str;
}

/// Produces a model for a source language on first use.
pub trait TranslationModelLoader: Send + Sync {
    fn load(&self, language: &str) -> Result<Arc<dyn TranslationModel>>;
}

/// Lazily-initialized, thread-safe cache of loaded translation models.
/// First use of a language pays the load cost; later calls reuse the cached
/// instance for the lifetime of the registry.
pub struct ModelRegistry {
    loader: Box<dyn TranslationModelLoader>,
    loaded: Mutex<HashMap<String, Arc<dyn TranslationModel>>>,
}

impl ModelRegistry {
    pub fn new(loader: Box<dyn TranslationModelLoader>) -> Self {
        Self {
            loader,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    pub fn get_or_load(&self, language: &str) -> Result<Arc<dyn TranslationModel>> {
        let mut loaded = self.loaded.lock().expect("translation registry poisoned");
        if let Some(model) = loaded.get(language) {
            log::debug!("using cached translation model for {}", language);
            return Ok(Arc::clone(model));
        }

        log::info!("loading translation model for language: {}", language);
        let model = self.loader.load(language)?;
        loaded.insert(language.to_string(), Arc::clone(&model));
        Ok(model)
    }

    /// Drop all cached models. Exists so tests can reset lifetime state.
    pub fn reset(&self) {
        self.loaded
            .lock()
            .expect("translation registry poisoned")
            .clear();
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded
            .lock()
            .expect("translation registry poisoned")
            .len()
    }
}

/// Result of a translation attempt. `Degraded` carries the reason but the
/// caller still uses the original text.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationOutcome {
    Translated {
        text: String,
        source_language: String,
    },
    /// Source language is not in the supported set (including English);
    /// input is used unchanged.
    PassThrough { source_language: String },
    /// Model load or inference failed; input is used unchanged.
    Degraded {
        source_language: String,
        reason: String,
    },
}

impl TranslationOutcome {
    /// Text to continue the pipeline with.
    pub fn canonical_text<'a>(&'a self, original: &'a str) -> &'a str {
        match self {
            TranslationOutcome::Translated { text, .. } => text,
            TranslationOutcome::PassThrough { .. } | TranslationOutcome::Degraded { .. } => {
                original
            }
        }
    }

    pub fn source_language(&self) -> &str {
        match self {
            TranslationOutcome::Translated {
                source_language, ..
            }
            | TranslationOutcome::PassThrough { source_language }
            | TranslationOutcome::Degraded {
                source_language, ..
            } => source_language,
        }
    }

    pub fn was_translated(&self) -> bool {
        matches!(self, TranslationOutcome::Translated { .. })
    }
}

pub struct TranslationService {
    registry: ModelRegistry,
    supported: Vec<String>,
}

impl TranslationService {
    pub fn new(loader: Box<dyn TranslationModelLoader>, supported: Vec<String>) -> Self {
        Self {
            registry: ModelRegistry::new(loader),
            supported,
        }
    }

    pub fn is_supported(&self, language: &str) -> bool {
        self.supported.iter().any(|l| l == language)
    }

    pub fn supported_languages(&self) -> &[String] {
        &self.supported
    }

    /// Translate `text` from `source_language` to English.
    ///
    /// Unsupported languages pass through unchanged; backend failures degrade
    /// to the original text with a warning. This method never fails.
    pub async fn translate(&self, text: &str, source_language: &str) -> TranslationOutcome {
        if !self.is_supported(source_language) {
            log::debug!(
                "language {} not supported for translation, passing through",
                source_language
            );
            return TranslationOutcome::PassThrough {
                source_language: source_language.to_string(),
            };
        }

        let model = match self.registry.get_or_load(source_language) {
            Ok(model) => model,
            Err(e) => {
                log::warn!(
                    "translation model for {} unavailable, using original text: {}",
                    source_language,
                    e
                );
                return TranslationOutcome::Degraded {
                    source_language: source_language.to_string(),
                    reason: e.to_string(),
                };
            }
        };

        match model.translate(text).await {
            Ok(translated) => TranslationOutcome::Translated {
                text: translated,
                source_language: source_language.to_string(),
            },
            Err(e) => {
                log::warn!(
                    "translation via {} failed, using original text: {}",
                    model.model_id(),
                    e
                );
                TranslationOutcome::Degraded {
                    source_language: source_language.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Test-reset hook for the underlying model cache.
    pub fn reset_models(&self) {
        self.registry.reset();
    }

    pub fn loaded_model_count(&self) -> usize {
        self.registry.loaded_count()
    }
}
