//! Document embeddings via Model2Vec static models

use crate::error::{Result, ScreenerError};
use model2vec_rs::model::StaticModel;
use std::path::{Path, PathBuf};

/// Embedding backend behind the vector store. The store and matcher only
/// depend on this trait, so tests can substitute a deterministic embedder.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn model_id(&self) -> &str;
}

pub struct Model2VecEmbedder {
    model: StaticModel,
    model_id: String,
}

impl Model2VecEmbedder {
    /// Load the embedding model. A directory named after the model under
    /// `models_dir` takes precedence; otherwise the id is passed through as
    /// a Hugging Face repo id.
    pub fn load(models_dir: &Path, model_id: &str) -> Result<Self> {
        let path = Self::resolve_path(models_dir, model_id);
        log::info!("loading embedding model from: {}", path.display());

        let model =
            StaticModel::from_pretrained(&path, None, None, None).map_err(|e| {
                ScreenerError::ModelLoading {
                    model: model_id.to_string(),
                    message: e.to_string(),
                }
            })?;

        Ok(Self {
            model,
            model_id: model_id.to_string(),
        })
    }

    fn resolve_path(models_dir: &Path, model_id: &str) -> PathBuf {
        let dir_name = model_id.replace('/', "_");
        let local = models_dir.join(dir_name);
        if local.exists() {
            local
        } else {
            PathBuf::from(model_id)
        }
    }
}

impl Embedder for Model2VecEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(ScreenerError::Embedding(
                "cannot embed empty text".to_string(),
            ));
        }

        let embedding = self.model.encode_single(text);
        if embedding.is_empty() {
            return Err(ScreenerError::Embedding(
                "model returned an empty embedding".to_string(),
            ));
        }
        Ok(embedding)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Cosine distance in [0, 2]; 0 means identical direction.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_similarity(a, b)
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
