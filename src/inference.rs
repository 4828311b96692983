//! HTTP client for the text2text inference server
//!
//! Translation and question generation both go through this client; the
//! models behind it are opaque and the rest of the crate only sees strings
//! in, strings out. No other module talks to the inference server directly.

use crate::error::{Result, ScreenerError};
use crate::generation::generator::TextGenerator;
use crate::pipeline::translation::{TranslationModel, TranslationModelLoader};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const CLIENT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    model: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translated_text: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    inputs: &'a str,
    max_new_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

#[derive(Clone)]
pub struct InferenceClient {
    client: Client,
    base_url: String,
}

impl InferenceClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(CLIENT_TIMEOUT)
            .build()
            .map_err(|e| {
                ScreenerError::Configuration(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn translate(&self, model: &str, text: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/v1/translate", self.base_url))
            .json(&TranslateRequest { model, text })
            .send()
            .await?;

        let body: TranslateResponse = Self::decode(model, response).await?;
        Ok(body.translated_text)
    }

    pub async fn generate(
        &self,
        model: &str,
        inputs: &str,
        max_new_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/v1/generate", self.base_url))
            .json(&GenerateRequest {
                model,
                inputs,
                max_new_tokens,
                temperature,
            })
            .send()
            .await?;

        let body: GenerateResponse = Self::decode(model, response).await?;
        Ok(body.generated_text)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        model: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ScreenerError::ModelLoading {
                model: model.to_string(),
                message: "inference server does not have this model".to_string(),
            });
        }
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|e| e.error)
                .unwrap_or_else(|| format!("inference server returned {}", status));
            return Err(ScreenerError::Inference(message));
        }

        let body = response.json::<T>().await?;
        Ok(body)
    }
}

/// Translation model backed by a named model on the inference server.
pub struct RemoteTranslationModel {
    client: InferenceClient,
    model_id: String,
}

#[async_trait]
impl TranslationModel for RemoteTranslationModel {
    async fn translate(&self, text: &str) -> Result<String> {
        log::debug!("translating {} chars via {}", text.len(), self.model_id);
        self.client.translate(&self.model_id, text).await
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Loader producing one remote opus-mt-{lang}-en model per source language.
pub struct RemoteModelLoader {
    client: InferenceClient,
}

impl RemoteModelLoader {
    pub fn new(client: InferenceClient) -> Self {
        Self { client }
    }
}

impl TranslationModelLoader for RemoteModelLoader {
    fn load(&self, language: &str) -> Result<Arc<dyn TranslationModel>> {
        Ok(Arc::new(RemoteTranslationModel {
            client: self.client.clone(),
            model_id: format!("opus-mt-{}-en", language),
        }))
    }
}

/// Question generation backend on the inference server.
pub struct RemoteGenerator {
    client: InferenceClient,
    model_id: String,
    max_new_tokens: u32,
    temperature: f32,
}

impl RemoteGenerator {
    pub fn new(
        client: InferenceClient,
        model_id: &str,
        max_new_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            client,
            model_id: model_id.to_string(),
            max_new_tokens,
            temperature,
        }
    }
}

#[async_trait]
impl TextGenerator for RemoteGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.client
            .generate(&self.model_id, prompt, self.max_new_tokens, self.temperature)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_normalized() {
        let client = InferenceClient::new("http://127.0.0.1:8085/").unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:8085");
    }

    #[test]
    fn test_loader_names_models_per_language() {
        let client = InferenceClient::new("http://127.0.0.1:8085").unwrap();
        let loader = RemoteModelLoader::new(client);
        let model = loader.load("fr").unwrap();
        assert_eq!(model.model_id(), "opus-mt-fr-en");
    }
}
