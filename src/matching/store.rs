//! JSON-backed vector store with in-memory search
//!
//! The whole index lives in memory and is rewritten to disk after every
//! mutation. Search is a linear scan over cosine distances, which is the
//! right trade at the collection sizes a screening run produces.

use crate::error::{Result, ScreenerError};
use crate::matching::embedder::{cosine_distance, Embedder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    Job,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Resume => write!(f, "resume"),
            DocumentKind::Job => write!(f, "job"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub kind: DocumentKind,
    /// ISO 639-1 code of the source document, before any translation.
    pub language: Option<String>,
    pub extraction_confidence: Option<f32>,
    /// Originating file name or upload handle, when known.
    pub source: Option<String>,
    pub text_length: usize,
    pub indexed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: String,
    pub text: String,
    pub embedding: Vec<f32>,
    pub metadata: DocumentMetadata,
}

/// Narrow a query to documents matching every set field.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub kind: Option<DocumentKind>,
    pub language: Option<String>,
}

impl DocumentFilter {
    pub fn kind(kind: DocumentKind) -> Self {
        Self {
            kind: Some(kind),
            language: None,
        }
    }

    fn matches(&self, metadata: &DocumentMetadata) -> bool {
        if let Some(kind) = self.kind {
            if metadata.kind != kind {
                return false;
            }
        }
        if let Some(language) = &self.language {
            if metadata.language.as_deref() != Some(language.as_str()) {
                return false;
            }
        }
        true
    }
}

/// A query hit: the stored document plus its cosine distance to the query.
#[derive(Debug, Clone)]
pub struct QueryHit {
    pub document: StoredDocument,
    pub distance: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub total_documents: usize,
    pub resumes: usize,
    pub jobs: usize,
    pub path: PathBuf,
}

#[derive(Serialize, Deserialize, Default)]
struct StoreFile {
    documents: BTreeMap<String, StoredDocument>,
}

pub struct VectorStore {
    path: PathBuf,
    embedder: Arc<dyn Embedder>,
    min_text_length: usize,
    inner: Mutex<BTreeMap<String, StoredDocument>>,
}

impl VectorStore {
    /// Open the store at `path`, loading any existing index file.
    pub fn open(path: &Path, embedder: Arc<dyn Embedder>, min_text_length: usize) -> Result<Self> {
        let documents = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let file: StoreFile = serde_json::from_str(&content)?;
            log::info!(
                "loaded vector store with {} documents from {}",
                file.documents.len(),
                path.display()
            );
            file.documents
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            embedder,
            min_text_length,
            inner: Mutex::new(documents),
        })
    }

    /// Insert or replace a document. Embedding happens outside the lock;
    /// re-upserting the same id overwrites the previous entry wholesale.
    pub fn upsert(
        &self,
        id: &str,
        text: &str,
        kind: DocumentKind,
        language: Option<String>,
        extraction_confidence: Option<f32>,
        source: Option<String>,
    ) -> Result<()> {
        if text.trim().len() < self.min_text_length {
            return Err(ScreenerError::DataValidation {
                field: "text".to_string(),
                message: format!(
                    "document {} has {} characters, minimum is {}",
                    id,
                    text.trim().len(),
                    self.min_text_length
                ),
            });
        }

        let embedding = self.embedder.embed(text)?;
        let document = StoredDocument {
            id: id.to_string(),
            text: text.to_string(),
            embedding,
            metadata: DocumentMetadata {
                kind,
                language,
                extraction_confidence,
                source,
                text_length: text.len(),
                indexed_at: Utc::now(),
            },
        };

        {
            let mut inner = self.inner.lock().expect("vector store poisoned");
            inner.insert(id.to_string(), document);
        }
        self.persist()
    }

    /// Return up to `k` documents passing `filter`, ordered by ascending
    /// cosine distance to `text`. An empty or fully filtered store yields an
    /// empty vec, never an error.
    pub fn query(&self, text: &str, k: usize, filter: &DocumentFilter) -> Result<Vec<QueryHit>> {
        let query_embedding = self.embedder.embed(text)?;
        Ok(self.query_by_vector(&query_embedding, k, filter))
    }

    pub fn query_by_vector(
        &self,
        query_embedding: &[f32],
        k: usize,
        filter: &DocumentFilter,
    ) -> Vec<QueryHit> {
        let inner = self.inner.lock().expect("vector store poisoned");
        let mut hits: Vec<QueryHit> = inner
            .values()
            .filter(|doc| filter.matches(&doc.metadata))
            .map(|doc| QueryHit {
                distance: cosine_distance(query_embedding, &doc.embedding),
                document: doc.clone(),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);
        hits
    }

    pub fn get(&self, id: &str) -> Option<StoredDocument> {
        self.inner
            .lock()
            .expect("vector store poisoned")
            .get(id)
            .cloned()
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        let removed = {
            let mut inner = self.inner.lock().expect("vector store poisoned");
            inner.remove(id).is_some()
        };
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Remove all documents, optionally only those of one kind.
    pub fn clear(&self, kind: Option<DocumentKind>) -> Result<usize> {
        let removed = {
            let mut inner = self.inner.lock().expect("vector store poisoned");
            match kind {
                Some(kind) => {
                    let before = inner.len();
                    inner.retain(|_, doc| doc.metadata.kind != kind);
                    before - inner.len()
                }
                None => {
                    let count = inner.len();
                    inner.clear();
                    count
                }
            }
        };
        if removed > 0 {
            self.persist()?;
        }
        Ok(removed)
    }

    pub fn count(&self, filter: &DocumentFilter) -> usize {
        self.inner
            .lock()
            .expect("vector store poisoned")
            .values()
            .filter(|doc| filter.matches(&doc.metadata))
            .count()
    }

    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.lock().expect("vector store poisoned");
        let resumes = inner
            .values()
            .filter(|d| d.metadata.kind == DocumentKind::Resume)
            .count();
        StoreStats {
            total_documents: inner.len(),
            resumes,
            jobs: inner.len() - resumes,
            path: self.path.clone(),
        }
    }

    /// Write the index atomically: serialize to a sibling temp file, then
    /// rename over the live file.
    fn persist(&self) -> Result<()> {
        let snapshot = {
            let inner = self.inner.lock().expect("vector store poisoned");
            serde_json::to_vec(&StoreFile {
                documents: inner.clone(),
            })?
        };

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&snapshot)?;
        tmp.persist(&self.path)
            .map_err(|e| ScreenerError::Io(e.error))?;
        Ok(())
    }
}
