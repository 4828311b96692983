//! Embedding, storage and semantic matching

pub mod embedder;
pub mod matcher;
pub mod store;

pub use embedder::{Embedder, Model2VecEmbedder};
pub use matcher::{MatchResult, Matcher};
pub use store::{DocumentFilter, DocumentKind, StoredDocument, VectorStore};
