//! Multilingual resume screening: language detection, translation,
//! structured extraction, semantic matching and interview question
//! generation over a local vector store.

pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod inference;
pub mod matching;
pub mod output;
pub mod pipeline;
pub mod server;

pub use config::Config;
pub use error::{Result, ScreenerError};
