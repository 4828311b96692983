//! Interview question generation

pub mod generator;
pub mod prompts;

pub use generator::{QuestionGenerator, QuestionOutcome, TextGenerator};
