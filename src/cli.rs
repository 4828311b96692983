//! Command line interface definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-screener")]
#[command(about = "Multilingual resume screening, semantic matching and interview questions")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest resumes from a directory into the vector store
    Ingest {
        /// Directory of .txt and .pdf resumes (defaults to the configured
        /// resumes directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Match job descriptions against indexed resumes
    Match {
        /// Directory of job description JSON files
        #[arg(short, long)]
        jobs_dir: Option<PathBuf>,

        /// Maximum candidates per job
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Minimum similarity score to keep
        #[arg(short, long)]
        min_score: Option<f32>,
    },
    /// Match jobs and generate interview questions per candidate
    Questions {
        /// Directory of job description JSON files
        #[arg(short, long)]
        jobs_dir: Option<PathBuf>,

        /// Maximum candidates per job
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
    /// Run the web API
    Serve {
        /// Port override
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show vector store statistics
    Stats,
    /// Remove indexed documents
    Clear {
        /// Restrict removal to one document kind
        #[arg(long, value_enum)]
        kind: Option<ClearKind>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ClearKind {
    Resumes,
    Jobs,
}
