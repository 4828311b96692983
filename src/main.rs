//! Binary entry point

use clap::Parser;
use colored::Colorize;
use resume_screener::cli::{Cli, ClearKind, Commands};
use resume_screener::config::Config;
use resume_screener::error::{Result, ScreenerError};
use resume_screener::generation::generator::QuestionGenerator;
use resume_screener::inference::{InferenceClient, RemoteGenerator, RemoteModelLoader};
use resume_screener::matching::embedder::Model2VecEmbedder;
use resume_screener::matching::matcher::Matcher;
use resume_screener::matching::store::{DocumentKind, VectorStore};
use resume_screener::output;
use resume_screener::pipeline::extraction::FieldExtractor;
use resume_screener::pipeline::ingest::IngestPipeline;
use resume_screener::pipeline::language::LanguageDetector;
use resume_screener::pipeline::record::JobDescription;
use resume_screener::pipeline::translation::TranslationService;
use resume_screener::server::{build_router, AppState};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_secs()
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Ingest { dir } => {
            config.ensure_data_dirs()?;
            let store = open_store(&config)?;
            let pipeline = build_pipeline(&config, Arc::clone(&store))?;

            let resumes_dir = dir.unwrap_or_else(|| config.data.resumes_dir.clone());
            let report = pipeline
                .ingest_directory(&resumes_dir, &config.data.parsed_dir)
                .await?;

            println!(
                "{} {}/{} resumes indexed",
                "done:".green().bold(),
                report.processed,
                report.total()
            );
            for failure in &report.failures {
                println!("  {} {}: {}", "skipped".yellow(), failure.id, failure.error);
            }
        }

        Commands::Match {
            jobs_dir,
            top_k,
            min_score,
        } => {
            config.ensure_data_dirs()?;
            let store = open_store(&config)?;
            let matcher = Matcher::new(store);

            let jobs = read_jobs(&jobs_dir.unwrap_or_else(|| config.data.jobs_dir.clone()))?;
            let top_k = top_k.unwrap_or(config.matching.top_k);
            let min_score = min_score.unwrap_or(config.matching.min_score);

            for job in &jobs {
                let results = matcher.find_matching_resumes(job, top_k, min_score)?;
                output::print_match_results(&job.title, &results);
                let path = output::write_match_results(
                    &config.data.match_results_dir,
                    &job.title,
                    &results,
                    config.generation.max_snippet_chars,
                )?;
                log::info!("wrote {}", path.display());
            }
        }

        Commands::Questions { jobs_dir, top_k } => {
            config.ensure_data_dirs()?;
            let store = open_store(&config)?;
            let matcher = Matcher::new(store);
            let questions = build_question_generator(&config)?;

            let jobs = read_jobs(&jobs_dir.unwrap_or_else(|| config.data.jobs_dir.clone()))?;
            let top_k = top_k.unwrap_or(config.matching.top_k);

            for job in &jobs {
                let results =
                    matcher.find_matching_resumes(job, top_k, config.matching.min_score)?;
                let texts: Vec<String> = results.iter().map(|r| r.text.clone()).collect();
                let outcomes = questions.generate_all(&job.title, &texts).await;

                output::print_question_outcomes(&job.title, &results, &outcomes);
                let path = output::write_interview_questions(
                    &config.data.questions_dir,
                    &job.title,
                    &results,
                    &outcomes,
                    config.generation.max_snippet_chars,
                )?;
                log::info!("wrote {}", path.display());
            }
        }

        Commands::Serve { port } => {
            config.ensure_data_dirs()?;
            let store = open_store(&config)?;
            let pipeline = build_pipeline(&config, Arc::clone(&store))?;
            let matcher = Arc::new(Matcher::new(Arc::clone(&store)));
            let questions = build_question_generator(&config)?;
            let extractor = Arc::new(FieldExtractor::new(
                config.processing.confidence_threshold,
                config.processing.ner_window,
            )?);

            let state = AppState {
                pipeline: Arc::new(pipeline),
                matcher,
                questions,
                extractor,
                config: Arc::new(config.clone()),
            };

            let addr = format!(
                "{}:{}",
                config.server.host,
                port.unwrap_or(config.server.port)
            );
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            log::info!("listening on {}", addr);
            axum::serve(listener, build_router(state))
                .await
                .map_err(|e| ScreenerError::Configuration(format!("server error: {}", e)))?;
        }

        Commands::Stats => {
            let store = open_store(&config)?;
            let stats = store.stats();
            println!("{}", "Vector store".bold());
            println!("  path:      {}", stats.path.display());
            println!("  documents: {}", stats.total_documents);
            println!("  resumes:   {}", stats.resumes);
            println!("  jobs:      {}", stats.jobs);
        }

        Commands::Clear { kind } => {
            let store = open_store(&config)?;
            let kind = kind.map(|k| match k {
                ClearKind::Resumes => DocumentKind::Resume,
                ClearKind::Jobs => DocumentKind::Job,
            });
            let removed = store.clear(kind)?;
            println!("{} {} document(s) removed", "done:".green().bold(), removed);
        }
    }

    Ok(())
}

fn open_store(config: &Config) -> Result<Arc<VectorStore>> {
    let embedder = Arc::new(Model2VecEmbedder::load(
        &config.models.models_dir,
        &config.models.embedding_model,
    )?);
    Ok(Arc::new(VectorStore::open(
        &config.matching.store_path,
        embedder,
        config.processing.min_text_length,
    )?))
}

fn build_pipeline(config: &Config, store: Arc<VectorStore>) -> Result<IngestPipeline> {
    let client = InferenceClient::new(&config.models.inference_endpoint)?;
    Ok(IngestPipeline::new(
        LanguageDetector::new()?,
        TranslationService::new(
            Box::new(RemoteModelLoader::new(client)),
            config.models.supported_languages.clone(),
        ),
        Arc::new(FieldExtractor::new(
            config.processing.confidence_threshold,
            config.processing.ner_window,
        )?),
        store,
        config,
    ))
}

fn build_question_generator(config: &Config) -> Result<Arc<QuestionGenerator>> {
    let client = InferenceClient::new(&config.models.inference_endpoint)?;
    Ok(Arc::new(QuestionGenerator::new(
        Arc::new(RemoteGenerator::new(
            client,
            &config.models.generation_model,
            config.generation.max_new_tokens,
            config.generation.temperature,
        )),
        config.generation.timeout_secs,
        config.generation.max_snippet_chars,
    )))
}

/// Load every job description JSON file in `dir`, sorted by file name.
fn read_jobs(dir: &Path) -> Result<Vec<JobDescription>> {
    if !dir.exists() {
        return Err(ScreenerError::InvalidInput(format!(
            "jobs directory does not exist: {}",
            dir.display()
        )));
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    paths.sort();

    let mut jobs = Vec::new();
    for path in paths {
        let content = std::fs::read_to_string(&path)?;
        let job: JobDescription = serde_json::from_str(&content).map_err(|e| {
            ScreenerError::InvalidInput(format!("invalid job file {}: {}", path.display(), e))
        })?;
        jobs.push(job);
    }

    if jobs.is_empty() {
        log::warn!("no job description files found in {}", dir.display());
    }
    Ok(jobs)
}
