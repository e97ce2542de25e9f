use pdf_chat_agent::api;
use pdf_chat_agent::commands::{CommandHandler, Flow};
use pdf_chat_agent::config::{AppConfig, EmbeddingKind};
use pdf_chat_agent::document::Document;
use pdf_chat_agent::providers::{build_completion, build_embedder};
use pdf_chat_agent::session::{PipelineServices, Session};
use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const SYSTEM_PROMPT: &str = "You are a helpful assistant answering questions about documents the user uploaded.";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// OpenAI API key (overrides OPENAI_API_KEY)
    #[arg(short, long)]
    api_key: Option<String>,

    /// Completion provider: openai or deepseek
    #[arg(long)]
    provider: Option<String>,

    /// Embed with the local hashing embedder instead of OpenAI
    #[arg(long)]
    local_embeddings: bool,

    /// Serve the web UI instead of the terminal chat
    #[arg(long)]
    api: bool,

    #[arg(long, default_value = "3000")]
    port: u16,

    /// Number of chunks retrieved per question
    #[arg(long)]
    top_k: Option<usize>,

    /// Rewrite follow-up questions into standalone ones before retrieval
    #[arg(long)]
    condense: bool,

    /// PDFs to ingest before the first question
    files: Vec<PathBuf>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] pdf_chat_agent::ConfigError),
    #[error("Ingestion error: {0}")]
    Ingest(#[from] pdf_chat_agent::IngestError),
    #[error("Server error: {0}")]
    Server(String),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load environment variables
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let mut session = build_session(&config).await?;

    if !args.files.is_empty() {
        let mut documents = Vec::with_capacity(args.files.len());
        for path in &args.files {
            documents.push(Document::from_path(path).await.map_err(AppError::from)?);
        }
        let summary = session.ingest(documents).await.map_err(AppError::from)?;
        info!(documents = ?summary.documents, chunks = summary.chunks, "startup documents indexed");
    }

    if args.api {
        run_api_server(&args, &config, session).await
    } else {
        run_cli_mode(session).await
    }
}

fn load_config(args: &Args) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::from_env()?;

    if let Some(key) = &args.api_key {
        config.openai.api_key = Some(key.clone());
    }
    if let Some(provider) = &args.provider {
        config.completion_provider = provider.parse()?;
    }
    if let Some(top_k) = args.top_k {
        config.pipeline.top_k = top_k;
    }
    if args.local_embeddings {
        config.embedding_provider = EmbeddingKind::Hashing;
    }
    if args.condense {
        config.pipeline.condense_question = true;
    }

    Ok(config)
}

async fn build_session(config: &AppConfig) -> Result<Session, AppError> {
    let embedder = build_embedder(config)?;
    let completion = build_completion(config, SYSTEM_PROMPT)?;

    match completion.get_model_info().await {
        Ok(model) => info!(chat_model = %model, embedding_model = %embedder.model_name(), "providers ready"),
        Err(e) => warn!(error = %e, "could not read chat model info"),
    }

    let services = PipelineServices { embedder, completion };
    Ok(Session::new(services, config.pipeline.clone())?)
}

async fn run_cli_mode(session: Session) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    colored::control::set_override(true);

    let mut command_handler = CommandHandler::new(session);
    command_handler.handle_command("help").await?;

    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("👤 ") {
            Ok(line) => {
                let input = line.trim();
                if !input.is_empty() {
                    let _ = rl.add_history_entry(input);
                }

                match command_handler.handle_command(input).await {
                    Ok(Flow::Exit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => println!("{}", e.red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                error!(error = %err, "readline failed");
                break;
            }
        }
    }
    Ok(())
}

async fn run_api_server(
    args: &Args,
    config: &AppConfig,
    session: Session,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let app = api::create_api(session, config.max_upload_bytes);

    let listener = TcpListener::bind(&addr).await
        .map_err(|e| AppError::Server(format!("Failed to bind to {}: {}", addr, e)))?;

    info!(%addr, "web UI listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;

    Ok(())
}
