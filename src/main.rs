// src/main.rs
// support-triage - classify customer support messages from the command line

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::time::Duration;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use triage::Analyzer;
use triage::config::{EnvConfig, TriageConfig};
use triage::labels::{category_names, sentiment_names};
use triage::llm::ProviderFactory;

#[derive(Parser)]
#[command(name = "support-triage")]
#[command(about = "Classify customer support messages with an LLM")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one message (reads stdin when MESSAGE is omitted)
    Analyze {
        /// Customer message text
        message: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Print the result with request id and fallback reason as JSON
        #[arg(long, conflicts_with = "json")]
        diagnostics: bool,

        /// Backend call timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Backend to use (gemini, openai, deepseek, ollama)
        #[arg(long)]
        provider: Option<String>,

        /// Model override
        #[arg(long)]
        model: Option<String>,
    },

    /// List the allowed categories and sentiments
    Labels,

    /// Validate configuration and report problems
    CheckConfig,
}

fn read_message(message: Option<String>) -> Result<String> {
    match message {
        Some(message) => Ok(message),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read message from stdin")?;
            Ok(buf)
        }
    }
}

async fn run_analyze(
    message: Option<String>,
    json: bool,
    diagnostics: bool,
    timeout_secs: Option<u64>,
    provider: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let message = read_message(message)?;

    let mut config = EnvConfig::load();
    if provider.is_some() {
        config.provider = provider;
    }
    if model.is_some() {
        config.model = model;
    }
    let timeout = timeout_secs.map(Duration::from_secs).unwrap_or(config.timeout);

    let factory = ProviderFactory::from_config(&config);
    let analyzer = Analyzer::with_rules(factory.client(), config.validation_rules());
    let analysis = analyzer.analyze_with_diagnostics(&message, timeout).await;

    if diagnostics {
        println!("{}", analysis.to_json_pretty()?);
    } else if json {
        println!("{}", analysis.result.to_json_pretty()?);
    } else {
        println!("Category:  {}", analysis.result.category);
        println!("Sentiment: {}", analysis.result.sentiment);
        println!("Reply:     {}", analysis.result.reply);
        if let Some(reason) = analysis.outcome.failure() {
            eprintln!("(fallback result: {})", reason);
        }
    }

    Ok(())
}

fn run_labels() {
    println!("Categories:");
    for name in category_names() {
        println!("  {}", name);
    }
    println!("Sentiments:");
    for name in sentiment_names() {
        println!("  {}", name);
    }
}

fn run_check_config() -> bool {
    let config = EnvConfig::load();
    let validation = config.validate();

    let path = TriageConfig::config_path();
    let file_ok = match TriageConfig::read(&path) {
        Ok(_) => {
            println!("Config file: {}", path.display());
            true
        }
        Err(e) if e.is_not_found() => {
            println!("Config file: {} (not found, using defaults)", path.display());
            true
        }
        Err(e) => {
            println!("Config file: {} ({})", path.display(), e);
            false
        }
    };
    println!("Backends:    {}", config.api_keys.summary());
    match config.selected_provider() {
        Some(p) => println!("Selected:    {}", p),
        None => println!("Selected:    none"),
    }
    println!("{}", validation.report());

    file_ok && validation.is_valid()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env files (global first, then current directory)
    let _ = dotenvy::from_path(TriageConfig::config_dir().join(".env"));
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Analyze {
            message,
            json,
            diagnostics,
            timeout_secs,
            provider,
            model,
        } => {
            run_analyze(message, json, diagnostics, timeout_secs, provider, model).await?;
        }
        Commands::Labels => run_labels(),
        Commands::CheckConfig => {
            if !run_check_config() {
                info!("Configuration check failed");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
