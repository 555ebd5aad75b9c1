// Persona CLI entry point

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use persona_core::artifacts::FileModelStore;
use persona_core::config::AppConfig;
use persona_core::database::{self, SqliteCorpus};
use persona_core::fs_manager::DataPaths;
use persona_core::service::{validate_message, PersonaService};
use persona_core::traits::CorpusSource;

#[derive(Parser)]
#[command(name = "persona", version, about = "Reply in your own conversational style")]
struct Cli {
    #[arg(long, help = "Data directory (overrides PERSONA_DATA_DIR)")]
    data_dir: Option<PathBuf>,

    #[arg(long, help = "Emit logs as JSON lines")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Add one conversation pair to the corpus")]
    Add {
        #[arg(long, help = "Message you were replying to")]
        input: String,
        #[arg(long, help = "Your reply")]
        response: String,
    },
    #[command(about = "Import a JSON array of collected conversations")]
    Import {
        #[arg(help = "Path to the JSON file")]
        file: PathBuf,
    },
    #[command(about = "Train models from the full corpus")]
    Train,
    #[command(about = "Reply to a single message")]
    Ask {
        #[arg(help = "Message text")]
        text: String,
    },
    #[command(about = "Interactive chat loop")]
    Chat,
    #[command(about = "Show corpus and model statistics")]
    Stats,
}

fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("Invalid configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    init_tracing(cli.json_logs || config.log_json);

    let paths = DataPaths::new(&config.data_dir);
    paths.init().context("Failed to create data directories")?;

    let pool = database::init_db(&paths.db_path())
        .await
        .context("Failed to open corpus database")?;
    let corpus = Arc::new(SqliteCorpus::new(pool.clone()));
    let store = Arc::new(FileModelStore::new(paths.artifact_path()));
    let service = PersonaService::new(&config, corpus.clone(), store);

    match cli.command {
        Commands::Add { input, response } => {
            let input = validate_message(&input)?;
            let response = validate_message(&response)?;
            let entry = database::add_conversation(&pool, input, response).await?;
            println!("Added conversation #{}.", entry.id);
        }
        Commands::Import { file } => {
            let imported = database::import_json_corpus(&pool, &file).await?;
            println!("Imported {} conversations from {}.", imported, file.display());
        }
        Commands::Train => {
            let summary = service.train_from_corpus().await?;
            println!(
                "Trained on {} conversations ({} terms).",
                summary.pairs, summary.vocabulary
            );
            if !summary.persisted {
                println!("Warning: models could not be saved and will be lost on exit.");
            }
        }
        Commands::Ask { text } => {
            let text = validate_message(&text)?;
            println!("{}", service.generate(text).await);
        }
        Commands::Chat => run_chat(&service).await?,
        Commands::Stats => {
            service.try_load_models().await;
            let stats = service.stats();
            println!("Corpus:      {} conversations", corpus.count().await?);
            println!("Models:      {}", if stats.models_loaded { "loaded" } else { "not trained" });
            println!("Trained on:  {} conversations", stats.corpus_size);
            println!("Vocabulary:  {} terms", stats.vocabulary_size);
        }
    }

    Ok(())
}

async fn run_chat(service: &PersonaService) -> Result<()> {
    if !service.try_load_models().await {
        warn!("No trained models found; run `persona train` first");
    }

    println!("persona chat. Commands: /learn <reply>, /stats, /history, /clear, /quit");
    println!("---");

    let stdin = std::io::stdin();
    let mut last_input: Option<String> = None;
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ').map_or((line, ""), |(cmd, rest)| (cmd, rest.trim())) {
            ("/quit", _) | ("/exit", _) => break,
            ("/learn", reply) => match last_input.as_deref() {
                Some(input) => match service.learn(input, reply).await {
                    Ok(summary) => println!(
                        "Learned. Corpus now has {} conversations.",
                        summary.pairs
                    ),
                    Err(err) => eprintln!("Error: {err}"),
                },
                None => eprintln!("Nothing to learn from yet; say something first."),
            },
            ("/stats", _) => {
                let stats = service.stats();
                println!(
                    "models loaded: {}, corpus: {}, vocabulary: {}, session messages: {}",
                    stats.models_loaded,
                    stats.corpus_size,
                    stats.vocabulary_size,
                    stats.session_messages
                );
            }
            ("/history", _) => {
                for exchange in service.recent_exchanges() {
                    println!(
                        "[{}] {} -> {} ({})",
                        exchange.timestamp.format("%H:%M:%S"),
                        exchange.input,
                        exchange.response,
                        exchange.source.label()
                    );
                }
            }
            ("/clear", _) => {
                service.clear_session();
                last_input = None;
                println!("Session cleared.");
            }
            _ => {
                let reply = service.reply(line).await;
                println!("{}", reply.text);
                last_input = Some(line.to_string());
            }
        }
    }

    info!("Chat session ended");
    Ok(())
}
