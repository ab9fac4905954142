//! Condense CLI - summarize, translate and digest text with hosted language models

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use condense_core::Error;
use condense_core::config::Config;
use condense_core::digest::{
    DigestBuilder, DigestOptions, FeedSite, SnapshotFeedSource, default_sites, load_sites,
};
use condense_core::llm::{LlmClient, LlmSummarizer};
use condense_core::posts::{PostGenerator, PostStore};
use condense_core::qa::{LlmAnswerer, answer_question};
use condense_core::storage::Database;
use condense_core::summarize::{ChunkedOptions, ChunkedSummarizer, SummaryBounds, summarize_once};
use condense_core::transcript::{DirectoryTranscriptSource, VideoSummarizer};
use condense_core::translate::{LANGUAGES, LlmTranslatorLoader, TranslationService};
use serde_json::json;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "condense")]
#[command(author, version, about = "Chunked summarization and text tools over hosted language models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize text of any length
    Summarize {
        /// Text to summarize (reads stdin when neither TEXT nor --file is given)
        text: Option<String>,
        /// Read the text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Summarize in one request instead of chunking
        #[arg(long)]
        single_pass: bool,
    },

    /// Summarize a video from its cached transcript
    Video {
        /// Video URL
        url: String,
        /// Directory holding <video_id>.txt or <video_id>.json transcripts
        #[arg(short, long)]
        transcripts: PathBuf,
    },

    /// Translate text between languages
    Translate {
        /// Text to translate
        text: String,
        /// Source language (name or code)
        #[arg(long, default_value = "en")]
        from: String,
        /// Target language (name or code)
        #[arg(long)]
        to: String,
    },

    /// List supported translation languages
    Languages,

    /// Answer a question from a text document
    Ask {
        /// The question
        question: String,
        /// Context text
        #[arg(short, long)]
        context: Option<String>,
        /// Context file (.txt or .md); takes precedence over --context
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Generate and browse LinkedIn-style posts
    Post {
        #[command(subcommand)]
        action: PostAction,
    },

    /// Build a news digest from feed snapshots
    Digest {
        #[command(subcommand)]
        action: DigestAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Check system health
    Doctor,
}

#[derive(Subcommand)]
enum PostAction {
    /// Generate a post about a topic
    Generate {
        /// Post topic
        topic: String,
        /// Do not save the post to history
        #[arg(long)]
        no_save: bool,
    },
    /// Show recent posts
    History {
        /// Maximum number of posts (defaults to posts.history_limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show a saved post
    Show {
        /// Post ID
        id: String,
    },
}

#[derive(Subcommand)]
enum DigestAction {
    /// List the feed catalog
    Sites {
        /// JSON file with the feed catalog
        #[arg(long)]
        sites: Option<PathBuf>,
    },
    /// Build the digest
    Build {
        /// JSON snapshot of feed entries
        #[arg(long)]
        snapshot: PathBuf,
        /// Write the HTML here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// JSON file with the feed catalog
        #[arg(long)]
        sites: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a config value
    Get { key: String },
    /// Set a config value
    Set { key: String, value: String },
    /// List all config values
    List,
    /// Reset to defaults
    Reset,
    /// Show the config file location
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing on stderr so stdout stays clean for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("condense=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        report_error(&e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Summarize {
            text,
            file,
            single_pass,
        } => cmd_summarize(text, file.as_deref(), single_pass, format).await,

        Commands::Video { url, transcripts } => cmd_video(&url, &transcripts, format).await,

        Commands::Translate { text, from, to } => cmd_translate(&text, &from, &to, format).await,

        Commands::Languages => cmd_languages(format),

        Commands::Ask {
            question,
            context,
            file,
        } => cmd_ask(&question, context.as_deref(), file.as_deref(), format).await,

        Commands::Post { action } => cmd_post(action, format, quiet).await,

        Commands::Digest { action } => cmd_digest(action, format, quiet).await,

        Commands::Config { action } => cmd_config(action, quiet),

        Commands::Doctor => cmd_doctor(quiet).await,
    }
}

/// Print an error with its code and hint when it comes from the core
fn report_error(error: &anyhow::Error) {
    match error.downcast_ref::<Error>() {
        Some(e) => {
            eprintln!("Error [{}]: {}", e.code(), e);
            if let Some(hint) = e.suggestion() {
                eprintln!("Hint: {}", hint);
            }
        }
        None => eprintln!("Error: {:#}", error),
    }
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_config() -> anyhow::Result<Config> {
    let config = Config::load()?;
    debug!(model = %config.llm.default_model, "Configuration loaded");
    Ok(config)
}

fn read_input(text: Option<String>, file: Option<&Path>) -> anyhow::Result<String> {
    if let Some(path) = file {
        return Ok(std::fs::read_to_string(path)?);
    }
    if let Some(text) = text {
        return Ok(text);
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

async fn cmd_summarize(
    text: Option<String>,
    file: Option<&Path>,
    single_pass: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let config = load_config()?;
    let input = read_input(text, file)?;
    if input.trim().is_empty() {
        return Err(Error::EmptyInput("summarize".to_string()).into());
    }

    let client = LlmClient::from_config(&config.llm)?;
    let oracle = LlmSummarizer::new(client);

    if single_pass {
        let bounds = SummaryBounds::new(
            config.summarize.single_max_length,
            config.summarize.single_min_length,
        );
        let summary = summarize_once(&oracle, &input, bounds).await?;
        return match format {
            OutputFormat::Json => print_json(&json!({ "summary": summary, "oracle_calls": 1 })),
            OutputFormat::Text => {
                println!("{}", summary);
                Ok(())
            }
        };
    }

    let summarizer = ChunkedSummarizer::new(oracle, ChunkedOptions::from(&config.summarize))?;
    let report = summarizer.summarize_detailed(&input).await?;
    if report.is_empty() {
        return Err(Error::EmptyInput("summarize".to_string()).into());
    }

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => println!("{}", report.summary),
    }
    Ok(())
}

async fn cmd_video(url: &str, transcripts: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config()?;
    let client = LlmClient::from_config(&config.llm)?;
    let summarizer = ChunkedSummarizer::new(
        LlmSummarizer::new(client),
        ChunkedOptions::from(&config.summarize),
    )?;
    let videos = VideoSummarizer::new(summarizer, DirectoryTranscriptSource::new(transcripts));

    let summary = videos.summarize_url(url).await?;
    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Text => println!("{}", summary.report.summary),
    }
    Ok(())
}

async fn cmd_translate(text: &str, from: &str, to: &str, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config()?;
    let client = LlmClient::from_config(&config.llm)?;
    let service = TranslationService::new(Arc::new(LlmTranslatorLoader::new(client)))
        .with_max_length(config.translate.max_length);

    let translation = service.translate(text, from, to).await?;
    match format {
        OutputFormat::Json => print_json(&translation)?,
        OutputFormat::Text => println!("{}", translation.text),
    }
    Ok(())
}

fn cmd_languages(format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&LANGUAGES)?,
        OutputFormat::Text => {
            for language in LANGUAGES.iter() {
                println!("{:<6} {}", language.code, language.name);
            }
        }
    }
    Ok(())
}

async fn cmd_ask(
    question: &str,
    context: Option<&str>,
    file: Option<&Path>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let config = load_config()?;
    let client = LlmClient::from_config(&config.llm)?;
    let answerer = LlmAnswerer::new(client);

    let answer = answer_question(&answerer, context, file, question).await?;
    match format {
        OutputFormat::Json => print_json(&answer)?,
        OutputFormat::Text => println!("{}", answer.answer),
    }
    Ok(())
}

async fn open_post_store() -> anyhow::Result<PostStore> {
    let db = Database::open_default().await?;
    Ok(PostStore::new(db.pool().clone()))
}

async fn cmd_post(action: PostAction, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    match action {
        PostAction::Generate { topic, no_save } => {
            let config = load_config()?;
            let client = LlmClient::from_config(&config.llm)?;
            let generated = PostGenerator::new(client).generate(&topic).await?;

            if no_save {
                match format {
                    OutputFormat::Json => print_json(&generated)?,
                    OutputFormat::Text => println!("{}", generated.body),
                }
                return Ok(());
            }

            let store = open_post_store().await?;
            let post = store
                .save(&generated.topic, &generated.body, Some(&generated.model))
                .await?;
            match format {
                OutputFormat::Json => print_json(&post)?,
                OutputFormat::Text => {
                    println!("{}", post.body);
                    if !quiet {
                        println!();
                        println!("Saved as {}", post.id);
                    }
                }
            }
        }
        PostAction::History { limit } => {
            let config = load_config()?;
            let limit = limit.unwrap_or(config.posts.history_limit);
            let store = open_post_store().await?;
            let posts = store.history(limit).await?;

            match format {
                OutputFormat::Json => print_json(&posts)?,
                OutputFormat::Text => {
                    if posts.is_empty() {
                        if !quiet {
                            println!("No posts yet. Create one with: condense post generate <TOPIC>");
                        }
                    } else {
                        for post in &posts {
                            println!(
                                "{}  {}  {}",
                                post.id,
                                post.created_at.format("%Y-%m-%d %H:%M"),
                                post.topic
                            );
                        }
                    }
                }
            }
        }
        PostAction::Show { id } => {
            let store = open_post_store().await?;
            let post = store.get(&id).await?;
            match format {
                OutputFormat::Json => print_json(&post)?,
                OutputFormat::Text => {
                    if !quiet {
                        println!("Topic: {}", post.topic);
                        println!("Created: {}", post.created_at.format("%Y-%m-%d %H:%M UTC"));
                        if let Some(model) = &post.model {
                            println!("Model: {}", model);
                        }
                        println!();
                    }
                    println!("{}", post.body);
                }
            }
        }
    }
    Ok(())
}

fn catalog(sites: Option<&Path>) -> anyhow::Result<Vec<FeedSite>> {
    Ok(match sites {
        Some(path) => load_sites(path)?,
        None => default_sites(),
    })
}

async fn cmd_digest(action: DigestAction, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    match action {
        DigestAction::Sites { sites } => {
            let sites = catalog(sites.as_deref())?;
            match format {
                OutputFormat::Json => print_json(&sites)?,
                OutputFormat::Text => {
                    for site in &sites {
                        println!("{} [{}]  {}", site.name, site.category, site.rss);
                    }
                }
            }
        }
        DigestAction::Build {
            snapshot,
            output,
            sites,
        } => {
            let config = load_config()?;
            let sites = catalog(sites.as_deref())?;
            let feeds = SnapshotFeedSource::from_path(&snapshot)?;
            if feeds.is_empty() {
                warn!(snapshot = %snapshot.display(), "Snapshot holds no feeds");
            }

            let client = LlmClient::from_config(&config.llm)?;
            let builder = DigestBuilder::new(
                LlmSummarizer::new(client),
                feeds,
                sites,
                DigestOptions::from(&config.digest),
            );
            let digest = builder.build(Utc::now()).await?;

            match &output {
                Some(path) => {
                    std::fs::write(path, &digest.html)?;
                    if !quiet && format == OutputFormat::Text {
                        println!(
                            "Wrote {} articles from {} sites to {}",
                            digest.articles.len(),
                            digest.sites.len(),
                            path.display()
                        );
                    }
                }
                None if format == OutputFormat::Text => print!("{}", digest.html),
                None => {}
            }
            if format == OutputFormat::Json {
                print_json(&digest)?;
            }
        }
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let items = config.list()?;
            for (key, value) in items {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn cmd_doctor(quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("Condense Health Check");
        println!("=====================");
        println!();
    }

    let mut all_ok = true;

    // Check configuration
    match Config::load() {
        Ok(config) => {
            if !quiet {
                println!("[OK] Configuration: Valid");
                println!("     Model: {}", config.llm.default_model);
            }

            // Check API key
            match config.llm.resolved_api_key() {
                Ok(Some(_)) => {
                    if !quiet {
                        let redacted = config.llm.redacted_api_key()?.unwrap_or_default();
                        println!("[OK] API Key: Configured ({})", redacted);
                    }
                }
                Ok(None) => {
                    all_ok = false;
                    if !quiet {
                        warn!("API Key: Not configured");
                        println!("[!!] API Key: Not configured");
                        println!("     Set CONDENSE_API_KEY or GROQ_API_KEY environment variable");
                    }
                }
                Err(e) => {
                    all_ok = false;
                    if !quiet {
                        println!("[!!] API Key: Error - {}", e);
                    }
                }
            }
        }
        Err(e) => {
            all_ok = false;
            if !quiet {
                println!("[!!] Configuration: Error - {}", e);
            }
        }
    }

    // Check config file location
    if !quiet {
        match Config::config_path() {
            Ok(path) => {
                if path.exists() {
                    println!("[OK] Config file: {}", path.display());
                } else {
                    println!("[--] Config file: {} (using defaults)", path.display());
                }
            }
            Err(e) => {
                println!("[!!] Config file: Error - {}", e);
            }
        }
    }

    // Check database
    match Database::open_default().await {
        Ok(db) => match db.health_check().await {
            Ok(()) => {
                if !quiet {
                    println!("[OK] Database: Connected");
                    println!("     Path: {}", db.path().display());
                    match db.migration_status().await {
                        Ok(status) if status.needs_migration => println!(
                            "[!!] Database: Migrations pending (v{} -> v{})",
                            status.current_version, status.target_version
                        ),
                        Ok(status) => println!("[OK] Database: Schema v{}", status.current_version),
                        Err(e) => println!("[!!] Database: Migration check failed - {}", e),
                    }
                    let posts = PostStore::new(db.pool().clone()).count().await.unwrap_or(0);
                    println!("     Posts: {}", posts);
                }
            }
            Err(e) => {
                all_ok = false;
                if !quiet {
                    println!("[!!] Database: Health check failed - {}", e);
                }
            }
        },
        Err(e) => {
            all_ok = false;
            if !quiet {
                println!("[!!] Database: Failed to initialize - {}", e);
            }
        }
    }

    // Summary
    if !quiet {
        println!();
        if all_ok {
            println!("All checks passed!");
        } else {
            println!("Some checks failed. See above for details.");
        }
    }

    Ok(())
}
