use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wikiscout_api::WikipediaClient;
use wikiscout_core::corpus::{read_jsonl, write_jsonl};
use wikiscout_core::models::{Article, ChunkRecord};
use wikiscout_core::{build_records, ArticleSource, Config, WikipediaSource};
use wikiscout_semantic::{SearchEngine, SemanticConfig};

#[derive(Parser)]
#[command(name = "wikiscout")]
#[command(version, about = "Wikipedia retrieval demo: fetch, chunk, embed, search", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Fetch articles from Wikipedia into the raw corpus
    Fetch {
        /// Topic titles to fetch
        topics: Vec<String>,

        /// File with one topic title per line
        #[arg(long)]
        topics_file: Option<PathBuf>,

        /// Output path (default: <data_dir>/articles.jsonl)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Clean and chunk the raw corpus
    Clean {
        /// Input path (default: <data_dir>/articles.jsonl)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output path (default: <data_dir>/chunks.jsonl)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Minimum chunk length in characters
        #[arg(long)]
        min_chars: Option<usize>,
    },
    /// Embed chunks and build the vector index
    Index {
        /// Input path (default: <data_dir>/chunks.jsonl)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Query the corpus
    Search {
        /// Search query
        query: String,

        /// Which retrieval path to use
        #[arg(long, value_enum, default_value = "semantic")]
        mode: SearchMode,

        /// Number of results to show
        #[arg(long, default_value_t = 5)]
        limit: usize,

        /// Chunk corpus path (default: <data_dir>/chunks.jsonl)
        #[arg(long)]
        chunks: Option<PathBuf>,
    },
    /// Show vector index statistics
    Stats,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum SearchMode {
    Semantic,
    Baseline,
    Both,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wikiscout=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("Failed to load configuration")?;

    match cli.command {
        Commands::Fetch {
            topics,
            topics_file,
            output,
        } => fetch(&config, topics, topics_file, output).await,
        Commands::Clean {
            input,
            output,
            min_chars,
        } => clean(&config, input, output, min_chars),
        Commands::Index { input } => index(&config, input).await,
        Commands::Search {
            query,
            mode,
            limit,
            chunks,
        } => search(&config, &query, mode, limit, chunks).await,
        Commands::Stats => stats(&config).await,
    }
}

/// Build the retrieval config from the pipeline config
fn semantic_config(config: &Config) -> SemanticConfig {
    SemanticConfig {
        index_path: config.data.index_path().to_string_lossy().to_string(),
        ..Default::default()
    }
}

async fn fetch(
    config: &Config,
    topics: Vec<String>,
    topics_file: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut all_topics = topics;
    if let Some(path) = topics_file {
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read topics file {}", path.display()))?;
        all_topics.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }

    if all_topics.is_empty() {
        anyhow::bail!("No topics given. Pass titles as arguments or use --topics-file");
    }

    let client = WikipediaClient::new(&config.fetch.language, &config.fetch.user_agent)
        .context("Failed to build Wikipedia client")?;
    let source = WikipediaSource::new(client);
    let delay = Duration::from_millis(config.fetch.delay_ms);

    let mut articles = Vec::new();
    let total = all_topics.len();
    for (i, topic) in all_topics.iter().enumerate() {
        println!("Fetching {}... ({}/{})", topic, i + 1, total);

        match source.fetch_article(topic).await {
            Ok(article) => articles.push(article),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", topic, e);
            }
        }

        if i + 1 < total {
            tokio::time::sleep(delay).await;
        }
    }

    if articles.is_empty() {
        anyhow::bail!("No articles fetched");
    }

    let output = output.unwrap_or_else(|| config.data.articles_path());
    write_jsonl(&output, &articles)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Fetched {} of {} articles to {}", articles.len(), total, output.display());
    Ok(())
}

fn clean(
    config: &Config,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    min_chars: Option<usize>,
) -> anyhow::Result<()> {
    let input = input.unwrap_or_else(|| config.data.articles_path());
    let output = output.unwrap_or_else(|| config.data.chunks_path());
    let min_chars = min_chars.unwrap_or(config.chunking.min_chars);

    let outcome = read_jsonl::<Article, _>(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    println!("Processing {} articles...", outcome.records.len());

    let records: Vec<ChunkRecord> = outcome
        .records
        .iter()
        .flat_map(|article| build_records(article, min_chars))
        .collect();

    write_jsonl(&output, &records)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} chunks from {} articles to {} (min length {} chars)",
        records.len(),
        outcome.records.len(),
        output.display(),
        min_chars
    );
    if outcome.skipped > 0 {
        println!("Skipped {} malformed input line(s)", outcome.skipped);
    }
    Ok(())
}

async fn index(config: &Config, input: Option<PathBuf>) -> anyhow::Result<()> {
    let input = input.unwrap_or_else(|| config.data.chunks_path());

    let outcome = read_jsonl::<ChunkRecord, _>(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    if outcome.skipped > 0 {
        println!("Skipped {} malformed input line(s)", outcome.skipped);
    }

    let engine = SearchEngine::new(semantic_config(config))?;
    engine.initialize().await.context("Failed to load embedding model")?;

    let count = engine.rebuild(outcome.records).await?;

    println!("Indexed {} chunks", count);
    Ok(())
}

async fn search(
    config: &Config,
    query: &str,
    mode: SearchMode,
    limit: usize,
    chunks: Option<PathBuf>,
) -> anyhow::Result<()> {
    let chunks_path = chunks.unwrap_or_else(|| config.data.chunks_path());

    let outcome = read_jsonl::<ChunkRecord, _>(&chunks_path)
        .with_context(|| format!("Failed to read {}", chunks_path.display()))?;

    let engine = SearchEngine::new(semantic_config(config))?;
    engine.load_corpus(outcome.records).await?;

    if mode == SearchMode::Semantic || mode == SearchMode::Both {
        engine.initialize().await.context("Failed to load embedding model")?;

        let results = engine.search(query, limit).await?;
        println!("\nSemantic results for '{}':", query);
        if results.is_empty() {
            println!("  (no results)");
        }
        for (rank, result) in results.iter().enumerate() {
            println!(
                "  {}. {} [{}] similarity {:.4}",
                rank + 1,
                result.record.title,
                result.record.id,
                result.similarity
            );
            println!("     {}", snippet(&result.record.text, 200));
        }
    }

    if mode == SearchMode::Baseline || mode == SearchMode::Both {
        let results = engine.search_baseline(query, limit).await?;
        println!("\nBaseline (TF-IDF) results for '{}':", query);
        if results.is_empty() {
            println!("  (no results)");
        }
        for (rank, (record, score)) in results.iter().enumerate() {
            println!(
                "  {}. {} [{}] score {:.4}",
                rank + 1,
                record.title,
                record.id,
                score
            );
            println!("     {}", snippet(&record.text, 200));
        }
    }

    Ok(())
}

async fn stats(config: &Config) -> anyhow::Result<()> {
    let engine = SearchEngine::new(semantic_config(config))?;
    let stats = engine.stats().await;

    println!("Vector index statistics:");
    println!("  Chunks indexed: {}", stats.total_chunks);
    println!("  Model:          {}", stats.model_name);
    println!("  Dimension:      {}", stats.dimension);
    println!("  Size on disk:   {} bytes", stats.index_size_bytes);
    println!("  Created:        {}", stats.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("  Last updated:   {}", stats.last_updated.format("%Y-%m-%d %H:%M:%S"));
    Ok(())
}

/// First `max_chars` characters of a chunk for display
fn snippet(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}
