use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
///
/// This gets loaded from config file, env vars, and CLI args.
/// Priority: CLI > Env > File > Defaults (like a sensible person would do)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
}

impl Config {
    /// Load config from default location or fall back to defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            // No config file? Use defaults
            Ok(Self::default())
        }
    }

    /// Save config to disk
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    /// Get the config file path
    /// Uses XDG on Linux/macOS, AppData on Windows
    fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("wikiscout");

        Ok(config_dir.join("config.toml"))
    }
}

/// Where corpus files live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding corpus files and the vector index
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,

    /// Raw articles, one JSON object per line
    #[serde(default = "default_articles_file")]
    pub articles_file: String,

    /// Cleaned chunk records, one JSON object per line
    #[serde(default = "default_chunks_file")]
    pub chunks_file: String,

    /// Subdirectory for the persisted vector index
    #[serde(default = "default_index_dir")]
    pub index_dir: String,
}

impl DataConfig {
    pub fn articles_path(&self) -> PathBuf {
        self.dir.join(&self.articles_file)
    }

    pub fn chunks_path(&self) -> PathBuf {
        self.dir.join(&self.chunks_file)
    }

    pub fn index_path(&self) -> PathBuf {
        self.dir.join(&self.index_dir)
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_articles_file() -> String {
    "articles.jsonl".to_string()
}

fn default_chunks_file() -> String {
    "chunks.jsonl".to_string()
}

fn default_index_dir() -> String {
    "index".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            articles_file: default_articles_file(),
            chunks_file: default_chunks_file(),
            index_dir: default_index_dir(),
        }
    }
}

/// Wikipedia fetch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Wikipedia language edition
    #[serde(default = "default_language")]
    pub language: String,

    /// User-Agent sent to the API (Wikimedia asks for a descriptive one)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Delay between requests in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_user_agent() -> String {
    "wikiscout/0.1 (https://github.com/shreeshjha/WikiScout)".to_string()
}

fn default_delay_ms() -> u64 {
    1000
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            user_agent: default_user_agent(),
            delay_ms: default_delay_ms(),
        }
    }
}

/// Chunking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Minimum chunk length in characters. Paragraphs shorter than this are
    /// dropped from the corpus.
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
}

fn default_min_chars() -> usize {
    150
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            min_chars: default_min_chars(),
        }
    }
}
