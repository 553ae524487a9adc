//! Layered configuration and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` +
//! `config.<env>.toml` + `APP_*` env vars (`__` separates nested keys, e.g.
//! `APP_LEXICAL__SIMILARITY_THRESHOLD=0.2`). Provides helpers to expand `~`
//! and `${VAR}` and to resolve relative paths against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::responder::ConfidencePolicy;

pub const DEFAULT_CORPUS_PATH: &str = "data_converted.csv";
pub const DEFAULT_MODEL: &str = "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2";
pub const DEFAULT_FALLBACK_ANSWER: &str =
    "Xin lỗi, tôi không hiểu câu hỏi của bạn. Bạn có thể diễn đạt lại không?";

/// Unaccented Vietnamese function words: question particles, copulas and
/// connectives that appear in most questions and carry no topic.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "la", "gi", "nao", "the", "nhu", "sao", "vay", "a", "ha", "nhi", "nhe", "co", "khong", "cua",
    "va", "voi", "cac", "nhung", "mot", "thi", "ma", "de", "duoc", "cho", "nay", "do", "ay", "o",
    "tai", "vi", "bi", "se", "da", "dang", "khi", "neu", "hay", "hoac",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub data: DataConfig,
    pub lexical: LexicalConfig,
    pub semantic: SemanticConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    pub corpus_path: String,
}

impl Default for DataConfig {
    fn default() -> Self { Self { corpus_path: DEFAULT_CORPUS_PATH.to_string() } }
}

/// Parameters of the TF-IDF engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LexicalConfig {
    /// Hard floor: matches scoring below it are never returned.
    pub similarity_threshold: f32,
    pub max_features: usize,
    /// Terms present in more than this fraction of questions are dropped.
    pub max_df: f32,
    pub min_df: usize,
    pub ngram_range: (usize, usize),
    pub stop_words: Vec<String>,
    pub fallback_answer: String,
}

impl Default for LexicalConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.1,
            max_features: 5000,
            max_df: 0.95,
            min_df: 1,
            ngram_range: (1, 2),
            stop_words: DEFAULT_STOP_WORDS.iter().map(|s| s.to_string()).collect(),
            fallback_answer: DEFAULT_FALLBACK_ANSWER.to_string(),
        }
    }
}

impl LexicalConfig {
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.similarity_threshold.is_finite() {
            return Err(Error::InvalidConfig("lexical.similarity_threshold must be finite".into()));
        }
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(Error::InvalidConfig(format!("lexical.max_df must be in (0, 1], got {}", self.max_df)));
        }
        if self.min_df == 0 {
            return Err(Error::InvalidConfig("lexical.min_df must be at least 1".into()));
        }
        let (lo, hi) = self.ngram_range;
        if lo == 0 || lo > hi {
            return Err(Error::InvalidConfig(format!("lexical.ngram_range ({lo}, {hi}) is not a valid range")));
        }
        Ok(())
    }
}

/// Parameters of the embedding engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SemanticConfig {
    /// Hub repository id of the sentence encoder.
    pub model: String,
    /// Local directory holding `config.json`, `tokenizer.json` and weights.
    pub model_dir: Option<String>,
    pub max_len: usize,
    pub batch_size: usize,
    pub use_fake: bool,
    pub show_progress: bool,
    pub confidence: ConfidencePolicy,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            model_dir: None,
            max_len: 128,
            batch_size: 32,
            use_fake: false,
            show_progress: true,
            confidence: ConfidencePolicy::default(),
        }
    }
}

impl SemanticConfig {
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.max_len == 0 || self.batch_size == 0 {
            return Err(Error::InvalidConfig("semantic.max_len and semantic.batch_size must be positive".into()));
        }
        self.confidence.validate()
    }
}

impl Settings {
    pub fn validate(&self) -> crate::error::Result<()> {
        self.lexical.validate()?;
        self.semantic.validate()
    }
}

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    /// Load from the current working directory.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from_dir(&env::current_dir()?)
    }

    /// Load `config.toml` and `config.<env>.toml` from `base_dir`, then `APP_*` variables.
    pub fn load_from_dir(base_dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(base_dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(base_dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base_dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base_dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, base_dir: base_dir.to_path_buf() };
        config.settings()?.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))
    }

    /// The corpus path with `~`/`$VAR` expanded, relative to the config directory.
    pub fn corpus_path(&self) -> anyhow::Result<PathBuf> {
        let raw: String = self.get("data.corpus_path")?;
        Ok(resolve_with_base(&self.base_dir, raw))
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
