//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge compiled-in defaults + `config.toml` +
//! `config.<env>.toml` + `APP_*` env vars (`__` separates nested keys, e.g.
//! `APP_RETRIEVAL__DEFAULT_K=3`). Provides helpers to expand `~` and `${VAR}`
//! and to resolve relative paths against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// How the fusion step decides that two hits are "the same" document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FusionIdentity {
    /// Byte-identical text collapses into one fused entry.
    Content,
    /// Every stored document is its own entry, even when texts are equal.
    #[default]
    Document,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub embedding_cache_capacity: usize,
    pub result_cache_capacity: usize,
    pub result_cache_ttl_secs: u64,
    pub rrf_k: f32,
    pub default_k: usize,
    pub fusion_identity: FusionIdentity,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            embedding_cache_capacity: 1000,
            result_cache_capacity: 10_000,
            result_cache_ttl_secs: 24 * 60 * 60,
            rrf_k: 60.0,
            default_k: 5,
            fusion_identity: FusionIdentity::Document,
        }
    }
}

impl RetrievalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.embedding_cache_capacity == 0 {
            return Err(Error::InvalidConfig("retrieval.embedding_cache_capacity must be > 0".into()));
        }
        if self.result_cache_capacity == 0 {
            return Err(Error::InvalidConfig("retrieval.result_cache_capacity must be > 0".into()));
        }
        if self.result_cache_ttl_secs == 0 {
            return Err(Error::InvalidConfig("retrieval.result_cache_ttl_secs must be > 0".into()));
        }
        if !(self.rrf_k.is_finite() && self.rrf_k > 0.0) {
            return Err(Error::InvalidConfig(format!("retrieval.rrf_k must be a positive number, got {}", self.rrf_k)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// `hashing` (built in) or `candle` (requires the `candle` feature of docqa-embed).
    pub provider: String,
    pub dimension: usize,
    pub model_dir: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self { provider: "hashing".to_string(), dimension: 384, model_dir: None }
    }
}

impl EmbeddingConfig {
    pub fn model_dir_path(&self) -> Option<PathBuf> {
        self.model_dir.as_deref().map(expand_path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub txt_dir: String,
    pub max_tokens: usize,
    pub overlap_percent: f32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { txt_dir: "./data/txt".to_string(), max_tokens: 500, overlap_percent: 0.2 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub retrieval: RetrievalConfig,
    pub embedding: EmbeddingConfig,
    pub data: DataConfig,
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            other => tracing::warn!(env = other, "unknown RUST_ENV, using config.toml only"),
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?.retrieval.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with a single TOML document; ignores files and env.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::string(toml));
        let config = Self { figment };
        config.settings()?.retrieval.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    pub fn settings(&self) -> Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| Error::InvalidConfig(format!("Failed to extract settings: {}", e)))
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
