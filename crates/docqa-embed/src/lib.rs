//! docqa-embed
//!
//! Embedding providers and the LRU embedding cache. The hashing provider is
//! always available; the candle BGE-M3 model needs the `candle` feature.

pub mod cache;
pub mod hashing;

#[cfg(feature = "candle")]
pub mod device;
#[cfg(feature = "candle")]
pub mod model;
#[cfg(feature = "candle")]
pub mod pool;
#[cfg(feature = "candle")]
pub mod tokenize;

use std::sync::Arc;

use docqa_core::config::EmbeddingConfig;
use docqa_core::traits::Embedder;
use docqa_core::{Error, Result};

pub use cache::{CacheStats, EmbeddingCache};
pub use hashing::HashingEmbedder;
#[cfg(feature = "candle")]
pub use model::BgeM3Embedder;
#[cfg(feature = "candle")]
pub use pool::masked_mean_l2;

/// Build the provider named by `config.provider`.
pub fn embedder_from_config(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    if config.dimension == 0 {
        return Err(Error::InvalidConfig("embedding.dimension must be > 0".into()));
    }
    match config.provider.as_str() {
        "hashing" => {
            tracing::info!(dim = config.dimension, "using hashing embedder");
            Ok(Arc::new(HashingEmbedder::new(config.dimension)))
        }
        #[cfg(feature = "candle")]
        "candle" => {
            let dir = model::resolve_model_dir(config.model_dir_path()).map_err(|e| Error::InvalidConfig(format!("{e:#}")))?;
            let model = BgeM3Embedder::load(&dir, config.dimension).map_err(|e| Error::embedding(&e))?;
            Ok(Arc::new(model))
        }
        #[cfg(not(feature = "candle"))]
        "candle" => Err(Error::InvalidConfig("embedding.provider = \"candle\" requires the `candle` feature".into())),
        other => Err(Error::InvalidConfig(format!("unknown embedding provider '{other}'"))),
    }
}
