//! docqa-hybrid
//!
//! Hybrid retrieval: semantic and lexical rankings fused with Reciprocal Rank
//! Fusion, a TTL result cache, and the id-assigning document store on top.

pub mod context;
pub mod engine;
pub mod fusion;
pub mod result_cache;
pub mod store;

pub use context::{RetrievedContext, SourceRef};
pub use engine::HybridSearcher;
pub use fusion::{reciprocal_rank_fusion, DEFAULT_RRF_K};
pub use result_cache::ResultCache;
pub use store::DocumentStore;
