//! docqa-vector
//!
//! Exact nearest-neighbour search over an in-memory, row-major matrix of
//! embeddings. Rows are addressed by insertion position.

pub mod flat;

pub use flat::{distance_to_similarity, squared_l2, FlatL2Index};
