//! docqa-text
//!
//! Keyword search by token-set overlap. See `tokenize` for how text is split
//! and `index` for the scoring rule.

pub mod index;
pub mod tokenize;

pub use index::{score, LexicalHit, LexicalIndex};
pub use tokenize::{tokenize, unique_tokens};
