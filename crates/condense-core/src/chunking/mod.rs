//! Text chunking
//!
//! Long text is split on sentence boundaries and packed greedily into chunks
//! that never exceed a configured number of characters.
//!
//! - `sentence`: sentence boundary splitting
//! - `builder`: greedy packing with forced windowing of oversized sentences

mod builder;
mod sentence;

pub use builder::{Chunk, ChunkBuilder, DEFAULT_MAX_CHARS};
pub use sentence::split_sentences;
