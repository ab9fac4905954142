//! Greedy sentence packing into bounded chunks

use serde::Serialize;

use super::sentence::split_sentences;
use crate::error::{Error, Result};

/// Default maximum chunk length, in characters
pub const DEFAULT_MAX_CHARS: usize = 1500;

/// A bounded piece of text ready to be summarized
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// Position of this chunk in the output sequence
    pub index: usize,
    /// Sentences joined by a single space, or one window of an oversized sentence
    pub text: String,
    /// Length of `text` in characters
    pub char_count: usize,
    /// Number of sentences packed into this chunk (1 for windows)
    pub sentence_count: usize,
    /// Whether this chunk is a fixed-size window cut from one oversized sentence
    pub window: bool,
}

impl Chunk {
    /// True when the chunk holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Packs sentences into chunks of at most `max_chars` characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkBuilder {
    max_chars: usize,
}

impl Default for ChunkBuilder {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl ChunkBuilder {
    /// Create a builder; `max_chars` must be positive
    pub fn new(max_chars: usize) -> Result<Self> {
        if max_chars == 0 {
            return Err(Error::InvalidInput(
                "chunk size must be a positive number of characters".to_string(),
            ));
        }
        Ok(Self { max_chars })
    }

    /// Maximum chunk length in characters
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Split text into sentences and pack them
    pub fn chunk_text(&self, text: &str) -> Vec<Chunk> {
        self.build(split_sentences(text))
    }

    /// Pack an ordered sequence of sentences into chunks.
    ///
    /// Sentences are appended to a running buffer while the buffer (plus one
    /// joining space) stays within `max_chars`. A sentence that does not fit
    /// flushes the buffer; if it is longer than `max_chars` on its own it is
    /// cut into consecutive `max_chars` windows, each emitted as a chunk.
    /// Blank sentences are skipped.
    pub fn build<'a, I>(&self, sentences: I) -> Vec<Chunk>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut packer = Packer::new(self.max_chars);

        for sentence in sentences {
            if sentence.trim().is_empty() {
                continue;
            }
            packer.push(sentence);
        }

        packer.finish()
    }
}

/// Running state of one `build` call
struct Packer<'a> {
    max_chars: usize,
    chunks: Vec<Chunk>,
    buffer: Vec<&'a str>,
    buffer_len: usize,
}

impl<'a> Packer<'a> {
    fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            chunks: Vec::new(),
            buffer: Vec::new(),
            buffer_len: 0,
        }
    }

    fn push(&mut self, sentence: &'a str) {
        let sentence_len = sentence.chars().count();
        let candidate = if self.buffer.is_empty() {
            sentence_len
        } else {
            self.buffer_len + sentence_len + 1
        };

        if candidate <= self.max_chars {
            self.buffer.push(sentence);
            self.buffer_len = candidate;
            return;
        }

        self.flush();

        if sentence_len > self.max_chars {
            for window in windows(sentence, self.max_chars) {
                self.emit(window.to_string(), 1, true);
            }
        } else {
            self.buffer.push(sentence);
            self.buffer_len = sentence_len;
        }
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = self.buffer.join(" ");
        let sentence_count = self.buffer.len();
        self.buffer.clear();
        self.buffer_len = 0;
        self.emit(text, sentence_count, false);
    }

    fn emit(&mut self, text: String, sentence_count: usize, window: bool) {
        let char_count = text.chars().count();
        self.chunks.push(Chunk {
            index: self.chunks.len(),
            text,
            char_count,
            sentence_count,
            window,
        });
    }

    fn finish(mut self) -> Vec<Chunk> {
        self.flush();
        self.chunks
    }
}

/// Consecutive slices of at most `size` characters, cut on char boundaries
fn windows(text: &str, size: usize) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let cut = rest
            .char_indices()
            .nth(size)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(cut);
        rest = tail;
        Some(head)
    })
}
