//! Word extraction from text streams.
//!
//! Dictionaries consume normalized tokens: maximal alphanumeric runs,
//! lowercased, with interior apostrophes tolerated but not stored
//! (`don't` becomes `dont`). Iterators are lazy and finite; calling
//! [`Tokenize::words`] again restarts tokenization from the top of the
//! stream.

use word::{WordIndices, Words};

pub mod word;

/// Extension methods tokenizing a string into normalized words.
pub trait Tokenize {
    /// Iterates over the normalized words of the stream.
    fn words(&self) -> Words;

    /// Iterates over `(byte offset, normalized word)` pairs.
    fn word_indices(&self) -> WordIndices;
}

impl Tokenize for str {
    fn words(&self) -> Words {
        Words::new(self)
    }

    fn word_indices(&self) -> WordIndices {
        WordIndices::new(self)
    }
}
