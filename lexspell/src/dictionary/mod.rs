//! Word-frequency dictionaries.
//!
//! Two interchangeable forms behind the [`Dictionary`] seam: a
//! fixed-capacity open-addressing [`HashDictionary`] and an ordered
//! [`TreeDictionary`] (plain or red-black balanced). Both are built by
//! repeated [`Dictionary::insert`] calls and queried read-only afterwards.

use thiserror::Error;

pub mod dot;
pub mod hash;
mod prime;
pub mod tree;

pub use self::hash::{HashDictionary, ProbeStrategy};
pub use self::tree::{TreeDictionary, TreeMode};

/// Errors surfaced by dictionary mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictionaryError {
    /// Every slot was probed without finding a free or matching one.
    ///
    /// The table never resizes; a full table is a hard error at the
    /// insert call site, never an endless probe loop.
    #[error("hash table is full ({capacity} slots probed without a home)")]
    TableFull {
        /// Capacity of the table that rejected the insert.
        capacity: usize,
    },
}

/// Common surface of both dictionary forms.
pub trait Dictionary {
    /// Records one occurrence of `word`.
    fn insert(&mut self, word: &str) -> Result<(), DictionaryError>;

    /// Returns the stored frequency of `word`, `0` when absent.
    fn search(&self, word: &str) -> u32;

    /// Number of distinct words stored.
    fn len(&self) -> usize;

    /// Whether the dictionary holds no words at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
