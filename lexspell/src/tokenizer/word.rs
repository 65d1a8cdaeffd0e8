//! Iterators over the normalized words of a string.

use std::str::CharIndices;

use smol_str::SmolStr;

/// Iterator over normalized words, created by
/// [`Tokenize::words`](super::Tokenize::words).
pub struct Words<'a> {
    inner: WordIndices<'a>,
}

impl<'a> Words<'a> {
    pub(crate) fn new(text: &'a str) -> Words<'a> {
        Words {
            inner: WordIndices::new(text),
        }
    }
}

impl Iterator for Words<'_> {
    type Item = SmolStr;

    fn next(&mut self) -> Option<SmolStr> {
        self.inner.next().map(|(_, word)| word)
    }
}

/// Iterator over `(byte offset, normalized word)` pairs, created by
/// [`Tokenize::word_indices`](super::Tokenize::word_indices).
pub struct WordIndices<'a> {
    chars: CharIndices<'a>,
}

impl<'a> WordIndices<'a> {
    pub(crate) fn new(text: &'a str) -> WordIndices<'a> {
        WordIndices {
            chars: text.char_indices(),
        }
    }
}

impl Iterator for WordIndices<'_> {
    type Item = (usize, SmolStr);

    fn next(&mut self) -> Option<(usize, SmolStr)> {
        // skip to the start of the next word
        let (start, first) = loop {
            let (index, ch) = self.chars.next()?;
            if ch.is_alphanumeric() {
                break (index, ch);
            }
        };

        let mut word = String::new();
        word.extend(first.to_lowercase());

        // An apostrophe continues the run without joining it; anything
        // else non-alphanumeric ends the word.
        for (_, ch) in self.chars.by_ref() {
            if ch.is_alphanumeric() {
                word.extend(ch.to_lowercase());
            } else if ch != '\'' {
                break;
            }
        }

        Some((start, SmolStr::from(word)))
    }
}
