//! Build/check driver over any dictionary form.
//!
//! The build phase tokenizes one stream and inserts every word; the
//! check phase tokenizes a second stream and flags the words the
//! dictionary does not know. Timing and unknown-word counts are explicit
//! return values, so repeated runs never contaminate each other.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use itertools::Itertools;
use serde::Serialize;
use smol_str::SmolStr;

use crate::dictionary::{Dictionary, DictionaryError};
use crate::tokenizer::Tokenize;

/// Inserts every word of `text` into `dictionary`, returning the elapsed
/// fill time.
///
/// Stops at the first insertion failure (a full hash table) and surfaces
/// it unchanged.
pub fn fill<D>(dictionary: &mut D, text: &str) -> Result<Duration, DictionaryError>
where
    D: Dictionary + ?Sized,
{
    let start = Instant::now();
    for word in text.words() {
        dictionary.insert(&word)?;
    }
    let elapsed = start.elapsed();
    log::debug!(
        "filled dictionary with {} distinct words in {:?}",
        dictionary.len(),
        elapsed
    );
    Ok(elapsed)
}

/// Result of checking a document against a dictionary.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// Wall-clock time spent searching.
    pub search_time: Duration,
    /// Every unknown word occurrence, in document order.
    pub unknown: Vec<SmolStr>,
}

impl CheckOutcome {
    /// Unknown words with duplicates removed, first-seen order preserved.
    pub fn unique_unknown(&self) -> Vec<SmolStr> {
        self.unknown.iter().cloned().unique().collect()
    }
}

/// Searches `dictionary` for every word of `text`, collecting the words
/// it does not contain.
pub fn check<D>(dictionary: &D, text: &str) -> CheckOutcome
where
    D: Dictionary + ?Sized,
{
    let start = Instant::now();
    let mut unknown = Vec::new();
    for word in text.words() {
        if dictionary.search(&word) == 0 {
            unknown.push(word);
        }
    }
    let outcome = CheckOutcome {
        search_time: start.elapsed(),
        unknown,
    };
    log::debug!(
        "checked document in {:?}, {} unknown occurrences",
        outcome.search_time,
        outcome.unknown.len()
    );
    outcome
}

/// Aggregated timing and miss counts of one fill/check cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Fill time in seconds.
    pub fill_time: f64,
    /// Search time in seconds.
    pub search_time: f64,
    /// Number of unknown word occurrences.
    pub unknown_words: usize,
}

impl CheckReport {
    /// Combines a fill duration and a check outcome into a report.
    pub fn new(fill_time: Duration, outcome: &CheckOutcome) -> CheckReport {
        CheckReport {
            fill_time: fill_time.as_secs_f64(),
            search_time: outcome.search_time.as_secs_f64(),
            unknown_words: outcome.unknown.len(),
        }
    }

    /// Renders the three-line diagnostic report.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(
            out,
            "Fill time :\t{:.6}\nSearch time :\t{:.6}\nUnknown words : {}\n",
            self.fill_time, self.search_time, self.unknown_words
        )
    }
}
