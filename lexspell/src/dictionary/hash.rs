//! Fixed-capacity open-addressing hash table.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{prime, Dictionary, DictionaryError};

/// Collision resolution strategy, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeStrategy {
    /// Probe successive slots one step at a time.
    LinearProbing,
    /// Probe with a per-word step derived from a second hash function.
    DoubleHashing,
}

#[derive(Debug, Clone)]
struct Slot {
    word: SmolStr,
    frequency: u32,
    /// Collisions stepped through when the word was first placed.
    probes: u32,
}

/// Open-addressing word-frequency table.
///
/// Capacity is fixed at construction as the smallest prime at or above
/// the requested size; the table never resizes. Prime sizing keeps the
/// double-hashing probe sequence coprime with the table length, so every
/// slot is visited before the sequence repeats.
#[derive(Debug)]
pub struct HashDictionary {
    slots: Vec<Option<Slot>>,
    strategy: ProbeStrategy,
    len: usize,
}

fn h1(word: &str) -> u64 {
    word.bytes()
        .fold(0u64, |hash, byte| hash.wrapping_mul(31).wrapping_add(u64::from(byte)))
}

fn h2(word: &str) -> u64 {
    word.bytes()
        .fold(5381u64, |hash, byte| hash.wrapping_mul(33) ^ u64::from(byte))
}

impl HashDictionary {
    /// Creates an empty table with the smallest prime capacity at or
    /// above `capacity` (minimum 2).
    pub fn new(capacity: usize, strategy: ProbeStrategy) -> HashDictionary {
        let prime_capacity = prime::next_prime(capacity);
        if prime_capacity != capacity {
            log::debug!(
                "requested capacity {} upgraded to prime {}",
                capacity,
                prime_capacity
            );
        }
        HashDictionary {
            slots: vec![None; prime_capacity],
            strategy,
            len: 0,
        }
    }

    /// The fixed slot count of the table.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The collision strategy this table was built with.
    pub fn strategy(&self) -> ProbeStrategy {
        self.strategy
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no word has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn step(&self, word: &str) -> usize {
        match self.strategy {
            ProbeStrategy::LinearProbing => 1,
            // capacity is at least 2, so the modulus is never zero and
            // the step always lands in [1, capacity - 1]
            ProbeStrategy::DoubleHashing => {
                1 + (h2(word) % (self.slots.len() as u64 - 1)) as usize
            }
        }
    }

    /// Records one occurrence of `word`.
    ///
    /// Fails with [`DictionaryError::TableFull`] once every slot has been
    /// probed without finding a free or matching one.
    pub fn insert(&mut self, word: &str) -> Result<(), DictionaryError> {
        let capacity = self.slots.len();
        let step = self.step(word);
        let mut index = (h1(word) % capacity as u64) as usize;

        for collisions in 0..capacity as u32 {
            match &mut self.slots[index] {
                Some(slot) if slot.word == word => {
                    slot.frequency += 1;
                    return Ok(());
                }
                Some(_) => index = (index + step) % capacity,
                slot @ None => {
                    *slot = Some(Slot {
                        word: SmolStr::new(word),
                        frequency: 1,
                        probes: collisions,
                    });
                    self.len += 1;
                    if self.len == capacity {
                        log::warn!("hash table reached capacity ({} slots)", capacity);
                    }
                    return Ok(());
                }
            }
        }

        Err(DictionaryError::TableFull { capacity })
    }

    /// Returns the stored frequency of `word`, `0` when absent.
    ///
    /// Follows the same probe sequence as [`insert`](Self::insert) and
    /// gives up at the first empty slot, or after a full sweep of a
    /// completely occupied table.
    pub fn search(&self, word: &str) -> u32 {
        let capacity = self.slots.len();
        let step = self.step(word);
        let mut index = (h1(word) % capacity as u64) as usize;

        for _ in 0..capacity {
            match &self.slots[index] {
                Some(slot) if slot.word == word => return slot.frequency,
                Some(_) => index = (index + step) % capacity,
                None => return 0,
            }
        }

        0
    }

    /// Iterates over `(word, frequency)` pairs in slot-index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.slots
            .iter()
            .flatten()
            .map(|slot| (slot.word.as_str(), slot.frequency))
    }

    /// Dumps every slot, empty or occupied, in index order. Diagnostic
    /// output only.
    pub fn print_entire_table<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{:>5} {:>5} {:>5}   {}", "Pos", "Freq", "Coll", "Word")?;
        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                Some(slot) => writeln!(
                    out,
                    "{:>5} {:>5} {:>5}   {}",
                    index, slot.frequency, slot.probes, slot.word
                )?,
                None => writeln!(out, "{:>5} {:>5} {:>5}", index, 0, 0)?,
            }
        }
        Ok(())
    }

    /// Partitions the slot array into `segments` contiguous ranges and
    /// reports occupancy and probe cost per range, exposing the
    /// clustering behavior of the chosen strategy.
    pub fn print_stats<W: Write>(&self, out: &mut W, segments: usize) -> io::Result<()> {
        let capacity = self.slots.len();
        let segments = segments.clamp(1, capacity);

        writeln!(
            out,
            "{:>11} {:>8} {:>10} {:>8} {:>16}",
            "segment", "slots", "occupied", "% full", "avg collisions"
        )?;

        let base = capacity / segments;
        let remainder = capacity % segments;
        let mut start = 0;
        for segment in 0..segments {
            let len = base + usize::from(segment < remainder);
            let range = &self.slots[start..start + len];

            let occupied = range.iter().flatten().count();
            let collisions: u64 = range
                .iter()
                .flatten()
                .map(|slot| u64::from(slot.probes))
                .sum();
            let percent = 100.0 * occupied as f64 / len as f64;
            let average = if occupied == 0 {
                0.0
            } else {
                collisions as f64 / occupied as f64
            };

            writeln!(
                out,
                "{:>4}..{:>5} {:>8} {:>10} {:>8.1} {:>16.2}",
                start,
                start + len,
                len,
                occupied,
                percent,
                average
            )?;
            start += len;
        }
        Ok(())
    }
}

impl Dictionary for HashDictionary {
    fn insert(&mut self, word: &str) -> Result<(), DictionaryError> {
        HashDictionary::insert(self, word)
    }

    fn search(&self, word: &str) -> u32 {
        HashDictionary::search(self, word)
    }

    fn len(&self) -> usize {
        HashDictionary::len(self)
    }
}

#[cfg(test)]
mod tests {
    use hashbrown::HashMap;

    use super::*;

    const STRATEGIES: [ProbeStrategy; 2] =
        [ProbeStrategy::LinearProbing, ProbeStrategy::DoubleHashing];

    #[test]
    fn capacity_is_upgraded_to_a_prime() {
        assert_eq!(HashDictionary::new(0, ProbeStrategy::LinearProbing).capacity(), 2);
        assert_eq!(HashDictionary::new(10, ProbeStrategy::LinearProbing).capacity(), 11);
        assert_eq!(HashDictionary::new(113, ProbeStrategy::DoubleHashing).capacity(), 113);
        assert_eq!(HashDictionary::new(114, ProbeStrategy::DoubleHashing).capacity(), 127);
    }

    #[test]
    fn counts_repeated_insertions() {
        let mut table = HashDictionary::new(7, ProbeStrategy::LinearProbing);
        for word in ["pear", "apple", "pear"] {
            table.insert(word).unwrap();
        }

        assert_eq!(table.search("pear"), 2);
        assert_eq!(table.search("apple"), 1);
        assert_eq!(table.search("kiwi"), 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn inserting_a_word_k_times_yields_frequency_k() {
        for strategy in STRATEGIES {
            let mut table = HashDictionary::new(5, strategy);
            for _ in 0..42 {
                table.insert("echo").unwrap();
            }
            assert_eq!(table.search("echo"), 42);
            assert_eq!(table.len(), 1);
        }
    }

    #[test]
    fn matches_a_hash_map_model() {
        let words = [
            "the", "quick", "brown", "fox", "jumps", "over", "the", "lazy", "dog", "the",
            "quick", "fox", "fox", "vexed", "zebras", "jumps", "a", "dozen", "lazy", "dogs",
        ];

        for strategy in STRATEGIES {
            let mut table = HashDictionary::new(31, strategy);
            let mut model: HashMap<&str, u32> = HashMap::new();

            for word in words {
                table.insert(word).unwrap();
                *model.entry(word).or_insert(0) += 1;
            }

            for (word, frequency) in &model {
                assert_eq!(table.search(word), *frequency, "word {:?}", word);
            }
            assert_eq!(table.len(), model.len());
            assert_eq!(table.search("absent"), 0);
        }
    }

    #[test]
    fn no_false_negatives_up_to_capacity() {
        let words = ["ant", "bee", "cat", "dog", "eel", "fly", "gnu"];
        for strategy in STRATEGIES {
            let mut table = HashDictionary::new(7, strategy);
            assert_eq!(table.capacity(), 7);
            for word in words {
                table.insert(word).unwrap();
            }
            for word in words {
                assert_eq!(table.search(word), 1, "word {:?}", word);
            }
        }
    }

    #[test]
    fn full_table_rejects_further_distinct_words() {
        let mut table = HashDictionary::new(5, ProbeStrategy::LinearProbing);
        for word in ["ant", "bee", "cat", "dog", "eel"] {
            table.insert(word).unwrap();
        }

        assert_eq!(
            table.insert("fly"),
            Err(DictionaryError::TableFull { capacity: 5 })
        );
        // existing entries are untouched by the failed insert
        assert_eq!(table.search("ant"), 1);
        // and a full sweep for an absent word still terminates
        assert_eq!(table.search("fly"), 0);
    }

    #[test]
    fn double_hashing_resolves_primary_collisions() {
        // all three share a home slot in a capacity-3 table
        assert_eq!(h1("a") % 3, h1("d") % 3);
        assert_eq!(h1("a") % 3, h1("g") % 3);

        let mut table = HashDictionary::new(3, ProbeStrategy::DoubleHashing);
        for word in ["a", "d", "g"] {
            table.insert(word).unwrap();
        }

        for word in ["a", "d", "g"] {
            assert_eq!(table.search(word), 1, "word {:?}", word);
        }
        assert_eq!(
            table.insert("j"),
            Err(DictionaryError::TableFull { capacity: 3 })
        );
    }

    #[test]
    fn iter_walks_occupied_slots_in_index_order() {
        let mut table = HashDictionary::new(11, ProbeStrategy::LinearProbing);
        for word in ["one", "two", "two", "three"] {
            table.insert(word).unwrap();
        }

        let entries: Vec<(&str, u32)> = table.iter().collect();
        assert_eq!(entries.len(), 3);
        assert!(entries.contains(&("one", 1)));
        assert!(entries.contains(&("two", 2)));
        assert!(entries.contains(&("three", 1)));
    }

    #[test]
    fn entire_table_dump_covers_every_slot() {
        let mut table = HashDictionary::new(5, ProbeStrategy::LinearProbing);
        table.insert("pear").unwrap();
        table.insert("pear").unwrap();

        let mut out = Vec::new();
        table.print_entire_table(&mut out).unwrap();
        let dump = String::from_utf8(out).unwrap();

        // one header line plus one line per slot
        assert_eq!(dump.lines().count(), 1 + table.capacity());
        assert!(dump.contains("pear"));
    }

    #[test]
    fn stats_partition_accounts_for_every_entry() {
        let mut table = HashDictionary::new(11, ProbeStrategy::DoubleHashing);
        for word in ["ant", "bee", "cat", "dog", "eel"] {
            table.insert(word).unwrap();
        }

        let mut out = Vec::new();
        table.print_stats(&mut out, 3).unwrap();
        let stats = String::from_utf8(out).unwrap();
        let rows: Vec<&str> = stats.lines().skip(1).collect();
        assert_eq!(rows.len(), 3);

        // row shape: "start..", "end", "slots", "occupied", "% full", "avg"
        let occupied: usize = rows
            .iter()
            .map(|row| {
                row.split_whitespace()
                    .nth(3)
                    .unwrap()
                    .parse::<usize>()
                    .unwrap()
            })
            .sum();
        assert_eq!(occupied, table.len());
    }

    #[test]
    fn stats_segment_count_is_clamped() {
        let table = HashDictionary::new(3, ProbeStrategy::LinearProbing);

        let mut out = Vec::new();
        table.print_stats(&mut out, 0).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);

        let mut out = Vec::new();
        table.print_stats(&mut out, 99).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap().lines().count(),
            1 + table.capacity()
        );
    }
}
