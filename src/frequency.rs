use itertools::Itertools;
use serde::Serialize;

use crate::balance::average;
use crate::error::{DraftError, Result};

/// Number of letters a table can hold
pub const ALPHABET_LEN: usize = 26;

/// Occurrence count and relative frequency of one letter in the corpus
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LetterStat {
    pub letter: char,
    pub count: usize,
    pub frequency: f64,
}

impl LetterStat {
    pub fn new(letter: char, count: usize, frequency: f64) -> Self {
        Self {
            letter,
            count,
            frequency,
        }
    }
}

/// Per-letter statistics for every letter observed in a normalized corpus.
///
/// Only the 26 ASCII letters are counted; they are case-folded to upper case.
/// The frequency denominator is the full character length of the corpus, so
/// punctuation and inner whitespace dilute every letter equally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyTable {
    stats: Vec<LetterStat>,
    corpus_len: usize,
}

impl FrequencyTable {
    pub fn build(corpus: &str) -> Self {
        let mut counts = [0usize; ALPHABET_LEN];
        let mut corpus_len = 0;

        for c in corpus.chars() {
            corpus_len += 1;
            if c.is_ascii_alphabetic() {
                counts[(c.to_ascii_uppercase() as u8 - b'A') as usize] += 1;
            }
        }

        // corpus_len is non-zero whenever any count is
        let stats = counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(i, &count)| {
                LetterStat::new(
                    (b'A' + i as u8) as char,
                    count,
                    count as f64 / corpus_len as f64,
                )
            })
            .collect();

        Self { stats, corpus_len }
    }

    /// Build a table from precomputed stats. Letters must be distinct, so
    /// there can be at most 26 of them.
    pub fn from_stats(stats: Vec<LetterStat>) -> Result<Self> {
        if stats.len() > ALPHABET_LEN {
            return Err(DraftError::InvalidConfig(format!(
                "{} letter stats given, at most {ALPHABET_LEN} allowed",
                stats.len()
            )));
        }
        if let Some(dup) = stats.iter().map(|s| s.letter).duplicates().next() {
            return Err(DraftError::InvalidConfig(format!(
                "letter {dup:?} appears more than once"
            )));
        }

        let corpus_len = stats.iter().map(|s| s.count).sum();
        Ok(Self { stats, corpus_len })
    }

    pub fn stats(&self) -> &[LetterStat] {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn corpus_len(&self) -> usize {
        self.corpus_len
    }

    /// Mean frequency over all observed letters, 0 for an empty table
    pub fn baseline(&self) -> f64 {
        average(self.stats.iter().map(|s| s.frequency))
    }

    pub fn get(&self, letter: char) -> Option<&LetterStat> {
        let letter = letter.to_ascii_uppercase();
        self.stats.iter().find(|s| s.letter == letter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_build_counts_and_frequencies() {
        let table = FrequencyTable::build("AAAABBBBCCCCDDDD");

        assert_eq!(table.len(), 4);
        assert_eq!(table.corpus_len(), 16);
        for stat in table.stats() {
            assert_eq!(stat.count, 4);
            assert_eq!(stat.frequency, 0.25);
        }
    }

    #[test]
    fn test_build_is_alphabetical() {
        let table = FrequencyTable::build("ZYXABC");
        let letters: String = table.stats().iter().map(|s| s.letter).collect();
        assert_eq!(letters, "ABCXYZ");
    }

    #[test]
    fn test_build_case_folds() {
        let table = FrequencyTable::build("aA");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get('a').unwrap().count, 2);
    }

    #[test]
    fn test_non_letters_count_toward_length_only() {
        let table = FrequencyTable::build("AB, 12");

        assert_eq!(table.len(), 2);
        assert_eq!(table.corpus_len(), 6);
        assert_eq!(table.get('A').unwrap().frequency, 1.0 / 6.0);
        assert!(table.get('1').is_none());
    }

    #[test]
    fn test_empty_corpus_yields_empty_table() {
        let table = FrequencyTable::build("");
        assert!(table.is_empty());
        assert_eq!(table.corpus_len(), 0);
        assert_eq!(table.baseline(), 0.0);
    }

    #[test]
    fn test_corpus_without_letters_yields_empty_table() {
        let table = FrequencyTable::build("123 !?");
        assert!(table.is_empty());
        assert_eq!(table.corpus_len(), 6);
    }

    #[test]
    fn test_baseline_is_mean_frequency() {
        let table = FrequencyTable::build("AAAB");
        // (0.75 + 0.25) / 2
        assert_eq!(table.baseline(), 0.5);
    }

    #[test]
    fn test_from_stats_rejects_more_letters_than_alphabet() {
        let stats: Vec<LetterStat> = (0..300u32)
            .map(|i| LetterStat::new(char::from_u32(0x100 + i).unwrap(), 1, 1.0 / 300.0))
            .collect();
        assert_matches!(
            FrequencyTable::from_stats(stats),
            Err(DraftError::InvalidConfig(_))
        );
    }

    #[test]
    fn test_from_stats_rejects_duplicate_letters() {
        let stats = vec![
            LetterStat::new('A', 1, 0.5),
            LetterStat::new('A', 1, 0.5),
        ];
        assert_matches!(
            FrequencyTable::from_stats(stats),
            Err(DraftError::InvalidConfig(_))
        );
    }

    #[test]
    fn test_from_stats_full_alphabet() {
        let stats: Vec<LetterStat> = ('A'..='Z')
            .map(|c| LetterStat::new(c, 2, 1.0 / 26.0))
            .collect();
        let table = FrequencyTable::from_stats(stats).unwrap();
        assert_eq!(table.len(), ALPHABET_LEN);
        assert_eq!(table.corpus_len(), 52);
    }

    #[test]
    fn test_frequencies_sum_to_one_for_letter_only_corpus() {
        let table = FrequencyTable::build("THEQUICKBROWNFOXJUMPSOVERTHELAZYDOG");
        let total: f64 = table.stats().iter().map(|s| s.frequency).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(table.len(), 26);
    }
}
