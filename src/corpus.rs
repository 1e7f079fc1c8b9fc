use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;

/// Read a corpus file and normalize it: every line trimmed, upper-cased and
/// concatenated with no separator.
pub fn load<P: AsRef<Path>>(path: P) -> Result<String> {
    let file = File::open(path.as_ref())?;
    let corpus = normalize_lines(BufReader::new(file))?;
    log::debug!(
        "loaded {} normalized characters from {}",
        corpus.chars().count(),
        path.as_ref().display()
    );
    Ok(corpus)
}

pub fn normalize_lines<R: BufRead>(reader: R) -> Result<String> {
    let mut corpus = String::new();
    for line in reader.lines() {
        corpus.push_str(&line?.trim().to_uppercase());
    }
    Ok(corpus)
}

pub fn normalize(text: &str) -> String {
    text.lines().map(|line| line.trim().to_uppercase()).collect()
}
