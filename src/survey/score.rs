//! Task scoring against the answer keys.
use std::fmt;

/// Score for one cloze blank.
///
/// The original answer is preserved when it matches no accepted answer so a
/// human rater can credit near-misses later.
#[derive(Debug, Clone, PartialEq)]
pub enum ClozeScore {
    Correct,
    Blank,
    Other(String),
}

impl fmt::Display for ClozeScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClozeScore::Correct => f.write_str("1"),
            ClozeScore::Blank => f.write_str("0"),
            ClozeScore::Other(s) => f.write_str(s),
        }
    }
}

/// Score yes/no answers against the key: 1 for a case-insensitive match or a
/// `u` (unscored) key entry, 0 otherwise.
///
/// A missing answer (short record) scores 0 with a warning; the batch never
/// stops on malformed input.
pub fn score_yes_no(key: &[String], answers: &[String]) -> Vec<u8> {
    key.iter()
        .enumerate()
        .map(|(i, correct)| {
            if correct == "u" {
                return 1;
            }
            match answers.get(i) {
                Some(a) if a.eq_ignore_ascii_case(correct) => 1,
                Some(_) => 0,
                None => {
                    log::warn!("missing yes/no answer for question {}", i + 1);
                    0
                }
            }
        })
        .collect()
}

/// Sum of a yes/no score vector.
pub fn yes_no_total(scores: &[u8]) -> u32 {
    scores.iter().map(|&s| u32::from(s)).sum()
}

/// Split a raw cloze response into per-blank answers.
///
/// Responses are `;`-separated and end with a trailing separator, so the
/// final empty fragment is dropped.  An absent or non-string cell yields an
/// empty list (participant skipped the task).
pub fn split_cloze_answers(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        log::warn!("missing or non-string cloze entry");
        return vec![];
    };
    if raw.trim().is_empty() {
        log::warn!("missing or non-string cloze entry");
        return vec![];
    }
    let mut parts: Vec<String> = raw.split(';').map(|a| a.trim().to_string()).collect();
    parts.pop(); // trailing separator
    parts
}

/// Score cloze answers against the key.
///
/// Returns `None` when the participant gave no cloze response at all — the
/// missing-data marker, distinct from a sheet of wrong answers.  Key entries
/// are expected lowercased (see [`super::keys::load_cloze_key`]).
pub fn score_cloze(key: &[Vec<String>], answers: &[String]) -> Option<Vec<ClozeScore>> {
    if answers.is_empty() {
        return None;
    }
    let scores = key
        .iter()
        .enumerate()
        .map(|(i, accepted)| match answers.get(i) {
            Some(a) if accepted.iter().any(|acc| *acc == a.to_lowercase()) => {
                ClozeScore::Correct
            }
            Some(a) if a.is_empty() => ClozeScore::Blank,
            Some(a) => ClozeScore::Other(a.clone()),
            None => {
                log::warn!("missing cloze answer for blank {}", i + 1);
                ClozeScore::Blank
            }
        })
        .collect();
    Some(scores)
}
