//! Flat-file answer keys.
//!
//! Yes/no keys: one answer per line; the literal `u` marks a question that is
//! not scored (always credited).  Cloze keys: one question per line,
//! comma-separated accepted answers.
use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Model;

/// Load a yes/no answer key: one trimmed answer per non-empty line.
pub fn load_yes_no_key(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading yes/no key {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}

/// Load a cloze answer key: per line, the comma-separated accepted answers,
/// trimmed and lowercased for case-insensitive matching.
pub fn load_cloze_key(path: &Path) -> Result<Vec<Vec<String>>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading cloze key {}", path.display()))?;
    Ok(text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            l.split(',')
                .map(|a| a.trim().to_lowercase())
                .collect()
        })
        .collect())
}

/// All four answer keys for the study, loaded from a directory laid out as
/// `{model}-yesno.txt` / `{model}-cloze.txt`.
pub struct AnswerKeys {
    yes_no_fe: Vec<String>,
    yes_no_vb: Vec<String>,
    cloze_fe: Vec<Vec<String>>,
    cloze_vb: Vec<Vec<String>>,
}

impl AnswerKeys {
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            yes_no_fe: load_yes_no_key(&dir.join("FE-yesno.txt"))?,
            yes_no_vb: load_yes_no_key(&dir.join("VB-yesno.txt"))?,
            cloze_fe: load_cloze_key(&dir.join("FE-cloze.txt"))?,
            cloze_vb: load_cloze_key(&dir.join("VB-cloze.txt"))?,
        })
    }

    pub fn yes_no(&self, model: Model) -> &[String] {
        match model {
            Model::Fe => &self.yes_no_fe,
            Model::Vb => &self.yes_no_vb,
        }
    }

    pub fn cloze(&self, model: Model) -> &[Vec<String>] {
        match model {
            Model::Fe => &self.cloze_fe,
            Model::Vb => &self.cloze_vb,
        }
    }
}
