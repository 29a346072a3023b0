//! Survey export loading and per-participant condition decoding.
//!
//! The export is a delimited text file whose first records are instrument
//! metadata; only the last `n_subj` records are real participants.  Columns
//! are addressed by header name, including pandas-style inclusive ranges for
//! the blocks of task answers.
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;

use crate::config::{Condition, Model};

// Qualtrics flow columns encoding condition and model order.
const FLOW_CONDITION: &str = "FL_87_DO";
const FLOW_CONTROL_ORDER: &str = "FL_72_DO";
const FLOW_TREATMENT_ORDER: &str = "FL_81_DO";

/// Raw survey data for the actual participants (last `n_subj` records).
pub struct SurveyData {
    headers: Vec<String>,
    col: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl SurveyData {
    /// Load the export and keep the last `n_subj` records.
    pub fn load(path: &Path, n_subj: usize) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("reading survey data {}", path.display()))?;

        let headers: Vec<String> =
            reader.headers()?.iter().map(String::from).collect();
        let col: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(String::from).collect());
        }
        let skip = rows.len().saturating_sub(n_subj);
        let rows: Vec<Vec<String>> = rows.into_iter().skip(skip).collect();
        log::info!("extracted {} participant records", rows.len());

        Ok(Self { headers, col, rows })
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Cell value by header name; `None` when the column is unknown or the
    /// record is short.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = *self.col.get(column)?;
        self.rows.get(row)?.get(idx).map(String::as_str)
    }

    /// All cell values in the inclusive column range `start..=end` (pandas
    /// label-slice semantics).  Short records pad with empty strings.
    pub fn range(&self, row: usize, start: &str, end: &str) -> Result<Vec<String>> {
        let s = *self
            .col
            .get(start)
            .with_context(|| format!("unknown column '{start}'"))?;
        let e = *self
            .col
            .get(end)
            .with_context(|| format!("unknown column '{end}'"))?;
        anyhow::ensure!(s <= e, "column '{start}' is after '{end}'");

        let record = self
            .rows
            .get(row)
            .with_context(|| format!("row {row} out of range"))?;
        Ok((s..=e)
            .map(|i| record.get(i).cloned().unwrap_or_default())
            .collect())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

/// Decode a participant's condition and model presentation order from the
/// flow columns.
///
/// Unrecognized flow values give `(None, [])`; the caller logs and continues
/// with defaults rather than aborting the batch.
pub fn determine_condition(data: &SurveyData, row: usize) -> (Option<Condition>, Vec<Model>) {
    let flow = data.get(row, FLOW_CONDITION).unwrap_or("");
    match flow {
        "FL_72" => {
            let order = match data.get(row, FLOW_CONTROL_ORDER).unwrap_or("") {
                "FL_51|FL_66" => vec![Model::Vb, Model::Fe],
                "FL_66|FL_51" => vec![Model::Fe, Model::Vb],
                _ => vec![],
            };
            (Some(Condition::Control), order)
        }
        "FL_81" => {
            let order = match data.get(row, FLOW_TREATMENT_ORDER).unwrap_or("") {
                "FL_59|FL_75" => vec![Model::Vb, Model::Fe],
                "FL_75|FL_59" => vec![Model::Fe, Model::Vb],
                _ => vec![],
            };
            (Some(Condition::Treatment), order)
        }
        _ => (None, vec![]),
    }
}
