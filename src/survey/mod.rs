//! Survey and task-comprehension scoring.
//!
//! Three stages, mirroring the study's extraction pipeline:
//!
//! * [`keys`]     — flat-file answer keys (yes/no and cloze)
//! * [`response`] — the raw survey export and condition decoding
//! * [`score`]    — per-task scoring against the keys
//!
//! plus the CSV writers for `task-results.csv`, `task-scores.csv` and
//! `questionnaire-answers.csv`.
pub mod keys;
pub mod response;
pub mod score;

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::{Condition, Model};
use keys::AnswerKeys;
use response::{determine_condition, SurveyData};
use score::{score_cloze, score_yes_no, split_cloze_answers, yes_no_total, ClozeScore};

// Answer blocks in the survey export (inclusive header ranges / raw cells).
const YES_NO_FE: (&str, &str) = ("FAC_1", "FAC_12");
const YES_NO_VB: (&str, &str) = ("VB_C1", "VB_C12");
const OPEN_FE: (&str, &str) = ("FE_P1", "FE_P5");
const OPEN_VB: (&str, &str) = ("VB_P1", "VB_P5");
const CLOZE_FE: &str = "Q88";
const CLOZE_VB: &str = "Q86";

/// Source column → output column mapping for the questionnaire extraction.
const QUESTIONNAIRE_COLUMNS: &[(&str, &str)] = &[
    ("Q113", "age"),
    ("Q114", "gender"),
    ("ERK", "erd.exp"),
    ("DBK", "db.exp"),
    ("BTK", "BTK.1"),
    ("BTK_1", "BTK.2"),
    ("BTK_2", "BTK.3"),
    ("BTK_3", "BTK.4"),
    ("BTK_4", "BTK.5"),
    ("BTK_5", "BTK.6"),
    ("RFK", "RFK.1"),
    ("RPK_1", "RFK.2"),
    ("RPK_2", "RFK.3"),
    ("RPK_3", "RFK.4"),
    ("RPK_4", "RFK.5"),
    ("RPK_5", "RFK.6"),
    ("Understand1", "understand.1"),
    ("Understand2", "understand.2"),
    ("Use1", "use.1"),
    ("Use2R", "use.2"),
    ("Load1", "load"),
    ("ENG1", "eng.1"),
    ("ENG2", "eng.2"),
    ("ENG3", "eng.3"),
];

/// One model's scored tasks for one participant.
#[derive(Debug, Clone)]
pub struct ModelTasks {
    pub yes_no: Vec<u8>,
    /// Free-text problem-solving answers, kept verbatim for manual rating.
    pub open: Vec<String>,
    /// `None` when the participant skipped the cloze test entirely.
    pub cloze: Option<Vec<ClozeScore>>,
}

/// All scored tasks for one participant.
#[derive(Debug, Clone)]
pub struct ParticipantRecord {
    /// 1-based participant number (row order of the export).
    pub participant: usize,
    pub condition: Option<Condition>,
    /// Model presentation order; empty when the flow columns were malformed.
    pub order: Vec<Model>,
    pub fe: ModelTasks,
    pub vb: ModelTasks,
}

impl ParticipantRecord {
    pub fn tasks(&self, model: Model) -> &ModelTasks {
        match model {
            Model::Fe => &self.fe,
            Model::Vb => &self.vb,
        }
    }
}

fn extract_model_tasks(
    data: &SurveyData,
    row: usize,
    keys: &AnswerKeys,
    model: Model,
) -> Result<ModelTasks> {
    let (yn_range, open_range, cloze_col) = match model {
        Model::Fe => (YES_NO_FE, OPEN_FE, CLOZE_FE),
        Model::Vb => (YES_NO_VB, OPEN_VB, CLOZE_VB),
    };

    let yn_answers = data.range(row, yn_range.0, yn_range.1)?;
    let open = data.range(row, open_range.0, open_range.1)?;
    let cloze_answers = split_cloze_answers(data.get(row, cloze_col));

    Ok(ModelTasks {
        yes_no: score_yes_no(keys.yes_no(model), &yn_answers),
        open,
        cloze: score_cloze(keys.cloze(model), &cloze_answers),
    })
}

/// Extract and score every participant in the export.
pub fn score_participants(data: &SurveyData, keys: &AnswerKeys) -> Result<Vec<ParticipantRecord>> {
    let mut records = Vec::with_capacity(data.n_rows());
    for row in 0..data.n_rows() {
        let (condition, order) = determine_condition(data, row);
        if condition.is_none() {
            log::warn!("participant {}: unrecognized flow columns", row + 1);
        }
        records.push(ParticipantRecord {
            participant: row + 1,
            condition,
            order,
            fe: extract_model_tasks(data, row, keys, Model::Fe)?,
            vb: extract_model_tasks(data, row, keys, Model::Vb)?,
        });
    }
    Ok(records)
}

fn order_label(order: &[Model]) -> String {
    order
        .iter()
        .map(|m| m.label())
        .collect::<Vec<_>>()
        .join("|")
}

fn join_scores(scores: &[u8]) -> String {
    scores
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

fn join_cloze(cloze: &Option<Vec<ClozeScore>>) -> String {
    match cloze {
        None => String::new(),
        Some(scores) => scores
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(";"),
    }
}

/// Write `task-results.csv`: per participant, the full per-question scores
/// and the verbatim open answers.
pub fn write_task_results(records: &[ParticipantRecord], path: &Path) -> Result<()> {
    let mut w = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    w.write_record([
        "participant",
        "condition",
        "order",
        "FE.yesno",
        "FE.open",
        "FE.cloze",
        "VB.yesno",
        "VB.open",
        "VB.cloze",
    ])?;

    for r in records {
        w.write_record([
            r.participant.to_string(),
            r.condition.map(|c| c.label().to_string()).unwrap_or_default(),
            order_label(&r.order),
            join_scores(&r.fe.yes_no),
            r.fe.open.join(";"),
            join_cloze(&r.fe.cloze),
            join_scores(&r.vb.yes_no),
            r.vb.open.join(";"),
            join_cloze(&r.vb.cloze),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Write `task-scores.csv`: summed yes/no scores plus empty columns where the
/// manually rated open/cloze totals get filled in later.
pub fn write_task_scores(records: &[ParticipantRecord], path: &Path) -> Result<()> {
    let mut w = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    w.write_record([
        "participant",
        "condition",
        "order",
        "FE.yesno",
        "FE.open.total",
        "FE.open.correct",
        "FE.cloze",
        "VB.yesno",
        "VB.open.total",
        "VB.open.correct",
        "VB.cloze",
    ])?;

    for r in records {
        w.write_record([
            r.participant.to_string(),
            r.condition.map(|c| c.label().to_string()).unwrap_or_default(),
            order_label(&r.order),
            yes_no_total(&r.fe.yes_no).to_string(),
            String::new(),
            String::new(),
            String::new(),
            yes_no_total(&r.vb.yes_no).to_string(),
            String::new(),
            String::new(),
            String::new(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Write `questionnaire-answers.csv` from the fixed column mapping.
///
/// The age column is validated as an integer; a malformed cell is written
/// empty with a warning, and the batch continues.
pub fn write_questionnaire(data: &SurveyData, path: &Path) -> Result<()> {
    let mut w = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec!["participant".to_string()];
    header.extend(QUESTIONNAIRE_COLUMNS.iter().map(|(_, out)| out.to_string()));
    w.write_record(&header)?;

    for row in 0..data.n_rows() {
        let mut record = vec![(row + 1).to_string()];
        for &(source, out) in QUESTIONNAIRE_COLUMNS {
            let raw = data.get(row, source).unwrap_or("").to_string();
            let value = if out == "age" {
                match raw.trim().parse::<i64>() {
                    Ok(age) => age.to_string(),
                    Err(_) => {
                        log::warn!(
                            "participant {}: malformed age '{raw}', leaving empty",
                            row + 1
                        );
                        String::new()
                    }
                }
            } else {
                raw
            };
            record.push(value);
        }
        w.write_record(&record)?;
    }
    w.flush()?;
    Ok(())
}
