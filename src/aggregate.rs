//! Baseline-corrected index aggregation.
//!
//! Loops channel (outer, montage order) × participant (inner, ascending) over
//! a condition's dataset and fills one preallocated `[P, C]` table per
//! task-type × model.  A participant whose baseline triple is the missing
//! sentinel keeps NaN in every cell for that channel × model and is logged —
//! missing data never aborts the batch.
use anyhow::{ensure, Result};
use ndarray::Array2;

use crate::config::{Condition, Model, Stage, StudyConfig, TaskType};
use crate::dataset::PowerDataset;
use crate::index::baseline_corrected;

/// Baseline-corrected engagement indices for one condition × model ×
/// task-type.  Rows are participants (group order), columns are channels
/// (montage order); NaN marks a skipped participant.
#[derive(Debug, Clone)]
pub struct IndexTable {
    pub condition: Condition,
    pub model: Model,
    pub task: TaskType,
    pub values: Array2<f64>,
}

impl IndexTable {
    fn new(condition: Condition, model: Model, task: TaskType, p: usize, c: usize) -> Self {
        Self {
            condition,
            model,
            task,
            values: Array2::from_elem((p, c), f64::NAN),
        }
    }

    /// All valid (non-NaN) entries for one channel, participant order
    /// preserved.  Length equals group size minus skipped participants.
    pub fn valid_column(&self, channel: usize) -> Vec<f64> {
        self.values
            .column(channel)
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .collect()
    }

    /// Output file name used by the original tooling: `indices-control-FE.csv` etc.
    pub fn file_name(&self) -> String {
        format!("indices-{}-{}.csv", self.condition, self.model)
    }
}

/// Compute the eight index tables (2 models × 4 task types) for one
/// condition group.
///
/// Iteration is channel-outer / participant-inner, so skip warnings come out
/// grouped by channel exactly as downstream tooling expects.
pub fn compute_condition_tables(
    data: &PowerDataset,
    cfg: &StudyConfig,
) -> Result<Vec<IndexTable>> {
    ensure!(
        data.n_channels() == cfg.n_channels(),
        "dataset has {} channels, montage has {}",
        data.n_channels(),
        cfg.n_channels()
    );
    let n_part = data.n_participants();
    let n_chan = data.n_channels();

    let mut tables: Vec<IndexTable> = Vec::with_capacity(8);
    for task in TaskType::ALL {
        for model in Model::ALL {
            tables.push(IndexTable::new(data.condition, model, task, n_part, n_chan));
        }
    }

    for chan in 0..n_chan {
        for part in 0..n_part {
            for model in Model::ALL {
                let baseline = data.triple(Stage::Baseline, model, part, chan);
                if baseline.is_missing() {
                    log::warn!(
                        "{} baseline missing for participant {}, channel {} ({})",
                        data.condition,
                        part + 1,
                        cfg.channels[chan],
                        model,
                    );
                    // Table cells stay NaN.
                    continue;
                }
                for table in tables
                    .iter_mut()
                    .filter(|t| t.model == model)
                {
                    let task_powers =
                        data.triple(Stage::Task(table.task), model, part, chan);
                    table.values[[part, chan]] = baseline_corrected(baseline, task_powers);
                }
            }
        }
    }

    Ok(tables)
}

/// Compute index tables for both condition groups (16 tables total).
pub fn compute_tables(
    control: &PowerDataset,
    treatment: &PowerDataset,
    cfg: &StudyConfig,
) -> Result<Vec<IndexTable>> {
    let mut tables = compute_condition_tables(control, cfg)?;
    tables.extend(compute_condition_tables(treatment, cfg)?);
    Ok(tables)
}

/// Find the table for a given condition × model × task.
pub fn find_table(
    tables: &[IndexTable],
    condition: Condition,
    model: Model,
    task: TaskType,
) -> Option<&IndexTable> {
    tables
        .iter()
        .find(|t| t.condition == condition && t.model == model && t.task == task)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_column_filters_nan() {
        let mut t = IndexTable::new(Condition::Control, Model::Fe, TaskType::Total, 4, 2);
        t.values[[0, 0]] = 0.5;
        t.values[[2, 0]] = -0.25;
        let col = t.valid_column(0);
        assert_eq!(col, vec![0.5, -0.25]);
        assert!(t.valid_column(1).is_empty());
    }

    #[test]
    fn table_file_names_match_original_layout() {
        let t = IndexTable::new(Condition::Treatment, Model::Vb, TaskType::Cloze, 1, 1);
        assert_eq!(t.file_name(), "indices-treatment-VB.csv");
    }
}
