//! # eei — EEG engagement-index analysis for the FE/VB diagram-reading study
//!
//! `eei` turns pre-computed EEG band powers (theta, alpha, beta per
//! participant × channel × task stage) into baseline-corrected engagement
//! index tables and statistically compares the control and treatment groups.
//! It also scores the study's survey and task-comprehension responses against
//! flat-file answer keys.
//!
//! ## Pipeline overview
//!
//! ```text
//! powers/control.safetensors ─┐
//! powers/treatment.safetensors┤
//!   │                         │
//!   ├─ dataset::PowerDataset  load + shape-validate [P, C, 3] arrays
//!   ├─ index                  beta / (theta + alpha), baseline-corrected
//!   ├─ aggregate              per channel × participant × task × model
//!   │                         tables, NaN marks missing baselines
//!   ├─ stats                  Mann-Whitney U (control vs treatment),
//!   │                         two-way ANOVA (condition × model)
//!   ├─ report                 indices-*.csv per task dir + report.txt
//!   └─ plot                   one PNG per channel
//!
//! survey_data.csv + answers/*.txt
//!   │
//!   ├─ survey::response       last-N extraction, condition decoding
//!   ├─ survey::score          yes/no, open, cloze scoring
//!   └─ survey                 task-results.csv, task-scores.csv,
//!                             questionnaire-answers.csv
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use eei::{compute_tables, Condition, PowerDataset, StudyConfig};
//! use std::path::Path;
//!
//! let cfg = StudyConfig::default();
//! let control = PowerDataset::load(
//!     Path::new("powers/control.safetensors"), Condition::Control, &cfg,
//! ).unwrap();
//! let treatment = PowerDataset::load(
//!     Path::new("powers/treatment.safetensors"), Condition::Treatment, &cfg,
//! ).unwrap();
//!
//! let tables = compute_tables(&control, &treatment, &cfg).unwrap();
//! for t in &tables {
//!     println!("{}-{} {}: {:?}", t.condition, t.model, t.task, t.values.dim());
//! }
//! ```
//!
//! Missing data never aborts a run: a participant whose baseline recording is
//! absent is skipped with a warning and a NaN marker, and a malformed survey
//! cell is substituted with a default.  The only fatal errors are missing or
//! malformed input files.

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod index;
pub mod plot;
pub mod report;
pub mod stats;
pub mod survey;

// ── Crate-root re-exports ─────────────────────────────────────────────────
//
// Everything a downstream user is likely to need is available directly as
// `eei::Foo` without having to know the internal module layout.

// config
pub use config::{Condition, Model, Stage, StudyConfig, TaskType, CHANNELS};

// index
pub use index::{baseline_corrected, engagement_index, PowerTriple};

// dataset
pub use dataset::{PowerDataset, PowersWriter};

// aggregate
pub use aggregate::{compute_condition_tables, compute_tables, find_table, IndexTable};

// stats
pub use stats::{mann_whitney_u, two_way_anova, MannWhitney, TwoWayAnova};

// report
pub use report::{write_all_tables, write_table_csv, Report};

// survey
pub use survey::{score_participants, ParticipantRecord};
