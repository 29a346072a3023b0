//! Study configuration.
//!
//! [`StudyConfig`] holds the fixed dimensions of the experiment: total
//! participant count and the ordered electrode montage.  The categorical
//! dimensions of the design (condition, presentation model, task stage) are
//! enumerated here as well so every lookup is keyed by an explicit record
//! instead of a positional index.

use std::fmt;

/// The 16-electrode montage used in the study, in output column order.
pub const CHANNELS: [&str; 16] = [
    "Fp1", "Fp2", "F3", "Fz", "F4", "T7", "C3", "Cz", "C4", "T8", "P3", "Pz",
    "P4", "PO7", "PO8", "Oz",
];

/// Experimental condition a participant was assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Control,
    Treatment,
}

impl Condition {
    pub const ALL: [Condition; 2] = [Condition::Control, Condition::Treatment];

    /// Lowercase label used in dataset keys and output file names.
    pub fn label(self) -> &'static str {
        match self {
            Condition::Control => "control",
            Condition::Treatment => "treatment",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Diagram presentation model. Every participant sees both, in
/// counterbalanced order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Model {
    Fe,
    Vb,
}

impl Model {
    pub const ALL: [Model; 2] = [Model::Fe, Model::Vb];

    /// Uppercase label used in dataset keys and output file names.
    pub fn label(self) -> &'static str {
        match self {
            Model::Fe => "FE",
            Model::Vb => "VB",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Comprehension task stage for which band powers were recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskType {
    YesNo,
    Open,
    Cloze,
    Total,
}

impl TaskType {
    pub const ALL: [TaskType; 4] = [
        TaskType::YesNo,
        TaskType::Open,
        TaskType::Cloze,
        TaskType::Total,
    ];

    /// Lowercase label used in dataset keys and output directories.
    pub fn label(self) -> &'static str {
        match self {
            TaskType::YesNo => "yesno",
            TaskType::Open => "open",
            TaskType::Cloze => "cloze",
            TaskType::Total => "total",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Recording stage: resting-state baseline or one of the task stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Baseline,
    Task(TaskType),
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Baseline,
        Stage::Task(TaskType::YesNo),
        Stage::Task(TaskType::Open),
        Stage::Task(TaskType::Cloze),
        Stage::Task(TaskType::Total),
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Baseline => "baseline",
            Stage::Task(t) => t.label(),
        }
    }
}

/// Fixed dimensions of the study.
///
/// All fields are `pub` so a non-default study can be described with
/// struct-update syntax:
///
/// ```
/// use eei::StudyConfig;
///
/// let cfg = StudyConfig {
///     n_participants: 12, // pilot run
///     ..StudyConfig::default()
/// };
/// assert_eq!(cfg.group_size(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct StudyConfig {
    /// Total number of participants across both conditions.
    ///
    /// Default: `58`.
    pub n_participants: usize,

    /// Electrode labels, in output column order.
    ///
    /// Default: the 16-channel montage in [`CHANNELS`].
    pub channels: Vec<String>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            n_participants: 58,
            channels: CHANNELS.iter().map(|&s| s.to_string()).collect(),
        }
    }
}

impl StudyConfig {
    /// Participants per condition group (the design is balanced).
    pub fn group_size(&self) -> usize {
        self.n_participants / 2
    }

    pub fn n_channels(&self) -> usize {
        self.channels.len()
    }
}
