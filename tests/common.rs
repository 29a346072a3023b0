/// Shared helpers for fixture construction.
use eei::{Condition, Model, PowersWriter, Stage, StudyConfig};
use ndarray::Array3;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Fresh per-test scratch directory under the system temp dir.
pub fn temp_dir(tag: &str) -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "eei-test-{tag}-{}-{n}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[allow(unused)]
/// Small study used by fixtures: 8 participants (4 per group), 3 channels.
pub fn small_config() -> StudyConfig {
    StudyConfig {
        n_participants: 8,
        channels: vec!["Fp1".into(), "Cz".into(), "Oz".into()],
    }
}

#[allow(unused)]
/// Write a power file where every triple comes from `powers(stage, model,
/// participant, channel)`.  Participants listed in `missing_baseline` get an
/// all-zero baseline for both models (the missing-data sentinel).
pub fn write_power_fixture(
    path: &Path,
    condition: Condition,
    cfg: &StudyConfig,
    missing_baseline: &[usize],
    powers: impl Fn(Stage, Model, usize, usize) -> [f64; 3],
) {
    let p = cfg.group_size();
    let c = cfg.n_channels();

    let mut w = PowersWriter::new();
    for stage in Stage::ALL {
        for model in Model::ALL {
            let mut arr = Array3::<f64>::zeros((p, c, 3));
            for part in 0..p {
                for chan in 0..c {
                    let triple = if stage == Stage::Baseline
                        && missing_baseline.contains(&part)
                    {
                        [0.0, 0.0, 0.0]
                    } else {
                        powers(stage, model, part, chan)
                    };
                    for (b, &v) in triple.iter().enumerate() {
                        arr[[part, chan, b]] = v;
                    }
                }
            }
            let key = format!(
                "{}_{}_powers_{}",
                condition.label(),
                stage.label(),
                model.label()
            );
            w.add(&key, &arr);
        }
    }
    w.write(path).unwrap();
}

#[allow(unused)]
/// Uniform fixture: baseline index 0.5, every task index 1.5, so the
/// corrected index is exactly 1.0 everywhere.
pub fn constant_powers(stage: Stage, _model: Model, _part: usize, _chan: usize) -> [f64; 3] {
    match stage {
        Stage::Baseline => [1.0, 1.0, 1.0], // index 0.5
        Stage::Task(_) => [1.0, 1.0, 3.0],  // index 1.5 → corrected 1.0
    }
}
