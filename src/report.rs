//! Output writers: per-table CSV files and the append-only statistics report.
use anyhow::{Context, Result};
use std::fs::{create_dir_all, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::aggregate::IndexTable;
use crate::config::StudyConfig;
use crate::stats::{MannWhitney, TwoWayAnova};

/// Write one index table as CSV: header row of channel labels, one row per
/// participant, NaN cells left empty.
pub fn write_table_csv(table: &IndexTable, cfg: &StudyConfig, path: &Path) -> Result<()> {
    let mut w = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    w.write_record(&cfg.channels)?;

    for row in table.values.rows() {
        let record: Vec<String> = row
            .iter()
            .map(|&v| if v.is_nan() { String::new() } else { v.to_string() })
            .collect();
        w.write_record(&record)?;
    }
    w.flush()?;
    Ok(())
}

/// Write all tables under `out_dir`, one subdirectory per task type:
/// `{out_dir}/{task}/indices-{condition}-{model}.csv`.
pub fn write_all_tables(tables: &[IndexTable], cfg: &StudyConfig, out_dir: &Path) -> Result<()> {
    for table in tables {
        let dir = out_dir.join(table.task.label());
        create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        write_table_csv(table, cfg, &dir.join(table.file_name()))?;
    }
    Ok(())
}

/// Append-only text report of statistical test results.
///
/// Re-running the analysis appends new sections rather than clobbering a
/// report someone may have annotated.
pub struct Report {
    w: BufWriter<std::fs::File>,
    path: PathBuf,
}

impl Report {
    pub fn open(path: &Path) -> Result<Self> {
        let f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening report {}", path.display()))?;
        Ok(Self { w: BufWriter::new(f), path: path.to_path_buf() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start a per-channel section.
    pub fn section(&mut self, channel: &str) -> Result<()> {
        writeln!(self.w, "\n=== Channel {channel} ===")?;
        Ok(())
    }

    pub fn mann_whitney(&mut self, label: &str, r: &MannWhitney) -> Result<()> {
        writeln!(
            self.w,
            "Mann-Whitney U ({label}): U = {:.1}, z = {:.3}, p = {:.4} (n1 = {}, n2 = {}){}",
            r.u,
            r.z,
            r.p,
            r.n1,
            r.n2,
            significance_marker(r.p),
        )?;
        Ok(())
    }

    pub fn anova(&mut self, label: &str, r: &TwoWayAnova) -> Result<()> {
        writeln!(self.w, "Two-way ANOVA ({label}):")?;
        for (name, e) in [
            ("condition", &r.condition),
            ("model", &r.model),
            ("condition x model", &r.interaction),
        ] {
            writeln!(
                self.w,
                "  {name:<18} F({:.0}, {:.0}) = {:.3}, p = {:.4}{}",
                e.df,
                r.df_within,
                e.f,
                e.p,
                significance_marker(e.p),
            )?;
        }
        Ok(())
    }

    /// Note a comparison that could not be run (e.g. a channel with no valid
    /// data in one group).
    pub fn skipped(&mut self, label: &str, reason: &str) -> Result<()> {
        writeln!(self.w, "{label}: skipped ({reason})")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.w.flush()?;
        Ok(())
    }
}

fn significance_marker(p: f64) -> &'static str {
    if p < 0.001 {
        " ***"
    } else if p < 0.01 {
        " **"
    } else if p < 0.05 {
        " *"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_follow_thresholds() {
        assert_eq!(significance_marker(0.0005), " ***");
        assert_eq!(significance_marker(0.005), " **");
        assert_eq!(significance_marker(0.03), " *");
        assert_eq!(significance_marker(0.2), "");
    }
}
