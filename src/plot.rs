//! Per-channel figures.
//!
//! One PNG per electrode: group means of the baseline-corrected engagement
//! index for the four condition × model cells, with the individual
//! participant values overlaid.
use anyhow::{anyhow, Result};
use plotters::prelude::*;
use std::path::Path;

use crate::aggregate::{find_table, IndexTable};
use crate::config::{Condition, Model, TaskType};

const BAR_WIDTH: f64 = 0.6;

/// Render the four-group comparison for one channel to `path`.
///
/// `groups` pairs a cell label (e.g. `"control-FE"`) with that cell's valid
/// index values for the channel.  Empty groups draw an empty slot.
pub fn plot_channel(channel: &str, groups: &[(String, Vec<f64>)], path: &Path) -> Result<()> {
    draw(channel, groups, path).map_err(|e| anyhow!("plotting channel {channel}: {e}"))
}

/// Render one channel of an [`IndexTable`] set for a given task type.
pub fn plot_channel_tables(
    tables: &[IndexTable],
    task: TaskType,
    channel_idx: usize,
    channel: &str,
    path: &Path,
) -> Result<()> {
    let mut groups = Vec::with_capacity(4);
    for condition in Condition::ALL {
        for model in Model::ALL {
            let values = find_table(tables, condition, model, task)
                .map(|t| t.valid_column(channel_idx))
                .unwrap_or_default();
            groups.push((format!("{condition}-{model}"), values));
        }
    }
    plot_channel(channel, &groups, path)
}

fn draw(
    channel: &str,
    groups: &[(String, Vec<f64>)],
    path: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let n = groups.len();

    let mut y_min = 0.0_f64;
    let mut y_max = 0.0_f64;
    for (_, vs) in groups {
        for &v in vs {
            y_min = y_min.min(v);
            y_max = y_max.max(v);
        }
    }
    let pad = ((y_max - y_min) * 0.1).max(0.05);
    let (y_lo, y_hi) = (y_min - pad, y_max + pad);

    let root = BitMapBackend::new(path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Baseline-corrected engagement index | {channel}"),
            ("sans-serif", 24),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..n as f64, y_lo..y_hi)?;

    let labels: Vec<&str> = groups.iter().map(|(l, _)| l.as_str()).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| {
            let i = x.floor() as usize;
            labels.get(i).map(|s| (*s).to_string()).unwrap_or_default()
        })
        .y_desc("engagement index (task − baseline)")
        .draw()?;

    // Zero reference line.
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, 0.0), (n as f64, 0.0)],
        BLACK.mix(0.3),
    )))?;

    for (i, (_, values)) in groups.iter().enumerate() {
        if values.is_empty() {
            continue;
        }
        let center = i as f64 + 0.5;
        let mean = values.iter().sum::<f64>() / values.len() as f64;

        // Mean bar.
        chart.draw_series(std::iter::once(Rectangle::new(
            [(center - BAR_WIDTH / 2.0, 0.0), (center + BAR_WIDTH / 2.0, mean)],
            BLUE.mix(0.35).filled(),
        )))?;

        // Individual participants, spread evenly across the bar width.
        let k = values.len();
        chart.draw_series(values.iter().enumerate().map(|(j, &v)| {
            let frac = if k > 1 { j as f64 / (k - 1) as f64 } else { 0.5 };
            let x = center - BAR_WIDTH / 2.0 + frac * BAR_WIDTH;
            Circle::new((x, v), 3, RED.mix(0.7).filled())
        }))?;
    }

    root.present()?;
    Ok(())
}
