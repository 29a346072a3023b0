use anyhow::Result;
use clap::Parser;
use std::fs::create_dir_all;
use std::path::PathBuf;

use eei::{
    compute_tables, find_table, mann_whitney_u, two_way_anova, Condition, Model,
    PowerDataset, Report, StudyConfig, TaskType,
};

#[derive(Parser)]
#[command(name = "results", about = "Engagement-index tables, statistics and plots")]
struct Args {
    /// Control-group power file
    #[arg(long, default_value = "powers/control.safetensors")]
    control: PathBuf,

    /// Treatment-group power file
    #[arg(long, default_value = "powers/treatment.safetensors")]
    treatment: PathBuf,

    /// Output directory for index tables, report and plots
    #[arg(long, default_value = "results")]
    out_dir: PathBuf,

    /// Total participant count across both conditions
    #[arg(long, default_value_t = 58)]
    participants: usize,

    /// Skip the per-channel PNG figures
    #[arg(long)]
    no_plots: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let cfg = StudyConfig {
        n_participants: args.participants,
        ..StudyConfig::default()
    };

    let control = PowerDataset::load(&args.control, Condition::Control, &cfg)?;
    let treatment = PowerDataset::load(&args.treatment, Condition::Treatment, &cfg)?;
    println!(
        "Loaded {} + {} participants × {} channels",
        control.n_participants(),
        treatment.n_participants(),
        cfg.n_channels()
    );

    let tables = compute_tables(&control, &treatment, &cfg)?;
    eei::write_all_tables(&tables, &cfg, &args.out_dir)?;
    println!("Written {} index tables → {}", tables.len(), args.out_dir.display());

    let mut report = Report::open(&args.out_dir.join("report.txt"))?;
    for (chan_idx, chan) in cfg.channels.iter().enumerate() {
        report.section(chan)?;

        for task in TaskType::ALL {
            // Control vs treatment rank-sum test, per model.
            for model in Model::ALL {
                let label = format!("{task}, {model}");
                let a = find_table(&tables, Condition::Control, model, task)
                    .map(|t| t.valid_column(chan_idx))
                    .unwrap_or_default();
                let b = find_table(&tables, Condition::Treatment, model, task)
                    .map(|t| t.valid_column(chan_idx))
                    .unwrap_or_default();
                if a.is_empty() || b.is_empty() {
                    report.skipped(&label, "no valid data in one group")?;
                    continue;
                }
                report.mann_whitney(&label, &mann_whitney_u(&a, &b)?)?;
            }

            // Condition × model factorial ANOVA.
            let mut cells: Vec<Vec<f64>> = Vec::with_capacity(4);
            for condition in Condition::ALL {
                for model in Model::ALL {
                    cells.push(
                        find_table(&tables, condition, model, task)
                            .map(|t| t.valid_column(chan_idx))
                            .unwrap_or_default(),
                    );
                }
            }
            if cells.iter().any(|c| c.is_empty()) {
                report.skipped(&format!("{task}, ANOVA"), "empty cell")?;
                continue;
            }
            let anova = two_way_anova(&[
                [&cells[0], &cells[1]],
                [&cells[2], &cells[3]],
            ])?;
            report.anova(task.label(), &anova)?;
        }
    }
    report.flush()?;
    println!("Statistics appended → {}", report.path().display());

    if !args.no_plots {
        let plot_dir = args.out_dir.join("plots");
        create_dir_all(&plot_dir)?;
        for (chan_idx, chan) in cfg.channels.iter().enumerate() {
            eei::plot::plot_channel_tables(
                &tables,
                TaskType::Total,
                chan_idx,
                chan,
                &plot_dir.join(format!("{chan}.png")),
            )?;
        }
        println!("Plots written → {}", plot_dir.display());
    }

    Ok(())
}
