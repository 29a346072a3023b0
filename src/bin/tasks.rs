use anyhow::Result;
use clap::Parser;
use std::fs::create_dir_all;
use std::path::PathBuf;

use eei::survey::{
    keys::AnswerKeys, response::SurveyData, score_participants, write_questionnaire,
    write_task_results, write_task_scores,
};

#[derive(Parser)]
#[command(name = "tasks", about = "Score survey task responses against the answer keys")]
struct Args {
    /// Raw survey export
    #[arg(long, default_value = "survey_data.csv")]
    survey: PathBuf,

    /// Directory holding FE-yesno.txt, VB-yesno.txt, FE-cloze.txt, VB-cloze.txt
    #[arg(long, default_value = "answers")]
    answers: PathBuf,

    /// Output directory
    #[arg(long, default_value = "extracted")]
    out_dir: PathBuf,

    /// Number of participants (last N records of the export)
    #[arg(long, default_value_t = 58)]
    n_subj: usize,

    /// Also rewrite task-scores.csv (manual score entries in an existing
    /// file are lost)
    #[arg(long)]
    write_scores: bool,

    /// Also extract questionnaire-answers.csv
    #[arg(long)]
    questionnaire: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let data = SurveyData::load(&args.survey, args.n_subj)?;
    let keys = AnswerKeys::load(&args.answers)?;
    let records = score_participants(&data, &keys)?;

    create_dir_all(&args.out_dir)?;

    let results_path = args.out_dir.join("task-results.csv");
    write_task_results(&records, &results_path)?;
    println!("Task results written → {}", results_path.display());

    if args.write_scores {
        let scores_path = args.out_dir.join("task-scores.csv");
        write_task_scores(&records, &scores_path)?;
        println!("Task scores written → {}", scores_path.display());
    }

    if args.questionnaire {
        let q_path = args.out_dir.join("questionnaire-answers.csv");
        write_questionnaire(&data, &q_path)?;
        println!("Questionnaire answers written → {}", q_path.display());
    }

    Ok(())
}
