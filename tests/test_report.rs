mod common;
use common::{constant_powers, small_config, temp_dir, write_power_fixture};
use eei::{
    compute_condition_tables, mann_whitney_u, write_all_tables, write_table_csv,
    Condition, PowerDataset, Report,
};

#[test]
fn csv_table_has_channel_header_and_empty_missing_cells() {
    let cfg = small_config();
    let dir = temp_dir("csv");
    let power_path = dir.join("control.safetensors");
    write_power_fixture(&power_path, Condition::Control, &cfg, &[0], constant_powers);

    let data = PowerDataset::load(&power_path, Condition::Control, &cfg).unwrap();
    let tables = compute_condition_tables(&data, &cfg).unwrap();

    let csv_path = dir.join(tables[0].file_name());
    write_table_csv(&tables[0], &cfg, &csv_path).unwrap();

    let text = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next().unwrap(), "Fp1,Cz,Oz");
    // Participant 0 was skipped: first data row is all empty cells.
    assert_eq!(lines.next().unwrap(), ",,");
    // Remaining rows carry the corrected index.
    assert_eq!(lines.next().unwrap(), "1,1,1");
    // Header + one row per participant.
    assert_eq!(text.lines().count(), 1 + cfg.group_size());
}

#[test]
fn all_tables_land_in_task_directories() {
    let cfg = small_config();
    let dir = temp_dir("layout");
    let power_path = dir.join("control.safetensors");
    write_power_fixture(&power_path, Condition::Control, &cfg, &[], constant_powers);

    let data = PowerDataset::load(&power_path, Condition::Control, &cfg).unwrap();
    let tables = compute_condition_tables(&data, &cfg).unwrap();

    let out = dir.join("results");
    write_all_tables(&tables, &cfg, &out).unwrap();

    for task in ["yesno", "open", "cloze", "total"] {
        for file in ["indices-control-FE.csv", "indices-control-VB.csv"] {
            let p = out.join(task).join(file);
            assert!(p.is_file(), "missing {}", p.display());
        }
    }
}

#[test]
fn report_appends_across_runs() {
    let dir = temp_dir("report");
    let path = dir.join("report.txt");

    let r1 = mann_whitney_u(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();
    {
        let mut report = Report::open(&path).unwrap();
        report.section("Fp1").unwrap();
        report.mann_whitney("total, FE", &r1).unwrap();
        report.flush().unwrap();
    }
    {
        let mut report = Report::open(&path).unwrap();
        report.section("Fp2").unwrap();
        report.skipped("total, FE", "no valid data in one group").unwrap();
        report.flush().unwrap();
    }

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("=== Channel Fp1 ==="));
    assert!(text.contains("=== Channel Fp2 ==="));
    assert!(text.contains("p = 1.0000"));
    assert!(text.contains("skipped"));
}
