mod common;
use common::{small_config, temp_dir};
use eei::{Condition, Model, PowerDataset, PowersWriter, Stage, StudyConfig};
use ndarray::Array3;

fn full_fixture(path: &std::path::Path, cfg: &StudyConfig) {
    common::write_power_fixture(path, Condition::Control, cfg, &[], |_, _, p, c| {
        [p as f64 + 1.0, c as f64 + 1.0, 2.0]
    });
}

#[test]
fn load_roundtrips_written_powers() {
    let cfg = small_config();
    let dir = temp_dir("roundtrip");
    let path = dir.join("control.safetensors");
    full_fixture(&path, &cfg);

    let data = PowerDataset::load(&path, Condition::Control, &cfg).unwrap();
    assert_eq!(data.n_participants(), cfg.group_size());
    assert_eq!(data.n_channels(), cfg.n_channels());

    let t = data.triple(Stage::Baseline, Model::Fe, 2, 1);
    approx::assert_abs_diff_eq!(t.theta, 3.0);
    approx::assert_abs_diff_eq!(t.alpha, 2.0);
    approx::assert_abs_diff_eq!(t.beta, 2.0);
}

#[test]
fn missing_file_is_a_startup_failure() {
    let cfg = small_config();
    let err = PowerDataset::load(
        std::path::Path::new("/nonexistent/control.safetensors"),
        Condition::Control,
        &cfg,
    )
    .unwrap_err();
    assert!(err.to_string().contains("control"), "{err}");
}

#[test]
fn truncated_file_is_a_startup_failure() {
    let cfg = small_config();
    let dir = temp_dir("truncated");
    let path = dir.join("control.safetensors");

    // Header-length field claims far more bytes than the file holds.
    let mut bytes = 1024_u64.to_le_bytes().to_vec();
    bytes.extend_from_slice(b"{}");
    std::fs::write(&path, &bytes).unwrap();

    let err = PowerDataset::load(&path, Condition::Control, &cfg).unwrap_err();
    assert!(err.to_string().contains("header"), "{err}");
}

#[test]
fn out_of_range_data_offsets_are_rejected() {
    let cfg = small_config();
    let dir = temp_dir("offsets");
    let path = dir.join("control.safetensors");

    // Valid header whose tensor data extends past the end of the file.
    let header = br#"{"control_baseline_powers_FE":{"dtype":"F64","shape":[4,3,3],"data_offsets":[0,288]}}"#;
    let mut bytes = (header.len() as u64).to_le_bytes().to_vec();
    bytes.extend_from_slice(header);
    bytes.extend_from_slice(&[0u8; 16]); // far fewer than 288 data bytes
    std::fs::write(&path, &bytes).unwrap();

    let err = PowerDataset::load(&path, Condition::Control, &cfg).unwrap_err();
    assert!(err.to_string().contains("out of range"), "{err}");
}

#[test]
fn missing_tensor_key_is_rejected() {
    let cfg = small_config();
    let dir = temp_dir("missing-key");
    let path = dir.join("control.safetensors");

    // Only the baseline tensors, no task stages.
    let mut w = PowersWriter::new();
    let arr = Array3::<f64>::zeros((cfg.group_size(), cfg.n_channels(), 3));
    w.add("control_baseline_powers_FE", &arr);
    w.add("control_baseline_powers_VB", &arr);
    w.write(&path).unwrap();

    let err = PowerDataset::load(&path, Condition::Control, &cfg).unwrap_err();
    assert!(err.to_string().contains("missing"), "{err}");
}

#[test]
fn wrong_shape_is_rejected() {
    let cfg = small_config();
    let dir = temp_dir("shape-check");
    let path = dir.join("control.safetensors");

    // Channel count disagrees with the montage.
    let bad = StudyConfig {
        channels: vec!["Fp1".into(), "Cz".into()],
        ..cfg.clone()
    };
    full_fixture(&path, &bad);

    let err = PowerDataset::load(&path, Condition::Control, &cfg).unwrap_err();
    assert!(err.to_string().contains("shape"), "{err}");
}
