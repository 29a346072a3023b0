use std::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use eei::{compute_condition_tables, Condition, Model, PowerDataset, PowersWriter, Stage, StudyConfig};
use ndarray::Array3;

/// Write a full-size synthetic power file and load it back.
fn synthetic_dataset(cfg: &StudyConfig) -> PowerDataset {
    let path = std::env::temp_dir().join(format!("eei-bench-{}.safetensors", std::process::id()));

    let mut w = PowersWriter::new();
    for stage in Stage::ALL {
        for model in Model::ALL {
            let arr = Array3::from_shape_fn((cfg.group_size(), cfg.n_channels(), 3), |(p, c, b)| {
                1.0 + ((p * 31 + c * 7 + b) % 17) as f64 * 0.25
            });
            let key = format!("control_{}_powers_{}", stage.label(), model.label());
            w.add(&key, &arr);
        }
    }
    w.write(&path).unwrap();
    PowerDataset::load(&path, Condition::Control, cfg).unwrap()
}

fn bench_aggregate(c: &mut Criterion) {
    let cfg = StudyConfig::default();
    let data = synthetic_dataset(&cfg);

    c.bench_function("compute_condition_tables [29×16×3 ×10 tensors]", |b| {
        b.iter(|| {
            let tables = compute_condition_tables(black_box(&data), &cfg).unwrap();
            black_box(tables.len())
        })
    });
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);
