//! Safetensors I/O for the band-power datasets.
//!
//! One file per condition, holding a `[participants, channels, 3]` F64 tensor
//! per stage × model under keys like `control_baseline_powers_FE`.  The last
//! axis is (theta, alpha, beta).
use anyhow::{bail, Context, Result};
use ndarray::Array3;
use std::collections::HashMap;
use std::path::Path;

use crate::config::{Condition, Model, Stage, StudyConfig};
use crate::index::PowerTriple;

// ── Low-level safetensors parser (no dependency on the `safetensors` crate's
//    tensor types — we just need raw bytes → ndarray). ─────────────────────────

fn parse_header(bytes: &[u8]) -> Result<(HashMap<String, serde_json::Value>, usize)> {
    if bytes.len() < 8 {
        bail!("safetensors file too small");
    }
    let n = u64::from_le_bytes(bytes[..8].try_into().unwrap()) as usize;
    if bytes.len() < 8 + n {
        bail!("safetensors header length {n} exceeds file size {}", bytes.len());
    }
    let header: HashMap<String, serde_json::Value> =
        serde_json::from_slice(&bytes[8..8 + n])
            .context("failed to parse safetensors header")?;
    Ok((header, 8 + n))
}

fn tensor_entry<'a>(
    header: &'a HashMap<String, serde_json::Value>,
    key: &str,
) -> Result<&'a serde_json::Value> {
    header
        .get(key)
        .with_context(|| format!("missing '{key}' tensor"))
}

fn shape_of(entry: &serde_json::Value) -> Result<Vec<usize>> {
    entry["shape"]
        .as_array()
        .context("tensor entry has no shape")?
        .iter()
        .map(|v| v.as_u64().map(|n| n as usize).context("bad shape element"))
        .collect()
}

fn read_f64_tensor(
    bytes: &[u8],
    data_start: usize,
    entry: &serde_json::Value,
) -> Result<Vec<f64>> {
    let offsets = entry["data_offsets"]
        .as_array()
        .context("tensor entry has no data_offsets")?;
    let s = offsets[0].as_u64().context("bad offset")? as usize;
    let e = offsets[1].as_u64().context("bad offset")? as usize;
    if s > e || data_start + e > bytes.len() {
        bail!("tensor data_offsets out of range");
    }
    let raw = &bytes[data_start + s..data_start + e];

    let dtype = entry["dtype"].as_str().unwrap_or("F64");
    let vals = match dtype {
        "F64" => raw
            .chunks_exact(8)
            .map(|b| f64::from_le_bytes(b.try_into().unwrap()))
            .collect(),
        "F32" => raw
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes(b.try_into().unwrap()) as f64)
            .collect(),
        other => bail!("unsupported dtype '{other}' for band powers"),
    };
    Ok(vals)
}

// ── Public structs ────────────────────────────────────────────────────────────

/// All band-power arrays for one condition group.
///
/// Holds one `[P, C, 3]` array per stage × model; `P` is the group size and
/// `C` the montage length from the [`StudyConfig`] the file was validated
/// against.
#[derive(Debug)]
pub struct PowerDataset {
    pub condition: Condition,
    arrays: HashMap<String, Array3<f64>>,
    n_participants: usize,
    n_channels: usize,
}

/// Dataset key, e.g. `control_baseline_powers_FE`.
fn power_key(condition: Condition, stage: Stage, model: Model) -> String {
    format!("{}_{}_powers_{}", condition.label(), stage.label(), model.label())
}

impl PowerDataset {
    /// Load and validate one condition's power file.
    ///
    /// Every stage × model tensor must be present with shape
    /// `[cfg.group_size(), cfg.n_channels(), 3]`; anything else is a startup
    /// failure.
    pub fn load(path: &Path, condition: Condition, cfg: &StudyConfig) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading {} powers from {}", condition, path.display()))?;
        let (header, data_start) = parse_header(&bytes)?;

        let expected = (cfg.group_size(), cfg.n_channels(), 3);
        let mut arrays = HashMap::new();

        for stage in Stage::ALL {
            for model in Model::ALL {
                let key = power_key(condition, stage, model);
                let entry = tensor_entry(&header, &key)?;
                let shape = shape_of(entry)?;
                if shape.len() != 3 {
                    bail!("'{key}' is not a 3-D tensor (shape {shape:?})");
                }
                let vals = read_f64_tensor(&bytes, data_start, entry)?;
                let arr = Array3::from_shape_vec((shape[0], shape[1], shape[2]), vals)
                    .with_context(|| format!("'{key}' shape/data mismatch"))?;
                if arr.dim() != expected {
                    bail!(
                        "'{key}' has shape {:?}, expected {:?} (participants × channels × bands)",
                        arr.dim(),
                        expected
                    );
                }
                arrays.insert(key, arr);
            }
        }

        Ok(Self {
            condition,
            arrays,
            n_participants: expected.0,
            n_channels: expected.1,
        })
    }

    pub fn n_participants(&self) -> usize {
        self.n_participants
    }

    pub fn n_channels(&self) -> usize {
        self.n_channels
    }

    /// Band-power triple for one participant / channel at a given stage.
    ///
    /// Indices are bounds-checked against the validated shape, so lookups on
    /// a loaded dataset cannot go out of range.
    pub fn triple(
        &self,
        stage: Stage,
        model: Model,
        participant: usize,
        channel: usize,
    ) -> PowerTriple {
        let key = power_key(self.condition, stage, model);
        // Every key was inserted during load; validated above.
        let arr = &self.arrays[&key];
        PowerTriple::new(
            arr[[participant, channel, 0]],
            arr[[participant, channel, 1]],
            arr[[participant, channel, 2]],
        )
    }
}

// ── Writer ────────────────────────────────────────────────────────────────────

/// Safetensors writer for power files (fixture generation, format
/// conversion).  F64 only — the same subset the loader reads natively.
///
/// ```no_run
/// use eei::dataset::PowersWriter;
/// use ndarray::Array3;
/// use std::path::Path;
///
/// let mut w = PowersWriter::new();
/// w.add("control_baseline_powers_FE", &Array3::zeros((29, 16, 3)));
/// w.write(Path::new("powers/control.safetensors")).unwrap();
/// ```
pub struct PowersWriter {
    entries: Vec<(String, Vec<u8>, Vec<usize>)>,
}

impl PowersWriter {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Add a `[P, C, 3]` tensor under `key`.
    pub fn add(&mut self, key: &str, arr: &Array3<f64>) {
        let bytes: Vec<u8> = arr.iter().flat_map(|v| v.to_le_bytes()).collect();
        let (p, c, b) = arr.dim();
        self.entries.push((key.to_string(), bytes, vec![p, c, b]));
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        use std::io::Write;

        let mut header_map = serde_json::Map::new();
        let mut offset: usize = 0;
        for (name, data, shape) in &self.entries {
            header_map.insert(name.clone(), serde_json::json!({
                "dtype": "F64",
                "shape": shape,
                "data_offsets": [offset, offset + data.len()],
            }));
            offset += data.len();
        }
        let hdr_bytes = serde_json::to_vec(&header_map)?;
        let pad = (8 - hdr_bytes.len() % 8) % 8;
        let padded: Vec<u8> = hdr_bytes
            .into_iter()
            .chain(std::iter::repeat(b' ').take(pad))
            .collect();

        let mut f = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        f.write_all(&(padded.len() as u64).to_le_bytes())?;
        f.write_all(&padded)?;
        for (_, data, _) in &self.entries {
            f.write_all(data)?;
        }
        Ok(())
    }
}

impl Default for PowersWriter {
    fn default() -> Self {
        Self::new()
    }
}
