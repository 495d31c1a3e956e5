use rdm_rs::prelude::*;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Serialize)]
struct ValidationData {
    name: String,
    notes: String,
    input: InputData,
    params: Params,
    #[serde(skip_deserializing)]
    result: ResultData,
}

#[derive(Debug, Deserialize, Serialize)]
struct InputData {
    /// Row-major observations × channels.
    measurements: Vec<f64>,
    n_channel: usize,
    conds: Vec<Descriptor>,
    #[serde(default)]
    folds: Option<Vec<Descriptor>>,
    /// Condensed reference RDMs for the comparison step.
    #[serde(default)]
    reference: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize, Serialize)]
struct Params {
    method: String,
    #[serde(default)]
    noise: Option<String>,
    #[serde(default = "default_compare")]
    compare: String,
}

fn default_compare() -> String {
    "cosine".to_string()
}

#[derive(Debug, Deserialize, Serialize, Default)]
struct ResultData {
    dissimilarities: Vec<f64>,
    comparison: Vec<f64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = Path::new("../output/reference");
    let output_dir = Path::new("../output/rdm_rs");

    if !input_dir.exists() {
        eprintln!(
            "Input directory {:?} does not exist. Generate the reference fixtures first.",
            input_dir
        );
        return Ok(());
    }

    fs::create_dir_all(output_dir)?;

    for entry in fs::read_dir(input_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            println!("Processing {:?}", path.file_name().unwrap_or_default());
            process_file(&path, output_dir)?;
        }
    }

    Ok(())
}

fn process_file(input_path: &Path, output_dir: &Path) -> Result<(), Box<dyn Error>> {
    let file = fs::File::open(input_path)?;
    let mut data: ValidationData = serde_json::from_reader(file)?;

    let mut obs = Descriptors::new().with("conds", data.input.conds.clone());
    if let Some(folds) = &data.input.folds {
        obs.insert("fold", folds.clone());
    }
    let dataset = Dataset::new(data.input.measurements.clone(), data.input.n_channel)?
        .with_obs_descriptors(obs)?;

    let method: RdmMethod = data.params.method.parse()?;
    let mut builder = RdmCalc::new().method(method).descriptor("conds");
    if data.input.folds.is_some() {
        builder = builder.cv_descriptor("fold");
    }
    if let Some(noise) = &data.params.noise {
        builder = builder.noise(match noise.as_str() {
            "identity" => NoiseModel::Identity,
            other => NoiseModel::Residuals(other.parse()?),
        });
    }
    let rdms = builder.build()?.calc(&dataset)?;
    data.result.dissimilarities = rdms.get_vectors().to_vec();

    if !data.input.reference.is_empty() {
        let n_ref = data.input.reference.len();
        let reference = Rdms::new(
            Dissimilarities::vectors(data.input.reference.concat(), n_ref),
            "reference",
        )?;
        let comparator = RdmCompare::new()
            .method(data.params.compare.parse()?)
            .build()?;
        data.result.comparison = comparator.compare(&rdms, &reference)?.into_vec();
    }

    let output_path = output_dir.join(input_path.file_name().unwrap_or_default());
    let output_json = serde_json::to_string_pretty(&data)?;
    fs::write(output_path, output_json)?;

    Ok(())
}
