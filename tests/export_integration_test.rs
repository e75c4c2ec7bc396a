use anyhow::Result;
use llm_memcalc::core::export::{BUNDLE_NAME, CSV_NAME, JSON_NAME, TSV_NAME};
use llm_memcalc::domain::ports::InputProvider;
use llm_memcalc::{Calculator, LocalStorage, ReportExporter, ScenarioConfig};
use std::io::Read;
use tempfile::TempDir;

#[test]
fn test_scenario_file_to_report_bundle() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let scenario_path = temp_dir.path().join("scenario.toml");
    std::fs::write(
        &scenario_path,
        r#"
[calculator]
mode = "prefill_chunking"

[model]
preset = "Lab 3B"

[device]
preset = "Lab card"

[[models]]
name = "Lab 3B"
params_billions = 3.0
hidden_size = 3072
intermediate_size = 8192
num_layers = 28

[[devices]]
name = "Lab card"
memory_gb = 12.0
"#,
    )?;

    let scenario = ScenarioConfig::from_file(&scenario_path)?;
    let calculator = Calculator::new(scenario.catalog());
    let estimate = calculator
        .run(&scenario)?
        .expect("scenario names a complete model and device");

    assert_eq!(scenario.mode(), estimate.mode);
    assert_eq!(estimate.device.name, "Lab card");

    let output_path = temp_dir.path().join("out");
    let storage = LocalStorage::new(output_path.to_str().unwrap().to_string());
    let location = ReportExporter::new(storage).export(&estimate)?;
    assert!(location.ends_with(BUNDLE_NAME));

    let zip_data = std::fs::read(output_path.join(BUNDLE_NAME))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    assert_eq!(archive.len(), 3);

    let mut csv_content = String::new();
    archive.by_name(CSV_NAME)?.read_to_string(&mut csv_content)?;
    assert!(csv_content.starts_with("precision,seq_length,batch_size"));
    assert!(csv_content.contains("4-bit,"));

    let mut tsv_content = String::new();
    archive.by_name(TSV_NAME)?.read_to_string(&mut tsv_content)?;
    assert_eq!(csv_content.lines().count(), tsv_content.lines().count());

    let mut json_content = String::new();
    archive.by_name(JSON_NAME)?.read_to_string(&mut json_content)?;
    let report: serde_json::Value = serde_json::from_str(&json_content)?;
    assert_eq!(report["estimate"]["mode"], "prefill_chunking");
    assert_eq!(report["estimate"]["precisions"].as_array().map(Vec::len), Some(4));
    assert!(report["generated_at"].is_string());

    Ok(())
}

#[test]
fn test_incomplete_scenario_exports_nothing() -> Result<()> {
    let scenario = ScenarioConfig::from_toml_str("[model]\npreset = \"LLaMA 2 (7B)\"\n")?;
    let estimate = Calculator::new(scenario.catalog()).run(&scenario)?;
    assert!(estimate.is_none());
    Ok(())
}
