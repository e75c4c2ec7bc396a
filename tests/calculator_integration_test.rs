use anyhow::Result;
use llm_memcalc::core::frontier::{MAX_BATCH_SIZE, MAX_SEQ_LENGTH};
use llm_memcalc::render::{render_text, ChartOptions};
use llm_memcalc::{
    Calculator, CalculatorInputs, CalculatorMode, DeviceSpec, PresetCatalog, Precision,
};

fn preset_inputs(model: &str, device: &str) -> Result<CalculatorInputs> {
    let catalog = PresetCatalog::builtin();
    Ok(CalculatorInputs::from_model(&catalog.find_model(model)?)
        .with_device(&catalog.find_device(device)?))
}

#[test]
fn test_every_preset_pair_produces_consistent_estimates() -> Result<()> {
    let catalog = PresetCatalog::builtin();
    let calculator = Calculator::default();

    for model in catalog.models() {
        for device in catalog.devices() {
            let inputs = CalculatorInputs::from_model(&model).with_device(&device);
            for mode in [CalculatorMode::Standard, CalculatorMode::PrefillChunking] {
                let estimate = calculator
                    .evaluate(&inputs, mode)
                    .expect("presets are always complete");

                let totals: Vec<f64> = estimate
                    .precisions
                    .iter()
                    .map(|p| p.footprint.total_gb)
                    .collect();
                assert!(totals.windows(2).all(|w| w[0] >= w[1]));

                for row in &estimate.precisions {
                    let charted = row.footprint.total_gb + row.footprint.activation_gb;
                    assert_eq!(row.out_of_memory, charted > device.memory_gb);
                    if row.footprint.total_gb > device.memory_gb {
                        assert!(row.frontier.points.is_empty());
                    }
                    assert!(row.frontier.points.iter().all(|p| {
                        p.batch_size > 1.0
                            && p.batch_size <= MAX_BATCH_SIZE
                            && p.seq_length > 1
                            && p.seq_length < MAX_SEQ_LENGTH
                    }));
                }
            }
        }
    }
    Ok(())
}

#[test]
fn test_prefill_costs_more_than_standard() -> Result<()> {
    let inputs = preset_inputs("LLaMA 3.1 (8B)", "NVIDIA L4 (24GB)")?;
    let calculator = Calculator::default();

    let standard = calculator
        .evaluate(&inputs, CalculatorMode::Standard)
        .expect("ready");
    let prefill = calculator
        .evaluate(&inputs, CalculatorMode::PrefillChunking)
        .expect("ready");

    for precision in Precision::ALL {
        let s = standard.for_precision(precision).expect("precision present");
        let p = prefill.for_precision(precision).expect("precision present");
        assert!(p.footprint.total_gb > s.footprint.total_gb);
        assert!(p.frontier.available_memory_gb < s.frontier.available_memory_gb);
    }
    Ok(())
}

#[test]
fn test_custom_model_on_custom_device() -> Result<()> {
    let inputs = CalculatorInputs {
        params_billions: Some(7.0),
        hidden_size: Some(4096),
        num_layers: Some(32),
        ..CalculatorInputs::default()
    }
    .with_device(&DeviceSpec::new("Custom device", 24.0));

    let estimate = Calculator::default()
        .evaluate(&inputs, CalculatorMode::Standard)
        .expect("standard mode needs no intermediate size");

    let fp16 = estimate.for_precision(Precision::Fp16).expect("present");
    assert_eq!(fp16.footprint.total_gb, 14.0);

    let int4 = estimate.for_precision(Precision::Int4).expect("present");
    assert_eq!(int4.footprint.total_gb, 3.5);

    // Prefill chunking additionally needs the intermediate size.
    assert!(Calculator::default()
        .evaluate(&inputs, CalculatorMode::PrefillChunking)
        .is_none());
    Ok(())
}

#[test]
fn test_text_report_for_preset() -> Result<()> {
    let inputs = preset_inputs("LLaMA 2 (7B)", "NVIDIA RTX 4090 (24GB)")?;
    let estimate = Calculator::default()
        .evaluate(&inputs, CalculatorMode::Standard)
        .expect("ready");
    let text = render_text(&estimate, &ChartOptions::default());

    assert!(text.contains("32-BIT"));
    assert!(text.contains("Out of Memory"));
    assert!(text.contains("14.00 / 24 GB"));
    assert!(text.contains("3.50 / 24 GB"));
    assert!(text.contains("Sequence Length"));
    Ok(())
}
