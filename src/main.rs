use clap::Parser;
use llm_memcalc::config::args::{EstimateArgs, ExportArgs, InputArgs, OutputFormat};
use llm_memcalc::config::toml_config::ScenarioConfig;
use llm_memcalc::render::{format_gb, line_chart, render_text};
use llm_memcalc::utils::error::{CalcError, ErrorSeverity};
use llm_memcalc::utils::{logger, validation::Validate};
use llm_memcalc::{
    Calculator, CliConfig, Command, Estimate, LayeredInputs, LocalStorage, PresetCatalog,
    ReportExporter,
};

fn main() {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting memcalc");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = run(config) {
        tracing::error!(
            "memcalc failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

fn run(config: CliConfig) -> Result<(), CalcError> {
    let scenario = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading scenario from: {}", path);
            let scenario = ScenarioConfig::from_file(path)?;
            scenario.validate()?;
            Some(scenario)
        }
        None => None,
    };
    let catalog = scenario
        .as_ref()
        .map(ScenarioConfig::catalog)
        .unwrap_or_else(PresetCatalog::builtin);

    match config.command {
        Command::Models => list_models(&catalog),
        Command::Devices => list_devices(&catalog),
        Command::Estimate(args) => estimate(args, scenario.as_ref(), catalog)?,
        Command::Export(args) => export(args, scenario.as_ref(), catalog)?,
    }
    Ok(())
}

fn list_models(catalog: &PresetCatalog) {
    println!(
        "{:<28} {:>8} {:>8} {:>13} {:>7}",
        "Model", "Params", "Hidden", "Intermediate", "Layers"
    );
    for model in catalog.models() {
        println!(
            "{:<28} {:>7}B {:>8} {:>13} {:>7}",
            model.name.as_deref().unwrap_or("-"),
            format_gb(model.params_billions),
            model.hidden_size,
            model
                .intermediate_size
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            model.num_layers
        );
    }
}

fn list_devices(catalog: &PresetCatalog) {
    println!("{:<28} {:>8}", "Device", "Memory");
    for device in catalog.devices() {
        println!("{:<28} {:>5} GB", device.name, format_gb(device.memory_gb));
    }
}

/// `None` means the inputs are incomplete; that is reported, not an error.
fn compute(
    inputs: &InputArgs,
    scenario: Option<&ScenarioConfig>,
    catalog: PresetCatalog,
) -> Result<Option<Estimate>, CalcError> {
    inputs.validate()?;
    let provider = LayeredInputs {
        scenario,
        cli: inputs,
    };
    let calculator = Calculator::new(catalog);
    let estimate = calculator.run(&provider)?;

    if estimate.is_none() {
        println!("Select a model and a device (or enter custom values) to see the estimate.");
    }
    Ok(estimate)
}

fn estimate(
    args: EstimateArgs,
    scenario: Option<&ScenarioConfig>,
    catalog: PresetCatalog,
) -> Result<(), CalcError> {
    let chart_section = scenario.map(ScenarioConfig::chart).unwrap_or_default();
    let options = args.chart.options(&chart_section)?;

    let Some(estimate) = compute(&args.inputs, scenario, catalog)? else {
        return Ok(());
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&estimate)?),
        OutputFormat::Text => {
            print!("{}", render_text(&estimate, &options));
            if let Some(seq_length) = args.at {
                println!();
                println!("Sequence Length: {}", seq_length);
                for (precision, batch) in line_chart::batch_sizes_at(&estimate, seq_length) {
                    match batch {
                        Some(batch) => println!("  {:<7} Batch Size: {:.0}", precision, batch),
                        None => println!("  {:<7} Out of Memory", precision),
                    }
                }
            }
        }
    }
    Ok(())
}

fn export(
    args: ExportArgs,
    scenario: Option<&ScenarioConfig>,
    catalog: PresetCatalog,
) -> Result<(), CalcError> {
    args.validate()?;

    let Some(estimate) = compute(&args.inputs, scenario, catalog)? else {
        return Ok(());
    };

    let storage = LocalStorage::new(args.output_path.clone());
    let location = ReportExporter::new(storage).export(&estimate)?;

    tracing::info!("📁 Report saved to: {}", location);
    println!("✅ Report saved to: {}", location);
    Ok(())
}
