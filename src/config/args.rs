use crate::config::toml_config::{ChartSection, ScenarioConfig};
use crate::domain::model::{CalculatorInputs, CalculatorMode, DeviceSpec};
use crate::domain::ports::InputProvider;
use crate::domain::presets::PresetCatalog;
use crate::render::viewport::Viewport;
use crate::render::ChartOptions;
use crate::utils::error::Result;
use crate::utils::host::detect_host_device;
use crate::utils::validation::{validate_optional_non_negative, validate_path, Validate};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "memcalc")]
#[command(about = "Estimate LLM memory footprint and the batch size / sequence length a device can serve")]
pub struct CliConfig {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Scenario file (TOML); command-line values override it
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List model presets
    Models,
    /// List device presets
    Devices,
    /// Print the footprint and frontier charts
    Estimate(EstimateArgs),
    /// Write the frontier tables and estimate as a zip bundle
    Export(ExportArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ModelArgs {
    /// Model preset name (see `memcalc models`)
    #[arg(long)]
    pub model: Option<String>,

    /// Model parameters in billions, e.g. 7 for LLaMA-7B
    #[arg(long, allow_hyphen_values = true)]
    pub params: Option<f64>,

    /// Hidden size, e.g. 4096 for LLaMA-7B
    #[arg(long)]
    pub hidden_size: Option<u64>,

    /// Number of layers, e.g. 32 for LLaMA-7B
    #[arg(long)]
    pub layers: Option<u64>,

    /// Intermediate size, e.g. 11008 for LLaMA-7B (prefill chunking only)
    #[arg(long)]
    pub intermediate_size: Option<u64>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct DeviceArgs {
    /// Device preset name (see `memcalc devices`)
    #[arg(long, conflicts_with_all = ["device_memory", "host_device"])]
    pub device: Option<String>,

    /// Device RAM in GB, e.g. 24
    #[arg(long, conflicts_with = "host_device", allow_hyphen_values = true)]
    pub device_memory: Option<f64>,

    /// Use this machine's RAM as the device
    #[arg(long)]
    pub host_device: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub device: DeviceArgs,

    /// Account for prefill-chunking activation and per-token memory
    #[arg(long)]
    pub prefill_chunking: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ChartArgs {
    /// Width of the footprint bars, in characters
    #[arg(long)]
    pub bar_width: Option<usize>,

    /// Width of the frontier plot, in characters
    #[arg(long)]
    pub plot_width: Option<usize>,

    /// Height of the frontier plot, in lines
    #[arg(long)]
    pub plot_height: Option<usize>,

    /// Zoom factor for the frontier plot (0.5 to 10)
    #[arg(long)]
    pub zoom: Option<f64>,

    /// Pan the frontier plot horizontally, in plot widths
    #[arg(long, allow_hyphen_values = true)]
    pub pan_x: Option<f64>,

    /// Pan the frontier plot vertically, in plot heights
    #[arg(long, allow_hyphen_values = true)]
    pub pan_y: Option<f64>,
}

#[derive(Debug, Clone, Args)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    #[command(flatten)]
    pub chart: ChartArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also print the batch size each precision allows at this sequence length
    #[arg(long)]
    pub at: Option<u32>,
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    #[arg(long, default_value = "./output")]
    pub output_path: String,
}

impl InputProvider for InputArgs {
    fn mode(&self) -> CalculatorMode {
        if self.prefill_chunking {
            CalculatorMode::PrefillChunking
        } else {
            CalculatorMode::Standard
        }
    }

    fn inputs(&self, catalog: &PresetCatalog) -> Result<CalculatorInputs> {
        let mut inputs = match &self.model.model {
            Some(name) => CalculatorInputs::from_model(&catalog.find_model(name)?),
            None => CalculatorInputs::default(),
        };

        inputs = inputs.overlay(CalculatorInputs {
            params_billions: self.model.params,
            hidden_size: self.model.hidden_size,
            intermediate_size: self.model.intermediate_size,
            num_layers: self.model.layers,
            ..CalculatorInputs::default()
        });

        let device = if self.device.host_device {
            Some(detect_host_device()?)
        } else if let Some(memory_gb) = self.device.device_memory {
            Some(DeviceSpec::new("Custom device", memory_gb))
        } else if let Some(name) = &self.device.device {
            Some(catalog.find_device(name)?)
        } else {
            None
        };

        Ok(match device {
            Some(device) => inputs.with_device(&device),
            None => inputs,
        })
    }
}

impl Validate for InputArgs {
    fn validate(&self) -> Result<()> {
        validate_optional_non_negative("params", self.model.params)?;
        validate_optional_non_negative("device_memory", self.device.device_memory)?;
        Ok(())
    }
}

impl Validate for ExportArgs {
    fn validate(&self) -> Result<()> {
        self.inputs.validate()?;
        validate_path("output_path", &self.output_path)
    }
}

/// Command-line inputs layered over an optional scenario file.
pub struct LayeredInputs<'a> {
    pub scenario: Option<&'a ScenarioConfig>,
    pub cli: &'a InputArgs,
}

impl InputProvider for LayeredInputs<'_> {
    fn mode(&self) -> CalculatorMode {
        match self.scenario {
            Some(scenario) if !self.cli.prefill_chunking => scenario.mode(),
            _ => self.cli.mode(),
        }
    }

    fn inputs(&self, catalog: &PresetCatalog) -> Result<CalculatorInputs> {
        let base = match self.scenario {
            Some(scenario) => scenario.inputs(catalog)?,
            None => CalculatorInputs::default(),
        };
        Ok(base.overlay(self.cli.inputs(catalog)?))
    }
}

impl ChartArgs {
    /// Flags win over the scenario's `[chart]` section.
    pub fn options(&self, scenario: &ChartSection) -> Result<ChartOptions> {
        let defaults = ChartOptions::default();
        let viewport = Viewport::from_controls(
            self.zoom.or(scenario.zoom).unwrap_or(1.0),
            self.pan_x.or(scenario.pan_x).unwrap_or(0.0),
            self.pan_y.or(scenario.pan_y).unwrap_or(0.0),
        )?;
        ChartOptions::new(
            self.bar_width.or(scenario.bar_width).unwrap_or(defaults.bar_width),
            self.plot_width
                .or(scenario.plot_width)
                .unwrap_or(defaults.plot.width),
            self.plot_height
                .or(scenario.plot_height)
                .unwrap_or(defaults.plot.height),
            viewport,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::CalcError;

    fn parse(args: &[&str]) -> CliConfig {
        let mut argv = vec!["memcalc"];
        argv.extend_from_slice(args);
        CliConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_estimate_with_presets() {
        let config = parse(&[
            "estimate",
            "--model",
            "LLaMA 2 (7B)",
            "--device",
            "NVIDIA RTX 4090 (24GB)",
            "--prefill-chunking",
            "--at",
            "512",
        ]);

        let Command::Estimate(args) = config.command else {
            panic!("expected estimate command");
        };
        assert_eq!(args.inputs.mode(), CalculatorMode::PrefillChunking);
        assert_eq!(args.at, Some(512));

        let inputs = args.inputs.inputs(&PresetCatalog::builtin()).unwrap();
        assert_eq!(inputs.params_billions, Some(7.0));
        assert_eq!(inputs.device_memory_gb, Some(24.0));
    }

    #[test]
    fn test_custom_values_override_preset() {
        let config = parse(&[
            "estimate",
            "--model",
            "LLaMA 2 (7B)",
            "--layers",
            "48",
            "--device-memory",
            "40",
        ]);
        let Command::Estimate(args) = config.command else {
            panic!("expected estimate command");
        };

        let inputs = args.inputs.inputs(&PresetCatalog::builtin()).unwrap();
        assert_eq!(inputs.num_layers, Some(48));
        assert_eq!(inputs.hidden_size, Some(4096));
        assert_eq!(inputs.device_memory_gb, Some(40.0));
        assert_eq!(inputs.device_name.as_deref(), Some("Custom device"));
    }

    #[test]
    fn test_device_flags_conflict() {
        let result = CliConfig::try_parse_from([
            "memcalc",
            "estimate",
            "--device",
            "NVIDIA T4 (16GB)",
            "--device-memory",
            "16",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_params_fail_validation() {
        let config = parse(&["export", "--params", "-7", "--output-path", "out"]);
        let Command::Export(args) = config.command else {
            panic!("expected export command");
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_estimate_rejects_unusable_numbers() {
        for (flag, value) in [
            ("--params", "-7"),
            ("--params", "inf"),
            ("--device-memory", "-24"),
            ("--device-memory", "NaN"),
        ] {
            let config = parse(&["estimate", flag, value]);
            let Command::Estimate(args) = config.command else {
                panic!("expected estimate command");
            };
            assert!(
                matches!(
                    args.inputs.validate(),
                    Err(CalcError::InvalidConfigValueError { .. })
                ),
                "{} {} should be rejected",
                flag,
                value
            );
        }
    }

    #[test]
    fn test_layered_inputs() {
        let scenario = ScenarioConfig::from_toml_str(
            "[calculator]\nmode = \"prefill_chunking\"\n[model]\npreset = \"Gemma (2B)\"\n[device]\nmemory_gb = 16.0\n",
        )
        .unwrap();
        let cli = InputArgs {
            device: DeviceArgs {
                device: Some("NVIDIA A100 (40GB)".to_string()),
                ..DeviceArgs::default()
            },
            ..InputArgs::default()
        };

        let layered = LayeredInputs {
            scenario: Some(&scenario),
            cli: &cli,
        };
        assert_eq!(layered.mode(), CalculatorMode::PrefillChunking);

        let inputs = layered.inputs(&scenario.catalog()).unwrap();
        assert_eq!(inputs.params_billions, Some(2.0));
        assert_eq!(inputs.device_memory_gb, Some(40.0));
    }

    #[test]
    fn test_chart_options_layering() {
        let chart = ChartArgs {
            zoom: Some(2.0),
            ..ChartArgs::default()
        };
        let scenario = ChartSection {
            zoom: Some(4.0),
            plot_height: Some(10),
            ..ChartSection::default()
        };

        let options = chart.options(&scenario).unwrap();
        assert_eq!(options.viewport.scale(), 2.0);
        assert_eq!(options.plot.height, 10);
        assert_eq!(options.bar_width, 50);
    }
}
