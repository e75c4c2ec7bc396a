pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command, LayeredInputs};

pub use config::{cli::LocalStorage, toml_config::ScenarioConfig};
pub use core::{calculator::Calculator, export::ReportExporter};
pub use domain::model::{CalculatorInputs, CalculatorMode, DeviceSpec, Estimate, ModelSpec, Precision};
pub use domain::presets::PresetCatalog;
pub use utils::error::{CalcError, Result};
