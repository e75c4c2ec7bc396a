use crate::domain::model::{CalculatorInputs, CalculatorMode, DeviceSpec, ModelSpec};
use crate::domain::ports::InputProvider;
use crate::domain::presets::PresetCatalog;
use crate::utils::error::{CalcError, Result};
use crate::utils::host::detect_host_device;
use crate::utils::validation::{
    validate_non_empty_string, validate_non_negative, validate_optional_non_negative, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// A saved calculator scenario. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub calculator: Option<CalculatorSection>,
    pub model: Option<ModelSection>,
    pub device: Option<DeviceSection>,
    pub chart: Option<ChartSection>,
    /// Extra model presets, listed before the built-ins.
    #[serde(default)]
    pub models: Vec<ModelSpec>,
    /// Extra device presets, listed before the built-ins.
    #[serde(default)]
    pub devices: Vec<DeviceSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculatorSection {
    pub mode: Option<CalculatorMode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSection {
    pub preset: Option<String>,
    pub params_billions: Option<f64>,
    pub hidden_size: Option<u64>,
    pub intermediate_size: Option<u64>,
    pub num_layers: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceSection {
    pub preset: Option<String>,
    pub memory_gb: Option<f64>,
    pub host: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartSection {
    pub bar_width: Option<usize>,
    pub plot_width: Option<usize>,
    pub plot_height: Option<usize>,
    pub zoom: Option<f64>,
    pub pan_x: Option<f64>,
    pub pan_y: Option<f64>,
}

impl ScenarioConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CalcError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CalcError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> String {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// Built-in presets extended with the ones declared in this file.
    pub fn catalog(&self) -> PresetCatalog {
        PresetCatalog::builtin()
            .with_models(self.models.clone())
            .with_devices(self.devices.clone())
    }

    pub fn chart(&self) -> ChartSection {
        self.chart.clone().unwrap_or_default()
    }
}

impl InputProvider for ScenarioConfig {
    fn mode(&self) -> CalculatorMode {
        self.calculator
            .as_ref()
            .and_then(|c| c.mode)
            .unwrap_or_default()
    }

    fn inputs(&self, catalog: &PresetCatalog) -> Result<CalculatorInputs> {
        let mut inputs = CalculatorInputs::default();

        if let Some(model) = &self.model {
            if let Some(preset) = &model.preset {
                inputs = CalculatorInputs::from_model(&catalog.find_model(preset)?);
            }
            inputs = inputs.overlay(CalculatorInputs {
                params_billions: model.params_billions,
                hidden_size: model.hidden_size,
                intermediate_size: model.intermediate_size,
                num_layers: model.num_layers,
                ..CalculatorInputs::default()
            });
        }

        if let Some(device) = &self.device {
            let resolved = if device.host.unwrap_or(false) {
                Some(detect_host_device()?)
            } else if let Some(memory_gb) = device.memory_gb {
                Some(DeviceSpec::new("Custom device", memory_gb))
            } else if let Some(preset) = &device.preset {
                Some(catalog.find_device(preset)?)
            } else {
                None
            };
            if let Some(resolved) = resolved {
                inputs = inputs.with_device(&resolved);
            }
        }

        Ok(inputs)
    }
}

impl Validate for ScenarioConfig {
    fn validate(&self) -> Result<()> {
        if let Some(model) = &self.model {
            validate_optional_non_negative("model.params_billions", model.params_billions)?;
        }
        if let Some(device) = &self.device {
            validate_optional_non_negative("device.memory_gb", device.memory_gb)?;
        }
        for model in &self.models {
            let name = model.name.as_deref().unwrap_or_default();
            validate_non_empty_string("models.name", name)?;
            validate_non_negative("models.params_billions", model.params_billions)?;
        }
        for device in &self.devices {
            validate_non_empty_string("devices.name", &device.name)?;
            validate_non_negative("devices.memory_gb", device.memory_gb)?;
        }
        Ok(())
    }
}
