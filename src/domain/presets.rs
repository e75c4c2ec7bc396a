use crate::domain::model::{DeviceSpec, ModelSpec};
use crate::utils::error::{CalcError, PresetKind, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPreset {
    pub name: &'static str,
    pub params_billions: f64,
    pub hidden_size: u64,
    pub intermediate_size: u64,
    pub num_layers: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePreset {
    pub name: &'static str,
    pub memory_gb: f64,
}

const fn model(
    name: &'static str,
    params_billions: f64,
    hidden_size: u64,
    intermediate_size: u64,
    num_layers: u64,
) -> ModelPreset {
    ModelPreset {
        name,
        params_billions,
        hidden_size,
        intermediate_size,
        num_layers,
    }
}

const fn device(name: &'static str, memory_gb: f64) -> DevicePreset {
    DevicePreset { name, memory_gb }
}

pub const MODELS: &[ModelPreset] = &[
    // LLaMA
    model("LLaMA 3.1 (70B)", 70.0, 8192, 28672, 80),
    model("LLaMA 3.1 (8B)", 8.0, 4096, 14336, 32),
    model("LLaMA 3 (70B)", 70.0, 8192, 28672, 80),
    model("LLaMA 3 (8B)", 8.0, 4096, 14336, 32),
    model("LLaMA 2 (70B)", 70.0, 8192, 28672, 80),
    model("LLaMA 2 (13B)", 13.0, 5120, 13824, 40),
    model("LLaMA 2 (7B)", 7.0, 4096, 11008, 32),
    // Mistral
    model("Mistral (13B NeuralPivot)", 13.0, 4096, 14336, 60),
    model("Mistral (7B)", 7.0, 4096, 14336, 32),
    model("Mistral (13B Amethyst)", 13.0, 5120, 13824, 40),
    // Qwen
    model("Qwen (7B)", 7.0, 4096, 22016, 32),
    model("Qwen (1.5 7B)", 7.0, 4096, 11008, 32),
    // Llava
    model("Llava (1.6 34B)", 34.0, 7168, 20480, 60),
    model("Llava (1.5 13B)", 13.0, 5120, 13824, 40),
    model("Llava (7B)", 7.0, 4096, 11008, 32),
    // Gemma
    model("Gemma (27B)", 27.0, 4608, 36864, 46),
    model("Gemma (2.9B)", 2.9, 3584, 14336, 42),
    model("Gemma (2B)", 2.0, 2048, 16384, 18),
    // Mixtral
    model("Mixtral (46B)", 46.0, 4096, 14336, 32),
];

pub const DEVICES: &[DevicePreset] = &[
    // NVIDIA datacenter
    device("NVIDIA H100 (80GB)", 80.0),
    device("NVIDIA A100 (80GB)", 80.0),
    device("NVIDIA A100 (40GB)", 40.0),
    device("NVIDIA L40S (48GB)", 48.0),
    device("NVIDIA A10G (24GB)", 24.0),
    device("NVIDIA L4 (24GB)", 24.0),
    device("NVIDIA V100 (32GB)", 32.0),
    device("NVIDIA V100 (16GB)", 16.0),
    device("NVIDIA T4 (16GB)", 16.0),
    // NVIDIA consumer
    device("NVIDIA RTX 4090 (24GB)", 24.0),
    device("NVIDIA RTX 4080 (16GB)", 16.0),
    device("NVIDIA RTX 3090 (24GB)", 24.0),
    device("NVIDIA RTX 3060 (12GB)", 12.0),
    // AMD
    device("AMD MI300X (192GB)", 192.0),
    device("AMD MI250 (128GB)", 128.0),
    // Apple unified memory
    device("Apple M2 Ultra (192GB)", 192.0),
    device("Apple M3 Max (128GB)", 128.0),
    device("Apple M1 (16GB)", 16.0),
];

impl ModelPreset {
    pub fn to_spec(&self) -> ModelSpec {
        ModelSpec {
            name: Some(self.name.to_string()),
            params_billions: self.params_billions,
            hidden_size: self.hidden_size,
            intermediate_size: Some(self.intermediate_size),
            num_layers: self.num_layers,
        }
    }
}

impl DevicePreset {
    pub fn to_spec(&self) -> DeviceSpec {
        DeviceSpec::new(self.name, self.memory_gb)
    }
}

/// Built-in presets plus any the user added through a scenario file.
/// User entries shadow built-ins with the same name.
#[derive(Debug, Clone, Default)]
pub struct PresetCatalog {
    extra_models: Vec<ModelSpec>,
    extra_devices: Vec<DeviceSpec>,
}

impl PresetCatalog {
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn with_models(mut self, models: impl IntoIterator<Item = ModelSpec>) -> Self {
        self.extra_models.extend(models);
        self
    }

    pub fn with_devices(mut self, devices: impl IntoIterator<Item = DeviceSpec>) -> Self {
        self.extra_devices.extend(devices);
        self
    }

    pub fn models(&self) -> Vec<ModelSpec> {
        let mut all = self.extra_models.clone();
        for preset in MODELS {
            if !all.iter().any(|m| m.name.as_deref() == Some(preset.name)) {
                all.push(preset.to_spec());
            }
        }
        all
    }

    pub fn devices(&self) -> Vec<DeviceSpec> {
        let mut all = self.extra_devices.clone();
        for preset in DEVICES {
            if !all.iter().any(|d| d.name == preset.name) {
                all.push(preset.to_spec());
            }
        }
        all
    }

    /// Exact match first, then case-insensitive.
    pub fn find_model(&self, name: &str) -> Result<ModelSpec> {
        let models = self.models();
        let needle = name.trim();
        models
            .iter()
            .find(|m| m.name.as_deref() == Some(needle))
            .or_else(|| {
                models.iter().find(|m| {
                    m.name
                        .as_deref()
                        .is_some_and(|n| n.eq_ignore_ascii_case(needle))
                })
            })
            .cloned()
            .ok_or_else(|| CalcError::UnknownPresetError {
                kind: PresetKind::Model,
                name: name.to_string(),
            })
    }

    pub fn find_device(&self, name: &str) -> Result<DeviceSpec> {
        let devices = self.devices();
        let needle = name.trim();
        devices
            .iter()
            .find(|d| d.name == needle)
            .or_else(|| devices.iter().find(|d| d.name.eq_ignore_ascii_case(needle)))
            .cloned()
            .ok_or_else(|| CalcError::UnknownPresetError {
                kind: PresetKind::Device,
                name: name.to_string(),
            })
    }
}
