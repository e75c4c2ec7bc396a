use crate::utils::error::{CalcError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric width used to store model weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Precision {
    #[serde(rename = "32-bit")]
    Fp32,
    #[serde(rename = "16-bit")]
    Fp16,
    #[serde(rename = "8-bit")]
    Int8,
    #[serde(rename = "4-bit")]
    Int4,
}

impl Precision {
    /// Widest first, the order the charts list them in.
    pub const ALL: [Precision; 4] = [
        Precision::Fp32,
        Precision::Fp16,
        Precision::Int8,
        Precision::Int4,
    ];

    /// Bytes per parameter.
    pub fn factor(self) -> f64 {
        match self {
            Precision::Fp32 => 4.0,
            Precision::Fp16 => 2.0,
            Precision::Int8 => 1.0,
            Precision::Int4 => 0.5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Precision::Fp32 => "32-bit",
            Precision::Fp16 => "16-bit",
            Precision::Int8 => "8-bit",
            Precision::Int4 => "4-bit",
        }
    }

    pub fn row_title(self) -> String {
        self.label().to_uppercase()
    }

    pub fn color(self) -> &'static str {
        match self {
            Precision::Fp32 => "#e45f5b",
            Precision::Fp16 => "#ffc068",
            Precision::Int8 => "#71cce9",
            Precision::Int4 => "#383d95",
        }
    }

    /// Glyph used for this precision's curve in the text line chart.
    pub fn marker(self) -> char {
        match self {
            Precision::Fp32 => '#',
            Precision::Fp16 => '*',
            Precision::Int8 => '+',
            Precision::Int4 => 'o',
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Precision {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "32-bit" | "32" | "fp32" | "f32" => Ok(Precision::Fp32),
            "16-bit" | "16" | "fp16" | "f16" | "bf16" => Ok(Precision::Fp16),
            "8-bit" | "8" | "int8" | "q8" => Ok(Precision::Int8),
            "4-bit" | "4" | "int4" | "q4" => Ok(Precision::Int4),
            _ => Err(CalcError::invalid_value(
                "precision",
                s,
                "Expected one of 32-bit, 16-bit, 8-bit, 4-bit",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorMode {
    #[default]
    Standard,
    PrefillChunking,
}

impl CalculatorMode {
    pub fn footprint_title(self) -> &'static str {
        match self {
            CalculatorMode::Standard => "Model Footprint",
            CalculatorMode::PrefillChunking => "Model Footprint with Prefill Chunking",
        }
    }

    pub fn frontier_title(self) -> &'static str {
        match self {
            CalculatorMode::Standard => "Maximum Batch Size / Sequence Length",
            CalculatorMode::PrefillChunking => {
                "Maximum Batch Size / Sequence Length with Prefill Chunking"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Parameter count in billions.
    pub params_billions: f64,
    pub hidden_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intermediate_size: Option<u64>,
    pub num_layers: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSpec {
    pub name: String,
    pub memory_gb: f64,
}

impl DeviceSpec {
    pub fn new(name: impl Into<String>, memory_gb: f64) -> Self {
        Self {
            name: name.into(),
            memory_gb,
        }
    }
}

/// Raw user input. Every field may still be missing; see
/// [`CalculatorInputs::ready`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculatorInputs {
    pub model_name: Option<String>,
    pub params_billions: Option<f64>,
    pub hidden_size: Option<u64>,
    pub intermediate_size: Option<u64>,
    pub num_layers: Option<u64>,
    pub device_name: Option<String>,
    pub device_memory_gb: Option<f64>,
}

/// Inputs with every field the chosen mode needs, all non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyInputs {
    pub model: ModelSpec,
    pub device: DeviceSpec,
    pub mode: CalculatorMode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Readiness {
    Ready(ReadyInputs),
    NotReady { missing: Vec<&'static str> },
}

impl CalculatorInputs {
    pub fn from_model(model: &ModelSpec) -> Self {
        Self {
            model_name: model.name.clone(),
            params_billions: Some(model.params_billions),
            hidden_size: Some(model.hidden_size),
            intermediate_size: model.intermediate_size,
            num_layers: Some(model.num_layers),
            ..Self::default()
        }
    }

    pub fn with_device(mut self, device: &DeviceSpec) -> Self {
        self.device_name = Some(device.name.clone());
        self.device_memory_gb = Some(device.memory_gb);
        self
    }

    /// Fields set in `other` win.
    pub fn overlay(self, other: CalculatorInputs) -> Self {
        Self {
            model_name: other.model_name.or(self.model_name),
            params_billions: other.params_billions.or(self.params_billions),
            hidden_size: other.hidden_size.or(self.hidden_size),
            intermediate_size: other.intermediate_size.or(self.intermediate_size),
            num_layers: other.num_layers.or(self.num_layers),
            device_name: other.device_name.or(self.device_name),
            device_memory_gb: other.device_memory_gb.or(self.device_memory_gb),
        }
    }

    /// Zero counts as missing, matching a cleared form field.
    pub fn ready(&self, mode: CalculatorMode) -> Readiness {
        let mut missing = Vec::new();

        let params = self.params_billions.filter(|v| *v > 0.0);
        let hidden = self.hidden_size.filter(|v| *v > 0);
        let layers = self.num_layers.filter(|v| *v > 0);
        let intermediate = self.intermediate_size.filter(|v| *v > 0);
        let device_memory = self.device_memory_gb.filter(|v| *v > 0.0);

        if device_memory.is_none() {
            missing.push("device_memory_gb");
        }
        if params.is_none() {
            missing.push("params_billions");
        }
        if hidden.is_none() {
            missing.push("hidden_size");
        }
        if layers.is_none() {
            missing.push("num_layers");
        }
        if mode == CalculatorMode::PrefillChunking && intermediate.is_none() {
            missing.push("intermediate_size");
        }

        match (params, hidden, layers, device_memory) {
            (Some(params), Some(hidden), Some(layers), Some(memory)) if missing.is_empty() => {
                Readiness::Ready(ReadyInputs {
                    model: ModelSpec {
                        name: self.model_name.clone(),
                        params_billions: params,
                        hidden_size: hidden,
                        intermediate_size: intermediate,
                        num_layers: layers,
                    },
                    device: DeviceSpec::new(
                        self.device_name
                            .clone()
                            .unwrap_or_else(|| "Custom device".to_string()),
                        memory,
                    ),
                    mode,
                })
            }
            _ => Readiness::NotReady { missing },
        }
    }
}

/// Memory needed by one precision, in GB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryFootprint {
    pub precision: Precision,
    pub weights_gb: f64,
    pub activation_gb: f64,
    pub per_token_gb: f64,
    pub total_gb: f64,
}

impl MemoryFootprint {
    /// What the bar chart stacks against device capacity: the model segment
    /// (`total_gb`) followed by a separate activation segment. In prefill mode
    /// the activation is therefore counted once inside `total_gb` and once
    /// more as headroom for the next chunk.
    pub fn charted_gb(&self) -> f64 {
        self.total_gb + self.activation_gb
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrontierPoint {
    pub seq_length: u32,
    pub batch_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frontier {
    pub precision: Precision,
    pub available_memory_gb: f64,
    pub points: Vec<FrontierPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecisionEstimate {
    pub footprint: MemoryFootprint,
    pub out_of_memory: bool,
    pub frontier: Frontier,
}

/// Everything the two charts need for one set of inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub mode: CalculatorMode,
    pub model: ModelSpec,
    pub device: DeviceSpec,
    pub per_token_memory_gb: f64,
    pub activation_memory_gb: f64,
    /// False when no precision leaves room for a single token.
    pub frontier_drawable: bool,
    pub precisions: Vec<PrecisionEstimate>,
}

impl Estimate {
    pub fn for_precision(&self, precision: Precision) -> Option<&PrecisionEstimate> {
        self.precisions
            .iter()
            .find(|p| p.footprint.precision == precision)
    }
}
