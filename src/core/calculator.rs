use crate::core::estimator::{activation_memory, footprint, per_token_memory};
use crate::core::frontier::{generate_frontier, is_drawable};
use crate::domain::model::{
    CalculatorInputs, CalculatorMode, Estimate, Precision, PrecisionEstimate, Readiness,
    ReadyInputs,
};
use crate::domain::ports::InputProvider;
use crate::domain::presets::PresetCatalog;
use crate::utils::error::Result;

/// Turns inputs into an [`Estimate`] covering every precision.
pub struct Calculator {
    catalog: PresetCatalog,
}

impl Calculator {
    pub fn new(catalog: PresetCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    /// `Ok(None)` when the provider's inputs are incomplete; nothing is
    /// rendered in that case.
    pub fn run<P: InputProvider>(&self, provider: &P) -> Result<Option<Estimate>> {
        let mode = provider.mode();
        let inputs = provider.inputs(&self.catalog)?;
        Ok(self.evaluate(&inputs, mode))
    }

    pub fn evaluate(&self, inputs: &CalculatorInputs, mode: CalculatorMode) -> Option<Estimate> {
        match inputs.ready(mode) {
            Readiness::Ready(ready) => Some(estimate(&ready)),
            Readiness::NotReady { missing } => {
                tracing::info!("Inputs not ready, missing: {}", missing.join(", "));
                None
            }
        }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(PresetCatalog::builtin())
    }
}

/// Pure: identical inputs give identical estimates.
pub fn estimate(inputs: &ReadyInputs) -> Estimate {
    let ReadyInputs { model, device, mode } = inputs;

    let per_token = per_token_memory(model.hidden_size, model.num_layers);
    let activation = match mode {
        CalculatorMode::Standard => 0.0,
        CalculatorMode::PrefillChunking => {
            activation_memory(model.hidden_size, model.intermediate_size.unwrap_or(0))
        }
    };

    let precisions: Vec<PrecisionEstimate> = Precision::ALL
        .iter()
        .map(|&precision| {
            let footprint = footprint(model, precision, *mode);
            let available = device.memory_gb - footprint.total_gb;
            let out_of_memory = footprint.charted_gb() > device.memory_gb;
            let frontier = generate_frontier(precision, available, per_token);
            PrecisionEstimate {
                footprint,
                out_of_memory,
                frontier,
            }
        })
        .collect();

    let available: Vec<f64> = precisions
        .iter()
        .map(|p| p.frontier.available_memory_gb)
        .collect();

    tracing::debug!(
        "Estimated {} on {} ({:?}): {} of {} precisions fit",
        model.name.as_deref().unwrap_or("custom model"),
        device.name,
        mode,
        precisions.iter().filter(|p| !p.out_of_memory).count(),
        Precision::ALL.len()
    );

    Estimate {
        mode: *mode,
        model: model.clone(),
        device: device.clone(),
        per_token_memory_gb: per_token,
        activation_memory_gb: activation,
        frontier_drawable: is_drawable(per_token, &available),
        precisions,
    }
}
