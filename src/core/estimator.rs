use crate::domain::model::{CalculatorMode, MemoryFootprint, ModelSpec, Precision};

/// Prompt tokens processed per prefill chunk.
pub const MAX_CHUNK_SIZE: u64 = 512;

const BYTES_PER_GB: f64 = 1_000_000_000.0;

/// Weight memory alone: `params × bytes per parameter`, in GB.
pub fn standard_memory(params_billions: f64, precision: Precision) -> f64 {
    let memory = params_billions * precision.factor();
    tracing::debug!("[Standard] {} memory: {} GB", precision.row_title(), memory);
    memory
}

/// Peak activation memory for one prefill chunk, in GB.
pub fn activation_memory(hidden_size: u64, intermediate_size: u64) -> f64 {
    // f64 throughout: large dimensions must not overflow integer products.
    let widest = (2.0 * intermediate_size as f64).max(4.0 * hidden_size as f64);
    MAX_CHUNK_SIZE as f64 * 2.0 * widest / BYTES_PER_GB
}

/// KV memory one token occupies across all layers, in GB.
pub fn per_token_memory(hidden_size: u64, num_layers: u64) -> f64 {
    4.0 * hidden_size as f64 * num_layers as f64 / BYTES_PER_GB
}

/// Weights plus one chunk of activations plus one token, in GB.
pub fn prefill_memory(
    params_billions: f64,
    hidden_size: u64,
    num_layers: u64,
    intermediate_size: u64,
    precision: Precision,
) -> f64 {
    let weights = params_billions * precision.factor();
    let activation = activation_memory(hidden_size, intermediate_size);
    let per_token = per_token_memory(hidden_size, num_layers);
    let total = weights + activation + per_token;

    tracing::debug!("[Prefill] {} memory: {} GB", precision.row_title(), total);
    tracing::debug!("[Prefill] Activation memory: {} GB", activation);
    tracing::debug!("[Prefill] Memory per input: {} GB", per_token);

    total
}

/// Breaks the footprint of `model` at `precision` into its parts.
/// A missing intermediate size in prefill mode is treated as zero, which
/// leaves the activation term to the `4 × hidden` side of the max.
pub fn footprint(model: &ModelSpec, precision: Precision, mode: CalculatorMode) -> MemoryFootprint {
    match mode {
        CalculatorMode::Standard => {
            let weights = standard_memory(model.params_billions, precision);
            MemoryFootprint {
                precision,
                weights_gb: weights,
                activation_gb: 0.0,
                per_token_gb: 0.0,
                total_gb: weights,
            }
        }
        CalculatorMode::PrefillChunking => {
            let intermediate = model.intermediate_size.unwrap_or(0);
            let total = prefill_memory(
                model.params_billions,
                model.hidden_size,
                model.num_layers,
                intermediate,
                precision,
            );
            MemoryFootprint {
                precision,
                weights_gb: model.params_billions * precision.factor(),
                activation_gb: activation_memory(model.hidden_size, intermediate),
                per_token_gb: per_token_memory(model.hidden_size, model.num_layers),
                total_gb: total,
            }
        }
    }
}
