use crate::domain::model::{CalculatorInputs, CalculatorMode};
use crate::domain::presets::PresetCatalog;
use crate::utils::error::Result;

pub trait Storage {
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
    /// Human-readable location of `path`, for log and console output.
    fn describe(&self, path: &str) -> String;
}

/// Anything that can produce calculator inputs: CLI flags, a scenario file.
pub trait InputProvider {
    fn mode(&self) -> CalculatorMode;
    fn inputs(&self, catalog: &PresetCatalog) -> Result<CalculatorInputs>;
}
