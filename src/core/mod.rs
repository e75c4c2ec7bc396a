pub mod calculator;
pub mod estimator;
pub mod export;
pub mod frontier;
pub mod smoothing;

pub use crate::domain::model::{Estimate, Precision};
pub use crate::domain::ports::{InputProvider, Storage};
pub use crate::utils::error::Result;
