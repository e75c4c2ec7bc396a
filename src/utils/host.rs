use crate::domain::model::DeviceSpec;
use crate::utils::error::{CalcError, Result};

#[cfg(feature = "cli")]
use sysinfo::{MemoryRefreshKind, RefreshKind, System};

pub const HOST_DEVICE_NAME: &str = "Host (system RAM)";

const BYTES_PER_GB: f64 = 1_000_000_000.0;

/// Treats the machine's total RAM as the device, for CPU/unified-memory
/// inference.
#[cfg(feature = "cli")]
pub fn detect_host_device() -> Result<DeviceSpec> {
    let mut system = System::new_with_specifics(
        RefreshKind::nothing().with_memory(MemoryRefreshKind::everything()),
    );
    system.refresh_memory();

    let total_bytes = system.total_memory();
    if total_bytes == 0 {
        return Err(CalcError::HostDetectionError {
            message: "the operating system reported 0 bytes of memory".to_string(),
        });
    }

    let device = DeviceSpec::new(HOST_DEVICE_NAME, bytes_to_gb(total_bytes));
    tracing::debug!("Detected host memory: {:.2} GB", device.memory_gb);
    Ok(device)
}

#[cfg(not(feature = "cli"))]
pub fn detect_host_device() -> Result<DeviceSpec> {
    Err(CalcError::HostDetectionError {
        message: "host detection requires the `cli` feature".to_string(),
    })
}

/// Rounded to two decimals so the device label stays readable.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    ((bytes as f64 / BYTES_PER_GB) * 100.0).round() / 100.0
}
