use crate::{Result, config::DevicePreference};
use candle_core::Device;
use tracing::debug;

/// Resolves the configured preference into a concrete device.
///
/// `Auto` picks the CUDA device at `cuda_ordinal` when the build has CUDA
/// support and a device is present, and the CPU otherwise. An explicit `Cuda`
/// request that cannot be satisfied is an error.
pub fn select_device(preference: DevicePreference, cuda_ordinal: usize) -> Result<Device> {
    let device = match preference {
        DevicePreference::Auto => Device::cuda_if_available(cuda_ordinal)?,
        DevicePreference::Cpu => Device::Cpu,
        DevicePreference::Cuda => Device::new_cuda(cuda_ordinal)?,
    };

    debug!(
        "Resolved device preference {:?} to {}",
        preference,
        describe(&device)
    );

    Ok(device)
}

pub fn describe(device: &Device) -> &'static str {
    if device.is_cuda() {
        "cuda"
    } else if device.is_metal() {
        "metal"
    } else {
        "cpu"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cpu_preference() {
        let device = select_device(DevicePreference::Cpu, 0).unwrap();
        assert!(device.is_cpu());
        assert_eq!(describe(&device), "cpu");
    }

    #[test]
    fn test_auto_preference_always_resolves() {
        let device = select_device(DevicePreference::Auto, 0).unwrap();
        if !candle_core::utils::cuda_is_available() {
            assert!(device.is_cpu());
        }
    }

    #[cfg(not(feature = "cuda"))]
    #[test]
    fn test_explicit_cuda_without_support_fails() {
        assert!(select_device(DevicePreference::Cuda, 0).is_err());
    }
}
