//! Backend selection.

use pileface_adapter_monarq::MonarqBackend;
use pileface_adapter_sim::SimulatorBackend;
use pileface_hal::{Backend, HalError};
use tracing::info;

use crate::config::FlipConfig;
use crate::error::FlipResult;

/// Build the backend for the configured device.
///
/// Credentials are checked before anything touches the network; a remote
/// device with incomplete credentials fails with a configuration error.
pub fn connect(config: &FlipConfig) -> FlipResult<Box<dyn Backend>> {
    config.validate()?;

    let Some(machine) = config.machine_name() else {
        let mut backend = SimulatorBackend::new().with_latency(config.latency);
        if let Some(seed) = config.seed {
            backend = backend.with_seed(seed);
        }
        info!(latency = ?config.latency, seeded = config.seed.is_some(), "using local simulator");
        return Ok(Box::new(backend));
    };

    let credentials = config.credentials()?;
    let backend = MonarqBackend::with_credentials(
        credentials.host,
        credentials.user,
        credentials.access_token,
        machine,
    )
    .map_err(HalError::from)?
    .with_project(&config.project);

    info!(device = %config.device, machine, project = %config.project, "using remote device");
    Ok(Box::new(backend))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, Credentials, Device};
    use crate::error::FlipError;

    #[test]
    fn test_simulation_needs_no_credentials() {
        let backend = connect(&FlipConfig::new(Device::Simulation)).unwrap();
        assert!(backend.capabilities().is_simulator);
    }

    #[test]
    fn test_remote_without_credentials_is_configuration_error() {
        let err = connect(&FlipConfig::new(Device::Monarq)).err().unwrap();
        assert!(matches!(
            err,
            FlipError::Configuration(ConfigError::MissingCredentials { .. })
        ));
    }

    #[test]
    fn test_remote_with_credentials() {
        let config = FlipConfig::new(Device::Yukon).with_credentials(Credentials {
            host: "https://manager.example.ca".into(),
            user: "alice".into(),
            access_token: "token".into(),
        });
        let backend = connect(&config).unwrap();

        assert!(!backend.capabilities().is_simulator);
        assert_eq!(backend.capabilities().num_qubits, 6);
        assert_eq!(backend.capabilities().name, "yukon");
    }
}
