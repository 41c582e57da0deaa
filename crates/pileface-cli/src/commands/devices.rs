//! Devices command implementation.

use anyhow::Result;
use console::style;
use tracing::debug;

use pileface_flip::{ConfigError, ConfigOverrides, Device, FlipConfig, FlipError, connect};
use pileface_hal::Backend;

/// List every device with its size, configuration state and, when
/// configured, whether it is online.
pub async fn execute(overrides: &ConfigOverrides) -> Result<()> {
    println!("{} Available devices:\n", style("pileface").cyan().bold());

    for device in Device::ALL {
        let config = FlipConfig::load(&ConfigOverrides {
            device: Some(device),
            coins: None,
            ..overrides.clone()
        })
        .map_err(FlipError::from)?;

        let missing = match config.credentials() {
            Err(ConfigError::MissingCredentials { keys, .. }) if device.is_remote() => keys,
            _ => Vec::new(),
        };

        println!(
            "  {} {} {}",
            if missing.is_empty() {
                style("●").green()
            } else {
                style("○").dim()
            },
            style(device.name()).bold(),
            match config.machine_name() {
                Some(machine) => format!("({} on {machine})", device.label()),
                None => "(local)".to_string(),
            }
        );
        println!("    Qubits: {}", device.num_qubits());
        if missing.is_empty() {
            println!("    Status: {}", status_line(&config).await);
        } else {
            println!("    Status: not configured, set {}", missing.join(", "));
        }
        println!();
    }

    Ok(())
}

/// Ask the configured backend whether it is accepting jobs.
async fn status_line(config: &FlipConfig) -> String {
    let backend = match connect(config) {
        Ok(backend) => backend,
        Err(e) => return format!("{}", style(format!("unusable ({e})")).red()),
    };

    match backend.availability().await {
        Ok(availability) if availability.is_available => {
            format!("{}", style("online").green())
        }
        Ok(availability) => {
            let reason = availability
                .status_message
                .unwrap_or_else(|| "no reason given".into());
            format!("{}", style(format!("offline ({reason})")).yellow())
        }
        Err(e) => {
            debug!(device = %config.device, "availability check failed: {e}");
            format!("{}", style(format!("offline ({e})")).yellow())
        }
    }
}
