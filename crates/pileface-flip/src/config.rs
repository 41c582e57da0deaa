//! Run configuration.
//!
//! Values are read from, in order of precedence:
//! 1. Command-line overrides ([`ConfigOverrides`])
//! 2. Environment variables with the `PILEFACE_` prefix
//! 3. A dotenv file: `--env-file`, else `./.env`, else `~/.pileface/.env`
//! 4. Default values
//!
//! The process variable `USER` is never consulted: on Unix it holds the login
//! name, not a Calcul Québec account.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use pileface_adapter_monarq::{
    DEFAULT_PROJECT, MONARQ_BACKUP_MACHINE, MONARQ_MACHINE, YUKON_MACHINE, machine_qubits,
};
use pileface_adapter_sim::DEFAULT_MAX_QUBITS;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "PILEFACE_";

/// Key of the API host URL.
pub const HOST_KEY: &str = "HOST";
/// Key of the account user name.
pub const USER_KEY: &str = "USER";
/// Key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "ACCESS_TOKEN";
/// Key selecting the simulator when no device is given.
pub const SIM_BOOL_KEY: &str = "SIM_BOOL";
/// Key of the project to submit under.
pub const PROJECT_NAME_KEY: &str = "PROJECT_NAME";

/// Default number of coins.
pub const DEFAULT_COINS: u32 = 1;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested file does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A dotenv file could not be read or parsed.
    #[error("Cannot read {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// Remote execution was requested without full credentials.
    #[error(
        "{device} requires {}; set them in a .env file or as PILEFACE_* environment variables",
        .keys.join(", ")
    )]
    MissingCredentials {
        device: Device,
        keys: Vec<&'static str>,
    },

    /// A value cannot be used.
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Device a coin can be flipped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    /// Local ideal simulator: a fair coin.
    Simulation,
    /// MonarQ, 24 qubits.
    Monarq,
    /// The MonarQ backup machine, 24 qubits.
    MonarqBackup,
    /// Yukon, 6 qubits.
    Yukon,
}

impl Device {
    /// All devices, in menu order.
    pub const ALL: [Device; 4] = [
        Device::Monarq,
        Device::MonarqBackup,
        Device::Yukon,
        Device::Simulation,
    ];

    /// Name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Device::Simulation => "simulation",
            Device::Monarq => "monarq",
            Device::MonarqBackup => "monarq-backup",
            Device::Yukon => "yukon",
        }
    }

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            Device::Simulation => "Simulation",
            Device::Monarq => "MonarQ",
            Device::MonarqBackup => "MonarQ Backup",
            Device::Yukon => "Yukon",
        }
    }

    /// Remote machine name, `None` for the simulator.
    pub fn machine(self) -> Option<&'static str> {
        match self {
            Device::Simulation => None,
            Device::Monarq => Some(MONARQ_MACHINE),
            Device::MonarqBackup => Some(MONARQ_BACKUP_MACHINE),
            Device::Yukon => Some(YUKON_MACHINE),
        }
    }

    /// Number of qubits, which bounds the number of coins.
    pub fn num_qubits(self) -> u32 {
        self.machine()
            .and_then(machine_qubits)
            .unwrap_or(DEFAULT_MAX_QUBITS)
    }

    /// Whether flipping on this device needs credentials and a network.
    pub fn is_remote(self) -> bool {
        self != Device::Simulation
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Device {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simulation" | "sim" | "simulator" => Ok(Device::Simulation),
            "monarq" | "yamaska" => Ok(Device::Monarq),
            "monarq-backup" | "monarq.backup" | "backup" => Ok(Device::MonarqBackup),
            "yukon" => Ok(Device::Yukon),
            _ => Err(ConfigError::InvalidValue {
                key: "device".into(),
                value: s.into(),
                reason: "expected simulation, monarq, monarq-backup or yukon".into(),
            }),
        }
    }
}

/// Calcul Québec account credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// API host URL.
    pub host: String,
    /// Account user name.
    pub user: String,
    /// Access token.
    pub access_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub env_file: Option<PathBuf>,
    pub device: Option<Device>,
    pub coins: Option<u32>,
    pub machine: Option<String>,
    pub project: Option<String>,
    pub latency_ms: Option<u64>,
    pub seed: Option<u64>,
}

/// Immutable configuration of one run.
#[derive(Clone)]
pub struct FlipConfig {
    /// Selected device.
    pub device: Device,
    /// Number of coins (qubits).
    pub coins: u32,
    /// Project to submit under.
    pub project: String,
    /// Remote machine override.
    pub machine: Option<String>,
    /// Artificial simulator latency.
    pub latency: Duration,
    /// Simulator RNG seed.
    pub seed: Option<u64>,
    /// The dotenv file values were read from, if any.
    pub source: Option<PathBuf>,
    host: Option<String>,
    user: Option<String>,
    access_token: Option<String>,
}

impl FlipConfig {
    /// Configuration for `device` with default values and no credentials.
    pub fn new(device: Device) -> Self {
        Self {
            device,
            coins: DEFAULT_COINS,
            project: DEFAULT_PROJECT.into(),
            machine: None,
            latency: Duration::ZERO,
            seed: None,
            source: None,
            host: None,
            user: None,
            access_token: None,
        }
    }

    /// Load configuration from the process environment and dotenv files.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        ConfigLoader::new().load(overrides)
    }

    /// Set credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.host = Some(credentials.host);
        self.user = Some(credentials.user);
        self.access_token = Some(credentials.access_token);
        self
    }

    /// Set the number of coins.
    pub fn with_coins(mut self, coins: u32) -> Self {
        self.coins = coins;
        self
    }

    /// Credentials for remote execution.
    ///
    /// Fails with [`ConfigError::MissingCredentials`] naming every absent key.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        match (&self.host, &self.user, &self.access_token) {
            (Some(host), Some(user), Some(access_token)) => Ok(Credentials {
                host: host.clone(),
                user: user.clone(),
                access_token: access_token.clone(),
            }),
            _ => {
                let keys = [
                    (HOST_KEY, self.host.is_none()),
                    (USER_KEY, self.user.is_none()),
                    (ACCESS_TOKEN_KEY, self.access_token.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, missing)| missing.then_some(key))
                .collect();
                Err(ConfigError::MissingCredentials {
                    device: self.device,
                    keys,
                })
            }
        }
    }

    /// Whether all credentials are present.
    pub fn has_credentials(&self) -> bool {
        self.credentials().is_ok()
    }

    /// Remote machine to submit to, `None` for the simulator.
    pub fn machine_name(&self) -> Option<&str> {
        if !self.device.is_remote() {
            return None;
        }
        self.machine.as_deref().or(self.device.machine())
    }

    /// Largest number of coins the selected device can flip at once.
    pub fn max_coins(&self) -> u32 {
        self.machine_name()
            .and_then(machine_qubits)
            .unwrap_or(self.device.num_qubits())
    }

    /// Check that the run can be attempted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.coins > self.max_coins() {
            return Err(ConfigError::InvalidValue {
                key: "coins".into(),
                value: self.coins.to_string(),
                reason: format!("{} has only {} qubits", self.device, self.max_coins()),
            });
        }
        if self.device.is_remote() {
            self.credentials()?;
        }
        Ok(())
    }
}

impl fmt::Debug for FlipConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlipConfig")
            .field("device", &self.device)
            .field("coins", &self.coins)
            .field("project", &self.project)
            .field("machine", &self.machine)
            .field("latency", &self.latency)
            .field("seed", &self.seed)
            .field("source", &self.source)
            .field("host", &self.host)
            .field("user", &self.user)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// Reads a [`FlipConfig`] from dotenv files and environment variables.
pub struct ConfigLoader {
    search_paths: Vec<PathBuf>,
    env: EnvLookup,
}

impl ConfigLoader {
    /// Loader over the process environment and the default search paths.
    pub fn new() -> Self {
        let mut search_paths = vec![PathBuf::from(".env")];
        if let Some(home) = dirs::home_dir() {
            search_paths.push(home.join(".pileface").join(".env"));
        }
        Self {
            search_paths,
            env: Box::new(|key| std::env::var(key).ok()),
        }
    }

    /// Replace the files searched when no `--env-file` is given.
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Replace the environment lookup.
    pub fn with_env<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        self.env = Box::new(env);
        self
    }

    /// Resolve the configuration.
    pub fn load(&self, overrides: &ConfigOverrides) -> Result<FlipConfig, ConfigError> {
        let (source, file) = self.read_file(overrides.env_file.as_deref())?;
        let lookup = |key: &str| {
            (self.env)(&format!("{ENV_PREFIX}{key}"))
                .filter(|v| !v.is_empty())
                .or_else(|| file.get(key).filter(|v| !v.is_empty()).cloned())
        };

        let device = match overrides.device {
            Some(device) => device,
            None => {
                let simulate = lookup(SIM_BOOL_KEY)
                    .map(|value| parse_bool(SIM_BOOL_KEY, &value))
                    .transpose()?
                    .unwrap_or(false);
                if simulate { Device::Simulation } else { Device::Monarq }
            }
        };

        let config = FlipConfig {
            device,
            coins: overrides.coins.unwrap_or(DEFAULT_COINS),
            project: overrides
                .project
                .clone()
                .or_else(|| lookup(PROJECT_NAME_KEY))
                .unwrap_or_else(|| DEFAULT_PROJECT.into()),
            machine: overrides.machine.clone(),
            latency: Duration::from_millis(overrides.latency_ms.unwrap_or(0)),
            seed: overrides.seed,
            source,
            host: lookup(HOST_KEY),
            user: lookup(USER_KEY),
            access_token: lookup(ACCESS_TOKEN_KEY),
        };
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    fn read_file(
        &self,
        explicit: Option<&Path>,
    ) -> Result<(Option<PathBuf>, FxHashMap<String, String>), ConfigError> {
        let path = match explicit {
            Some(path) if path.is_file() => path.to_path_buf(),
            Some(path) => return Err(ConfigError::NotFound(path.to_path_buf())),
            None => match self.search_paths.iter().find(|p| p.is_file()) {
                Some(path) => path.clone(),
                None => return Ok((None, FxHashMap::default())),
            },
        };

        let parse_err = |source| ConfigError::Parse {
            path: path.clone(),
            source,
        };
        let mut values = FxHashMap::default();
        for item in dotenvy::from_path_iter(&path).map_err(parse_err)? {
            let (key, value) = item.map_err(parse_err)?;
            values.insert(key, value);
        }
        debug!(path = %path.display(), keys = values.len(), "read configuration file");
        Ok((Some(path), values))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: "expected true or false".into(),
        }),
    }
}
