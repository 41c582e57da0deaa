//! Quantum coin flip orchestration.
//!
//! One run is a fixed sequence:
//!
//! ```text
//!   FlipConfig ──→ connect() ──→ Circuit::coin_flip ──→ submit + wait ──→ CoinFlipResult ──→ Renderer::play
//!   (.env, env)    (sim/remote)   (H, then measure)     (one job)         (0 → HEADS, 1 → TAILS)
//! ```
//!
//! Every failure is fatal and reported through [`FlipError`]:
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | `Configuration` | credentials missing for a remote device, unreadable `.env`, bad value |
//! | `Connection` | backend unreachable, credentials rejected, job failed, malformed result |
//! | `Rendering` | the display surface fails |
//! | `Circuit` | zero coins requested |
//!
//! Fairness depends on the device: the simulator is an ideal fair coin,
//! hardware outcomes carry calibration noise.
//!
//! # Example
//!
//! ```ignore
//! use pileface_flip::{ConfigOverrides, FlipConfig, run};
//!
//! let config = FlipConfig::load(&ConfigOverrides::default())?;
//! let result = run(&config, &mut renderer).await?;
//! println!("{result}");
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod outcome;
pub mod render;

pub use backend::connect;
pub use config::{ConfigError, ConfigLoader, ConfigOverrides, Credentials, Device, FlipConfig};
pub use error::{FlipError, FlipResult};
pub use orchestrator::{flip, run};
pub use outcome::{CoinFlipResult, Outcome};
pub use render::{RenderError, Renderer};
