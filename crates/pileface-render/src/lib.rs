//! Renderers for pileface coin flips.
//!
//! Two implementations of [`pileface_flip::Renderer`]:
//!
//! - [`TerminalRenderer`]: full-screen animation using `crossterm`. The coins
//!   spin for a random number of frames, land on the measured face and the
//!   final frame is held until a key press.
//! - [`PlainRenderer`]: line output with an `indicatif` spinner, used when
//!   stdout is not a terminal.
//!
//! ```ignore
//! use pileface_render::TerminalRenderer;
//! use std::time::Duration;
//!
//! let mut renderer = TerminalRenderer::new(Duration::from_secs(10));
//! pileface_flip::run(&config, &mut renderer).await?;
//! ```

mod canvas;
mod plain;
mod scene;
mod sprite;
mod terminal;

pub use plain::PlainRenderer;
pub use sprite::{CoinPose, CoinSprite, FLIP_FRAMES, FPS};
pub use terminal::TerminalRenderer;
