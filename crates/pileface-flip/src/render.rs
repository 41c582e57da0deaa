//! The display seam between the flip sequence and a renderer.

use std::time::Duration;

use pileface_ir::Circuit;
use thiserror::Error;

use crate::outcome::CoinFlipResult;

/// Errors raised by a display surface.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Terminal I/O failed.
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The surface cannot show the animation.
    #[error("Display surface unavailable: {0}")]
    Unavailable(String),

    /// The user asked to quit before the result arrived.
    #[error("Interrupted by the user")]
    Interrupted,
}

/// Something that can show a coin flip.
pub trait Renderer {
    /// Called once before the circuit is submitted.
    fn waiting(&mut self, _circuit: &Circuit, _backend: &str) -> Result<(), RenderError> {
        Ok(())
    }

    /// How often [`Renderer::tick`] should run while the job is pending.
    /// `None` means the renderer has nothing to animate.
    fn frame_interval(&self) -> Option<Duration> {
        None
    }

    /// Advance the waiting animation by one frame and handle input.
    ///
    /// Returning an error abandons the wait.
    fn tick(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    /// Play the result to conclusion. Called exactly once per successful run.
    fn play(&mut self, result: &CoinFlipResult) -> Result<(), RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn waiting(&mut self, circuit: &Circuit, backend: &str) -> Result<(), RenderError> {
        (**self).waiting(circuit, backend)
    }

    fn frame_interval(&self) -> Option<Duration> {
        (**self).frame_interval()
    }

    fn tick(&mut self) -> Result<(), RenderError> {
        (**self).tick()
    }

    fn play(&mut self, result: &CoinFlipResult) -> Result<(), RenderError> {
        (**self).play(result)
    }
}
