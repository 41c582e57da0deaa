//! Full-screen terminal animation.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use pileface_flip::{CoinFlipResult, RenderError, Renderer};
use pileface_ir::Circuit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::canvas::Canvas;
use crate::scene::{Scene, coin_radius};
use crate::sprite::{CoinSprite, FPS};

/// Smallest usable terminal.
const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 16;

const EXIT_HINT: &str = "Press any key to exit";
const WAIT_HINT: &str = "Press q to cancel";

/// Renders the flip as a full-screen animation.
///
/// The terminal enters raw mode and the alternate screen on the first call
/// and is restored when the flip has been shown, on error, or on drop.
pub struct TerminalRenderer {
    out: Stdout,
    hold: Duration,
    rng: StdRng,
    diagram: Vec<String>,
    status: String,
    coins: Vec<CoinSprite>,
    active: bool,
}

impl TerminalRenderer {
    /// Renderer that holds the final frame for `hold` or until a key press.
    pub fn new(hold: Duration) -> Self {
        Self {
            out: io::stdout(),
            hold,
            rng: StdRng::from_entropy(),
            diagram: Vec::new(),
            status: String::new(),
            coins: Vec::new(),
            active: false,
        }
    }

    /// Seed the flip lengths.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn enter(&mut self) -> Result<(), RenderError> {
        if self.active {
            return Ok(());
        }
        let (width, height) = terminal::size()?;
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return Err(RenderError::Unavailable(format!(
                "terminal is {width}x{height}, need at least {MIN_WIDTH}x{MIN_HEIGHT}"
            )));
        }

        terminal::enable_raw_mode()?;
        self.active = true;
        execute!(self.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        debug!(width, height, "entered alternate screen");
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let raw = terminal::disable_raw_mode();
        execute!(self.out, ResetColor, Show, LeaveAlternateScreen)?;
        raw
    }

    fn reset_coins(&mut self, count: usize) -> Result<(), RenderError> {
        let (width, height) = terminal::size()?;
        let radius = coin_radius(count, width, height, self.diagram.len());
        self.coins = vec![CoinSprite::new(radius); count];
        Ok(())
    }

    fn draw(&mut self, caption: Option<&CoinFlipResult>, hint: Option<&str>) -> Result<(), RenderError> {
        let (width, height) = terminal::size()?;
        let canvas = Scene {
            diagram: &self.diagram,
            status: &self.status,
            coins: &self.coins,
            caption,
            hint,
        }
        .compose(width, height);
        present(&mut self.out, &canvas)?;
        Ok(())
    }

    fn animate(&mut self, result: &CoinFlipResult) -> Result<(), RenderError> {
        if self.coins.len() != result.len() {
            self.reset_coins(result.len())?;
        }
        for (coin, &outcome) in self.coins.iter_mut().zip(result.outcomes()) {
            coin.flip_randomly(outcome, &mut self.rng);
        }
        self.status = format!("Measured on {}", result.backend());

        let frame = Duration::from_secs(1) / FPS;
        while self.coins.iter().any(CoinSprite::is_flipping) {
            let started = Instant::now();
            self.draw(None, None)?;
            self.coins.iter_mut().for_each(CoinSprite::tick);

            if next_key(frame.saturating_sub(started.elapsed()))?.is_some_and(|k| is_quit(&k)) {
                self.coins.iter_mut().for_each(CoinSprite::settle);
            }
        }

        self.draw(Some(result), Some(EXIT_HINT))?;

        let deadline = Instant::now() + self.hold;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() || next_key(left)?.is_some() {
                return Ok(());
            }
        }
    }
}

impl Renderer for TerminalRenderer {
    fn waiting(&mut self, circuit: &Circuit, backend: &str) -> Result<(), RenderError> {
        self.enter()?;
        self.diagram = circuit.text_lines();
        self.reset_coins(circuit.num_qubits())?;
        self.status = format!("Flipping on {backend}...");
        self.draw(None, Some(WAIT_HINT))
    }

    fn frame_interval(&self) -> Option<Duration> {
        self.active.then(|| Duration::from_secs(1) / FPS)
    }

    fn tick(&mut self) -> Result<(), RenderError> {
        for coin in &mut self.coins {
            coin.wait();
            coin.tick();
        }
        self.draw(None, Some(WAIT_HINT))?;

        if next_key(Duration::ZERO)?.is_some_and(|k| is_abort(&k)) {
            debug!("flip cancelled while waiting");
            self.leave()?;
            return Err(RenderError::Interrupted);
        }
        Ok(())
    }

    fn play(&mut self, result: &CoinFlipResult) -> Result<(), RenderError> {
        self.enter()?;
        let shown = self.animate(result);
        let restored = self.leave();
        shown?;
        Ok(restored?)
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

/// Write a canvas to the terminal, changing colours only between runs.
fn present<W: Write>(out: &mut W, canvas: &Canvas) -> io::Result<()> {
    for (y, row) in (0u16..).zip(canvas.rows()) {
        queue!(out, MoveTo(0, y))?;
        let mut colors: Option<(Color, Color)> = None;
        for cell in row {
            if colors != Some((cell.fg, cell.bg)) {
                queue!(out, SetForegroundColor(cell.fg), SetBackgroundColor(cell.bg))?;
                colors = Some((cell.fg, cell.bg));
            }
            queue!(out, Print(cell.ch))?;
        }
    }
    out.flush()
}

/// Wait up to `timeout` for a key press.
fn next_key(timeout: Duration) -> io::Result<Option<KeyEvent>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(Some(key));
            }
        }
    }
    Ok(None)
}

/// Keys that abandon a pending flip. Raw mode swallows SIGINT, so Ctrl-C
/// arrives here as a key.
fn is_abort(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Keys that cut the animation short.
fn is_quit(key: &KeyEvent) -> bool {
    is_abort(key) || matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
}
