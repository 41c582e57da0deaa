//! Line-oriented output for pipes and dumb terminals.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use pileface_flip::{CoinFlipResult, Outcome, RenderError, Renderer};
use pileface_ir::Circuit;

/// Prints the circuit, a spinner while waiting, then one line per coin.
pub struct PlainRenderer<W: Write = Stdout> {
    out: W,
    spinner: Option<ProgressBar>,
    show_spinner: bool,
}

impl PlainRenderer<Stdout> {
    /// Render to stdout.
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            spinner: None,
            show_spinner: true,
        }
    }
}

impl Default for PlainRenderer<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> PlainRenderer<W> {
    /// Render into `out` without a spinner.
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            spinner: None,
            show_spinner: false,
        }
    }

    /// Consume the renderer and return the writer.
    pub fn into_inner(mut self) -> W {
        self.stop_spinner();
        self.out
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl<W: Write> Renderer for PlainRenderer<W> {
    fn waiting(&mut self, circuit: &Circuit, backend: &str) -> Result<(), RenderError> {
        let coins = circuit.num_qubits();
        writeln!(
            self.out,
            "{} Flipping {} {} on {}",
            style("→").cyan().bold(),
            coins,
            if coins == 1 { "coin" } else { "coins" },
            style(backend).yellow()
        )?;
        writeln!(self.out)?;
        for line in circuit.text_lines() {
            writeln!(self.out, "  {line}")?;
        }
        writeln!(self.out)?;
        self.out.flush()?;

        if self.show_spinner {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message(format!("Waiting for {backend}..."));
            spinner.enable_steady_tick(Duration::from_millis(100));
            self.spinner = Some(spinner);
        }
        Ok(())
    }

    fn play(&mut self, result: &CoinFlipResult) -> Result<(), RenderError> {
        self.stop_spinner();

        for (i, outcome) in result.outcomes().iter().enumerate() {
            let label = match outcome {
                Outcome::Heads => style(outcome.label()).green().bold(),
                Outcome::Tails => style(outcome.label()).magenta().bold(),
            };
            writeln!(self.out, "  Qubit {} : {}", i + 1, label)?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "{} {}", style("✓").green().bold(), style(result).bold())?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(renderer: PlainRenderer<Vec<u8>>) -> String {
        let bytes = renderer.into_inner();
        console::strip_ansi_codes(&String::from_utf8(bytes).unwrap()).into_owned()
    }

    #[test]
    fn test_waiting_prints_diagram() {
        let circuit = Circuit::coin_flip(1).unwrap();
        let mut renderer = PlainRenderer::with_writer(Vec::new());
        renderer.waiting(&circuit, "simulator").unwrap();

        let text = output(renderer);
        assert!(text.contains("Flipping 1 coin on simulator"));
        for line in circuit.text_lines() {
            assert!(text.contains(&line));
        }
    }

    #[test]
    fn test_play_lists_each_qubit() {
        let result = CoinFlipResult::new(
            vec![Outcome::Heads, Outcome::Tails, Outcome::Tails],
            "simulator",
        );
        let mut renderer = PlainRenderer::with_writer(Vec::new());
        renderer.play(&result).unwrap();

        let text = output(renderer);
        assert!(text.contains("Qubit 1 : HEADS"));
        assert!(text.contains("Qubit 2 : TAILS"));
        assert!(text.contains("Qubit 3 : TAILS"));
        assert!(text.contains("Results: 1 Heads, 2 Tails"));
    }

    #[test]
    fn test_plural_coins() {
        let circuit = Circuit::coin_flip(3).unwrap();
        let mut renderer = PlainRenderer::with_writer(Vec::new());
        renderer.waiting(&circuit, "yamaska").unwrap();
        assert!(output(renderer).contains("Flipping 3 coins on yamaska"));
    }
}
