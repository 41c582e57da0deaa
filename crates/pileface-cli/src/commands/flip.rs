//! Default command: flip the coins once.

use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::Result;
use console::style;
use tracing::info;

use pileface_flip::{ConfigOverrides, FlipConfig, FlipError, run};
use pileface_render::{PlainRenderer, TerminalRenderer};

/// Load the configuration, run one flip and show it.
pub async fn execute(overrides: &ConfigOverrides, plain: bool, hold_ms: u64) -> Result<()> {
    let config = FlipConfig::load(overrides).map_err(FlipError::from)?;
    info!(device = %config.device, coins = config.coins, "flipping");

    if plain || !io::stdout().is_terminal() {
        let mut renderer = PlainRenderer::new();
        run(&config, &mut renderer).await?;
        return Ok(());
    }

    let mut renderer = TerminalRenderer::new(Duration::from_millis(hold_ms));
    if let Some(seed) = config.seed {
        renderer = renderer.with_seed(seed);
    }
    let outcome = run(&config, &mut renderer).await;
    // Restore the terminal before anything is printed
    drop(renderer);

    let result = outcome?;
    println!(
        "{} {} ({})",
        style("✓").green().bold(),
        style(&result).bold(),
        result.bitstring()
    );
    Ok(())
}
