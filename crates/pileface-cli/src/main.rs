//! pileface command-line interface
//!
//! Flips a quantum coin: one Hadamard and one measurement per coin, run on
//! the local simulator or on MonarQ/Yukon, then animated in the terminal.
//!
//! ```text
//!            .-""""-.
//!          .'  ____  '.
//!         /   | H  |   \        q0: ──┤H├──┤M├══ c0
//!         \   |____|   /
//!          '.        .'         0 → HEADS   1 → TAILS
//!            '-....-'
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use pileface_flip::{ConfigOverrides, Device};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{devices, flip};

/// pileface - flip a coin with a qubit
#[derive(Parser)]
#[command(name = "pileface")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Read credentials from this file instead of ./.env or ~/.pileface/.env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Device to flip on (simulation, monarq, monarq-backup, yukon)
    #[arg(short, long)]
    device: Option<Device>,

    /// Number of coins, one qubit each
    #[arg(short, long)]
    coins: Option<u32>,

    /// Remote machine name, overriding the device default
    #[arg(long)]
    machine: Option<String>,

    /// Project to submit the job under
    #[arg(long)]
    project: Option<String>,

    /// Artificial simulator latency in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Seed the simulator and the animation
    #[arg(long)]
    seed: Option<u64>,

    /// Print the result as text instead of animating
    #[arg(long)]
    plain: bool,

    /// How long to hold the final frame, in milliseconds
    #[arg(long, default_value = "10000")]
    hold_ms: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List devices and whether they are configured
    Devices,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            env_file: self.env_file.clone(),
            device: self.device,
            coins: self.coins,
            machine: self.machine.clone(),
            project: self.project.clone(),
            latency_ms: self.latency_ms,
            seed: self.seed,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so the animation owns stdout
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let overrides = cli.overrides();
    let result = match cli.command {
        Some(Commands::Devices) => devices::execute(&overrides).await,
        None => flip::execute(&overrides, cli.plain, cli.hold_ms).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
