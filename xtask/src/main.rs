// Desktop tooling crate: unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod flash;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Target triple of the STM32H743ZI firmware.
pub const TARGET: &str = "thumbv7em-none-eabihf";
/// probe-rs chip name.
pub const CHIP: &str = "STM32H743ZITx";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "DOG clock development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the firmware and flash it via probe-rs
    Flash {
        /// Build and flash release version
        #[arg(short, long)]
        release: bool,
    },
    /// Check the hardware build, the no_std host crates, clippy and rustfmt
    Check,
    /// Run host tests for platform, ui and firmware
    Test {
        /// Only run a single crate's tests (platform, ui or firmware)
        #[arg(long, short)]
        package: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Flash { release } => flash::run(release),
        Commands::Check => check::run(),
        Commands::Test { package } => test::run(package.as_deref()),
    }
}
