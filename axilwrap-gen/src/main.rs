use std::path::PathBuf;

use axilwrap::{PackageConfig, PackageError, Platform, SourceRegistry};
use clap::Parser;
use tracing::{info, warn};

/// Generates AXI-Lite register slice wrappers from a JSON description.
#[derive(Debug, Parser)]
#[command(name = "axilwrap-gen", version, about)]
struct Cli {
    /// JSON description of the register slices.
    #[arg(short, long)]
    config: PathBuf,

    /// Output directory.
    #[arg(short, long, default_value = "./build")]
    output: PathBuf,

    /// Directory holding `axil_register*.v`.
    #[arg(long, env = axilwrap::platform::RTL_DIR_ENV)]
    rtl_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Warns about every registered source missing on disk. Returns how many are missing.
fn report_missing_sources(platform: &SourceRegistry) -> usize {
    let missing = platform.missing_sources();
    for source in &missing {
        warn!("Source {} does not exist.", source.display());
    }
    if !missing.is_empty() {
        warn!("{} wrapped source(s) not found under {}.", missing.len(), platform.rtl_dir().display());
    }
    missing.len()
}

fn main() -> Result<(), PackageError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_env_filter(log_level(cli.verbose)).init();

    let config = PackageConfig::from_path(&cli.config)?;
    if config.registers.is_empty() {
        warn!("{} describes no register slices.", cli.config.display());
    }

    let package = config.build(cli.rtl_dir)?;
    let _ = report_missing_sources(package.platform());

    let written = package.gen_vir(&cli.output)?;
    info!("Wrote {} file(s) to {}.", written.len(), cli.output.display());

    Ok(())
}
