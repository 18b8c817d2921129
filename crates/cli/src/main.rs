use anyhow::Result;
use clap::Parser;
use pyinstaller_runner::Runner;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let runner = Runner::parse();

    // RUST_LOG wins over -v
    let default_filter = match runner.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    runner.execute()
}
