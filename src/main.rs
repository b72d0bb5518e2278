use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use qfx2csv::{Config, batch, logging};

/// Convert QFX/OFX statement files in a directory into CSV files.
#[derive(Parser, Debug)]
#[command(name = "qfx2csv", version, about)]
struct Cli {
    /// Directory scanned for .qfx files
    #[arg(long, default_value = ".")]
    input_dir: PathBuf,

    /// Directory the .csv files are written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// TOML config file; takes precedence over the directory flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match cli.config {
        Some(path) => match Config::from_toml_path(&path) {
            Ok(config) => config,
            Err(err) => {
                error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => Config {
            input_dir: cli.input_dir,
            output_dir: cli.output_dir,
            ..Config::default()
        },
    };

    // Per-file failures are already logged by the driver and do not fail
    // the run; only not being able to list the input directory does.
    match batch::run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
