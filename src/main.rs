use anyhow::Result;
use clap::Parser;
use sigcone::cli::{Cli, Commands};
use sigcone::commands::{self, AnalyzeConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            netlist,
            modules,
            format,
            output,
            keep_going,
            parallel,
            jobs,
            plain,
            verbosity,
            extra_args,
        } => {
            init_logging(verbosity);
            commands::handle_analyze(AnalyzeConfig {
                netlist,
                modules,
                format,
                output,
                keep_going,
                parallel,
                jobs,
                plain,
                extra_args,
            })
        }
        Commands::Init { force } => {
            init_logging(0);
            commands::init_config(force)
        }
    }
}

/// Diagnostics go to stderr so report output on stdout stays clean.
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();
}
