use crate::analysis::{analyze_netlist, BatchOptions};
use crate::core::AnalysisReport;
use crate::io::output::create_writer;
use crate::netlist::load_netlist;
use crate::{cli, config};
use anyhow::Result;
use std::path::PathBuf;

pub struct AnalyzeConfig {
    pub netlist: PathBuf,
    pub modules: Vec<String>,
    pub format: Option<cli::OutputFormat>,
    pub output: Option<PathBuf>,
    pub keep_going: bool,
    pub parallel: bool,
    pub jobs: Option<usize>,
    pub plain: bool,
    pub extra_args: Vec<String>,
}

pub fn handle_analyze(config: AnalyzeConfig) -> Result<()> {
    configure_output(&config);
    report_extra_args(&config.extra_args);

    if let Some(jobs) = config.jobs {
        configure_thread_pool(jobs);
    }

    let netlist = load_netlist(&config.netlist)?;

    let options = BatchOptions {
        selection: if config.modules.is_empty() {
            None
        } else {
            Some(config.modules.clone())
        },
        keep_going: config.keep_going,
        parallel: effective_parallel(config.parallel, config.jobs, config::parallel_default()),
        extra_markers: config::extra_markers().to_vec(),
    };

    let outcome = analyze_netlist(&netlist, &options)?;
    let report = AnalysisReport::new(config.netlist.display().to_string(), outcome.reports);

    let format = resolve_format(config.format, config::default_format());
    let mut writer = create_writer(format.into(), config.output.as_deref())?;
    writer.write_report(&report)?;

    if !outcome.failures.is_empty() {
        anyhow::bail!("{} module(s) failed analysis", outcome.failures.len());
    }
    Ok(())
}

fn resolve_format(
    cli_format: Option<cli::OutputFormat>,
    configured: Option<&str>,
) -> cli::OutputFormat {
    if let Some(format) = cli_format {
        return format;
    }
    let Some(name) = configured else {
        return cli::OutputFormat::Terminal;
    };
    match cli::OutputFormat::from_name(name) {
        Some(format) => format,
        None => {
            log::warn!("Unrecognized default_format \"{name}\" in config file. Using terminal.");
            cli::OutputFormat::Terminal
        }
    }
}

/// `--jobs` implies parallel execution; so do the explicit flag and the
/// configured default.
fn effective_parallel(flag: bool, jobs: Option<usize>, config_default: bool) -> bool {
    flag || jobs.is_some() || config_default
}

/// The analyze command recognizes no positional options; surplus words are
/// reported and the run proceeds with defaults.
fn report_extra_args(extra: &[String]) {
    if !extra.is_empty() {
        log::info!(
            "ignoring {} unrecognized argument(s): {}",
            extra.len(),
            extra.join(" ")
        );
    }
}

fn configure_output(config: &AnalyzeConfig) {
    if config.plain {
        colored::control::set_override(false);
    }
}

fn configure_thread_pool(jobs: usize) {
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()
    {
        log::warn!("could not size the thread pool: {e}");
    }
}
