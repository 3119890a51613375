//! Multi-module batch runs
//!
//! Modules are independent analyses sharing nothing, so a batch is a plain
//! map over the selection, optionally spread across a rayon pool with one
//! module per task. Report order always follows netlist document order.

use rayon::prelude::*;

use crate::analysis::analyze_module;
use crate::core::errors::{Error, Result};
use crate::core::ModuleReport;
use crate::netlist::{Module, Netlist};

/// What to analyze and how to react to per-module failures.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Module names to analyze; `None` means every module in the netlist.
    pub selection: Option<Vec<String>>,
    /// Collect per-module failures instead of aborting on the first one.
    pub keep_going: bool,
    /// Analyze modules on the rayon pool instead of sequentially.
    pub parallel: bool,
    /// Extra sequential type markers on top of the built-in set.
    pub extra_markers: Vec<String>,
}

/// Outcome of a batch run. `failures` is only ever non-empty with
/// `keep_going`; without it the first failure aborts the run.
#[derive(Debug)]
pub struct BatchOutcome {
    pub reports: Vec<ModuleReport>,
    pub failures: Vec<(String, Error)>,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

fn select_modules<'a>(netlist: &'a Netlist, options: &BatchOptions) -> Result<Vec<&'a Module>> {
    match &options.selection {
        None => Ok(netlist.modules.iter().collect()),
        Some(names) => {
            let unknown: Vec<String> = names
                .iter()
                .filter(|n| netlist.find_module(n).is_none())
                .cloned()
                .collect();
            if !unknown.is_empty() {
                return Err(Error::UnknownModules(unknown));
            }
            Ok(netlist
                .modules
                .iter()
                .filter(|m| names.iter().any(|n| *n == m.name))
                .collect())
        }
    }
}

/// Analyze every selected module of `netlist`.
///
/// Unknown selected names fail the whole run before any analysis starts.
pub fn analyze_netlist(netlist: &Netlist, options: &BatchOptions) -> Result<BatchOutcome> {
    let selected = select_modules(netlist, options)?;
    log::info!(
        "analyzing {} of {} modules",
        selected.len(),
        netlist.modules.len()
    );

    let results: Vec<(String, Result<ModuleReport>)> = if options.parallel {
        selected
            .par_iter()
            .map(|m| (m.name.clone(), analyze_module(m, &options.extra_markers)))
            .collect()
    } else {
        selected
            .iter()
            .map(|m| (m.name.clone(), analyze_module(m, &options.extra_markers)))
            .collect()
    };

    let mut reports = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (name, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) if options.keep_going => {
                log::warn!("module {name} failed: {e}");
                failures.push((name, e));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(BatchOutcome { reports, failures })
}
