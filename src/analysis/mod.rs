//! Netlist analysis
//!
//! Classifies each module, and for combinational ones resolves the input
//! cone of every output bit. [`analyze_module`] produces one report;
//! [`batch::analyze_netlist`] runs a whole design.

pub mod batch;
pub mod classify;
pub mod flow;

pub use batch::{analyze_netlist, BatchOptions, BatchOutcome};
pub use classify::{is_sequential_module, is_sequential_type, SEQUENTIAL_MARKERS};
pub use flow::FlowGraph;

use crate::core::{DependencyTable, ModuleReport, PortBit, Result};
use crate::netlist::{Module, Port, SigBit};

fn port_bits<'a>(ports: impl Iterator<Item = &'a Port>) -> Vec<PortBit> {
    ports
        .flat_map(|p| (0..p.width).map(|offset| PortBit::new(p.name.clone(), offset, p.width)))
        .collect()
}

/// Analyze one module: classify it, and if combinational resolve every
/// output bit's input cone.
///
/// `extra_markers` extend the built-in sequential type markers. Errors are
/// structural inconsistencies in the module; a sequential module is not an
/// error, it yields a ports-only report.
pub fn analyze_module(module: &Module, extra_markers: &[String]) -> Result<ModuleReport> {
    let inputs = port_bits(module.input_ports());
    let outputs = port_bits(module.output_ports());

    if let Some(cell) = classify::find_sequential_cell(module, extra_markers) {
        log::info!(
            "sequential cell {} ({}) in module {}",
            cell.name,
            cell.cell_type,
            module.name
        );
        log::info!(
            "skipping dependency analysis for sequential module {}",
            module.name
        );
        return Ok(ModuleReport {
            module: module.name.clone(),
            is_sequential: true,
            inputs,
            outputs,
            dependencies: None,
        });
    }

    log::info!("extracting input cones in module {}", module.name);
    let mut graph = FlowGraph::build(module)?;
    let mut table = DependencyTable::new();
    for port in module.output_ports() {
        for offset in 0..port.width {
            let bit = SigBit::wire(port.name.clone(), offset);
            let deps = graph.dependencies_of(&bit)?;
            let mut list: Vec<PortBit> = Vec::with_capacity(deps.len());
            for dep in deps.iter() {
                if let SigBit::Wire { wire, offset } = dep {
                    if let Some(origin) = module.find_port(wire) {
                        list.push(PortBit::new(wire.clone(), *offset, origin.width));
                    }
                }
            }
            list.sort();
            table.insert(format!("{}[{}]", port.name, offset), list);
        }
    }
    log::debug!(
        "module {}: resolved {} bits for {} output bits",
        module.name,
        graph.resolved_bits(),
        table.len()
    );

    Ok(ModuleReport {
        module: module.name.clone(),
        is_sequential: false,
        inputs,
        outputs,
        dependencies: Some(table),
    })
}
