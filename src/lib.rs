// Export modules for library usage
pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;
pub mod netlist;

// Re-export commonly used types
pub use crate::core::{
    AnalysisReport, DependencyTable, Error, ModuleReport, PortBit, Result,
};

pub use crate::netlist::{
    load_netlist, parse_netlist, read_netlist, BitConst, Cell, Connection, GateKind, Module,
    Netlist, Port, PortDirection, SigBit, SigSpec,
};

pub use crate::analysis::{
    analyze_module, analyze_netlist, is_sequential_module, is_sequential_type, BatchOptions,
    BatchOutcome, FlowGraph, SEQUENTIAL_MARKERS,
};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
