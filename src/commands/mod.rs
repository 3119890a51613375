//! CLI command implementations for sigcone operations.
//!
//! Each submodule handles one command: loading inputs, running the
//! analysis, and writing the selected report format.
//!
//! Available commands:
//! - **analyze**: Extract per-output-bit input cones from a netlist
//! - **init**: Initialize a new sigcone configuration file

pub mod analyze;
pub mod init;

pub use analyze::{handle_analyze, AnalyzeConfig};
pub use init::init_config;
