//! Module classification
//!
//! Splits modules into combinational and sequential before any flow
//! analysis runs. Classification is a substring scan over instance type
//! tags: state-holding primitives and memories carry well-known fragments
//! in their type names, whatever the surrounding parametrization.

use crate::netlist::{Cell, Module};

/// Type-tag fragments that mark a state-holding instance. Matching is
/// case-sensitive: `$_DFF_P_` contains `FF`, `$mem_v2` contains `mem`,
/// a hypothetical `$_ff_` matches neither.
pub const SEQUENTIAL_MARKERS: &[&str] = &["FF", "DLATCH", "DLE", "SR", "mem"];

/// Whether an instance type tag names a state-holding element.
///
/// Total over any string. `extra_markers` extend the built-in set (vendor
/// cell libraries spell their flops their own way); empty strings are
/// ignored rather than matching everything.
pub fn is_sequential_type(cell_type: &str, extra_markers: &[String]) -> bool {
    SEQUENTIAL_MARKERS.iter().any(|m| cell_type.contains(m))
        || extra_markers
            .iter()
            .filter(|m| !m.is_empty())
            .any(|m| cell_type.contains(m.as_str()))
}

/// First state-holding cell of the module, in cell order. Drives the
/// diagnostic naming the instance that made a module sequential.
pub fn find_sequential_cell<'a>(module: &'a Module, extra_markers: &[String]) -> Option<&'a Cell> {
    module
        .cells
        .iter()
        .find(|c| is_sequential_type(&c.cell_type, extra_markers))
}

/// Whether the module holds state.
pub fn is_sequential_module(module: &Module, extra_markers: &[String]) -> bool {
    find_sequential_cell(module, extra_markers).is_some()
}
