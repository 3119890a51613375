//! Bit-level dependency resolution
//!
//! A [`FlowGraph`] indexes every driver edge of one module (direct
//! connections plus gate pins), then answers "which primary-input bits can
//! influence this bit" by a memoized backward closure. Resolution is exact
//! for the supported gate set except for mux select handling, which folds
//! the select bit into the cone unconditionally.

use im::{HashMap, HashSet};

use crate::core::errors::{Error, Result};
use crate::netlist::{gates, GateKind, Module, SigBit};

/// Per-module driver index and memoized dependency resolver.
///
/// Borrows the module it was built from; build one per analysis run and
/// drop it with the run.
#[derive(Debug)]
pub struct FlowGraph<'a> {
    module: &'a Module,
    /// dest bit -> the bits that directly drive it.
    drivers: HashMap<SigBit, HashSet<SigBit>>,
    /// Fully resolved cones. Persistent sets make cache hits O(1) clones.
    resolved: HashMap<SigBit, HashSet<SigBit>>,
    /// Bits currently being resolved; re-entering one means feedback.
    in_progress: std::collections::HashSet<SigBit>,
}

impl<'a> FlowGraph<'a> {
    /// Index every driver edge of `module`, validating connection widths
    /// and gate pin contracts along the way.
    pub fn build(module: &'a Module) -> Result<Self> {
        let mut drivers: HashMap<SigBit, HashSet<SigBit>> = HashMap::new();

        for conn in &module.connections {
            if conn.dest.len() != conn.src.len() {
                return Err(Error::WidthMismatch {
                    module: module.name.clone(),
                    dest_width: conn.dest.len(),
                    src_width: conn.src.len(),
                });
            }
            for (dest, src) in conn.dest.iter().zip(&conn.src) {
                drivers.entry(dest.clone()).or_default().insert(src.clone());
            }
        }

        for cell in &module.cells {
            if gates::is_metadata_type(&cell.cell_type) {
                continue;
            }
            let Some(kind) = GateKind::from_type_tag(&cell.cell_type) else {
                return Err(Error::unsupported_cell(
                    &module.name,
                    &cell.name,
                    &cell.cell_type,
                ));
            };

            let mut output: Option<SigBit> = None;
            let mut inputs: Vec<SigBit> = Vec::new();
            for (pin, sig) in &cell.connections {
                if !kind.accepts_pin(pin) {
                    return Err(Error::UnknownPin {
                        module: module.name.clone(),
                        cell: cell.name.clone(),
                        gate: kind.to_string(),
                        pin: pin.clone(),
                    });
                }
                let [bit] = sig.as_slice() else {
                    return Err(Error::MultiBitPin {
                        module: module.name.clone(),
                        cell: cell.name.clone(),
                        pin: pin.clone(),
                        width: sig.len(),
                    });
                };
                if pin == kind.output_pin() {
                    output = Some(bit.clone());
                } else {
                    inputs.push(bit.clone());
                }
            }

            // A gate with no output pin wired drives nothing.
            if let Some(out) = output {
                let entry = drivers.entry(out).or_default();
                for input in inputs {
                    entry.insert(input);
                }
            }
        }

        log::debug!(
            "flow graph for {}: {} driven bits",
            module.name,
            drivers.len()
        );

        Ok(FlowGraph {
            module,
            drivers,
            resolved: HashMap::new(),
            in_progress: std::collections::HashSet::new(),
        })
    }

    /// The primary-input bits that can influence `bit`.
    ///
    /// Constants resolve to the empty set, primary-input bits to themselves,
    /// and everything else to the union over its drivers. Results are
    /// memoized, so shared subgraphs are walked once per graph lifetime.
    /// Combinational feedback is reported as an error rather than recursed
    /// into.
    pub fn dependencies_of(&mut self, bit: &SigBit) -> Result<HashSet<SigBit>> {
        if let Some(cached) = self.resolved.get(bit) {
            return Ok(cached.clone());
        }

        if bit.is_const() {
            let empty = HashSet::new();
            self.resolved.insert(bit.clone(), empty.clone());
            return Ok(empty);
        }

        if let Some(wire) = bit.wire_name() {
            if self.module.is_input_wire(wire) {
                let set = HashSet::unit(bit.clone());
                self.resolved.insert(bit.clone(), set.clone());
                return Ok(set);
            }
        }

        if self.in_progress.contains(bit) {
            return Err(Error::CombinationalLoop {
                module: self.module.name.clone(),
                bit: bit.to_string(),
            });
        }
        self.in_progress.insert(bit.clone());
        let outcome = self.union_of_drivers(bit);
        self.in_progress.remove(bit);

        let deps = outcome?;
        self.resolved.insert(bit.clone(), deps.clone());
        Ok(deps)
    }

    fn union_of_drivers(&mut self, bit: &SigBit) -> Result<HashSet<SigBit>> {
        // Undriven bits (dangling wires, undriven outputs) have no cone.
        let Some(srcs) = self.drivers.get(bit).cloned() else {
            return Ok(HashSet::new());
        };
        let mut deps = HashSet::new();
        for src in &srcs {
            deps = deps.union(self.dependencies_of(src)?);
        }
        Ok(deps)
    }

    /// Number of bits with a fully resolved cone so far.
    pub fn resolved_bits(&self) -> usize {
        self.resolved.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist::{Cell, Connection, Port, PortDirection};
    use std::collections::BTreeMap;

    fn port(name: &str, direction: PortDirection, width: u32) -> Port {
        Port {
            name: name.into(),
            direction,
            width,
        }
    }

    fn gate(name: &str, cell_type: &str, pins: &[(&str, SigBit)]) -> Cell {
        Cell {
            name: name.into(),
            cell_type: cell_type.into(),
            connections: pins
                .iter()
                .map(|(pin, bit)| (pin.to_string(), vec![bit.clone()]))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn bit(name: &str) -> SigBit {
        SigBit::wire(name, 0)
    }

    fn module(ports: Vec<Port>, connections: Vec<Connection>, cells: Vec<Cell>) -> Module {
        Module {
            name: "dut".into(),
            ports,
            connections,
            cells,
        }
    }

    fn sorted(deps: &HashSet<SigBit>) -> Vec<String> {
        let mut v: Vec<String> = deps.iter().map(|b| b.to_string()).collect();
        v.sort();
        v
    }

    #[test]
    fn input_bit_resolves_to_itself() {
        let m = module(vec![port("a", PortDirection::Input, 2)], vec![], vec![]);
        let mut graph = FlowGraph::build(&m).unwrap();
        let deps = graph.dependencies_of(&SigBit::wire("a", 1)).unwrap();
        assert_eq!(sorted(&deps), vec!["a[1]"]);
    }

    #[test]
    fn constant_driver_contributes_nothing() {
        let m = module(
            vec![port("y", PortDirection::Output, 1)],
            vec![Connection {
                dest: vec![bit("y")],
                src: vec![SigBit::zero()],
            }],
            vec![],
        );
        let mut graph = FlowGraph::build(&m).unwrap();
        assert!(graph.dependencies_of(&bit("y")).unwrap().is_empty());
    }

    #[test]
    fn undriven_bit_has_empty_cone() {
        let m = module(vec![port("y", PortDirection::Output, 1)], vec![], vec![]);
        let mut graph = FlowGraph::build(&m).unwrap();
        assert!(graph.dependencies_of(&bit("y")).unwrap().is_empty());
    }

    #[test]
    fn inverter_chain_collapses_to_the_input() {
        let m = module(
            vec![
                port("a", PortDirection::Input, 1),
                port("y", PortDirection::Output, 1),
            ],
            vec![],
            vec![
                gate("inv0", "$_NOT_", &[("A", bit("a")), ("Y", bit("n0"))]),
                gate("inv1", "$_NOT_", &[("A", bit("n0")), ("Y", bit("y"))]),
            ],
        );
        let mut graph = FlowGraph::build(&m).unwrap();
        assert_eq!(sorted(&graph.dependencies_of(&bit("y")).unwrap()), vec!["a[0]"]);
    }

    #[test]
    fn reconvergent_fanout_reports_each_input_once() {
        // x = a & b; y = a | x
        let m = module(
            vec![
                port("a", PortDirection::Input, 1),
                port("b", PortDirection::Input, 1),
                port("y", PortDirection::Output, 1),
            ],
            vec![],
            vec![
                gate(
                    "g0",
                    "$_AND_",
                    &[("A", bit("a")), ("B", bit("b")), ("Y", bit("x"))],
                ),
                gate(
                    "g1",
                    "$_OR_",
                    &[("A", bit("a")), ("B", bit("x")), ("Y", bit("y"))],
                ),
            ],
        );
        let mut graph = FlowGraph::build(&m).unwrap();
        assert_eq!(
            sorted(&graph.dependencies_of(&bit("y")).unwrap()),
            vec!["a[0]", "b[0]"]
        );
    }

    #[test]
    fn mux_select_is_part_of_the_cone() {
        let m = module(
            vec![
                port("a", PortDirection::Input, 1),
                port("b", PortDirection::Input, 1),
                port("s", PortDirection::Input, 1),
                port("y", PortDirection::Output, 1),
            ],
            vec![],
            vec![gate(
                "m0",
                "$_MUX_",
                &[
                    ("A", bit("a")),
                    ("B", bit("b")),
                    ("S", bit("s")),
                    ("Y", bit("y")),
                ],
            )],
        );
        let mut graph = FlowGraph::build(&m).unwrap();
        assert_eq!(
            sorted(&graph.dependencies_of(&bit("y")).unwrap()),
            vec!["a[0]", "b[0]", "s[0]"]
        );
    }

    #[test]
    fn queries_are_memoized_and_idempotent() {
        let m = module(
            vec![
                port("a", PortDirection::Input, 1),
                port("b", PortDirection::Input, 1),
                port("y", PortDirection::Output, 1),
            ],
            vec![],
            vec![
                gate(
                    "g0",
                    "$_XOR_",
                    &[("A", bit("a")), ("B", bit("b")), ("Y", bit("x"))],
                ),
                gate("g1", "$_NOT_", &[("A", bit("x")), ("Y", bit("y"))]),
            ],
        );
        let mut graph = FlowGraph::build(&m).unwrap();

        let first = graph.dependencies_of(&bit("y")).unwrap();
        let after_first = graph.resolved_bits();
        let second = graph.dependencies_of(&bit("y")).unwrap();

        assert_eq!(first, second);
        assert_eq!(graph.resolved_bits(), after_first);
        // Shared intermediate x is already resolved; asking for it directly
        // does not grow the cache.
        graph.dependencies_of(&bit("x")).unwrap();
        assert_eq!(graph.resolved_bits(), after_first);
    }

    #[test]
    fn feedback_is_an_error_not_a_hang() {
        // y = a & y
        let m = module(
            vec![
                port("a", PortDirection::Input, 1),
                port("y", PortDirection::Output, 1),
            ],
            vec![],
            vec![gate(
                "g0",
                "$_AND_",
                &[("A", bit("a")), ("B", bit("y")), ("Y", bit("y"))],
            )],
        );
        let mut graph = FlowGraph::build(&m).unwrap();
        let err = graph.dependencies_of(&bit("y")).unwrap_err();
        assert!(matches!(err, Error::CombinationalLoop { .. }), "{err}");
    }

    #[test]
    fn two_gate_feedback_loop_is_detected() {
        // p = !q; q = !p
        let m = module(
            vec![port("y", PortDirection::Output, 1)],
            vec![Connection {
                dest: vec![bit("y")],
                src: vec![bit("p")],
            }],
            vec![
                gate("g0", "$_NOT_", &[("A", bit("q")), ("Y", bit("p"))]),
                gate("g1", "$_NOT_", &[("A", bit("p")), ("Y", bit("q"))]),
            ],
        );
        let mut graph = FlowGraph::build(&m).unwrap();
        let err = graph.dependencies_of(&bit("y")).unwrap_err();
        assert!(matches!(err, Error::CombinationalLoop { .. }), "{err}");
    }

    #[test]
    fn width_mismatch_fails_the_build() {
        let m = module(
            vec![
                port("a", PortDirection::Input, 2),
                port("y", PortDirection::Output, 1),
            ],
            vec![Connection {
                dest: vec![bit("y")],
                src: vec![SigBit::wire("a", 0), SigBit::wire("a", 1)],
            }],
            vec![],
        );
        let err = FlowGraph::build(&m).unwrap_err();
        assert!(
            matches!(
                err,
                Error::WidthMismatch {
                    dest_width: 1,
                    src_width: 2,
                    ..
                }
            ),
            "{err}"
        );
    }

    #[test]
    fn unsupported_cell_fails_the_build() {
        let m = module(
            vec![],
            vec![],
            vec![gate("g0", "$_NAND_", &[("A", bit("a")), ("Y", bit("y"))])],
        );
        let err = FlowGraph::build(&m).unwrap_err();
        assert!(matches!(err, Error::UnsupportedCell { .. }), "{err}");
    }

    #[test]
    fn pin_outside_the_contract_fails_the_build() {
        let m = module(
            vec![],
            vec![],
            vec![gate(
                "g0",
                "$_NOT_",
                &[("A", bit("a")), ("B", bit("b")), ("Y", bit("y"))],
            )],
        );
        let err = FlowGraph::build(&m).unwrap_err();
        assert!(matches!(err, Error::UnknownPin { .. }), "{err}");
    }

    #[test]
    fn multi_bit_pin_fails_the_build() {
        let mut connections = BTreeMap::new();
        connections.insert(
            "A".to_string(),
            vec![SigBit::wire("a", 0), SigBit::wire("a", 1)],
        );
        connections.insert("Y".to_string(), vec![bit("y")]);
        let m = module(
            vec![],
            vec![],
            vec![Cell {
                name: "g0".into(),
                cell_type: "$_NOT_".into(),
                connections,
            }],
        );
        let err = FlowGraph::build(&m).unwrap_err();
        assert!(
            matches!(err, Error::MultiBitPin { width: 2, .. }),
            "{err}"
        );
    }

    #[test]
    fn metadata_cells_are_skipped_entirely() {
        let mut connections = BTreeMap::new();
        // Metadata pins are unconstrained; a multi-bit pin must not trip
        // the single-bit check.
        connections.insert(
            "DATA".to_string(),
            vec![SigBit::wire("a", 0), SigBit::wire("a", 1)],
        );
        let m = module(
            vec![
                port("a", PortDirection::Input, 2),
                port("y", PortDirection::Output, 1),
            ],
            vec![Connection {
                dest: vec![bit("y")],
                src: vec![bit("a")],
            }],
            vec![Cell {
                name: "info".into(),
                cell_type: "$scopeinfo".into(),
                connections,
            }],
        );
        let mut graph = FlowGraph::build(&m).unwrap();
        assert_eq!(sorted(&graph.dependencies_of(&bit("y")).unwrap()), vec!["a[0]"]);
    }

    #[test]
    fn gate_without_output_pin_drives_nothing() {
        let m = module(
            vec![
                port("a", PortDirection::Input, 1),
                port("y", PortDirection::Output, 1),
            ],
            vec![],
            vec![gate("g0", "$_NOT_", &[("A", bit("a"))])],
        );
        let mut graph = FlowGraph::build(&m).unwrap();
        assert!(graph.dependencies_of(&bit("y")).unwrap().is_empty());
    }

    #[test]
    fn graph_stays_usable_after_a_loop_error() {
        // y0 feeds back; y1 is a clean inverter.
        let m = module(
            vec![
                port("a", PortDirection::Input, 1),
                port("y0", PortDirection::Output, 1),
                port("y1", PortDirection::Output, 1),
            ],
            vec![],
            vec![
                gate(
                    "g0",
                    "$_OR_",
                    &[("A", bit("a")), ("B", bit("y0")), ("Y", bit("y0"))],
                ),
                gate("g1", "$_NOT_", &[("A", bit("a")), ("Y", bit("y1"))]),
            ],
        );
        let mut graph = FlowGraph::build(&m).unwrap();
        assert!(graph.dependencies_of(&bit("y0")).is_err());
        assert_eq!(
            sorted(&graph.dependencies_of(&bit("y1")).unwrap()),
            vec!["a[0]"]
        );
    }
}
