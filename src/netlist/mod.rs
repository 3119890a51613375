//! Netlist interchange model
//!
//! Mirrors the wire-level view a synthesis host exports: modules with
//! directed ports, bit-vector connections, and gate instances. Bits are the
//! unit of everything downstream; multi-bit ports and connections are just
//! ordered lists of bits.

pub mod gates;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use gates::GateKind;
pub use loader::{load_netlist, parse_netlist, read_netlist};

/// A constant driver value. Constants never contribute dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BitConst {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "x")]
    X,
    #[serde(rename = "z")]
    Z,
}

impl fmt::Display for BitConst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            BitConst::Zero => '0',
            BitConst::One => '1',
            BitConst::X => 'x',
            BitConst::Z => 'z',
        };
        write!(f, "{c}")
    }
}

/// A single bit of a signal: either a constant or one offset of a named wire.
///
/// Serialized untagged, so a bit is either a constant string (`"0"`, `"1"`,
/// `"x"`, `"z"`) or a `{"wire": .., "offset": ..}` object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SigBit {
    Const(BitConst),
    Wire { wire: String, offset: u32 },
}

impl SigBit {
    pub fn wire(name: impl Into<String>, offset: u32) -> Self {
        SigBit::Wire {
            wire: name.into(),
            offset,
        }
    }

    pub const fn zero() -> Self {
        SigBit::Const(BitConst::Zero)
    }

    pub const fn one() -> Self {
        SigBit::Const(BitConst::One)
    }

    pub fn is_const(&self) -> bool {
        matches!(self, SigBit::Const(_))
    }

    /// Wire name, if this bit belongs to a wire.
    pub fn wire_name(&self) -> Option<&str> {
        match self {
            SigBit::Wire { wire, .. } => Some(wire),
            SigBit::Const(_) => None,
        }
    }
}

impl fmt::Display for SigBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigBit::Const(c) => write!(f, "{c}"),
            SigBit::Wire { wire, offset } => write!(f, "{wire}[{offset}]"),
        }
    }
}

/// An ordered bit vector, index 0 = least significant bit.
pub type SigSpec = Vec<SigBit>;

/// Port direction as declared by the host. `Inout` counts as both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    Input,
    Output,
    Inout,
}

impl PortDirection {
    pub fn is_input(self) -> bool {
        matches!(self, PortDirection::Input | PortDirection::Inout)
    }

    pub fn is_output(self) -> bool {
        matches!(self, PortDirection::Output | PortDirection::Inout)
    }
}

/// A module port: a named wire with a direction and a bit width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub direction: PortDirection,
    pub width: u32,
}

/// A direct wiring between two equal-width bit vectors: `src` drives `dest`,
/// one edge per bit position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub dest: SigSpec,
    pub src: SigSpec,
}

/// A cell instance: a named occurrence of some instance type with pins wired
/// to bit vectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub name: String,
    #[serde(rename = "type")]
    pub cell_type: String,
    #[serde(default)]
    pub connections: BTreeMap<String, SigSpec>,
}

/// One module of the design. Port order is declaration order and is
/// preserved through to reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub cells: Vec<Cell>,
}

impl Module {
    /// Look up a port by wire name.
    pub fn find_port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Whether the named wire is a primary input of this module.
    pub fn is_input_wire(&self, name: &str) -> bool {
        self.find_port(name)
            .is_some_and(|p| p.direction.is_input())
    }

    /// Input ports in declaration order.
    pub fn input_ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.direction.is_input())
    }

    /// Output ports in declaration order.
    pub fn output_ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.direction.is_output())
    }
}

/// A whole design: modules in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Netlist {
    pub modules: Vec<Module>,
}

impl Netlist {
    pub fn find_module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sig_bit_deserializes_untagged() {
        let bit: SigBit = serde_json::from_str(r#"{"wire": "a", "offset": 3}"#).unwrap();
        assert_eq!(bit, SigBit::wire("a", 3));

        let bit: SigBit = serde_json::from_str(r#""0""#).unwrap();
        assert_eq!(bit, SigBit::zero());

        let bit: SigBit = serde_json::from_str(r#""x""#).unwrap();
        assert_eq!(bit, SigBit::Const(BitConst::X));
    }

    #[test]
    fn sig_bit_serializes_back_to_same_shape() {
        let json = serde_json::to_string(&SigBit::wire("data", 7)).unwrap();
        assert_eq!(json, r#"{"wire":"data","offset":7}"#);

        let json = serde_json::to_string(&SigBit::one()).unwrap();
        assert_eq!(json, r#""1""#);
    }

    #[test]
    fn sig_bit_display_matches_report_keys() {
        assert_eq!(SigBit::wire("y", 2).to_string(), "y[2]");
        assert_eq!(SigBit::Const(BitConst::Z).to_string(), "z");
    }

    #[test]
    fn inout_is_both_directions() {
        assert!(PortDirection::Inout.is_input());
        assert!(PortDirection::Inout.is_output());
        assert!(PortDirection::Input.is_input());
        assert!(!PortDirection::Input.is_output());
        assert!(PortDirection::Output.is_output());
        assert!(!PortDirection::Output.is_input());
    }

    #[test]
    fn module_port_lookup() {
        let module = Module {
            name: "m".into(),
            ports: vec![
                Port {
                    name: "a".into(),
                    direction: PortDirection::Input,
                    width: 4,
                },
                Port {
                    name: "y".into(),
                    direction: PortDirection::Output,
                    width: 4,
                },
            ],
            connections: vec![],
            cells: vec![],
        };

        assert!(module.is_input_wire("a"));
        assert!(!module.is_input_wire("y"));
        assert!(!module.is_input_wire("missing"));
        assert_eq!(module.find_port("y").map(|p| p.width), Some(4));
    }
}
