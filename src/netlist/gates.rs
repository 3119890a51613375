//! Supported gate vocabulary
//!
//! The analyzable subset is a closed set of single-bit combinational gates.
//! Each kind carries its pin contract, so a wiring that names a pin outside
//! the contract is rejected instead of silently shaping the graph.

use std::fmt;

/// Instance type tag for metadata cells. They carry no logic and are skipped
/// without pin validation.
pub const METADATA_TYPE: &str = "$scopeinfo";

/// The combinational gate kinds the flow engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    Not,
    And,
    Or,
    Xor,
    Mux,
}

impl GateKind {
    /// Resolve an instance type tag to a gate kind. Exact match only.
    pub fn from_type_tag(tag: &str) -> Option<GateKind> {
        match tag {
            "$_NOT_" => Some(GateKind::Not),
            "$_AND_" => Some(GateKind::And),
            "$_OR_" => Some(GateKind::Or),
            "$_XOR_" => Some(GateKind::Xor),
            "$_MUX_" => Some(GateKind::Mux),
            _ => None,
        }
    }

    /// The canonical type tag for this kind.
    pub fn type_tag(self) -> &'static str {
        match self {
            GateKind::Not => "$_NOT_",
            GateKind::And => "$_AND_",
            GateKind::Or => "$_OR_",
            GateKind::Xor => "$_XOR_",
            GateKind::Mux => "$_MUX_",
        }
    }

    /// Every gate drives exactly one output pin.
    pub fn output_pin(self) -> &'static str {
        "Y"
    }

    /// Input pins in pin-letter order. The mux select pin counts as a plain
    /// input: any select bit can steer the output, so it belongs in the cone.
    pub fn input_pins(self) -> &'static [&'static str] {
        match self {
            GateKind::Not => &["A"],
            GateKind::And | GateKind::Or | GateKind::Xor => &["A", "B"],
            GateKind::Mux => &["A", "B", "S"],
        }
    }

    /// Whether `pin` belongs to this kind's contract.
    pub fn accepts_pin(self, pin: &str) -> bool {
        pin == self.output_pin() || self.input_pins().contains(&pin)
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

/// Whether the type tag names a metadata cell.
pub fn is_metadata_type(tag: &str) -> bool {
    tag == METADATA_TYPE
}
