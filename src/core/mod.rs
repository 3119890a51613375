//! Core report model
//!
//! The structured output of an analysis run: per-module port listings and,
//! for combinational modules, the per-output-bit dependency table.

pub mod errors;

pub use errors::{Error, Result};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One bit of a named port, carrying the port's declared width.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortBit {
    pub name: String,
    pub offset: u32,
    pub width: u32,
}

impl PortBit {
    pub fn new(name: impl Into<String>, offset: u32, width: u32) -> Self {
        PortBit {
            name: name.into(),
            offset,
            width,
        }
    }

    /// Report key form, `name[offset]`.
    pub fn key(&self) -> String {
        format!("{}[{}]", self.name, self.offset)
    }
}

impl fmt::Display for PortBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.offset)
    }
}

/// Per-output-bit dependency lists, keyed `name[offset]`.
///
/// Key order is meaningful (output declaration order, then ascending
/// offset) and survives serialization, which rules out the stock map
/// types: alphabetical ordering would put `y[10]` before `y[2]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyTable {
    entries: Vec<(String, Vec<PortBit>)>,
}

impl DependencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an output bit's dependency list. Keys are expected unique;
    /// callers insert in report order.
    pub fn insert(&mut self, key: String, deps: Vec<PortBit>) {
        self.entries.push((key, deps));
    }

    pub fn get(&self, key: &str) -> Option<&[PortBit]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, deps)| deps.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PortBit])> {
        self.entries
            .iter()
            .map(|(k, deps)| (k.as_str(), deps.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for DependencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, deps) in &self.entries {
            map.serialize_entry(key, deps)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DependencyTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = DependencyTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from output bit keys to dependency lists")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, Vec<PortBit>>()? {
                    entries.push(entry);
                }
                Ok(DependencyTable { entries })
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// The analysis outcome for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleReport {
    pub module: String,
    pub is_sequential: bool,
    /// Input-port bits in declaration order, then ascending offset.
    pub inputs: Vec<PortBit>,
    /// Output-port bits in declaration order, then ascending offset.
    pub outputs: Vec<PortBit>,
    /// Present only for combinational modules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<DependencyTable>,
}

impl ModuleReport {
    /// Widest input cone in the report, if any.
    pub fn max_cone_size(&self) -> Option<usize> {
        self.dependencies
            .as_ref()
            .and_then(|table| table.iter().map(|(_, deps)| deps.len()).max())
    }
}

/// A whole run's output: every analyzed module, in netlist order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Source the netlist was loaded from.
    pub netlist: String,
    /// Tool name and version that produced the report.
    pub generator: String,
    pub modules: Vec<ModuleReport>,
}

impl AnalysisReport {
    pub fn new(netlist: impl Into<String>, modules: Vec<ModuleReport>) -> Self {
        AnalysisReport {
            netlist: netlist.into(),
            generator: format!("sigcone {}", env!("CARGO_PKG_VERSION")),
            modules,
        }
    }
}
