//! Netlist document loading

use std::fs;
use std::io::Read;
use std::path::Path;

use crate::core::errors::{Error, Result, ResultExt};
use crate::netlist::Netlist;

/// Load a netlist document from a JSON file.
pub fn load_netlist(path: &Path) -> Result<Netlist> {
    let content = fs::read_to_string(path).map_err(|e| Error::FileSystem {
        message: "failed to read netlist".to_string(),
        path: Some(path.to_path_buf()),
        source: Some(e),
    })?;
    parse_netlist(&content).context(format!("loading netlist from {}", path.display()))
}

/// Parse a netlist document from a JSON string.
pub fn parse_netlist(json: &str) -> Result<Netlist> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a netlist document from any reader.
pub fn read_netlist<R: Read>(reader: R) -> Result<Netlist> {
    Ok(serde_json::from_reader(reader)?)
}
