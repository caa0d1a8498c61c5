//! Address list input for bulk planning.

use std::path::Path;

use anyhow::{Context, Result};

/// Parse an address list: one entry per line, blank lines and `#` comments
/// ignored. Entries are not validated here; the planner drops malformed ones.
pub fn parse_address_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Read an address list file.
pub fn read_address_file(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read address file {}", path.display()))?;
    Ok(parse_address_list(&text))
}

/// Command-line addresses followed by those from `file`, if given.
pub fn collect_addresses(args: &[String], file: Option<&Path>) -> Result<Vec<String>> {
    let mut addresses: Vec<String> = args.iter().map(|a| a.trim().to_string()).collect();
    if let Some(path) = file {
        addresses.extend(read_address_file(path)?);
    }
    Ok(addresses)
}
