use std::{fs, path::Path};

use crate::{
    errors::LedgerError,
    ledger::{parse_ledger_json, AnnualLedgerEntry},
};

/// Loads an upstream ledger export (bare array or `{ "data": [...] }`).
pub fn load_entries_from_file(path: &Path) -> Result<Vec<AnnualLedgerEntry>, LedgerError> {
    let data = fs::read_to_string(path)?;
    let entries = parse_ledger_json(&data)?;
    tracing::info!(path = %path.display(), entries = entries.len(), "loaded ledger export");
    Ok(entries)
}
