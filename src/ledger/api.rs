//! Mapping from the backend's current-account payload to [`AnnualLedgerEntry`].

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{
    amount::lenient_amount,
    entry::{AnnualLedgerEntry, PeriodValues},
};
use crate::errors::LedgerError;

const YEAR_KEYS: [&str; 3] = ["anio", "año", "year"];
const TAX_GROUP_KEYS: [&str; 3] = ["grupoTributo", "grupo", "taxGroup"];
const TOTAL_CHARGES_KEYS: [&str; 2] = ["totalCargos", "totalCharges"];
const TOTAL_PAID_KEYS: [&str; 2] = ["totalPagado", "totalPaid"];
const NET_BALANCE_KEYS: [&str; 2] = ["saldoNeto", "netBalance"];

/// A single row as returned by the ledger endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ApiLedgerRow(Map<String, Value>);

impl ApiLedgerRow {
    fn first(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().find_map(|key| self.0.get(*key))
    }

    fn amount(&self, keys: &[&str]) -> Option<f64> {
        self.first(keys).and_then(lenient_amount)
    }

    fn periods(&self, prefix: &str) -> PeriodValues {
        PeriodValues(std::array::from_fn(|index| {
            self.0
                .get(&format!("{prefix}{}", index + 1))
                .and_then(lenient_amount)
        }))
    }

    pub fn into_entry(self) -> Result<AnnualLedgerEntry, LedgerError> {
        let year = self
            .amount(&YEAR_KEYS)
            .filter(|year| year.fract() == 0.0 && (0.0..=9999.0).contains(year))
            .ok_or_else(|| LedgerError::InvalidRecord("ledger row without a valid year".into()))?
            as i32;
        let tax_group = match self.first(&TAX_GROUP_KEYS) {
            Some(Value::String(label)) => label.clone(),
            _ => String::new(),
        };
        Ok(AnnualLedgerEntry {
            year,
            tax_group,
            period_cargo: self.periods("cargo"),
            period_abono: self.periods("abono"),
            total_charges: self.amount(&TOTAL_CHARGES_KEYS),
            total_paid: self.amount(&TOTAL_PAID_KEYS),
            net_balance: self.amount(&NET_BALANCE_KEYS),
        })
    }
}

/// Parses a payload that is either a bare array of rows or `{ "data": [...] }`.
/// Rows that cannot be mapped are skipped so the remaining years stay visible.
pub fn parse_ledger_json(payload: &str) -> Result<Vec<AnnualLedgerEntry>, LedgerError> {
    let value: Value = serde_json::from_str(payload)?;
    let rows = match value {
        Value::Array(rows) => rows,
        Value::Object(mut envelope) => match envelope.remove("data") {
            Some(Value::Array(rows)) => rows,
            _ => {
                return Err(LedgerError::InvalidRecord(
                    "expected an array of ledger rows".into(),
                ))
            }
        },
        _ => {
            return Err(LedgerError::InvalidRecord(
                "expected an array of ledger rows".into(),
            ))
        }
    };

    let mut entries = Vec::with_capacity(rows.len());
    for (position, row) in rows.into_iter().enumerate() {
        let entry = serde_json::from_value::<ApiLedgerRow>(row)
            .map_err(|_| LedgerError::InvalidRecord("ledger row is not an object".into()))
            .and_then(ApiLedgerRow::into_entry);
        match entry {
            Ok(entry) => entries.push(entry),
            Err(err) => tracing::warn!(position, error = %err, "skipping ledger row"),
        }
    }
    tracing::debug!(rows = entries.len(), "parsed ledger payload");
    Ok(entries)
}
