use std::collections::BTreeMap;

use serde::Serialize;

use super::entry::AnnualLedgerEntry;

/// One line of the annual account statement, summed across tax groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnnualSummary {
    pub year: i32,
    pub total_charges: f64,
    pub total_paid: f64,
    pub net_balance: f64,
    pub tax_groups: usize,
}

/// Per-year totals, most recent year first.
pub fn annual_summaries(entries: &[AnnualLedgerEntry]) -> Vec<AnnualSummary> {
    let mut by_year: BTreeMap<i32, AnnualSummary> = BTreeMap::new();
    for entry in entries {
        let summary = by_year.entry(entry.year).or_insert(AnnualSummary {
            year: entry.year,
            total_charges: 0.0,
            total_paid: 0.0,
            net_balance: 0.0,
            tax_groups: 0,
        });
        let totals = entry.totals();
        summary.total_charges += totals.total_charges;
        summary.total_paid += totals.total_paid;
        summary.net_balance += totals.net_balance;
        summary.tax_groups += 1;
    }
    by_year.into_values().rev().collect()
}

/// Distinct years present in the ledger, most recent first.
pub fn available_years(entries: &[AnnualLedgerEntry]) -> Vec<i32> {
    let mut years: Vec<i32> = entries.iter().map(|entry| entry.year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}
