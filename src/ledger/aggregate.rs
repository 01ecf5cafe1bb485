//! Grouping pipeline that turns flat ledger entries into the per-year,
//! per-tax-group detail structure.

use std::collections::HashMap;

use super::{
    amount::PERIOD_COUNT,
    concept::{Concept, ConceptRow},
    entry::{AnnualLedgerEntry, LedgerTotals},
};

/// Emits a Cargo row followed by a Pagado row for every entry, in source order.
pub fn expand_to_concept_rows(entries: &[AnnualLedgerEntry]) -> Vec<ConceptRow> {
    let rows: Vec<ConceptRow> = entries
        .iter()
        .flat_map(|entry| {
            [
                ConceptRow::from_entry(entry, Concept::Cargo),
                ConceptRow::from_entry(entry, Concept::Pagado),
            ]
        })
        .collect();
    tracing::debug!(entries = entries.len(), rows = rows.len(), "expanded concept rows");
    rows
}

/// Keeps rows for the selected year. Without a selection nothing is shown.
pub fn filter_by_year(rows: &[ConceptRow], year: Option<i32>) -> Vec<ConceptRow> {
    let Some(year) = year else {
        return Vec::new();
    };
    rows.iter().filter(|row| row.year == year).cloned().collect()
}

/// Groups rows by exact tax-group label, keeping first-seen group order.
pub fn group_by_tax_group(rows: &[ConceptRow]) -> TaxGroups {
    let mut groups = TaxGroups::default();
    for row in rows {
        groups.push(row.clone());
    }
    tracing::debug!(rows = rows.len(), groups = groups.len(), "grouped concept rows");
    groups
}

/// Concept rows sharing one tax group within the selected year.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxGroupAggregate {
    pub tax_group: String,
    pub concept_rows: Vec<ConceptRow>,
}

impl TaxGroupAggregate {
    fn new(tax_group: String) -> Self {
        Self {
            tax_group,
            concept_rows: Vec::new(),
        }
    }

    /// Sum of every row's value for a zero-based period index.
    pub fn period_total(&self, index: usize) -> f64 {
        self.concept_rows
            .iter()
            .map(|row| row.period_value.value(index))
            .sum()
    }

    pub fn period_totals(&self) -> [f64; PERIOD_COUNT] {
        std::array::from_fn(|index| self.period_total(index))
    }

    /// Totals of the first row; entries of one group and year share them.
    pub fn representative_totals(&self) -> LedgerTotals {
        self.concept_rows
            .first()
            .map(|row| row.totals)
            .unwrap_or_default()
    }
}

/// Insertion-ordered mapping from tax group label to its aggregate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaxGroups {
    groups: Vec<TaxGroupAggregate>,
    index: HashMap<String, usize>,
}

impl TaxGroups {
    fn push(&mut self, row: ConceptRow) {
        let position = match self.index.get(&row.tax_group).copied() {
            Some(position) => position,
            None => {
                let position = self.groups.len();
                self.index.insert(row.tax_group.clone(), position);
                self.groups.push(TaxGroupAggregate::new(row.tax_group.clone()));
                position
            }
        };
        self.groups[position].concept_rows.push(row);
    }

    pub fn get(&self, tax_group: &str) -> Option<&TaxGroupAggregate> {
        self.index
            .get(tax_group)
            .and_then(|position| self.groups.get(*position))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.tax_group.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaxGroupAggregate> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<'a> IntoIterator for &'a TaxGroups {
    type Item = &'a TaxGroupAggregate;
    type IntoIter = std::slice::Iter<'a, TaxGroupAggregate>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::entry::PeriodValues;

    fn entry(year: i32, group: &str, cargo_first: f64, abono_first: f64) -> AnnualLedgerEntry {
        let mut cargo = PeriodValues::zeroed();
        cargo.0[0] = Some(cargo_first);
        let mut abono = PeriodValues::zeroed();
        abono.0[0] = Some(abono_first);
        AnnualLedgerEntry::new(year, group).with_periods(cargo, abono)
    }

    #[test]
    fn expansion_alternates_cargo_and_pagado_in_source_order() {
        let entries = vec![entry(2024, "Predial", 10.0, 5.0), entry(2023, "Arbitrial", 3.0, 0.0)];
        let rows = expand_to_concept_rows(&entries);
        assert_eq!(rows.len(), 4);
        let shape: Vec<(&str, Concept)> = rows
            .iter()
            .map(|row| (row.tax_group.as_str(), row.concept))
            .collect();
        assert_eq!(
            shape,
            vec![
                ("Predial", Concept::Cargo),
                ("Predial", Concept::Pagado),
                ("Arbitrial", Concept::Cargo),
                ("Arbitrial", Concept::Pagado),
            ]
        );
        assert_eq!(rows[1].period_value.value(0), 5.0);
        assert_eq!(rows[1].totals.total_charges, 10.0);
    }

    #[test]
    fn empty_input_expands_to_nothing() {
        assert!(expand_to_concept_rows(&[]).is_empty());
    }

    #[test]
    fn no_year_selected_shows_no_rows() {
        let rows = expand_to_concept_rows(&[entry(2024, "Predial", 1.0, 0.0)]);
        assert!(filter_by_year(&rows, None).is_empty());
    }

    #[test]
    fn year_filter_is_idempotent() {
        let rows = expand_to_concept_rows(&[
            entry(2024, "Predial", 1.0, 0.0),
            entry(2023, "Predial", 2.0, 0.0),
            entry(2024, "Arbitrial", 3.0, 0.0),
        ]);
        let once = filter_by_year(&rows, Some(2024));
        let twice = filter_by_year(&once, Some(2024));
        assert_eq!(once.len(), 4);
        assert_eq!(once, twice);
    }

    #[test]
    fn grouping_keeps_first_seen_order() {
        let rows = expand_to_concept_rows(&[
            entry(2024, "Predial", 1.0, 0.0),
            entry(2024, "Arbitrial", 2.0, 0.0),
            entry(2024, "Predial", 3.0, 0.0),
            entry(2024, "Limpieza", 4.0, 0.0),
            entry(2024, "Arbitrial", 5.0, 0.0),
        ]);
        let groups = group_by_tax_group(&rows);
        let keys: Vec<&str> = groups.keys().collect();
        assert_eq!(keys, vec!["Predial", "Arbitrial", "Limpieza"]);
        assert_eq!(groups.get("Predial").map(|g| g.concept_rows.len()), Some(4));
    }

    #[test]
    fn grouping_is_case_sensitive_and_untrimmed() {
        let rows = expand_to_concept_rows(&[
            entry(2024, "Predial", 1.0, 0.0),
            entry(2024, "predial", 1.0, 0.0),
            entry(2024, "Predial ", 1.0, 0.0),
            entry(2024, "", 1.0, 0.0),
        ]);
        let groups = group_by_tax_group(&rows);
        assert_eq!(groups.len(), 4);
        assert!(groups.get("").is_some());
    }

    #[test]
    fn period_totals_sum_rows_and_ignore_invalid_values() {
        let mut broken = entry(2024, "Predial", 10.0, 4.0);
        broken.period_cargo.0[1] = None;
        broken.period_abono.0[1] = Some(f64::NAN);
        broken.period_cargo.0[2] = Some(7.5);
        let rows = expand_to_concept_rows(&[broken, entry(2024, "Predial", 1.0, 1.0)]);
        let groups = group_by_tax_group(&rows);
        let predial = groups.get("Predial").expect("group present");
        assert_eq!(predial.period_total(0), 16.0);
        assert_eq!(predial.period_total(1), 0.0);
        assert_eq!(predial.period_total(2), 7.5);
        assert_eq!(predial.period_totals()[0], 16.0);
    }

    #[test]
    fn representative_totals_come_from_first_row() {
        let first = entry(2024, "Predial", 10.0, 0.0).with_supplied_totals(10.0, 0.0, 10.0);
        let second = entry(2024, "Predial", 99.0, 0.0).with_supplied_totals(99.0, 0.0, 99.0);
        let groups = group_by_tax_group(&expand_to_concept_rows(&[first, second]));
        let totals = groups.get("Predial").expect("group").representative_totals();
        assert_eq!(totals.total_charges, 10.0);
    }
}
