use super::{
    aggregate::{expand_to_concept_rows, filter_by_year, group_by_tax_group, TaxGroups},
    concept::ConceptRow,
    entry::AnnualLedgerEntry,
    expansion::ExpansionSet,
    summary::{annual_summaries, available_years, AnnualSummary},
};

/// What the detail section of the account statement should show.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    NoYearSelected,
    NoDataForYear(i32),
    Groups(TaxGroups),
}

/// Screen-owned state for the account statement: backing entries, the
/// selected year and the expanded tax groups.
///
/// Derived structures are rebuilt on every read; only the selection and the
/// expansion set are held between calls.
#[derive(Debug, Clone, Default)]
pub struct LedgerView {
    entries: Vec<AnnualLedgerEntry>,
    concept_rows: Vec<ConceptRow>,
    selected_year: Option<i32>,
    expansion: ExpansionSet,
}

impl LedgerView {
    pub fn new(entries: Vec<AnnualLedgerEntry>) -> Self {
        let mut view = Self::default();
        view.replace_entries(entries);
        view
    }

    /// Swaps the backing data. Selection and expansion are kept.
    pub fn replace_entries(&mut self, entries: Vec<AnnualLedgerEntry>) {
        for entry in &entries {
            let check = entry.reconcile();
            for mismatch in &check.mismatches {
                tracing::warn!(
                    year = entry.year,
                    tax_group = %entry.tax_group,
                    field = ?mismatch.field,
                    supplied = mismatch.supplied,
                    computed = mismatch.computed,
                    "supplied total differs from period sum"
                );
            }
        }
        self.concept_rows = expand_to_concept_rows(&entries);
        self.entries = entries;
    }

    pub fn entries(&self) -> &[AnnualLedgerEntry] {
        &self.entries
    }

    pub fn concept_rows(&self) -> &[ConceptRow] {
        &self.concept_rows
    }

    pub fn selected_year(&self) -> Option<i32> {
        self.selected_year
    }

    /// Changes the selected year. The expansion set survives year changes.
    pub fn select_year(&mut self, year: Option<i32>) {
        self.selected_year = year;
    }

    pub fn summaries(&self) -> Vec<AnnualSummary> {
        annual_summaries(&self.entries)
    }

    pub fn available_years(&self) -> Vec<i32> {
        available_years(&self.entries)
    }

    pub fn detail(&self) -> DetailState {
        let Some(year) = self.selected_year else {
            return DetailState::NoYearSelected;
        };
        let groups = group_by_tax_group(&filter_by_year(&self.concept_rows, Some(year)));
        if groups.is_empty() {
            DetailState::NoDataForYear(year)
        } else {
            DetailState::Groups(groups)
        }
    }

    pub fn toggle(&mut self, tax_group: &str) {
        self.expansion = self.expansion.toggle(tax_group);
    }

    pub fn is_expanded(&self, tax_group: &str) -> bool {
        self.expansion.is_expanded(tax_group)
    }

    pub fn expansion(&self) -> &ExpansionSet {
        &self.expansion
    }

    /// Returns to the freshly mounted state: no expanded groups.
    pub fn reset(&mut self) {
        self.expansion = ExpansionSet::new();
    }
}
