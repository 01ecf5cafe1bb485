use std::fmt;

use serde::{Deserialize, Serialize};

use super::entry::{AnnualLedgerEntry, LedgerTotals, PeriodValues};

/// Which side of the ledger a derived row shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Concept {
    Cargo,
    Pagado,
}

impl Concept {
    pub fn label(self) -> &'static str {
        match self {
            Concept::Cargo => "Cargo",
            Concept::Pagado => "Pagado",
        }
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single display line derived from an [`AnnualLedgerEntry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptRow {
    pub year: i32,
    pub tax_group: String,
    pub concept: Concept,
    pub period_value: PeriodValues,
    /// Copied from the parent entry so every line displays the same totals.
    pub totals: LedgerTotals,
}

impl ConceptRow {
    pub fn from_entry(entry: &AnnualLedgerEntry, concept: Concept) -> Self {
        let period_value = match concept {
            Concept::Cargo => entry.period_cargo,
            Concept::Pagado => entry.period_abono,
        };
        Self {
            year: entry.year,
            tax_group: entry.tax_group.clone(),
            concept,
            period_value,
            totals: entry.totals(),
        }
    }
}
