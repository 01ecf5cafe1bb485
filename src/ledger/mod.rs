//! Annual current-account ledger: upstream mapping, concept rows, tax-group
//! aggregation and the screen-level view state.

pub mod aggregate;
pub mod amount;
pub mod api;
pub mod concept;
pub mod entry;
pub mod expansion;
pub mod summary;
pub mod view;

pub use aggregate::{
    expand_to_concept_rows, filter_by_year, group_by_tax_group, TaxGroupAggregate, TaxGroups,
};
pub use amount::{coerce_amount, lenient_amount, PERIOD_COUNT};
pub use api::{parse_ledger_json, ApiLedgerRow};
pub use concept::{Concept, ConceptRow};
pub use entry::{
    AnnualLedgerEntry, LedgerTotals, PeriodValues, TotalField, TotalMismatch, TotalsCheck,
};
pub use expansion::ExpansionSet;
pub use summary::{annual_summaries, available_years, AnnualSummary};
pub use view::{DetailState, LedgerView};
