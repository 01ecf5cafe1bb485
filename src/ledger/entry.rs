use serde::{Deserialize, Serialize};

use super::amount::{amounts_match, coerce_amount, PERIOD_COUNT};

/// Raw per-period amounts as received from upstream.
///
/// Values are kept untouched; readers go through [`PeriodValues::value`] which
/// applies the zero coercion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodValues(pub [Option<f64>; PERIOD_COUNT]);

impl PeriodValues {
    pub fn zeroed() -> Self {
        Self([Some(0.0); PERIOD_COUNT])
    }

    pub fn from_amounts(amounts: [f64; PERIOD_COUNT]) -> Self {
        Self(amounts.map(Some))
    }

    /// Coerced value for a zero-based period index. Out-of-range reads are zero.
    pub fn value(&self, index: usize) -> f64 {
        coerce_amount(self.raw(index))
    }

    pub fn raw(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied().flatten()
    }

    pub fn values(&self) -> [f64; PERIOD_COUNT] {
        std::array::from_fn(|index| self.value(index))
    }

    pub fn sum(&self) -> f64 {
        self.values().iter().sum()
    }
}

impl Default for PeriodValues {
    fn default() -> Self {
        Self([None; PERIOD_COUNT])
    }
}

/// Charges and payments for a single tax group in a single year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualLedgerEntry {
    pub year: i32,
    pub tax_group: String,
    pub period_cargo: PeriodValues,
    pub period_abono: PeriodValues,
    #[serde(default)]
    pub total_charges: Option<f64>,
    #[serde(default)]
    pub total_paid: Option<f64>,
    #[serde(default)]
    pub net_balance: Option<f64>,
}

/// Display totals attached to every row derived from an entry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LedgerTotals {
    pub total_charges: f64,
    pub total_paid: f64,
    pub net_balance: f64,
}

impl AnnualLedgerEntry {
    pub fn new(year: i32, tax_group: impl Into<String>) -> Self {
        Self {
            year,
            tax_group: tax_group.into(),
            period_cargo: PeriodValues::default(),
            period_abono: PeriodValues::default(),
            total_charges: None,
            total_paid: None,
            net_balance: None,
        }
    }

    pub fn with_periods(mut self, cargo: PeriodValues, abono: PeriodValues) -> Self {
        self.period_cargo = cargo;
        self.period_abono = abono;
        self
    }

    pub fn with_supplied_totals(mut self, charges: f64, paid: f64, net: f64) -> Self {
        self.total_charges = Some(charges);
        self.total_paid = Some(paid);
        self.net_balance = Some(net);
        self
    }

    /// Supplied charges total, or the sum of period charges when absent.
    pub fn total_charges(&self) -> f64 {
        match self.total_charges {
            Some(_) => coerce_amount(self.total_charges),
            None => self.period_cargo.sum(),
        }
    }

    /// Supplied paid total, or the sum of period payments when absent.
    pub fn total_paid(&self) -> f64 {
        match self.total_paid {
            Some(_) => coerce_amount(self.total_paid),
            None => self.period_abono.sum(),
        }
    }

    pub fn net_balance(&self) -> f64 {
        match self.net_balance {
            Some(_) => coerce_amount(self.net_balance),
            None => self.total_charges() - self.total_paid(),
        }
    }

    pub fn totals(&self) -> LedgerTotals {
        LedgerTotals {
            total_charges: self.total_charges(),
            total_paid: self.total_paid(),
            net_balance: self.net_balance(),
        }
    }

    /// Compares supplied totals with the period sums. Display values are not
    /// affected by the outcome.
    pub fn reconcile(&self) -> TotalsCheck {
        let computed_charges = self.period_cargo.sum();
        let computed_paid = self.period_abono.sum();
        let computed_net = computed_charges - computed_paid;
        let mut mismatches = Vec::new();
        let mut check = |field: TotalField, supplied: Option<f64>, computed: f64| {
            if supplied.is_some() {
                let supplied = coerce_amount(supplied);
                if !amounts_match(supplied, computed) {
                    mismatches.push(TotalMismatch {
                        field,
                        supplied,
                        computed,
                    });
                }
            }
        };
        check(TotalField::Charges, self.total_charges, computed_charges);
        check(TotalField::Paid, self.total_paid, computed_paid);
        check(TotalField::NetBalance, self.net_balance, computed_net);
        TotalsCheck { mismatches }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalField {
    Charges,
    Paid,
    NetBalance,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TotalMismatch {
    pub field: TotalField,
    pub supplied: f64,
    pub computed: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TotalsCheck {
    pub mismatches: Vec<TotalMismatch>,
}

impl TotalsCheck {
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }
}
