use crate::ledger::{
    amount::PERIOD_COUNT, AnnualSummary, DetailState, ExpansionSet, LedgerTotals, LedgerView,
    TaxGroups,
};

use super::table::{Table, TableColumn};

const PERIOD_LABELS: [&str; PERIOD_COUNT] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

pub fn summary_table(summaries: &[AnnualSummary], plain: bool) -> Table {
    let mut table = Table::new(vec![
        TableColumn::left("Year"),
        TableColumn::right("Groups"),
        TableColumn::right("Charges"),
        TableColumn::right("Paid"),
        TableColumn::right("Balance"),
    ]);
    table.plain = plain;
    for summary in summaries {
        table.push_row(vec![
            summary.year.to_string(),
            summary.tax_groups.to_string(),
            format_amount(summary.total_charges),
            format_amount(summary.total_paid),
            format_amount(summary.net_balance),
        ]);
    }
    table
}

/// One header row per tax group; concept rows only under expanded groups.
pub fn detail_table(groups: &TaxGroups, expansion: &ExpansionSet, plain: bool) -> Table {
    let mut columns = vec![TableColumn::left("Tax group / concept").with_max_width(32)];
    columns.extend(PERIOD_LABELS.iter().map(|label| TableColumn::right(*label)));
    columns.extend([
        TableColumn::right("Charges"),
        TableColumn::right("Paid"),
        TableColumn::right("Balance"),
    ]);
    let mut table = Table::new(columns);
    table.plain = plain;

    for group in groups {
        let expanded = expansion.is_expanded(&group.tax_group);
        let marker = match (expanded, plain) {
            (true, true) => "-",
            (false, true) => "+",
            (true, false) => "▾",
            (false, false) => "▸",
        };
        table.push_row(line(
            format!("{marker} {}", group.tax_group),
            group.period_totals(),
            group.representative_totals(),
        ));
        if expanded {
            for row in &group.concept_rows {
                table.push_row(line(
                    format!("    {}", row.concept),
                    row.period_value.values(),
                    row.totals,
                ));
            }
        }
    }
    table
}

fn line(label: String, periods: [f64; PERIOD_COUNT], totals: LedgerTotals) -> Vec<String> {
    let mut cells = Vec::with_capacity(PERIOD_COUNT + 4);
    cells.push(label);
    cells.extend(periods.iter().map(|value| format_amount(*value)));
    cells.push(format_amount(totals.total_charges));
    cells.push(format_amount(totals.total_paid));
    cells.push(format_amount(totals.net_balance));
    cells
}

/// Renders the detail section, including the two empty states.
pub fn render_detail(view: &LedgerView, plain: bool) -> String {
    match view.detail() {
        DetailState::NoYearSelected => "Select a year to see the ledger detail.".to_string(),
        DetailState::NoDataForYear(year) => format!("No ledger data for {year}."),
        DetailState::Groups(groups) => detail_table(&groups, view.expansion(), plain).render(),
    }
}
