use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cuenta_core::ledger::{
    expand_to_concept_rows, filter_by_year, group_by_tax_group, AnnualLedgerEntry, PeriodValues,
    PERIOD_COUNT,
};

const TAX_GROUPS: [&str; 5] = ["Predial", "Arbitrial", "Limpieza", "Serenazgo", "Parques"];

fn build_entries(count: usize) -> Vec<AnnualLedgerEntry> {
    (0..count)
        .map(|idx| {
            let amount = 10.0 + (idx % 90) as f64;
            AnnualLedgerEntry::new(2000 + (idx % 25) as i32, TAX_GROUPS[idx % TAX_GROUPS.len()])
                .with_periods(
                    PeriodValues::from_amounts([amount; PERIOD_COUNT]),
                    PeriodValues::from_amounts([amount / 2.0; PERIOD_COUNT]),
                )
        })
        .collect()
}

fn bench_pipeline(c: &mut Criterion) {
    let entries = build_entries(10_000);

    c.bench_function("ledger_group_10k", |b| {
        b.iter(|| {
            let rows = expand_to_concept_rows(black_box(&entries));
            let groups = group_by_tax_group(&filter_by_year(&rows, Some(2024)));
            groups
                .iter()
                .map(|group| group.period_totals().iter().sum::<f64>())
                .sum::<f64>()
        })
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
