use cuenta_core::ledger::{
    expand_to_concept_rows, filter_by_year, group_by_tax_group, parse_ledger_json,
    AnnualLedgerEntry, Concept, PeriodValues, PERIOD_COUNT,
};

fn periods(first: f64) -> PeriodValues {
    let mut values = PeriodValues::zeroed();
    values.0[0] = Some(first);
    values
}

fn two_group_entries() -> Vec<AnnualLedgerEntry> {
    vec![
        AnnualLedgerEntry::new(2024, "Arbitrial")
            .with_periods(periods(100.0), PeriodValues::zeroed())
            .with_supplied_totals(100.0, 0.0, 100.0),
        AnnualLedgerEntry::new(2024, "Predial")
            .with_periods(
                PeriodValues::from_amounts([50.0; PERIOD_COUNT]),
                PeriodValues::from_amounts([50.0; PERIOD_COUNT]),
            )
            .with_supplied_totals(50.0, 50.0, 0.0),
    ]
}

#[test]
fn empty_ledger_yields_empty_mapping() {
    let groups = group_by_tax_group(&filter_by_year(&expand_to_concept_rows(&[]), Some(2024)));
    assert!(groups.is_empty());
}

#[test]
fn two_groups_with_one_entry_each() {
    let entries = two_group_entries();
    let groups = group_by_tax_group(&filter_by_year(&expand_to_concept_rows(&entries), Some(2024)));
    let keys: Vec<&str> = groups.keys().collect();
    assert_eq!(keys, vec!["Arbitrial", "Predial"]);
    for group in &groups {
        assert_eq!(group.concept_rows.len(), 2);
        assert_eq!(group.concept_rows[0].concept, Concept::Cargo);
        assert_eq!(group.concept_rows[1].concept, Concept::Pagado);
    }
    let arbitrial = groups.get("Arbitrial").expect("arbitrial group");
    assert_eq!(arbitrial.period_total(0), 100.0);
    assert_eq!(arbitrial.representative_totals().net_balance, 100.0);
    let predial = groups.get("Predial").expect("predial group");
    assert_eq!(predial.period_totals(), [100.0; PERIOD_COUNT]);
    assert_eq!(predial.representative_totals().net_balance, 0.0);
}

#[test]
fn concept_rows_double_the_entries() {
    let mut entries = two_group_entries();
    entries.push(AnnualLedgerEntry::new(2023, "Limpieza"));
    let rows = expand_to_concept_rows(&entries);
    assert_eq!(rows.len(), 2 * entries.len());
    for (pair, entry) in rows.chunks(2).zip(&entries) {
        assert_eq!(pair[0].concept, Concept::Cargo);
        assert_eq!(pair[1].concept, Concept::Pagado);
        assert_eq!(pair[0].tax_group, entry.tax_group);
        assert_eq!(pair[1].year, entry.year);
    }
}

#[test]
fn payload_rows_flow_through_the_pipeline() {
    let payload = r#"{"data": [
        {"anio": 2024, "grupoTributo": "Predial", "cargo1": "80", "abono1": 30, "cargo2": "NaN"},
        {"anio": 2023, "grupoTributo": "Predial", "cargo1": 70},
        {"anio": 2024, "grupoTributo": "Arbitrial", "cargo3": 12.5, "abono3": null}
    ]}"#;
    let entries = parse_ledger_json(payload).expect("payload parses");
    let rows = filter_by_year(&expand_to_concept_rows(&entries), Some(2024));
    assert_eq!(rows.len(), 4);
    let groups = group_by_tax_group(&rows);
    let predial = groups.get("Predial").expect("predial group");
    assert_eq!(predial.period_total(0), 110.0);
    assert_eq!(predial.period_total(1), 0.0);
    assert_eq!(predial.representative_totals().net_balance, 50.0);
    assert_eq!(groups.get("Arbitrial").map(|g| g.period_total(2)), Some(12.5));
    assert!(entries[0].period_cargo.raw(1).is_some_and(f64::is_nan));
}
