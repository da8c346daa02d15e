//! Property-based tests for the value and table model.

use proptest::prelude::*;

use scrub_model::{Row, RowId, Table, Value};

fn table_of(n: usize) -> Table {
    let mut table = Table::new(vec!["quantity".into()]);
    for i in 0..n {
        let mut row = Row::new();
        row.set("quantity", Value::Int(i as i64));
        table.push_row(row);
    }
    table
}

proptest! {
    #[test]
    fn null_aware_equality_is_reflexive(v in -1_000_000i64..1_000_000) {
        let value = Value::Int(v);
        prop_assert!(value.same(&value));
    }

    #[test]
    fn text_equality_matches_payload(a in "[a-z ]{0,12}", b in "[a-z ]{0,12}") {
        let left = Value::Text(a.clone());
        let right = Value::Text(b.clone());
        prop_assert_eq!(left.same(&right), a == b);
    }

    #[test]
    fn missing_never_equals_text(s in "[a-z]{1,12}") {
        prop_assert!(!Value::Missing.same(&Value::Text(s)));
    }

    #[test]
    fn row_id_assignment_is_idempotent(n in 0usize..50) {
        let mut table = table_of(n);
        table.assign_row_ids();
        let first: Vec<Option<RowId>> = table.rows.iter().map(|r| r.id).collect();
        table.assign_row_ids();
        let second: Vec<Option<RowId>> = table.rows.iter().map(|r| r.id).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn row_ids_are_unique_ordinals(n in 1usize..50) {
        let mut table = table_of(n);
        table.assign_row_ids();
        for (ordinal, row) in table.rows.iter().enumerate() {
            prop_assert_eq!(row.id, Some(RowId(ordinal as i64)));
        }
    }
}

#[test]
fn header_sentinel_is_minus_one() {
    assert_eq!(RowId::HEADER.as_i64(), -1);
}
