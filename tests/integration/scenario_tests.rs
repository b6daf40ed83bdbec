//! End-to-end detection scenarios on in-memory and loaded tables.

use std::fs;

use tabdupe::duplicates::{
    drop_duplicates, duplicates_allclose, DuplicateFinder, FinderConfig, Tolerance, ToleranceMode,
};
use tabdupe::input::{load_table, InputFormat};
use tabdupe::table::{Column, Table, Value};
use tempfile::tempdir;

const NO_COLUMNS: [&str; 0] = [];

fn scenario_a() -> Table {
    Table::from_columns(vec![
        Column::from_strs("A", &["c", "c", "e", "d", "d"]),
        Column::from_strs("B", &["a", "a", "c", "a", "a"]),
        Column::from_f64("C", &[1.0, 1.01, 2.0, 3.0, 3.01]),
    ])
    .unwrap()
}

fn scenario_b() -> Table {
    Table::from_columns(vec![
        Column::from_f64("A", &[1.0, 1.0, 2.0, 2.0, 1.0]),
        Column::from_f64("B", &[2.0, 2.1, 2.0, 2.0, 2.0]),
        Column::from_f64("C", &[3.0, 3.0, 2.0, 2.0, 3.0]),
        Column::from_f64("D", &[4.5, 4.5, 4.5, 4.6, 4.5]),
    ])
    .unwrap()
}

#[test]
fn test_scenario_a() {
    let flags =
        duplicates_allclose(&scenario_a(), &["A", "B"], &["C"], &Tolerance::absolute(0.02))
            .unwrap();
    assert_eq!(flags, [false, true, false, false, true]);
}

#[test]
fn test_scenario_b() {
    let flags = duplicates_allclose(
        &scenario_b(),
        &["A", "B"],
        &["C", "D"],
        &Tolerance::absolute(0.2),
    )
    .unwrap();
    assert_eq!(flags, [false, false, false, true, true]);
}

#[test]
fn test_scenario_c_empty_table() {
    let flags =
        duplicates_allclose(&Table::new(), &["A"], &["C"], &Tolerance::absolute(0.1)).unwrap();
    assert!(flags.is_empty());
}

#[test]
fn test_chaining_without_exact_columns() {
    let table = Table::from_columns(vec![Column::from_f64("x", &[0.1, 0.2, 0.3, 0.4])]).unwrap();
    let flags = duplicates_allclose(&table, &NO_COLUMNS, &["x"], &Tolerance::absolute(0.2)).unwrap();
    // 0.4 is 0.3 away from 0.1 but chains through its neighbours
    assert_eq!(flags, [false, true, true, true]);
}

#[test]
fn test_scenario_a_from_csv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scenario.csv");
    fs::write(&path, "A,B,C\nc,a,1\nc,a,1.01\ne,c,2\nd,a,3\nd,a,3.01\n").unwrap();

    let table = load_table(&path, None).unwrap();
    let flags =
        duplicates_allclose(&table, &["A", "B"], &["C"], &Tolerance::absolute(0.02)).unwrap();
    assert_eq!(flags, [false, true, false, false, true]);
}

#[test]
fn test_scenario_b_from_nested_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scenario.data");
    let records = r#"[
        {"key": {"A": 1, "B": 2},   "m": {"C": 3, "D": 4.5}},
        {"key": {"A": 1, "B": 2.1}, "m": {"C": 3, "D": 4.5}},
        {"key": {"A": 2, "B": 2},   "m": {"C": 2, "D": 4.5}},
        {"key": {"A": 2, "B": 2},   "m": {"C": 2, "D": 4.6}},
        {"key": {"A": 1, "B": 2},   "m": {"C": 3, "D": 4.5}}
    ]"#;
    fs::write(&path, records).unwrap();

    let table = load_table(&path, Some(InputFormat::Json)).unwrap();
    let flags = duplicates_allclose(
        &table,
        &["key.A", "key.B"],
        &["m.C", "m.D"],
        &Tolerance::absolute(0.2),
    )
    .unwrap();
    assert_eq!(flags, [false, false, false, true, true]);
}

#[test]
fn test_drop_keeps_first_of_each_chain() {
    let table = scenario_a();
    let flags =
        duplicates_allclose(&table, &["A", "B"], &["C"], &Tolerance::absolute(0.02)).unwrap();
    let kept = drop_duplicates(&table, &flags).unwrap();

    assert_eq!(kept.row_count(), 3);
    assert_eq!(
        kept.column("A").unwrap().values(),
        &[Value::from("c"), Value::from("e"), Value::from("d")]
    );
}

#[test]
fn test_affine_mode_scales_with_magnitude() {
    let table = Table::from_columns(vec![Column::from_f64(
        "price",
        &[1000.0, 1009.0, 1.0, 1.5],
    )])
    .unwrap();

    let absolute = duplicates_allclose(&table, &NO_COLUMNS, &["price"], &Tolerance::absolute(0.1))
        .unwrap();
    assert_eq!(absolute, [false, false, false, false]);

    let affine = Tolerance::absolute(0.0)
        .with_rtol(0.01)
        .with_mode(ToleranceMode::Affine);
    let flags = duplicates_allclose(&table, &NO_COLUMNS, &["price"], &affine).unwrap();
    // 1009 is within 1% of 1009 from 1000; 1.5 is 0.5 away from 1.0
    assert_eq!(flags, [false, true, false, false]);
}

#[test]
fn test_finder_summary_matches_flags() {
    let finder = DuplicateFinder::new(
        FinderConfig::default().with_tolerance(Tolerance::absolute(0.2)),
    );
    let (flags, summary) = finder.find(&scenario_b(), &["A", "B"], &["C", "D"]).unwrap();

    assert_eq!(summary.total_rows, 5);
    assert_eq!(summary.candidate_rows, 4);
    assert_eq!(summary.key_groups, 2);
    assert_eq!(summary.duplicate_rows, flags.duplicate_count());
    assert_eq!(summary.kept_rows(), 3);
}
