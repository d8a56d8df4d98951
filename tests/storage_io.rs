use grapher_rs::storage::{self, TableRow};
use grapher_rs::{ChartType, Series, TimePoint};
use std::fs;

fn filled() -> Vec<Series> {
    let input = vec![
        Series::new("1-0", "Norway", vec![TimePoint::new(2000, 2000.0, 4.5), TimePoint::new(2001, 2001.0, 4.6)]),
        Series::new("2-0", "Sweden", vec![TimePoint::new(2001, 2001.0, 9.1)]),
    ];
    grapher_rs::gapfill::fill(input, ChartType::MultiBarVertical)
}

#[test]
fn fake_points_never_reach_the_table() {
    let series = filled();
    assert!(series[1].values.iter().any(|p| p.fake));

    let rows = storage::table_rows(&series);
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[2],
        TableRow {
            series_id: "2-0".into(),
            entity_id: Some(2),
            key: "Sweden".into(),
            time: "2001".into(),
            x: 2001.0,
            value: "9.1".into(),
        }
    );
}

#[test]
fn save_csv_and_json() {
    let rows = storage::table_rows(&filled());
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("table.csv");
    storage::save_csv(&rows, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("series_id,entity_id,key,time,x,value"));
    assert_eq!(csv_txt.lines().count(), 1 + rows.len());

    let json_path = dir.path().join("table.json");
    storage::save_json(&rows, &json_path).unwrap();
    let back: Vec<TableRow> = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(back, rows);
}

#[test]
fn csv_cells_are_prefixed_to_avoid_formulas() {
    let series = vec![Series::new("5", "=HYPERLINK(\"http://evil\")", vec![TimePoint::new(2020, 2020.0, -3.0)])];
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("risky.csv");
    storage::save_csv(&storage::table_rows(&series), &path).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let row = rdr.records().next().expect("one data row expected").unwrap();
    assert_eq!(row.get(2), Some("'=HYPERLINK(\"http://evil\")"));
    assert_eq!(row.get(5), Some("-3"));
}
