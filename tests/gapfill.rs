use grapher_rs::gapfill::{all_times, fill, fill_multi_bar, fill_stacked_area};
use grapher_rs::{ChartType, Series, TimePoint};

fn s(id: &str, points: &[(f64, f64)]) -> Series {
    Series::new(
        id,
        format!("key {id}"),
        points.iter().map(|&(x, y)| TimePoint::new(x, x, y)).collect(),
    )
}

#[test]
fn multi_bar_missing_time_gets_fake_zero() {
    let input = vec![s("1", &[(2000.0, 5.0), (2001.0, 6.0)]), s("2", &[(2000.0, 3.0)])];
    let out = fill(input, ChartType::MultiBarVertical);

    let second = &out[1];
    assert_eq!(second.values.len(), 2);
    assert_eq!(second.values[0].x, 2000.0);
    assert_eq!(second.values[0].y_value(), Some(3.0));
    assert!(!second.values[0].fake);
    assert_eq!(second.values[1].x, 2001.0);
    assert_eq!(second.values[1].y_value(), Some(0.0));
    assert!(second.values[1].fake);
    assert_eq!(second.values[1].key.as_deref(), Some("key 2"));

    // The complete series is untouched.
    assert!(out[0].values.iter().all(|p| !p.fake));
}

#[test]
fn every_series_has_one_point_per_time() {
    let input = vec![
        s("a", &[(2003.0, 1.0), (2001.0, 2.0)]),
        s("b", &[(2002.0, 1.0), (2002.0, 9.0)]),
        s("c", &[]),
        s("d", &[(1999.0, 4.0), (2003.0, 4.0)]),
    ];
    let times = all_times(&input);
    assert_eq!(times, vec![1999.0, 2001.0, 2002.0, 2003.0]);

    let out = fill_multi_bar(input);
    for series in &out {
        assert_eq!(series.values.len(), times.len(), "series {}", series.id);
        for t in &times {
            assert_eq!(series.values.iter().filter(|p| p.x == *t).count(), 1);
        }
    }
    // First of a duplicated time wins.
    let b2002 = out[1].values.iter().find(|p| p.x == 2002.0).unwrap();
    assert_eq!(b2002.y_value(), Some(1.0));
}

#[test]
fn stacked_area_backfills_only_empty_series() {
    let input = vec![
        s("base", &[(2000.0, 1.0), (2001.0, 2.0), (2002.0, 3.0)]),
        s("empty", &[]),
        s("partial", &[(2001.0, 7.0)]),
    ];
    let out = fill_stacked_area(input);

    let empty = &out[1];
    assert_eq!(empty.values.len(), 3);
    assert!(empty.values.iter().all(|p| p.fake && p.y_value() == Some(0.0)));
    assert_eq!(
        empty.values.iter().map(|p| p.x).collect::<Vec<_>>(),
        vec![2000.0, 2001.0, 2002.0]
    );
    assert_eq!(out[2].values.len(), 1);
}

#[test]
fn stacked_area_with_empty_base_is_unchanged() {
    let input = vec![s("base", &[]), s("other", &[])];
    let out = fill(input.clone(), ChartType::StackedArea);
    assert_eq!(out, input);
}

#[test]
fn line_charts_are_not_filled() {
    let input = vec![s("1", &[(2000.0, 1.0)]), s("2", &[(2005.0, 1.0)])];
    assert_eq!(fill(input.clone(), ChartType::Line), input);
}
