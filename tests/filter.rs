use grapher_rs::config::SelectedEntity;
use grapher_rs::filter::{DISCRETE_SERIES_KEY, clamp_to_window, filter, filter_series};
use grapher_rs::{ChartConfig, ChartType, Series, TimePoint, TimeWindow};

fn years(id: &str, key: &str, from: i32, to: i32) -> Series {
    Series::new(
        id,
        key,
        (from..=to)
            .map(|y| TimePoint::new(y, y as f64, (y - from) as f64))
            .collect(),
    )
}

fn select(ids: &[i64]) -> Vec<SelectedEntity> {
    ids.iter()
        .map(|&id| SelectedEntity {
            id,
            name: format!("entity {id}"),
            color: None,
        })
        .collect()
}

#[test]
fn keeps_only_selected_entities() {
    let data = vec![
        years("1-0", "Brazil", 2000, 2001),
        years("2-0", "Chile", 2000, 2001),
        years("2-1", "Chile (2)", 2000, 2001),
        years("x", "Broken", 2000, 2001),
    ];
    let config = ChartConfig {
        selected_entities: select(&[2]),
        ..ChartConfig::default()
    };
    let out = filter_series(&data, &config);
    let ids: Vec<&str> = out.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["2-0", "2-1"]);
}

#[test]
fn empty_selection_or_grouping_passes_everything() {
    let data = vec![years("1", "B", 2000, 2000), years("2", "A", 2000, 2000)];
    assert_eq!(filter_series(&data, &ChartConfig::default()).len(), 2);

    let grouped = ChartConfig {
        selected_entities: select(&[1]),
        group_by_variables: true,
        ..ChartConfig::default()
    };
    assert_eq!(filter_series(&data, &grouped).len(), 2);
}

#[test]
fn window_clamps_values_without_touching_input() {
    let data = vec![years("1", "A", 1990, 2020)];
    let config = ChartConfig {
        time_window: Some(TimeWindow::new(2010, 2000)),
        ..ChartConfig::default()
    };
    let out = filter_series(&data, &config);

    assert_eq!(out[0].values.len(), 11);
    assert_eq!(out[0].values.first().unwrap().x, 2000.0);
    assert_eq!(out[0].values.last().unwrap().x, 2010.0);
    assert_eq!(data[0].values.len(), 31);
}

#[test]
fn window_reads_leading_integer_of_string_times() {
    let s = Series::new(
        "1",
        "A",
        vec![
            TimePoint::new("1999-12-31", 1999.0, 1.0),
            TimePoint::new("2000-06-01", 2000.0, 2.0),
            TimePoint::new("n/a", 0.0, 3.0),
        ],
    );
    let out = clamp_to_window(&s, TimeWindow::new(2000, 2001));
    assert_eq!(out.values.len(), 1);
    assert_eq!(out.values[0].y_value(), Some(2.0));
}

#[test]
fn sorted_by_key_unless_legend_hidden() {
    let data = vec![years("1", "Zambia", 2000, 2000), years("2", "Austria", 2000, 2000)];
    let shown = filter_series(&data, &ChartConfig::default());
    assert_eq!(shown[0].key, "Austria");

    let hidden = ChartConfig {
        hide_legend: true,
        ..ChartConfig::default()
    };
    assert_eq!(filter_series(&data, &hidden)[0].key, "Zambia");
}

#[test]
fn discrete_bar_collapses_to_first_points() {
    let mut data = vec![years("1", "Peru", 2001, 2003), years("2", "Chad", 2005, 2006)];
    data[0].color = Some("#112233".into());
    data.push(Series::new("3", "Empty", Vec::new()));
    let config = ChartConfig {
        chart_type: ChartType::DiscreteBar,
        ..ChartConfig::default()
    };

    let out = filter(&data, &config);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].key, DISCRETE_SERIES_KEY);
    let bars = &out[0].values;
    assert_eq!(bars.len(), 2);
    // Sorted by key first: Chad, then Peru.
    assert_eq!(bars[0].key.as_deref(), Some("Chad"));
    assert_eq!(bars[0].x, 2005.0);
    assert_eq!(bars[1].key.as_deref(), Some("Peru"));
    assert_eq!(bars[1].color.as_deref(), Some("#112233"));
}
