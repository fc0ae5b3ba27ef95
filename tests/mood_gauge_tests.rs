use std::f64::consts::PI;

use approx::assert_relative_eq;
use storychart::api::{InstanceStatus, RadialMoodConfig, RadialMoodIndicator};
use storychart::core::{Row, Viewport};
use storychart::render::NullRenderer;

fn mood_row(year: f64, mood: &str, count: f64) -> Row {
    Row::new()
        .with("year", year)
        .with("mood", mood)
        .with("count", count)
}

fn sample_rows() -> Vec<Row> {
    vec![
        mood_row(2020.0, "comfort", 30.0),
        mood_row(2020.0, "challenge", 10.0),
        mood_row(2021.0, "comfort", 20.0),
        mood_row(2021.0, "challenge", 60.0),
        mood_row(2022.0, "comfort", 25.0),
        mood_row(2022.0, "challenge", 25.0),
    ]
}

fn build_gauge() -> RadialMoodIndicator<NullRenderer> {
    // Timeline margin leaves a 400 px scrub extent for three years.
    let config = RadialMoodConfig::new(Viewport::new(482, 420));
    RadialMoodIndicator::new(NullRenderer::default(), config).expect("gauge")
}

#[test]
fn balance_follows_challenge_minus_comfort_over_total() {
    let mut gauge = build_gauge();
    gauge.set_data(&sample_rows()).expect("data");
    gauge.set_selection("2021").expect("select");

    let summary = gauge.summary().expect("summary");
    assert_relative_eq!(summary.balance, 0.5);
    assert_relative_eq!(summary.comfort_share, 0.25);
    assert_relative_eq!(summary.challenge_share, 0.75);
    assert_eq!(summary.headline(), "Comfort 25% (20) \u{2022} Challenge 75% (60)");
}

#[test]
fn dial_angle_maps_balance_onto_the_upper_half() {
    let gauge = build_gauge();
    assert_relative_eq!(gauge.balance_angle(-1.0).expect("angle"), -PI);
    assert_relative_eq!(gauge.balance_angle(0.0).expect("angle"), -PI / 2.0);
    assert_relative_eq!(gauge.balance_angle(1.0).expect("angle"), 0.0);
}

#[test]
fn out_of_range_balance_clamps_before_mapping() {
    let gauge = build_gauge();
    assert_relative_eq!(gauge.balance_angle(-3.0).expect("angle"), -PI);
    assert_relative_eq!(gauge.balance_angle(42.0).expect("angle"), 0.0);
}

#[test]
fn drag_snaps_to_the_nearest_year() {
    let mut gauge = build_gauge();
    gauge.set_data(&sample_rows()).expect("data");

    // Scrub extent is 400 px; three years sit at ~66.7, 200, ~333.3.
    gauge.drag_to(205.0).expect("drag");
    assert_eq!(gauge.current_selection(), Some("2021".to_owned()));

    gauge.drag_to(0.0).expect("drag");
    assert_eq!(gauge.current_selection(), Some("2020".to_owned()));

    gauge.drag_to(10_000.0).expect("drag");
    assert_eq!(gauge.current_selection(), Some("2022".to_owned()));
}

#[test]
fn selection_mirrors_an_external_year_control() {
    let mut gauge = build_gauge();
    gauge.set_data(&sample_rows()).expect("data");

    gauge.set_selection("2022").expect("select");
    assert_eq!(gauge.current_selection(), Some("2022".to_owned()));

    gauge.set_selection("1980").expect("no-op");
    assert_eq!(gauge.current_selection(), Some("2022".to_owned()));
}

#[test]
fn selection_clamps_into_range_on_reload() {
    let mut gauge = build_gauge();
    gauge.set_data(&sample_rows()).expect("data");
    gauge.set_selection("2022").expect("select");

    let shorter: Vec<Row> = sample_rows()
        .into_iter()
        .filter(|row| row.number("year") == Some(2020.0))
        .collect();
    gauge.set_data(&shorter).expect("reload");
    assert_eq!(gauge.current_selection(), Some("2020".to_owned()));
}

#[test]
fn pointer_and_handle_track_the_selected_entry() {
    let mut gauge = build_gauge();
    gauge.set_data(&sample_rows()).expect("data");
    gauge.set_selection("2021").expect("select");

    assert!(gauge.scene().get("pointer").is_some());
    assert!(gauge.scene().get("handle").is_some());
    assert!(gauge.scene().get("point:2021").is_some());
    gauge.render().expect("render");
}

#[test]
fn empty_rows_enter_the_no_data_state() {
    let mut gauge = build_gauge();
    gauge.set_data(&[]).expect("data");
    assert_eq!(*gauge.status(), InstanceStatus::NoData);
    gauge.render().expect("placeholder render");
}
