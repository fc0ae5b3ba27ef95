use storychart::api::{CategoricalTimeline, InstanceStatus, TimelineConfig};
use storychart::core::{Row, Viewport};
use storychart::render::NullRenderer;
use storychart::scene::NodeKind;

fn genre_row(year: f64, genre: &str, count: f64) -> Row {
    Row::new()
        .with("year", year)
        .with("genre", genre)
        .with("count", count)
}

fn rows_for(keys: &[&str]) -> Vec<Row> {
    keys.iter()
        .flat_map(|key| {
            vec![
                genre_row(2019.0, key, 10.0),
                genre_row(2020.0, key, 20.0),
            ]
        })
        .collect()
}

fn build_timeline() -> CategoricalTimeline<NullRenderer> {
    let config = TimelineConfig::new(Viewport::new(1000, 420));
    CategoricalTimeline::new(NullRenderer::default(), config).expect("timeline")
}

#[test]
fn all_keys_start_active() {
    let mut timeline = build_timeline();
    timeline.set_data(&rows_for(&["A", "B", "C"])).expect("data");
    assert_eq!(
        timeline.active_keys(),
        vec!["A".to_owned(), "B".to_owned(), "C".to_owned()]
    );
}

#[test]
fn toggling_hides_the_series_line_but_keeps_its_legend_row() {
    let mut timeline = build_timeline();
    timeline.set_data(&rows_for(&["A", "B"])).expect("data");

    timeline.toggle_key("B").expect("toggle");
    assert_eq!(timeline.active_keys(), vec!["A".to_owned()]);
    assert!(timeline.scene().get("B").is_none());
    assert!(timeline.scene().get("legend:B").is_some());
}

#[test]
fn the_last_active_key_cannot_be_hidden() {
    let mut timeline = build_timeline();
    timeline.set_data(&rows_for(&["A", "B"])).expect("data");

    timeline.toggle_key("A").expect("toggle");
    timeline.toggle_key("B").expect("refused toggle");
    assert_eq!(timeline.active_keys(), vec!["B".to_owned()]);
}

#[test]
fn unknown_keys_are_ignored() {
    let mut timeline = build_timeline();
    timeline.set_data(&rows_for(&["A"])).expect("data");
    timeline.toggle_key("missing").expect("no-op");
    assert_eq!(timeline.active_keys(), vec!["A".to_owned()]);
}

#[test]
fn active_keys_carry_over_by_intersection_on_reload() {
    let mut timeline = build_timeline();
    timeline.set_data(&rows_for(&["A", "B", "C"])).expect("data");
    timeline.toggle_key("B").expect("toggle");

    timeline.set_data(&rows_for(&["B", "C", "D"])).expect("reload");
    assert_eq!(timeline.active_keys(), vec!["C".to_owned()]);
}

#[test]
fn empty_intersection_reactivates_every_new_key() {
    let mut timeline = build_timeline();
    timeline.set_data(&rows_for(&["A", "B"])).expect("data");
    timeline.toggle_key("B").expect("toggle");

    timeline.set_data(&rows_for(&["X", "Y"])).expect("reload");
    assert_eq!(timeline.active_keys(), vec!["X".to_owned(), "Y".to_owned()]);
}

#[test]
fn overlay_toggle_removes_and_restores_markers() {
    let mut timeline = build_timeline();
    timeline.set_data(&rows_for(&["A"])).expect("data");
    timeline
        .set_events(&[(2019.0, "Launch".to_owned(), None)])
        .expect("events");

    assert!(timeline.scene().get("2019-Launch").is_some());

    timeline.toggle_overlay().expect("hide");
    assert!(!timeline.overlay_visible());
    assert!(timeline.scene().get("2019-Launch").is_none());

    timeline.toggle_overlay().expect("show");
    assert!(timeline.overlay_visible());
    assert!(timeline.scene().get("2019-Launch").is_some());
}

#[test]
fn hover_is_suppressed_while_the_overlay_is_hidden() {
    let mut timeline = build_timeline();
    timeline.set_data(&rows_for(&["A"])).expect("data");
    timeline
        .set_events(&[(2019.0, "Launch".to_owned(), None)])
        .expect("events");
    timeline.toggle_overlay().expect("hide");

    let placement = timeline
        .hover_event(Some("2019-Launch"), (100.0, 50.0))
        .expect("hover");
    assert!(placement.is_none());
}

#[test]
fn coincident_events_stack_into_lanes() {
    let mut timeline = build_timeline();
    timeline.set_data(&rows_for(&["A"])).expect("data");
    timeline
        .set_events(&[
            (2019.0, "First".to_owned(), None),
            (2019.0, "Second".to_owned(), None),
        ])
        .expect("events");

    let first = timeline.scene().get("2019-First").expect("first");
    let second = timeline.scene().get("2019-Second").expect("second");

    let storychart::scene::Geometry::Circle { cy: first_cy, .. } = first.geometry() else {
        panic!("expected circle");
    };
    let storychart::scene::Geometry::Circle { cy: second_cy, .. } = second.geometry() else {
        panic!("expected circle");
    };
    assert_eq!(first_cy - second_cy, 20.0);
}

#[test]
fn tooltip_placement_stays_inside_the_container() {
    let mut timeline = build_timeline();
    timeline.set_data(&rows_for(&["A"])).expect("data");
    timeline
        .set_events(&[(2020.0, "EdgeEvent".to_owned(), None)])
        .expect("events");

    let placement = timeline
        .hover_event(Some("2020-EdgeEvent"), (300.0, 80.0))
        .expect("hover")
        .expect("placement");
    assert!(placement.x >= 0.0 && placement.x + 300.0 <= 1000.0);
    assert!(placement.y >= 0.0 && placement.y + 80.0 <= 420.0);
}

#[test]
fn degenerate_year_domains_synthesize_neighbors() {
    let mut timeline = build_timeline();
    timeline
        .set_data(&[genre_row(2020.0, "A", 5.0)])
        .expect("data");
    assert_eq!(timeline.axis_years(), vec![2019.0, 2020.0, 2021.0]);
}

#[test]
fn events_only_instances_are_still_renderable() {
    let mut timeline = build_timeline();
    timeline
        .set_events(&[(2019.0, "Launch".to_owned(), None)])
        .expect("events");
    timeline.set_data(&[]).expect("no series");

    assert_eq!(*timeline.status(), InstanceStatus::Ready);
    assert_eq!(timeline.axis_years(), vec![2018.0, 2019.0, 2020.0]);
    timeline.render().expect("render");
}

#[test]
fn failed_instances_refuse_interaction() {
    let mut timeline = build_timeline();
    timeline.set_data(&rows_for(&["A", "B"])).expect("data");
    timeline.mark_load_failed("network down");

    timeline.toggle_key("A").expect("ignored");
    timeline.toggle_overlay().expect("ignored");
    assert_eq!(
        timeline.active_keys(),
        vec!["A".to_owned(), "B".to_owned()]
    );
    timeline.render().expect("fallback render");
}
