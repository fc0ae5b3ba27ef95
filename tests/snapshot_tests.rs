use storychart::api::{
    CategoricalTimeline, InstanceStatus, StackedCompositionChart, StackedConfig, TimelineConfig,
    TriviaConfig, TriviaTimeline, WidgetSnapshot,
};
use storychart::core::{Row, Viewport};
use storychart::render::NullRenderer;

fn genre_row(year: f64, genre: &str, count: f64) -> Row {
    Row::new()
        .with("year", year)
        .with("genre", genre)
        .with("count", count)
}

#[test]
fn stacked_snapshot_reports_selection_and_nodes() {
    let mut chart = StackedCompositionChart::new(
        NullRenderer::default(),
        StackedConfig::new(Viewport::new(720, 240)).with_reduced_motion(true),
    )
    .expect("chart");
    chart
        .set_data(&[
            genre_row(2019.0, "RPG", 40.0),
            genre_row(2019.0, "FPS", 65.0),
        ])
        .expect("data");

    let snapshot = chart.snapshot();
    assert_eq!(snapshot.widget, "stacked-composition");
    assert_eq!(snapshot.status, InstanceStatus::Ready);
    assert_eq!(snapshot.selection, Some("2019".to_owned()));
    assert!(snapshot.node_count > 0);

    let json = snapshot.to_json().expect("json");
    let parsed: WidgetSnapshot = serde_json::from_str(&json).expect("parse");
    assert_eq!(parsed, snapshot);
}

#[test]
fn timeline_snapshot_carries_active_keys() {
    let mut timeline = CategoricalTimeline::new(
        NullRenderer::default(),
        TimelineConfig::new(Viewport::new(900, 400)),
    )
    .expect("timeline");
    timeline
        .set_data(&[
            genre_row(2019.0, "A", 1.0),
            genre_row(2019.0, "B", 2.0),
        ])
        .expect("data");
    timeline.toggle_key("A").expect("toggle");

    let snapshot = timeline.snapshot();
    assert_eq!(snapshot.active_keys, vec!["B".to_owned()]);
}

#[test]
fn trivia_snapshot_counts_resolved_years() {
    let mut game = TriviaTimeline::new(
        NullRenderer::default(),
        TriviaConfig::new(Viewport::new(800, 200)),
    )
    .expect("game");
    game.set_data(&[
        genre_row(2013.0, "RPG", 50.0),
        genre_row(2014.0, "FPS", 70.0),
    ])
    .expect("data");

    game.ask("2013").expect("ask").expect("question");
    game.answer("RPG").expect("answer");

    let snapshot = game.snapshot();
    assert_eq!(snapshot.answered, 1);
    assert_eq!(snapshot.selection, Some("2013".to_owned()));
}

#[test]
fn failed_instances_snapshot_their_message() {
    let mut chart = StackedCompositionChart::new(
        NullRenderer::default(),
        StackedConfig::new(Viewport::new(720, 240)),
    )
    .expect("chart");
    chart.mark_load_failed("fetch aborted");

    let snapshot = chart.snapshot();
    assert_eq!(
        snapshot.status,
        InstanceStatus::Failed {
            message: "fetch aborted".to_owned()
        }
    );
}
