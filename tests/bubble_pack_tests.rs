use storychart::api::{BubblePackChart, BubblePackConfig, InstanceStatus};
use storychart::core::{Row, Viewport};
use storychart::render::NullRenderer;
use storychart::scene::{Geometry, NodeKind};

fn stream_row(game: &str, watch_time: &str) -> Row {
    Row::new()
        .with("Game", game)
        .with("\u{feff}Change Watch Time (%)", watch_time)
}

fn sample_rows() -> Vec<Row> {
    vec![
        stream_row("Fortnite", "81,000"),
        stream_row("League of Legends", "59,000"),
        stream_row("Dota 2", "31,500"),
        stream_row("PUBG", "20,000"),
    ]
}

fn build_chart() -> BubblePackChart<NullRenderer> {
    let config = BubblePackConfig::new(Viewport::new(448, 448));
    BubblePackChart::new(NullRenderer::default(), config).expect("chart")
}

#[test]
fn bubbles_are_keyed_by_name_largest_first() {
    let mut chart = build_chart();
    chart.set_data(&sample_rows()).expect("data");

    assert_eq!(
        chart.categories(),
        vec![
            "Fortnite".to_owned(),
            "League of Legends".to_owned(),
            "Dota 2".to_owned(),
            "PUBG".to_owned(),
        ]
    );
    assert!(chart.scene().get("Fortnite").is_some());
}

#[test]
fn non_positive_and_malformed_values_are_dropped() {
    let mut rows = sample_rows();
    rows.push(stream_row("Shrinking", "-12"));
    rows.push(stream_row("Mystery", "???"));

    let mut chart = build_chart();
    chart.set_data(&rows).expect("data");
    assert_eq!(chart.categories().len(), 4);
}

#[test]
fn packed_bubbles_do_not_overlap() {
    let mut chart = build_chart();
    chart.set_data(&sample_rows()).expect("data");

    let circles: Vec<(f64, f64, f64)> = chart
        .scene()
        .nodes()
        .iter()
        .filter(|node| node.kind == NodeKind::Point)
        .map(|node| {
            let Geometry::Circle { cx, cy, radius } = node.geometry() else {
                panic!("expected circle");
            };
            (cx, cy, radius)
        })
        .collect();
    assert_eq!(circles.len(), 4);

    for (index, (x1, y1, r1)) in circles.iter().enumerate() {
        for (x2, y2, r2) in &circles[index + 1..] {
            let distance = ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt();
            assert!(distance + 1e-6 >= r1 + r2);
        }
    }
}

#[test]
fn radii_grow_with_watch_time() {
    let mut chart = build_chart();
    chart.set_data(&sample_rows()).expect("data");

    let radius_of = |name: &str| {
        let Geometry::Circle { radius, .. } =
            chart.scene().get(name).expect("bubble").geometry()
        else {
            panic!("expected circle");
        };
        radius
    };

    assert!(radius_of("Fortnite") > radius_of("League of Legends"));
    assert!(radius_of("League of Legends") > radius_of("PUBG"));
}

#[test]
fn hover_raises_emphasis_and_yields_a_clamped_tooltip() {
    let mut chart = build_chart();
    chart.set_data(&sample_rows()).expect("data");

    let placement = chart
        .hover(Some("Fortnite"), (150.0, 40.0))
        .expect("hover")
        .expect("placement");
    assert!(placement.x >= 0.0 && placement.x + 150.0 <= 448.0);
    assert!(placement.y >= 0.0 && placement.y + 40.0 <= 448.0);

    let node = chart.scene().get("Fortnite").expect("bubble");
    assert_eq!(node.style().opacity, 1.0);
    let unhovered = chart.scene().get("PUBG").expect("bubble");
    assert_eq!(unhovered.style().opacity, 0.7);

    chart.hover(None, (150.0, 40.0)).expect("unhover");
    let node = chart.scene().get("Fortnite").expect("bubble");
    assert_eq!(node.style().opacity, 0.7);
}

#[test]
fn hit_test_resolves_bubble_centers() {
    let mut chart = build_chart();
    chart.set_data(&sample_rows()).expect("data");

    let Geometry::Circle { cx, cy, .. } =
        chart.scene().get("Fortnite").expect("bubble").geometry()
    else {
        panic!("expected circle");
    };

    assert_eq!(chart.hit_test(cx, cy), Some("Fortnite"));
    assert_eq!(chart.hit_test(-50.0, -50.0), None);
}

#[test]
fn empty_rows_enter_the_no_data_state() {
    let mut chart = build_chart();
    chart.set_data(&[]).expect("data");
    assert_eq!(*chart.status(), InstanceStatus::NoData);
    chart.render().expect("placeholder render");
}
