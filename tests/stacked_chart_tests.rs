use storychart::api::{InstanceStatus, StackedCompositionChart, StackedConfig};
use storychart::core::{Row, Viewport};
use storychart::render::NullRenderer;
use storychart::scene::NodeKind;

fn genre_row(year: f64, genre: &str, count: f64) -> Row {
    Row::new()
        .with("year", year)
        .with("genre", genre)
        .with("count", count)
}

fn sample_rows() -> Vec<Row> {
    vec![
        genre_row(2019.0, "RPG", 40.0),
        genre_row(2019.0, "FPS", 65.0),
        genre_row(2020.0, "Sim", 25.0),
        genre_row(2020.0, "RPG", 55.0),
    ]
}

fn build_chart() -> StackedCompositionChart<NullRenderer> {
    let config = StackedConfig::new(Viewport::new(720, 240)).with_reduced_motion(true);
    StackedCompositionChart::new(NullRenderer::default(), config).expect("chart")
}

#[test]
fn set_data_selects_the_first_category() {
    let mut chart = build_chart();
    chart.set_data(&sample_rows()).expect("set data");

    assert_eq!(chart.categories(), vec!["2019".to_owned(), "2020".to_owned()]);
    assert_eq!(chart.current_selection(), Some("2019"));
    assert_eq!(chart.current_total(), Some(105.0));
    assert_eq!(*chart.status(), InstanceStatus::Ready);
}

#[test]
fn unknown_selection_is_ignored() {
    let mut chart = build_chart();
    chart.set_data(&sample_rows()).expect("set data");
    chart.set_selection("1999").expect("no-op selection");
    assert_eq!(chart.current_selection(), Some("2019"));
}

#[test]
fn selection_survives_a_data_reload() {
    let mut chart = build_chart();
    chart.set_data(&sample_rows()).expect("set data");
    chart.set_selection("2020").expect("select");

    let mut extended = sample_rows();
    extended.push(genre_row(2021.0, "MOBA", 80.0));
    chart.set_data(&extended).expect("reload");

    assert_eq!(chart.current_selection(), Some("2020"));
}

#[test]
fn vanished_selection_falls_back_to_the_first_category() {
    let mut chart = build_chart();
    chart.set_data(&sample_rows()).expect("set data");
    chart.set_selection("2020").expect("select");

    let only_2019: Vec<Row> = sample_rows()
        .into_iter()
        .filter(|row| row.number("year") == Some(2019.0))
        .collect();
    chart.set_data(&only_2019).expect("reload");

    assert_eq!(chart.current_selection(), Some("2019"));
}

#[test]
fn scene_holds_bars_labels_and_legend_per_segment() {
    let mut chart = build_chart();
    chart.set_data(&sample_rows()).expect("set data");

    let nodes = chart.scene().nodes();
    let bars = nodes.iter().filter(|node| node.kind == NodeKind::Bar).count();
    let labels = nodes.iter().filter(|node| node.kind == NodeKind::Label).count();
    let legend = nodes
        .iter()
        .filter(|node| node.kind == NodeKind::LegendItem)
        .count();

    // Two segments for 2019, plus the total label.
    assert_eq!(bars, 2);
    assert_eq!(labels, 3);
    assert_eq!(legend, 2);
}

#[test]
fn switching_years_updates_segments_by_key() {
    let mut chart = build_chart();
    chart.set_data(&sample_rows()).expect("set data");

    chart.set_selection("2020").expect("select");
    assert!(chart.scene().get("RPG").is_some());
    assert!(chart.scene().get("Sim").is_some());
    assert!(chart.scene().get("FPS").is_none());
}

#[test]
fn empty_rows_enter_the_no_data_state() {
    let mut chart = build_chart();
    chart.set_data(&[]).expect("set data");
    assert_eq!(*chart.status(), InstanceStatus::NoData);
    assert_eq!(chart.current_selection(), None);
    chart.render().expect("placeholder render");
}

#[test]
fn load_failure_is_terminal_and_disables_interaction() {
    let mut chart = build_chart();
    chart.mark_load_failed("source unavailable");
    assert!(chart.status().is_failed());

    chart.set_data(&sample_rows()).expect("ignored");
    assert!(chart.categories().is_empty());
    chart.set_selection("2019").expect("ignored");
    assert_eq!(chart.current_selection(), None);
    chart.render().expect("fallback render");
}

#[test]
fn render_emits_primitives_through_the_renderer() {
    let mut chart = build_chart();
    chart.set_data(&sample_rows()).expect("set data");
    chart.render().expect("render");

    let renderer = chart.into_renderer();
    assert!(renderer.last_rect_count >= 2);
    assert!(renderer.last_text_count >= 3);
}
