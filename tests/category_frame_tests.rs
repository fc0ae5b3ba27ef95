use storychart::core::{CategoryFrame, ColumnSpec, Row, stack_by_category};

#[test]
fn stacked_input_orders_segments_descending_with_cumulative_spans() {
    let rows = vec![
        Row::new().with("year", 2020.0).with("genre", "A").with("count", 10.0),
        Row::new().with("year", 2020.0).with("genre", "B").with("count", 30.0),
    ];

    let frames = stack_by_category(&rows, &ColumnSpec::default());
    assert_eq!(frames.len(), 1);

    let frame = &frames[0];
    assert_eq!(frame.category(), "2020");
    assert_eq!(frame.total(), 40.0);

    let segments = frame.segments();
    assert_eq!(segments[0].key, "B");
    assert_eq!(segments[0].value, 30.0);
    assert_eq!(segments[0].cumulative_start, 0.0);
    assert_eq!(segments[0].cumulative_end, 30.0);
    assert_eq!(segments[1].key, "A");
    assert_eq!(segments[1].value, 10.0);
    assert_eq!(segments[1].cumulative_start, 30.0);
    assert_eq!(segments[1].cumulative_end, 40.0);
}

#[test]
fn last_cumulative_end_equals_reported_total() {
    let frame = CategoryFrame::stack(
        "2021",
        &[
            ("a".to_owned(), 12.0),
            ("b".to_owned(), 7.5),
            ("c".to_owned(), 0.5),
        ],
    );

    let last = frame.segments().last().expect("segments");
    assert_eq!(last.cumulative_end, frame.total());
    frame.validate().expect("no cumulative drift");
}

#[test]
fn equal_values_tie_break_by_input_order() {
    let frame = CategoryFrame::stack(
        "2022",
        &[
            ("first".to_owned(), 4.0),
            ("second".to_owned(), 9.0),
            ("third".to_owned(), 4.0),
        ],
    );

    let keys: Vec<&str> = frame.keys().collect();
    assert_eq!(keys, vec!["second", "first", "third"]);
}

#[test]
fn frames_arrive_in_ascending_category_order() {
    let rows = vec![
        Row::new().with("year", 2021.0).with("genre", "A").with("count", 1.0),
        Row::new().with("year", 2019.0).with("genre", "A").with("count", 1.0),
        Row::new().with("year", 2020.0).with("genre", "A").with("count", 1.0),
    ];

    let frames = stack_by_category(&rows, &ColumnSpec::default());
    let categories: Vec<&str> = frames.iter().map(CategoryFrame::category).collect();
    assert_eq!(categories, vec!["2019", "2020", "2021"]);
}
