use storychart::core::{LinearScale, PointScale};

#[test]
fn resolving_twice_with_identical_inputs_is_bit_identical() {
    let first = LinearScale::for_values(Some(120.0), 1.1, (0.0, 640.0)).expect("scale");
    let second = LinearScale::for_values(Some(120.0), 1.1, (0.0, 640.0)).expect("scale");

    for value in [0.0, 13.7, 59.21, 120.0] {
        assert_eq!(
            first.position(value).expect("pos").to_bits(),
            second.position(value).expect("pos").to_bits()
        );
    }
}

#[test]
fn zero_or_absent_maximum_falls_back_to_unit_domain() {
    let zeros = LinearScale::for_values(Some(0.0), 1.1, (0.0, 100.0)).expect("scale");
    assert_eq!(zeros.domain(), (0.0, 1.0));

    let absent = LinearScale::for_values(None, 1.0, (0.0, 100.0)).expect("scale");
    assert_eq!(absent.domain(), (0.0, 1.0));
}

#[test]
fn padding_factor_adds_headroom() {
    let scale = LinearScale::for_values(Some(100.0), 1.1, (0.0, 640.0)).expect("scale");
    let (low, high) = scale.domain();
    assert_eq!(low, 0.0);
    assert!((high - 110.0).abs() <= 1e-9);
}

#[test]
fn span_scale_round_trips_through_invert() {
    let scale = LinearScale::for_span(&[2010.0, 2023.0], (0.0, 1000.0)).expect("scale");
    let px = scale.position(2016.0).expect("pos");
    let recovered = scale.invert(px).expect("invert");
    assert!((recovered - 2016.0).abs() <= 1e-9);
}

#[test]
fn inverted_value_axis_maps_max_to_top() {
    let y = LinearScale::for_values(Some(100.0), 1.0, (400.0, 0.0)).expect("scale");
    assert_eq!(y.position(0.0).expect("pos"), 400.0);
    assert_eq!(y.position(100.0).expect("pos"), 0.0);
}

#[test]
fn point_scale_positions_are_reproducible() {
    let domain: Vec<String> = (2013..=2025).map(|year| year.to_string()).collect();
    let first = PointScale::new(domain.clone(), (0.0, 800.0), 0.5).expect("scale");
    let second = PointScale::new(domain, (0.0, 800.0), 0.5).expect("scale");

    for index in 0..13 {
        assert_eq!(
            first.position_at(index).to_bits(),
            second.position_at(index).to_bits()
        );
    }
}
