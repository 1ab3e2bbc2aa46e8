use super::*;

#[test]
fn parse_margin_maps_flags_to_named_constants() {
    assert_eq!(parse_margin(&Preload::Flag(true)).as_str(), PRELOAD_MARGIN);
    assert_eq!(parse_margin(&Preload::Flag(false)).as_str(), ZERO_MARGIN);
    assert_eq!(
        parse_margin(&Preload::from("10px 10px 10px 10px")).as_str(),
        "10px 10px 10px 10px"
    );
}

#[test]
fn parse_margin_passes_malformed_strings_through() {
    let m = parse_margin(&Preload::from("lots of margin"));
    assert_eq!(m.as_str(), "lots of margin");
    assert!(m.offsets().is_err());
}

#[test]
fn flag_margins_resolve_to_defaults() {
    assert_eq!(
        parse_margin(&Preload::Flag(true)).offsets().unwrap(),
        Margin::PRELOAD
    );
    assert_eq!(
        parse_margin(&Preload::Flag(false)).offsets().unwrap(),
        Margin::ZERO
    );
}

#[test]
fn shorthand_expands_like_css_margin() {
    let one = RootMargin::new("10px").offsets().unwrap();
    assert_eq!(one, Margin::px(10.0, 10.0, 10.0, 10.0));

    let two = RootMargin::new("10px 20px").offsets().unwrap();
    assert_eq!(two, Margin::px(10.0, 20.0, 10.0, 20.0));

    let three = RootMargin::new("1px 2px 3px").offsets().unwrap();
    assert_eq!(three, Margin::px(1.0, 2.0, 3.0, 2.0));

    let four = RootMargin::new(" 1px  2px 3px\t4px ").offsets().unwrap();
    assert_eq!(four, Margin::px(1.0, 2.0, 3.0, 4.0));

    assert_eq!(RootMargin::new("").offsets().unwrap(), Margin::ZERO);
}

#[test]
fn percent_and_case_insensitive_units() {
    let m = RootMargin::new("50% 0PX 12.5px 10%").offsets().unwrap();
    assert_eq!(m.top, MarginLength::Percent(50.0));
    assert_eq!(m.right, MarginLength::Px(0.0));
    assert_eq!(m.bottom, MarginLength::Px(12.5));
    assert_eq!(m.left, MarginLength::Percent(10.0));
}

#[test]
fn malformed_margins_are_configuration_errors() {
    for bad in [
        "10",
        "10em",
        "px",
        "-5px",
        "1px 2px 3px 4px 5px",
        "NaNpx",
        "infpx",
        "10px,10px",
    ] {
        let err = RootMargin::new(bad).offsets().unwrap_err();
        assert!(
            matches!(err, SizegateError::Configuration(_)),
            "{bad:?} gave {err}"
        );
    }
}

#[test]
fn resolve_uses_axis_extent_for_percentages() {
    let m = RootMargin::new("10% 50% 0px 20px").offsets().unwrap();
    let insets = m.resolve(Size::new(200.0, 1000.0));
    assert_eq!(insets.y0, 100.0);
    assert_eq!(insets.x1, 100.0);
    assert_eq!(insets.y1, 0.0);
    assert_eq!(insets.x0, 20.0);
}

#[test]
fn preload_deserializes_from_bool_or_string() {
    let p: Preload = serde_json::from_str("false").unwrap();
    assert_eq!(p, Preload::Flag(false));
    let p: Preload = serde_json::from_str(r#""0px 0px 100px 0px""#).unwrap();
    assert_eq!(p, Preload::Margin("0px 0px 100px 0px".to_owned()));
    assert_eq!(Preload::default(), Preload::Flag(true));
}
