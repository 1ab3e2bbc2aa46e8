use super::*;

#[test]
fn new_clamps_negative_and_nan() {
    let d = Dimension::new(-3.0, f64::NAN);
    assert_eq!(d, Dimension::ZERO);
    assert!(d.is_zero());
}

#[test]
fn differs_from_is_exact_on_both_axes() {
    let a = Dimension::new(100.0, 50.0);
    assert!(!a.differs_from(Dimension::new(100.0, 50.0)));
    assert!(a.differs_from(Dimension::new(100.5, 50.0)));
    assert!(a.differs_from(Dimension::new(100.0, 50.000_001)));
}

#[test]
fn size_conversions() {
    let d = Dimension::from(Size::new(12.0, 8.0));
    assert_eq!(d, Dimension::new(12.0, 8.0));
    assert_eq!(Size::from(d), Size::new(12.0, 8.0));
    assert_eq!(d.to_string(), "12x8");
}

#[test]
fn serializes_as_width_height_object() {
    let s = serde_json::to_string(&Dimension::new(3.0, 4.0)).unwrap();
    assert_eq!(s, r#"{"width":3.0,"height":4.0}"#);
}

#[test]
fn deserializing_clamps_like_new() {
    let d: Dimension = serde_json::from_str(r#"{"width":-5,"height":0}"#).unwrap();
    assert_eq!(d, Dimension::ZERO);
    let d: Dimension = serde_json::from_str(r#"{"width":12.5,"height":-1}"#).unwrap();
    assert_eq!(d, Dimension::new(12.5, 0.0));
}
