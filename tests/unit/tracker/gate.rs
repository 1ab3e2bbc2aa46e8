use super::*;

fn dim(w: f64, h: f64) -> Dimension {
    Dimension::new(w, h)
}

#[test]
fn starts_off_screen_at_zero() {
    let g = Gate::default();
    assert_eq!(g.visibility(), Visibility::OffScreen);
    assert_eq!(g.snapshot(), TrackerSnapshot::default());
}

#[test]
fn resizes_are_dropped_while_off_screen() {
    let mut g = Gate::default();
    for (w, h) in [(10.0, 10.0), (100.0, 50.0), (0.0, 3.0)] {
        assert_eq!(g.on_resize(dim(w, h)), Step::Dropped(DropReason::OffScreen));
    }
    assert_eq!(g.snapshot().dimension, Dimension::ZERO);
}

#[test]
fn entry_refreshes_from_measure_even_when_equal() {
    let mut g = Gate::default();
    let step = g.on_intersection(true, || Dimension::ZERO);
    assert_eq!(step, Step::Entered);
    assert!(step.is_change());
    assert_eq!(g.snapshot().dimension, Dimension::ZERO);
    assert!(g.snapshot().visible);
}

#[test]
fn measure_is_not_called_without_entry() {
    let mut g = Gate::default();
    let step = g.on_intersection(false, || panic!("measured while staying off-screen"));
    assert_eq!(step, Step::Dropped(DropReason::SameVisibility));

    g.on_intersection(true, || dim(1.0, 1.0));
    let step = g.on_intersection(true, || panic!("measured while already on-screen"));
    assert_eq!(step, Step::Dropped(DropReason::SameVisibility));
}

#[test]
fn on_screen_resize_dedups_exactly() {
    let mut g = Gate::default();
    g.on_intersection(true, || dim(100.0, 50.0));
    assert_eq!(
        g.on_resize(dim(100.0, 50.0)),
        Step::Dropped(DropReason::Unchanged)
    );
    assert_eq!(g.on_resize(dim(120.0, 50.0)), Step::Resized);
    assert_eq!(g.on_resize(dim(120.0, 50.5)), Step::Resized);
    assert_eq!(g.snapshot().dimension, dim(120.0, 50.5));
}

#[test]
fn exit_keeps_last_dimension() {
    let mut g = Gate::default();
    g.on_intersection(true, || dim(40.0, 30.0));
    assert_eq!(g.on_intersection(false, || dim(0.0, 0.0)), Step::Exited);
    assert_eq!(
        g.snapshot(),
        TrackerSnapshot {
            dimension: dim(40.0, 30.0),
            visible: false,
        }
    );
}

#[test]
fn reset_visibility_reports_whether_it_changed() {
    let mut g = Gate::default();
    assert!(!g.reset_visibility());
    g.on_intersection(true, || dim(5.0, 5.0));
    assert!(g.reset_visibility());
    assert_eq!(g.snapshot().dimension, dim(5.0, 5.0));
    assert!(!g.snapshot().visible);
}
