use super::*;
use crate::region::margin::RootMargin;
use crate::signal::{SizeObserver, VisibilityObserver};
use std::cell::RefCell;
use std::rc::Rc;

fn platform() -> HeadlessPlatform {
    HeadlessPlatform::new(Rect::new(0.0, 0.0, 800.0, 600.0))
}

type Seen<E> = Rc<RefCell<Vec<E>>>;

fn recording_size_observer(
    p: &HeadlessPlatform,
) -> (HeadlessSizeObserver, Seen<ResizeEntry<HeadlessElement>>) {
    let seen: Seen<_> = Rc::default();
    let sink = Rc::clone(&seen);
    let obs = p
        .size_observer(Box::new(move |entries| {
            sink.borrow_mut().extend_from_slice(entries)
        }))
        .unwrap();
    (obs, seen)
}

fn recording_visibility_observer(
    p: &HeadlessPlatform,
    margin: &str,
) -> (
    HeadlessVisibilityObserver,
    Seen<IntersectionEntry<HeadlessElement>>,
) {
    let seen: Seen<_> = Rc::default();
    let sink = Rc::clone(&seen);
    let obs = p
        .visibility_observer(
            &VisibilityOptions::new(RootMargin::new(margin)),
            Box::new(move |entries| sink.borrow_mut().extend_from_slice(entries)),
        )
        .unwrap();
    (obs, seen)
}

#[test]
fn element_handles_compare_by_identity() {
    let p = platform();
    let a = p.create_element(Rect::new(0.0, 0.0, 10.0, 10.0));
    let b = p.create_element(Rect::new(0.0, 0.0, 10.0, 10.0));
    assert_eq!(a, a.clone());
    assert_ne!(a, b);

    let other = platform();
    let c = other.create_element(Rect::new(0.0, 0.0, 10.0, 10.0));
    assert_ne!(a, c);
    assert_eq!(p.rect(&c), None);
}

#[test]
fn content_box_reads_current_layout() {
    let p = platform();
    let el = p.create_element(Rect::new(5.0, 5.0, 25.0, 15.0));
    assert_eq!(el.content_box(), Dimension::new(20.0, 10.0));
    p.set_size(&el, Size::new(7.0, 3.0));
    assert_eq!(el.content_box(), Dimension::new(7.0, 3.0));
    assert_eq!(p.rect(&el), Some(Rect::new(5.0, 5.0, 12.0, 8.0)));
    p.move_to(&el, Point::new(100.0, 100.0));
    assert_eq!(el.content_box(), Dimension::new(7.0, 3.0));
}

#[test]
fn content_box_of_dropped_scene_is_zero() {
    let el = {
        let p = platform();
        p.create_element(Rect::new(0.0, 0.0, 10.0, 10.0))
    };
    assert_eq!(el.content_box(), Dimension::ZERO);
}

#[test]
fn resizes_report_first_nonzero_then_changes_only() {
    let p = platform();
    let el = p.create_element(Rect::new(0.0, 0.0, 100.0, 50.0));
    let (mut obs, seen) = recording_size_observer(&p);
    obs.observe(&el);

    assert_eq!(p.flush_resizes(), 1);
    assert_eq!(p.flush_resizes(), 0);
    p.set_size(&el, Size::new(120.0, 50.0));
    p.move_to(&el, Point::new(0.0, 900.0));
    assert_eq!(p.flush_resizes(), 1);

    let seen = seen.borrow();
    assert_eq!(seen[0].content_box, Dimension::new(100.0, 50.0));
    assert_eq!(seen[1].content_box, Dimension::new(120.0, 50.0));
    assert_eq!(seen[1].target, el);
}

#[test]
fn zero_sized_elements_are_not_reported_until_laid_out() {
    let p = platform();
    let el = p.create_element(Rect::new(0.0, 0.0, 0.0, 0.0));
    let (mut obs, seen) = recording_size_observer(&p);
    obs.observe(&el);
    assert_eq!(p.flush_resizes(), 0);
    p.set_size(&el, Size::new(1.0, 1.0));
    assert_eq!(p.flush_resizes(), 1);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn intersections_report_initial_state_then_transitions() {
    let p = platform();
    let el = p.create_element(Rect::new(0.0, 700.0, 100.0, 800.0));
    let (mut obs, seen) = recording_visibility_observer(&p, "0px");
    obs.observe(&el);

    assert_eq!(p.flush_intersections(), 1);
    assert!(!seen.borrow()[0].is_intersecting);
    assert_eq!(p.flush_intersections(), 0);

    p.scroll_by(Vec2::new(0.0, 300.0));
    assert_eq!(p.flush_intersections(), 1);
    let last = seen.borrow().last().cloned().unwrap();
    assert!(last.is_intersecting);
    assert_eq!(last.intersection_ratio, 1.0);
}

#[test]
fn root_margin_extends_the_region() {
    let p = platform();
    let el = p.create_element(Rect::new(0.0, 700.0, 100.0, 800.0));
    let (mut obs, seen) = recording_visibility_observer(&p, "0px 0px 400px 0px");
    obs.observe(&el);
    p.flush_intersections();
    assert!(seen.borrow()[0].is_intersecting);
}

#[test]
fn run_frame_flushes_both_kinds() {
    let p = platform();
    let el = p.create_element(Rect::new(0.0, 0.0, 10.0, 10.0));
    let (mut size, _) = recording_size_observer(&p);
    let (mut vis, _) = recording_visibility_observer(&p, "0px");
    size.observe(&el);
    vis.observe(&el);
    assert_eq!(
        p.run_frame(),
        Delivered {
            resizes: 1,
            intersections: 1,
        }
    );
    assert_eq!(p.run_frame(), Delivered::default());
}

#[test]
fn unsupported_kinds_fail_construction() {
    let p = platform().without_size_observation();
    let err = p.size_observer(Box::new(|_| {})).unwrap_err();
    assert!(matches!(err, SizegateError::Unsupported(_)));

    let p = platform().without_visibility_observation();
    let err = p
        .visibility_observer(
            &VisibilityOptions::new(RootMargin::new("0px")),
            Box::new(|_| {}),
        )
        .unwrap_err();
    assert!(matches!(err, SizegateError::Unsupported(_)));
}

#[test]
fn malformed_root_margin_and_threshold_are_rejected() {
    let p = platform();
    let err = p
        .visibility_observer(
            &VisibilityOptions::new(RootMargin::new("ten pixels")),
            Box::new(|_| {}),
        )
        .unwrap_err();
    assert!(matches!(err, SizegateError::Configuration(_)));

    let opts = VisibilityOptions {
        root_margin: RootMargin::new("0px"),
        threshold: 1.5,
    };
    let err = p.visibility_observer(&opts, Box::new(|_| {})).unwrap_err();
    assert!(matches!(err, SizegateError::Configuration(_)));
    assert_eq!(p.live_observers(), (0, 0));
}

#[test]
fn stats_count_calls_and_disconnect_unregisters() {
    let p = platform();
    let el = p.create_element(Rect::new(0.0, 0.0, 10.0, 10.0));
    let (mut size, _) = recording_size_observer(&p);
    let (mut vis, _) = recording_visibility_observer(&p, "0px");
    size.observe(&el);
    vis.observe(&el);
    assert_eq!(p.live_observers(), (1, 1));

    size.unobserve(&el);
    size.disconnect();
    vis.disconnect();
    assert_eq!(p.live_observers(), (0, 0));
    assert_eq!(
        p.stats(),
        ObserverStats {
            size_observe: 1,
            size_unobserve: 1,
            size_disconnect: 1,
            visibility_observe: 1,
            visibility_disconnect: 1,
            visibility_created: 1,
        }
    );
}

#[test]
fn dropping_an_observer_unregisters_it() {
    let p = platform();
    {
        let _obs = recording_size_observer(&p);
        assert_eq!(p.live_observers(), (1, 0));
    }
    assert_eq!(p.live_observers(), (0, 0));
}

#[test]
fn in_flight_batches_survive_disconnect_within_a_pump() {
    let p = platform();
    let el = p.create_element(Rect::new(0.0, 0.0, 10.0, 10.0));

    let victim: Rc<RefCell<Option<HeadlessSizeObserver>>> = Rc::default();
    let victim_hits = Rc::new(RefCell::new(0));

    let killer_target = Rc::clone(&victim);
    let mut killer = p
        .size_observer(Box::new(move |_| {
            if let Some(obs) = killer_target.borrow_mut().as_mut() {
                obs.disconnect();
            }
        }))
        .unwrap();
    let hits = Rc::clone(&victim_hits);
    let mut second = p
        .size_observer(Box::new(move |_| *hits.borrow_mut() += 1))
        .unwrap();

    killer.observe(&el);
    second.observe(&el);
    *victim.borrow_mut() = Some(second);

    assert_eq!(p.flush_resizes(), 2);
    assert_eq!(*victim_hits.borrow(), 1);
    assert_eq!(p.live_observers(), (1, 0));
}

#[test]
fn zero_height_element_across_the_viewport_is_visible() {
    let p = platform();
    let rule = p.create_element(Rect::new(0.0, 300.0, 1000.0, 300.0));
    let (mut obs, seen) = recording_visibility_observer(&p, "0px");
    obs.observe(&rule);
    p.flush_intersections();
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].is_intersecting);
}
