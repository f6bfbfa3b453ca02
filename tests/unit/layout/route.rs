use super::*;

#[test]
fn level_edge_is_one_segment() {
    let segs = route_edge(Point::new(0.0, 10.0), Point::new(100.0, 10.0));
    assert_eq!(segs.len(), 1);
    assert_eq!(segs[0].p0.y, segs[0].p1.y);
}

#[test]
fn diagonal_is_45_degrees_and_starts_at_anchor() {
    let segs = route_edge(Point::new(0.0, 0.0), Point::new(200.0, 40.0));
    assert_eq!(segs.len(), 3);
    let mid = segs[1];
    assert!(((mid.p1.x - mid.p0.x).abs() - (mid.p1.y - mid.p0.y).abs()).abs() < 1e-9);
    assert!((mid.p0.x - 70.0).abs() < 1e-9);
    assert_eq!(segs[2].p1, Point::new(200.0, 40.0));
}

#[test]
fn diagonal_never_overshoots_target() {
    let segs = route_edge(Point::new(0.0, 0.0), Point::new(100.0, -90.0));
    let mid = segs[1];
    assert!(mid.p1.x <= 100.0 + 1e-9);
    assert!((mid.p1.x - 100.0).abs() < 1e-9);
    assert!((mid.p0.x - 10.0).abs() < 1e-9);
}

#[test]
fn segments_are_contiguous() {
    let segs = route_edge(Point::new(5.0, 5.0), Point::new(300.0, 125.0));
    for w in segs.windows(2) {
        assert_eq!(w[0].p1, w[1].p0);
    }
}
