use crate::foundation::{
    core::{Line, Point},
    math::approx_eq,
};

/// Preferred start of the diagonal, as a fraction of the horizontal span.
const DIAGONAL_ANCHOR: f64 = 0.35;

/// Metro-style route between two node centres.
///
/// Equal heights give a single horizontal segment. Otherwise the route is a horizontal
/// departure, a 45° diagonal whose horizontal run equals the vertical distance, and a horizontal
/// arrival. The diagonal starts at 35% of the span unless that would carry it past the target x.
pub fn route_edge(from: Point, to: Point) -> Vec<Line> {
    if approx_eq(from.y, to.y) {
        return vec![Line::new(from, Point::new(to.x, from.y))];
    }

    let dx = to.x - from.x;
    let dy = (to.y - from.y).abs();
    let dir = if dx < 0.0 { -1.0 } else { 1.0 };

    let span = dx.abs();
    let preferred = span * DIAGONAL_ANCHOR;
    let run_start = preferred.min(span - dy);

    let bend_a = Point::new(from.x + dir * run_start, from.y);
    let bend_b = Point::new(bend_a.x + dir * dy, to.y);

    vec![
        Line::new(from, bend_a),
        Line::new(bend_a, bend_b),
        Line::new(bend_b, to),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/layout/route.rs"]
mod tests;
