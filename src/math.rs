use crate::segment::{Point, Segment};
use crate::state::{AnimationState, GeometryConfig};
use std::f64::consts::PI;

/// Rounds half-way values toward positive infinity
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Rounds to two decimal places with half-up tie breaking
pub fn round_cents(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}

/// Advances the angle by one step, snapping back to zero past a full turn
pub fn step_angle(current: f64, step: f64) -> f64 {
    let next = current + step;
    // Hard reset, not a modulo: the overshoot is dropped
    if next > 360.0 {
        0.0
    } else {
        next
    }
}

/// Solves the primary segment for the state's current angle.
///
/// The start slides along the horizontal axis through the center while the end
/// stays on the vertical axis, at the height that keeps the segment at
/// `primary_length`. Updates `vertical_direction` when the start reaches either
/// extreme of its travel; between the extremes the previous direction is kept.
pub fn solve_primary(
    state: &mut AnimationState,
    geometry: &GeometryConfig,
    center: Point,
) -> Segment {
    let length = f64::from(geometry.primary_length);
    let end_x = center.x;

    let start_x = center.x - (state.angle * PI / 180.0).cos() * length;
    let distance_x = (end_x - start_x).abs();
    let distance_y = round_cents((length.powi(2) - distance_x.powi(2)).sqrt());

    if start_x >= center.x + length {
        state.vertical_direction = true;
    } else if start_x <= center.x - length {
        state.vertical_direction = false;
    }

    let end_y = if state.vertical_direction {
        round_cents(center.y + distance_y)
    } else {
        round_cents(center.y - distance_y)
    };

    Segment::new(start_x, center.y, end_x, end_y)
}

/// Extends the primary segment through its end by `ratio`.
///
/// The secondary segment starts at the primary's end and points the same way,
/// so both segments always lie on one line.
pub fn solve_secondary(primary: &Segment, ratio: f64) -> Segment {
    let (distance_x, distance_y) = primary.delta();
    let start = primary.end();
    Segment::between(
        start,
        Point::new(distance_x * ratio + start.x, distance_y * ratio + start.y),
    )
}

/// Z component of the cross product of two segment directions
#[cfg(test)]
pub fn cross(a: &Segment, b: &Segment) -> f64 {
    let (ax, ay) = a.delta();
    let (bx, by) = b.delta();
    ax * by - ay * bx
}
