use crate::math::{solve_primary, step_angle};
use crate::segment::{Point, Segment};

/// Randomized segment geometry, regenerated once per cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryConfig {
    /// Length of the primary segment, in [10, 120]
    pub primary_length: i32,
    /// Length of the secondary segment, bounded by the surface height
    pub secondary_length: i32,
    /// secondary_length / primary_length
    pub ratio: f64,
    /// Where the primary segment starts (and ends) a cycle
    pub cycle_start: Point,
}

impl GeometryConfig {
    /// Builds a configuration from both lengths, deriving the ratio and cycle start
    pub fn new(primary_length: i32, secondary_length: i32, center: Point) -> Self {
        GeometryConfig {
            primary_length,
            secondary_length,
            ratio: f64::from(secondary_length) / f64::from(primary_length),
            cycle_start: Point::new(center.x - f64::from(primary_length), center.y),
        }
    }
}

/// Per-frame animation state
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    /// Current angle in degrees, within [0, 360]; 360 itself is reached since the
    /// wrap only triggers once a step would pass it
    pub angle: f64,
    /// Whether the primary end moves toward increasing Y
    pub vertical_direction: bool,
    /// Position of the primary segment to be drawn on the next frame
    pub primary: Segment,
}

impl AnimationState {
    /// Initial state: zero angle and the placeholder segment lying on the horizontal axis
    pub fn new(geometry: &GeometryConfig, center: Point) -> Self {
        AnimationState {
            angle: 0.0,
            vertical_direction: false,
            primary: Segment::new(geometry.cycle_start.x, center.y, center.x, center.y),
        }
    }

    /// Steps the angle and solves the primary segment for the next frame
    pub fn advance(&mut self, geometry: &GeometryConfig, center: Point, step: f64) {
        self.angle = step_angle(self.angle, step);
        self.primary = solve_primary(self, geometry, center);
    }

    /// True when the primary segment is back at the start of its cycle
    pub fn at_cycle_start(&self, geometry: &GeometryConfig, center: Point) -> bool {
        // Exact comparison on values already rounded to two decimals
        self.primary.start_x == geometry.cycle_start.x && self.primary.end_y == center.y
    }
}
