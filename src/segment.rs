/// A point in logical surface coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Line segment position with start and end coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

impl Segment {
    pub const fn new(start_x: f64, start_y: f64, end_x: f64, end_y: f64) -> Self {
        Segment {
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }

    /// Builds a segment between two points
    pub const fn between(start: Point, end: Point) -> Self {
        Segment::new(start.x, start.y, end.x, end.y)
    }

    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    pub fn end(&self) -> Point {
        Point::new(self.end_x, self.end_y)
    }

    /// Direction vector from start to end
    pub fn delta(&self) -> (f64, f64) {
        (self.end_x - self.start_x, self.end_y - self.start_y)
    }

    #[cfg(test)]
    pub fn length(&self) -> f64 {
        let (dx, dy) = self.delta();
        (dx * dx + dy * dy).sqrt()
    }
}
