use crate::math::round_half_up;
use crate::segment::Point;
use crate::state::GeometryConfig;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Shortest primary segment
pub const PRIMARY_MIN: i32 = 10;
/// Spread of the primary segment length above `PRIMARY_MIN`
pub const PRIMARY_SPREAD: f64 = 110.0;
/// Shortest secondary segment
pub const SECONDARY_MIN: i32 = 50;
/// Headroom kept between the longest secondary segment and `max_line`
pub const SECONDARY_HEADROOM: i32 = 170;

/// Draws a fresh geometry configuration at the start of every cycle
pub struct ParameterGenerator<R = StdRng> {
    rng: R,
    max_line: i32,
    center: Point,
}

impl ParameterGenerator<StdRng> {
    /// Seeded generator, or one seeded from system entropy when `seed` is `None`
    pub fn from_seed(seed: Option<u64>, max_line: i32, center: Point) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        ParameterGenerator::new(rng, max_line, center)
    }
}

impl<R: Rng> ParameterGenerator<R> {
    pub fn new(rng: R, max_line: i32, center: Point) -> Self {
        ParameterGenerator {
            rng,
            max_line,
            center,
        }
    }

    /// Samples both segment lengths together and derives the rest.
    ///
    /// `max_line` below `SECONDARY_HEADROOM` makes the secondary spread
    /// non-positive; the result is degenerate but still returned.
    pub fn generate(&mut self) -> GeometryConfig {
        let primary = f64::from(PRIMARY_MIN) + self.rng.gen::<f64>() * PRIMARY_SPREAD;
        let secondary_spread = f64::from(self.max_line - SECONDARY_HEADROOM);
        let secondary = f64::from(SECONDARY_MIN) + self.rng.gen::<f64>() * secondary_spread;

        let geometry = GeometryConfig::new(
            round_half_up(primary) as i32,
            round_half_up(secondary) as i32,
            self.center,
        );
        debug!(
            "generated geometry: primary={} secondary={} ratio={:.3}",
            geometry.primary_length, geometry.secondary_length, geometry.ratio
        );
        geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    const CENTER: Point = Point::new(300.0, 320.0);

    #[test]
    fn lengths_stay_in_range() {
        let mut generator = ParameterGenerator::from_seed(Some(7), 320, CENTER);
        for _ in 0..1000 {
            let geometry = generator.generate();
            assert!((10..=120).contains(&geometry.primary_length));
            assert!((50..=200).contains(&geometry.secondary_length));
            assert!(geometry.secondary_length < 320);
            assert_eq!(
                geometry.ratio,
                f64::from(geometry.secondary_length) / f64::from(geometry.primary_length)
            );
            assert_eq!(
                geometry.cycle_start,
                Point::new(300.0 - f64::from(geometry.primary_length), 320.0)
            );
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = ParameterGenerator::from_seed(Some(42), 320, CENTER);
        let mut b = ParameterGenerator::from_seed(Some(42), 320, CENTER);
        for _ in 0..10 {
            assert_eq!(a.generate(), b.generate());
        }
    }

    #[test]
    fn zero_draw_gives_minimum_lengths() {
        let mut generator = ParameterGenerator::new(StepRng::new(0, 0), 320, CENTER);
        let geometry = generator.generate();
        assert_eq!(geometry.primary_length, 10);
        assert_eq!(geometry.secondary_length, 50);
        assert_eq!(geometry.ratio, 5.0);
    }

    #[test]
    fn short_surface_is_degenerate_but_accepted() {
        let mut generator = ParameterGenerator::from_seed(Some(3), 100, CENTER);
        for _ in 0..100 {
            let geometry = generator.generate();
            assert!((-20..=50).contains(&geometry.secondary_length));
            assert!(geometry.primary_length > 0);
        }
    }
}
