use crate::error::Error;
use crate::graphics::Surface;
use crate::segment::Point;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Space kept free at the top of the surface for the status label
pub const TOP_MARGIN: f64 = 30.0;

/// Command line arguments
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "A console-based pivoting line animation")]
pub struct Args {
    /// Target frames per second
    #[arg(long, default_value_t = 60.0)]
    pub fps: f64,

    /// Angle advanced per frame, in degrees
    #[arg(long, default_value_t = 0.25)]
    pub step_angle: f64,

    /// Pause at the end of each cycle, in milliseconds
    #[arg(long, default_value_t = 1500)]
    pub pause_ms: u64,

    /// Logical height of the drawing surface
    #[arg(long, default_value_t = 640)]
    pub height: u32,

    /// X coordinate of the pivot (defaults to the middle of the surface)
    #[arg(long)]
    pub center_x: Option<f64>,

    /// Y coordinate of the pivot (defaults to the middle of the surface)
    #[arg(long)]
    pub center_y: Option<f64>,

    /// Seed for the segment length generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Show angle, cycle count and FPS in the status row
    #[arg(short, long)]
    pub debug: bool,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Default for Args {
    fn default() -> Self {
        Args {
            fps: 60.0,
            step_angle: 0.25,
            pause_ms: 1500,
            height: 640,
            center_x: None,
            center_y: None,
            seed: None,
            debug: false,
            log_file: None,
        }
    }
}

/// Constants fixed for the whole session
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Target time between frames
    pub frame_interval: Duration,
    /// Degrees advanced per frame
    pub step_angle: f64,
    /// Logical surface size
    pub surface: Surface,
    /// Upper bound on segment lengths, half the surface height
    pub max_line: i32,
    /// Pivot shared by both segments
    pub center: Point,
    /// Pause after each completed cycle
    pub end_wait: Duration,
    /// Height of the status row left untouched by cycle resets
    pub top_margin: f64,
    /// Show the debug overlay
    pub debug: bool,
}

impl Settings {
    /// Combines arguments with the measured surface
    pub fn resolve(args: &Args, surface: Surface) -> Result<Self, Error> {
        if !(args.fps.is_finite() && args.fps > 0.0) {
            return Err(Error::InvalidSetting {
                name: "fps",
                reason: format!("must be a positive number, got {}", args.fps),
            });
        }
        if !(args.step_angle.is_finite() && args.step_angle > 0.0) {
            return Err(Error::InvalidSetting {
                name: "step-angle",
                reason: format!("must be a positive number, got {}", args.step_angle),
            });
        }
        if surface.height == 0 || surface.width == 0 {
            return Err(Error::InvalidSetting {
                name: "height",
                reason: format!("surface {}x{} is empty", surface.width, surface.height),
            });
        }

        let frame_interval =
            Duration::try_from_secs_f64(1.0 / args.fps).map_err(|e| Error::InvalidSetting {
                name: "fps",
                reason: format!("{} gives no usable frame interval: {e}", args.fps),
            })?;

        let center = Point::new(
            args.center_x.unwrap_or(f64::from(surface.width / 2)),
            args.center_y.unwrap_or(f64::from(surface.height / 2)),
        );
        for (name, value) in [("center-x", center.x), ("center-y", center.y)] {
            if !value.is_finite() {
                return Err(Error::InvalidSetting {
                    name,
                    reason: format!("must be a finite number, got {value}"),
                });
            }
        }

        Ok(Settings {
            frame_interval,
            step_angle: args.step_angle,
            surface,
            max_line: (surface.height / 2) as i32,
            center,
            end_wait: Duration::from_millis(args.pause_ms),
            top_margin: TOP_MARGIN,
            debug: args.debug,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SURFACE: Surface = Surface {
        width: 600,
        height: 640,
    };

    #[test]
    fn defaults_match_classic_layout() {
        let settings = Settings::resolve(&Args::default(), SURFACE).unwrap();
        assert_eq!(settings.center, Point::new(300.0, 320.0));
        assert_eq!(settings.max_line, 320);
        assert_eq!(settings.end_wait, Duration::from_millis(1500));
        assert_eq!(settings.step_angle, 0.25);
        assert_eq!(settings.frame_interval.as_micros(), 16_666);
    }

    #[test]
    fn odd_height_rounds_max_line_down() {
        let surface = Surface {
            width: 601,
            height: 641,
        };
        let settings = Settings::resolve(&Args::default(), surface).unwrap();
        assert_eq!(settings.max_line, 320);
        assert_eq!(settings.center, Point::new(300.0, 320.0));
    }

    #[test]
    fn explicit_center_wins() {
        let args = Args {
            center_x: Some(120.5),
            center_y: Some(200.0),
            ..Args::default()
        };
        let settings = Settings::resolve(&args, SURFACE).unwrap();
        assert_eq!(settings.center, Point::new(120.5, 200.0));
    }

    #[rstest]
    #[case(0.0, 0.25)]
    #[case(-30.0, 0.25)]
    #[case(60.0, 0.0)]
    #[case(60.0, f64::NAN)]
    #[case(1e-300, 0.25)]
    fn rejects_bad_rates(#[case] fps: f64, #[case] step_angle: f64) {
        let args = Args {
            fps,
            step_angle,
            ..Args::default()
        };
        let err = Settings::resolve(&args, SURFACE).unwrap_err();
        assert!(matches!(err, Error::InvalidSetting { .. }));
    }

    #[rstest]
    #[case(Some(f64::INFINITY), None, "center-x")]
    #[case(Some(f64::NEG_INFINITY), None, "center-x")]
    #[case(None, Some(f64::NAN), "center-y")]
    fn rejects_non_finite_center(
        #[case] center_x: Option<f64>,
        #[case] center_y: Option<f64>,
        #[case] expected: &str,
    ) {
        let args = Args {
            center_x,
            center_y,
            ..Args::default()
        };
        match Settings::resolve(&args, SURFACE) {
            Err(Error::InvalidSetting { name, .. }) => assert_eq!(name, expected),
            other => panic!("expected invalid {expected}, got {other:?}"),
        }
    }

    #[test]
    fn parses_command_line() {
        let args = Args::parse_from(["swingline", "--seed", "9", "--pause-ms", "10", "-d"]);
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.pause_ms, 10);
        assert!(args.debug);
        assert_eq!(args.height, 640);
    }
}
