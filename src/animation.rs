use crate::clock::Wake;
use crate::config::Settings;
use crate::error::Error;
use crate::graphics::{Region, Renderer, Stroke};
use crate::math::solve_secondary;
use crate::params::ParameterGenerator;
use crate::segment::{Point, Segment};
use crate::state::{AnimationState, GeometryConfig};
use crossterm::style::Color;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::Rng;
use std::time::Instant;

/// Stroke for both animated segments
pub const SEGMENT_STROKE: Stroke = Stroke {
    color: Color::Rgb {
        r: 0xCB,
        g: 0x43,
        b: 0x35,
    },
    width: 0.25,
};

/// Stroke for the axis guides through the pivot
pub const GUIDE_STROKE: Stroke = Stroke {
    color: Color::Rgb {
        r: 0x2F,
        g: 0x2F,
        b: 0x2F,
    },
    width: 1.0,
};

pub const LABEL_COLOR: Color = Color::Rgb {
    r: 0x5F,
    g: 0x5F,
    b: 0x5F,
};

/// Baseline of the status label
pub const LABEL_POSITION: Point = Point::new(10.0, 20.0);

/// What the loop does when it next wakes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Drawing and advancing every frame
    Rendering,
    /// Waiting out the end-of-cycle delay with fresh geometry
    CyclePause,
}

/// Drives the figure frame by frame.
///
/// Each call to [`AnimationLoop::tick`] returns exactly one [`Wake`], so the
/// driver never holds more than one pending continuation.
pub struct AnimationLoop<R = StdRng> {
    settings: Settings,
    generator: ParameterGenerator<R>,
    geometry: GeometryConfig,
    state: AnimationState,
    phase: Phase,
    /// Number of times the geometry has been regenerated
    generations: u64,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl<R: Rng> AnimationLoop<R> {
    pub fn new(settings: Settings, mut generator: ParameterGenerator<R>) -> Self {
        let geometry = generator.generate();
        let state = AnimationState::new(&geometry, settings.center);
        AnimationLoop {
            settings,
            generator,
            geometry,
            state,
            phase: Phase::Rendering,
            generations: 0,
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn generations(&self) -> u64 {
        self.generations
    }

    /// Draws the status label and axis guides, then asks for the first frame
    pub fn start(&mut self, renderer: &mut impl Renderer) -> Result<Wake, Error> {
        info!(
            "starting: surface {}x{}, center ({}, {}), primary {} secondary {}",
            self.settings.surface.width,
            self.settings.surface.height,
            self.settings.center.x,
            self.settings.center.y,
            self.geometry.primary_length,
            self.geometry.secondary_length
        );
        self.draw_status(renderer)?;
        self.draw_guides(renderer)?;
        renderer.present()?;
        Ok(Wake::Frame)
    }

    /// Runs one scheduled callback and returns the next one to schedule
    pub fn tick(&mut self, renderer: &mut impl Renderer) -> Result<Wake, Error> {
        match self.phase {
            Phase::Rendering => {
                if self.state.at_cycle_start(&self.geometry, self.settings.center) {
                    self.geometry = self.generator.generate();
                    self.generations += 1;
                    self.phase = Phase::CyclePause;
                    debug!(
                        "cycle complete at angle {}, pausing for {:?}",
                        self.state.angle, self.settings.end_wait
                    );
                    return Ok(Wake::After(self.settings.end_wait));
                }
                self.render_step(renderer)?;
            }
            Phase::CyclePause => {
                debug!("resuming after pause");
                self.reset_surface(renderer)?;
                self.phase = Phase::Rendering;
                self.render_step(renderer)?;
            }
        }
        Ok(Wake::Frame)
    }

    /// Draws both segments at their current position, then advances the primary
    fn render_step(&mut self, renderer: &mut impl Renderer) -> Result<(), Error> {
        let primary = self.state.primary;
        renderer.draw_line(&primary, SEGMENT_STROKE)?;
        let secondary = solve_secondary(&primary, self.geometry.ratio);
        renderer.draw_line(&secondary, SEGMENT_STROKE)?;

        self.state
            .advance(&self.geometry, self.settings.center, self.settings.step_angle);
        trace!("angle {:.2}, primary {:?}", self.state.angle, self.state.primary);

        if self.settings.debug {
            self.update_fps();
            self.draw_status(renderer)?;
        }
        renderer.present()
    }

    /// Clears everything below the status row and redraws the guides
    fn reset_surface(&self, renderer: &mut impl Renderer) -> Result<(), Error> {
        let surface = self.settings.surface;
        let top = self.settings.top_margin;
        renderer.clear_region(Region {
            x: 0.0,
            y: top,
            width: f64::from(surface.width),
            height: f64::from(surface.height) - top,
        })?;
        self.draw_guides(renderer)
    }

    fn draw_guides(&self, renderer: &mut impl Renderer) -> Result<(), Error> {
        let surface = self.settings.surface;
        let center = self.settings.center;
        renderer.draw_line(
            &Segment::new(0.0, center.y, f64::from(surface.width), center.y),
            GUIDE_STROKE,
        )?;
        renderer.draw_line(
            &Segment::new(
                center.x,
                self.settings.top_margin,
                center.x,
                f64::from(surface.height),
            ),
            GUIDE_STROKE,
        )
    }

    fn draw_status(&self, renderer: &mut impl Renderer) -> Result<(), Error> {
        let surface = self.settings.surface;
        let mut text = format!("width: {}  height: {}", surface.width, surface.height);
        if self.settings.debug {
            text.push_str(&format!(
                "  {} {}  angle: {:>6.2}  cycle: {}  fps: {:>5.1}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                self.state.angle,
                self.generations,
                self.fps
            ));
        }
        renderer.draw_label(LABEL_POSITION, &text, LABEL_COLOR)
    }

    fn update_fps(&mut self) {
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }
    }
}
