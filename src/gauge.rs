//! The gauge model: motion state, label set and current layout, plus the
//! per-frame callback that only runs while the gauge is attached to a window.

use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::config::{self, Appearance, GaugeConfig, DEFAULT_FRAMERATE};
use crate::error::{GaugeError, Result};
use crate::geometry::{self, Bounds, GaugeLayout, Label};
use crate::motion::MotionState;

/// Command enum for channel-driven gauge updates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GaugeCommand {
    SetSpeed(f64),
    StartAccelerating,
    EndAccelerating,
}

/// Fixed-rate frame callback registration.
///
/// Exists only while the gauge is attached; dropping it is the
/// deregistration.
#[derive(Debug, Clone)]
pub struct DisplayLink {
    frame_duration: Duration,
    last_fire: Option<Instant>,
}

impl DisplayLink {
    /// Fails unless `max_framerate` is finite and positive.
    pub fn new(max_framerate: f64) -> Result<Self> {
        config::validate_framerate(max_framerate)?;
        let frame_duration = Duration::try_from_secs_f64(1.0 / max_framerate)
            .map_err(|_| GaugeError::InvalidFramerate(max_framerate))?;
        Ok(Self {
            frame_duration,
            last_fire: None,
        })
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.last_fire
            .is_none_or(|last| now.saturating_duration_since(last) >= self.frame_duration)
    }

    /// When the next frame is due, or `None` before the first one.
    pub fn next_due(&self) -> Option<Instant> {
        self.last_fire.map(|last| last + self.frame_duration)
    }

    fn fire(&mut self, now: Instant) {
        self.last_fire = Some(now);
    }
}

#[derive(Debug, Clone)]
pub struct Gauge {
    config: GaugeConfig,
    appearance: Appearance,
    motion: MotionState,
    needle_angle: f64,
    labels: Vec<Label>,
    layout: GaugeLayout,
    max_framerate: f64,
    frame_duration: Duration,
    display_link: Option<DisplayLink>,
}

impl Gauge {
    /// Builds a detached gauge laid out in `bounds`. Fails if `config` cannot
    /// be mapped onto the dial.
    pub fn new(config: GaugeConfig, appearance: Appearance, bounds: Bounds) -> Result<Self> {
        config.validate()?;
        let mut labels = geometry::labels_for(&config);
        geometry::place_labels(&mut labels, &config, bounds, appearance.label_radius);
        let layout = GaugeLayout::compute(&config, &appearance, bounds);
        Ok(Self {
            needle_angle: config.min_angle,
            config,
            appearance,
            motion: MotionState::new(),
            labels,
            layout,
            max_framerate: DEFAULT_FRAMERATE,
            frame_duration: Duration::from_secs_f64(1.0 / DEFAULT_FRAMERATE),
            display_link: None,
        })
    }

    /// Sets the rate the frame callback runs at once attached.
    pub fn with_max_framerate(mut self, max_framerate: f64) -> Result<Self> {
        let link = DisplayLink::new(max_framerate)?;
        self.max_framerate = max_framerate;
        self.frame_duration = link.frame_duration;
        Ok(self)
    }

    // ------------------------------------------------------------------------
    // Public mutators
    // ------------------------------------------------------------------------

    pub fn set_speed(&mut self, speed: f64) {
        self.motion.set_speed(speed);
        self.needle_angle = self.angle_for_speed(speed);
    }

    pub fn start_accelerating(&mut self) {
        self.motion.start_accelerating();
    }

    pub fn end_accelerating(&mut self) {
        self.motion.end_accelerating();
    }

    pub fn apply(&mut self, command: GaugeCommand) {
        match command {
            GaugeCommand::SetSpeed(speed) => self.set_speed(speed),
            GaugeCommand::StartAccelerating => self.start_accelerating(),
            GaugeCommand::EndAccelerating => self.end_accelerating(),
        }
    }

    /// Applies every command queued on `receiver`, in order, without
    /// blocking. Returns how many were applied.
    pub fn drain_commands(&mut self, receiver: &Receiver<GaugeCommand>) -> usize {
        let mut applied = 0;
        while let Ok(command) = receiver.try_recv() {
            self.apply(command);
            applied += 1;
        }
        if applied > 0 {
            debug!("applied {} queued commands", applied);
        }
        applied
    }

    /// One integrator step; the new speed goes through `set_speed` unclamped.
    pub fn tick(&mut self) {
        let speed = self.motion.step();
        self.set_speed(speed);
    }

    /// Sizes every label to the extent `measure` reports for its text. Call
    /// again whenever the font or its scale changes; `layout` keeps extents.
    pub fn fit_labels(&mut self, mut measure: impl FnMut(&str) -> Bounds) {
        for label in &mut self.labels {
            label.extent = measure(&label.text);
        }
    }

    /// Recomputes tick, label and needle positions for new bounds.
    pub fn layout(&mut self, bounds: Bounds) {
        debug!("laying out gauge in {}x{}", bounds.width, bounds.height);
        self.layout = GaugeLayout::compute(&self.config, &self.appearance, bounds);
        geometry::place_labels(
            &mut self.labels,
            &self.config,
            bounds,
            self.appearance.label_radius,
        );
    }

    // ------------------------------------------------------------------------
    // Frame callback lifecycle
    // ------------------------------------------------------------------------

    /// Arms the frame callback. Re-attaching replaces any previous link.
    pub fn attach(&mut self) {
        info!("gauge attached, ticking at {} fps", self.max_framerate);
        self.display_link = Some(DisplayLink {
            frame_duration: self.frame_duration,
            last_fire: None,
        });
    }

    pub fn detach(&mut self) {
        if self.display_link.take().is_some() {
            info!("gauge detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.display_link.is_some()
    }

    pub fn display_link(&self) -> Option<&DisplayLink> {
        self.display_link.as_ref()
    }

    /// Runs the frame callback if attached and due. Returns whether it ran.
    pub fn on_display_frame(&mut self, now: Instant) -> bool {
        let Some(link) = self.display_link.as_mut() else {
            return false;
        };
        if !link.is_due(now) {
            return false;
        }
        link.fire(now);
        self.tick();
        true
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn angle_for_speed(&self, speed: f64) -> f64 {
        geometry::angle_for_speed(&self.config, speed)
    }

    pub fn speed(&self) -> f64 {
        self.motion.speed
    }

    pub fn acceleration(&self) -> f64 {
        self.motion.acceleration
    }

    pub fn is_accelerating(&self) -> bool {
        self.motion.is_accelerating
    }

    pub fn needle_angle(&self) -> f64 {
        self.needle_angle
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn current_layout(&self) -> &GaugeLayout {
        &self.layout
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }
}
