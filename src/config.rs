// ============================================================================
// GAUGE CONFIGURATION
// ============================================================================

use bon::Builder;

use crate::error::{GaugeError, Result};

/// Start of the dial arc, measured clockwise from the positive x axis.
pub const MIN_ANGLE: f64 = 135.0 * std::f64::consts::PI / 180.0;
/// End of the dial arc. One and a half turns past `MIN_ANGLE`'s quadrant.
pub const MAX_ANGLE: f64 = 405.0 * std::f64::consts::PI / 180.0;

pub const MAJOR_TICK_STEP: u32 = 20;
pub const MINOR_TICK_STEP: u32 = 5;

/// Upper bound on the tick marks of either kind laid out on one dial.
pub const MAX_TICK_MARKS: u64 = 4096;

pub const DEFAULT_FRAMERATE: f64 = 60.0;

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const GRAY: Color = Color::new(0x80, 0x80, 0x80);
    pub const ORANGE: Color = Color::new(0xff, 0x80, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// How the ends of a stroked line are finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineCap {
    /// Square end flush with the endpoint.
    #[default]
    Butt,
    /// Half-disc end reaching past the endpoint by half the thickness.
    Round,
}

/// Speed range and tick spacing of the dial.
#[derive(Debug, Clone, Builder)]
pub struct GaugeConfig {
    pub max_speed: f64,
    #[builder(default = MIN_ANGLE)]
    pub min_angle: f64,
    #[builder(default = MAX_ANGLE)]
    pub max_angle: f64,
    #[builder(default = MAJOR_TICK_STEP)]
    pub major_step: u32,
    #[builder(default = MINOR_TICK_STEP)]
    pub minor_step: u32,
}

impl GaugeConfig {
    pub fn new(max_speed: f64) -> Self {
        Self::builder().max_speed(max_speed).build()
    }

    /// Rejects configurations the angle mapping and tick layout cannot work
    /// with. Tick speeds are `u32`, so `max_speed` may not exceed `u32::MAX`.
    pub fn validate(&self) -> Result<()> {
        if !self.max_speed.is_finite()
            || self.max_speed <= 0.0
            || self.max_speed > u32::MAX as f64
        {
            return Err(GaugeError::InvalidMaxSpeed(self.max_speed));
        }
        if self.major_step == 0 || self.minor_step == 0 {
            return Err(GaugeError::InvalidTickStep);
        }
        let count = self.tick_count(self.major_step.min(self.minor_step));
        if count > MAX_TICK_MARKS {
            return Err(GaugeError::TooManyTicks(count));
        }
        debug_assert!(self.max_angle > self.min_angle);
        Ok(())
    }

    /// Number of ticks `step` apart from zero to `floor(max_speed)`.
    pub fn tick_count(&self, step: u32) -> u64 {
        self.max_speed.floor() as u64 / step.max(1) as u64 + 1
    }
}

/// Frame rates the display link can pace at.
pub fn validate_framerate(max_framerate: f64) -> Result<()> {
    if !max_framerate.is_finite() || max_framerate <= 0.0 {
        return Err(GaugeError::InvalidFramerate(max_framerate));
    }
    Ok(())
}

/// Proportions and colors of everything painted on the face.
///
/// Fractions are relative to the gauge width (or its radius where noted).
#[derive(Debug, Clone, Builder)]
pub struct Appearance {
    // Ticks, as fractions of the radius
    #[builder(default = 0.88)]
    pub major_tick_inner: f64,
    #[builder(default = 0.96)]
    pub minor_tick_inner: f64,
    #[builder(default = 3.0)]
    pub major_tick_width: f32,
    #[builder(default = 2.0)]
    pub minor_tick_width: f32,
    #[builder(default = LineCap::Butt)]
    pub major_tick_cap: LineCap,
    #[builder(default = LineCap::Round)]
    pub minor_tick_cap: LineCap,

    // Labels
    #[builder(default = 0.76)]
    pub label_radius: f64,
    #[builder(default = 16.0)]
    pub label_font_size: f32,

    // Needle, as fractions of the width
    #[builder(default = 0.50)]
    pub needle_length: f64,
    #[builder(default = 0.03)]
    pub needle_thickness: f64,
    #[builder(default = 0.2)]
    pub needle_pivot: f64,
    #[builder(default = 0.1)]
    pub hub_diameter: f64,

    // Colors
    #[builder(default = Color::new(0x1c, 0x1c, 0x1e))]
    pub background_color: Color,
    #[builder(default = Color::BLACK)]
    pub face_color: Color,
    #[builder(default = Color::WHITE)]
    pub tick_color: Color,
    #[builder(default = Color::WHITE)]
    pub text_color: Color,
    #[builder(default = Color::ORANGE)]
    pub needle_color: Color,
    #[builder(default = Color::GRAY)]
    pub hub_color: Color,
}

impl Default for Appearance {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Configuration for application window
#[derive(Debug, Clone, Builder)]
pub struct WindowConfig {
    #[builder(default = "Speedometer".to_string())]
    pub title: String,
    #[builder(default = 400)]
    pub width: u32,
    #[builder(default = 400)]
    pub height: u32,
    #[builder(default = DEFAULT_FRAMERATE)]
    pub max_framerate: f64,
    /// Font used for the speed labels. Well-known system fonts are tried when unset.
    pub font_path: Option<std::path::PathBuf>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WindowConfig {
    pub fn validate(&self) -> Result<()> {
        validate_framerate(self.max_framerate)
    }
}
