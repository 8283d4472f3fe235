// ============================================================================
// CRATE LAYOUT
// ============================================================================

//! An animated speedometer gauge.
//!
//! The gauge model (`Gauge`) is windowing-free: it maps speeds onto a 270°
//! dial, lays out ticks, labels and the needle for given bounds, and
//! integrates needle motion once per frame while attached. `Speedometer`
//! puts a gauge in a window and renders it with a small software rasterizer.

pub mod app;
pub mod config;
pub mod error;
pub mod gauge;
pub mod geometry;
pub mod motion;
pub mod render;
pub mod text;

pub use app::Speedometer;
pub use config::{Appearance, Color, GaugeConfig, LineCap, WindowConfig};
pub use error::{GaugeError, Result};
pub use gauge::{DisplayLink, Gauge, GaugeCommand};
pub use geometry::{angle_for_speed, Bounds, GaugeLayout, Label, Point, TickKind, TickMark};
pub use motion::MotionState;
