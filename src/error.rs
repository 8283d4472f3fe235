use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GaugeError {
    #[error("max speed must be finite, greater than zero and at most {max}, got {0}", max = u32::MAX)]
    InvalidMaxSpeed(f64),
    #[error("tick step must be greater than zero")]
    InvalidTickStep,
    #[error("{0} tick marks requested, at most {max} are drawn", max = crate::config::MAX_TICK_MARKS)]
    TooManyTicks(u64),
    #[error("frame rate must be finite and greater than zero, got {0}")]
    InvalidFramerate(f64),
    #[error("Failed to load font from {0}")]
    Font(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Window error: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("Pixels error: {0}")]
    Pixels(#[from] pixels::Error),
}

pub type Result<T> = std::result::Result<T, GaugeError>;
