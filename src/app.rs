// ============================================================================
// WINDOW FRONT-END
// ============================================================================

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{error, info, warn};
use pixels::{Pixels, SurfaceTexture};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::config::{Appearance, GaugeConfig, WindowConfig};
use crate::error::Result;
use crate::gauge::{Gauge, GaugeCommand};
use crate::render::{build_scene, centered_square, Canvas};
use crate::text::LabelFont;

/// How often queued commands are applied while the gauge is detached and no
/// frames are due.
const DETACHED_DRAIN_INTERVAL: Duration = Duration::from_millis(250);

/// A gauge in its own window, the primary public interface.
#[derive(Debug, Clone)]
pub struct Speedometer {
    config: GaugeConfig,
    appearance: Appearance,
    window: WindowConfig,
}

impl Speedometer {
    pub fn new(config: GaugeConfig, appearance: Appearance, window: WindowConfig) -> Result<Self> {
        config.validate()?;
        window.validate()?;
        Ok(Self {
            config,
            appearance,
            window,
        })
    }

    /// Opens the window and animates the gauge until it is closed. The needle
    /// only coasts since nothing drives it.
    pub fn show(&self) -> Result<()> {
        self.run_window(None)
    }

    /// Like `show`, applying commands from `receiver` on the render thread
    /// before each frame.
    pub fn show_with_commands(&self, receiver: Receiver<GaugeCommand>) -> Result<()> {
        self.run_window(Some(receiver))
    }

    fn run_window(&self, receiver: Option<Receiver<GaugeCommand>>) -> Result<()> {
        let font = LabelFont::resolve(self.window.font_path.as_deref())?;

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.window.title)
            .with_inner_size(LogicalSize::new(
                self.window.width as f64,
                self.window.height as f64,
            ))
            .with_resizable(true)
            .build(&event_loop)?;

        let window = Arc::new(window);
        let window_clone = window.clone();
        let mut text_scale = window.scale_factor() as f32;

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let (mut origin, bounds) = centered_square(fb_width, fb_height);
        let mut gauge = Gauge::new(self.config.clone(), self.appearance.clone(), bounds)?
            .with_max_framerate(self.window.max_framerate)?;
        fit_labels(&mut gauge, font.as_ref(), text_scale);

        info!(
            "showing gauge up to {} in a {}x{} window",
            self.config.max_speed, fb_width, fb_height
        );

        event_loop.run(move |event, window_target| match event {
            Event::Resumed => {
                // Catch up on everything queued while suspended before the
                // first frame runs.
                if let Some(ref receiver) = receiver {
                    gauge.drain_commands(receiver);
                }
                gauge.attach();
            }
            Event::Suspended | Event::LoopExiting => gauge.detach(),
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    gauge.detach();
                    window_target.exit();
                }
                WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                    text_scale = scale_factor as f32;
                    fit_labels(&mut gauge, font.as_ref(), text_scale);
                }
                WindowEvent::Resized(new_size) => {
                    if new_size.width == 0 || new_size.height == 0 {
                        return;
                    }
                    if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height) {
                        warn!("failed to resize pixel buffer: {}", err);
                        return;
                    }
                    fb_width = new_size.width as usize;
                    fb_height = new_size.height as usize;
                    if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                        warn!("failed to resize surface: {}", err);
                    }
                    let (new_origin, bounds) = centered_square(fb_width, fb_height);
                    origin = new_origin;
                    gauge.layout(bounds);
                    window_clone.request_redraw();
                }
                WindowEvent::RedrawRequested => {
                    if let Some(ref receiver) = receiver {
                        gauge.drain_commands(receiver);
                    }
                    gauge.on_display_frame(Instant::now());

                    let scene = build_scene(&gauge, origin, text_scale);
                    let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                    scene.render(&mut canvas, font.as_ref());
                    if let Err(err) = pixels.render() {
                        error!("failed to present frame: {}", err);
                        gauge.detach();
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if let Some(ref receiver) = receiver {
                    gauge.drain_commands(receiver);
                }
                match gauge.display_link() {
                    Some(link) if link.is_due(Instant::now()) => {
                        window_clone.request_redraw();
                        window_target.set_control_flow(ControlFlow::Poll);
                    }
                    Some(link) => {
                        let next = link.next_due().unwrap_or_else(Instant::now);
                        window_target.set_control_flow(ControlFlow::WaitUntil(next));
                    }
                    None if receiver.is_some() => window_target.set_control_flow(
                        ControlFlow::WaitUntil(Instant::now() + DETACHED_DRAIN_INTERVAL),
                    ),
                    None => window_target.set_control_flow(ControlFlow::Wait),
                }
            }
            _ => {}
        })?;

        Ok(())
    }
}

/// Measures every label with the font at the current scale. Without a font
/// labels keep a zero extent and are never drawn.
fn fit_labels(gauge: &mut Gauge, font: Option<&LabelFont>, text_scale: f32) {
    if let Some(font) = font {
        let size = gauge.appearance().label_font_size * text_scale;
        gauge.fit_labels(|text| font.measure(text, size));
    }
}
