// ============================================================================
// RETAINED MODE RENDERING
// ============================================================================

use crate::config::{Color, LineCap};
use crate::gauge::Gauge;
use crate::geometry::{Bounds, Circle, Point, TickKind};
use crate::text::LabelFont;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    /// Restricts subsequent drawing to a circle, or lifts the restriction.
    Clip(Option<Circle>),
    Disc {
        center: Point,
        radius: f64,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        thickness: f32,
        cap: LineCap,
        color: Color,
    },
    Polygon {
        points: Vec<Point>,
        color: Color,
    },
    /// `text` with its ink box's top-left corner at `origin`.
    Text {
        origin: Point,
        text: String,
        font_size: f32,
        color: Color,
    },
}

#[derive(Debug, Default)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn render(&self, canvas: &mut Canvas, font: Option<&LabelFont>) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::Clip(clip) => canvas.clip = *clip,
                DrawCommand::Disc {
                    center,
                    radius,
                    color,
                } => draw_disc(canvas, *center, *radius, *color),
                DrawCommand::Line {
                    from,
                    to,
                    thickness,
                    cap,
                    color,
                } => draw_thick_line_aa(canvas, *from, *to, *thickness, *cap, *color),
                DrawCommand::Polygon { points, color } => {
                    fill_convex_polygon(canvas, points, *color)
                }
                DrawCommand::Text {
                    origin,
                    text,
                    font_size,
                    color,
                } => {
                    if let Some(font) = font {
                        font.draw(canvas, *origin, text, *font_size, *color);
                    }
                }
            }
        }
    }
}

// ============================================================================
// SCENE CONSTRUCTION
// ============================================================================

/// Largest square that fits in a `width` x `height` frame, centred. Returns
/// its top-left corner and size.
pub fn centered_square(width: usize, height: usize) -> (Point, Bounds) {
    let side = width.min(height) as f64;
    let origin = Point::new(
        ((width as f64 - side) / 2.0).floor(),
        ((height as f64 - side) / 2.0).floor(),
    );
    (origin, Bounds::square(side))
}

/// Paints the gauge in back-to-front order: face, major ticks, minor ticks,
/// labels, needle, hub. `origin` places the gauge-local layout in the frame.
pub fn build_scene(gauge: &Gauge, origin: Point, text_scale: f32) -> Scene {
    let appearance = gauge.appearance();
    let layout = gauge.current_layout();
    let at = |p: Point| Point::new(origin.x + p.x, origin.y + p.y);

    let mut scene = Scene::new();
    scene.add_command(DrawCommand::Clear(appearance.background_color));

    let face = Circle {
        center: at(layout.face.center),
        radius: layout.face.radius,
    };
    scene.add_command(DrawCommand::Disc {
        center: face.center,
        radius: face.radius,
        color: appearance.face_color,
    });
    scene.add_command(DrawCommand::Clip(Some(face)));

    for (kind, thickness, cap) in [
        (
            TickKind::Major,
            appearance.major_tick_width,
            appearance.major_tick_cap,
        ),
        (
            TickKind::Minor,
            appearance.minor_tick_width,
            appearance.minor_tick_cap,
        ),
    ] {
        for tick in layout.ticks(kind) {
            scene.add_command(DrawCommand::Line {
                from: at(tick.outer),
                to: at(tick.inner),
                thickness: thickness * text_scale,
                cap,
                color: appearance.tick_color,
            });
        }
    }

    for label in gauge.labels() {
        scene.add_command(DrawCommand::Text {
            origin: at(label.origin()),
            text: label.text.clone(),
            font_size: appearance.label_font_size * text_scale,
            color: appearance.text_color,
        });
    }

    scene.add_command(DrawCommand::Polygon {
        points: layout
            .needle
            .polygon(gauge.needle_angle())
            .into_iter()
            .map(at)
            .collect(),
        color: appearance.needle_color,
    });

    scene.add_command(DrawCommand::Disc {
        center: at(layout.hub.center),
        radius: layout.hub.radius,
        color: appearance.hub_color,
    });
    scene.add_command(DrawCommand::Clip(None));

    scene
}

// ============================================================================
// CANVAS
// ============================================================================

/// An RGBA8 framebuffer with an optional circular clip.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    clip: Option<Circle>,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        debug_assert!(frame.len() >= width * height * 4);
        Self {
            frame,
            width,
            height,
            clip: None,
        }
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        self.frame[idx..idx + 4].try_into().ok()
    }

    /// Alpha-blends `color` over the pixel at `(x, y)`. Out-of-frame and
    /// clipped pixels are ignored; the clip edge is anti-aliased.
    pub fn blend(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let mut alpha = alpha.clamp(0.0, 1.0);
        if let Some(clip) = self.clip {
            let dist = Point::new(x as f64 + 0.5, y as f64 + 0.5).distance(clip.center);
            alpha *= (clip.radius - dist + 0.5).clamp(0.0, 1.0) as f32;
        }
        if alpha <= 0.0 {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let src = [color.r as f32, color.g as f32, color.b as f32];
        for (channel, value) in src.iter().enumerate() {
            let dst = self.frame[idx + channel] as f32;
            self.frame[idx + channel] = (value * alpha + dst * (1.0 - alpha)).round() as u8;
        }
        self.frame[idx + 3] = 0xff;
    }
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn draw_thick_line_aa(
    canvas: &mut Canvas,
    from: Point,
    to: Point,
    thickness: f32,
    cap: LineCap,
    color: Color,
) {
    let pad = thickness.ceil() as f64 + 1.0;
    let min_x = (from.x.min(to.x) - pad).floor() as i32;
    let max_x = (from.x.max(to.x) + pad).ceil() as i32;
    let min_y = (from.y.min(to.y) - pad).floor() as i32;
    let max_y = (from.y.max(to.y) + pad).ceil() as i32;
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 && cap == LineCap::Butt {
        return;
    }
    let len = len_sq.sqrt();
    let half = thickness as f64 / 2.0;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let t = if len_sq > 0.0 {
                ((p.x - from.x) * dx + (p.y - from.y) * dy) / len_sq
            } else {
                0.0
            };
            let aa = match cap {
                LineCap::Round => {
                    // Distance to the segment; clamping `t` gives round caps.
                    let t = t.clamp(0.0, 1.0);
                    let nearest = Point::new(from.x + t * dx, from.y + t * dy);
                    (half - p.distance(nearest) + 0.5).clamp(0.0, 1.0)
                }
                LineCap::Butt => {
                    // Distance to the infinite line, faded over the last
                    // half pixel past either end.
                    let across = ((p.x - from.x) * dy - (p.y - from.y) * dx).abs() / len;
                    let overshoot = (-t).max(t - 1.0) * len;
                    (half - across + 0.5).clamp(0.0, 1.0) * (0.5 - overshoot).clamp(0.0, 1.0)
                }
            };
            if aa > 0.01 {
                canvas.blend(x, y, color, aa as f32);
            }
        }
    }
}

fn draw_disc(canvas: &mut Canvas, center: Point, radius: f64, color: Color) {
    let min_x = (center.x - radius - 1.0).floor() as i32;
    let max_x = (center.x + radius + 1.0).ceil() as i32;
    let min_y = (center.y - radius - 1.0).floor() as i32;
    let max_y = (center.y + radius + 1.0).ceil() as i32;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dist = Point::new(x as f64 + 0.5, y as f64 + 0.5).distance(center);
            let aa = (radius - dist + 0.5).clamp(0.0, 1.0);
            if aa > 0.0 {
                canvas.blend(x, y, color, aa as f32);
            }
        }
    }
}

/// Fills a convex polygon given in either winding order, with a one pixel
/// anti-aliased edge.
fn fill_convex_polygon(canvas: &mut Canvas, points: &[Point], color: Color) {
    if points.len() < 3 {
        return;
    }
    let area2: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    if area2 == 0.0 {
        return;
    }
    let winding = area2.signum();

    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min).floor() as i32 - 1;
    let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max).ceil() as i32 + 1;
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min).floor() as i32 - 1;
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max).ceil() as i32 + 1;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            // Signed distance to the nearest edge, positive inside.
            let inside = points
                .iter()
                .zip(points.iter().cycle().skip(1))
                .map(|(a, b)| {
                    let (ex, ey) = (b.x - a.x, b.y - a.y);
                    let len = ex.hypot(ey);
                    if len == 0.0 {
                        f64::INFINITY
                    } else {
                        winding * (ex * (p.y - a.y) - ey * (p.x - a.x)) / len
                    }
                })
                .fold(f64::INFINITY, f64::min);
            let aa = (inside + 0.5).clamp(0.0, 1.0);
            if aa > 0.01 {
                canvas.blend(x, y, color, aa as f32);
            }
        }
    }
}
