// ============================================================================
// LABEL FONT
// ============================================================================

use std::path::{Path, PathBuf};

use log::{debug, warn};
use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::Color;
use crate::error::{GaugeError, Result};
use crate::geometry::{Bounds, Point};
use crate::render::Canvas;

/// Bold sans fonts commonly installed on desktop systems, tried in order.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

pub struct LabelFont {
    font: Font<'static>,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl LabelFont {
    pub fn from_bytes(data: Vec<u8>) -> Option<Self> {
        Font::try_from_vec(data).map(|font| Self { font })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data).ok_or_else(|| GaugeError::Font(path.to_path_buf()))
    }

    /// Loads `explicit` if given, otherwise the first usable system font.
    ///
    /// An explicit path that fails is an error. Finding no system font is
    /// not: the gauge renders without labels.
    pub fn resolve(explicit: Option<&Path>) -> Result<Option<Self>> {
        if let Some(path) = explicit {
            debug!("loading label font from {}", path.display());
            return Self::from_path(path).map(Some);
        }
        for candidate in SYSTEM_FONTS.iter().map(PathBuf::from) {
            if !candidate.is_file() {
                continue;
            }
            match Self::from_path(&candidate) {
                Ok(font) => {
                    debug!("using system font {}", candidate.display());
                    return Ok(Some(font));
                }
                Err(err) => debug!("skipping {}: {}", candidate.display(), err),
            }
        }
        warn!("no usable label font found, speed labels will not be drawn");
        Ok(None)
    }

    fn layout(&self, text: &str, size: f32) -> Vec<PositionedGlyph<'_>> {
        let scale = Scale::uniform(size);
        let v_metrics = self.font.v_metrics(scale);
        self.font
            .layout(text, scale, point(0.0, v_metrics.ascent))
            .collect()
    }

    /// Pixel size of the inked area of `text`.
    pub fn measure(&self, text: &str, size: f32) -> Bounds {
        let (min_x, max_x, min_y, max_y) = ink_bounds(&self.layout(text, size));
        if min_x >= max_x || min_y >= max_y {
            return Bounds::default();
        }
        Bounds::new((max_x - min_x) as f64, (max_y - min_y) as f64)
    }

    /// Draws `text` with the top-left corner of its ink box at `origin`.
    pub fn draw(&self, canvas: &mut Canvas, origin: Point, text: &str, size: f32, color: Color) {
        let glyphs = self.layout(text, size);
        let (min_x, max_x, min_y, max_y) = ink_bounds(&glyphs);
        if min_x >= max_x || min_y >= max_y {
            return;
        }
        let offset_x = origin.x.round() as i32;
        let offset_y = origin.y.round() as i32;
        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = offset_x + gx as i32 + bb.min.x - min_x;
                    let py = offset_y + gy as i32 + bb.min.y - min_y;
                    canvas.blend(px, py, color, v);
                });
            }
        }
    }
}

fn ink_bounds(glyphs: &[PositionedGlyph]) -> (i32, i32, i32, i32) {
    glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_not_a_font() {
        assert!(LabelFont::from_bytes(vec![0u8; 64]).is_none());
    }

    #[test]
    fn test_missing_explicit_font_is_an_error() {
        let result = LabelFont::resolve(Some(Path::new("/nonexistent/font.ttf")));
        assert!(matches!(result, Err(GaugeError::Io(_))));
    }

    #[test]
    fn test_unparseable_explicit_font_is_an_error() {
        let path = std::env::temp_dir().join("speedometer-not-a-font.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();
        let result = LabelFont::from_path(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(GaugeError::Font(p)) if p == path));
    }

    #[test]
    fn test_system_font_measures_wider_text_wider() {
        // Only meaningful where a system font is installed.
        let Ok(Some(font)) = LabelFont::resolve(None) else {
            return;
        };
        let narrow = font.measure("0", 16.0);
        let wide = font.measure("300", 16.0);
        assert!(wide.width > narrow.width);
        assert!(narrow.height > 0.0);
        assert_eq!(font.measure("", 16.0), Bounds::default());
    }

    #[test]
    fn test_draw_places_ink_box_at_origin() {
        let Ok(Some(font)) = LabelFont::resolve(None) else {
            return;
        };
        let extent = font.measure("8", 16.0);
        let mut frame = vec![0u8; 40 * 40 * 4];
        let mut canvas = Canvas::new(&mut frame, 40, 40);
        font.draw(&mut canvas, Point::new(10.0, 10.0), "8", 16.0, Color::WHITE);

        let inked = |x: usize, y: usize| canvas.pixel(x, y).is_some_and(|p| p[3] != 0);
        let (w, h) = (extent.width as usize, extent.height as usize);
        assert!((0..40).all(|y| (0..10).all(|x| !inked(x, y))));
        assert!((0..40).all(|y| (10 + w..40).all(|x| !inked(x, y))));
        assert!((10 + h..40).all(|y| (0..40).all(|x| !inked(x, y))));
        assert!((10..10 + h).any(|y| (10..10 + w).any(|x| inked(x, y))));
    }
}
