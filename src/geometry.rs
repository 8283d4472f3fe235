//! Dial geometry: speed to angle mapping and the placement of ticks, labels
//! and the needle on a circle.
//!
//! All positions are in gauge-local pixels with the origin at the top-left
//! corner of the drawing bounds and y growing downwards, so positive angles
//! sweep clockwise on screen.

use crate::config::{Appearance, GaugeConfig};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `center` in direction `angle`.
    pub fn polar(center: Point, radius: f64, angle: f64) -> Self {
        Self::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        )
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Size of the drawing area the gauge is laid out in.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub const fn square(side: f64) -> Self {
        Self::new(side, side)
    }

    pub fn radius(&self) -> f64 {
        self.width / 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

/// Linear speed to angle mapping. Speeds at or below zero pin to the start of
/// the arc; speeds past `max_speed` keep extrapolating past the end.
pub fn angle_for_speed(config: &GaugeConfig, speed: f64) -> f64 {
    let ratio = if speed > 0.0 {
        speed / config.max_speed
    } else {
        0.0
    };
    config.min_angle + (config.max_angle - config.min_angle) * ratio
}

/// Integer speeds from zero up to `floor(max_speed)` inclusive, `step` apart.
///
/// `max_speed` past `u32::MAX` saturates; `GaugeConfig::validate` rejects it.
pub fn tick_speeds(max_speed: f64, step: u32) -> impl Iterator<Item = u32> {
    let last = max_speed.floor().max(0.0) as u32;
    (0..=last).step_by(step.max(1) as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Major,
    Minor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickMark {
    pub speed: u32,
    pub angle: f64,
    pub outer: Point,
    pub inner: Point,
}

/// Tick segments for one tick kind, running from the rim inwards to
/// `inner_fraction` of the radius.
pub fn tick_marks(
    config: &GaugeConfig,
    bounds: Bounds,
    step: u32,
    inner_fraction: f64,
) -> Vec<TickMark> {
    let radius = bounds.radius();
    let origin = Point::new(radius, radius);
    tick_speeds(config.max_speed, step)
        .map(|speed| {
            let angle = angle_for_speed(config, speed as f64);
            TickMark {
                speed,
                angle,
                outer: Point::polar(origin, radius, angle),
                inner: Point::polar(origin, radius * inner_fraction, angle),
            }
        })
        .collect()
}

/// A speed label. The set of labels is fixed when the gauge is built;
/// `center` changes with the bounds and `extent` with the font that measures
/// the text.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub speed: u32,
    pub text: String,
    pub center: Point,
    /// Ink size of `text`, zero until measured.
    pub extent: Bounds,
}

impl Label {
    pub fn new(speed: u32) -> Self {
        Self {
            speed,
            text: speed.to_string(),
            center: Point::default(),
            extent: Bounds::default(),
        }
    }

    /// Top-left corner of the label's box when centred on `center`.
    pub fn origin(&self) -> Point {
        Point::new(
            self.center.x - self.extent.width / 2.0,
            self.center.y - self.extent.height / 2.0,
        )
    }
}

/// One label per major tick.
pub fn labels_for(config: &GaugeConfig) -> Vec<Label> {
    tick_speeds(config.max_speed, config.major_step)
        .map(Label::new)
        .collect()
}

pub fn place_labels(labels: &mut [Label], config: &GaugeConfig, bounds: Bounds, fraction: f64) {
    let radius = bounds.radius();
    let origin = Point::new(radius, radius);
    for label in labels {
        let angle = angle_for_speed(config, label.speed as f64);
        label.center = Point::polar(origin, radius * fraction, angle);
    }
}

/// The needle is a tapered quad laid out along +x in its own box and rotated
/// about an anchor inside that box. The anchor sits on the box's horizontal
/// midline, `pivot` of the way from the base, and is pinned to `position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeedleGeometry {
    pub length: f64,
    pub thickness: f64,
    pub pivot: f64,
    pub position: Point,
}

impl NeedleGeometry {
    pub fn new(bounds: Bounds, appearance: &Appearance) -> Self {
        Self {
            length: bounds.width * appearance.needle_length,
            thickness: bounds.width * appearance.needle_thickness,
            pivot: appearance.needle_pivot,
            position: bounds.center(),
        }
    }

    /// Outline in the needle's own box: a blunt tip at `length`, full
    /// thickness at the base.
    pub fn outline(&self) -> [Point; 4] {
        let (w, h) = (self.length, self.thickness);
        [
            Point::new(w, h * 0.3),
            Point::new(w, h * 0.7),
            Point::new(0.0, h),
            Point::new(0.0, 0.0),
        ]
    }

    pub fn anchor(&self) -> Point {
        Point::new(self.length * self.pivot, self.thickness * 0.5)
    }

    /// Outline rotated by `angle` about the anchor, in gauge coordinates.
    pub fn polygon(&self, angle: f64) -> [Point; 4] {
        let anchor = self.anchor();
        let (sin, cos) = angle.sin_cos();
        self.outline().map(|p| {
            let (dx, dy) = (p.x - anchor.x, p.y - anchor.y);
            Point::new(
                self.position.x + dx * cos - dy * sin,
                self.position.y + dx * sin + dy * cos,
            )
        })
    }
}

/// Everything derived from the bounds, rebuilt on every layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeLayout {
    pub bounds: Bounds,
    pub face: Circle,
    pub major_ticks: Vec<TickMark>,
    pub minor_ticks: Vec<TickMark>,
    pub needle: NeedleGeometry,
    pub hub: Circle,
}

impl GaugeLayout {
    pub fn compute(config: &GaugeConfig, appearance: &Appearance, bounds: Bounds) -> Self {
        Self {
            bounds,
            face: Circle {
                center: bounds.center(),
                radius: bounds.radius(),
            },
            major_ticks: tick_marks(
                config,
                bounds,
                config.major_step,
                appearance.major_tick_inner,
            ),
            minor_ticks: tick_marks(
                config,
                bounds,
                config.minor_step,
                appearance.minor_tick_inner,
            ),
            needle: NeedleGeometry::new(bounds, appearance),
            hub: Circle {
                center: bounds.center(),
                radius: bounds.width * appearance.hub_diameter / 2.0,
            },
        }
    }

    pub fn ticks(&self, kind: TickKind) -> &[TickMark] {
        match kind {
            TickKind::Major => &self.major_ticks,
            TickKind::Minor => &self.minor_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-9;

    fn config() -> GaugeConfig {
        GaugeConfig::new(300.0)
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < EPS, "{} != {}", a, b);
    }

    #[test]
    fn test_angle_endpoints() {
        let config = config();
        assert_eq!(angle_for_speed(&config, 0.0), config.min_angle);
        assert_close(angle_for_speed(&config, 300.0), config.max_angle);
    }

    #[test]
    fn test_angle_is_monotonic_within_range() {
        let config = config();
        let mut previous = f64::NEG_INFINITY;
        for i in 0..=600 {
            let angle = angle_for_speed(&config, i as f64 * 0.5);
            assert!(angle >= previous);
            assert!(angle >= config.min_angle && angle <= config.max_angle + EPS);
            previous = angle;
        }
    }

    #[test]
    fn test_negative_speed_pins_to_min_angle() {
        let config = config();
        assert_eq!(angle_for_speed(&config, -50.0), config.min_angle);
        assert_eq!(angle_for_speed(&config, -0.001), config.min_angle);
    }

    #[test]
    fn test_over_max_speed_extrapolates() {
        let config = config();
        assert!(angle_for_speed(&config, 301.0) > config.max_angle);
        assert_close(angle_for_speed(&config, 600.0), config.min_angle + 3.0 * PI);
    }

    #[test]
    fn test_half_speed_points_straight_up() {
        let angle = angle_for_speed(&config(), 150.0);
        assert_close(angle.to_degrees(), 270.0);
    }

    #[test]
    fn test_tick_speeds_include_floor_of_max() {
        let speeds: Vec<u32> = tick_speeds(300.0, 20).collect();
        assert_eq!(speeds.len(), 16);
        assert_eq!(speeds.first(), Some(&0));
        assert_eq!(speeds.last(), Some(&300));

        let speeds: Vec<u32> = tick_speeds(99.9, 20).collect();
        assert_eq!(speeds, vec![0, 20, 40, 60, 80]);
    }

    #[test]
    fn test_minor_ticks_overlap_major_ticks() {
        let layout = GaugeLayout::compute(&config(), &Appearance::default(), Bounds::square(300.0));
        assert_eq!(layout.ticks(TickKind::Major).len(), 16);
        assert_eq!(layout.ticks(TickKind::Minor).len(), 61);
        for major in &layout.major_ticks {
            assert!(layout
                .minor_ticks
                .iter()
                .any(|minor| minor.speed == major.speed && minor.outer == major.outer));
        }
    }

    #[test]
    fn test_tick_segment_endpoints() {
        let bounds = Bounds::square(200.0);
        let ticks = tick_marks(&config(), bounds, 20, 0.88);
        let center = Point::new(100.0, 100.0);
        for tick in &ticks {
            assert_close(tick.outer.distance(center), 100.0);
            assert_close(tick.inner.distance(center), 88.0);
        }
        // Zero sits at 135 degrees: lower left of the dial.
        let zero = ticks[0];
        assert!(zero.outer.x < center.x && zero.outer.y > center.y);
    }

    #[test]
    fn test_labels_follow_major_ticks() {
        let config = config();
        let mut labels = labels_for(&config);
        assert_eq!(labels.len(), 16);
        assert_eq!(labels[0].text, "0");
        assert_eq!(labels[15].text, "300");

        place_labels(&mut labels, &config, Bounds::square(300.0), 0.76);
        let center = Point::new(150.0, 150.0);
        for label in &labels {
            assert_close(label.center.distance(center), 150.0 * 0.76);
        }
    }

    #[test]
    fn test_resize_scales_positions() {
        let config = config();
        let appearance = Appearance::default();
        let small = GaugeLayout::compute(&config, &appearance, Bounds::square(100.0));
        let large = GaugeLayout::compute(&config, &appearance, Bounds::square(300.0));
        for (a, b) in small.major_ticks.iter().zip(&large.major_ticks) {
            assert_eq!(a.angle, b.angle);
            assert_close(a.outer.x * 3.0, b.outer.x);
            assert_close(a.outer.y * 3.0, b.outer.y);
            assert_close(a.inner.x * 3.0, b.inner.x);
        }
    }

    #[test]
    fn test_needle_pivots_near_base() {
        let needle = NeedleGeometry::new(Bounds::square(300.0), &Appearance::default());
        assert_close(needle.length, 150.0);
        assert_close(needle.thickness, 9.0);

        let polygon = needle.polygon(0.0);
        // Tip corners sit 80% of the length ahead of the pivot, base 20% behind.
        assert_close(polygon[0].x, 150.0 + 120.0);
        assert_close(polygon[1].x, 150.0 + 120.0);
        assert_close(polygon[2].x, 150.0 - 30.0);
        assert_close(polygon[3].x, 150.0 - 30.0);
        assert_close(polygon[0].y, 150.0 - 1.8);
        assert_close(polygon[1].y, 150.0 + 1.8);
    }

    #[test]
    fn test_needle_rotation_moves_tip_along_circle() {
        let needle = NeedleGeometry::new(Bounds::square(300.0), &Appearance::default());
        let angle = angle_for_speed(&config(), 150.0);
        let polygon = needle.polygon(angle);
        let tip = Point::new(
            (polygon[0].x + polygon[1].x) / 2.0,
            (polygon[0].y + polygon[1].y) / 2.0,
        );
        // Straight up, 80% of the length above the pivot.
        assert_close(tip.x, 150.0);
        assert_close(tip.y, 150.0 - 120.0);
        assert_close(tip.distance(needle.position), 120.0);
    }

    #[test]
    fn test_tick_speeds_at_largest_max_speed() {
        let speeds: Vec<u32> = tick_speeds(u32::MAX as f64, u32::MAX).collect();
        assert_eq!(speeds, vec![0, u32::MAX]);

        let speeds: Vec<u32> = tick_speeds(u32::MAX as f64, 1 << 31).collect();
        assert_eq!(speeds, vec![0, 1 << 31]);
    }

    #[test]
    fn test_label_origin_centres_extent() {
        let mut label = Label::new(120);
        label.center = Point::new(50.0, 40.0);
        assert_eq!(label.origin(), label.center);
        label.extent = Bounds::new(30.0, 12.0);
        assert_eq!(label.origin(), Point::new(35.0, 34.0));
    }
}
