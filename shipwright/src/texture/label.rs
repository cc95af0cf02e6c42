//! Registry and name lettering
//!
//! Straight labels are one transform: move to the anchor, rotate, draw the
//! run centered there. Curved labels place each glyph on a virtual arc whose
//! radius is the canvas size divided by the curve amount; a glyph's arc angle
//! is offset from the anchor angle by its accumulated advance. Angles taken
//! from parameters are degrees, measured from +X toward +Y in pixel space.

use glam::Vec2;

use super::font::{self, ADVANCE};
use super::raster::{self, Extent};
use super::TextureBuffer;
use crate::params::{Color, LabelOrientation};

/// Below this curve amount a curved label is laid out straight
const MIN_CURVE: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelStyle {
    /// Pixels per glyph cell
    pub scale: f32,
    pub color: Color,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LabelLayout {
    /// Centered on `anchor`, baseline turned `angle` degrees
    Straight { anchor: Vec2, angle: f32 },
    /// Centered on the point `radius` from `center` at `angle` degrees,
    /// bent along an arc of radius `canvas size / curve`
    Curved {
        center: Vec2,
        radius: f32,
        angle: f32,
        curve: f32,
        orientation: LabelOrientation,
    },
}

/// Glyph centers and rotations (radians) for `text`
pub fn layout(text: &str, layout: LabelLayout, scale: f32, extent: Extent) -> Vec<(char, Vec2, f32)> {
    let advance = ADVANCE as f32 * scale;
    let count = text.chars().count();
    let total = advance * count as f32;
    // Distance of each glyph center from the middle of the run
    let offsets = (0..count).map(move |i| (i as f32 + 0.5) * advance - total * 0.5);

    match layout {
        LabelLayout::Straight { anchor, angle } => {
            let rotation = angle.to_radians();
            let dir = Vec2::from_angle(rotation);
            text.chars()
                .zip(offsets)
                .map(|(c, s)| (c, anchor + dir * s, rotation))
                .collect()
        }
        LabelLayout::Curved {
            center,
            radius,
            angle,
            curve,
            orientation,
        } => {
            let theta = angle.to_radians();
            let outward = Vec2::from_angle(theta);
            let anchor = center + outward * radius;
            // Glyph "up" along the arc normal, or locked to the canvas
            let rotation = |alpha: f32| match orientation {
                LabelOrientation::Outward => alpha + std::f32::consts::FRAC_PI_2,
                LabelOrientation::Inward => alpha - std::f32::consts::FRAC_PI_2,
                LabelOrientation::Upright => 0.0,
            };
            // Inward glyphs read with decreasing arc angle
            let reading = match orientation {
                LabelOrientation::Inward => -1.0,
                _ => 1.0,
            };

            if !curve.is_finite() || curve.abs() < MIN_CURVE {
                let r = rotation(theta);
                let dir = Vec2::new(-outward.y, outward.x) * reading;
                return text
                    .chars()
                    .zip(offsets)
                    .map(|(c, s)| (c, anchor + dir * s, r))
                    .collect();
            }

            let arc_radius = extent.width.max(extent.height) as f32 / curve;
            let arc_center = anchor - outward * arc_radius;
            text.chars()
                .zip(offsets)
                .map(|(c, s)| {
                    let alpha = theta + reading * s / arc_radius;
                    (c, arc_center + Vec2::from_angle(alpha) * arc_radius, rotation(alpha))
                })
                .collect()
        }
    }
}

/// Draw `text` onto `buffer`; returns the number of glyphs placed
pub fn draw_label(buffer: &mut TextureBuffer, text: &str, placement: LabelLayout, style: &LabelStyle) -> usize {
    if !(style.scale > 0.0) {
        return 0;
    }
    let extent = buffer.extent();
    let color = style.color.rgba();
    let glyphs = layout(text, placement, style.scale, extent);
    for (c, at, rotation) in &glyphs {
        let rows = font::glyph(*c);
        raster::glyph(extent, &rows, *at, style.scale, *rotation, |x, y| {
            buffer.set_pixel(x, y, color)
        });
    }
    glyphs.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Extent = Extent {
        width: 256,
        height: 256,
    };

    fn curved(curve: f32, orientation: LabelOrientation) -> LabelLayout {
        LabelLayout::Curved {
            center: Vec2::splat(128.0),
            radius: 100.0,
            angle: 90.0,
            curve,
            orientation,
        }
    }

    #[test]
    fn test_straight_label_is_centered() {
        let glyphs = layout("ABC", LabelLayout::Straight { anchor: Vec2::splat(50.0), angle: 0.0 }, 2.0, CANVAS);
        assert_eq!(glyphs.len(), 3);
        assert!((glyphs[1].1 - Vec2::splat(50.0)).length() < 1e-4);
        assert!((glyphs[0].1.x - 38.0).abs() < 1e-4);
        assert!(glyphs.iter().all(|g| g.2 == 0.0));
    }

    #[test]
    fn test_zero_curve_falls_back_to_straight() {
        let glyphs = layout("NCC", curved(0.0, LabelOrientation::Outward), 2.0, CANVAS);
        // Anchor straight below the center; glyphs share one row
        let y = glyphs[0].1.y;
        assert!((y - 228.0).abs() < 1e-3);
        assert!(glyphs.iter().all(|g| (g.1.y - y).abs() < 1e-3));
    }

    #[test]
    fn test_curved_glyphs_lie_on_arc() {
        let curve = 2.0;
        let glyphs = layout("REGISTRY", curved(curve, LabelOrientation::Outward), 2.0, CANVAS);
        let arc_radius = 256.0 / curve;
        let anchor = Vec2::new(128.0, 228.0);
        let arc_center = anchor - Vec2::Y * arc_radius;
        for (_, at, _) in &glyphs {
            assert!((at.distance(arc_center) - arc_radius).abs() < 1e-2);
        }
        // Even count: anchor sits between the middle two glyphs
        let mid = (glyphs[3].1 + glyphs[4].1) * 0.5;
        assert!((mid.x - anchor.x).abs() < 1e-2);
    }

    #[test]
    fn test_orientations() {
        let out = layout("AB", curved(1.0, LabelOrientation::Outward), 2.0, CANVAS);
        let inward = layout("AB", curved(1.0, LabelOrientation::Inward), 2.0, CANVAS);
        let upright = layout("AB", curved(1.0, LabelOrientation::Upright), 2.0, CANVAS);
        assert!(upright.iter().all(|g| g.2 == 0.0));
        for (o, i) in out.iter().zip(&inward) {
            // Outward and inward glyphs are turned half a turn apart
            let diff = (o.2 - i.2).rem_euclid(std::f32::consts::TAU);
            assert!((diff - std::f32::consts::PI).abs() < 0.2);
        }
        // Inward text runs the other way around the arc
        assert!((out[0].1 - inward[1].1).length() < 1e-3);
    }

    #[test]
    fn test_draw_label_paints_pixels() {
        let mut buffer = TextureBuffer::filled(64, 32, [0, 0, 0, 255]);
        let style = LabelStyle {
            scale: 2.0,
            color: Color::WHITE,
        };
        let n = draw_label(&mut buffer, "H1", LabelLayout::Straight { anchor: Vec2::new(32.0, 16.0), angle: 0.0 }, &style);
        assert_eq!(n, 2);
        assert!(buffer.pixels.chunks_exact(4).any(|p| p == [255, 255, 255, 255]));
        assert_eq!(draw_label(&mut buffer, "H1", LabelLayout::Straight { anchor: Vec2::ZERO, angle: 0.0 }, &LabelStyle { scale: 0.0, ..style }), 0);
    }
}
