//! Vector decals with a painted bevel
//!
//! A decal's path is filled on the color and emissive layers (black emissive
//! when it does not glow), then reused as a clip mask on the normal layer: pixels whose
//! up-left neighbor `bevel` pixels away falls outside the shape get a
//! highlight, pixels whose down-right neighbor falls outside get a shadow.

use glam::Vec2;

use super::raster::Mask;
use super::{tilted_normal, TextureSet, NO_GLOW};
use crate::params::Color;

/// Normal tilt of the bevel rim, in channel steps
pub const BEVEL_STRENGTH: f32 = 56.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Decal {
    pub path: Vec<Vec2>,
    pub fill: Color,
    pub glow: Option<Color>,
    /// Bevel width in pixels (0 disables the normal pass)
    pub bevel: u32,
}

/// Paint `decal`; returns the number of covered pixels
pub fn draw_decal(set: &mut TextureSet, decal: &Decal) -> usize {
    let mask = Mask::from_polygon(set.extent(), &decal.path);
    let fill = decal.fill.rgba();
    let glow = decal.glow.map_or(NO_GLOW, Color::rgba);
    let b = decal.bevel as i64;

    mask.plot(|x, y| {
        set.color.set_pixel(x, y, fill);
        set.emissive.set_pixel(x, y, glow);
        if b == 0 {
            return;
        }
        let (xi, yi) = (x as i64, y as i64);
        let tilt = if !mask.contains(xi - b, yi - b) {
            Some(Vec2::new(-1.0, -1.0))
        } else if !mask.contains(xi + b, yi + b) {
            Some(Vec2::new(1.0, 1.0))
        } else {
            None
        };
        if let Some(tilt) = tilt {
            set.normal.set_pixel(x, y, tilted_normal(tilt, BEVEL_STRENGTH));
        }
    });
    mask.count()
}

/// Arrowhead insignia centered on `center`, `size` pixels tall, pointing up
pub fn insignia_path(center: Vec2, size: f32) -> Vec<Vec2> {
    [
        Vec2::new(0.0, -0.5),
        Vec2::new(0.32, 0.45),
        Vec2::new(0.0, 0.22),
        Vec2::new(-0.32, 0.45),
    ]
    .iter()
    .map(|p| center + *p * size)
    .collect()
}

/// Slanted stripe from `start` to `end` (along its top edge), `height`
/// pixels tall, its trailing corners pushed back by `slant`
pub fn pennant_path(start: Vec2, end: Vec2, height: f32, slant: f32) -> Vec<Vec2> {
    let along = (end - start).normalize_or_zero();
    let down = along.perp() * height;
    let back = along * slant;
    vec![start, end, end + down - back, start + down - back]
}

/// Band between radii `inner..outer` over `sweep` radians from `start`,
/// traced with `steps` points per edge
pub fn arc_band_path(center: Vec2, inner: f32, outer: f32, start: f32, sweep: f32, steps: u32) -> Vec<Vec2> {
    let steps = steps.max(2);
    let at = |r: f32, i: u32| center + Vec2::from_angle(start + sweep * i as f32 / (steps - 1) as f32) * r;
    (0..steps)
        .map(|i| at(outer, i))
        .chain((0..steps).rev().map(|i| at(inner, i)))
        .collect()
}
