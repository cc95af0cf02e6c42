//! Hard-edged coverage rasterization
//!
//! Shapes never write pixels themselves. Each one calls `plot(x, y)` for every
//! pixel whose center it covers, and the caller decides what that pixel
//! becomes on each layer. No antialiasing, so coverage is exact and the same
//! on every host.

use std::f32::consts::TAU;

use glam::Vec2;

/// Canvas size shapes are clipped against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Pixel range `[x0, x1) x [y0, y1)` covering `min..max`, clipped to the canvas
    fn clip(self, min: Vec2, max: Vec2) -> Option<(u32, u32, u32, u32)> {
        if !(min.is_finite() && max.is_finite()) {
            return None;
        }
        let x0 = (min.x - 0.5).ceil().max(0.0);
        let y0 = (min.y - 0.5).ceil().max(0.0);
        let x1 = (max.x - 0.5).ceil().min(self.width as f32);
        let y1 = (max.y - 0.5).ceil().min(self.height as f32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

#[inline]
fn center(x: u32, y: u32) -> Vec2 {
    Vec2::new(x as f32 + 0.5, y as f32 + 0.5)
}

/// Axis-aligned rectangle `min..max`
pub fn rect(extent: Extent, min: Vec2, max: Vec2, mut plot: impl FnMut(u32, u32)) {
    let Some((x0, y0, x1, y1)) = extent.clip(min, max) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            plot(x, y);
        }
    }
}

/// Closed polygon, even-odd rule, one scanline per pixel row
pub fn polygon(extent: Extent, points: &[Vec2], mut plot: impl FnMut(u32, u32)) {
    if points.len() < 3 || points.iter().any(|p| !p.is_finite()) {
        return;
    }
    let (min, max) = points
        .iter()
        .fold((Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)), |(lo, hi), p| {
            (lo.min(*p), hi.max(*p))
        });
    let Some((_, y0, _, y1)) = extent.clip(min, max) else {
        return;
    };

    let mut crossings = Vec::new();
    for y in y0..y1 {
        let sy = y as f32 + 0.5;
        crossings.clear();
        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            // Half-open so a vertex on the scanline is counted once
            if (a.y <= sy) != (b.y <= sy) {
                crossings.push(a.x + (sy - a.y) / (b.y - a.y) * (b.x - a.x));
            }
        }
        crossings.sort_by(f32::total_cmp);
        for span in crossings.chunks_exact(2) {
            let x0 = (span[0] - 0.5).ceil().max(0.0);
            let x1 = (span[1] - 0.5).ceil().min(extent.width as f32);
            if x0 < x1 {
                for x in x0 as u32..x1 as u32 {
                    plot(x, y);
                }
            }
        }
    }
}

/// True when `angle` lies on the counter-clockwise (increasing-angle) sweep
/// from `start` spanning `sweep` radians
#[inline]
fn in_sweep(angle: f32, start: f32, sweep: f32) -> bool {
    if sweep >= TAU {
        return true;
    }
    (angle - start).rem_euclid(TAU) <= sweep
}

/// Filled annulus sector between radii `inner..outer`, angles in radians
/// measured from +X toward +Y (pixel space, so clockwise on screen)
pub fn ring_sector(
    extent: Extent,
    center_point: Vec2,
    inner: f32,
    outer: f32,
    start: f32,
    sweep: f32,
    mut plot: impl FnMut(u32, u32),
) {
    if !(outer > inner.max(0.0)) || !(sweep > 0.0) {
        return;
    }
    let pad = Vec2::splat(outer);
    let Some((x0, y0, x1, y1)) = extent.clip(center_point - pad, center_point + pad) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            let d = center(x, y) - center_point;
            let r = d.length();
            if r >= inner && r < outer && in_sweep(d.y.atan2(d.x), start, sweep) {
                plot(x, y);
            }
        }
    }
}

/// Rotated 5x7 bitmap glyph centered on `at`
///
/// `scale` is the size of one glyph cell in pixels and `angle` (radians)
/// rotates the glyph's right-pointing baseline toward +Y.
pub fn glyph(
    extent: Extent,
    rows: &[u8; 7],
    at: Vec2,
    scale: f32,
    angle: f32,
    mut plot: impl FnMut(u32, u32),
) {
    const COLS: f32 = 5.0;
    const ROWS: f32 = 7.0;
    if !(scale > 0.0) || !angle.is_finite() {
        return;
    }
    let reach = Vec2::new(COLS, ROWS).length() * 0.5 * scale;
    let Some((x0, y0, x1, y1)) = extent.clip(at - Vec2::splat(reach), at + Vec2::splat(reach))
    else {
        return;
    };
    let (sin, cos) = angle.sin_cos();
    for y in y0..y1 {
        for x in x0..x1 {
            let d = center(x, y) - at;
            // Inverse rotation back into glyph space
            let local = Vec2::new(d.x * cos + d.y * sin, -d.x * sin + d.y * cos) / scale
                + Vec2::new(COLS * 0.5, ROWS * 0.5);
            if local.x < 0.0 || local.y < 0.0 || local.x >= COLS || local.y >= ROWS {
                continue;
            }
            let (col, row) = (local.x as usize, local.y as usize);
            if rows[row] >> (4 - col) & 1 == 1 {
                plot(x, y);
            }
        }
    }
}

/// Boolean clip region the size of a canvas
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    extent: Extent,
    bits: Vec<bool>,
}

impl Mask {
    pub fn empty(extent: Extent) -> Self {
        Self {
            extent,
            bits: vec![false; (extent.width * extent.height) as usize],
        }
    }

    /// Mask covering whatever `shape` plots
    pub fn from_coverage(extent: Extent, shape: impl FnOnce(&mut dyn FnMut(u32, u32))) -> Self {
        let mut mask = Self::empty(extent);
        shape(&mut |x, y| mask.bits[(y * extent.width + x) as usize] = true);
        mask
    }

    pub fn from_polygon(extent: Extent, points: &[Vec2]) -> Self {
        Self::from_coverage(extent, |plot| polygon(extent, points, plot))
    }

    /// Pixels outside the canvas are never inside the mask
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.extent.width as i64 || y >= self.extent.height as i64 {
            return false;
        }
        self.bits[(y as u32 * self.extent.width + x as u32) as usize]
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Plot every covered pixel
    pub fn plot(&self, mut plot: impl FnMut(u32, u32)) {
        for y in 0..self.extent.height {
            for x in 0..self.extent.width {
                if self.bits[(y * self.extent.width + x) as usize] {
                    plot(x, y);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Extent = Extent {
        width: 32,
        height: 32,
    };

    fn count(shape: impl FnOnce(&mut dyn FnMut(u32, u32))) -> usize {
        Mask::from_coverage(CANVAS, shape).count()
    }

    #[test]
    fn test_rect_covers_pixel_centers() {
        let n = count(|p| rect(CANVAS, Vec2::new(2.0, 3.0), Vec2::new(6.0, 5.0), p));
        assert_eq!(n, 8);
    }

    #[test]
    fn test_rect_clips_to_canvas() {
        let n = count(|p| rect(CANVAS, Vec2::splat(-10.0), Vec2::splat(100.0), p));
        assert_eq!(n, 32 * 32);
        assert_eq!(count(|p| rect(CANVAS, Vec2::splat(40.0), Vec2::splat(50.0), p)), 0);
    }

    #[test]
    fn test_polygon_square_matches_rect() {
        let square = [
            Vec2::new(4.0, 4.0),
            Vec2::new(12.0, 4.0),
            Vec2::new(12.0, 12.0),
            Vec2::new(4.0, 12.0),
        ];
        assert_eq!(count(|p| polygon(CANVAS, &square, p)), 64);
    }

    #[test]
    fn test_polygon_even_odd_hole() {
        // Outer square with an inner square traced in the same path
        let path = [
            Vec2::new(0.0, 0.0),
            Vec2::new(20.0, 0.0),
            Vec2::new(20.0, 20.0),
            Vec2::new(0.0, 20.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(5.0, 5.0),
            Vec2::new(5.0, 15.0),
            Vec2::new(15.0, 15.0),
            Vec2::new(15.0, 5.0),
            Vec2::new(5.0, 5.0),
        ];
        let mask = Mask::from_polygon(CANVAS, &path);
        assert!(mask.contains(2, 10));
        assert!(!mask.contains(10, 10));
    }

    #[test]
    fn test_degenerate_shapes_plot_nothing() {
        assert_eq!(count(|p| polygon(CANVAS, &[Vec2::ZERO, Vec2::ONE], p)), 0);
        let nan = [Vec2::ZERO, Vec2::new(f32::NAN, 1.0), Vec2::ONE];
        assert_eq!(count(|p| polygon(CANVAS, &nan, p)), 0);
        assert_eq!(count(|p| ring_sector(CANVAS, Vec2::splat(16.0), 5.0, 5.0, 0.0, TAU, p)), 0);
    }

    #[test]
    fn test_ring_sector_quarter() {
        let full = count(|p| ring_sector(CANVAS, Vec2::splat(16.0), 4.0, 12.0, 0.0, TAU, p));
        let quarter = count(|p| {
            ring_sector(CANVAS, Vec2::splat(16.0), 4.0, 12.0, 0.0, TAU / 4.0, p)
        });
        assert!((quarter as f32 - full as f32 / 4.0).abs() < 12.0);
        let mask = Mask::from_coverage(CANVAS, |p| {
            ring_sector(CANVAS, Vec2::splat(16.0), 4.0, 12.0, 0.0, TAU / 4.0, p)
        });
        // +Y is down in pixel space
        assert!(mask.contains(20, 20));
        assert!(!mask.contains(12, 12));
    }

    #[test]
    fn test_glyph_rotation() {
        let bar = [0b11111, 0, 0, 0, 0, 0, 0];
        let flat = Mask::from_coverage(CANVAS, |p| glyph(CANVAS, &bar, Vec2::splat(16.0), 2.0, 0.0, p));
        assert_eq!(flat.count(), 20);
        // Top row sits above the center
        assert!(flat.contains(16, 10));

        let turned = Mask::from_coverage(CANVAS, |p| {
            glyph(CANVAS, &bar, Vec2::splat(16.0), 2.0, std::f32::consts::FRAC_PI_2, p)
        });
        assert_eq!(turned.count(), 20);
        // A quarter turn toward +Y puts the top row on the right
        assert!(turned.contains(22, 16));
    }
}
