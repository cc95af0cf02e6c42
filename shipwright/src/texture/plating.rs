//! Hull plating, panel-line grooves and greebles
//!
//! Plating is classified per pixel: each pixel center is assigned a cell and
//! its distance to the nearest cell boundaries decides whether it lands in a
//! seam, in the groove highlight/shadow pair beside one, or in the plate.

use std::f32::consts::TAU;

use glam::Vec2;

use super::raster::{self, Extent};
use super::{tilted_normal, TextureSet};
use crate::params::Color;
use crate::rng::ShipRng;

/// Normal-map tilt for the pixels beside a panel line, in channel steps
pub const GROOVE_STRENGTH: f32 = 40.0;

/// Seam width on the color layer; half falls on each side of a boundary
const SEAM_HALF: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlateStyle {
    pub base: Color,
    /// Maximum symmetric gray offset per plate
    pub variation: f32,
    /// Chance a plate merges with its predecessor (no fill, no seam between)
    pub merge_chance: f32,
    pub seam: Color,
}

/// One plate's fill and whether its leading seam is drawn
#[derive(Clone, Copy)]
struct Cell {
    color: [u8; 4],
    seam: bool,
}

fn cells(rng: &mut ShipRng, rows: u32, cols: u32, style: &PlateStyle) -> Vec<Cell> {
    let mut out: Vec<Cell> = Vec::with_capacity((rows * cols) as usize);
    for _ in 0..rows {
        for c in 0..cols {
            let merged = c > 0 && rng.chance(style.merge_chance);
            let cell = match out.last() {
                Some(prev) if merged => Cell {
                    color: prev.color,
                    seam: false,
                },
                _ => {
                    let offset = rng.signed(style.variation.max(0.0)).round() as i32;
                    Cell {
                        color: style.base.offset(offset).rgba(),
                        seam: true,
                    }
                }
            };
            out.push(cell);
        }
    }
    out
}

/// Groove tilt for a pixel `before` / `after` pixels away from the boundaries
/// on either side along `axis`. Pixels beside a seam lean toward it.
#[inline]
fn groove(before: f32, after: f32, lead: bool, trail: bool, axis: Vec2) -> (bool, Vec2) {
    if (lead && before < SEAM_HALF) || (trail && after < SEAM_HALF) {
        return (true, Vec2::ZERO);
    }
    let mut tilt = Vec2::ZERO;
    if lead && before < SEAM_HALF + 1.0 {
        tilt -= axis;
    }
    if trail && after < SEAM_HALF + 1.0 {
        tilt += axis;
    }
    (false, tilt)
}

fn paint(set: &mut TextureSet, x: u32, y: u32, cell: &Cell, seam: bool, tilt: Vec2, style: &PlateStyle) {
    if seam {
        set.color.set_pixel(x, y, style.seam.rgba());
        return;
    }
    set.color.set_pixel(x, y, cell.color);
    if tilt != Vec2::ZERO {
        set.normal.set_pixel(x, y, tilted_normal(tilt, GROOVE_STRENGTH));
    }
}

/// Rectangular plating over `min..max`, `cols` x `rows` cells
///
/// Seams are drawn on every cell's leading edges; the trailing edges of the
/// last column and row are left to the wrapped first column and row, so the
/// pattern tiles when the region is the whole canvas.
pub fn grid_plating(
    set: &mut TextureSet,
    rng: &mut ShipRng,
    min: Vec2,
    max: Vec2,
    cols: u32,
    rows: u32,
    style: &PlateStyle,
) {
    let (cols, rows) = (cols.max(1), rows.max(1));
    let table = cells(rng, rows, cols, style);
    let cell_size = (max - min) / Vec2::new(cols as f32, rows as f32);
    if !(cell_size.x > 0.0 && cell_size.y > 0.0) {
        return;
    }

    let extent = set.extent();
    raster::rect(extent, min, max, |x, y| {
        let local = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - min;
        let c = ((local.x / cell_size.x) as u32).min(cols - 1);
        let r = ((local.y / cell_size.y) as u32).min(rows - 1);
        let cell = table[(r * cols + c) as usize];
        let next = table[(r * cols + (c + 1) % cols) as usize];

        let dx = local.x - c as f32 * cell_size.x;
        let dy = local.y - r as f32 * cell_size.y;
        let (v_seam, v_tilt) = groove(dx, cell_size.x - dx, cell.seam, next.seam, Vec2::X);
        let (h_seam, h_tilt) = groove(dy, cell_size.y - dy, true, true, Vec2::Y);
        paint(set, x, y, &cell, v_seam || h_seam, v_tilt + h_tilt, style);
    });
}

/// Annulus split into rings and angular segments
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolarRegion {
    pub center: Vec2,
    pub inner: f32,
    pub outer: f32,
    pub rings: u32,
    pub segments: u32,
}

/// Ring x segment plating; odd rings are staggered by half a segment
///
/// Ring seams are drawn at every ring boundary except the outer rim.
pub fn polar_plating(set: &mut TextureSet, rng: &mut ShipRng, region: &PolarRegion, style: &PlateStyle) {
    let rings = region.rings.max(1);
    let segments = region.segments.max(1);
    let inner = region.inner.max(0.0);
    if !(region.outer > inner) {
        return;
    }
    let table = cells(rng, rings, segments, style);
    let ring_width = (region.outer - inner) / rings as f32;
    let span = TAU / segments as f32;

    let extent: Extent = set.extent();
    raster::ring_sector(extent, region.center, inner, region.outer, 0.0, TAU, |x, y| {
        let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - region.center;
        let r = d.length();
        let i = (((r - inner) / ring_width) as u32).min(rings - 1);
        let stagger = if i % 2 == 1 { span * 0.5 } else { 0.0 };
        let a = (d.y.atan2(d.x) - stagger).rem_euclid(TAU);
        let j = ((a / span) as u32).min(segments - 1);
        let cell = table[(i * segments + j) as usize];
        let next = table[(i * segments + (j + 1) % segments) as usize];

        let radial = d / r.max(f32::EPSILON);
        let tangent = radial.perp();
        let da = (a - j as f32 * span) * r;
        let dr = r - (inner + i as f32 * ring_width);
        let (a_seam, a_tilt) = groove(da, span * r - da, cell.seam, next.seam, tangent);
        let lead_ring = i > 0 || inner > 0.0;
        let trail_ring = i + 1 < rings;
        let (r_seam, r_tilt) = groove(dr, ring_width - dr, lead_ring, trail_ring, radial);
        paint(set, x, y, &cell, a_seam || r_seam, a_tilt + r_tilt, style);
    });
}

/// Small raised boxes scattered over `min..max`; returns how many were drawn
///
/// `density` 1.0 places roughly one greeble per 32x32 pixel area.
pub fn greebles(
    set: &mut TextureSet,
    rng: &mut ShipRng,
    min: Vec2,
    max: Vec2,
    density: f32,
    style: &PlateStyle,
) -> usize {
    let area = (max - min).max(Vec2::ZERO);
    let count = (density.clamp(0.0, 4.0) * area.x * area.y / 1024.0).round() as usize;
    let extent = set.extent();
    for _ in 0..count {
        let size = Vec2::new(rng.range(3.0, 12.0), rng.range(3.0, 12.0)).round();
        let at = Vec2::new(rng.range(min.x, max.x), rng.range(min.y, max.y)).round();
        let shade = -(rng.range(6.0, 24.0).round() as i32);
        let color = style.base.offset(shade).rgba();
        let (lo, hi) = (at, (at + size).min(max));

        raster::rect(extent, lo, hi, |x, y| {
            set.color.set_pixel(x, y, color);
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let mut tilt = Vec2::ZERO;
            if p.x - lo.x < 1.0 {
                tilt -= Vec2::X;
            }
            if hi.x - p.x < 1.0 {
                tilt += Vec2::X;
            }
            if p.y - lo.y < 1.0 {
                tilt -= Vec2::Y;
            }
            if hi.y - p.y < 1.0 {
                tilt += Vec2::Y;
            }
            if tilt != Vec2::ZERO {
                set.normal.set_pixel(x, y, tilted_normal(tilt, GROOVE_STRENGTH));
            }
        });
    }
    count
}
