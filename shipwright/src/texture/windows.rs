//! Window fields
//!
//! Sections lay out candidate sites (bands around a saucer, lanes along a
//! hull, grids on a flat face) and `draw_windows` decides which of them
//! become windows and which of those are lit.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::Serialize;

use super::raster;
use super::TextureSet;
use crate::params::Color;
use crate::rng::ShipRng;

/// Axis-aligned window rectangle centered on `center`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowSite {
    pub center: Vec2,
    pub size: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WindowStyle {
    /// Probability a candidate site gets a window
    pub density: f32,
    /// Probability a placed window is lit
    pub lit_fraction: f32,
    pub glass: Color,
    pub lit_a: Color,
    pub lit_b: Color,
}

/// What `draw_windows` placed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowCounts {
    pub candidates: usize,
    pub drawn: usize,
    pub lit: usize,
}

/// Realize each site with probability `density`; lit windows glow in one
/// of the two lit colors, chosen at random
pub fn draw_windows(
    set: &mut TextureSet,
    rng: &mut ShipRng,
    sites: impl IntoIterator<Item = WindowSite>,
    style: &WindowStyle,
) -> WindowCounts {
    let mut counts = WindowCounts::default();
    let extent = set.extent();
    for site in sites {
        counts.candidates += 1;
        if !rng.chance(style.density) {
            continue;
        }
        counts.drawn += 1;
        let lit = rng.chance(style.lit_fraction).then(|| {
            if rng.chance(0.5) {
                style.lit_a
            } else {
                style.lit_b
            }
        });
        if lit.is_some() {
            counts.lit += 1;
        }

        let half = site.size * 0.5;
        raster::rect(extent, site.center - half, site.center + half, |x, y| {
            set.color.set_pixel(x, y, style.glass.rgba());
            if let Some(glow) = lit {
                set.emissive.set_pixel(x, y, glow.rgba());
            }
        });
    }
    counts
}

/// Sites evenly spaced around a ring, over `sweep` radians from `start`
pub fn band_sites(
    center: Vec2,
    radius: f32,
    start: f32,
    sweep: f32,
    count: u32,
    size: Vec2,
) -> impl Iterator<Item = WindowSite> {
    let step = if sweep >= TAU {
        sweep / count.max(1) as f32
    } else {
        sweep / count.saturating_sub(1).max(1) as f32
    };
    (0..count).map(move |i| {
        let a = start + step * i as f32;
        WindowSite {
            center: center + Vec2::new(a.cos(), a.sin()) * radius,
            size,
        }
    })
}

/// Sites evenly spaced along a line from `from` to `to`, ends included
pub fn lane_sites(from: Vec2, to: Vec2, count: u32, size: Vec2) -> impl Iterator<Item = WindowSite> {
    let step = (to - from) / count.saturating_sub(1).max(1) as f32;
    (0..count).map(move |i| WindowSite {
        center: from + step * i as f32,
        size,
    })
}

/// `cols` x `rows` sites filling `min..max`, one per cell center
pub fn grid_sites(min: Vec2, max: Vec2, cols: u32, rows: u32, size: Vec2) -> impl Iterator<Item = WindowSite> {
    let cell = (max - min) / Vec2::new(cols.max(1) as f32, rows.max(1) as f32);
    (0..rows).flat_map(move |r| {
        (0..cols).map(move |c| WindowSite {
            center: min + cell * Vec2::new(c as f32 + 0.5, r as f32 + 0.5),
            size,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{Addressing, NO_GLOW};

    fn style(density: f32, lit_fraction: f32) -> WindowStyle {
        WindowStyle {
            density,
            lit_fraction,
            glass: Color::rgb(20, 20, 30),
            lit_a: Color::rgb(255, 220, 150),
            lit_b: Color::rgb(180, 220, 255),
        }
    }

    fn canvas() -> TextureSet {
        TextureSet::new(64, 64, Color::WHITE, Addressing::Repeat)
    }

    #[test]
    fn test_density_zero_draws_nothing() {
        let mut set = canvas();
        let mut rng = ShipRng::new(7);
        let sites = grid_sites(Vec2::ZERO, Vec2::splat(64.0), 8, 8, Vec2::splat(4.0));
        let counts = draw_windows(&mut set, &mut rng, sites, &style(0.0, 1.0));
        assert_eq!(counts, WindowCounts { candidates: 64, drawn: 0, lit: 0 });
        assert!(set.color.pixels.chunks_exact(4).all(|p| p == [255, 255, 255, 255]));
    }

    #[test]
    fn test_density_one_fills_every_site() {
        let mut set = canvas();
        let mut rng = ShipRng::new(7);
        let sites = grid_sites(Vec2::ZERO, Vec2::splat(64.0), 8, 8, Vec2::splat(4.0));
        let counts = draw_windows(&mut set, &mut rng, sites, &style(1.0, 0.0));
        assert_eq!(counts.drawn, 64);
        assert_eq!(counts.lit, 0);
        assert_eq!(set.color.get_pixel(4, 4), [20, 20, 30, 255]);
        assert_eq!(set.emissive.get_pixel(4, 4), NO_GLOW);
    }

    #[test]
    fn test_lit_windows_glow_in_configured_colors() {
        let mut set = canvas();
        let mut rng = ShipRng::new(11);
        let s = style(1.0, 1.0);
        let sites = lane_sites(Vec2::new(4.0, 32.0), Vec2::new(60.0, 32.0), 8, Vec2::splat(3.0));
        let counts = draw_windows(&mut set, &mut rng, sites, &s);
        assert_eq!(counts.lit, 8);
        let glow = set.emissive.get_pixel(4, 32);
        assert!(glow == s.lit_a.rgba() || glow == s.lit_b.rgba());
    }

    #[test]
    fn test_band_sites_on_ring() {
        let sites: Vec<_> = band_sites(Vec2::splat(32.0), 10.0, 0.0, TAU, 12, Vec2::ONE).collect();
        assert_eq!(sites.len(), 12);
        for site in &sites {
            assert!((site.center.distance(Vec2::splat(32.0)) - 10.0).abs() < 1e-4);
        }
        // Full turn does not double the first site
        assert!(sites[0].center.distance(sites[11].center) > 1.0);
    }
}
