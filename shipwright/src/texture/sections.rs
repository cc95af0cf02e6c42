//! Per-section parameter subsets and drawing recipes
//!
//! `SectionParams::extract` copies out only the fields a section's recipe
//! reads, so a cache keyed on its serialized form rebuilds a section exactly
//! when something it draws changes.
//!
//! Canvas conventions: pixel `(x, y)` samples `(u, v) = (x / width, y / height)`.
//! Planar sections (saucer, bridge) put fore at the top; lathed sections put
//! the profile's aft end at the top and run `u` once around the hull starting
//! at the keel, so the left half of the canvas is the starboard side.

use glam::Vec2;
use serde::Serialize;

use super::decal::{arc_band_path, draw_decal, insignia_path, pennant_path, Decal};
use super::label::{draw_label, LabelLayout, LabelStyle};
use super::mirror::mirror_bilateral;
use super::plating::{greebles, grid_plating, polar_plating, PlateStyle, PolarRegion};
use super::windows::{band_sites, draw_windows, grid_sites, lane_sites, WindowCounts, WindowSite, WindowStyle};
use super::{Section, TextureSet};
use crate::params::{Color, LabelOrientation, ShipShapeParameters};
use crate::rng::ShipRng;

/// Chance a plate merges with its neighbor
const MERGE_CHANCE: f32 = 0.08;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Lettering {
    pub text: String,
    pub color: Color,
    pub size: f32,
}

/// Where the saucer registry sits and how it bends
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArcPlacement {
    pub curve: f32,
    pub orientation: LabelOrientation,
    pub radius: f32,
    pub angle: f32,
}

/// Everything one section's recipe reads
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectionParams {
    pub section: Section,
    pub seed: u32,
    pub hull: Color,
    pub panel_line: Color,
    pub variation: f32,
    pub greeble_density: f32,
    pub windows: Option<WindowStyle>,
    pub registry: Option<Lettering>,
    pub registry_arc: Option<ArcPlacement>,
    pub name: Option<Lettering>,
    pub pennant: Option<Color>,
    pub insignia: Option<Color>,
    pub grille: Option<Color>,
}

/// What a section's recipe placed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionReport {
    pub windows: WindowCounts,
    pub labels: usize,
    pub decals: usize,
    pub greebles: usize,
}

impl SectionParams {
    pub fn extract(section: Section, params: &ShipShapeParameters, name: &str) -> Self {
        let windows = WindowStyle {
            density: params.window_density,
            lit_fraction: params.window_lit_fraction,
            glass: params.window_glass_color,
            lit_a: params.window_color_a,
            lit_b: params.window_color_b,
        };
        let registry = Lettering {
            text: params.registry.clone(),
            color: params.label_color,
            size: params.label_size,
        };
        let pennant = params.show_pennant.then_some(params.pennant_color);

        let mut subset = Self {
            section,
            seed: params.texture_seed,
            hull: params.hull_color,
            panel_line: params.panel_line_color,
            variation: params.panel_color_variation,
            greeble_density: params.greeble_density,
            windows: None,
            registry: None,
            registry_arc: None,
            name: None,
            pennant: None,
            insignia: None,
            grille: None,
        };
        match section {
            Section::Saucer => {
                subset.windows = Some(windows);
                subset.registry = Some(registry.clone());
                subset.registry_arc = Some(ArcPlacement {
                    curve: params.label_curve,
                    orientation: params.label_orientation,
                    radius: params.label_radius,
                    angle: params.label_angle,
                });
                subset.name = params.show_name.then(|| Lettering {
                    text: name.to_string(),
                    ..registry
                });
                subset.pennant = pennant;
                subset.insignia = params.show_insignia.then_some(params.insignia_color);
            }
            Section::Engineering => {
                subset.windows = Some(windows);
                subset.registry = Some(registry);
                subset.pennant = pennant;
            }
            Section::Nacelle => {
                subset.windows = Some(windows);
                subset.pennant = pennant;
                subset.grille = Some(params.nacelle_grille_color);
            }
            Section::Neck | Section::Bridge => subset.windows = Some(windows),
            Section::Hull => {}
        }
        subset
    }

    fn plate_style(&self) -> PlateStyle {
        PlateStyle {
            base: self.hull,
            variation: self.variation,
            merge_chance: MERGE_CHANCE,
            seam: self.panel_line,
        }
    }

}

/// Run the section's recipe
pub(crate) fn draw(subset: &SectionParams) -> (TextureSet, SectionReport) {
    let (width, height) = subset.section.resolution();
    let mut set = TextureSet::new(width, height, subset.hull, subset.section.addressing());
    let mut rng = ShipRng::for_section(subset.seed, subset.section.salt());
    let report = match subset.section {
        Section::Saucer => saucer(&mut set, &mut rng, subset),
        Section::Bridge => bridge(&mut set, &mut rng, subset),
        Section::Engineering => engineering(&mut set, &mut rng, subset),
        Section::Nacelle => nacelle(&mut set, &mut rng, subset),
        Section::Neck => neck(&mut set, &mut rng, subset),
        Section::Hull => hull(&mut set, &mut rng, subset),
    };
    (set, report)
}

fn windows_in(
    set: &mut TextureSet,
    rng: &mut ShipRng,
    subset: &SectionParams,
    sites: impl IntoIterator<Item = WindowSite>,
) -> WindowCounts {
    match &subset.windows {
        Some(style) => draw_windows(set, rng, sites, style),
        None => WindowCounts::default(),
    }
}

/// Only sites on the left half; the right half is mirrored from it
fn left_half(sites: impl Iterator<Item = WindowSite>, width: u32) -> impl Iterator<Item = WindowSite> {
    let mid = width as f32 * 0.5;
    sites.filter(move |s| s.center.x + s.size.x * 0.5 <= mid)
}

/// Top face in the upper square, bottom face in the lower one
fn saucer(set: &mut TextureSet, rng: &mut ShipRng, subset: &SectionParams) -> SectionReport {
    let mut report = SectionReport::default();
    let style = subset.plate_style();
    let w = set.color.width as f32;
    let r = w * 0.5;
    let top = Vec2::new(r, r);
    let bottom = Vec2::new(r, r * 3.0);

    for (center, rings, segments) in [(top, 7, 32), (bottom, 6, 28)] {
        let region = PolarRegion {
            center,
            inner: r * 0.12,
            outer: r,
            rings,
            segments,
        };
        polar_plating(set, rng, &region, &style);
        report.greebles += greebles(
            set,
            rng,
            center - Vec2::splat(r),
            center + Vec2::new(0.0, r),
            subset.greeble_density,
            &style,
        );
    }

    let pane = Vec2::new(10.0, 6.0);
    let full = std::f32::consts::TAU;
    let sites = band_sites(top, r * 0.9, 0.0, full, 72, pane)
        .chain(band_sites(top, r * 0.83, 0.0, full, 64, pane))
        .chain(band_sites(bottom, r * 0.8, 0.0, full, 56, pane));
    let width = set.color.width;
    report.windows = windows_in(set, rng, subset, left_half(sites, width));

    if let Some(color) = subset.pennant {
        let start = 120f32.to_radians();
        let band = arc_band_path(top, r * 0.66, r * 0.71, start, 40f32.to_radians(), 24);
        report.decals += draw_stripe(set, band, color);
    }

    mirror_bilateral(set);

    if let (Some(registry), Some(arc)) = (&subset.registry, &subset.registry_arc) {
        let placement = LabelLayout::Curved {
            center: top,
            radius: r * arc.radius,
            angle: arc.angle,
            curve: arc.curve,
            orientation: arc.orientation,
        };
        report.labels += lettering(set, registry, placement, 6.0);
    }
    if let Some(name) = &subset.name {
        let placement = LabelLayout::Straight {
            anchor: bottom + Vec2::new(0.0, r * 0.55),
            angle: 0.0,
        };
        report.labels += lettering(set, name, placement, 4.0);
    }
    if let Some(color) = subset.insignia {
        let decal = Decal {
            path: insignia_path(top - Vec2::new(0.0, r * 0.5), r * 0.14),
            fill: color,
            glow: None,
            bevel: 2,
        };
        draw_decal(set, &decal);
        report.decals += 1;
    }
    report
}

fn bridge(set: &mut TextureSet, rng: &mut ShipRng, subset: &SectionParams) -> SectionReport {
    let mut report = SectionReport::default();
    let style = subset.plate_style();
    let r = set.color.width as f32 * 0.5;
    let center = Vec2::splat(r);
    let region = PolarRegion {
        center,
        inner: r * 0.2,
        outer: r,
        rings: 4,
        segments: 16,
    };
    polar_plating(set, rng, &region, &style);
    report.greebles = greebles(set, rng, Vec2::ZERO, Vec2::new(r, r * 2.0), subset.greeble_density, &style);
    let sites = band_sites(center, r * 0.62, 0.0, std::f32::consts::TAU, 28, Vec2::new(8.0, 5.0));
    let width = set.color.width;
    report.windows = windows_in(set, rng, subset, left_half(sites, width));
    mirror_bilateral(set);
    report
}

fn engineering(set: &mut TextureSet, rng: &mut ShipRng, subset: &SectionParams) -> SectionReport {
    let mut report = SectionReport::default();
    let style = subset.plate_style();
    let size = set.extent().size();
    grid_plating(set, rng, Vec2::ZERO, size, 16, 12, &style);
    report.greebles = greebles(set, rng, Vec2::ZERO, size * Vec2::new(0.5, 1.0), subset.greeble_density, &style);

    let pane = Vec2::new(6.0, 10.0);
    let lane = |u: f32| lane_sites(size * Vec2::new(u, 0.35), size * Vec2::new(u, 0.7), 14, pane);
    let sites = lane(0.2).chain(lane(0.3));
    report.windows = windows_in(set, rng, subset, sites);

    if let Some(color) = subset.pennant {
        let stripe = pennant_path(size * Vec2::new(0.16, 0.3), size * Vec2::new(0.16, 0.78), 14.0, 10.0);
        report.decals += draw_stripe(set, stripe, color);
    }

    mirror_bilateral(set);

    // Drawn per side after mirroring so neither copy reads backwards
    if let Some(registry) = &subset.registry {
        for (u, angle) in [(0.25, 90.0), (0.75, -90.0)] {
            let placement = LabelLayout::Straight {
                anchor: size * Vec2::new(u, 0.52),
                angle,
            };
            report.labels += lettering(set, registry, placement, 4.0);
        }
    }
    report
}

fn nacelle(set: &mut TextureSet, rng: &mut ShipRng, subset: &SectionParams) -> SectionReport {
    let mut report = SectionReport::default();
    let style = subset.plate_style();
    let size = set.extent().size();
    grid_plating(set, rng, Vec2::ZERO, size, 8, 16, &style);
    report.greebles = greebles(set, rng, Vec2::ZERO, size * Vec2::new(0.5, 1.0), subset.greeble_density, &style);

    let sites = lane_sites(size * Vec2::new(0.1, 0.3), size * Vec2::new(0.1, 0.7), 6, Vec2::new(5.0, 8.0));
    report.windows = windows_in(set, rng, subset, sites);

    if let Some(grille) = subset.grille {
        let (lo, hi) = (size * Vec2::new(0.21, 0.25), size * Vec2::new(0.29, 0.86));
        let decal = Decal {
            path: vec![lo, Vec2::new(hi.x, lo.y), hi, Vec2::new(lo.x, hi.y)],
            fill: grille.scaled(0.6),
            glow: Some(grille),
            bevel: 2,
        };
        draw_decal(set, &decal);
        report.decals += 1;
    }
    if let Some(color) = subset.pennant {
        let stripe = pennant_path(size * Vec2::new(0.42, 0.3), size * Vec2::new(0.42, 0.8), 8.0, 6.0);
        report.decals += draw_stripe(set, stripe, color);
    }

    mirror_bilateral(set);
    report
}

/// Fore and aft faces carry windows; the neck is not mirrored because its
/// quarters are faces, not halves
fn neck(set: &mut TextureSet, rng: &mut ShipRng, subset: &SectionParams) -> SectionReport {
    let mut report = SectionReport::default();
    let style = subset.plate_style();
    let size = set.extent().size();
    grid_plating(set, rng, Vec2::ZERO, size, 8, 8, &style);
    report.greebles = greebles(set, rng, Vec2::ZERO, size, subset.greeble_density, &style);

    let face = |u0: f32| {
        grid_sites(
            size * Vec2::new(u0 + 0.03, 0.15),
            size * Vec2::new(u0 + 0.22, 0.85),
            3,
            6,
            Vec2::new(8.0, 6.0),
        )
    };
    report.windows = windows_in(set, rng, subset, face(0.0).chain(face(0.5)));
    report
}

/// Deflector housing and pylons: plates and greebles only
fn hull(set: &mut TextureSet, rng: &mut ShipRng, subset: &SectionParams) -> SectionReport {
    let style = subset.plate_style();
    let size = set.extent().size();
    grid_plating(set, rng, Vec2::ZERO, size, 8, 8, &style);
    let greebles = greebles(set, rng, Vec2::ZERO, size * Vec2::new(0.5, 1.0), subset.greeble_density, &style);
    mirror_bilateral(set);
    SectionReport {
        greebles,
        ..SectionReport::default()
    }
}

fn draw_stripe(set: &mut TextureSet, path: Vec<Vec2>, color: Color) -> usize {
    let decal = Decal {
        path,
        fill: color,
        glow: None,
        bevel: 1,
    };
    draw_decal(set, &decal);
    1
}

fn lettering(set: &mut TextureSet, text: &Lettering, placement: LabelLayout, scale: f32) -> usize {
    if text.text.trim().is_empty() {
        return 0;
    }
    let style = LabelStyle {
        scale: scale * text.size,
        color: text.color,
    };
    usize::from(draw_label(&mut set.color, &text.text, placement, &style) > 0)
}
