//! Procedural texture synthesis
//!
//! Every ship section gets three co-registered RGBA8 layers: color, a
//! tangent-space normal map and an emissive map. Sections are drawn from a
//! seeded `ShipRng`, so the same parameters and ship name always give
//! byte-identical rasters.
//!
//! # Example
//! ```no_run
//! use shipwright::params::ShipShapeParameters;
//! use shipwright::texture::{build_section, Section};
//!
//! let params = ShipShapeParameters::default();
//! let saucer = build_section(Section::Saucer, &params, "USS Example");
//! assert_eq!(saucer.color.width, saucer.normal.width);
//! ```

pub mod decal;
pub mod font;
pub mod label;
pub mod mirror;
pub mod plating;
pub mod raster;
pub mod sections;
pub mod windows;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::params::{Color, ShipShapeParameters};

// Core type
pub use self::buffer::TextureBuffer;

pub use decal::{arc_band_path, draw_decal, insignia_path, pennant_path, Decal};
pub use label::{draw_label, LabelLayout, LabelStyle};
pub use mirror::mirror_bilateral;
pub use plating::{grid_plating, polar_plating, greebles, PlateStyle, PolarRegion};
pub use raster::{Extent, Mask};
pub use sections::{SectionParams, SectionReport};
pub use windows::{draw_windows, WindowCounts, WindowSite, WindowStyle};

/// Flat tangent-space normal: pointing straight out of the surface
pub const FLAT_NORMAL: [u8; 4] = [128, 128, 255, 255];

/// Opaque black, the emissive background
pub const NO_GLOW: [u8; 4] = [0, 0, 0, 255];

mod buffer {
    use super::raster::Extent;

    /// RGBA texture buffer
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct TextureBuffer {
        /// Width in pixels
        pub width: u32,
        /// Height in pixels
        pub height: u32,
        /// RGBA pixel data (4 bytes per pixel, row-major order)
        pub pixels: Vec<u8>,
    }

    impl TextureBuffer {
        /// Create a new texture buffer initialized to transparent black
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                pixels: vec![0u8; (width * height * 4) as usize],
            }
        }

        /// Create a texture buffer filled with a solid color
        pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
            let mut buffer = Self::new(width, height);
            for chunk in buffer.pixels.chunks_exact_mut(4) {
                chunk.copy_from_slice(&color);
            }
            buffer
        }

        pub fn extent(&self) -> Extent {
            Extent {
                width: self.width,
                height: self.height,
            }
        }

        /// Get pixel at (x, y)
        #[inline]
        pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
            let idx = ((y * self.width + x) * 4) as usize;
            [
                self.pixels[idx],
                self.pixels[idx + 1],
                self.pixels[idx + 2],
                self.pixels[idx + 3],
            ]
        }

        /// Set pixel at (x, y)
        #[inline]
        pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
            let idx = ((y * self.width + x) * 4) as usize;
            self.pixels[idx..idx + 4].copy_from_slice(&color);
        }

        /// Get mutable reference to pixel data at (x, y)
        #[inline]
        pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
            let idx = ((y * self.width + x) * 4) as usize;
            &mut self.pixels[idx..idx + 4]
        }
    }
}

/// How the renderer should sample outside `[0, 1]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Addressing {
    /// Wraparound-mapped (lathed) parts
    Repeat,
    /// Planar-projected parts
    Clamp,
}

/// Color, normal and emissive layers of one section
#[derive(Clone, Debug, PartialEq)]
pub struct TextureSet {
    pub color: TextureBuffer,
    pub normal: TextureBuffer,
    pub emissive: TextureBuffer,
    pub addressing: Addressing,
}

impl TextureSet {
    /// Base-colored color layer, flat normals, no glow
    pub fn new(width: u32, height: u32, base: Color, addressing: Addressing) -> Self {
        Self {
            color: TextureBuffer::filled(width, height, base.rgba()),
            normal: TextureBuffer::filled(width, height, FLAT_NORMAL),
            emissive: TextureBuffer::filled(width, height, NO_GLOW),
            addressing,
        }
    }

    pub fn extent(&self) -> Extent {
        self.color.extent()
    }
}

/// Encode a normal tilted toward `dir` (pixel space, y down) by `strength`
/// channel steps
pub fn tilted_normal(dir: glam::Vec2, strength: f32) -> [u8; 4] {
    let dir = dir.normalize_or_zero();
    let nx = (dir.x * strength / 127.0).clamp(-1.0, 1.0);
    let ny = (-dir.y * strength / 127.0).clamp(-1.0, 1.0);
    let nz = (1.0 - nx * nx - ny * ny).max(0.0).sqrt();
    let encode = |n: f32| (128.0 + n * 127.0).round().clamp(0.0, 255.0) as u8;
    [encode(nx), encode(ny), encode(nz), 255]
}

/// Texture region of the ship
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Deflector housing and pylons
    Hull,
    Saucer,
    Nacelle,
    Engineering,
    Neck,
    Bridge,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Hull,
        Section::Saucer,
        Section::Nacelle,
        Section::Engineering,
        Section::Neck,
        Section::Bridge,
    ];

    /// Lower-case name used for exported files
    pub fn name(self) -> &'static str {
        match self {
            Section::Hull => "hull",
            Section::Saucer => "saucer",
            Section::Nacelle => "nacelle",
            Section::Engineering => "engineering",
            Section::Neck => "neck",
            Section::Bridge => "bridge",
        }
    }

    /// Fixed raster size (width, height)
    pub fn resolution(self) -> (u32, u32) {
        match self {
            // Top face above bottom face
            Section::Saucer => (1024, 2048),
            Section::Engineering => (1024, 1024),
            Section::Nacelle => (512, 1024),
            Section::Hull | Section::Neck | Section::Bridge => (512, 512),
        }
    }

    pub fn addressing(self) -> Addressing {
        match self {
            Section::Saucer | Section::Bridge => Addressing::Clamp,
            _ => Addressing::Repeat,
        }
    }

    /// Per-section stream salt, so sections sharing a seed do not share draws
    pub(crate) fn salt(self) -> u32 {
        match self {
            Section::Hull => 1,
            Section::Saucer => 2,
            Section::Nacelle => 3,
            Section::Engineering => 4,
            Section::Neck => 5,
            Section::Bridge => 6,
        }
    }
}

/// Every section's texture set, in `Section::ALL` order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShipTextures {
    pub sections: Vec<(Section, Arc<TextureSet>)>,
}

impl ShipTextures {
    pub fn get(&self, section: Section) -> Option<&Arc<TextureSet>> {
        self.sections
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, set)| set)
    }
}

/// Draw one section's texture set
pub fn build_section(section: Section, params: &ShipShapeParameters, name: &str) -> TextureSet {
    build_section_with_report(section, params, name).0
}

/// Draw one section and report what was placed on it
pub fn build_section_with_report(
    section: Section,
    params: &ShipShapeParameters,
    name: &str,
) -> (TextureSet, SectionReport) {
    let subset = SectionParams::extract(section, params, name);
    let (set, report) = sections::draw(&subset);
    debug!(
        "textured {}: {}x{}, {} of {} windows ({} lit), {} labels",
        section.name(),
        set.color.width,
        set.color.height,
        report.windows.drawn,
        report.windows.candidates,
        report.windows.lit,
        report.labels
    );
    (set, report)
}

/// Draw every section
pub fn build_textures(params: &ShipShapeParameters, name: &str) -> ShipTextures {
    ShipTextures {
        sections: Section::ALL
            .iter()
            .map(|&section| (section, Arc::new(build_section(section, params, name))))
            .collect(),
    }
}
