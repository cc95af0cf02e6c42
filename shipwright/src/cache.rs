//! Memoized rebuilds
//!
//! `BuildCache` keeps the last geometry and the last texture set of each
//! section, keyed by an xxh3 hash of the serialized parameter subset that
//! produced them. Asking again with unchanged inputs hands back the same
//! `Arc`; a replaced output is dropped once its last holder lets go.

use std::sync::Arc;

use hashbrown::HashMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

use crate::params::ShipShapeParameters;
use crate::ship::{build_geometry, ShipGeometry};
use crate::texture::{build_section, Section, SectionParams, ShipTextures, TextureSet};
use crate::ShipError;

/// Fields only the texture sections read. Everything else feeds geometry,
/// including the deflector and bussard colors carried as part glow.
pub const LIVERY_FIELDS: &[&str] = &[
    "registry",
    "texture_seed",
    "hull_color",
    "panel_line_color",
    "panel_color_variation",
    "greeble_density",
    "window_density",
    "window_lit_fraction",
    "window_color_a",
    "window_color_b",
    "window_glass_color",
    "label_color",
    "label_curve",
    "label_orientation",
    "label_radius",
    "label_angle",
    "label_size",
    "show_name",
    "show_pennant",
    "pennant_color",
    "show_insignia",
    "insignia_color",
    "nacelle_grille_color",
];

/// Hash of a value's JSON form
pub fn content_hash<T: Serialize + ?Sized>(value: &T) -> Result<u64, ShipError> {
    Ok(xxh3_64(&serde_json::to_vec(value)?))
}

/// Hash of the geometry-relevant parameters
pub fn geometry_key(params: &ShipShapeParameters) -> Result<u64, ShipError> {
    let mut value = serde_json::to_value(params)?;
    if let Value::Object(map) = &mut value {
        for field in LIVERY_FIELDS {
            map.remove(*field);
        }
    }
    content_hash(&value)
}

/// Build and hit counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub geometry_builds: usize,
    pub geometry_hits: usize,
    pub section_builds: usize,
    pub section_hits: usize,
}

#[derive(Default)]
pub struct BuildCache {
    geometry: Option<(u64, Arc<ShipGeometry>)>,
    sections: HashMap<Section, (u64, Arc<TextureSet>)>,
    stats: CacheStats,
}

impl BuildCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Geometry for `params`, rebuilt only when a geometry field changed
    pub fn geometry(&mut self, params: &ShipShapeParameters) -> Result<Arc<ShipGeometry>, ShipError> {
        let key = geometry_key(params)?;
        if let Some((cached, geometry)) = &self.geometry {
            if *cached == key {
                self.stats.geometry_hits += 1;
                return Ok(Arc::clone(geometry));
            }
        }

        debug!("geometry cache miss ({key:016x}), rebuilding");
        let geometry = Arc::new(build_geometry(params)?);
        self.stats.geometry_builds += 1;
        self.geometry = Some((key, Arc::clone(&geometry)));
        Ok(geometry)
    }

    /// One section's textures, rebuilt only when its subset changed
    pub fn section(
        &mut self,
        section: Section,
        params: &ShipShapeParameters,
        name: &str,
    ) -> Result<Arc<TextureSet>, ShipError> {
        let key = content_hash(&SectionParams::extract(section, params, name))?;
        if let Some((cached, set)) = self.sections.get(&section) {
            if *cached == key {
                self.stats.section_hits += 1;
                return Ok(Arc::clone(set));
            }
        }

        debug!("{} texture cache miss ({key:016x}), rebuilding", section.name());
        let set = Arc::new(build_section(section, params, name));
        self.stats.section_builds += 1;
        self.sections.insert(section, (key, Arc::clone(&set)));
        Ok(set)
    }

    /// Every section's textures
    pub fn textures(&mut self, params: &ShipShapeParameters, name: &str) -> Result<ShipTextures, ShipError> {
        let sections = Section::ALL
            .iter()
            .map(|&section| Ok((section, self.section(section, params, name)?)))
            .collect::<Result<Vec<_>, ShipError>>()?;
        Ok(ShipTextures { sections })
    }

    /// Drop everything held
    pub fn clear(&mut self) {
        self.geometry = None;
        self.sections.clear();
    }
}
