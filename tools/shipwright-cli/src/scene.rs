//! Design loading and the scene manifest written next to built assets

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shipwright::export::{write_obj, write_texture_set};
use shipwright::params::{looks_like_ship_design, Color, LightParameters, ShipDesign, ShipShapeParameters};
use shipwright::texture::{build_section_with_report, Addressing, SectionReport};
use shipwright::{build_geometry, Section, ShipGeometry};

/// Manifest file name inside the output directory
pub const SCENE_FILE: &str = "scene.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartEntry {
    pub name: String,
    pub mesh: String,
    pub section: Section,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glow: Option<Color>,
    pub vertices: usize,
    pub triangles: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureEntry {
    pub section: Section,
    pub addressing: Addressing,
    pub color: String,
    pub normal: String,
    pub emissive: String,
}

/// Everything a renderer needs to assemble the ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneManifest {
    pub name: String,
    pub lights: LightParameters,
    pub parts: Vec<PartEntry>,
    pub textures: Vec<TextureEntry>,
}

/// Read a design file: either a full design (`name`, `ship`, `lights`) or a
/// bare flat parameter object, which takes its name from the file stem
pub fn load_design(path: &Path) -> Result<ShipDesign> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))?;
    if !looks_like_ship_design(&value) {
        anyhow::bail!(
            "{} does not look like a ship design (needs primary_* and registry keys)",
            path.display()
        );
    }

    if value.get("ship").is_some_and(Value::is_object) {
        return serde_json::from_value(value).with_context(|| format!("Invalid design in {}", path.display()));
    }
    let ship: ShipShapeParameters =
        serde_json::from_value(value).with_context(|| format!("Invalid parameters in {}", path.display()))?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("ship")
        .to_string();
    Ok(ShipDesign {
        name,
        ship,
        lights: LightParameters::default(),
    })
}

/// Write one OBJ per part
pub fn write_parts(geometry: &ShipGeometry, out: &Path) -> Result<Vec<PartEntry>> {
    geometry
        .parts
        .iter()
        .map(|part| {
            let mesh = format!("{}.obj", part.kind.name());
            write_obj(&part.geometry, &out.join(&mesh), part.kind.name())
                .with_context(|| format!("Failed to write {mesh}"))?;
            Ok(PartEntry {
                name: part.kind.name().to_string(),
                mesh,
                section: part.section,
                glow: part.glow,
                vertices: part.geometry.vertex_count(),
                triangles: part.geometry.triangle_count(),
            })
        })
        .collect()
}

/// Draw and write every section in parallel
pub fn write_textures(design: &ShipDesign, out: &Path) -> Result<Vec<(TextureEntry, SectionReport)>> {
    Section::ALL
        .par_iter()
        .map(|&section| {
            let (set, report) = build_section_with_report(section, &design.ship, &design.name);
            let paths = write_texture_set(&set, out, section.name())
                .with_context(|| format!("Failed to write {} textures", section.name()))?;
            let file = |p: &PathBuf| {
                p.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            };
            let entry = TextureEntry {
                section,
                addressing: set.addressing,
                color: file(&paths[0]),
                normal: file(&paths[1]),
                emissive: file(&paths[2]),
            };
            Ok((entry, report))
        })
        .collect()
}

/// Build the requested outputs into `out` and write the manifest
pub fn build_scene(design: &ShipDesign, out: &Path, geometry: bool, textures: bool) -> Result<SceneManifest> {
    fs::create_dir_all(out).with_context(|| format!("Failed to create {}", out.display()))?;

    let parts = if geometry {
        let built = build_geometry(&design.ship).context("Geometry build failed")?;
        tracing::info!(
            "Built {} parts ({} vertices, {} triangles)",
            built.parts.len(),
            built.vertex_count(),
            built.triangle_count()
        );
        write_parts(&built, out)?
    } else {
        Vec::new()
    };

    let textures = if textures {
        let written = write_textures(design, out)?;
        for (entry, report) in &written {
            tracing::info!(
                "Textured {:?}: {}/{} windows, {} labels, {} decals",
                entry.section,
                report.windows.drawn,
                report.windows.candidates,
                report.labels,
                report.decals
            );
        }
        written.into_iter().map(|(entry, _)| entry).collect()
    } else {
        Vec::new()
    };

    let manifest = SceneManifest {
        name: design.name.clone(),
        lights: design.lights.clone(),
        parts,
        textures,
    };
    let path = out.join(SCENE_FILE);
    fs::write(&path, serde_json::to_string_pretty(&manifest)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_full_and_flat_designs() {
        let dir = tempfile::tempdir().unwrap();
        let design = ShipDesign {
            name: "USS Testbed".to_string(),
            ..Default::default()
        };
        let full = dir.path().join("full.json");
        fs::write(&full, design.to_json_pretty().unwrap()).unwrap();
        assert_eq!(load_design(&full).unwrap(), design);

        let flat = dir.path().join("reliant.json");
        fs::write(&flat, serde_json::to_string(&design.ship).unwrap()).unwrap();
        let loaded = load_design(&flat).unwrap();
        assert_eq!(loaded.name, "reliant");
        assert_eq!(loaded.ship, design.ship);
    }

    #[test]
    fn test_rejects_non_designs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.json");
        fs::write(&path, r#"{"width": 3}"#).unwrap();
        assert!(load_design(&path).is_err());
    }

    #[test]
    fn test_geometry_only_scene() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = build_scene(&ShipDesign::default(), dir.path(), true, false).unwrap();
        assert_eq!(manifest.parts.len(), 14);
        assert!(manifest.textures.is_empty());
        for part in &manifest.parts {
            assert!(dir.path().join(&part.mesh).exists());
        }
        assert!(manifest.parts.iter().any(|p| p.glow.is_some()));

        let written: SceneManifest =
            serde_json::from_str(&fs::read_to_string(dir.path().join(SCENE_FILE)).unwrap()).unwrap();
        assert_eq!(written, manifest);
    }
}
