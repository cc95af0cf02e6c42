//! File export for built parts and texture sets

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::geometry::GeometryBuffer;
use crate::texture::{TextureBuffer, TextureSet};
use crate::ShipError;

/// Write a buffer as a Wavefront OBJ with positions, UVs and normals
///
/// OBJ texture space has V up, so V is flipped on the way out.
pub fn write_obj(mesh: &GeometryBuffer, path: &Path, name: &str) -> Result<(), ShipError> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    writeln!(w, "# shipwright")?;
    writeln!(w, "o {name}")?;
    for p in &mesh.positions {
        writeln!(w, "v {} {} {}", p[0], p[1], p[2])?;
    }
    let has_uvs = mesh.uvs.len() == mesh.positions.len();
    if has_uvs {
        for uv in &mesh.uvs {
            writeln!(w, "vt {} {}", uv[0], 1.0 - uv[1])?;
        }
    }
    let has_normals = mesh.normals.len() == mesh.positions.len();
    if has_normals {
        for n in &mesh.normals {
            writeln!(w, "vn {} {} {}", n[0], n[1], n[2])?;
        }
    }

    for tri in mesh.triangles() {
        let [a, b, c] = tri.map(|i| i + 1);
        match (has_uvs, has_normals) {
            (true, true) => writeln!(w, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?,
            (true, false) => writeln!(w, "f {a}/{a} {b}/{b} {c}/{c}")?,
            (false, true) => writeln!(w, "f {a}//{a} {b}//{b} {c}//{c}")?,
            (false, false) => writeln!(w, "f {a} {b} {c}")?,
        }
    }
    w.flush()?;
    Ok(())
}

/// Write a TextureBuffer to a PNG file
pub fn write_png(texture: &TextureBuffer, path: &Path) -> Result<(), ShipError> {
    let file = File::create(path)?;
    let w = BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, texture.width, texture.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&texture.pixels)?;
    writer.finish()?;
    Ok(())
}

/// Write `{stem}.png`, `{stem}_normal.png` and `{stem}_emissive.png` into
/// `dir`, returning the paths in that order
pub fn write_texture_set(set: &TextureSet, dir: &Path, stem: &str) -> Result<[PathBuf; 3], ShipError> {
    let paths = [
        dir.join(format!("{stem}.png")),
        dir.join(format!("{stem}_normal.png")),
        dir.join(format!("{stem}_emissive.png")),
    ];
    for (layer, path) in [&set.color, &set.normal, &set.emissive].into_iter().zip(&paths) {
        write_png(layer, path)?;
    }
    Ok(paths)
}
