//! shipwright - build starship meshes and textures from a JSON design
//!
//! Writes one OBJ per part, a color/normal/emissive PNG triple per texture
//! section and a `scene.json` manifest tying them to the design's lights.

mod scene;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shipwright::params::ShipDesign;
use shipwright::{build_geometry, build_textures};

#[derive(Parser)]
#[command(name = "shipwright")]
#[command(about = "Parametric starship geometry and texture builder")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build meshes, textures and the scene manifest from a design
    Build {
        /// Design JSON (full design or flat parameter object)
        design: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "out")]
        out: PathBuf,

        /// Skip texture synthesis
        #[arg(long)]
        no_textures: bool,

        /// Skip mesh export
        #[arg(long)]
        no_geometry: bool,
    },

    /// Print the default design as JSON
    Defaults,

    /// Validate a design and report part and triangle counts
    Check {
        /// Design JSON
        design: PathBuf,

        /// Also synthesize textures
        #[arg(long)]
        textures: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            design,
            out,
            no_textures,
            no_geometry,
        } => {
            let loaded = scene::load_design(&design)?;
            tracing::info!("Building {:?} from {:?} into {:?}", loaded.name, design, out);
            let manifest = scene::build_scene(&loaded, &out, !no_geometry, !no_textures)?;
            tracing::info!(
                "Wrote {} meshes and {} texture sets",
                manifest.parts.len(),
                manifest.textures.len()
            );
        }

        Commands::Defaults => {
            let json = ShipDesign::default()
                .to_json_pretty()
                .context("Failed to serialize default design")?;
            println!("{json}");
        }

        Commands::Check { design, textures } => {
            let loaded = scene::load_design(&design)?;
            let geometry = build_geometry(&loaded.ship).context("Geometry build failed")?;
            let mut broken = Vec::new();
            for part in &geometry.parts {
                if !part.geometry.is_well_formed() || !part.geometry.is_finite() {
                    broken.push(part.kind.name());
                }
                tracing::debug!(
                    "{}: {} vertices, {} triangles",
                    part.kind.name(),
                    part.geometry.vertex_count(),
                    part.geometry.triangle_count()
                );
            }
            if !broken.is_empty() {
                anyhow::bail!("Malformed parts: {}", broken.join(", "));
            }
            tracing::info!(
                "{:?}: {} parts, {} vertices, {} triangles",
                loaded.name,
                geometry.parts.len(),
                geometry.vertex_count(),
                geometry.triangle_count()
            );

            if textures {
                let built = build_textures(&loaded.ship, &loaded.name);
                for (section, set) in &built.sections {
                    tracing::info!(
                        "{}: {}x{} ({:?})",
                        section.name(),
                        set.color.width,
                        set.color.height,
                        set.addressing
                    );
                }
            }
            tracing::info!("Design is valid!");
        }
    }

    Ok(())
}
