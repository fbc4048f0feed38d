//! Build a shape from the command line, upload it and print what happened.
//!
//! ```bash
//! cargo run --example shape_stats -- cube 1 2 3
//! cargo run --example shape_stats -- --packing interleaved --colors sphere 1 32 16
//! cargo run --example shape_stats -- --positions-only cylinder 12 2 --split
//! RUST_LOG=trace cargo run --example shape_stats -- plane 4 4 8
//! ```

use clap::{Parser, Subcommand, ValueEnum};

use static_meshes::backend::UsageHint;
use static_meshes::{
    AttributeSet, Cube, Cylinder, DummyBackend, Mesh, MeshConfig, Plane, Pyramid, ShapeBuffer,
    Sphere, VertexPacking,
};

/// Attribute packing selection for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum CliPacking {
    /// Each attribute stream stored whole, one after another.
    #[default]
    Planar,
    /// One record per vertex.
    Interleaved,
}

impl From<CliPacking> for VertexPacking {
    fn from(cli: CliPacking) -> Self {
        match cli {
            CliPacking::Planar => VertexPacking::Planar,
            CliPacking::Interleaved => VertexPacking::Interleaved,
        }
    }
}

#[derive(Debug, Subcommand)]
enum ShapeArgs {
    /// Axis-aligned box.
    Cube {
        height: f32,
        width: f32,
        depth: f32,
        /// Share the 8 corners through an index buffer
        #[arg(long)]
        indexed: bool,
    },
    /// Capped cylinder along Z.
    Cylinder {
        slices: u32,
        length: f32,
        #[arg(long, default_value_t = 1.0)]
        radius: f32,
        /// Separate cap and side vertices
        #[arg(long)]
        split: bool,
    },
    /// Four-sided pyramid.
    Pyramid { height: f32, width: f32, depth: f32 },
    /// UV sphere, optionally cut at `--top` / `--bottom`.
    Sphere {
        radius: f32,
        slices: u32,
        stacks: u32,
        #[arg(long, allow_hyphen_values = true)]
        top: Option<f32>,
        #[arg(long, allow_hyphen_values = true)]
        bottom: Option<f32>,
    },
    /// Subdivided plane on XZ.
    Plane { width: f32, depth: f32, subdivisions: u32 },
}

/// Print vertex, index and byte statistics of a generated shape.
#[derive(Debug, Parser)]
#[command(name = "shape_stats", version)]
struct Args {
    #[command(subcommand)]
    shape: ShapeArgs,

    /// Attribute packing.
    #[arg(long, value_enum, default_value_t)]
    packing: CliPacking,

    /// Upload positions only.
    #[arg(long)]
    positions_only: bool,

    /// Also upload vertex colors.
    #[arg(long, conflicts_with = "positions_only")]
    colors: bool,

    /// Draw as points instead of triangles.
    #[arg(long)]
    points: bool,

    /// Print every recorded backend call.
    #[arg(long)]
    calls: bool,
}

impl Args {
    fn generate(&self) -> static_meshes::ShapeResult<ShapeBuffer> {
        Ok(match self.shape {
            ShapeArgs::Cube { height, width, depth, indexed } => {
                let cube = Cube::new(height, width, depth)?;
                if indexed { cube.generate_indexed() } else { cube.generate() }
            }
            ShapeArgs::Cylinder { slices, length, radius, split } => {
                let cylinder = Cylinder::with_radius(radius, slices, length)?;
                if split { cylinder.generate_split() } else { cylinder.generate() }
            }
            ShapeArgs::Pyramid { height, width, depth } => {
                Pyramid::new(height, width, depth)?.generate()
            }
            ShapeArgs::Sphere { radius, slices, stacks, top, bottom } => Sphere::truncated(
                radius,
                slices,
                stacks,
                top.unwrap_or(radius),
                bottom.unwrap_or(-radius),
            )?
            .generate(),
            ShapeArgs::Plane { width, depth, subdivisions } => {
                Plane::new(width, depth, subdivisions)?.generate()
            }
        })
    }

    fn config(&self) -> MeshConfig {
        let attributes = if self.positions_only {
            AttributeSet::POSITION
        } else if self.colors {
            AttributeSet::ALL
        } else {
            AttributeSet::STANDARD
        };
        MeshConfig::default()
            .with_attributes(attributes)
            .with_packing(self.packing.into())
            .with_usage(UsageHint::StaticDraw)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    static_meshes::init();

    let args = Args::parse();
    let shape = args.generate()?;
    let mut mesh = Mesh::from_shape(&shape, &args.config())?;

    let mut backend = DummyBackend::new();
    mesh.initialize(&mut backend)?;
    if args.points {
        mesh.render_points(&mut backend);
    } else {
        mesh.render(&mut backend);
    }

    let cpu = mesh.cpu_mesh();
    println!("shape:        {}", shape.label());
    println!("vertices:     {}", shape.vertex_count());
    println!("indices:      {}", shape.index_count());
    println!("triangles:    {}", shape.triangle_count());
    println!("packing:      {:?}", cpu.layout().packing);
    println!("vertex bytes: {}", cpu.vertex_byte_size());
    println!("index bytes:  {}", cpu.index_byte_size());
    for attribute in &cpu.layout().attributes {
        println!(
            "  {:?} @ location {}: offset {}, stride {}",
            attribute.semantic,
            attribute.location(),
            attribute.offset,
            attribute.stride
        );
    }

    if args.calls {
        for call in backend.calls() {
            println!("{call:?}");
        }
    }
    println!("draw calls:   {}", backend.draw_call_count());

    mesh.release(&mut backend);
    Ok(())
}
