use std::{
    io::Read as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use depthdrift::{
    DepthImage, ParallaxAdapter, Point, RectPx,
    adapter::{
        layers::{LayerPose, LayerStack},
        mesh::{MeshAdapter, MeshConfig},
        sprite::{SpriteAdapter, SpriteConfig},
    },
    service,
};

#[derive(Parser, Debug)]
#[command(name = "depthdrift", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sweep a synthetic pointer path across a rect and dump the resulting
    /// displacement trace as JSON.
    Trace(TraceArgs),
    /// Run the depth-estimation stub over a request JSON file.
    DepthMap(DepthMapArgs),
}

#[derive(Parser, Debug)]
struct TraceArgs {
    /// Backend to trace.
    #[arg(long, value_enum, default_value_t = BackendChoice::Sprite)]
    backend: BackendChoice,

    /// Depth map image (PNG/JPEG). Sprite and mesh backends stay neutral
    /// without one, so it defaults to a uniform synthetic field.
    #[arg(long)]
    depth: Option<PathBuf>,

    /// Reference rect width in px.
    #[arg(long, default_value_t = 640.0)]
    width: f64,

    /// Reference rect height in px.
    #[arg(long, default_value_t = 480.0)]
    height: f64,

    /// Number of pointer steps (one tick each) along the diagonal.
    #[arg(long, default_value_t = 60)]
    steps: u32,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DepthMapArgs {
    /// Request JSON file ('-' for stdin).
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Layers,
    Sprite,
    Mesh,
}

/// Concrete backends for tracing; each exposes a different typed output, so
/// the trace loop matches instead of going through the trait object.
enum TraceBackend {
    Layers(LayerStack),
    Sprite(SpriteAdapter),
    Mesh(MeshAdapter),
}

impl TraceBackend {
    fn build(choice: BackendChoice, depth: DepthImage) -> anyhow::Result<Self> {
        Ok(match choice {
            BackendChoice::Layers => Self::Layers(LayerStack::with_defaults(4)?),
            BackendChoice::Sprite => {
                let mut adapter = SpriteAdapter::new(SpriteConfig::classic())?;
                adapter.set_depth_sprite(depth);
                Self::Sprite(adapter)
            }
            BackendChoice::Mesh => {
                let mut adapter = MeshAdapter::new(MeshConfig::default())?;
                adapter.set_depth_texture(depth);
                Self::Mesh(adapter)
            }
        })
    }

    fn inner_mut(&mut self) -> &mut dyn ParallaxAdapter {
        match self {
            Self::Layers(a) => a,
            Self::Sprite(a) => a,
            Self::Mesh(a) => a,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Trace(args) => cmd_trace(args),
        Command::DepthMap(args) => cmd_depth_map(args),
    }
}

#[derive(Debug, serde::Serialize)]
struct TraceStep {
    step: u32,
    pointer: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    filter_scale: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    layers: Option<Vec<LayerPose>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mouse_uniform: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    camera: Option<[f64; 3]>,
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    let depth = load_depth(args.depth.as_deref())?;
    let mut backend = TraceBackend::build(args.backend, depth)?;

    if args.steps == 0 {
        anyhow::bail!("steps must be > 0");
    }
    let rect = RectPx::new(0.0, 0.0, args.width, args.height);

    let mut trace = Vec::with_capacity(args.steps as usize);
    for step in 0..args.steps {
        // Diagonal sweep, top-left to bottom-right.
        let t = f64::from(step) / f64::from(args.steps - 1).max(1.0);
        let client = Point::new(args.width * t, args.height * t);
        {
            let adapter = backend.inner_mut();
            adapter
                .pointer_moved(client, rect)
                .with_context(|| format!("pointer step {step}"))?;
            adapter.tick();
        }

        trace.push(snapshot(step, client, &backend));
    }

    let json = serde_json::to_string_pretty(&trace)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("write trace '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    tracing::info!(steps = args.steps, backend = ?args.backend, "trace complete");
    Ok(())
}

fn snapshot(step: u32, client: Point, backend: &TraceBackend) -> TraceStep {
    let mut record = TraceStep {
        step,
        pointer: [client.x, client.y],
        filter_scale: None,
        layers: None,
        mouse_uniform: None,
        camera: None,
    };

    match backend {
        TraceBackend::Sprite(sprite) => {
            let s = sprite.filter_scale();
            record.filter_scale = Some([s.x, s.y]);
        }
        TraceBackend::Layers(stack) => {
            record.layers = Some(stack.poses().to_vec());
        }
        TraceBackend::Mesh(mesh) => {
            let u = mesh.uniforms();
            record.mouse_uniform = Some([u.mouse.x, u.mouse.y]);
            record.camera = Some(mesh.camera_pose().position);
        }
    }

    record
}

fn load_depth(path: Option<&Path>) -> anyhow::Result<DepthImage> {
    match path {
        Some(path) => Ok(DepthImage::open(path)?),
        None => {
            // Uniform mid-depth field so traces work without assets on disk.
            let img = image::RgbaImage::from_pixel(16, 16, image::Rgba([160, 160, 160, 255]));
            Ok(DepthImage::from_image(image::DynamicImage::ImageRgba8(
                img,
            ))?)
        }
    }
}

fn cmd_depth_map(args: DepthMapArgs) -> anyhow::Result<()> {
    let body = if args.in_path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read request from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.in_path)
            .with_context(|| format!("read request '{}'", args.in_path.display()))?
    };

    let reply = service::handle_depth_map(&body);
    println!("{}", serde_json::to_string_pretty(&reply.body)?);
    if reply.status != 200 {
        anyhow::bail!("depth-map request rejected with status {}", reply.status);
    }
    Ok(())
}
