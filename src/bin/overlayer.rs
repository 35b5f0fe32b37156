use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "overlayer", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Print a summary of a scene.
    Info(InfoArgs),
    /// Convert raw GPS fixes into a trace with distance and speed.
    Trace(TraceArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Scene time in seconds.
    #[arg(long, allow_negative_numbers = true)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Sans-serif font file (TTF/OTF).
    #[arg(long)]
    font: PathBuf,

    /// Monospace font file; defaults to `--font`.
    #[arg(long)]
    mono_font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct TraceArgs {
    /// JSON array of fixes (`time`, `lat`, `lon`, optional `elevation` and `speed`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output trace JSON path; prints to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Info(args) => cmd_info(args),
        Command::Trace(args) => cmd_trace(args),
    }
}

fn load_scene(path: &Path) -> anyhow::Result<overlayer::Scene> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read scene '{}'", path.display()))?;
    let scene = overlayer::Scene::from_json(&json)
        .with_context(|| format!("parse scene '{}'", path.display()))?;
    scene
        .validate()
        .with_context(|| format!("validate scene '{}'", path.display()))?;
    Ok(scene)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.in_path)?;
    let assets_root = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let canvas = scene.canvas;

    let fonts = overlayer::FontSet::from_files(&args.font, args.mono_font.as_deref())?;
    let mut surface =
        overlayer::CpuSurface::new(canvas, &fonts, overlayer::RenderSettings::default())?;
    let mut engine = overlayer::Engine::with_assets_root(scene, assets_root);

    let outcome = engine
        .render(&mut surface, args.time)
        .with_context(|| format!("render frame at {}s", args.time))?;
    let frame = surface.finish()?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    if outcome == overlayer::RenderOutcome::Empty {
        eprintln!("nothing visible at {}s", args.time);
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.in_path)?;
    println!("canvas: {}x{}", scene.canvas.width, scene.canvas.height);
    println!("objects: {}", scene.objects.len());
    println!("traces: {}", scene.traces.len());
    println!("duration: {:.3}s", scene.max_timestamp());
    Ok(())
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read fixes '{}'", args.in_path.display()))?;
    let fixes: Vec<overlayer::Fix> = serde_json::from_str(&json)
        .with_context(|| format!("parse fixes '{}'", args.in_path.display()))?;
    let trace = overlayer::Trace::from_fixes(&fixes);
    let out = serde_json::to_string_pretty(&trace).context("serialize trace")?;

    match &args.out {
        Some(path) => {
            std::fs::write(path, out)
                .with_context(|| format!("write trace '{}'", path.display()))?;
            eprintln!("wrote {} points to {}", trace.points().len(), path.display());
        }
        None => println!("{out}"),
    }
    Ok(())
}
