use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sa_core::model::{Direction, Repeat, Scene};
use sa_export::{ExportMode, ExportOptions};

#[derive(Parser, Debug)]
#[command(name = "sa-cli", version, about = "Export SVG Animator scenes as animated SVG")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Animate a static SVG with a saved scene.
    Export(ExportArgs),
    /// Print the animated shapes and timing of a saved scene.
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Static SVG exported from the canvas.
    #[arg(long)]
    svg: PathBuf,

    /// Saved scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// `css` (@keyframes) or `smil` (<animate> elements).
    #[arg(long, default_value = "css")]
    mode: ExportMode,

    /// Iteration count or `infinity`; defaults to the scene's setting.
    #[arg(long)]
    repeat: Option<Repeat>,

    /// `normal`, `reverse` or `alternate` (CSS only); defaults to the scene's setting.
    #[arg(long)]
    direction: Option<Direction>,

    /// Override the iteration length in seconds.
    #[arg(long)]
    duration: Option<f64>,

    /// `preserveAspectRatio` written onto the root element.
    #[arg(long)]
    preserve_aspect_ratio: Option<String>,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Saved scene JSON.
    #[arg(long)]
    scene: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn load_scene(path: &Path) -> anyhow::Result<Scene> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read scene '{}'", path.display()))?;
    Scene::from_json(&json).with_context(|| format!("parse scene '{}'", path.display()))
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.scene)?;
    let svg = std::fs::read_to_string(&args.svg)
        .with_context(|| format!("read svg '{}'", args.svg.display()))?;

    let mut options = ExportOptions::for_scene(&scene);
    if let Some(repeat) = args.repeat {
        options = options.with_repeat(repeat);
    }
    if let Some(direction) = args.direction {
        options = options.with_direction(direction);
    }
    if let Some(duration) = args.duration {
        options = options.with_total_duration(duration);
    }
    if let Some(value) = &args.preserve_aspect_ratio {
        options = options.with_preserve_aspect_ratio(value);
    }

    let animations = scene.animation_list();
    log::info!(
        "exporting {} animated shape(s) over {}s as {:?}",
        animations.len(),
        options.total_duration,
        args.mode
    );
    let animated = args
        .mode
        .render(&svg, &animations, &options)
        .with_context(|| format!("export '{}'", args.svg.display()))?;

    match &args.out {
        Some(out) => {
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(out, animated).with_context(|| format!("write svg '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{animated}"),
    }
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.scene)?;
    println!(
        "{} shape(s), {}s total, repeat {}, direction {}",
        scene.len(),
        scene.total_duration(),
        scene.playback.repeat,
        scene.playback.direction.as_str()
    );
    for descriptor in scene.animation_list() {
        let properties: Vec<&str> = descriptor.properties.iter().map(|p| p.id.as_str()).collect();
        println!(
            "  {} ({}) {}s..{}s: {}",
            descriptor.id,
            descriptor.kind,
            descriptor.start,
            descriptor.start + descriptor.duration,
            properties.join(", ")
        );
    }
    Ok(())
}
