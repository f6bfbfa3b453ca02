use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "coursemap", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the computed layout as JSON.
    Layout(LayoutArgs),
    /// Print origin-to-terminal paths as JSON.
    Paths(PathsArgs),
    /// Render a static map as SVG or PNG.
    Render(RenderArgs),
    /// Write the draw-in and hero race preview as a PNG sequence.
    Preview(PreviewArgs),
    /// Replay a JSON-lines snapshot stream as a PNG sequence.
    Replay(ReplayArgs),
}

#[derive(Parser, Debug)]
struct CourseArgs {
    /// Input course topology JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Engine configuration JSON (defaults when omitted).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    course: CourseArgs,
}

#[derive(Parser, Debug)]
struct PathsArgs {
    #[command(flatten)]
    course: CourseArgs,

    /// Only print this many mutually dissimilar paths.
    #[arg(long)]
    count: Option<usize>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    course: CourseArgs,

    /// Output path; `.svg` writes vector output, anything else PNG.
    #[arg(long)]
    out: PathBuf,

    /// Live snapshot JSON to draw travelers from.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Fog the map to what this traveler has discovered (requires --snapshot).
    #[arg(long)]
    observer: Option<String>,

    /// Pixels per layout unit for PNG output.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    course: CourseArgs,

    /// Directory for `frame_00000.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Seconds to render (defaults to draw-in plus one race loop).
    #[arg(long)]
    secs: Option<f64>,

    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    #[command(flatten)]
    course: CourseArgs,

    /// JSON-lines file with one full snapshot per line.
    #[arg(long)]
    stream: PathBuf,

    #[arg(long)]
    out_dir: PathBuf,

    /// Fog the map to what this traveler has discovered.
    #[arg(long)]
    observer: Option<String>,

    /// Simulated seconds between consecutive snapshots.
    #[arg(long, default_value_t = 1.0)]
    interval: f64,

    #[arg(long, default_value_t = 30)]
    fps: u32,

    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Layout(args) => cmd_layout(args),
        Command::Paths(args) => cmd_paths(args),
        Command::Render(args) => cmd_render(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Replay(args) => cmd_replay(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_text(path: &Path, what: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {what} '{}'", path.display()))
}

fn load_course(args: &CourseArgs) -> anyhow::Result<(coursemap::EngineConfig, coursemap::Layout)> {
    let cfg = match &args.config {
        Some(path) => coursemap::EngineConfig::from_json_str(&read_text(path, "config")?)?,
        None => coursemap::EngineConfig::default(),
    };
    let graph = coursemap::Graph::from_json_str(&read_text(&args.in_path, "course")?)?;
    if graph.is_empty() {
        tracing::warn!(path = %args.in_path.display(), "course has no usable nodes");
    }
    let layout = coursemap::compute_layout(&graph, &cfg.layout);
    tracing::info!(
        nodes = layout.nodes.len(),
        edges = layout.edges.len(),
        width = layout.width,
        height = layout.height,
        "layout computed"
    );
    Ok((cfg, layout))
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("create output dir '{}'", dir.display()))
}

fn frame_path(dir: &Path, index: u64) -> PathBuf {
    dir.join(format!("frame_{index:05}.png"))
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let (_, layout) = load_course(&args.course)?;
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}

fn cmd_paths(args: PathsArgs) -> anyhow::Result<()> {
    let (cfg, layout) = load_course(&args.course)?;
    let all = coursemap::enumerate_paths(&layout, cfg.animation.max_enumerated_paths);
    let paths = match args.count {
        Some(n) => coursemap::select_diverse_paths(&all, n, cfg.animation.seed),
        None => all,
    };
    println!("{}", serde_json::to_string_pretty(&paths)?);
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (cfg, layout) = load_course(&args.course)?;
    let style = coursemap::RenderStyle {
        radii: cfg.layout.radii,
        ..Default::default()
    };

    let scene = match &args.snapshot {
        Some(path) => {
            let snapshot = coursemap::LiveSnapshot::from_json_str(&read_text(path, "snapshot")?)?;
            let mut ctl = coursemap::LiveController::new(Arc::new(layout), cfg).with_style(style);
            if let Some(id) = &args.observer {
                ctl = ctl.with_observer(id.clone());
            }
            ctl.update(snapshot, 0.0);
            ctl.scene(0.0)
        }
        None => {
            if args.observer.is_some() {
                anyhow::bail!("--observer requires --snapshot");
            }
            coursemap::course_scene(&layout, None, &style)
        }
    };

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    let is_svg = args
        .out
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        std::fs::write(&args.out, coursemap::to_svg(&scene))
            .with_context(|| format!("write svg '{}'", args.out.display()))?;
    } else {
        coursemap::write_png(&scene, &args.out, args.scale)?;
    }
    tracing::info!(out = %args.out.display(), items = scene.items.len(), "rendered");
    Ok(())
}

/// Writes one preview frame per tick until the requested duration is covered.
struct PreviewTask {
    layout: coursemap::Layout,
    anim: coursemap::PreviewAnimation,
    style: coursemap::RenderStyle,
    out_dir: PathBuf,
    scale: f64,
    end_secs: f64,
    written: u64,
    error: Rc<RefCell<Option<anyhow::Error>>>,
}

impl coursemap::FrameTask for PreviewTask {
    fn frame(&mut self, now_secs: f64) -> coursemap::FrameControl {
        if now_secs >= self.end_secs {
            return coursemap::FrameControl::Done;
        }
        let frame = self.anim.sample(now_secs);
        let scene = coursemap::preview_scene(&self.layout, &frame, &self.style);
        let path = frame_path(&self.out_dir, self.written);
        if let Err(err) = coursemap::write_png(&scene, &path, self.scale) {
            *self.error.borrow_mut() = Some(err.into());
            return coursemap::FrameControl::Done;
        }
        self.written += 1;
        coursemap::FrameControl::Continue
    }
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let (cfg, layout) = load_course(&args.course)?;
    let fps = coursemap::Fps::new(args.fps, 1)?;
    ensure_dir(&args.out_dir)?;

    let anim = coursemap::PreviewAnimation::new(&layout, &cfg.animation);
    let end_secs = args.secs.unwrap_or_else(|| anim.intro_secs());
    let error = Rc::new(RefCell::new(None));

    let mut frames = coursemap::FrameLoop::new();
    frames.start(PreviewTask {
        style: coursemap::RenderStyle {
            radii: cfg.layout.radii,
            ..Default::default()
        },
        layout,
        anim,
        out_dir: args.out_dir.clone(),
        scale: args.scale,
        end_secs,
        written: 0,
        error: Rc::clone(&error),
    });

    let mut index = 0;
    while frames.tick(fps.frame_to_secs(coursemap::FrameIndex(index))) {
        index += 1;
    }
    if let Some(err) = error.borrow_mut().take() {
        return Err(err);
    }
    tracing::info!(
        frames = index.saturating_sub(1),
        dir = %args.out_dir.display(),
        "preview written"
    );
    Ok(())
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let (cfg, layout) = load_course(&args.course)?;
    let fps = coursemap::Fps::new(args.fps, 1)?;
    if !args.interval.is_finite() || args.interval <= 0.0 {
        anyhow::bail!("--interval must be > 0");
    }
    let snapshots = coursemap::parse_snapshot_lines(&read_text(&args.stream, "snapshot stream")?);
    if snapshots.is_empty() {
        anyhow::bail!("no snapshots in '{}'", args.stream.display());
    }
    ensure_dir(&args.out_dir)?;

    let transient_secs = cfg.markers.transient_secs;
    let mut ctl = coursemap::LiveController::new(Arc::new(layout), cfg);
    if let Some(id) = &args.observer {
        ctl = ctl.with_observer(id.clone());
    }

    let total_secs = snapshots.len() as f64 * args.interval + transient_secs;
    let total_frames = fps.secs_to_frames_ceil(total_secs);
    let mut pending = snapshots.into_iter().enumerate().peekable();

    for index in 0..total_frames {
        let now = fps.frame_to_secs(coursemap::FrameIndex(index));
        while let Some((k, _)) = pending.peek() {
            if (*k as f64) * args.interval > now {
                break;
            }
            if let Some((_, snap)) = pending.next() {
                ctl.update(snap, now);
            }
        }
        let scene = ctl.scene(now);
        coursemap::write_png(&scene, &frame_path(&args.out_dir, index), args.scale)?;
    }
    tracing::info!(frames = total_frames, dir = %args.out_dir.display(), "replay written");
    Ok(())
}
