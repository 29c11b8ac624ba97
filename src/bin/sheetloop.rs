use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "sheetloop", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print sheet dimensions, cell size and timing.
    Info(InfoArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Print the frames of one export cycle.
    Sequence(SequenceArgs),
    /// Play the animation for a while and print each frame change.
    Preview(PreviewArgs),
    /// Export one cycle as an animated GIF.
    Export(ExportArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Forward,
    Reverse,
    #[value(alias = "ping-pong")]
    Pingpong,
}

impl From<ModeArg> for sheetloop::PlaybackMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Forward => Self::Forward,
            ModeArg::Reverse => Self::Reverse,
            ModeArg::Pingpong => Self::PingPong,
        }
    }
}

#[derive(Args, Debug)]
struct SheetArgs {
    /// Input sprite sheet (PNG, JPEG, GIF, WebP, ...).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Settings JSON; flags below override its values.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Grid columns.
    #[arg(long)]
    columns: Option<u32>,

    /// Grid rows.
    #[arg(long)]
    rows: Option<u32>,

    /// Cycle duration in seconds.
    #[arg(long)]
    duration: Option<f64>,

    /// Playback mode.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Mirror frames horizontally (`--flip false` overrides the settings file).
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    flip: Option<bool>,

    /// Zoom in percent (frame and preview only).
    #[arg(long)]
    scale: Option<u32>,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    #[command(flatten)]
    sheet: SheetArgs,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    /// Frame index (0-based, row-major).
    #[arg(long, conflicts_with = "at_ms", required_unless_present = "at_ms")]
    index: Option<u32>,

    /// Frame shown this many milliseconds after playback starts at frame 0.
    #[arg(long)]
    at_ms: Option<f64>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    /// Print JSON instead of one line per frame.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    /// How long to play.
    #[arg(long, default_value_t = 2.0)]
    seconds: f64,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// Encoder quality, 1-100.
    #[arg(long, default_value_t = 90, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Flatten transparency over this color (RRGGBB hex).
    #[arg(long, value_parser = parse_hex_rgb)]
    background: Option<[u8; 4]>,

    /// Fail the export on the first frame that cannot be extracted.
    #[arg(long, default_value_t = false)]
    abort_on_frame_error: bool,

    /// Extract frames in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_hex_rgb(s: &str) -> Result<[u8; 4], String> {
    let hex = s.trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("expected RRGGBB, got '{s}'"));
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
    Ok([channel(0)?, channel(2)?, channel(4)?, 255])
}

fn resolve_settings(args: &SheetArgs) -> anyhow::Result<sheetloop::PreviewSettings> {
    let mut s = match &args.settings {
        Some(path) => sheetloop::PreviewSettings::from_path(path)?,
        None => sheetloop::PreviewSettings::default(),
    };
    if let Some(c) = args.columns {
        s.columns = c;
    }
    if let Some(r) = args.rows {
        s.rows = r;
    }
    if let Some(d) = args.duration {
        s.duration_seconds = d;
    }
    if let Some(m) = args.mode {
        s.mode = m.into();
    }
    if let Some(f) = args.flip {
        s.flip_horizontal = f;
    }
    if let Some(p) = args.scale {
        s.scale_percent = p;
    }
    Ok(s.clamped())
}

fn open_controller(args: &SheetArgs) -> anyhow::Result<sheetloop::PlaybackController> {
    let settings = resolve_settings(args)?;
    let sheet = sheetloop::load_sheet(&args.in_path)?;
    let name = args
        .in_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.in_path.display().to_string());
    let mut ctl = sheetloop::PlaybackController::new(&settings);
    ctl.load_sheet(name, sheet);
    Ok(ctl)
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let ctl = open_controller(&args.sheet)?;
    let geom = ctl.geometry().context("no sprite sheet loaded")?;
    let cycle = ctl.cycle();
    let (cell_w, cell_h) = geom.display_cell_size();
    let mode = ctl.state().mode;

    println!("sheet: {}x{}", geom.dims.width, geom.dims.height);
    println!("grid: {}x{}", geom.grid.columns(), geom.grid.rows());
    println!("cell: {cell_w}x{cell_h}");
    println!("frames: {}", cycle.total_frames());
    println!("mode: {mode} ({} steps per cycle)", mode.cycle_len(cycle.total_frames()));
    println!(
        "delay: ~{} ms ({:.2} fps)",
        cycle.approx_frame_delay_ms(),
        cycle.effective_fps()
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut ctl = open_controller(&args.sheet)?;
    let total = ctl.grid().total_frames();
    let now_ms = match (args.index, args.at_ms) {
        (Some(i), _) => {
            let frame = ctl
                .grid()
                .frame(i)
                .with_context(|| format!("frame index {i} out of range (0..{total})"))?;
            ctl.seek(frame, 0.0)?;
            0.0
        }
        (None, Some(t)) => {
            ctl.play(0.0)?;
            t
        }
        (None, None) => anyhow::bail!("one of --index or --at-ms is required"),
    };

    let mut surface = sheetloop::Surface::default();
    let frame = ctl.render_current(now_ms, &mut surface)?;
    let img = surface.to_image()?;

    ensure_parent_dir(&args.out)?;
    img.save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("{}", sheetloop::frame_label(frame, total));
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    let settings = resolve_settings(&args.sheet)?;
    let grid = settings.grid();
    let steps = sheetloop::cycle_sequence(settings.mode, settings.cycle());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&steps)?);
        return Ok(());
    }
    for step in steps {
        let addr = grid.address(step.frame);
        println!(
            "{}\t{}\t{}\t{:.3}",
            step.frame.0, addr.column, addr.row, step.delay_ms
        );
    }
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let mut ctl = open_controller(&args.sheet)?;
    let total = ctl.grid().total_frames();
    let interval = Duration::from_secs_f64(ctl.cycle().frame_delay_ms() / 4000.0);
    let limit_ms = args.seconds.max(0.0) * 1000.0;

    let ticket = ctl.play(0.0)?;
    let (tx, rx) = mpsc::channel();
    let mut last = None;
    let ticker = sheetloop::Ticker::spawn(interval, move |now_ms| {
        if now_ms > limit_ms {
            return false;
        }
        let Some(frame) = ctl.tick(ticket, now_ms) else {
            return false;
        };
        if last != Some(frame) {
            last = Some(frame);
            if tx.send((now_ms, frame)).is_err() {
                return false;
            }
        }
        true
    })?;

    for (now_ms, frame) in rx {
        println!("{now_ms:>8.1} ms  {}", sheetloop::frame_label(frame, total));
    }
    ticker.stop();
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut ctl = open_controller(&args.sheet)?;
    let opts = sheetloop::ExportOpts {
        failure_policy: if args.abort_on_frame_error {
            sheetloop::FailurePolicy::Abort
        } else {
            sheetloop::FailurePolicy::SkipFrame
        },
        parallel: args.parallel,
        threads: args.threads,
        encoder: sheetloop::EncoderOpts {
            quality: args.quality,
            background: args.background,
            repeat_forever: true,
        },
    };

    let handle = ctl.start_export(opts, Box::new(sheetloop::GifEncoderSink::new()))?;
    let artifact = handle.wait()?;

    ensure_parent_dir(&args.out)?;
    std::fs::write(&args.out, &artifact.bytes)
        .with_context(|| format!("write gif '{}'", args.out.display()))?;

    let stats = artifact.stats;
    eprintln!(
        "encoded {}/{} frames ({} skipped), {}x{}",
        stats.frames_encoded, stats.frames_total, stats.frames_skipped, artifact.width, artifact.height
    );
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
