use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "spirograph", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the loadable configs in a directory.
    List(ListArgs),
    /// Print one validated config with its rotation count resolved.
    Show(ShowArgs),
    /// Draw a config and print the pattern points.
    Draw(DrawArgs),
    /// Interpolate between two configs.
    Morph(MorphArgs),
    /// Export a drawn config as an SVG file.
    Svg(SvgArgs),
    /// Closure facts for a pair of teeth counts.
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Directory of config JSON files.
    #[arg(long, default_value = "configs")]
    dir: PathBuf,
}

#[derive(Parser, Debug)]
struct ShowArgs {
    /// Input config JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct DrawArgs {
    /// Input config JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Samples per rotation.
    #[arg(long, default_value_t = spirograph::curve::DEFAULT_POINTS_PER_ROTATION)]
    points_per_rotation: u32,
}

#[derive(Parser, Debug)]
struct MorphArgs {
    /// Starting config JSON.
    #[arg(long)]
    from: PathBuf,

    /// Ending config JSON.
    #[arg(long)]
    to: PathBuf,

    /// Number of interpolation steps (frames = steps + 1).
    #[arg(long, default_value_t = 10)]
    steps: u32,

    #[arg(long, value_enum, default_value_t = EasingChoice::Linear)]
    easing: EasingChoice,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also draw every frame.
    #[arg(long)]
    draw: bool,

    /// Worker threads for drawing frames (defaults to one per core).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct SvgArgs {
    /// Input config JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,

    /// Canvas width and height in pixels.
    #[arg(long, default_value_t = 600.0)]
    size: f64,

    /// Background fill, e.g. `#FFFFFF` (transparent when omitted).
    #[arg(long)]
    background: Option<spirograph::Rgb>,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    #[arg(long)]
    fixed: f64,

    #[arg(long)]
    moving: f64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EasingChoice {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl From<EasingChoice> for spirograph::Ease {
    fn from(choice: EasingChoice) -> Self {
        match choice {
            EasingChoice::Linear => Self::Linear,
            EasingChoice::EaseIn => Self::EaseIn,
            EasingChoice::EaseOut => Self::EaseOut,
            EasingChoice::EaseInOut => Self::EaseInOut,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::List(args) => cmd_list(args),
        Command::Show(args) => cmd_show(args),
        Command::Draw(args) => cmd_draw(args),
        Command::Morph(args) => cmd_morph(args),
        Command::Svg(args) => cmd_svg(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn read_config(path: &Path) -> anyhow::Result<spirograph::SpiroConfig> {
    spirograph::store::load_config(path)
        .with_context(|| format!("load config '{}'", path.display()))
}

fn write_json<T: serde::Serialize>(value: &T, out: Option<&Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f = File::create(path)
                .with_context(|| format!("create output '{}'", path.display()))?;
            let mut w = BufWriter::new(f);
            serde_json::to_writer_pretty(&mut w, value)
                .with_context(|| format!("write json '{}'", path.display()))?;
            w.flush()?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            serde_json::to_writer_pretty(&mut w, value).with_context(|| "write json to stdout")?;
            writeln!(w)?;
        }
    }
    Ok(())
}

fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let entries = spirograph::store::list_configs(&args.dir)
        .with_context(|| format!("list configs in '{}'", args.dir.display()))?;
    write_json(&entries, None)
}

fn cmd_show(args: ShowArgs) -> anyhow::Result<()> {
    let config = read_config(&args.in_path)?;
    let rotations = spirograph::curve::resolve_rotations(&config)?;
    let config = config.with_rotation_count(spirograph::RotationCount::count(rotations)?);
    write_json(&config, None)
}

fn cmd_draw(args: DrawArgs) -> anyhow::Result<()> {
    let config = read_config(&args.in_path)?;
    let service = spirograph::PatternService::new(spirograph::GeneratorSettings {
        points_per_rotation: args.points_per_rotation,
        ..Default::default()
    })?;
    let response = service.draw_response(&config)?;
    write_json(&response, args.out.as_deref())
}

#[derive(serde::Serialize)]
struct MorphOutput {
    configs: Vec<spirograph::SpiroConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    patterns: Option<Vec<spirograph::GeneratedPattern>>,
}

fn cmd_morph(args: MorphArgs) -> anyhow::Result<()> {
    let a = read_config(&args.from)?;
    let b = read_config(&args.to)?;

    let service = spirograph::PatternService::default();
    let request = spirograph::MorphRequest::new(a, b, args.steps, args.easing.into());
    let configs = service.plan_request(&request)?;

    let patterns = if !args.draw {
        None
    } else if args.threads.is_some() {
        let patterns = service.draw_all(&configs, args.threads)?;
        eprintln!("drew {} frames", patterns.len());
        Some(patterns)
    } else {
        let mut patterns = Vec::with_capacity(configs.len());
        for frame in service.frames(&configs) {
            let frame = frame?;
            eprintln!(
                "frame {}/{} ({:.0}%): {} points, {} rotations",
                frame.index + 1,
                frame.total,
                frame.progress() * 100.0,
                frame.pattern.len(),
                frame.pattern.rotation_count
            );
            patterns.push(frame.pattern);
        }
        Some(patterns)
    };

    write_json(&MorphOutput { configs, patterns }, args.out.as_deref())
}

fn cmd_svg(args: SvgArgs) -> anyhow::Result<()> {
    let config = read_config(&args.in_path)?;
    let pattern = spirograph::PatternService::default().draw(&config)?;
    let options = spirograph::SvgOptions {
        size: args.size,
        background: args.background,
        ..Default::default()
    };
    let svg = spirograph::render_svg(&pattern, &config, &options)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, svg)
        .with_context(|| format!("write svg '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let info = spirograph::pattern_info(args.fixed, args.moving)?;
    write_json(&info, None)
}
