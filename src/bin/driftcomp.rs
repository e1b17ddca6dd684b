use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "driftcomp", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a window trace headlessly and write the final frame as a PNG.
    Replay(ReplayArgs),
    /// Validate an effect configuration and print the resolved bindings.
    CheckConfig(CheckConfigArgs),
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Input trace JSON.
    #[arg(long)]
    trace: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Effect configuration JSON; built-in bindings when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CheckConfigArgs {
    /// Effect configuration JSON.
    #[arg(long)]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Replay(args) => cmd_replay(args),
        Command::CheckConfig(args) => cmd_check_config(args),
    }
}

fn read_config(path: &Path) -> anyhow::Result<driftcomp::EffectSetup> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let cfg = driftcomp::CompositorConfig::from_reader(BufReader::new(f))
        .with_context(|| "parse config JSON")?;
    cfg.resolve()
        .with_context(|| format!("resolve config '{}'", path.display()))
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let f = File::open(&args.trace)
        .with_context(|| format!("open trace '{}'", args.trace.display()))?;
    let trace = driftcomp::Trace::from_reader(BufReader::new(f)).with_context(|| "parse trace JSON")?;

    let setup = match &args.config {
        Some(path) => read_config(path)?,
        None => driftcomp::EffectSetup::default(),
    };

    let outcome = driftcomp::replay::run(&trace, setup)?;
    let frame = outcome.frame;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} frames painted over {} ms, {} windows left)",
        args.out.display(),
        outcome.frames_painted,
        outcome.elapsed_ms,
        outcome.windows
    );
    Ok(())
}

fn cmd_check_config(args: CheckConfigArgs) -> anyhow::Result<()> {
    let setup = read_config(&args.config)?;
    println!("tick_interval_ms: {}", setup.tick_interval_ms);
    for (window_type, event, effect) in setup.bindings() {
        println!(
            "{:<14} {:<8} {} ({}, step {}, {:?})",
            window_type.name(),
            event.name(),
            effect.name,
            effect.kind.name(),
            effect.step,
            effect.ease
        );
    }
    Ok(())
}
