use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use parallax_distorter_core::{
    config::DISTORTION_RATE_RANGE,
    start_music,
    text::{banner_text, Banner, GlyphMetrics, PositionTable},
    AudioSink, Demo, DemoAssets, DemoConfig, DemoError, DirectoryAssets, DisplaySurface,
    FixedStep, LoopingPlayer, NullSurface, Presenter, WaveTables,
};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "playback")]
mod playback;
mod surface;

use surface::PngSequence;

fn main() -> parallax_distorter_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_demo(&args),
        Commands::Tables {
            distortion_rate,
            output,
        } => dump_tables(distortion_rate, &output),
    }
}

fn run_demo(args: &RunArgs) -> parallax_distorter_core::Result<()> {
    let config = DemoConfig::load(&args.config);
    tracing::info!(?config, assets = ?args.assets, "starting demo");

    let mut assets = DemoAssets::load(&DirectoryAssets::new(&args.assets))?;
    let music = assets.music.take();

    let mut player = LoopingPlayer::new();
    let playing = start_music(&mut player, music, config.music_volume);
    #[cfg(feature = "playback")]
    let _output = if playing {
        match playback::open_output(&player) {
            Ok(stream) => Some(stream),
            Err(err) => {
                tracing::warn!(error = %err, "no audio output, continuing silently");
                None
            }
        }
    } else {
        None
    };
    if playing && !cfg!(feature = "playback") {
        tracing::debug!(volume = player.volume(), "music decoded, built without playback");
    }

    let presenter = Presenter::new(&config);
    let mut demo = Demo::new(config, assets)?;
    if args.skip_intro {
        demo.skip_intro();
    }

    let mut surface: Box<dyn DisplaySurface> = match &args.output {
        Some(dir) => Box::new(PngSequence::create(dir, args.every)?),
        None => Box::new(NullSurface),
    };

    if args.realtime {
        run_realtime(&mut demo, &presenter, surface.as_mut(), args.frames)?;
    } else {
        for _ in 0..args.frames {
            demo.update();
            demo.present(&presenter, surface.as_mut())?;
        }
    }

    tracing::info!(
        frames = args.frames,
        phase = ?demo.phase(),
        iteration = demo.frame_state().iteration,
        "demo finished"
    );
    Ok(())
}

fn run_realtime(
    demo: &mut Demo,
    presenter: &Presenter,
    surface: &mut dyn DisplaySurface,
    frames: u64,
) -> parallax_distorter_core::Result<()> {
    let mut clock = FixedStep::default();
    let mut last = Instant::now();
    let mut presented = 0;

    while presented < frames {
        let now = Instant::now();
        let due = clock.advance(now - last);
        last = now;
        if due == 0 {
            std::thread::sleep(clock.until_next());
            continue;
        }

        for _ in 0..due {
            demo.update();
        }
        demo.present(presenter, surface)?;
        presented += 1;
    }
    Ok(())
}

fn dump_tables(distortion_rate: f64, output: &Path) -> parallax_distorter_core::Result<()> {
    if !DISTORTION_RATE_RANGE.contains(&distortion_rate) {
        return Err(DemoError::InvalidInput(
            "distortion rate must be between 0.01 and 100",
        ));
    }
    tracing::info!(distortion_rate, ?output, "dumping wave tables");

    let tables = WaveTables::generate(distortion_rate);
    let glyphs = GlyphMetrics::standard();
    let positions = PositionTable::build(&Banner::new(&banner_text(), &glyphs), &glyphs);

    let document = serde_json::json!({
        "distortionRate": distortion_rate,
        "background": tables.background,
        "foreground": tables.foreground,
        "positions": positions,
    });
    let file = std::fs::File::create(output)?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &document)?;
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Raster-distortion scroller demo", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the demo headless, optionally writing frames as PNG files.
    Run(RunArgs),
    /// Precompute the wave and glyph position tables and write them as JSON.
    Tables {
        /// Multiplier applied to every curve's angular step.
        #[arg(long, default_value_t = 1.0)]
        distortion_rate: f64,
        /// Output path for the JSON document.
        output: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Path to the JSON configuration file.
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,
    /// Directory holding back.png, font.png, logo.png and music.wav.
    #[arg(short, long, default_value = "assets")]
    assets: PathBuf,
    /// Number of frames to present before exiting.
    #[arg(long, default_value_t = 600)]
    frames: u64,
    /// Directory for the PNG frame sequence.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Only write every Nth presented frame.
    #[arg(long, default_value_t = 1)]
    every: u64,
    /// Start directly on the main screen.
    #[arg(long)]
    skip_intro: bool,
    /// Pace the simulation against the wall clock at 60 ticks per second.
    #[arg(long)]
    realtime: bool,
}
