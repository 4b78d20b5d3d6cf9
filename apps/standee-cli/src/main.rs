mod script;

use anyhow::Context;
use clap::{Parser, Subcommand};
use standee_assets::{FileImageDecoder, ImageDecoder, MemoryDecoder};
use standee_placement::PlacementOutcome;
use standee_scene::DebugTextRenderer;
use standee_session::{ArSession, SessionConfig, UserNotice};
use standee_tracking::ScriptedProvider;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::script::Script;

#[derive(Parser)]
#[command(name = "standee-cli", about = "CLI tool for standee AR placement sessions")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Session config (YAML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run the built-in placement walkthrough on in-memory images
    Demo {
        /// Print the scene after every frame
        #[arg(short, long)]
        render: bool,
    },
    /// Replay a JSON tracking script against images on disk
    Simulate {
        /// Path to the frame script
        #[arg(short, long)]
        script: PathBuf,
        /// Directory that asset paths are resolved against
        #[arg(short, long, default_value = ".")]
        asset_root: PathBuf,
        /// Print the scene after every frame
        #[arg(short, long)]
        render: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    tracing::debug!(?config, "session config");

    match cli.command {
        Commands::Info => {
            println!("standee-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("assets: {}", standee_assets::crate_info());
            println!("tracking: {}", standee_tracking::crate_info());
            println!("scene: {}", standee_scene::crate_info());
            println!("placement: {}", standee_placement::crate_info());
            println!("input: {}", standee_input::crate_info());
            println!("session: {}", standee_session::crate_info());
        }
        Commands::Demo { render } => {
            let script = Script::demo();
            let decoder = MemoryDecoder::new();
            for (character, w, h) in [
                ("character1", 512, 1024),
                ("character2", 800, 600),
                ("character3", 300, 300),
            ] {
                decoder.insert(config.assets.resolve(character), w, h);
            }
            println!("Demo: {} frames, character1..character3 in memory", script.frames.len());
            let mut session = ArSession::new(&config, script.provider(), decoder);
            replay(&mut session, &script, render);
        }
        Commands::Simulate {
            script,
            asset_root,
            render,
        } => {
            let json = std::fs::read_to_string(&script)
                .with_context(|| format!("reading script {}", script.display()))?;
            let script = Script::from_json(&json).context("parsing frame script")?;
            println!(
                "Simulate: {} frames, assets under {}",
                script.frames.len(),
                asset_root.display()
            );
            let decoder = FileImageDecoder::new(asset_root);
            let mut session = ArSession::new(&config, script.provider(), decoder);
            replay(&mut session, &script, render);
        }
    }

    Ok(())
}

fn replay<D: ImageDecoder + 'static>(
    session: &mut ArSession<ScriptedProvider, D>,
    script: &Script,
    render: bool,
) {
    let renderer = DebugTextRenderer::new();
    for frame in &script.frames {
        if let Some((width, height)) = frame.resize {
            session.on_viewport_resize(width, height);
        }
        let n = session.tick();
        for intent in &frame.intents {
            session.handle_intent(intent.clone());
        }

        for notice in session.drain_notices() {
            match notice {
                UserNotice::PlacementAvailable(true) => {
                    println!("[{n:>3}] surface found, placement enabled")
                }
                UserNotice::PlacementAvailable(false) => {
                    println!("[{n:>3}] surface lost, placement disabled")
                }
                UserNotice::PlacementFailed(msg) => println!("[{n:>3}] placement failed: {msg}"),
                UserNotice::PlacementFault(msg) => println!("[{n:>3}] placement error: {msg}"),
            }
        }
        for outcome in session.drain_outcomes() {
            match outcome {
                PlacementOutcome::Committed(entity) => {
                    let p = entity.world_position();
                    println!(
                        "[{n:>3}] placed {} ({}) at ({:.2}, {:.2}, {:.2})",
                        entity.id().short(),
                        entity.asset().path(),
                        p.x,
                        p.y,
                        p.z
                    );
                }
                PlacementOutcome::Rejected(reason) => println!("[{n:>3}] rejected: {reason}"),
            }
        }
        if render {
            print!("{}", session.render(&renderer));
        }
    }

    let tracker = session.tracker_stats();
    let cache = session.cache_stats();
    println!(
        "Done: frames={}, found={}, transitions={}, entities={}, pending={}",
        tracker.frames,
        tracker.found_frames,
        tracker.transitions,
        session.scene().len(),
        session.pending_placements()
    );
    println!(
        "Cache: resident={}, hits={}, misses={}, failures={}",
        session.assets().len(),
        cache.hits,
        cache.misses,
        cache.failures
    );
}
