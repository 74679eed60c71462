//! flightarc - animate flight arcs headlessly or measure sketched geometry.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flightarc_cli::{
    fetch_document, measure_points, parse_coordinate, run_animation, RunOptions, SketchKind,
};
use flightarc_core::AnimationConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a flight document and play the reveal animation
    Animate {
        /// File path or http(s) URL of the flight document
        #[arg(long, default_value = "data/flights.json")]
        input: String,

        /// Animation config (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the reveal speed
        #[arg(long)]
        points_per_ms: Option<f64>,

        /// Stop after this many frames
        #[arg(long)]
        frames: Option<usize>,

        /// Frame interval in milliseconds
        #[arg(long, default_value_t = 16)]
        frame_ms: u64,

        /// Open the activation gate after this many milliseconds
        #[arg(long, default_value_t = 0)]
        start_after_ms: u64,

        /// Projected x of the view center
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        center_x: f64,
    },
    /// Measure a line or polygon given as lat,lon points
    Measure {
        #[arg(value_enum)]
        kind: SketchKind,

        #[arg(required = true, allow_hyphen_values = true)]
        points: Vec<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let json_layer = cli.log_json.then(|| tracing_subscriber::fmt::layer().json());
    let plain_layer = (!cli.log_json).then(tracing_subscriber::fmt::layer);
    tracing_subscriber::registry()
        .with(json_layer)
        .with(plain_layer)
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("flightarc=debug".parse()?))
        .init();

    match cli.command {
        Command::Animate {
            input,
            config,
            points_per_ms,
            frames,
            frame_ms,
            start_after_ms,
            center_x,
        } => {
            let mut animation = match config {
                Some(path) => AnimationConfig::from_json(&tokio::fs::read_to_string(&path).await?)?,
                None => AnimationConfig::default(),
            };
            if let Some(ppm) = points_per_ms {
                animation.points_per_ms = ppm;
                animation.validate()?;
            }

            let document = match fetch_document(&input).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::error!("Flight document unavailable: {:#}", e);
                    return Ok(());
                }
            };

            let options = RunOptions {
                max_frames: frames,
                frame_interval: Duration::from_millis(frame_ms.max(1)),
                start_after: Duration::from_millis(start_after_ms),
                view_center_x: center_x,
            };
            let summary = run_animation(&document, &animation, &options).await;

            if let Some(err) = summary.load_error {
                println!("No flights loaded: {}", err);
                return Ok(());
            }
            println!("Frames: {}", summary.frames);
            println!(
                "Batches: {} loaded, {} inserted, {} dropped",
                summary.loaded_batches, summary.inserted_batches, summary.dropped_batches
            );
            println!(
                "Features: {}/{} finished",
                summary.finished_features, summary.total_features
            );
            println!("Line draws: {}", summary.draw_calls);
            println!("Completed: {}", summary.completed);
        }
        Command::Measure { kind, points } => {
            let coords = points
                .iter()
                .map(|p| parse_coordinate(p))
                .collect::<Result<Vec<_>>>()?;
            println!("{}", measure_points(kind, &coords)?);
        }
    }

    Ok(())
}
