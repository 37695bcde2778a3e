/// Carousel simulator - replay slide sessions against simulated audio
use anyhow::Context;
use carousel_sim::{simulate, Script, SimConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "carousel-sim")]
#[command(about = "Replay Carousel sessions against simulated audio", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a session script
    Run {
        /// Configuration file path (defaults to ./carousel.toml)
        #[arg(short, long, env = "CAROUSEL_CONFIG")]
        config: Option<PathBuf>,
        /// Script file
        script: PathBuf,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
        /// Wait in wall-clock time instead of virtual time
        #[arg(long)]
        realtime: bool,
    },
    /// Print the deck and the effective configuration
    Inspect {
        /// Configuration file path (defaults to ./carousel.toml)
        #[arg(short, long, env = "CAROUSEL_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr, so stdout carries only the event stream)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "carousel_sim=info,carousel_playback=info,carousel_runtime=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            script,
            json,
            realtime,
        } => run(config, script, json, realtime),
        Commands::Inspect { config } => inspect(config),
    }
}

fn run(
    config: Option<PathBuf>,
    script_path: PathBuf,
    json: bool,
    realtime: bool,
) -> anyhow::Result<()> {
    let config = SimConfig::load(config.as_deref()).context("Failed to load configuration")?;
    let text = std::fs::read_to_string(&script_path)
        .with_context(|| format!("Failed to read script {}", script_path.display()))?;
    let script = Script::parse(&text)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(!realtime)
        .build()?;

    let report = runtime.block_on(simulate(&config, &script))?;

    for event in &report.events {
        if json {
            println!("{}", serde_json::to_string(event)?);
        } else {
            println!("{}", event);
        }
    }

    if !json {
        println!(
            "-- {} events in {:.3}s; slide {} shown; audible: {:?}",
            report.events.len(),
            report.elapsed_ms as f64 / 1000.0,
            report.active,
            report.audible
        );
    }

    Ok(())
}

fn inspect(config: Option<PathBuf>) -> anyhow::Result<()> {
    let config = SimConfig::load(config.as_deref()).context("Failed to load configuration")?;
    let audio = config.audio_config();

    println!("Deck ({} slides):", config.slides.len());
    for slide in config.deck()?.iter() {
        let title = slide.title.as_deref().unwrap_or("(untitled)");
        match slide.audio_source() {
            Some(src) => {
                let duration = audio
                    .durations
                    .get(&slide.index)
                    .copied()
                    .unwrap_or(audio.default_duration);
                let rejected = if audio.rejected.contains(&slide.index) {
                    ", rejected"
                } else {
                    ""
                };
                println!(
                    "  {:>3}  {}  {} ({:.1}s{})",
                    slide.index,
                    title,
                    src,
                    duration.as_secs_f64(),
                    rejected
                );
            }
            None => println!("  {:>3}  {}  (silent)", slide.index, title),
        }
    }

    println!();
    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}
