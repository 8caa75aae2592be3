//! Beatglider - drives a panel layout with beat-spawned Game of Life gliders
//!
//! Renders the show offline from a WAV file or the built-in Glicol
//! composition, printing panel colours and optionally writing a PNG preview.

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use beatglider::audio::{SynthPowerSource, WavPowerSource, COMPOSITION};
use beatglider::cli::Args;
use beatglider::preview::PreviewRecorder;
use beatglider::{Result, Session};

fn run(args: &Args) -> Result<()> {
    let config = args.load_config()?;
    let panels = args.load_layout(&config)?;
    let palette = args.load_palette()?;

    let mut session = Session::new(
        config.detector.clone(),
        config.simulation.clone(),
        palette,
        panels,
    )?;
    let channels = session.detector().channel_count();

    let source: Box<dyn Iterator<Item = Vec<u32>>> = match &args.wav {
        Some(path) => {
            info!(path = %path.display(), "analyzing WAV file");
            Box::new(WavPowerSource::open(path, config.analysis.clone(), channels)?)
        }
        None => {
            info!(seconds = args.duration, "rendering built-in composition");
            Box::new(SynthPowerSource::new(
                COMPOSITION,
                config.analysis.clone(),
                channels,
                args.duration,
            )?)
        }
    };

    let mut recorder = PreviewRecorder::new();
    let mut peak_cells = 0;
    for powers in source {
        let frames = session.process_frame(&powers);
        peak_cells = peak_cells.max(session.pool().len());

        if args.print && !frames.is_empty() {
            let line: Vec<String> = frames
                .iter()
                .map(|f| {
                    format!(
                        "{}:{:02x}{:02x}{:02x}",
                        f.panel_id, f.color.r, f.color.g, f.color.b
                    )
                })
                .collect();
            println!("{:>6} {}", session.frames_processed(), line.join(" "));
        }
        if args.preview.is_some() {
            recorder.record(&frames);
        }
    }

    info!(
        frames = session.frames_processed(),
        peak_cells,
        final_cells = session.pool().len(),
        "show finished"
    );

    if let Some(path) = &args.preview {
        recorder.save(path, &config.preview)?;
        info!(path = %path.display(), rows = recorder.frame_count(), "preview written");
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter())),
        )
        .init();

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
