//! mixprep CLI entry point

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mixprep::config::{Cli, Settings};
use mixprep::pipeline::{Pipeline, PipelineEvent};
use mixprep::types::AudioFormat;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli);

    // Validate inputs
    if let Err(e) = validate_inputs(&cli) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    // Build settings from CLI
    let settings = match Settings::from_cli(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let pipeline = match Pipeline::new(settings) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Fatal error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let progress_bar = pipeline.settings().show_progress.then(new_progress_bar);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failed = false;

    for event in pipeline.run() {
        if let Some(pb) = &progress_bar {
            match &event {
                PipelineEvent::Progress { message, percent } => {
                    pb.set_position(u64::from(*percent));
                    pb.set_message(message.clone());
                }
                PipelineEvent::Error { message } => pb.abandon_with_message(message.clone()),
                PipelineEvent::Complete { .. } => pb.finish_and_clear(),
            }
        }
        failed |= matches!(event, PipelineEvent::Error { .. });

        if let Err(e) = write_event(&mut out, &event) {
            // Dropping the iterator stops the run and any child process
            eprintln!("Fatal error: cannot write event stream: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn write_event(out: &mut impl Write, event: &PipelineEvent) -> io::Result<()> {
    let line = event.to_ndjson().map_err(io::Error::other)?;
    out.write_all(line.as_bytes())?;
    out.flush()
}

fn new_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb
}

fn init_logging(cli: &Cli) {
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = if cli.quiet { "error" } else { filter };

    // stdout carries the event stream
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn validate_inputs(cli: &Cli) -> Result<(), String> {
    if !cli.input.exists() {
        return Err(format!(
            "Input file does not exist: {}\n\n  Tip: Check the path is correct and accessible.\n  Example:\n    mixprep -i ./track.mp3 > track.ndjson",
            cli.input.display()
        ));
    }

    if !cli.input.is_file() {
        return Err(format!(
            "Input is not a file: {}\n\n  Tip: mixprep analyzes one track per run.",
            cli.input.display()
        ));
    }

    if !AudioFormat::is_supported_path(&cli.input) {
        warn!(
            "{} does not have a recognized audio extension, decoding anyway",
            cli.input.display()
        );
    }

    Ok(())
}
