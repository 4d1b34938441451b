use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use console::style;
use crossbeam_channel::Receiver;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;

use seedkit::cli::Args;
use seedkit::config::Config;
use seedkit::{
    BatchJob, BatchSettings, Job, JobController, JobEvent, MetainfoEngine, Outcome, PieceSize,
    SingleJob, TorrentDescriptor,
};

// Conventional exit status for a SIGINT-style stop
const EXIT_CANCELLED: u8 = 130;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", style("error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let mut args = Args::parse();

    let config = Config::load()?;
    if let Some(name) = args.profile.clone() {
        let profile = config
            .profiles
            .get(&name)
            .ok_or_else(|| anyhow!("unknown profile: {}", name))?;
        args.apply_profile(profile);
    }

    if args.batch {
        run_batch(args)
    } else {
        run_single(args)
    }
}

/// Profile values bypass clap's range check, so re-validate here.
fn selected_piece_size(args: &Args) -> Result<Option<PieceSize>> {
    args.piece_size
        .map(|exp| {
            PieceSize::from_exponent(exp)
                .ok_or_else(|| anyhow!("piece size exponent out of range (14-22): {}", exp))
        })
        .transpose()
}

fn run_single(args: Args) -> Result<ExitCode> {
    let descriptor = TorrentDescriptor {
        source: args.source.clone(),
        piece_size: selected_piece_size(&args)?,
        private: args.private,
        include_md5: args.md5,
        comment: args.comment.clone(),
        trackers: args.announce.clone(),
        web_seeds: args.web_seed.clone(),
    };

    // Probe before anything is spawned; failures here never start a job
    let probe = MetainfoEngine::new(descriptor.clone()).probe()?;

    let output = args.output.clone().unwrap_or_else(|| {
        let stem = args
            .source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        PathBuf::from(format!("{}.torrent", stem))
    });

    let name = args
        .source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.source.display().to_string());
    if probe.file_count == 1 {
        eprintln!(
            "{}: {}, {} pieces ({} each)",
            style(&name).bold(),
            HumanBytes(probe.total_bytes),
            probe.piece_count,
            HumanBytes(probe.piece_size.bytes())
        );
    } else {
        eprintln!(
            "{}: {} files, {}, {} pieces ({} each)",
            style(&name).bold(),
            probe.file_count,
            HumanBytes(probe.total_bytes),
            probe.piece_count,
            HumanBytes(probe.piece_size.bytes())
        );
    }
    if args.verbose {
        eprintln!("Writing to: {}", output.display());
    }

    let mut controller = JobController::new();
    let events = controller.start(Job::Single(SingleJob::new(descriptor, output)))?;
    install_ctrl_c(&controller)?;

    let bar = ProgressBar::new(probe.piece_count);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}",
        )?
        .progress_chars("█▓▒░"),
    );

    let outcome = drain_events(&events, &bar);
    controller.finish();
    conclude(outcome, &bar)
}

fn run_batch(args: Args) -> Result<ExitCode> {
    if !args.source.is_dir() {
        bail!("batch mode needs a directory: {}", args.source.display());
    }
    if args.piece_size.is_some() {
        eprintln!("Warning: piece size is selected automatically in batch mode");
    }

    let output_dir = args.output.clone().unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let settings = BatchSettings {
        private: args.private,
        include_md5: args.md5,
        comment: args.comment.clone(),
        trackers: args.announce.clone(),
        web_seeds: args.web_seed.clone(),
    };

    let mut controller = JobController::new();
    let events = controller.start(Job::Batch(BatchJob::new(
        args.source.clone(),
        output_dir,
        settings,
    )))?;
    install_ctrl_c(&controller)?;

    let bar = ProgressBar::new(0);
    bar.set_style(ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] {bar:40} ({pos}/{len}) {msg}",
    )?);

    let outcome = drain_events(&events, &bar);
    controller.finish();
    conclude(outcome, &bar)
}

fn install_ctrl_c(controller: &JobController) -> Result<()> {
    if let Some(token) = controller.cancellation_token() {
        ctrlc::set_handler(move || token.cancel()).context("failed to install Ctrl-C handler")?;
    }
    Ok(())
}

fn drain_events(events: &Receiver<JobEvent>, bar: &ProgressBar) -> Outcome {
    for event in events.iter() {
        match event {
            JobEvent::Progress { label, done, total } => {
                if bar.length() != Some(total) {
                    bar.set_length(total);
                }
                bar.set_position(done);
                bar.set_message(label);
            }
            JobEvent::Terminal(outcome) => return outcome,
        }
    }
    // The channel closed without a terminal event: the worker died
    Outcome::Failed(seedkit::Error::engine("job ended without a terminal event"))
}

fn conclude(outcome: Outcome, bar: &ProgressBar) -> Result<ExitCode> {
    bar.finish_and_clear();
    match outcome {
        Outcome::Completed => {
            println!("Finished");
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Cancelled => {
            println!("Canceled");
            Ok(ExitCode::from(EXIT_CANCELLED))
        }
        Outcome::Failed(e) => Err(e.into()),
    }
}
