use anyhow::Context;
use std::env;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use motioncap::config::MotionConfig;
use motioncap::pipeline::{MotionPipeline, PipelineSummary};
use motioncap::recording::{SegmentRecorder, VideoStore};
use motioncap::signal::Mog2Model;
use motioncap::source::{FrameSource, ImageSequenceSource, VideoSource};

fn print_banner() {
    println!("--------------------------------------------------------------------------");
    println!("motioncap records motion events from a video, capture device, or image");
    println!("sequence, using background subtraction to decide what is worth keeping.");
    println!();
    println!("Usage:");
    println!("  motioncap {{-vid <video filename or device index>|-img <image filename>}}");
    println!("for example: motioncap -vid video.avi");
    println!("or: motioncap -img /data/images/1.png");
    println!("--------------------------------------------------------------------------");
    println!();
}

fn usage_error() -> ! {
    eprintln!("Incorrect input list");
    eprintln!("Usage: motioncap {{-vid <path>|-img <path>}}");
    process::exit(1);
}

fn main() -> anyhow::Result<()> {
    motioncap::init_logging();
    print_banner();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        usage_error();
    }

    let config = MotionConfig::load_or_default();
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        process::exit(1);
    }

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        ctrlc::set_handler(move || {
            cancel.store(true, Ordering::Relaxed);
        })
        .context("failed to install interrupt handler")?;
    }

    let summary = match args[1].as_str() {
        "-vid" => run_video(&args[2], &config, cancel)?,
        "-img" => run_images(&args[2], &config, cancel)?,
        _ => usage_error(),
    };

    println!(
        "Done. {} frames processed, {} saved across {} segments.",
        summary.frames_processed, summary.frames_saved, summary.segments_opened
    );
    Ok(())
}

fn run_video(
    target: &str,
    config: &MotionConfig,
    cancel: Arc<AtomicBool>,
) -> anyhow::Result<PipelineSummary> {
    let source = VideoSource::open(target, config.encoding.fallback_fps)
        .with_context(|| format!("opening video source {}", target))?;
    run_pipeline(source, config, cancel)
}

fn run_images(
    seed: &str,
    config: &MotionConfig,
    cancel: Arc<AtomicBool>,
) -> anyhow::Result<PipelineSummary> {
    let source = ImageSequenceSource::open(seed.as_ref(), config.encoding.fallback_fps)
        .with_context(|| format!("opening image sequence {}", seed))?;
    run_pipeline(source, config, cancel)
}

fn run_pipeline<S: FrameSource>(
    source: S,
    config: &MotionConfig,
    cancel: Arc<AtomicBool>,
) -> anyhow::Result<PipelineSummary> {
    let model = Mog2Model::new(&config.detection).context("creating background model")?;
    let store = VideoStore::new(source.format(), &config.encoding, &config.storage)
        .context("configuring segment store")?;
    let recorder = SegmentRecorder::new(
        config.policy(),
        store,
        &config.storage.images_dir,
        &config.storage.videos_dir,
    );

    let summary = MotionPipeline::new(source, model, recorder, cancel)
        .run()
        .context("pipeline run failed")?;
    Ok(summary)
}
