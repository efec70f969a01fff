//! fall_demo - end-to-end synthetic run of the fall monitor

use anyhow::{anyhow, Result};
use clap::Parser;
use std::io::IsTerminal;

use fallwatch::config::MonitorConfig;
use fallwatch::ui::{overlay_lines, Ui};
use fallwatch::{FileConfig, FileSource, FrameReport, Monitor};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Duration in seconds of the synthetic scenario.
    #[arg(long, default_value_t = 10)]
    seconds: u64,
    /// Frames per second for the synthetic source.
    #[arg(long, default_value_t = 15)]
    fps: u32,
    /// Synthetic scenario name.
    #[arg(long, default_value = "fall_scenario")]
    scenario: String,
    /// Print every frame report as JSON on stdout.
    #[arg(long)]
    json: bool,
    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    if args.fps == 0 {
        return Err(anyhow!("fps must be >= 1"));
    }
    let is_tty = std::io::stderr().is_terminal();
    let ui = Ui::from_args(Some(&args.ui), is_tty, args.json);

    let (mut source, mut monitor) = {
        let _stage = ui.stage("open synthetic source");
        let mut cfg = MonitorConfig::default();
        cfg.source.path = format!("stub://{}", args.scenario);
        cfg.source.target_fps = args.fps;
        let mut source = FileSource::new(FileConfig {
            path: cfg.source.path.clone(),
            target_fps: args.fps,
            max_frames: Some(args.seconds.saturating_mul(args.fps as u64)),
        })?;
        source.connect()?;
        (source, Monitor::new(&cfg)?)
    };

    let mut last_report: Option<FrameReport> = None;
    let mut alert_frames = 0u64;
    {
        let stage = ui.stage("run fall monitor");
        while let Some(frame) = source.next_frame()? {
            // synthetic frames always carry their scripted timestamp
            let now = frame.timestamp_s.unwrap_or(0.0);
            let report = monitor.process(&frame, now)?;
            if report.alert_active {
                alert_frames += 1;
            }
            if args.json {
                println!("{}", serde_json::to_string(&report)?);
            }
            stage.progress(&overlay_lines(&report).join(" "));
            last_report = Some(report);
        }
    }

    let state = monitor.state();
    eprintln!("demo summary:");
    eprintln!("  frames processed: {}", monitor.frames_processed());
    eprintln!("  max concurrent persons: {}", state.max_concurrent_persons());
    eprintln!("  falls registered: {}", state.fall_count());
    eprintln!("  frames with alert active: {}", alert_frames);
    match state.alert().last_alert_time() {
        Some(t) => eprintln!("  last alert at: {:.2}s", t),
        None => eprintln!("  last alert at: never"),
    }
    if let Some(report) = last_report {
        eprintln!("  final overlay: {}", overlay_lines(&report).join(" | "));
    }
    Ok(())
}
