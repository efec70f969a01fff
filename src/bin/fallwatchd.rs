//! fallwatchd - fall monitoring daemon
//!
//! This daemon:
//! 1. Reads annotated frames from the configured source (JSON Lines file or stub://)
//! 2. Drops weak candidates and suppresses duplicate boxes
//! 3. Evaluates each person with the floor-proximity heuristic
//! 4. Debounces per-person falls with the cooldown gate
//! 5. Reports per-frame results (log lines, or JSON on stdout with --json)

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use fallwatch::config::MonitorConfig;
use fallwatch::ui::{overlay_lines, ALERT_BANNER};
use fallwatch::{Clock, FileConfig, FileSource, Monitor, MonotonicClock};

#[derive(Parser, Debug)]
#[command(name = "fallwatchd", about = "Fall monitoring daemon")]
struct Args {
    /// Config file (JSON, or TOML when the extension is .toml).
    #[arg(long, env = "FALLWATCH_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,
    /// Frame source override (local .jsonl path or stub://<name>).
    #[arg(long, value_name = "SOURCE")]
    source: Option<String>,
    /// Emit one JSON frame report per line on stdout.
    #[arg(long)]
    json: bool,
    /// Pace recorded file input at the configured target fps instead of as fast as
    /// possible. Synthetic stub:// sources are always paced.
    #[arg(long)]
    realtime: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = MonitorConfig::load_from(args.config.as_deref())?;
    if let Some(source) = args.source {
        cfg.source.path = source;
    }

    let mut source = FileSource::new(FileConfig {
        path: cfg.source.path.clone(),
        target_fps: cfg.source.target_fps,
        max_frames: None,
    })?;
    source.connect()?;

    let mut monitor = Monitor::new(&cfg)?;
    let mut clock = MonotonicClock::new();

    let stop = Arc::new(AtomicBool::new(false));
    let stop_handler = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        stop_handler.store(true, Ordering::SeqCst);
    })
    .map_err(|e| anyhow!("error setting Ctrl-C handler: {}", e))?;

    log::info!("fallwatchd running. source={}", cfg.source.path);
    log::info!(
        "cooldown={}s alert={}s score>={} iou>{}",
        cfg.fall.cooldown_secs,
        cfg.fall.alert_duration_secs,
        cfg.detection.score_threshold,
        cfg.detection.overlap_threshold
    );

    let frame_interval = Duration::from_secs_f64(1.0 / cfg.source.target_fps as f64);
    let paced = args.realtime || source.is_synthetic();
    let mut last_health_log = Instant::now();
    let mut rejected = 0u64;
    let mut alert_was_active = false;

    while !stop.load(Ordering::SeqCst) {
        let started = Instant::now();
        let Some(frame) = source.next_frame()? else {
            log::info!("end of input");
            break;
        };
        let now = match frame.timestamp_s {
            Some(ts) => ts,
            None => clock.now_secs(),
        };

        let report = match monitor.process(&frame, now) {
            Ok(report) => report,
            Err(e) => {
                rejected += 1;
                log::error!("frame {} rejected: {:#}", frame.index, e);
                continue;
            }
        };

        if report.alert_active != alert_was_active {
            if report.alert_active {
                log::warn!("{} (frame {})", ALERT_BANNER, report.frame_index);
            } else {
                log::info!("alert cleared at t={:.2}s", report.timestamp_s);
            }
            alert_was_active = report.alert_active;
        }

        if args.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            log::debug!("frame {}: {}", report.frame_index, overlay_lines(&report).join(" | "));
        }

        if last_health_log.elapsed() >= Duration::from_secs(5) {
            let stats = source.stats();
            log::info!(
                "source health={} frames={} path={} falls={} alert={}",
                source.is_healthy(),
                stats.frames_read,
                stats.path,
                monitor.state().fall_count(),
                report.alert_active
            );
            last_health_log = Instant::now();
        }

        if paced {
            if let Some(remaining) = frame_interval.checked_sub(started.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
    }

    let state = monitor.state();
    log::info!(
        "fallwatchd stopped: frames={} rejected={} falls={} max_persons={}",
        monitor.frames_processed(),
        rejected,
        state.fall_count(),
        state.max_concurrent_persons()
    );
    Ok(())
}
