//! Operator-facing presentation: stage spinners on stderr and the per-frame overlay text.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::{Duration, Instant};

use crate::monitor::FrameReport;

pub const ALERT_BANNER: &str = "FALL DETECTED!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiMode {
    Auto,
    Plain,
    Pretty,
}

#[derive(Clone, Debug)]
pub struct Ui {
    mode: UiMode,
    is_tty: bool,
    disable_pretty: bool,
}

impl Ui {
    pub fn new(mode: UiMode, is_tty: bool, disable_pretty: bool) -> Self {
        Self {
            mode,
            is_tty,
            disable_pretty,
        }
    }

    pub fn from_args(ui_flag: Option<&str>, is_tty: bool, disable_pretty: bool) -> Self {
        let mode = match ui_flag {
            Some("plain") => UiMode::Plain,
            Some("pretty") => UiMode::Pretty,
            _ => UiMode::Auto,
        };
        Self::new(mode, is_tty, disable_pretty)
    }

    fn use_pretty(&self) -> bool {
        self.is_tty
            && match self.mode {
                UiMode::Pretty => true,
                UiMode::Auto => !self.disable_pretty,
                UiMode::Plain => false,
            }
    }

    pub fn stage(&self, name: &str) -> StageGuard {
        if self.use_pretty() {
            let spinner = ProgressBar::new_spinner();
            spinner.set_draw_target(ProgressDrawTarget::stderr());
            spinner.enable_steady_tick(Duration::from_millis(120));
            let style = ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            spinner.set_style(style);
            spinner.set_message(format!("{name}…"));
            StageGuard::new(name.to_string(), Some(spinner))
        } else {
            eprintln!("==> {}", name);
            StageGuard::new(name.to_string(), None)
        }
    }
}

pub struct StageGuard {
    name: String,
    start: Instant,
    spinner: Option<ProgressBar>,
}

impl StageGuard {
    fn new(name: String, spinner: Option<ProgressBar>) -> Self {
        Self {
            name,
            start: Instant::now(),
            spinner,
        }
    }

    /// Updates the spinner text; a no-op in plain mode.
    pub fn progress(&self, detail: &str) {
        if let Some(spinner) = &self.spinner {
            spinner.set_message(format!("{}… {}", self.name, detail));
        }
    }
}

impl Drop for StageGuard {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        let message = format!("✔ {} ({})", self.name, format_duration(elapsed));
        if let Some(spinner) = &self.spinner {
            spinner.finish_with_message(message);
        } else {
            eprintln!("{message}");
        }
    }
}

/// Text drawn over a frame: person count, running fall total, and the banner
/// while the alert window is open.
pub fn overlay_lines(report: &FrameReport) -> Vec<String> {
    let mut lines = vec![
        format!("people: {}", report.person_count),
        format!("falls: {}", report.fall_count),
    ];
    if report.alert_active {
        lines.push(ALERT_BANNER.to_string());
    }
    lines
}

pub fn format_duration(duration: Duration) -> String {
    if duration.as_secs() >= 1 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(person_count: usize, fall_count: u64, alert_active: bool) -> FrameReport {
        FrameReport {
            frame_index: 7,
            timestamp_s: 1.5,
            person_count,
            persons: Vec::new(),
            frame_has_new_fall: false,
            fall_count,
            alert_active,
        }
    }

    #[test]
    fn overlay_without_alert() {
        assert_eq!(overlay_lines(&report(2, 0, false)), vec!["people: 2", "falls: 0"]);
    }

    #[test]
    fn overlay_shows_banner_while_alert_is_active() {
        let lines = overlay_lines(&report(1, 3, true));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "falls: 3");
        assert_eq!(lines[2], ALERT_BANNER);
    }

    #[test]
    fn ui_mode_selection() {
        assert!(!Ui::from_args(Some("pretty"), false, false).use_pretty());
        assert!(Ui::from_args(Some("pretty"), true, true).use_pretty());
        assert!(!Ui::from_args(Some("plain"), true, false).use_pretty());
        assert!(!Ui::from_args(Some("auto"), true, true).use_pretty());
        assert!(Ui::from_args(None, true, false).use_pretty());
    }

    #[test]
    fn durations_switch_units_at_one_second() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }
}
