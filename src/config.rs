use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

use crate::detect::{SuppressionParams, DEFAULT_OVERLAP_THRESHOLD, DEFAULT_SCORE_THRESHOLD};
use crate::fall::{
    FallPolicy, DEFAULT_ALERT_DURATION_SECS, DEFAULT_COOLDOWN_SECS, DEFAULT_MAX_TRACKED_IDENTITIES,
};

const DEFAULT_SOURCE: &str = "stub://fall_scenario";
const DEFAULT_TARGET_FPS: u32 = 15;
const DEFAULT_CONFIDENCE_FLOOR: f32 = 0.3;

#[derive(Debug, Deserialize, Default)]
struct MonitorConfigFile {
    source: Option<SourceConfigFile>,
    detection: Option<DetectionConfigFile>,
    fall: Option<FallConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct SourceConfigFile {
    path: Option<String>,
    target_fps: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct DetectionConfigFile {
    confidence_floor: Option<f32>,
    score_threshold: Option<f32>,
    overlap_threshold: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
struct FallConfigFile {
    cooldown_secs: Option<f64>,
    alert_duration_secs: Option<f64>,
    max_tracked_identities: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub source: SourceSettings,
    pub detection: DetectionSettings,
    pub fall: FallSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    /// Local JSON Lines file, or `stub://<name>` for a synthetic scenario.
    pub path: String,
    pub target_fps: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionSettings {
    /// Detector-boundary floor; candidates must score strictly above it.
    pub confidence_floor: f32,
    pub score_threshold: f32,
    pub overlap_threshold: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallSettings {
    pub cooldown_secs: f64,
    pub alert_duration_secs: f64,
    pub max_tracked_identities: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::from_file(MonitorConfigFile::default())
    }
}

impl MonitorConfig {
    /// Loads from the file named by `FALLWATCH_CONFIG` (if set), then applies env overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("FALLWATCH_CONFIG").ok();
        Self::load_from(config_path.as_deref().map(Path::new))
    }

    /// Loads from an explicit file (if any), then applies env overrides.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => Some(read_config_file(path)?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: MonitorConfigFile) -> Self {
        let source = file.source.unwrap_or_default();
        let detection = file.detection.unwrap_or_default();
        let fall = file.fall.unwrap_or_default();
        Self {
            source: SourceSettings {
                path: source.path.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
                target_fps: source.target_fps.unwrap_or(DEFAULT_TARGET_FPS),
            },
            detection: DetectionSettings {
                confidence_floor: detection
                    .confidence_floor
                    .unwrap_or(DEFAULT_CONFIDENCE_FLOOR),
                score_threshold: detection
                    .score_threshold
                    .unwrap_or(DEFAULT_SCORE_THRESHOLD),
                overlap_threshold: detection
                    .overlap_threshold
                    .unwrap_or(DEFAULT_OVERLAP_THRESHOLD),
            },
            fall: FallSettings {
                cooldown_secs: fall.cooldown_secs.unwrap_or(DEFAULT_COOLDOWN_SECS),
                alert_duration_secs: fall
                    .alert_duration_secs
                    .unwrap_or(DEFAULT_ALERT_DURATION_SECS),
                max_tracked_identities: fall
                    .max_tracked_identities
                    .unwrap_or(DEFAULT_MAX_TRACKED_IDENTITIES),
            },
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(source) = std::env::var("FALLWATCH_SOURCE") {
            if !source.trim().is_empty() {
                self.source.path = source;
            }
        }
        if let Some(secs) = parse_env::<f64>("FALLWATCH_COOLDOWN_SECS")? {
            self.fall.cooldown_secs = secs;
        }
        if let Some(secs) = parse_env::<f64>("FALLWATCH_ALERT_SECS")? {
            self.fall.alert_duration_secs = secs;
        }
        if let Some(threshold) = parse_env::<f32>("FALLWATCH_SCORE_THRESHOLD")? {
            self.detection.score_threshold = threshold;
        }
        if let Some(threshold) = parse_env::<f32>("FALLWATCH_OVERLAP_THRESHOLD")? {
            self.detection.overlap_threshold = threshold;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.source.path.trim().is_empty() {
            return Err(anyhow!("source path must not be empty"));
        }
        if self.source.target_fps == 0 {
            return Err(anyhow!("target_fps must be >= 1"));
        }
        if !(0.0..=1.0).contains(&self.detection.confidence_floor) {
            return Err(anyhow!("confidence_floor must be within 0..=1"));
        }
        self.suppression_params().validate()?;
        self.fall_policy().validate()?;
        if self.fall.max_tracked_identities == 0 {
            return Err(anyhow!("max_tracked_identities must be greater than zero"));
        }
        Ok(())
    }

    pub fn suppression_params(&self) -> SuppressionParams {
        SuppressionParams {
            score_threshold: self.detection.score_threshold,
            overlap_threshold: self.detection.overlap_threshold,
        }
    }

    pub fn fall_policy(&self) -> FallPolicy {
        FallPolicy {
            cooldown_secs: self.fall.cooldown_secs,
            alert_duration_secs: self.fall.alert_duration_secs,
        }
    }
}

fn read_config_file(path: &Path) -> Result<MonitorConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg: MonitorConfigFile = if is_toml {
        toml::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("{} must be a number", key)),
        _ => Ok(None),
    }
}
