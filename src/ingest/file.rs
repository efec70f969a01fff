//! Local file frame source.
//!
//! `FileSource` reads annotated frames from a local JSON Lines file, or synthesizes a
//! scripted scenario when the path uses the `stub://` scheme.
//!
//! The file source MUST NOT:
//! - Fetch remote URLs
//! - Reorder frames

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};

use anyhow::{anyhow, Context, Result};

use super::synthetic::SyntheticScenario;
use crate::frame::AnnotatedFrame;

/// Configuration for a local file source.
#[derive(Clone, Debug)]
pub struct FileConfig {
    /// Local file path (e.g., "/var/lib/fallwatch/frames.jsonl") or "stub://<name>".
    pub path: String,
    /// Frame rate used to timestamp synthetic frames.
    pub target_fps: u32,
    /// Stop after this many frames. Synthetic scenarios run forever otherwise.
    pub max_frames: Option<u64>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            target_fps: 15,
            max_frames: None,
        }
    }
}

/// Local file frame source.
pub struct FileSource {
    backend: FileBackend,
    max_frames: Option<u64>,
    frames_read: u64,
    path: String,
}

enum FileBackend {
    Synthetic(SyntheticScenario),
    Jsonl(JsonlReader),
}

impl FileSource {
    pub fn new(config: FileConfig) -> Result<Self> {
        if !is_local_file_path(&config.path) {
            return Err(anyhow!(
                "file ingestion only supports local paths (no URL schemes)"
            ));
        }
        if config.target_fps == 0 {
            return Err(anyhow!("target_fps must be >= 1"));
        }
        let backend = if let Some(name) = config.path.strip_prefix("stub://") {
            FileBackend::Synthetic(SyntheticScenario::new(name, config.target_fps)?)
        } else {
            FileBackend::Jsonl(JsonlReader::new(config.path.clone()))
        };
        Ok(Self {
            backend,
            max_frames: config.max_frames,
            frames_read: 0,
            path: config.path,
        })
    }

    /// Open the underlying input.
    pub fn connect(&mut self) -> Result<()> {
        match &mut self.backend {
            FileBackend::Synthetic(scenario) => {
                log::info!("FileSource: connected to {} (synthetic)", self.path);
                scenario.reset();
                Ok(())
            }
            FileBackend::Jsonl(reader) => {
                reader.open()?;
                log::info!("FileSource: opened {}", self.path);
                Ok(())
            }
        }
    }

    /// Next frame, or `None` at end of input.
    pub fn next_frame(&mut self) -> Result<Option<AnnotatedFrame>> {
        if self.max_frames.is_some_and(|max| self.frames_read >= max) {
            return Ok(None);
        }
        let frame = match &mut self.backend {
            FileBackend::Synthetic(scenario) => Some(scenario.next_frame()),
            FileBackend::Jsonl(reader) => reader.next_frame()?,
        };
        Ok(frame.map(|mut frame| {
            frame.index = self.frames_read;
            self.frames_read += 1;
            frame
        }))
    }

    /// True for `stub://` scenarios, which generate frames as fast as they are pulled
    /// and are paced at `target_fps` by the caller.
    pub fn is_synthetic(&self) -> bool {
        matches!(self.backend, FileBackend::Synthetic(_))
    }

    /// Check if the source is healthy.
    pub fn is_healthy(&self) -> bool {
        match &self.backend {
            FileBackend::Synthetic(_) => true,
            FileBackend::Jsonl(reader) => reader.lines.is_some(),
        }
    }

    /// Get frame statistics.
    pub fn stats(&self) -> FileStats {
        FileStats {
            frames_read: self.frames_read,
            path: self.path.clone(),
        }
    }
}

/// Statistics for a file source.
#[derive(Clone, Debug)]
pub struct FileStats {
    pub frames_read: u64,
    pub path: String,
}

// ----------------------------------------------------------------------------
// JSON Lines reader
// ----------------------------------------------------------------------------

struct JsonlReader {
    path: String,
    lines: Option<Lines<BufReader<File>>>,
    line_no: usize,
}

impl JsonlReader {
    fn new(path: String) -> Self {
        Self {
            path,
            lines: None,
            line_no: 0,
        }
    }

    fn open(&mut self) -> Result<()> {
        let file = File::open(&self.path)
            .with_context(|| format!("failed to open frame file {}", self.path))?;
        self.lines = Some(BufReader::new(file).lines());
        self.line_no = 0;
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<AnnotatedFrame>> {
        let lines = self
            .lines
            .as_mut()
            .ok_or_else(|| anyhow!("frame file {} not opened; call connect()", self.path))?;
        for line in lines {
            self.line_no += 1;
            let line = line.with_context(|| format!("reading {}", self.path))?;
            if line.trim().is_empty() {
                continue;
            }
            let frame: AnnotatedFrame = serde_json::from_str(&line)
                .with_context(|| format!("{}:{}: invalid frame", self.path, self.line_no))?;
            return Ok(Some(frame));
        }
        Ok(None)
    }
}

fn is_local_file_path(path: &str) -> bool {
    if path.trim().is_empty() {
        return false;
    }
    if path.starts_with("stub://") {
        return true;
    }
    !path.contains("://")
}
