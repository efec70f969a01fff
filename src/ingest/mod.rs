//! Annotated frame sources.
//!
//! Sources hand the engine frames that the detector and pose estimator collaborators
//! have already annotated:
//! - Local JSON Lines files, one `AnnotatedFrame` per line
//! - Synthetic scripted scenarios (`stub://...`) for demos and tests
//!
//! Sources are responsible for:
//! - Assigning frame sequence numbers
//! - Stopping cleanly at end of input (`Ok(None)`)
//!
//! Sources MUST NOT fetch remote URLs.

pub mod file;
mod synthetic;

pub use file::{FileSource, FileStats};
pub use synthetic::{
    SyntheticScenario, SCENARIO_FRAME_HEIGHT, SCENARIO_FRAME_WIDTH, SCENARIO_NAMES,
};
