//! # hourglass-core
//!
//! Core library for the Hourglass encounter timer.
//!
//! This crate provides:
//! - Recognition of the countdown and hp displays in captured frames
//! - Event marker detection
//! - Frame analysis with cross-frame display locking
//! - Timing prediction of the next event and spoken cue selection
//! - Overlay text output and session logging for the host application
//!
//! Frame analysis never fails: anything that cannot be recognized is reported
//! as an absent field of [`FrameReading`] and retried on the next frame.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod frame;
pub mod handoff;
pub mod predict;
pub mod storage;
pub mod stream;
pub mod vision;

pub use analyzer::{
    DisplayRole, FrameAnalyzer, FrameReading, LOCK_RELEASE_THRESHOLD, LockState, RegionLock,
    analyze_frame,
};
pub use config::{CONFIG_FILE, Config};
pub use error::{Error, Result};
pub use frame::{Frame, PixelBuffer, Rect};
pub use handoff::{FrameSlot, TakenFrame};
pub use predict::{
    Anchor, Cue, CueGate, Difficulty, Estimate, Prediction, PredictionState, TimingPredictor,
    advance, format_clock, predict,
};
pub use storage::{SessionLog, SessionRecord, read_session};
pub use stream::OverlayOutput;
