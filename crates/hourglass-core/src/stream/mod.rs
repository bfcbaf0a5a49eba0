//! Text file output for streaming overlays.
//!
//! Each file holds one value so an OBS text source (or any other renderer)
//! can display it directly:
//!
//! - `remaining.txt`: seconds until each estimated event, one per line
//! - `estimate.txt`: countdown value of each estimated event as `MM:SS`
//! - `countdown.txt`: extrapolated countdown
//! - `hp.txt`: last hp reading
//! - `cue.txt`: the cue of the latest prediction

mod output;

pub use output::*;
