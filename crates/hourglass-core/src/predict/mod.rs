//! Event timing prediction from successive frame readings.
//!
//! The predictor remembers the last countdown and hp it saw and the anchor of
//! the last confirmed event. Each update produces the estimated countdown
//! value of the next event, the seconds remaining until then and, when the
//! current second deserves one, a [`Cue`].

mod cue;
mod difficulty;

pub use cue::{Cue, CueGate, format_clock};
pub use difficulty::{Difficulty, Phase};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analyzer::FrameReading;

/// Marker signal above which a frame confirms an event
pub const EVENT_SIGNAL_THRESHOLD: f64 = 0.1;

/// Seconds between the event and the frame its marker first shows up in
const MARKER_LEAD_SECONDS: f64 = 2.0;

/// Countdown and hp at the last confirmed event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub event_time: i64,
    pub hp: f64,
}

impl Anchor {
    /// The event that opens every encounter
    pub const OPENING: Anchor = Anchor {
        event_time: 1784,
        hp: 100.0,
    };
}

/// Cross-frame memory of the predictor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionState {
    pub last_time: Option<u32>,
    /// Milliseconds timestamp of the frame where `last_time` first appeared
    pub last_time_observed_at: u64,
    pub last_hp: Option<f64>,
    pub anchor: Option<Anchor>,
}

impl PredictionState {
    pub fn with_anchor(anchor: Option<Anchor>) -> Self {
        Self {
            anchor,
            ..Default::default()
        }
    }

    /// Countdown the display shows now, extrapolated from the last read
    pub fn displayed_time(&self, now_ms: u64) -> Option<i64> {
        let elapsed = now_ms.saturating_sub(self.last_time_observed_at) / 1000;
        self.last_time.map(|time| i64::from(time) - elapsed as i64)
    }
}

/// One candidate for the next event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    /// Countdown value at which the event is expected
    pub event_time: i64,
    /// Seconds until then, never negative
    pub remaining: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Primary estimate first, the late alternative second
    pub estimates: Vec<Estimate>,
    pub cue: Option<Cue>,
    /// Extrapolated countdown, clamped at zero
    pub current_time: Option<i64>,
}

/// Compute the estimates for a state without changing it
pub fn predict(
    state: &PredictionState,
    difficulty: Difficulty,
    hp_unlocked: bool,
    now_ms: u64,
) -> Prediction {
    let (Some(last_time), Some(last_hp)) = (state.last_time, state.last_hp) else {
        return Prediction::default();
    };
    let current = state.displayed_time(now_ms).unwrap_or_default();
    let mut prediction = Prediction {
        current_time: Some(current.max(0)),
        ..Default::default()
    };
    let Some(anchor) = state.anchor else {
        return prediction;
    };

    let phase = difficulty.phase(anchor.hp);
    let primary = anchor.event_time - i64::from(difficulty.cycle(phase.index));
    let mut candidates = vec![primary];
    if phase.ambiguous {
        let late = primary + i64::from(difficulty.late_offset());
        if current - late >= 0 {
            candidates.push(late);
        }
    }
    let uncertain = candidates.len() > 1;

    prediction.estimates = candidates
        .into_iter()
        .filter(|&event_time| event_time >= 0)
        .map(|event_time| Estimate {
            event_time,
            remaining: (current - event_time).max(0),
        })
        .collect();

    prediction.cue = prediction.estimates.last().and_then(|last| {
        if hp_unlocked && last_time > 2 && last_hp > 2.0 {
            Some(Cue::NotRecognized)
        } else {
            u32::try_from(last.remaining)
                .ok()
                .and_then(|remaining| Cue::for_remaining(remaining, uncertain))
        }
    });
    prediction
}

/// Fold one frame reading into the state and predict from the result
pub fn advance(
    state: &PredictionState,
    difficulty: Difficulty,
    reading: &FrameReading,
    now_ms: u64,
) -> (PredictionState, Prediction) {
    let mut next = state.clone();

    if let Some(hp) = reading.hp {
        next.last_hp = Some(hp);
    }
    if let Some(time) = reading.time
        && next.last_time != Some(time)
    {
        next.last_time = Some(time);
        next.last_time_observed_at = now_ms;
    }

    if let (Some(time), Some(hp)) = (next.last_time, next.last_hp)
        && reading.pattern_signal > EVENT_SIGNAL_THRESHOLD
    {
        let elapsed = now_ms.saturating_sub(next.last_time_observed_at) as f64 / 1000.0;
        let anchor = Anchor {
            event_time: (f64::from(time) + MARKER_LEAD_SECONDS - elapsed).round() as i64,
            hp,
        };
        if next.anchor != Some(anchor) {
            info!(
                "Event confirmed at {} with hp {}",
                format_clock(anchor.event_time),
                anchor.hp
            );
        }
        next.anchor = Some(anchor);
    }

    let prediction = predict(&next, difficulty, reading.hp_unlocked(), now_ms);
    debug!("Prediction: {:?}", prediction);
    (next, prediction)
}

/// Predictor owning the state of one encounter
#[derive(Debug, Clone)]
pub struct TimingPredictor {
    difficulty: Difficulty,
    state: PredictionState,
}

impl TimingPredictor {
    /// Start from the opening anchor
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_state(difficulty, PredictionState::with_anchor(Some(Anchor::OPENING)))
    }

    pub fn with_state(difficulty: Difficulty, state: PredictionState) -> Self {
        Self { difficulty, state }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if self.difficulty != difficulty {
            info!("Difficulty changed to {}", difficulty);
            self.difficulty = difficulty;
        }
    }

    pub fn state(&self) -> &PredictionState {
        &self.state
    }

    pub fn update(&mut self, reading: &FrameReading, now_ms: u64) -> Prediction {
        let (state, prediction) = advance(&self.state, self.difficulty, reading, now_ms);
        self.state = state;
        prediction
    }
}
