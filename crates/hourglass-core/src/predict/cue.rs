use std::fmt;

use serde::{Deserialize, Serialize};

/// Something worth announcing to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cue {
    /// The hp display is lost while the encounter is running
    NotRecognized,
    /// Final seconds before the event
    Count(u32),
    Remaining {
        minutes: u32,
        seconds: u32,
        /// Two estimates are active and this one may be early
        uncertain: bool,
    },
}

impl Cue {
    /// Cue for `remaining` seconds, if this second is announced
    pub fn for_remaining(remaining: u32, uncertain: bool) -> Option<Self> {
        if remaining == 0 {
            None
        } else if remaining <= 10 {
            Some(Self::Count(remaining))
        } else if (remaining < 60 && remaining % 10 == 0) || remaining % 30 == 0 {
            Some(Self::Remaining {
                minutes: remaining / 60,
                seconds: remaining % 60,
                uncertain,
            })
        } else {
            None
        }
    }

    /// Whether the cue repeats while its condition holds
    pub fn is_repeating(&self) -> bool {
        matches!(self, Self::NotRecognized)
    }
}

fn plural(count: u32, unit: &str) -> String {
    if count > 1 {
        format!("{count} {unit}s")
    } else {
        format!("{count} {unit}")
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Cue::NotRecognized => write!(f, "HP not recognized."),
            Cue::Count(n) => write!(f, "{n}"),
            Cue::Remaining {
                minutes,
                seconds,
                uncertain,
            } => {
                let text = match (minutes, seconds) {
                    (0, s) => plural(s, "second"),
                    (m, 0) => plural(m, "minute"),
                    (m, s) => format!("{} and {}", plural(m, "minute"), plural(s, "second")),
                };
                write!(f, "{text} remaining.")?;
                if uncertain {
                    write!(f, " It might come late.")?;
                }
                Ok(())
            }
        }
    }
}

/// De-duplicates cues before they reach the speech collaborator.
///
/// A cue is admitted when it differs from the last admitted one. A repeating
/// cue is admitted again once `repeat_interval_ms` has passed.
#[derive(Debug, Clone)]
pub struct CueGate {
    repeat_interval_ms: u64,
    muted: bool,
    last: Option<(Cue, u64)>,
}

impl CueGate {
    pub fn new(repeat_interval_ms: u64) -> Self {
        Self {
            repeat_interval_ms,
            muted: false,
            last: None,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn admit(&mut self, cue: &Cue, now_ms: u64) -> bool {
        if self.muted {
            return false;
        }
        let admitted = match self.last {
            Some((last, at)) if last == *cue => {
                cue.is_repeating() && now_ms.saturating_sub(at) >= self.repeat_interval_ms
            }
            _ => true,
        };
        if admitted {
            self.last = Some((*cue, now_ms));
        }
        admitted
    }
}

/// `MM:SS` rendering of a second count, clamped at zero
pub fn format_clock(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
