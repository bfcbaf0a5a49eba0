use serde::{Deserialize, Serialize};

use crate::frame::Rect;

/// Everything recognized in one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReading {
    /// Countdown in seconds, when the countdown display decoded this frame
    pub time: Option<u32>,
    pub time_rect: Option<Rect>,
    /// Percentage shown by the hp display, when it decoded this frame
    pub hp: Option<f64>,
    pub hp_rect: Option<Rect>,
    /// Sum of the frame-area ratios of all significant event markers
    pub pattern_signal: f64,
    pub pattern_rects: Vec<Rect>,
}

impl FrameReading {
    /// Whether the hp display is currently unlocked
    pub fn hp_unlocked(&self) -> bool {
        self.hp_rect.is_none()
    }
}
