//! Per-frame orchestration of the recognizers.
//!
//! [`analyze_frame`] is a pure function of a pixel buffer and the incoming
//! [`LockState`]; [`FrameAnalyzer`] owns the lock state for hosts that feed a
//! single video stream.

mod lock;
mod reading;

pub use lock::{DisplayRole, LOCK_RELEASE_THRESHOLD, LockState, RegionLock};
pub use reading::FrameReading;

use tracing::debug;

use crate::frame::PixelBuffer;
use crate::vision::layout::locator::MAX_START_FRACTION;
use crate::vision::{EdgeMap, detect_markers, find_rectangles, read_countdown, read_percentage};

/// Search the whole frame for whichever displays are not locked yet
fn discover(buffer: &PixelBuffer, lock: &mut LockState) {
    let map = EdgeMap::build(buffer, buffer.bounds());
    let max_x = buffer.width() as f64 * MAX_START_FRACTION;

    for rect in find_rectangles(&map) {
        if lock.is_complete() {
            break;
        }
        if rect.x as f64 > max_x {
            continue;
        }
        if !lock.time.is_locked() && read_countdown(buffer, &rect).is_some() {
            lock.time.lock(DisplayRole::Countdown, rect);
        } else if !lock.hp.is_locked() && read_percentage(buffer, &rect).is_some() {
            lock.hp.lock(DisplayRole::Percentage, rect);
        }
    }
}

/// Analyze one frame.
///
/// Returns the reading and the lock state to pass with the next frame.
pub fn analyze_frame(buffer: &PixelBuffer, lock: &LockState) -> (FrameReading, LockState) {
    let mut next = *lock;
    next.time.validate(DisplayRole::Countdown, buffer);
    next.hp.validate(DisplayRole::Percentage, buffer);

    if !next.is_complete() {
        discover(buffer, &mut next);
    }

    let time = next.time.rect.and_then(|rect| read_countdown(buffer, &rect));
    next.time.record(DisplayRole::Countdown, time.is_some());

    let hp = next.hp.rect.and_then(|rect| read_percentage(buffer, &rect));
    next.hp.record(DisplayRole::Percentage, hp.is_some());

    let markers = detect_markers(buffer);

    debug!(
        "Frame {}x{}: time={:?} hp={:?} markers={:.4} ({})",
        buffer.width(),
        buffer.height(),
        time,
        hp,
        markers.signal,
        markers.rects.len()
    );

    let reading = FrameReading {
        time,
        time_rect: next.time.rect,
        hp,
        hp_rect: next.hp.rect,
        pattern_signal: markers.signal,
        pattern_rects: markers.rects,
    };
    (reading, next)
}

/// Frame analyzer owning the lock state of one video stream
#[derive(Debug, Default)]
pub struct FrameAnalyzer {
    lock: LockState,
}

impl FrameAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously locked rectangles
    pub fn with_lock(lock: LockState) -> Self {
        Self { lock }
    }

    pub fn lock_state(&self) -> &LockState {
        &self.lock
    }

    /// Forget both locks so the next frame rediscovers them
    pub fn reset(&mut self) {
        self.lock = LockState::default();
    }

    pub fn analyze(&mut self, buffer: &PixelBuffer) -> FrameReading {
        let (reading, lock) = analyze_frame(buffer, &self.lock);
        self.lock = lock;
        reading
    }
}
