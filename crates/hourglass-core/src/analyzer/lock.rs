use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};
use tracing::{debug, info};

use crate::frame::{PixelBuffer, Rect};

/// Consecutive decode failures after which a locked rectangle is released
pub const LOCK_RELEASE_THRESHOLD: u32 = 100;

/// Which display a locked rectangle frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
pub enum DisplayRole {
    #[strum(serialize = "countdown")]
    Countdown,
    #[strum(serialize = "percentage")]
    Percentage,
}

/// A rectangle remembered across frames plus its failure streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegionLock {
    pub rect: Option<Rect>,
    pub failure_streak: u32,
}

impl RegionLock {
    pub fn locked(rect: Rect) -> Self {
        Self {
            rect: Some(rect),
            failure_streak: 0,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.rect.is_some()
    }

    pub(crate) fn lock(&mut self, role: DisplayRole, rect: Rect) {
        info!("Locked {} display at {:?}", role, rect);
        *self = Self::locked(rect);
    }

    /// Drop a rectangle that no longer fits the frame
    pub(crate) fn validate(&mut self, role: DisplayRole, buffer: &PixelBuffer) {
        if let Some(rect) = self.rect
            && !buffer.contains(&rect)
        {
            debug!(
                "Dropping {} lock {:?}: outside {}x{} frame",
                role,
                rect,
                buffer.width(),
                buffer.height()
            );
            *self = Self::default();
        }
    }

    /// Update the failure streak after a decode attempt of the locked rectangle
    pub(crate) fn record(&mut self, role: DisplayRole, decoded: bool) {
        if self.rect.is_none() {
            return;
        }
        if decoded {
            self.failure_streak = 0;
            return;
        }
        self.failure_streak += 1;
        if self.failure_streak >= LOCK_RELEASE_THRESHOLD {
            info!(
                "Releasing {} display after {} failed reads",
                role, self.failure_streak
            );
            *self = Self::default();
        }
    }
}

/// Locked display rectangles carried from one frame to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LockState {
    pub time: RegionLock,
    pub hp: RegionLock,
}

impl LockState {
    pub fn is_complete(&self) -> bool {
        self.time.is_locked() && self.hp.is_locked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_after_threshold() {
        let mut lock = RegionLock::locked(Rect::new(0, 0, 20, 20));
        for i in 1..LOCK_RELEASE_THRESHOLD {
            lock.record(DisplayRole::Countdown, false);
            assert_eq!(lock.failure_streak, i);
            assert!(lock.is_locked());
        }
        lock.record(DisplayRole::Countdown, false);
        assert_eq!(lock, RegionLock::default());
    }

    #[test]
    fn test_success_resets_streak() {
        let mut lock = RegionLock::locked(Rect::new(0, 0, 20, 20));
        for _ in 0..42 {
            lock.record(DisplayRole::Percentage, false);
        }
        lock.record(DisplayRole::Percentage, true);
        assert_eq!(lock.failure_streak, 0);
        assert!(lock.is_locked());
    }

    #[test]
    fn test_unlocked_region_does_not_count() {
        let mut lock = RegionLock::default();
        lock.record(DisplayRole::Countdown, false);
        assert_eq!(lock.failure_streak, 0);
    }

    #[test]
    fn test_validate_drops_out_of_frame_rect() {
        let frame = crate::frame::Frame::blank(50, 50);
        let mut lock = RegionLock::locked(Rect::new(40, 40, 20, 20));
        lock.failure_streak = 7;
        lock.validate(DisplayRole::Countdown, &frame.as_buffer());
        assert_eq!(lock, RegionLock::default());

        let mut inside = RegionLock::locked(Rect::new(10, 10, 20, 20));
        inside.validate(DisplayRole::Countdown, &frame.as_buffer());
        assert!(inside.is_locked());
    }
}
