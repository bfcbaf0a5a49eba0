//! Single-slot frame handoff between a capture thread and the analysis thread.
//!
//! The producer never waits: a frame offered while the previous one is still
//! pending or being analyzed is dropped.

use std::ops::Deref;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::frame::Frame;

#[derive(Default)]
struct SlotState {
    pending: Option<Frame>,
    in_flight: bool,
    closed: bool,
    dropped: u64,
}

/// A bounded queue of one in-flight frame
#[derive(Default)]
pub struct FrameSlot {
    state: Mutex<SlotState>,
    condvar: Condvar,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hand a frame to the consumer.
    ///
    /// Returns `false` when the frame was dropped because the consumer is busy
    /// or the slot is closed.
    pub fn offer(&self, frame: Frame) -> bool {
        let mut state = self.state();
        if state.closed {
            return false;
        }
        if state.pending.is_some() || state.in_flight {
            state.dropped += 1;
            debug!("Consumer busy, dropped frame ({} total)", state.dropped);
            return false;
        }
        state.pending = Some(frame);
        drop(state);
        self.condvar.notify_one();
        true
    }

    /// Block until a frame is available.
    ///
    /// Returns `None` once the slot is closed and drained. The slot counts as
    /// busy until the returned guard is dropped.
    pub fn take(&self) -> Option<TakenFrame<'_>> {
        let guard = self.state();
        let mut state = self
            .condvar
            .wait_while(guard, |s| s.pending.is_none() && !s.closed)
            .unwrap_or_else(PoisonError::into_inner);
        let frame = state.pending.take()?;
        state.in_flight = true;
        Some(TakenFrame { slot: self, frame })
    }

    /// Stop accepting frames and wake the consumer
    pub fn close(&self) {
        self.state().closed = true;
        self.condvar.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    /// Frames dropped because the consumer was busy
    pub fn dropped(&self) -> u64 {
        self.state().dropped
    }

    fn finish(&self) {
        self.state().in_flight = false;
    }
}

/// A frame checked out of a [`FrameSlot`]
pub struct TakenFrame<'a> {
    slot: &'a FrameSlot,
    frame: Frame,
}

impl Deref for TakenFrame<'_> {
    type Target = Frame;

    fn deref(&self) -> &Frame {
        &self.frame
    }
}

impl Drop for TakenFrame<'_> {
    fn drop(&mut self) {
        self.slot.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_offer_drops_while_pending() {
        let slot = FrameSlot::new();
        assert!(slot.offer(Frame::blank(4, 4)));
        assert!(!slot.offer(Frame::blank(8, 8)));
        assert_eq!(slot.dropped(), 1);

        let frame = slot.take().unwrap();
        assert_eq!(frame.width(), 4);
    }

    #[test]
    fn test_offer_drops_while_analyzing() {
        let slot = FrameSlot::new();
        assert!(slot.offer(Frame::blank(4, 4)));
        let taken = slot.take().unwrap();
        assert!(!slot.offer(Frame::blank(4, 4)));
        drop(taken);
        assert!(slot.offer(Frame::blank(4, 4)));
        assert_eq!(slot.dropped(), 1);
    }

    #[test]
    fn test_take_waits_for_producer() {
        let slot = Arc::new(FrameSlot::new());
        let producer = Arc::clone(&slot);

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            producer.offer(Frame::blank(3, 2))
        });

        let frame = slot.take().unwrap();
        assert_eq!((frame.width(), frame.height()), (3, 2));
        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_close_wakes_consumer() {
        let slot = Arc::new(FrameSlot::new());
        let consumer = Arc::clone(&slot);

        let handle = thread::spawn(move || consumer.take().is_none());

        thread::sleep(Duration::from_millis(50));
        slot.close();
        assert!(handle.join().unwrap());
        assert!(slot.is_closed());
        assert!(!slot.offer(Frame::blank(1, 1)));
    }

    #[test]
    fn test_close_drains_pending_frame() {
        let slot = FrameSlot::new();
        assert!(slot.offer(Frame::blank(2, 2)));
        slot.close();
        assert!(slot.take().is_some());
        assert!(slot.take().is_none());
    }
}
