use crate::shutdown::ShutdownSignal;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// Replay controls bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Esc, q, Q or Ctrl+C
    Quit,
    /// m
    ToggleMute,
    /// d
    ToggleDifficulty,
}

/// Spawn a thread that turns key presses into [`KeyAction`]s.
///
/// `Quit` triggers the shutdown signal directly; other actions are sent to the
/// returned receiver for the replay loop to apply between frames.
pub fn spawn_keyboard_monitor(
    shutdown: Arc<ShutdownSignal>,
) -> (JoinHandle<()>, Receiver<KeyAction>) {
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        debug!("Keyboard monitor started");

        while !shutdown.is_shutdown() {
            let Some(action) = poll_action() else {
                continue;
            };
            debug!("Key action: {:?}", action);
            if action == KeyAction::Quit {
                shutdown.trigger();
                break;
            }
            if tx.send(action).is_err() {
                break;
            }
        }

        debug!("Keyboard monitor stopped");
    });
    (handle, rx)
}

fn poll_action() -> Option<KeyAction> {
    // Poll with a timeout to allow checking shutdown state
    if !event::poll(Duration::from_millis(100)).unwrap_or(false) {
        return None;
    }
    match event::read() {
        Ok(Event::Key(key_event)) => action_for(&key_event),
        _ => None,
    }
}

fn action_for(event: &KeyEvent) -> Option<KeyAction> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    match event.code {
        KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(KeyAction::Quit),
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Quit)
        }
        KeyCode::Char('m') => Some(KeyAction::ToggleMute),
        KeyCode::Char('d') => Some(KeyAction::ToggleDifficulty),
        _ => None,
    }
}
