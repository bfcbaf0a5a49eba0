//! Replay of captured frames as a live feed.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use hourglass_core::{
    Config, CueGate, Difficulty, Frame, FrameAnalyzer, FrameSlot, OverlayOutput,
    PredictionState, SessionLog, SessionRecord, TimingPredictor, format_clock,
};
use tracing::{debug, info, warn};

use crate::input::{self, KeyAction};
use crate::shutdown::ShutdownSignal;

const FRAME_EXTENSIONS: [&str; 2] = ["png", "bmp"];

/// Run the replay of every frame image in `dir`
pub fn run(dir: &Path, fps: u32, difficulty: Difficulty, config: &Config) -> Result<()> {
    if fps == 0 {
        bail!("--fps must be at least 1");
    }
    let frames = list_frames(dir)?;
    if frames.is_empty() {
        bail!("No frame images found in {}", dir.display());
    }
    info!("Replaying {} frame(s) from {} at {} fps", frames.len(), dir.display(), fps);

    // Setup graceful shutdown handler
    let shutdown = Arc::new(ShutdownSignal::new());
    let shutdown_ctrlc = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal, stopping...");
        shutdown_ctrlc.trigger();
    })?;

    // Spawn keyboard input monitor (Esc, q, Q to quit)
    let (keyboard_handle, actions) = input::spawn_keyboard_monitor(Arc::clone(&shutdown));

    let slot = Arc::new(FrameSlot::new());
    let interval = Duration::from_secs(1) / fps;
    let producer = spawn_producer(frames, interval, Arc::clone(&slot), Arc::clone(&shutdown));

    println!("Replaying... (Esc or q to quit, m to mute, d to switch difficulty)");
    let processed = consume(&slot, &actions, difficulty, config);

    if producer.join().is_err() {
        warn!("Frame producer panicked");
    }
    shutdown.trigger();
    if keyboard_handle.join().is_err() {
        warn!("Keyboard monitor panicked");
    }

    let processed = processed?;
    info!(
        "Replay finished: {} frame(s) analyzed, {} dropped",
        processed,
        slot.dropped()
    );
    Ok(())
}

/// Image files of a directory in name order
fn list_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut frames: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    FRAME_EXTENSIONS
                        .iter()
                        .any(|known| ext.eq_ignore_ascii_case(known))
                })
        })
        .collect();
    frames.sort();
    Ok(frames)
}

fn spawn_producer(
    frames: Vec<PathBuf>,
    interval: Duration,
    slot: Arc<FrameSlot>,
    shutdown: Arc<ShutdownSignal>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        for path in frames {
            if shutdown.is_shutdown() {
                break;
            }
            match Frame::open(&path) {
                Ok(frame) => {
                    if !slot.offer(frame) {
                        debug!("Dropped {}", path.display());
                    }
                }
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
            if shutdown.wait(interval) {
                break;
            }
        }
        slot.close();
    })
}

fn consume(
    slot: &FrameSlot,
    actions: &Receiver<KeyAction>,
    difficulty: Difficulty,
    config: &Config,
) -> Result<u64> {
    let mut analyzer = FrameAnalyzer::new();
    let mut predictor = TimingPredictor::with_state(
        difficulty,
        PredictionState::with_anchor(config.opening.anchor()),
    );
    let mut gate = CueGate::new(config.cue.repeat_interval_ms);
    gate.set_muted(config.cue.muted);

    let overlay = OverlayOutput::new(config.overlay.enabled, &config.overlay.dir);
    overlay.prepare()?;

    let mut session = config
        .session
        .enabled
        .then(|| SessionLog::new(&config.session.dir));
    if let Some(log) = session.as_mut() {
        let path = log.start_session()?;
        info!("Session log: {}", path.display());
    }

    let start = Instant::now();
    let mut processed = 0;

    while let Some(frame) = slot.take() {
        for action in actions.try_iter() {
            apply_action(action, &mut predictor, &mut gate);
        }

        let now_ms = start.elapsed().as_millis() as u64;
        let reading = analyzer.analyze(&frame.as_buffer());
        drop(frame);
        let prediction = predictor.update(&reading, now_ms);
        processed += 1;

        if let Some(cue) = prediction.cue
            && gate.admit(&cue, now_ms)
        {
            let clock = prediction
                .current_time
                .map(format_clock)
                .unwrap_or_default();
            println!("[{}] {}", clock, cue);
        }

        if let Err(e) = overlay
            .write_prediction(&prediction)
            .and_then(|()| overlay.write_hp(predictor.state().last_hp))
        {
            warn!("Failed to write overlay: {}", e);
        }
        if let Some(log) = session.as_ref()
            && let Err(e) = log.append(&SessionRecord::new(&reading, &prediction))
        {
            warn!("Failed to append session record: {}", e);
        }
    }

    Ok(processed)
}

fn apply_action(action: KeyAction, predictor: &mut TimingPredictor, gate: &mut CueGate) {
    match action {
        KeyAction::ToggleMute => {
            let muted = gate.toggle_mute();
            println!("Cues {}", if muted { "muted" } else { "unmuted" });
        }
        KeyAction::ToggleDifficulty => {
            let next = match predictor.difficulty() {
                Difficulty::Normal => Difficulty::Hard,
                Difficulty::Hard => Difficulty::Normal,
            };
            predictor.set_difficulty(next);
            println!("Difficulty: {}", next);
        }
        KeyAction::Quit => {}
    }
}
