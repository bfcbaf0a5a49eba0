use crate::analyzer::FrameReading;
use crate::error::Result;
use crate::predict::{Cue, Estimate, Prediction};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{self};
use std::io::Write;
use std::path::{Path, PathBuf};

/// One line of a session file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub timestamp: DateTime<Local>,
    pub reading: FrameReading,
    pub estimates: Vec<Estimate>,
    pub cue: Option<Cue>,
}

impl SessionRecord {
    pub fn new(reading: &FrameReading, prediction: &Prediction) -> Self {
        Self {
            timestamp: Local::now(),
            reading: reading.clone(),
            estimates: prediction.estimates.clone(),
            cue: prediction.cue,
        }
    }
}

/// Appends newline-delimited JSON records under `<base>/<date>/session_<time>.ndjson`
pub struct SessionLog {
    base_dir: PathBuf,
    current_session: Option<PathBuf>,
}

impl SessionLog {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            current_session: None,
        }
    }

    pub fn start_session(&mut self) -> Result<PathBuf> {
        let now: DateTime<Local> = Local::now();
        let session_dir = self.base_dir.join(now.format("%Y-%m-%d").to_string());
        fs::create_dir_all(&session_dir)?;

        let session_file = session_dir.join(format!("session_{}.ndjson", now.format("%H%M%S")));
        self.current_session = Some(session_file.clone());

        Ok(session_file)
    }

    /// Append a record; a no-op before `start_session`
    pub fn append(&self, record: &SessionRecord) -> Result<()> {
        if let Some(ref path) = self.current_session {
            let line = serde_json::to_string(record)?;
            let mut file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }

    pub fn current_session_path(&self) -> Option<&Path> {
        self.current_session.as_deref()
    }
}

/// Read every record of a session file
pub fn read_session<P: AsRef<Path>>(path: P) -> Result<Vec<SessionRecord>> {
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| Ok(serde_json::from_str(line)?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Rect;

    #[test]
    fn test_session_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = SessionLog::new(dir.path());
        let path = log.start_session().unwrap();
        assert!(path.starts_with(dir.path()));
        assert_eq!(path.extension().unwrap(), "ndjson");

        let reading = FrameReading {
            time: Some(1700),
            time_rect: Some(Rect::new(20, 20, 400, 120)),
            hp: Some(97.5),
            ..Default::default()
        };
        let prediction = Prediction {
            estimates: vec![Estimate { event_time: 1604, remaining: 96 }],
            cue: Some(Cue::NotRecognized),
            current_time: Some(1700),
        };
        log.append(&SessionRecord::new(&reading, &prediction)).unwrap();
        log.append(&SessionRecord::new(&FrameReading::default(), &Prediction::default()))
            .unwrap();

        let records = read_session(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].reading, reading);
        assert_eq!(records[0].estimates, prediction.estimates);
        assert_eq!(records[0].cue, Some(Cue::NotRecognized));
        assert_eq!(records[1].cue, None);
    }

    #[test]
    fn test_append_without_session_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new(dir.path());
        log.append(&SessionRecord::new(&FrameReading::default(), &Prediction::default()))
            .unwrap();
        assert!(log.current_session_path().is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
