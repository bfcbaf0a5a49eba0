use crate::error::Result;
use crate::predict::{Prediction, format_clock};
use std::fs;
use std::path::{Path, PathBuf};

pub struct OverlayOutput {
    enabled: bool,
    base_dir: PathBuf,
}

impl OverlayOutput {
    pub fn new<P: AsRef<Path>>(enabled: bool, base_dir: P) -> Self {
        Self {
            enabled,
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Create the output directory
    pub fn prepare(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        fs::create_dir_all(&self.base_dir)?;
        Ok(())
    }

    /// Write estimates, countdown and cue of one prediction
    pub fn write_prediction(&self, prediction: &Prediction) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let remaining: Vec<String> = prediction
            .estimates
            .iter()
            .map(|e| e.remaining.to_string())
            .collect();
        let estimates: Vec<String> = prediction
            .estimates
            .iter()
            .map(|e| format_clock(e.event_time))
            .collect();
        let countdown = prediction.current_time.map(format_clock).unwrap_or_default();
        let cue = prediction.cue.map(|c| c.to_string()).unwrap_or_default();

        self.write_file("remaining.txt", &remaining.join("\n"))?;
        self.write_file("estimate.txt", &estimates.join("\n"))?;
        self.write_file("countdown.txt", &countdown)?;
        self.write_file("cue.txt", &cue)?;
        Ok(())
    }

    pub fn write_hp(&self, hp: Option<f64>) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let content = hp.map(|hp| format!("{hp}%")).unwrap_or_default();
        self.write_file("hp.txt", &content)
    }

    /// Clear every overlay file
    pub fn clear(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        for name in ["remaining.txt", "estimate.txt", "countdown.txt", "hp.txt", "cue.txt"] {
            self.write_file(name, "")?;
        }
        Ok(())
    }

    fn write_file(&self, filename: &str, content: &str) -> Result<()> {
        let path = self.base_dir.join(filename);
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::{Cue, Estimate};

    fn read(dir: &Path, name: &str) -> String {
        fs::read_to_string(dir.join(name)).unwrap()
    }

    #[test]
    fn test_writes_prediction_files() {
        let dir = tempfile::tempdir().unwrap();
        let output = OverlayOutput::new(true, dir.path());
        let prediction = Prediction {
            estimates: vec![
                Estimate { event_time: 920, remaining: 80 },
                Estimate { event_time: 950, remaining: 50 },
            ],
            cue: Some(Cue::Count(5)),
            current_time: Some(1000),
        };

        output.write_prediction(&prediction).unwrap();
        output.write_hp(Some(51.0)).unwrap();

        assert_eq!(read(dir.path(), "remaining.txt"), "80\n50");
        assert_eq!(read(dir.path(), "estimate.txt"), "15:20\n15:50");
        assert_eq!(read(dir.path(), "countdown.txt"), "16:40");
        assert_eq!(read(dir.path(), "cue.txt"), "5");
        assert_eq!(read(dir.path(), "hp.txt"), "51%");

        output.clear().unwrap();
        assert_eq!(read(dir.path(), "remaining.txt"), "");
    }

    #[test]
    fn test_disabled_output_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = OverlayOutput::new(false, dir.path().join("overlay"));
        output.prepare().unwrap();
        output.write_prediction(&Prediction::default()).unwrap();
        output.write_hp(Some(10.0)).unwrap();
        assert!(!dir.path().join("overlay").exists());
    }

    #[test]
    fn test_prepare_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output = OverlayOutput::new(true, dir.path().join("nested/overlay"));
        output.prepare().unwrap();
        output.write_hp(None).unwrap();
        assert_eq!(read(&dir.path().join("nested/overlay"), "hp.txt"), "");
    }
}
