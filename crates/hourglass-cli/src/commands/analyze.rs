//! Frame analysis command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hourglass_core::{Frame, FrameAnalyzer, FrameReading, format_clock};
use tracing::info;

/// Run the analyzer over the given images in order
pub fn run(images: &[PathBuf], json: bool) -> Result<()> {
    let mut analyzer = FrameAnalyzer::new();

    for path in images {
        let frame =
            Frame::open(path).with_context(|| format!("Failed to load {}", path.display()))?;
        let reading = analyzer.analyze(&frame.as_buffer());

        if json {
            println!("{}", serde_json::to_string(&reading)?);
        } else {
            println!("{}", format_reading(path, &reading));
        }
    }

    info!("Analyzed {} frame(s)", images.len());
    Ok(())
}

fn format_reading(path: &Path, reading: &FrameReading) -> String {
    let time = reading
        .time
        .map(|t| format_clock(i64::from(t)))
        .unwrap_or_else(|| "--:--".to_string());
    let hp = reading
        .hp
        .map(|hp| format!("{hp}%"))
        .unwrap_or_else(|| "--".to_string());
    format!(
        "{}: time {} hp {} markers {:.4} ({})",
        path.display(),
        time,
        hp,
        reading.pattern_signal,
        reading.pattern_rects.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_reading() {
        let reading = FrameReading {
            time: Some(1784),
            hp: Some(45.6),
            pattern_signal: 0.05,
            ..Default::default()
        };
        assert_eq!(
            format_reading(Path::new("a.png"), &reading),
            "a.png: time 29:44 hp 45.6% markers 0.0500 (0)"
        );
    }

    #[test]
    fn test_format_empty_reading() {
        assert_eq!(
            format_reading(Path::new("b.png"), &FrameReading::default()),
            "b.png: time --:-- hp -- markers 0.0000 (0)"
        );
    }
}
