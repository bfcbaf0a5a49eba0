//! One-shot estimate from a confirmed event.

use anyhow::{Result, bail};
use hourglass_core::{Anchor, Difficulty, Prediction, PredictionState, format_clock, predict};

/// Print the estimate table for an event seen at countdown `time` with `hp`
pub fn run(time: u32, hp: f64, now: Option<u32>, difficulty: Difficulty) -> Result<()> {
    if !(0.0..=100.0).contains(&hp) {
        bail!("HP must be between 0 and 100, got {}", hp);
    }
    let now = now.unwrap_or(time);
    if now > time {
        bail!("Current countdown {} is before the event at {}", now, time);
    }

    let state = PredictionState {
        last_time: Some(now),
        last_time_observed_at: 0,
        last_hp: Some(hp),
        anchor: Some(Anchor {
            event_time: i64::from(time),
            hp,
        }),
    };
    let prediction = predict(&state, difficulty, false, 0);

    print!("{}", format_table(&prediction, difficulty));
    Ok(())
}

fn format_table(prediction: &Prediction, difficulty: Difficulty) -> String {
    let mut out = format!("Difficulty: {}\n", difficulty);
    if prediction.estimates.is_empty() {
        out.push_str("No upcoming event\n");
        return out;
    }

    out.push_str("EVENT  REMAINING\n");
    for estimate in &prediction.estimates {
        out.push_str(&format!(
            "{}  {:>8}s\n",
            format_clock(estimate.event_time),
            estimate.remaining
        ));
    }
    if let Some(cue) = prediction.cue {
        out.push_str(&format!("Cue: {}\n", cue));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hourglass_core::{Cue, Estimate};

    #[test]
    fn test_format_table() {
        let prediction = Prediction {
            estimates: vec![
                Estimate { event_time: 920, remaining: 80 },
                Estimate { event_time: 950, remaining: 50 },
            ],
            cue: Some(Cue::Remaining { minutes: 0, seconds: 50, uncertain: true }),
            current_time: Some(1000),
        };
        assert_eq!(
            format_table(&prediction, Difficulty::Normal),
            "Difficulty: normal\n\
             EVENT  REMAINING\n\
             15:20        80s\n\
             15:50        50s\n\
             Cue: 50 seconds remaining. It might come late.\n"
        );
    }

    #[test]
    fn test_format_empty_table() {
        assert_eq!(
            format_table(&Prediction::default(), Difficulty::Hard),
            "Difficulty: hard\nNo upcoming event\n"
        );
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(run(1000, 120.0, None, Difficulty::Normal).is_err());
        assert!(run(1000, 50.0, Some(1100), Difficulty::Normal).is_err());
        assert!(run(1000, 50.0, Some(900), Difficulty::Normal).is_ok());
    }
}
