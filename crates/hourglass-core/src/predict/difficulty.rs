use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, FromRepr, IntoStaticStr};

/// Seconds between events, indexed by phase
const NORMAL_CYCLES: [u32; 2] = [180, 150];
const HARD_CYCLES: [u32; 3] = [150, 125, 100];

/// Phase boundaries, highest first: hp below `bounds[i]` means phase `i + 1`
const NORMAL_BOUNDS: [f64; 1] = [51.0];
const HARD_BOUNDS: [f64; 2] = [61.0, 31.0];

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    FromRepr,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Difficulty {
    #[default]
    #[strum(serialize = "normal")]
    Normal = 0,
    #[strum(serialize = "hard")]
    Hard = 1,
}

/// Phase of the encounter derived from an anchor hp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub index: usize,
    /// The hp sits exactly on a phase boundary
    pub ambiguous: bool,
}

impl Difficulty {
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    pub fn cycles(&self) -> &'static [u32] {
        match self {
            Self::Normal => &NORMAL_CYCLES,
            Self::Hard => &HARD_CYCLES,
        }
    }

    fn bounds(&self) -> &'static [f64] {
        match self {
            Self::Normal => &NORMAL_BOUNDS,
            Self::Hard => &HARD_BOUNDS,
        }
    }

    pub fn phase(&self, hp: f64) -> Phase {
        let bounds = self.bounds();
        Phase {
            index: bounds.iter().filter(|&&bound| hp < bound).count(),
            ambiguous: bounds.contains(&hp),
        }
    }

    /// Cycle length of the given phase
    pub fn cycle(&self, phase: usize) -> u32 {
        let cycles = self.cycles();
        cycles[phase.min(cycles.len() - 1)]
    }

    /// Shift from a phase-1 estimate to the phase-0 estimate of a boundary hp
    pub fn late_offset(&self) -> u32 {
        let cycles = self.cycles();
        cycles[0] - cycles[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_normal_phases() {
        let d = Difficulty::Normal;
        assert_eq!(d.phase(100.0), Phase { index: 0, ambiguous: false });
        assert_eq!(d.phase(51.0), Phase { index: 0, ambiguous: true });
        assert_eq!(d.phase(50.0), Phase { index: 1, ambiguous: false });
        assert_eq!(d.phase(0.5), Phase { index: 1, ambiguous: false });
    }

    #[test]
    fn test_hard_phases() {
        let d = Difficulty::Hard;
        assert_eq!(d.phase(61.0), Phase { index: 0, ambiguous: true });
        assert_eq!(d.phase(60.9), Phase { index: 1, ambiguous: false });
        assert_eq!(d.phase(31.0), Phase { index: 1, ambiguous: true });
        assert_eq!(d.phase(30.0), Phase { index: 2, ambiguous: false });
        assert_eq!(d.phase(51.0), Phase { index: 1, ambiguous: false });
    }

    #[test]
    fn test_cycles() {
        assert_eq!(Difficulty::Normal.cycle(1), 150);
        assert_eq!(Difficulty::Hard.cycle(2), 100);
        assert_eq!(Difficulty::Normal.late_offset(), 30);
        assert_eq!(Difficulty::Hard.late_offset(), 25);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Difficulty::from_str("Hard").unwrap(), Difficulty::Hard);
        assert_eq!(Difficulty::from_str("normal").unwrap(), Difficulty::Normal);
        assert!(Difficulty::from_str("extreme").is_err());
        assert_eq!(Difficulty::from_u8(1), Some(Difficulty::Hard));
        assert_eq!(Difficulty::Hard.to_string(), "hard");
    }
}
