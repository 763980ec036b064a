//! Upgrade plan types: hops and remediation steps

use serde::{Deserialize, Serialize};

use crate::version::PlatformVersion;

/// Complexity tier of a single hop, derived from the major-version delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Complexity {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Complexity {
    /// Map a major-version delta to a tier
    pub fn from_major_delta(delta: u32) -> Self {
        match delta {
            0 => Complexity::Low,
            1 => Complexity::Medium,
            2 => Complexity::High,
            _ => Complexity::VeryHigh,
        }
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Complexity::Low => write!(f, "Low"),
            Complexity::Medium => write!(f, "Medium"),
            Complexity::High => write!(f, "High"),
            Complexity::VeryHigh => write!(f, "Very High"),
        }
    }
}

/// One version-to-version leg of an upgrade plan
///
/// Within one plan hops are contiguous: hop *i*'s `to` equals hop
/// *i+1*'s `from`. Created fresh on every planning call; only `steps`
/// is attached after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hop {
    /// Version this hop starts from
    pub from: PlatformVersion,

    /// Version this hop lands on
    pub to: PlatformVersion,

    /// Complexity tier
    pub complexity: Complexity,

    /// True when major versions differ
    pub breaking: bool,

    /// True for the single direct hop of an allowed downgrade
    pub is_downgrade: bool,

    /// Ordered remediation steps for this hop
    #[serde(default)]
    pub steps: Vec<RemediationStep>,
}

impl Hop {
    /// Create a hop with tier and breaking flag derived from the endpoints
    pub fn new(from: PlatformVersion, to: PlatformVersion) -> Self {
        let delta = from.major_delta(&to);
        Self {
            breaking: from.major != to.major,
            complexity: Complexity::from_major_delta(delta),
            is_downgrade: false,
            steps: Vec::new(),
            from,
            to,
        }
    }

    /// Create the single direct hop of an allowed downgrade
    pub fn downgrade(from: PlatformVersion, to: PlatformVersion) -> Self {
        Self {
            complexity: Complexity::VeryHigh,
            breaking: true,
            is_downgrade: true,
            steps: Vec::new(),
            from,
            to,
        }
    }
}

/// One ordered remediation action within a hop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediationStep {
    /// Short step title
    pub title: String,

    /// Literal commands (composer mode) or instructional text (legacy mode)
    pub commands: Vec<String>,

    /// Optional cautionary note
    #[serde(default)]
    pub note: Option<String>,
}

impl RemediationStep {
    /// Create a step from a title and command list
    pub fn new(title: impl Into<String>, commands: Vec<String>) -> Self {
        Self {
            title: title.into(),
            commands,
            note: None,
        }
    }

    /// Attach a cautionary note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complexity_from_delta() {
        assert_eq!(Complexity::from_major_delta(0), Complexity::Low);
        assert_eq!(Complexity::from_major_delta(1), Complexity::Medium);
        assert_eq!(Complexity::from_major_delta(2), Complexity::High);
        assert_eq!(Complexity::from_major_delta(3), Complexity::VeryHigh);
        assert_eq!(Complexity::from_major_delta(7), Complexity::VeryHigh);
    }

    #[test]
    fn test_hop_derives_breaking_flag() {
        let minor = Hop::new("12.0".parse().unwrap(), "12.4".parse().unwrap());
        assert!(!minor.breaking);
        assert_eq!(minor.complexity, Complexity::Low);

        let major = Hop::new("11.5".parse().unwrap(), "12.4".parse().unwrap());
        assert!(major.breaking);
        assert_eq!(major.complexity, Complexity::Medium);
    }

    #[test]
    fn test_downgrade_hop_is_very_high() {
        let hop = Hop::downgrade("12.4".parse().unwrap(), "11.5".parse().unwrap());
        assert!(hop.is_downgrade);
        assert!(hop.breaking);
        assert_eq!(hop.complexity, Complexity::VeryHigh);
    }
}
