//! Scan-type label normalization.
//!
//! Time clocks report the scan direction as free text and the vocabulary
//! varies by device firmware. Raw labels stay the source of truth in the
//! `punches` table; this module maps them onto a closed variant at read
//! time via fixed, case-insensitive synonym sets.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Synonym sets
// ---------------------------------------------------------------------------

/// Labels (uppercased) that count as a check-in scan.
pub const IN_LABELS: &[&str] = &["IN", "I", "ON"];

/// Labels (uppercased) that count as a check-out scan.
pub const OUT_LABELS: &[&str] = &["OUT", "O", "OFF"];

// ---------------------------------------------------------------------------
// ScanDirection
// ---------------------------------------------------------------------------

/// Normalized direction of a single scan event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanDirection {
    In,
    Out,
    Unknown,
}

impl ScanDirection {
    /// Normalize a raw scan-type label.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Anything outside both synonym sets is `Unknown`.
    pub fn from_label(raw: &str) -> Self {
        let normalized = raw.trim().to_uppercase();
        if IN_LABELS.contains(&normalized.as_str()) {
            Self::In
        } else if OUT_LABELS.contains(&normalized.as_str()) {
            Self::Out
        } else {
            Self::Unknown
        }
    }

    /// Wire/string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::Unknown => "unknown",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
