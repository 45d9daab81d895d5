//! Punch events and the filters reports apply to them.

use serde::{Deserialize, Serialize};

use crate::types::{PunchDate, PunchTime};

// ---------------------------------------------------------------------------
// Punch
// ---------------------------------------------------------------------------

/// One recorded scan event. Immutable once recorded; the engine only
/// reads punches, ingestion owns the writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Punch {
    /// Badge code reported by the time clock.
    pub employee_id: String,
    pub employee_name: String,
    pub designation: Option<String>,
    pub division: String,
    pub section: String,
    pub sub_section: Option<String>,
    pub date: PunchDate,
    pub time: PunchTime,
    /// Raw scan-type label exactly as the device reported it.
    pub scan_type: String,
    pub device_id: Option<String>,
}

// ---------------------------------------------------------------------------
// DateRange
// ---------------------------------------------------------------------------

/// Inclusive start-of-day-to-end-of-day date bound for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: PunchDate,
    pub end: PunchDate,
}

impl DateRange {
    /// Whether `date` falls inside the range (inclusive on both ends).
    pub fn contains(&self, date: PunchDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Human-readable form used in report summaries.
    pub fn describe(&self) -> String {
        format!("{} to {}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// OrgFilter
// ---------------------------------------------------------------------------

/// Optional equality constraints scoping a report to a division, section
/// or sub-section. Absent fields mean "no constraint"; the sentinel
/// value `"all"` is collapsed to absent before this struct is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgFilter {
    pub division: Option<String>,
    pub section: Option<String>,
    pub sub_section: Option<String>,
}

impl OrgFilter {
    /// True when no constraint is set.
    pub fn is_empty(&self) -> bool {
        self.division.is_none() && self.section.is_none() && self.sub_section.is_none()
    }

    /// Equality predicate applied to a punch before grouping.
    ///
    /// A sub-section constraint only matches punches that carry a
    /// sub-section; a filter referencing a value present on no punch
    /// simply matches nothing.
    pub fn matches(&self, punch: &Punch) -> bool {
        if let Some(ref division) = self.division {
            if punch.division != *division {
                return false;
            }
        }
        if let Some(ref section) = self.section {
            if punch.section != *section {
                return false;
            }
        }
        if let Some(ref sub_section) = self.sub_section {
            if punch.sub_section.as_deref() != Some(sub_section.as_str()) {
                return false;
            }
        }
        true
    }

    /// Human-readable form used in report summaries.
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return "all divisions".to_string();
        }
        let mut parts: Vec<String> = Vec::new();
        if let Some(ref division) = self.division {
            parts.push(format!("division {division}"));
        }
        if let Some(ref section) = self.section {
            parts.push(format!("section {section}"));
        }
        if let Some(ref sub_section) = self.sub_section {
            parts.push(format!("sub-section {sub_section}"));
        }
        parts.join(", ")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
