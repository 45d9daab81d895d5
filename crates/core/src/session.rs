//! Employee-day session classification.
//!
//! A session is the set of punches one employee produced on one calendar
//! date. Sessions are derived per query and never persisted. A session is
//! complete iff it has at least one IN and at least one OUT scan;
//! otherwise it carries an issue classification used by the
//! reconciliation reports.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::punch::Punch;
use crate::scan::ScanDirection;
use crate::types::{PunchDate, PunchTime};

// ---------------------------------------------------------------------------
// String forms
// ---------------------------------------------------------------------------

pub const ISSUE_CHECK_IN_ONLY: &str = "check_in_only";
pub const ISSUE_CHECK_OUT_ONLY: &str = "check_out_only";
pub const ISSUE_UNKNOWN: &str = "unknown";

/// All valid issue-type strings.
pub const VALID_ISSUE_TYPES: &[&str] =
    &[ISSUE_CHECK_IN_ONLY, ISSUE_CHECK_OUT_ONLY, ISSUE_UNKNOWN];

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// How urgently an incomplete session needs attention.
///
/// Variant order matters: `Low < Medium < High`, so `Ord::max` picks the
/// most severe tag when aggregating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

// ---------------------------------------------------------------------------
// IssueType
// ---------------------------------------------------------------------------

/// Classification of an incomplete session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// At least one IN scan, no OUT scan.
    CheckInOnly,
    /// At least one OUT scan, no IN scan.
    CheckOutOnly,
    /// No recognizable scans at all.
    Unknown,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckInOnly => ISSUE_CHECK_IN_ONLY,
            Self::CheckOutOnly => ISSUE_CHECK_OUT_ONLY,
            Self::Unknown => ISSUE_UNKNOWN,
        }
    }

    /// Convert from the wire/database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            ISSUE_CHECK_IN_ONLY => Ok(Self::CheckInOnly),
            ISSUE_CHECK_OUT_ONLY => Ok(Self::CheckOutOnly),
            ISSUE_UNKNOWN => Ok(Self::Unknown),
            _ => Err(format!(
                "Invalid issue type '{s}'. Must be one of: {}",
                VALID_ISSUE_TYPES.join(", ")
            )),
        }
    }

    /// Severity the reports attach to this issue.
    pub fn severity(&self) -> Severity {
        match self {
            Self::CheckInOnly => Severity::High,
            Self::CheckOutOnly => Severity::Medium,
            Self::Unknown => Severity::Low,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Completeness state of one employee-day session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Complete,
    CheckInOnly,
    CheckOutOnly,
    Unknown,
}

impl SessionState {
    /// The issue a report would show for this state, if any.
    pub fn issue(&self) -> Option<IssueType> {
        match self {
            Self::Complete => None,
            Self::CheckInOnly => Some(IssueType::CheckInOnly),
            Self::CheckOutOnly => Some(IssueType::CheckOutOnly),
            Self::Unknown => Some(IssueType::Unknown),
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Result of classifying one employee-day session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionClassification {
    pub state: SessionState,
    pub issue: Option<IssueType>,
    pub severity: Option<Severity>,
    pub in_count: usize,
    pub out_count: usize,
    pub first_in: Option<PunchTime>,
    pub last_out: Option<PunchTime>,
}

/// Classify the punches of one employee-day session.
///
/// The caller is expected to pass punches already filtered to a single
/// employee and date. Only the presence of IN/OUT scans matters:
/// duplicate consecutive same-direction punches do not change the
/// classification.
pub fn classify(punches: &[Punch]) -> SessionClassification {
    let mut in_count = 0usize;
    let mut out_count = 0usize;
    let mut first_in: Option<PunchTime> = None;
    let mut last_out: Option<PunchTime> = None;

    for punch in punches {
        match ScanDirection::from_label(&punch.scan_type) {
            ScanDirection::In => {
                in_count += 1;
                first_in = Some(match first_in {
                    Some(t) => t.min(punch.time),
                    None => punch.time,
                });
            }
            ScanDirection::Out => {
                out_count += 1;
                last_out = Some(match last_out {
                    Some(t) => t.max(punch.time),
                    None => punch.time,
                });
            }
            ScanDirection::Unknown => {}
        }
    }

    let state = match (in_count, out_count) {
        (0, 0) => SessionState::Unknown,
        (_, 0) => SessionState::CheckInOnly,
        (0, _) => SessionState::CheckOutOnly,
        (_, _) => SessionState::Complete,
    };

    let issue = state.issue();

    SessionClassification {
        state,
        issue,
        severity: issue.map(|i| i.severity()),
        in_count,
        out_count,
        first_in,
        last_out,
    }
}

// ---------------------------------------------------------------------------
// Session partitioning
// ---------------------------------------------------------------------------

/// The punches of one employee on one date, ordered by time-of-day.
#[derive(Debug, Clone)]
pub struct EmployeeDaySession {
    pub employee_id: String,
    pub date: PunchDate,
    pub punches: Vec<Punch>,
}

impl EmployeeDaySession {
    pub fn classify(&self) -> SessionClassification {
        classify(&self.punches)
    }
}

/// Partition an arbitrary punch set into employee-day sessions.
///
/// Sessions come back ordered by (employee id, date); punches within a
/// session are ordered by time-of-day ascending.
pub fn sessions_of(punches: &[Punch]) -> Vec<EmployeeDaySession> {
    let mut buckets: BTreeMap<(String, PunchDate), Vec<Punch>> = BTreeMap::new();
    for punch in punches {
        buckets
            .entry((punch.employee_id.clone(), punch.date))
            .or_default()
            .push(punch.clone());
    }

    buckets
        .into_iter()
        .map(|((employee_id, date), mut punches)| {
            punches.sort_by_key(|p| p.time);
            EmployeeDaySession {
                employee_id,
                date,
                punches,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
