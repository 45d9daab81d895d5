//! Cache key grammar for report payloads.
//!
//! Keys are built from an explicit ordered-segment struct rather than ad
//! hoc string interpolation, so logically-equivalent filter inputs render
//! byte-identical keys. The invalidation patterns live next to the key
//! grammar for the same reason: the two cannot drift apart.
//!
//! Key shapes:
//!
//! ```text
//! attendance-report:individual:emp:<id>:<start>:<end>[:fmt:<format>]
//! attendance-report:group[:div:<id>][:sec:<id>][:sub:<id>]:<start>:<end>[:fmt:<format>]
//! attendance-report:hierarchy:<name>
//! ```

use serde::{Deserialize, Serialize};

use crate::types::PunchDate;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Namespace prefix identifying the report family.
pub const NAMESPACE: &str = "attendance-report";

/// Segment delimiter.
pub const DELIMITER: char = ':';

/// Sentinel filter value meaning "no filter".
pub const FILTER_ALL: &str = "all";

const SCOPE_INDIVIDUAL: &str = "individual";
const SCOPE_GROUP: &str = "group";
const SCOPE_HIERARCHY: &str = "hierarchy";

const SEG_EMPLOYEE: &str = "emp";
const SEG_DIVISION: &str = "div";
const SEG_SECTION: &str = "sec";
const SEG_SUB_SECTION: &str = "sub";

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Collapse an org filter value to its canonical form.
///
/// Trims whitespace; an empty string or the sentinel `"all"` (any case)
/// collapses to `None` so that an explicit "all" and an omitted filter
/// derive the same key.
pub fn normalize_org_value(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(FILTER_ALL) {
        None
    } else {
        Some(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Key scope
// ---------------------------------------------------------------------------

/// Whether a report is scoped to one employee or to an organizational
/// slice. Individual scope wins whenever an employee id is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyScope {
    Individual {
        employee_id: String,
    },
    Group {
        division: Option<String>,
        section: Option<String>,
        sub_section: Option<String>,
    },
}

impl KeyScope {
    pub fn is_individual(&self) -> bool {
        matches!(self, Self::Individual { .. })
    }
}

// ---------------------------------------------------------------------------
// ReportKey
// ---------------------------------------------------------------------------

/// The canonical, ordered ingredients of one report cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportKey {
    pub scope: KeyScope,
    pub start: PunchDate,
    pub end: PunchDate,
    /// Output format; `None` means the default JSON payload.
    pub format: Option<String>,
}

impl ReportKey {
    /// Render the key string, joining segments with [`DELIMITER`].
    pub fn render(&self) -> String {
        let mut segments: Vec<String> = vec![NAMESPACE.to_string()];

        match &self.scope {
            KeyScope::Individual { employee_id } => {
                segments.push(SCOPE_INDIVIDUAL.to_string());
                segments.push(SEG_EMPLOYEE.to_string());
                segments.push(employee_id.clone());
            }
            KeyScope::Group {
                division,
                section,
                sub_section,
            } => {
                segments.push(SCOPE_GROUP.to_string());
                for (tag, value) in [
                    (SEG_DIVISION, division),
                    (SEG_SECTION, section),
                    (SEG_SUB_SECTION, sub_section),
                ] {
                    if let Some(value) = value {
                        segments.push(tag.to_string());
                        segments.push(value.clone());
                    }
                }
            }
        }

        segments.push(self.start.to_string());
        segments.push(self.end.to_string());

        if let Some(ref format) = self.format {
            segments.push("fmt".to_string());
            segments.push(format.clone());
        }

        segments.join(&DELIMITER.to_string())
    }
}

// ---------------------------------------------------------------------------
// Hierarchy keys
// ---------------------------------------------------------------------------

/// Key for a cached management/hierarchy lookup (divisions, sections,
/// sub-sections).
pub fn hierarchy_key(name: &str) -> String {
    format!("{NAMESPACE}{DELIMITER}{SCOPE_HIERARCHY}{DELIMITER}{name}")
}

// ---------------------------------------------------------------------------
// Invalidation patterns
// ---------------------------------------------------------------------------

/// Pattern matching every key of one employee's individual reports.
pub fn individual_pattern_for_employee(employee_id: &str) -> String {
    format!("{NAMESPACE}:{SCOPE_INDIVIDUAL}:{SEG_EMPLOYEE}:{employee_id}:*")
}

/// Pattern matching every individual-report key.
pub fn all_individual_pattern() -> String {
    format!("{NAMESPACE}:{SCOPE_INDIVIDUAL}:*")
}

/// Pattern matching every group-report key.
pub fn all_group_pattern() -> String {
    format!("{NAMESPACE}:{SCOPE_GROUP}:*")
}

/// Pattern matching every key in the report namespace.
pub fn all_pattern() -> String {
    format!("{NAMESPACE}:*")
}

/// Pattern matching the group-report keys scoped to an organizational
/// slice. Segments appear in the same fixed order as in rendered keys.
///
/// Each value is anchored with a trailing delimiter (a rendered org
/// segment is always followed by one), so invalidating division `D1`
/// cannot touch `D10`.
pub fn group_pattern_for_org(
    division: Option<&str>,
    section: Option<&str>,
    sub_section: Option<&str>,
) -> String {
    let mut pattern = format!("{NAMESPACE}:{SCOPE_GROUP}:*");
    for (tag, value) in [
        (SEG_DIVISION, division),
        (SEG_SECTION, section),
        (SEG_SUB_SECTION, sub_section),
    ] {
        if let Some(value) = value {
            pattern.push_str(tag);
            pattern.push(DELIMITER);
            pattern.push_str(value);
            pattern.push(DELIMITER);
            pattern.push('*');
        }
    }
    pattern
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
