//! Report aggregation strategies.
//!
//! Three mutually exclusive groupings over classified punch rows: PUNCH
//! (one member per raw row under a single catch-all group), DESIGNATION
//! (rows bucketed by designation string) and NONE (one member per
//! distinct employee with an issue count). Aggregation is pure and
//! synchronous; the caller fetches and classifies the rows first.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::punch::{DateRange, OrgFilter, Punch};
use crate::session::{IssueType, Severity};
use crate::types::{PunchDate, PunchTime};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Catch-all group name for the PUNCH strategy.
pub const GROUP_ALL_RECORDS: &str = "All Records";

/// Catch-all group name for the NONE strategy.
pub const GROUP_ALL_EMPLOYEES: &str = "All Employees";

/// Bucket name for rows whose employee has no designation.
pub const DESIGNATION_UNKNOWN: &str = "Unknown";

/// Default hard cap on PUNCH-strategy members. Bounds memory and latency
/// for unfiltered wide ranges; truncation is silent, not an error.
pub const DEFAULT_PUNCH_ROW_CAP: usize = 50_000;

pub const GROUPING_PUNCH: &str = "punch";
pub const GROUPING_DESIGNATION: &str = "designation";
pub const GROUPING_NONE: &str = "none";

/// All valid grouping strings.
pub const VALID_GROUPINGS: &[&str] = &[GROUPING_PUNCH, GROUPING_DESIGNATION, GROUPING_NONE];

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Report grouping strategy, selected explicitly by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    Punch,
    Designation,
    #[default]
    None,
}

impl Grouping {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Punch => GROUPING_PUNCH,
            Self::Designation => GROUPING_DESIGNATION,
            Self::None => GROUPING_NONE,
        }
    }

    /// Convert from the query-string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            GROUPING_PUNCH => Ok(Self::Punch),
            GROUPING_DESIGNATION => Ok(Self::Designation),
            GROUPING_NONE => Ok(Self::None),
            _ => Err(format!(
                "Invalid grouping '{s}'. Must be one of: {}",
                VALID_GROUPINGS.join(", ")
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Input rows
// ---------------------------------------------------------------------------

/// One classified punch row: the raw punch plus the issue its
/// employee-day session was classified with.
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub punch: Punch,
    pub issue: IssueType,
}

/// Tuning knobs for aggregation.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Hard cap on PUNCH-strategy members.
    pub punch_row_cap: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            punch_row_cap: DEFAULT_PUNCH_ROW_CAP,
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One employee-level row inside a report group.
///
/// The optional fields depend on the strategy: PUNCH and DESIGNATION
/// members carry the event columns, NONE members carry `issue_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMember {
    pub employee_id: String,
    pub employee_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    pub division: String,
    pub section: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<PunchDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<PunchTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<IssueType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_count: Option<u64>,
}

impl ReportMember {
    /// Member carrying the event columns of a single classified row.
    fn event_row(row: &ReportRow) -> Self {
        Self {
            employee_id: row.punch.employee_id.clone(),
            employee_name: row.punch.employee_name.clone(),
            designation: row.punch.designation.clone(),
            division: row.punch.division.clone(),
            section: row.punch.section.clone(),
            date: Some(row.punch.date),
            time: Some(row.punch.time),
            scan_type: Some(row.punch.scan_type.clone()),
            issue: Some(row.issue),
            severity: Some(row.issue.severity()),
            issue_count: None,
        }
    }
}

/// One bucket produced by an aggregation strategy. Groups are mutually
/// exclusive within a single report invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportGroup {
    pub name: String,
    /// Highest severity among member rows; absent for empty groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub count: usize,
    pub members: Vec<ReportMember>,
}

/// Aggregate figures over all groups, computed once per report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_employees: usize,
    pub total_groups: usize,
    pub total_records: u64,
    /// Human-readable description of the active filters.
    pub filters: String,
    pub date_range: DateRange,
}

/// A complete report: the grouped result set plus its summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub grouping: Grouping,
    pub date_range: DateRange,
    pub groups: Vec<ReportGroup>,
    pub summary: ReportSummary,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Aggregate classified rows under the selected grouping strategy.
///
/// The date range (inclusive on both ends) and the org filter are applied
/// as predicates before grouping. A filter matching nothing yields an
/// empty group set with zero counts, never an error.
pub fn aggregate(
    rows: &[ReportRow],
    grouping: Grouping,
    range: &DateRange,
    filter: &OrgFilter,
    options: &AggregateOptions,
) -> Report {
    let filtered: Vec<&ReportRow> = rows
        .iter()
        .filter(|r| range.contains(r.punch.date) && filter.matches(&r.punch))
        .collect();

    let filters = format!("{}, {}", range.describe(), filter.describe());

    if filtered.is_empty() {
        return Report {
            grouping,
            date_range: *range,
            groups: Vec::new(),
            summary: ReportSummary {
                total_employees: 0,
                total_groups: 0,
                total_records: 0,
                filters,
                date_range: *range,
            },
        };
    }

    let (groups, total_records) = match grouping {
        Grouping::Punch => aggregate_by_punch(filtered, options.punch_row_cap),
        Grouping::Designation => aggregate_by_designation(filtered),
        Grouping::None => aggregate_employee_summary(filtered),
    };

    let total_employees = groups
        .iter()
        .flat_map(|g| g.members.iter().map(|m| m.employee_id.as_str()))
        .collect::<BTreeSet<_>>()
        .len();

    let summary = ReportSummary {
        total_employees,
        total_groups: groups.len(),
        total_records,
        filters,
        date_range: *range,
    };

    Report {
        grouping,
        date_range: *range,
        groups,
        summary,
    }
}

/// PUNCH: one member per raw row under a single "All Records" group,
/// ordered by employee name then event date/time, capped at `row_cap`.
fn aggregate_by_punch(mut rows: Vec<&ReportRow>, row_cap: usize) -> (Vec<ReportGroup>, u64) {
    rows.sort_by(|a, b| {
        a.punch
            .employee_name
            .cmp(&b.punch.employee_name)
            .then(a.punch.date.cmp(&b.punch.date))
            .then(a.punch.time.cmp(&b.punch.time))
    });
    rows.truncate(row_cap);

    let severity = max_severity(&rows);
    let members: Vec<ReportMember> = rows.iter().map(|r| ReportMember::event_row(r)).collect();
    let total = members.len() as u64;

    let group = ReportGroup {
        name: GROUP_ALL_RECORDS.to_string(),
        severity,
        count: members.len(),
        members,
    };

    (vec![group], total)
}

/// DESIGNATION: rows bucketed by designation string, buckets ordered by
/// name, members ordered by employee name then event date/time.
fn aggregate_by_designation(rows: Vec<&ReportRow>) -> (Vec<ReportGroup>, u64) {
    let mut buckets: BTreeMap<String, Vec<&ReportRow>> = BTreeMap::new();
    for row in rows {
        let name = match row.punch.designation.as_deref() {
            Some(d) if !d.trim().is_empty() => d.to_string(),
            _ => DESIGNATION_UNKNOWN.to_string(),
        };
        buckets.entry(name).or_default().push(row);
    }

    let mut total = 0u64;
    let groups = buckets
        .into_iter()
        .map(|(name, mut bucket)| {
            bucket.sort_by(|a, b| {
                a.punch
                    .employee_name
                    .cmp(&b.punch.employee_name)
                    .then(a.punch.date.cmp(&b.punch.date))
                    .then(a.punch.time.cmp(&b.punch.time))
            });
            let severity = max_severity(&bucket);
            let members: Vec<ReportMember> =
                bucket.iter().map(|r| ReportMember::event_row(r)).collect();
            total += members.len() as u64;
            ReportGroup {
                name,
                severity,
                count: members.len(),
                members,
            }
        })
        .collect();

    (groups, total)
}

/// NONE: rows grouped by the employee identity 5-tuple; one member per
/// distinct employee with `issue_count`, ordered by issue count
/// descending then employee name ascending.
fn aggregate_employee_summary(rows: Vec<&ReportRow>) -> (Vec<ReportGroup>, u64) {
    type EmployeeKey = (String, String, Option<String>, String, String);

    let severity = max_severity(&rows);

    let mut counts: BTreeMap<EmployeeKey, u64> = BTreeMap::new();
    for row in rows {
        let key = (
            row.punch.employee_id.clone(),
            row.punch.employee_name.clone(),
            row.punch.designation.clone(),
            row.punch.division.clone(),
            row.punch.section.clone(),
        );
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut members: Vec<ReportMember> = counts
        .into_iter()
        .map(
            |((employee_id, employee_name, designation, division, section), count)| ReportMember {
                employee_id,
                employee_name,
                designation,
                division,
                section,
                date: None,
                time: None,
                scan_type: None,
                issue: None,
                severity: None,
                issue_count: Some(count),
            },
        )
        .collect();

    members.sort_by(|a, b| {
        b.issue_count
            .cmp(&a.issue_count)
            .then(a.employee_name.cmp(&b.employee_name))
    });

    let total: u64 = members.iter().filter_map(|m| m.issue_count).sum();

    let group = ReportGroup {
        name: GROUP_ALL_EMPLOYEES.to_string(),
        severity,
        count: members.len(),
        members,
    };

    (vec![group], total)
}

fn max_severity(rows: &[&ReportRow]) -> Option<Severity> {
    rows.iter().map(|r| r.issue.severity()).max()
}

// ---------------------------------------------------------------------------
// Row classification
// ---------------------------------------------------------------------------

/// Build the classified rows a reconciliation report aggregates over.
///
/// Punches are partitioned into employee-day sessions; punches belonging
/// to an incomplete session come back annotated with that session's
/// issue. Complete sessions are reconciled and contribute no rows.
pub fn issue_rows(punches: &[Punch]) -> Vec<ReportRow> {
    let mut rows = Vec::new();
    for session in crate::session::sessions_of(punches) {
        if let Some(issue) = session.classify().issue {
            rows.extend(
                session
                    .punches
                    .into_iter()
                    .map(|punch| ReportRow { punch, issue }),
            );
        }
    }
    rows
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn range(start_day: u32, end_day: u32) -> DateRange {
        DateRange {
            start: NaiveDate::from_ymd_opt(2026, 1, start_day).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 1, end_day).unwrap(),
        }
    }

    fn row(
        employee_id: &str,
        name: &str,
        designation: Option<&str>,
        division: &str,
        day: u32,
        hour: u32,
        issue: IssueType,
    ) -> ReportRow {
        ReportRow {
            punch: Punch {
                employee_id: employee_id.to_string(),
                employee_name: name.to_string(),
                designation: designation.map(String::from),
                division: division.to_string(),
                section: "S1".to_string(),
                sub_section: None,
                date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
                time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
                scan_type: "IN".to_string(),
                device_id: None,
            },
            issue,
        }
    }

    fn default_options() -> AggregateOptions {
        AggregateOptions::default()
    }

    // -- Grouping -------------------------------------------------------------

    #[test]
    fn grouping_string_round_trip() {
        for grouping in &[Grouping::Punch, Grouping::Designation, Grouping::None] {
            assert_eq!(
                Grouping::from_str_value(grouping.as_str()).unwrap(),
                *grouping
            );
        }
    }

    #[test]
    fn grouping_default_is_none() {
        assert_eq!(Grouping::default(), Grouping::None);
    }

    #[test]
    fn invalid_grouping_rejected() {
        assert!(Grouping::from_str_value("employee").is_err());
    }

    // -- PUNCH strategy -------------------------------------------------------

    #[test]
    fn punch_emits_one_member_per_row() {
        let rows = vec![
            row("E1", "Asha", Some("Clerk"), "D1", 26, 8, IssueType::CheckInOnly),
            row("E2", "Binod", Some("Peon"), "D1", 26, 9, IssueType::CheckOutOnly),
            row("E1", "Asha", Some("Clerk"), "D1", 27, 8, IssueType::CheckInOnly),
        ];

        let report = aggregate(
            &rows,
            Grouping::Punch,
            &range(26, 27),
            &OrgFilter::default(),
            &default_options(),
        );

        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].name, GROUP_ALL_RECORDS);
        assert_eq!(report.groups[0].count, 3);
        assert_eq!(report.summary.total_records, 3);
        assert_eq!(report.summary.total_employees, 2);
        assert_eq!(report.summary.total_groups, 1);
    }

    #[test]
    fn punch_members_ordered_by_name_then_time() {
        let rows = vec![
            row("E2", "Binod", None, "D1", 26, 9, IssueType::CheckInOnly),
            row("E1", "Asha", None, "D1", 26, 17, IssueType::CheckInOnly),
            row("E1", "Asha", None, "D1", 26, 8, IssueType::CheckInOnly),
        ];

        let report = aggregate(
            &rows,
            Grouping::Punch,
            &range(26, 26),
            &OrgFilter::default(),
            &default_options(),
        );

        let members = &report.groups[0].members;
        assert_eq!(members[0].employee_name, "Asha");
        assert_eq!(members[0].time, Some(NaiveTime::from_hms_opt(8, 0, 0).unwrap()));
        assert_eq!(members[1].employee_name, "Asha");
        assert_eq!(members[1].time, Some(NaiveTime::from_hms_opt(17, 0, 0).unwrap()));
        assert_eq!(members[2].employee_name, "Binod");
    }

    #[test]
    fn punch_members_carry_event_columns() {
        let rows = vec![row("E1", "Asha", Some("Clerk"), "D1", 26, 8, IssueType::CheckInOnly)];

        let report = aggregate(
            &rows,
            Grouping::Punch,
            &range(26, 26),
            &OrgFilter::default(),
            &default_options(),
        );

        let member = &report.groups[0].members[0];
        assert_eq!(member.scan_type.as_deref(), Some("IN"));
        assert_eq!(member.issue, Some(IssueType::CheckInOnly));
        assert_eq!(member.severity, Some(Severity::High));
        assert_eq!(member.issue_count, None);
    }

    #[test]
    fn punch_row_cap_truncates_silently() {
        let rows: Vec<ReportRow> = (0..10)
            .map(|i| row(&format!("E{i}"), &format!("Emp{i:02}"), None, "D1", 26, 8, IssueType::CheckInOnly))
            .collect();

        let report = aggregate(
            &rows,
            Grouping::Punch,
            &range(26, 26),
            &OrgFilter::default(),
            &AggregateOptions { punch_row_cap: 4 },
        );

        assert_eq!(report.groups[0].count, 4);
        assert_eq!(report.summary.total_records, 4);
    }

    // -- DESIGNATION strategy -------------------------------------------------

    #[test]
    fn designation_buckets_by_string_with_unknown_fallback() {
        let rows = vec![
            row("E1", "Asha", Some("Clerk"), "D1", 26, 8, IssueType::CheckInOnly),
            row("E2", "Binod", None, "D1", 26, 9, IssueType::CheckOutOnly),
        ];

        let report = aggregate(
            &rows,
            Grouping::Designation,
            &range(26, 26),
            &OrgFilter::default(),
            &default_options(),
        );

        let names: Vec<&str> = report.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Clerk", DESIGNATION_UNKNOWN]);
        assert_eq!(report.summary.total_groups, 2);
        assert_eq!(report.summary.total_records, 2);
    }

    #[test]
    fn designation_blank_string_maps_to_unknown() {
        let rows = vec![row("E1", "Asha", Some("  "), "D1", 26, 8, IssueType::Unknown)];

        let report = aggregate(
            &rows,
            Grouping::Designation,
            &range(26, 26),
            &OrgFilter::default(),
            &default_options(),
        );

        assert_eq!(report.groups[0].name, DESIGNATION_UNKNOWN);
    }

    #[test]
    fn designation_partition_is_exhaustive_and_disjoint() {
        let rows = vec![
            row("E1", "Asha", Some("Clerk"), "D1", 26, 8, IssueType::CheckInOnly),
            row("E2", "Binod", Some("Clerk"), "D1", 26, 9, IssueType::CheckInOnly),
            row("E3", "Chand", Some("Peon"), "D1", 26, 10, IssueType::CheckOutOnly),
            row("E4", "Disha", None, "D1", 26, 11, IssueType::Unknown),
        ];

        let report = aggregate(
            &rows,
            Grouping::Designation,
            &range(26, 26),
            &OrgFilter::default(),
            &default_options(),
        );

        let member_total: usize = report.groups.iter().map(|g| g.members.len()).sum();
        assert_eq!(member_total, rows.len());
        assert_eq!(report.summary.total_records, rows.len() as u64);
    }

    #[test]
    fn designation_group_severity_is_highest_member_severity() {
        let rows = vec![
            row("E1", "Asha", Some("Clerk"), "D1", 26, 8, IssueType::Unknown),
            row("E2", "Binod", Some("Clerk"), "D1", 26, 9, IssueType::CheckOutOnly),
        ];

        let report = aggregate(
            &rows,
            Grouping::Designation,
            &range(26, 26),
            &OrgFilter::default(),
            &default_options(),
        );

        assert_eq!(report.groups[0].severity, Some(Severity::Medium));
    }

    // -- NONE strategy --------------------------------------------------------

    #[test]
    fn none_counts_rows_per_employee() {
        let rows = vec![
            row("E1", "Asha", Some("Clerk"), "D1", 26, 8, IssueType::CheckInOnly),
            row("E1", "Asha", Some("Clerk"), "D1", 27, 8, IssueType::CheckInOnly),
            row("E2", "Binod", None, "D1", 26, 9, IssueType::CheckOutOnly),
        ];

        let report = aggregate(
            &rows,
            Grouping::None,
            &range(26, 27),
            &OrgFilter::default(),
            &default_options(),
        );

        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].name, GROUP_ALL_EMPLOYEES);
        assert_eq!(report.groups[0].count, 2);
        assert_eq!(report.summary.total_employees, 2);
        assert_eq!(report.summary.total_records, 3);

        let asha = &report.groups[0].members[0];
        assert_eq!(asha.employee_id, "E1");
        assert_eq!(asha.issue_count, Some(2));
    }

    #[test]
    fn none_members_ordered_by_count_desc_then_name() {
        let rows = vec![
            row("E1", "Asha", None, "D1", 26, 8, IssueType::CheckInOnly),
            row("E2", "Binod", None, "D1", 26, 9, IssueType::CheckInOnly),
            row("E2", "Binod", None, "D1", 27, 9, IssueType::CheckInOnly),
            row("E3", "Chand", None, "D1", 26, 10, IssueType::CheckInOnly),
        ];

        let report = aggregate(
            &rows,
            Grouping::None,
            &range(26, 27),
            &OrgFilter::default(),
            &default_options(),
        );

        let names: Vec<&str> = report.groups[0]
            .members
            .iter()
            .map(|m| m.employee_name.as_str())
            .collect();
        assert_eq!(names, vec!["Binod", "Asha", "Chand"]);
    }

    #[test]
    fn none_single_punch_scenario() {
        // A lone IN punch: one "All Employees" group, one member, count 1.
        let rows = vec![row("E1", "Asha", None, "D1", 26, 8, IssueType::CheckInOnly)];

        let report = aggregate(
            &rows,
            Grouping::None,
            &range(26, 26),
            &OrgFilter::default(),
            &default_options(),
        );

        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].name, GROUP_ALL_EMPLOYEES);
        assert_eq!(report.groups[0].members.len(), 1);
        assert_eq!(report.groups[0].members[0].employee_id, "E1");
        assert_eq!(report.groups[0].members[0].issue_count, Some(1));
        assert_eq!(report.summary.total_employees, 1);
    }

    #[test]
    fn none_distinguishes_employees_with_same_name() {
        let rows = vec![
            row("E1", "Asha", None, "D1", 26, 8, IssueType::CheckInOnly),
            row("E9", "Asha", None, "D1", 26, 9, IssueType::CheckInOnly),
        ];

        let report = aggregate(
            &rows,
            Grouping::None,
            &range(26, 26),
            &OrgFilter::default(),
            &default_options(),
        );

        assert_eq!(report.groups[0].members.len(), 2);
        assert_eq!(report.summary.total_employees, 2);
    }

    // -- Filtering ------------------------------------------------------------

    #[test]
    fn rows_outside_date_range_are_excluded() {
        let rows = vec![
            row("E1", "Asha", None, "D1", 26, 8, IssueType::CheckInOnly),
            row("E1", "Asha", None, "D1", 28, 8, IssueType::CheckInOnly),
        ];

        let report = aggregate(
            &rows,
            Grouping::None,
            &range(26, 27),
            &OrgFilter::default(),
            &default_options(),
        );

        assert_eq!(report.summary.total_records, 1);
    }

    #[test]
    fn org_filter_applies_before_grouping() {
        let rows = vec![
            row("E1", "Asha", None, "D1", 26, 8, IssueType::CheckInOnly),
            row("E2", "Binod", None, "D2", 26, 9, IssueType::CheckInOnly),
        ];

        let filter = OrgFilter {
            division: Some("D1".to_string()),
            ..Default::default()
        };

        let report = aggregate(&rows, Grouping::Punch, &range(26, 26), &filter, &default_options());
        assert_eq!(report.summary.total_records, 1);
        assert_eq!(report.groups[0].members[0].employee_id, "E1");
    }

    #[test]
    fn nonexistent_filter_yields_empty_report_not_error() {
        let rows = vec![row("E1", "Asha", None, "D1", 26, 8, IssueType::CheckInOnly)];

        let filter = OrgFilter {
            division: Some("NO-SUCH-DIVISION".to_string()),
            ..Default::default()
        };

        let report = aggregate(&rows, Grouping::None, &range(26, 26), &filter, &default_options());
        assert!(report.groups.is_empty());
        assert_eq!(report.summary.total_employees, 0);
        assert_eq!(report.summary.total_groups, 0);
        assert_eq!(report.summary.total_records, 0);
    }

    #[test]
    fn summary_filters_description_includes_range_and_org() {
        let rows = vec![row("E1", "Asha", None, "D1", 26, 8, IssueType::CheckInOnly)];
        let filter = OrgFilter {
            division: Some("D1".to_string()),
            ..Default::default()
        };

        let report = aggregate(&rows, Grouping::None, &range(26, 26), &filter, &default_options());
        assert_eq!(
            report.summary.filters,
            "2026-01-26 to 2026-01-26, division D1"
        );
    }

    // -- issue_rows -----------------------------------------------------------

    fn raw_punch(employee_id: &str, day: u32, hour: u32, scan_type: &str) -> Punch {
        Punch {
            employee_id: employee_id.to_string(),
            employee_name: format!("Employee {employee_id}"),
            designation: None,
            division: "D1".to_string(),
            section: "S1".to_string(),
            sub_section: None,
            date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            scan_type: scan_type.to_string(),
            device_id: None,
        }
    }

    #[test]
    fn complete_sessions_contribute_no_rows() {
        let punches = vec![
            raw_punch("E1", 26, 8, "IN"),
            raw_punch("E1", 26, 17, "OUT"),
        ];
        assert!(issue_rows(&punches).is_empty());
    }

    #[test]
    fn incomplete_sessions_annotate_every_punch() {
        let punches = vec![
            raw_punch("E1", 26, 8, "IN"),
            raw_punch("E1", 26, 9, "IN"),
            raw_punch("E2", 26, 17, "OUT"),
        ];

        let rows = issue_rows(&punches);
        assert_eq!(rows.len(), 3);
        assert!(rows
            .iter()
            .filter(|r| r.punch.employee_id == "E1")
            .all(|r| r.issue == IssueType::CheckInOnly));
        assert!(rows
            .iter()
            .filter(|r| r.punch.employee_id == "E2")
            .all(|r| r.issue == IssueType::CheckOutOnly));
    }

    #[test]
    fn unknown_scans_yield_unknown_rows() {
        let rows = issue_rows(&[raw_punch("E1", 26, 8, "BREAK")]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].issue, IssueType::Unknown);
    }

    #[test]
    fn sessions_are_classified_per_day() {
        // Complete on the 26th, check-in-only on the 27th.
        let punches = vec![
            raw_punch("E1", 26, 8, "IN"),
            raw_punch("E1", 26, 17, "OUT"),
            raw_punch("E1", 27, 8, "IN"),
        ];

        let rows = issue_rows(&punches);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].punch.date, NaiveDate::from_ymd_opt(2026, 1, 27).unwrap());
        assert_eq!(rows[0].issue, IssueType::CheckInOnly);
    }

    #[test]
    fn empty_input_yields_empty_report() {
        let report = aggregate(
            &[],
            Grouping::Designation,
            &range(26, 26),
            &OrgFilter::default(),
            &default_options(),
        );
        assert!(report.groups.is_empty());
        assert_eq!(report.summary.total_records, 0);
    }
}
