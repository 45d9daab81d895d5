//! Report query parameters and their normalization.
//!
//! The HTTP surface accepts two spellings for most fields
//! (`from_date`/`startDate`, …); both collapse to one canonical
//! [`ReportRequest`] here, before any cache key is derived. Date-range
//! validation also happens here: the engine itself assumes pre-validated
//! input.

use chrono::NaiveDate;
use serde::Deserialize;

use punchcard_core::cache_key::{normalize_org_value, KeyScope, ReportKey};
use punchcard_core::error::CoreError;
use punchcard_core::punch::{DateRange, OrgFilter};
use punchcard_core::report::Grouping;

/// Raw query parameters for `GET /reports/attendance`.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(alias = "startDate")]
    pub from_date: Option<String>,
    #[serde(alias = "endDate")]
    pub to_date: Option<String>,
    pub grouping: Option<String>,
    #[serde(alias = "divisionId")]
    pub division_id: Option<String>,
    #[serde(alias = "sectionId")]
    pub section_id: Option<String>,
    #[serde(alias = "subSectionId")]
    pub sub_section_id: Option<String>,
    #[serde(alias = "employeeId")]
    pub employee_id: Option<String>,
    pub format: Option<String>,
}

/// A validated, canonical report request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub grouping: Grouping,
    pub range: DateRange,
    pub filter: OrgFilter,
    pub employee_id: Option<String>,
    pub format: Option<String>,
}

impl ReportQuery {
    /// Normalize and validate into a [`ReportRequest`].
    ///
    /// Rejects missing or malformed dates and a start after the end.
    /// A well-formed-but-empty range is fine and produces an empty
    /// report downstream.
    pub fn into_request(self) -> Result<ReportRequest, CoreError> {
        let start = parse_date("from_date", self.from_date.as_deref())?;
        let end = parse_date("to_date", self.to_date.as_deref())?;
        if start > end {
            return Err(CoreError::Validation(format!(
                "from_date {start} must not be after to_date {end}"
            )));
        }

        let grouping = match self.grouping.as_deref().map(str::trim) {
            None | Some("") => Grouping::default(),
            Some(value) => Grouping::from_str_value(value).map_err(CoreError::Validation)?,
        };

        let filter = OrgFilter {
            division: normalize_org_value(self.division_id.as_deref()),
            section: normalize_org_value(self.section_id.as_deref()),
            sub_section: normalize_org_value(self.sub_section_id.as_deref()),
        };

        let employee_id = self
            .employee_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let format = self
            .format
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("json"))
            .map(str::to_lowercase);

        Ok(ReportRequest {
            grouping,
            range: DateRange { start, end },
            filter,
            employee_id,
            format,
        })
    }
}

impl ReportRequest {
    /// Cache key scope: individual whenever an employee id is present.
    pub fn key_scope(&self) -> KeyScope {
        match self.employee_id {
            Some(ref employee_id) => KeyScope::Individual {
                employee_id: employee_id.clone(),
            },
            None => KeyScope::Group {
                division: self.filter.division.clone(),
                section: self.filter.section.clone(),
                sub_section: self.filter.sub_section.clone(),
            },
        }
    }

    /// The canonical cache key for this request.
    pub fn report_key(&self) -> ReportKey {
        ReportKey {
            scope: self.key_scope(),
            start: self.range.start,
            end: self.range.end,
            format: self.format.clone(),
        }
    }
}

fn parse_date(field: &str, value: Option<&str>) -> Result<NaiveDate, CoreError> {
    let value = value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CoreError::Validation(format!("{field} is required")))?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        CoreError::Validation(format!(
            "{field} must be an ISO date (YYYY-MM-DD), got '{value}'"
        ))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
