//! Repository for the `punches` table.

use sqlx::PgPool;

use punchcard_core::punch::{DateRange, OrgFilter};

use crate::models::punch::PunchRow;

/// Column list for `punches` SELECT queries.
const COLUMNS: &str = "\
    id, employee_id, employee_name, designation, division, section, \
    sub_section, punch_date, punch_time, scan_type, device_id, created_at";

/// Provides range/filter queries over raw punch events.
pub struct PunchRepo;

impl PunchRepo {
    /// Fetch punches within an inclusive date range, optionally narrowed
    /// to an organizational scope and/or a single employee.
    ///
    /// No ordering is guaranteed; the aggregator orders results itself.
    pub async fn query_range(
        pool: &PgPool,
        range: &DateRange,
        filter: &OrgFilter,
        employee_id: Option<&str>,
    ) -> Result<Vec<PunchRow>, sqlx::Error> {
        let (where_clause, binds) = build_punch_filter(filter, employee_id);

        let query = format!("SELECT {COLUMNS} FROM punches {where_clause}");

        let mut q = sqlx::query_as::<_, PunchRow>(&query)
            .bind(range.start)
            .bind(range.end);
        for value in &binds {
            q = q.bind(value);
        }
        q.fetch_all(pool).await
    }
}

/// Build the WHERE clause and the string bind values beyond the two date
/// bounds (`$1`/`$2`). Bind order matches clause order.
fn build_punch_filter(filter: &OrgFilter, employee_id: Option<&str>) -> (String, Vec<String>) {
    let mut clauses: Vec<String> =
        vec!["punch_date >= $1".to_string(), "punch_date <= $2".to_string()];
    let mut binds: Vec<String> = Vec::new();
    let mut bind_idx = 3u32;

    if let Some(ref division) = filter.division {
        clauses.push(format!("division = ${bind_idx}"));
        bind_idx += 1;
        binds.push(division.clone());
    }
    if let Some(ref section) = filter.section {
        clauses.push(format!("section = ${bind_idx}"));
        bind_idx += 1;
        binds.push(section.clone());
    }
    if let Some(ref sub_section) = filter.sub_section {
        clauses.push(format!("sub_section = ${bind_idx}"));
        bind_idx += 1;
        binds.push(sub_section.clone());
    }
    if let Some(employee_id) = employee_id {
        clauses.push(format!("employee_id = ${bind_idx}"));
        binds.push(employee_id.to_string());
    }

    (format!("WHERE {}", clauses.join(" AND ")), binds)
}
