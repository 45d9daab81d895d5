//! Row model for the `punches` table.

use serde::Serialize;
use sqlx::FromRow;

use punchcard_core::punch::Punch;
use punchcard_core::types::{DbId, PunchDate, PunchTime, Timestamp};

/// One punch row as stored. Append-only; the engine never updates it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PunchRow {
    pub id: DbId,
    pub employee_id: String,
    pub employee_name: String,
    pub designation: Option<String>,
    pub division: String,
    pub section: String,
    pub sub_section: Option<String>,
    pub punch_date: PunchDate,
    pub punch_time: PunchTime,
    pub scan_type: String,
    pub device_id: Option<String>,
    pub created_at: Timestamp,
}

impl PunchRow {
    /// Convert into the domain punch the core crate computes over.
    pub fn into_punch(self) -> Punch {
        Punch {
            employee_id: self.employee_id,
            employee_name: self.employee_name,
            designation: self.designation,
            division: self.division,
            section: self.section,
            sub_section: self.sub_section,
            date: self.punch_date,
            time: self.punch_time,
            scan_type: self.scan_type,
            device_id: self.device_id,
        }
    }
}
