//! Row models for the organizational hierarchy tables.
//!
//! These tables are owned by the CRUD side of the application; the
//! engine only reads them for the filter dropdowns, cached under the
//! hierarchy TTL tier.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use punchcard_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Division {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Section {
    pub id: DbId,
    pub division_id: DbId,
    pub code: String,
    pub name: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SubSection {
    pub id: DbId,
    pub section_id: DbId,
    pub code: String,
    pub name: String,
    pub created_at: Timestamp,
}
