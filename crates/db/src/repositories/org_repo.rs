//! Repository for the organizational hierarchy tables.

use sqlx::PgPool;

use crate::models::org::{Division, Section, SubSection};

const DIVISION_COLUMNS: &str = "id, code, name, created_at";
const SECTION_COLUMNS: &str = "id, division_id, code, name, created_at";
const SUB_SECTION_COLUMNS: &str = "id, section_id, code, name, created_at";

/// Read-only lookups over divisions, sections and sub-sections.
///
/// Low-cardinality tables owned by the CRUD side of the application;
/// results are cached by the report service under the hierarchy TTL tier.
pub struct OrgRepo;

impl OrgRepo {
    /// List all divisions ordered by code.
    pub async fn list_divisions(pool: &PgPool) -> Result<Vec<Division>, sqlx::Error> {
        let query = format!("SELECT {DIVISION_COLUMNS} FROM divisions ORDER BY code");
        sqlx::query_as::<_, Division>(&query).fetch_all(pool).await
    }

    /// List all sections ordered by division then code.
    pub async fn list_sections(pool: &PgPool) -> Result<Vec<Section>, sqlx::Error> {
        let query = format!("SELECT {SECTION_COLUMNS} FROM sections ORDER BY division_id, code");
        sqlx::query_as::<_, Section>(&query).fetch_all(pool).await
    }

    /// List all sub-sections ordered by section then code.
    pub async fn list_sub_sections(pool: &PgPool) -> Result<Vec<SubSection>, sqlx::Error> {
        let query =
            format!("SELECT {SUB_SECTION_COLUMNS} FROM sub_sections ORDER BY section_id, code");
        sqlx::query_as::<_, SubSection>(&query).fetch_all(pool).await
    }
}
