//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod org_repo;
pub mod punch_repo;

pub use org_repo::OrgRepo;
pub use punch_repo::PunchRepo;
