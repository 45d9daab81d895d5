//! TTL policy for cached report payloads.
//!
//! Individual reports are volatile and narrow, so they expire quickly.
//! Group reports get longer TTLs the larger they are: bigger aggregates
//! cost more to recompute and change proportionally less per unit time.
//! Hierarchy lookups are low-cardinality and change rarely, so they use a
//! flat tier of their own.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache_key::KeyScope;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// TTL for employee-scoped (individual) reports: 5 minutes.
pub const INDIVIDUAL_TTL_SECS: u64 = 300;

/// TTL for group reports below [`GROUP_MEDIUM_THRESHOLD`]: 10 minutes.
pub const GROUP_SMALL_TTL_SECS: u64 = 600;

/// TTL for group reports between the thresholds: 15 minutes.
pub const GROUP_MEDIUM_TTL_SECS: u64 = 900;

/// TTL for group reports above [`GROUP_LARGE_THRESHOLD`]: 20 minutes.
pub const GROUP_LARGE_TTL_SECS: u64 = 1200;

/// Flat TTL for hierarchy/management lookups: 10 minutes.
pub const HIERARCHY_TTL_SECS: u64 = 600;

/// Member count at which a group report stops being "small".
pub const GROUP_MEDIUM_THRESHOLD: usize = 100;

/// Member count above which a group report is "large".
pub const GROUP_LARGE_THRESHOLD: usize = 500;

// ---------------------------------------------------------------------------
// TtlTier
// ---------------------------------------------------------------------------

/// Expiry tier selected from the report shape and result cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtlTier {
    Individual,
    GroupSmall,
    GroupMedium,
    GroupLarge,
    Hierarchy,
}

impl TtlTier {
    /// Select the tier for a report payload.
    ///
    /// `result_size` is the total member count across all groups; it is
    /// ignored for individual-scoped reports.
    pub fn for_report(scope: &KeyScope, result_size: usize) -> Self {
        match scope {
            KeyScope::Individual { .. } => Self::Individual,
            KeyScope::Group { .. } => {
                if result_size < GROUP_MEDIUM_THRESHOLD {
                    Self::GroupSmall
                } else if result_size <= GROUP_LARGE_THRESHOLD {
                    Self::GroupMedium
                } else {
                    Self::GroupLarge
                }
            }
        }
    }

    pub fn secs(&self) -> u64 {
        match self {
            Self::Individual => INDIVIDUAL_TTL_SECS,
            Self::GroupSmall => GROUP_SMALL_TTL_SECS,
            Self::GroupMedium => GROUP_MEDIUM_TTL_SECS,
            Self::GroupLarge => GROUP_LARGE_TTL_SECS,
            Self::Hierarchy => HIERARCHY_TTL_SECS,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.secs())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
