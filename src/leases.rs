use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{EntityId, LeaseId};

/// denormalized lease fields the ledger needs from the surrounding system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseSummary {
    pub lease_id: LeaseId,
    pub entity_id: EntityId,
    /// display string, e.g. "Unit 4B, 12 Elm St"
    pub display_name: String,
    pub end_date: Option<NaiveDate>,
}

/// lease-lookup capability provided by the surrounding system
pub trait LeaseDirectory {
    fn lookup(&self, lease_id: LeaseId) -> Option<LeaseSummary>;

    /// all known lease ids, for entity-wide scans
    fn lease_ids(&self) -> Vec<LeaseId>;

    fn exists(&self, lease_id: LeaseId) -> bool {
        self.lookup(lease_id).is_some()
    }
}

/// in-memory directory, used in tests and single-process deployments
#[derive(Debug, Default)]
pub struct InMemoryLeaseDirectory {
    leases: HashMap<LeaseId, LeaseSummary>,
}

impl InMemoryLeaseDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, lease: LeaseSummary) {
        self.leases.insert(lease.lease_id, lease);
    }
}

impl LeaseDirectory for InMemoryLeaseDirectory {
    fn lookup(&self, lease_id: LeaseId) -> Option<LeaseSummary> {
        self.leases.get(&lease_id).cloned()
    }

    fn lease_ids(&self) -> Vec<LeaseId> {
        self.leases.keys().copied().collect()
    }
}
