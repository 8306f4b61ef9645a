pub mod allocation;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{
    Allocation, EntityId, LeaseId, PaymentId, PaymentMethod, PaymentStatus, TenantId,
};

pub use allocation::{plan_fifo, validate_explicit, AllocationTarget};

/// a monetary receipt from a tenant, allocated across zero or more charges.
/// immutable after creation; corrections are modeled as new events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub entity_id: EntityId,
    pub lease_id: LeaseId,
    pub payer_id: TenantId,
    pub total: Money,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub allocations: Vec<Allocation>,
    pub memo: Option<String>,
    pub payment_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// sum of allocations, always ≤ total
    pub fn allocated(&self) -> Money {
        self.allocations.iter().map(|a| a.amount).sum()
    }

    /// remainder not applied to any charge (e.g. deposits held outside the
    /// charge ledger)
    pub fn unallocated(&self) -> Money {
        self.total - self.allocated()
    }
}

/// request to record a payment against a lease
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPayment {
    pub entity_id: EntityId,
    pub lease_id: LeaseId,
    pub payer_id: TenantId,
    pub total: Money,
    pub method: PaymentMethod,
    /// explicit allocations; when absent the ledger auto-allocates FIFO by
    /// due date
    pub allocations: Option<Vec<Allocation>>,
    pub memo: Option<String>,
    /// defaults to the injected clock's date when absent
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_payment_unallocated_remainder() {
        let charge_id = Uuid::new_v4();
        let payment = Payment {
            id: Uuid::new_v4(),
            entity_id: Uuid::new_v4(),
            lease_id: Uuid::new_v4(),
            payer_id: Uuid::new_v4(),
            total: Money::from_cents(1000_00),
            method: PaymentMethod::Check {
                number: "1042".to_string(),
            },
            status: PaymentStatus::Succeeded,
            allocations: vec![Allocation {
                charge_id,
                amount: Money::from_cents(750_00),
            }],
            memo: None,
            payment_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            created_at: Utc::now(),
        };

        assert_eq!(payment.allocated(), Money::from_cents(750_00));
        assert_eq!(payment.unallocated(), Money::from_cents(250_00));
    }
}
