use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{
    ChargeId, ChargeStatus, ChargeType, LeaseId, MortgageId, PaymentId, TenantId,
};

/// audit events emitted by ledger operations; the surrounding system drains
/// these into its audit log sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    ChargeCreated {
        charge_id: ChargeId,
        lease_id: LeaseId,
        charge_type: ChargeType,
        amount: Money,
        due_date: NaiveDate,
        timestamp: DateTime<Utc>,
    },
    ChargeVoided {
        charge_id: ChargeId,
        lease_id: LeaseId,
        reason: String,
        actor: String,
        timestamp: DateTime<Utc>,
    },
    ChargePaymentApplied {
        charge_id: ChargeId,
        payment_id: PaymentId,
        amount: Money,
        new_paid_amount: Money,
        new_status: ChargeStatus,
        timestamp: DateTime<Utc>,
    },
    PaymentRecorded {
        payment_id: PaymentId,
        lease_id: LeaseId,
        payer_id: TenantId,
        total: Money,
        allocated: Money,
        unallocated: Money,
        timestamp: DateTime<Utc>,
    },
    MortgagePaymentRecorded {
        mortgage_id: MortgageId,
        payment_id: PaymentId,
        amount: Money,
        principal_portion: Money,
        interest_portion: Money,
        balance_after: Money,
        timestamp: DateTime<Utc>,
    },
    MortgagePaidOff {
        mortgage_id: MortgageId,
        final_payment: Money,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
