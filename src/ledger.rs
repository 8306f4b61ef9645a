use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

use crate::charges::{Charge, LeaseBalance};
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::leases::LeaseDirectory;
use crate::payments::{plan_fifo, validate_explicit, AllocationTarget, Payment, RecordPayment};
use crate::types::{
    BillingPeriod, ChargeId, ChargeType, EntityId, LeaseId, PaymentId, PaymentStatus,
};

/// request to create a charge against a lease obligation
#[derive(Debug, Clone, PartialEq)]
pub struct NewCharge {
    pub entity_id: EntityId,
    pub lease_id: LeaseId,
    pub period: BillingPeriod,
    pub charge_type: ChargeType,
    pub amount: Money,
    pub due_date: NaiveDate,
    pub linked_charge_id: Option<ChargeId>,
}

/// the charge ledger aggregate: obligations, receipts, and the audit events
/// they emit. writes go through `&mut self`, so a payment's allocation and
/// the resulting charge updates cannot interleave with another payment.
#[derive(Debug, Default)]
pub struct ChargeLedger {
    // creation order matters: FIFO allocation breaks due-date ties on it
    charges: Vec<Charge>,
    payments: Vec<Payment>,
    events: EventStore,
}

impl ChargeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// create a charge with nothing paid. fails when the lease is unknown or
    /// the linked charge does not exist on the same lease.
    pub fn create_charge(
        &mut self,
        directory: &dyn LeaseDirectory,
        request: NewCharge,
        time_provider: &SafeTimeProvider,
    ) -> Result<ChargeId> {
        if !directory.exists(request.lease_id) {
            return Err(LedgerError::NotFound {
                entity: "lease",
                id: request.lease_id,
            });
        }

        if let Some(linked_id) = request.linked_charge_id {
            let valid = self
                .charge(linked_id)
                .map(|linked| linked.lease_id == request.lease_id)
                .unwrap_or(false);
            if !valid {
                return Err(LedgerError::NotFound {
                    entity: "charge",
                    id: linked_id,
                });
            }
        }

        let charge = Charge {
            id: Uuid::new_v4(),
            entity_id: request.entity_id,
            lease_id: request.lease_id,
            period: request.period,
            charge_type: request.charge_type,
            amount: request.amount,
            paid_amount: Money::ZERO,
            due_date: request.due_date,
            linked_charge_id: request.linked_charge_id,
            void_info: None,
        };
        let charge_id = charge.id;

        self.events.emit(Event::ChargeCreated {
            charge_id,
            lease_id: charge.lease_id,
            charge_type: charge.charge_type,
            amount: charge.amount,
            due_date: charge.due_date,
            timestamp: time_provider.now(),
        });

        self.charges.push(charge);
        Ok(charge_id)
    }

    /// void an open charge, stamping who and why. charges are never
    /// physically deleted.
    pub fn void_charge(
        &mut self,
        charge_id: ChargeId,
        reason: &str,
        actor: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let now = time_provider.now();
        let charge = self.charge_mut(charge_id)?;
        charge.void(reason.to_string(), actor.to_string(), now)?;
        let lease_id = charge.lease_id;

        self.events.emit(Event::ChargeVoided {
            charge_id,
            lease_id,
            reason: reason.to_string(),
            actor: actor.to_string(),
            timestamp: now,
        });
        Ok(())
    }

    /// read-only fold over the lease's non-void charges. `today` is supplied
    /// by the caller, never read from the wall clock here.
    pub fn balance(&self, lease_id: LeaseId, today: NaiveDate) -> LeaseBalance {
        let mut summary = LeaseBalance::default();

        for charge in self.charges_for_lease(lease_id) {
            if charge.void_info.is_some() {
                continue;
            }
            summary.total_charges += charge.amount;
            summary.total_paid += charge.paid_amount;
            if charge.accepts_payment() {
                summary.open_charges += 1;
                if charge.is_overdue(today) {
                    summary.overdue_amount += charge.remaining();
                }
            }
        }

        summary.balance = summary.total_charges - summary.total_paid;
        summary
    }

    /// record a payment and distribute it across the lease's open charges.
    /// explicit allocations are validated in full before any charge is
    /// mutated; without them the payment auto-allocates oldest due date
    /// first, and any leftover stays unallocated on the payment record.
    pub fn record_payment(
        &mut self,
        directory: &dyn LeaseDirectory,
        request: RecordPayment,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentId> {
        if !directory.exists(request.lease_id) {
            return Err(LedgerError::NotFound {
                entity: "lease",
                id: request.lease_id,
            });
        }

        let auto_allocated = request.allocations.is_none();
        let allocations = match request.allocations {
            Some(explicit) => {
                validate_explicit(&explicit, request.total)?;
                // several allocations may name the same charge; validate
                // their combined amount against its remaining balance
                let mut per_charge: HashMap<ChargeId, Money> = HashMap::new();
                for allocation in &explicit {
                    *per_charge.entry(allocation.charge_id).or_insert(Money::ZERO) +=
                        allocation.amount;
                }
                for (&charge_id, &amount) in &per_charge {
                    self.validate_allocation_target(request.lease_id, charge_id, amount)?;
                }
                explicit
            }
            None => {
                let targets: Vec<AllocationTarget> = self
                    .charges_for_lease(request.lease_id)
                    .filter(|c| c.accepts_payment())
                    .map(|c| AllocationTarget {
                        charge_id: c.id,
                        due_date: c.due_date,
                        remaining: c.remaining(),
                    })
                    .collect();
                plan_fifo(targets, request.total)
            }
        };

        let now = time_provider.now();
        let payment = Payment {
            id: Uuid::new_v4(),
            entity_id: request.entity_id,
            lease_id: request.lease_id,
            payer_id: request.payer_id,
            total: request.total,
            method: request.method,
            status: PaymentStatus::Succeeded,
            allocations: allocations.clone(),
            memo: request.memo,
            payment_date: request.date.unwrap_or_else(|| now.date_naive()),
            created_at: now,
        };
        let payment_id = payment.id;
        let allocated = payment.allocated();
        let unallocated = payment.unallocated();
        self.payments.push(payment);

        for allocation in &allocations {
            let charge = self.charge_mut(allocation.charge_id)?;
            let new_status = charge.apply_payment(allocation.amount)?;
            let new_paid_amount = charge.paid_amount;

            self.events.emit(Event::ChargePaymentApplied {
                charge_id: allocation.charge_id,
                payment_id,
                amount: allocation.amount,
                new_paid_amount,
                new_status,
                timestamp: now,
            });
        }

        if auto_allocated && unallocated.is_positive() {
            warn!(
                lease_id = %request.lease_id,
                payment_id = %payment_id,
                unallocated = %unallocated,
                "payment exceeds open charges; remainder left unallocated"
            );
        }

        self.events.emit(Event::PaymentRecorded {
            payment_id,
            lease_id: request.lease_id,
            payer_id: request.payer_id,
            total: request.total,
            allocated,
            unallocated,
            timestamp: now,
        });

        Ok(payment_id)
    }

    pub fn charge(&self, charge_id: ChargeId) -> Option<&Charge> {
        self.charges.iter().find(|c| c.id == charge_id)
    }

    pub fn payment(&self, payment_id: PaymentId) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id == payment_id)
    }

    /// charges in creation order
    pub fn charges_for_lease(&self, lease_id: LeaseId) -> impl Iterator<Item = &Charge> {
        self.charges.iter().filter(move |c| c.lease_id == lease_id)
    }

    pub fn payments_for_lease(&self, lease_id: LeaseId) -> impl Iterator<Item = &Payment> {
        self.payments.iter().filter(move |p| p.lease_id == lease_id)
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    fn charge_mut(&mut self, charge_id: ChargeId) -> Result<&mut Charge> {
        self.charges
            .iter_mut()
            .find(|c| c.id == charge_id)
            .ok_or(LedgerError::NotFound {
                entity: "charge",
                id: charge_id,
            })
    }

    /// an explicit allocation target must exist on the lease, accept
    /// payment, and have enough remaining balance for the combined amount
    /// allocated to it
    fn validate_allocation_target(
        &self,
        lease_id: LeaseId,
        charge_id: ChargeId,
        amount: Money,
    ) -> Result<()> {
        let charge = self
            .charge(charge_id)
            .filter(|c| c.lease_id == lease_id)
            .ok_or(LedgerError::NotFound {
                entity: "charge",
                id: charge_id,
            })?;

        if !charge.accepts_payment() {
            return Err(LedgerError::InvalidState {
                entity: "charge",
                id: charge.id,
                status: charge.status().to_string(),
                operation: "paid against",
            });
        }

        if amount > charge.remaining() {
            return Err(LedgerError::InvalidAllocation {
                allocated: amount,
                available: charge.remaining(),
            });
        }

        Ok(())
    }
}

/// serializable snapshot of the ledger's durable state. pending audit
/// events are transient and not captured.
#[derive(Debug, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub charges: Vec<Charge>,
    pub payments: Vec<Payment>,
}

impl LedgerSnapshot {
    pub fn from_ledger(ledger: &ChargeLedger) -> Self {
        Self {
            charges: ledger.charges.clone(),
            payments: ledger.payments.clone(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn into_ledger(self) -> ChargeLedger {
        ChargeLedger {
            charges: self.charges,
            payments: self.payments,
            events: EventStore::new(),
        }
    }
}
