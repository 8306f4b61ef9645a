use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::types::{BillingPeriod, ChargeId, ChargeStatus, ChargeType, EntityId, LeaseId};

/// void metadata stamped when a charge is cancelled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoidInfo {
    pub voided_at: DateTime<Utc>,
    pub actor: String,
    pub reason: String,
}

/// a single monetary obligation owed against a lease for a billing period.
/// `amount` is immutable once created; `paid_amount` only grows; status is
/// always derived from those two fields plus the void metadata and is never
/// stored independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charge {
    pub id: ChargeId,
    pub entity_id: EntityId,
    pub lease_id: LeaseId,
    pub period: BillingPeriod,
    pub charge_type: ChargeType,
    pub amount: Money,
    pub paid_amount: Money,
    pub due_date: NaiveDate,
    /// e.g. a late fee referencing the rent charge that triggered it
    pub linked_charge_id: Option<ChargeId>,
    pub void_info: Option<VoidInfo>,
}

impl Charge {
    /// derived status rule; recomputed identically wherever read
    pub fn status(&self) -> ChargeStatus {
        if self.void_info.is_some() {
            ChargeStatus::Void
        } else if self.paid_amount >= self.amount {
            ChargeStatus::Paid
        } else if self.paid_amount.is_positive() {
            ChargeStatus::Partial
        } else {
            ChargeStatus::Open
        }
    }

    /// unpaid remainder; zero for void charges
    pub fn remaining(&self) -> Money {
        if self.void_info.is_some() {
            Money::ZERO
        } else {
            (self.amount - self.paid_amount).max(Money::ZERO)
        }
    }

    /// open or partial, eligible for payment allocation
    pub fn accepts_payment(&self) -> bool {
        matches!(self.status(), ChargeStatus::Open | ChargeStatus::Partial)
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.accepts_payment() && self.due_date < today
    }

    /// apply a payment portion as an increment over prior state. the
    /// allocator never sends an amount exceeding the remaining balance, but
    /// status is re-derived from the updated fields regardless.
    pub(crate) fn apply_payment(&mut self, amount: Money) -> Result<ChargeStatus> {
        if self.void_info.is_some() {
            return Err(LedgerError::InvalidState {
                entity: "charge",
                id: self.id,
                status: self.status().to_string(),
                operation: "paid against",
            });
        }
        debug_assert!(amount.is_positive());

        self.paid_amount += amount;
        Ok(self.status())
    }

    /// transition to void. settled or partially settled charges cannot be
    /// voided; payments must be reversed first.
    pub(crate) fn void(
        &mut self,
        reason: String,
        actor: String,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        match self.status() {
            ChargeStatus::Void => Err(LedgerError::AlreadyVoid { id: self.id }),
            ChargeStatus::Paid | ChargeStatus::Partial => Err(LedgerError::InvalidState {
                entity: "charge",
                id: self.id,
                status: self.status().to_string(),
                operation: "voided",
            }),
            ChargeStatus::Open => {
                self.void_info = Some(VoidInfo {
                    voided_at: timestamp,
                    actor,
                    reason,
                });
                Ok(())
            }
        }
    }
}

/// aggregated position of a lease across its non-void charges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LeaseBalance {
    pub total_charges: Money,
    pub total_paid: Money,
    pub balance: Money,
    /// remaining balance on open/partial charges strictly past due
    pub overdue_amount: Money,
    /// count of open + partial charges
    pub open_charges: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChargeType;
    use uuid::Uuid;

    fn rent_charge(amount: Money, paid: Money) -> Charge {
        Charge {
            id: Uuid::new_v4(),
            entity_id: Uuid::new_v4(),
            lease_id: Uuid::new_v4(),
            period: BillingPeriod::new(2024, 1),
            charge_type: ChargeType::Rent,
            amount,
            paid_amount: paid,
            due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            linked_charge_id: None,
            void_info: None,
        }
    }

    #[test]
    fn test_status_derivation() {
        let amount = Money::from_cents(1500_00);

        assert_eq!(rent_charge(amount, Money::ZERO).status(), ChargeStatus::Open);
        assert_eq!(
            rent_charge(amount, Money::from_cents(1)).status(),
            ChargeStatus::Partial
        );
        assert_eq!(
            rent_charge(amount, Money::from_cents(1499_99)).status(),
            ChargeStatus::Partial
        );
        assert_eq!(rent_charge(amount, amount).status(), ChargeStatus::Paid);
    }

    #[test]
    fn test_apply_payment_re_derives_status() {
        let mut charge = rent_charge(Money::from_cents(1000_00), Money::ZERO);

        let status = charge.apply_payment(Money::from_cents(400_00)).unwrap();
        assert_eq!(status, ChargeStatus::Partial);
        assert_eq!(charge.remaining(), Money::from_cents(600_00));

        let status = charge.apply_payment(Money::from_cents(600_00)).unwrap();
        assert_eq!(status, ChargeStatus::Paid);
        assert_eq!(charge.remaining(), Money::ZERO);
    }

    #[test]
    fn test_void_guards() {
        let now = Utc::now();

        // paid charge cannot be voided
        let mut paid = rent_charge(Money::from_cents(500_00), Money::from_cents(500_00));
        let err = paid.void("dup".into(), "mgr".into(), now).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidState { .. }));

        // partial charge cannot be voided
        let mut partial = rent_charge(Money::from_cents(500_00), Money::from_cents(100_00));
        let err = partial.void("dup".into(), "mgr".into(), now).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidState { .. }));

        // open charge voids once, then AlreadyVoid
        let mut open = rent_charge(Money::from_cents(500_00), Money::ZERO);
        open.void("entered twice".into(), "mgr".into(), now).unwrap();
        assert_eq!(open.status(), ChargeStatus::Void);
        let err = open.void("again".into(), "mgr".into(), now).unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyVoid { .. }));
    }

    #[test]
    fn test_void_charge_rejects_payment() {
        let mut charge = rent_charge(Money::from_cents(500_00), Money::ZERO);
        charge
            .void("billing error".into(), "mgr".into(), Utc::now())
            .unwrap();

        let err = charge.apply_payment(Money::from_cents(100_00)).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidState { .. }));
        assert_eq!(charge.remaining(), Money::ZERO);
    }

    #[test]
    fn test_overdue_uses_supplied_today() {
        let charge = rent_charge(Money::from_cents(500_00), Money::ZERO);
        let due = charge.due_date;

        assert!(!charge.is_overdue(due));
        assert!(charge.is_overdue(due + chrono::Duration::days(1)));
    }
}
