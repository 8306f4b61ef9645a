use chrono::NaiveDate;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::types::{Allocation, ChargeId};

/// an open or partial charge as seen by the allocator. callers supply
/// targets in charge creation order; due-date ties keep that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationTarget {
    pub charge_id: ChargeId,
    pub due_date: NaiveDate,
    pub remaining: Money,
}

/// validate explicit allocations against the payment total. every amount
/// must be positive and the sum must not exceed the total; under-allocation
/// is accepted, the remainder simply stays unapplied.
pub fn validate_explicit(allocations: &[Allocation], total: Money) -> Result<()> {
    for allocation in allocations {
        if !allocation.amount.is_positive() {
            return Err(LedgerError::InvalidAllocation {
                allocated: allocation.amount,
                available: total,
            });
        }
    }

    let allocated: Money = allocations.iter().map(|a| a.amount).sum();
    if allocated > total {
        return Err(LedgerError::InvalidAllocation {
            allocated,
            available: total,
        });
    }
    Ok(())
}

/// oldest-due-date-first distribution of a payment across open charges.
/// pure: produces the allocation plan without touching any charge.
pub fn plan_fifo(mut targets: Vec<AllocationTarget>, total: Money) -> Vec<Allocation> {
    // stable sort preserves creation order for equal due dates
    targets.sort_by_key(|t| t.due_date);

    let mut remaining = total;
    let mut plan = Vec::new();

    for target in targets {
        if remaining.is_zero() {
            break;
        }
        let amount = remaining.min(target.remaining);
        if amount.is_positive() {
            plan.push(Allocation {
                charge_id: target.charge_id,
                amount,
            });
            remaining -= amount;
        }
    }

    plan
}
