use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a lease
pub type LeaseId = Uuid;
/// unique identifier for an owning entity
pub type EntityId = Uuid;
/// unique identifier for a tenant
pub type TenantId = Uuid;
/// unique identifier for a charge
pub type ChargeId = Uuid;
/// unique identifier for a payment
pub type PaymentId = Uuid;
/// unique identifier for a property
pub type PropertyId = Uuid;
/// unique identifier for a mortgage
pub type MortgageId = Uuid;

/// kind of obligation billed against a lease
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeType {
    Rent,
    LateFee,
    Utility,
    Deposit,
    PetFee,
    Parking,
    Damage,
    Other,
}

/// charge status, always derived from (amount, paid_amount, void metadata)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeStatus {
    /// nothing paid yet
    Open,
    /// partially paid
    Partial,
    /// fully settled
    Paid,
    /// cancelled, no further payment allowed
    Void,
}

impl fmt::Display for ChargeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChargeStatus::Open => "open",
            ChargeStatus::Partial => "partial",
            ChargeStatus::Paid => "paid",
            ChargeStatus::Void => "void",
        };
        write!(f, "{s}")
    }
}

/// how a payment was received, with method-specific metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Check { number: String },
    MoneyOrder,
    BankTransfer,
    Card { last_four: String },
    Other,
}

/// payment lifecycle status; manual payments are recorded as succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Succeeded,
    Pending,
    Failed,
    Refunded,
    Canceled,
}

/// portion of a payment applied to a specific charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub charge_id: ChargeId,
    pub amount: Money,
}

/// billing period, year-month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub year: i32,
    pub month: u32,
}

impl BillingPeriod {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// mortgage instrument types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MortgageType {
    Fixed,
    Adjustable,
    InterestOnly,
    Balloon,
}

/// mortgage status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MortgageStatus {
    Active,
    PaidOff,
    Defaulted,
    Refinanced,
}

impl fmt::Display for MortgageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MortgageStatus::Active => "active",
            MortgageStatus::PaidOff => "paid_off",
            MortgageStatus::Defaulted => "defaulted",
            MortgageStatus::Refinanced => "refinanced",
        };
        write!(f, "{s}")
    }
}

/// how often a mortgage payment falls due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentFrequency {
    Monthly,
    BiWeekly,
    Weekly,
}

/// escrow figures when taxes/insurance are collected with the payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EscrowDetails {
    pub annual_property_tax: Option<Money>,
    pub annual_insurance: Option<Money>,
}
