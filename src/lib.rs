pub mod alerts;
pub mod charges;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod leases;
pub mod ledger;
pub mod mortgage;
pub mod payments;
pub mod types;

// re-export key types
pub use alerts::{Alert, AlertConfig, AlertKind, Severity};
pub use charges::{Charge, LeaseBalance, VoidInfo};
pub use decimal::{Money, Rate};
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use leases::{InMemoryLeaseDirectory, LeaseDirectory, LeaseSummary};
pub use ledger::{ChargeLedger, LedgerSnapshot, NewCharge};
pub use mortgage::{
    ExtraPaymentSavings, Mortgage, MortgagePayment, MortgagePaymentRequest, MortgagePortfolio,
    MortgageSummary, MortgageTerms, ScheduleEntry,
};
pub use payments::{Payment, RecordPayment};
pub use types::{
    Allocation, BillingPeriod, ChargeId, ChargeStatus, ChargeType, EntityId, EscrowDetails,
    LeaseId, MortgageId, MortgageStatus, MortgageType, PaymentFrequency, PaymentId, PaymentMethod,
    PaymentStatus, PropertyId, TenantId,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
