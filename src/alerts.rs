use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;

use crate::decimal::Money;
use crate::leases::LeaseDirectory;
use crate::ledger::ChargeLedger;
use crate::mortgage::MortgagePortfolio;
use crate::types::{ChargeId, ChargeType, LeaseId, MortgageId};

/// urgency of an alert. ordering matters: within a day, more severe
/// alerts surface first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    OverdueCharge {
        charge_id: ChargeId,
        lease_id: LeaseId,
        lease_name: String,
        charge_type: ChargeType,
        amount_due: Money,
        days_overdue: i64,
    },
    MortgagePaymentDue {
        mortgage_id: MortgageId,
        property_address: String,
        amount: Money,
    },
    LeaseExpiring {
        lease_id: LeaseId,
        lease_name: String,
    },
}

/// one actionable item surfaced by a scan. the date is the charge's due
/// date, the mortgage's next payment date, or the lease's end date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub date: NaiveDate,
    pub severity: Severity,
    pub kind: AlertKind,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            AlertKind::OverdueCharge {
                lease_name,
                charge_type,
                amount_due,
                ..
            } => write!(
                f,
                "{}: {:?} charge of {} overdue since {} ({})",
                severity_label(self.severity),
                charge_type,
                amount_due,
                self.date,
                lease_name
            ),
            AlertKind::MortgagePaymentDue {
                property_address,
                amount,
                ..
            } => write!(
                f,
                "{}: mortgage payment of {} due {} ({})",
                severity_label(self.severity),
                amount,
                self.date,
                property_address
            ),
            AlertKind::LeaseExpiring { lease_name, .. } => write!(
                f,
                "{}: lease ends {} ({})",
                severity_label(self.severity),
                self.date,
                lease_name
            ),
        }
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Warning => "warning",
        Severity::Critical => "critical",
    }
}

/// lookahead windows for the scan. overdue charges have no window; they
/// alert as soon as the due date has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertConfig {
    pub mortgage_window_days: i64,
    pub lease_expiry_window_days: i64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            mortgage_window_days: 7,
            lease_expiry_window_days: 60,
        }
    }
}

/// merge all alert sources into one list, ordered by date with the most
/// severe first within a day. read-only over every input; `today` is
/// always supplied by the caller.
pub fn scan(
    ledger: &ChargeLedger,
    portfolio: &MortgagePortfolio,
    directory: &dyn LeaseDirectory,
    today: NaiveDate,
    config: &AlertConfig,
) -> Vec<Alert> {
    let mut alerts = overdue_charge_alerts(ledger, directory, today);
    alerts.extend(mortgage_payment_alerts(
        portfolio,
        today,
        config.mortgage_window_days,
    ));
    alerts.extend(lease_expiry_alerts(
        directory,
        today,
        config.lease_expiry_window_days,
    ));

    alerts.sort_by_key(|a| (a.date, Reverse(a.severity)));
    alerts
}

/// one critical alert per charge that is payable and past its due date
pub fn overdue_charge_alerts(
    ledger: &ChargeLedger,
    directory: &dyn LeaseDirectory,
    today: NaiveDate,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for lease_id in directory.lease_ids() {
        let lease_name = directory
            .lookup(lease_id)
            .map(|l| l.display_name)
            .unwrap_or_default();

        for charge in ledger.charges_for_lease(lease_id) {
            if charge.accepts_payment() && charge.is_overdue(today) {
                alerts.push(Alert {
                    date: charge.due_date,
                    severity: Severity::Critical,
                    kind: AlertKind::OverdueCharge {
                        charge_id: charge.id,
                        lease_id,
                        lease_name: lease_name.clone(),
                        charge_type: charge.charge_type,
                        amount_due: charge.remaining(),
                        days_overdue: (today - charge.due_date).num_days(),
                    },
                });
            }
        }
    }

    alerts
}

/// mortgage payments coming due within the window, or already missed.
/// missed payments escalate to critical.
pub fn mortgage_payment_alerts(
    portfolio: &MortgagePortfolio,
    today: NaiveDate,
    window_days: i64,
) -> Vec<Alert> {
    let horizon = today + Duration::days(window_days);

    portfolio
        .mortgages()
        .iter()
        .filter_map(|mortgage| {
            let next = mortgage.next_payment_date?;
            if next > horizon {
                return None;
            }
            let severity = if next < today {
                Severity::Critical
            } else {
                Severity::Warning
            };
            Some(Alert {
                date: next,
                severity,
                kind: AlertKind::MortgagePaymentDue {
                    mortgage_id: mortgage.id,
                    property_address: mortgage.property_address.clone(),
                    amount: mortgage.total_payment(),
                },
            })
        })
        .collect()
}

/// leases whose end date falls within the window. month-to-month leases
/// carry no end date and never alert.
pub fn lease_expiry_alerts(
    directory: &dyn LeaseDirectory,
    today: NaiveDate,
    window_days: i64,
) -> Vec<Alert> {
    let horizon = today + Duration::days(window_days);
    let mut alerts = Vec::new();

    for lease_id in directory.lease_ids() {
        let Some(lease) = directory.lookup(lease_id) else {
            continue;
        };
        let Some(end_date) = lease.end_date else {
            continue;
        };
        if end_date >= today && end_date <= horizon {
            alerts.push(Alert {
                date: end_date,
                severity: Severity::Info,
                kind: AlertKind::LeaseExpiring {
                    lease_id,
                    lease_name: lease.display_name,
                },
            });
        }
    }

    alerts
}
