pub mod amortization;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::types::{
    EntityId, EscrowDetails, MortgageId, MortgageStatus, MortgageType, PaymentFrequency,
    PaymentId, PaymentStatus, PropertyId,
};

pub use amortization::{
    advance_due_date, full_schedule, monthly_payment, remaining_schedule, ScheduleEntry,
};

/// terms supplied when a mortgage is put on the books
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageTerms {
    pub property_id: PropertyId,
    pub entity_id: EntityId,
    pub property_address: String,
    pub entity_name: String,
    pub lender: String,
    pub loan_number: Option<String>,
    pub mortgage_type: MortgageType,
    pub original_principal: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    pub escrow_amount: Option<Money>,
    pub escrow_details: Option<EscrowDetails>,
    pub payment_frequency: PaymentFrequency,
    pub due_day: u32,
    pub origination_date: NaiveDate,
    pub first_payment_date: NaiveDate,
    pub notes: Option<String>,
}

/// a long-term amortizing loan secured by a property. `current_balance` only
/// decreases, via recorded payments; reaching zero flips the status to
/// paid off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mortgage {
    pub id: MortgageId,
    pub property_id: PropertyId,
    pub entity_id: EntityId,
    pub property_address: String,
    pub entity_name: String,
    pub lender: String,
    pub loan_number: Option<String>,
    pub mortgage_type: MortgageType,
    pub original_principal: Money,
    pub current_balance: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    /// monthly principal-and-interest payment
    pub monthly_payment: Money,
    pub escrow_amount: Option<Money>,
    pub escrow_details: Option<EscrowDetails>,
    pub payment_frequency: PaymentFrequency,
    pub due_day: u32,
    pub origination_date: NaiveDate,
    pub first_payment_date: NaiveDate,
    pub maturity_date: NaiveDate,
    /// cleared once the loan is paid off; no further payment is scheduled
    pub next_payment_date: Option<NaiveDate>,
    pub status: MortgageStatus,
    pub notes: Option<String>,
    pub payments: Vec<MortgagePayment>,
}

/// an applied loan payment, subordinate to its mortgage. immutable once
/// created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgagePayment {
    pub id: PaymentId,
    pub payment_date: NaiveDate,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub escrow_portion: Option<Money>,
    pub balance_after: Money,
    pub status: PaymentStatus,
    pub notes: Option<String>,
}

/// request to record a loan payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgagePaymentRequest {
    pub amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub escrow_portion: Option<Money>,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

/// derived position of a mortgage: history plus remaining projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageSummary {
    pub principal_paid: Money,
    pub interest_paid: Money,
    /// percent of original principal retired, e.g. 12.5
    pub percent_paid_off: Decimal,
    pub days_until_next_payment: Option<i64>,
    pub remaining_interest: Money,
    pub total_interest: Money,
    /// original principal plus total lifetime interest
    pub lifetime_cost: Money,
    pub projected_payoff_date: Option<NaiveDate>,
}

/// effect of paying extra principal every month, compared against the
/// current remaining schedule. purely informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraPaymentSavings {
    pub extra_monthly_amount: Money,
    pub interest_saved: Money,
    pub months_saved: u32,
    pub new_payoff_date: Option<NaiveDate>,
}

impl Mortgage {
    /// put a mortgage on the books, deriving the monthly P&I payment and
    /// maturity from the terms
    pub fn originate(terms: MortgageTerms) -> Self {
        let monthly_payment = amortization::monthly_payment(
            terms.original_principal,
            terms.annual_rate,
            terms.term_months,
        );
        let maturity_date =
            amortization::add_months(terms.first_payment_date, terms.term_months.saturating_sub(1));

        Self {
            id: Uuid::new_v4(),
            property_id: terms.property_id,
            entity_id: terms.entity_id,
            property_address: terms.property_address,
            entity_name: terms.entity_name,
            lender: terms.lender,
            loan_number: terms.loan_number,
            mortgage_type: terms.mortgage_type,
            original_principal: terms.original_principal,
            current_balance: terms.original_principal,
            annual_rate: terms.annual_rate,
            term_months: terms.term_months,
            monthly_payment,
            escrow_amount: terms.escrow_amount,
            escrow_details: terms.escrow_details,
            payment_frequency: terms.payment_frequency,
            due_day: terms.due_day,
            origination_date: terms.origination_date,
            first_payment_date: terms.first_payment_date,
            maturity_date,
            next_payment_date: Some(terms.first_payment_date),
            status: MortgageStatus::Active,
            notes: terms.notes,
            payments: Vec::new(),
        }
    }

    /// P&I plus escrow; derived on read so it can never drift from its
    /// components
    pub fn total_payment(&self) -> Money {
        self.monthly_payment + self.escrow_amount.unwrap_or(Money::ZERO)
    }

    /// full schedule from origination terms
    pub fn full_schedule(&self) -> Vec<ScheduleEntry> {
        amortization::full_schedule(
            self.original_principal,
            self.annual_rate,
            self.term_months,
            self.first_payment_date,
        )
    }

    /// payoff projection from the live balance; empty once paid off
    pub fn remaining_schedule(&self) -> Vec<ScheduleEntry> {
        match self.next_payment_date {
            Some(next) => amortization::remaining_schedule(
                self.current_balance,
                self.annual_rate,
                self.monthly_payment,
                next,
                self.term_months,
            ),
            None => Vec::new(),
        }
    }

    /// interest collected across recorded payments
    pub fn interest_paid(&self) -> Money {
        self.payments.iter().map(|p| p.interest_portion).sum()
    }

    pub fn summary(&self, today: NaiveDate) -> MortgageSummary {
        let principal_paid = self.original_principal - self.current_balance;
        let interest_paid = self.interest_paid();

        let percent_paid_off = if self.original_principal.is_zero() {
            Decimal::ZERO
        } else {
            principal_paid.as_decimal() / self.original_principal.as_decimal()
                * Decimal::ONE_HUNDRED
        };

        let remaining = self.remaining_schedule();
        let remaining_interest = remaining
            .iter()
            .map(|e| e.interest_portion)
            .sum::<Money>();
        let total_interest = interest_paid + remaining_interest;

        MortgageSummary {
            principal_paid,
            interest_paid,
            percent_paid_off,
            days_until_next_payment: self
                .next_payment_date
                .map(|next| (next - today).num_days()),
            remaining_interest,
            total_interest,
            lifetime_cost: self.original_principal + total_interest,
            projected_payoff_date: remaining.last().map(|e| e.payment_date),
        }
    }

    /// re-run the remaining schedule with extra principal each month and
    /// compare. does not mutate the mortgage.
    pub fn extra_payment_savings(&self, extra_monthly_amount: Money) -> ExtraPaymentSavings {
        let base = self.remaining_schedule();
        let base_interest = base.iter().map(|e| e.interest_portion).sum::<Money>();

        let boosted = match self.next_payment_date {
            Some(next) => amortization::remaining_schedule(
                self.current_balance,
                self.annual_rate,
                self.monthly_payment + extra_monthly_amount,
                next,
                self.term_months,
            ),
            None => Vec::new(),
        };
        let boosted_interest = boosted.iter().map(|e| e.interest_portion).sum::<Money>();

        ExtraPaymentSavings {
            extra_monthly_amount,
            interest_saved: (base_interest - boosted_interest).max(Money::ZERO),
            months_saved: base.len().saturating_sub(boosted.len()) as u32,
            new_payoff_date: boosted.last().map(|e| e.payment_date),
        }
    }

    fn apply_payment(
        &mut self,
        request: MortgagePaymentRequest,
    ) -> Result<(PaymentId, Money, bool)> {
        match self.status {
            MortgageStatus::PaidOff | MortgageStatus::Refinanced => {
                return Err(LedgerError::InvalidState {
                    entity: "mortgage",
                    id: self.id,
                    status: self.status.to_string(),
                    operation: "paid against",
                });
            }
            MortgageStatus::Active | MortgageStatus::Defaulted => {}
        }

        let due_date = self.next_payment_date.unwrap_or(request.date);
        let balance_after =
            (self.current_balance - request.principal_portion).max(Money::ZERO);
        let paid_off = (self.current_balance - request.principal_portion) <= Money::ZERO;

        let payment = MortgagePayment {
            id: Uuid::new_v4(),
            payment_date: request.date,
            due_date,
            amount: request.amount,
            principal_portion: request.principal_portion,
            interest_portion: request.interest_portion,
            escrow_portion: request.escrow_portion,
            balance_after,
            status: PaymentStatus::Succeeded,
            notes: request.notes,
        };
        let payment_id = payment.id;

        self.current_balance = balance_after;
        self.payments.push(payment);

        if paid_off {
            self.status = MortgageStatus::PaidOff;
            self.next_payment_date = None;
        } else {
            self.next_payment_date = Some(advance_due_date(due_date, self.payment_frequency));
        }

        Ok((payment_id, balance_after, paid_off))
    }
}

/// the set of mortgages an owning entity services, with the audit events
/// their payments emit
#[derive(Debug, Default)]
pub struct MortgagePortfolio {
    mortgages: Vec<Mortgage>,
    events: EventStore,
}

impl MortgagePortfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mortgage: Mortgage) -> MortgageId {
        let id = mortgage.id;
        self.mortgages.push(mortgage);
        id
    }

    pub fn get(&self, mortgage_id: MortgageId) -> Option<&Mortgage> {
        self.mortgages.iter().find(|m| m.id == mortgage_id)
    }

    pub fn mortgages(&self) -> &[Mortgage] {
        &self.mortgages
    }

    /// record an applied loan payment: appends history, walks the balance
    /// down, advances the next due date by the payment frequency, and flips
    /// the mortgage to paid off when the balance reaches zero.
    pub fn record_payment(
        &mut self,
        mortgage_id: MortgageId,
        request: MortgagePaymentRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentId> {
        let now = time_provider.now();
        let mortgage = self
            .mortgages
            .iter_mut()
            .find(|m| m.id == mortgage_id)
            .ok_or(LedgerError::NotFound {
                entity: "mortgage",
                id: mortgage_id,
            })?;

        let amount = request.amount;
        let principal_portion = request.principal_portion;
        let interest_portion = request.interest_portion;
        let (payment_id, balance_after, paid_off) = mortgage.apply_payment(request)?;

        self.events.emit(Event::MortgagePaymentRecorded {
            mortgage_id,
            payment_id,
            amount,
            principal_portion,
            interest_portion,
            balance_after,
            timestamp: now,
        });

        if paid_off {
            self.events.emit(Event::MortgagePaidOff {
                mortgage_id,
                final_payment: amount,
                timestamp: now,
            });
        }

        Ok(payment_id)
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
        ))
    }

    fn standard_terms() -> MortgageTerms {
        MortgageTerms {
            property_id: Uuid::new_v4(),
            entity_id: Uuid::new_v4(),
            property_address: "12 Elm St".to_string(),
            entity_name: "Elm Street Holdings LLC".to_string(),
            lender: "First National".to_string(),
            loan_number: Some("ML-4471".to_string()),
            mortgage_type: MortgageType::Fixed,
            original_principal: Money::from_cents(300_000_00),
            annual_rate: Rate::from_percentage(dec!(6.5)),
            term_months: 360,
            escrow_amount: Some(Money::from_cents(450_00)),
            escrow_details: Some(EscrowDetails {
                annual_property_tax: Some(Money::from_cents(4200_00)),
                annual_insurance: Some(Money::from_cents(1200_00)),
            }),
            payment_frequency: PaymentFrequency::Monthly,
            due_day: 1,
            origination_date: date(2024, 1, 10),
            first_payment_date: date(2024, 3, 1),
            notes: None,
        }
    }

    #[test]
    fn test_originate_derives_payment_and_maturity() {
        let mortgage = Mortgage::originate(standard_terms());

        assert_eq!(mortgage.monthly_payment, Money::from_cents(1896_20));
        assert_eq!(mortgage.total_payment(), Money::from_cents(2346_20));
        assert_eq!(mortgage.current_balance, mortgage.original_principal);
        assert_eq!(mortgage.next_payment_date, Some(date(2024, 3, 1)));
        assert_eq!(mortgage.maturity_date, date(2054, 2, 1));
        assert_eq!(mortgage.status, MortgageStatus::Active);
    }

    #[test]
    fn test_total_payment_tracks_escrow_change() {
        let mut mortgage = Mortgage::originate(standard_terms());
        assert_eq!(mortgage.total_payment(), Money::from_cents(2346_20));

        mortgage.escrow_amount = Some(Money::from_cents(500_00));
        assert_eq!(mortgage.total_payment(), Money::from_cents(2396_20));

        mortgage.escrow_amount = None;
        assert_eq!(mortgage.total_payment(), mortgage.monthly_payment);
    }

    #[test]
    fn test_record_payment_walks_balance_and_due_date() {
        let mut portfolio = MortgagePortfolio::new();
        let mortgage_id = portfolio.add(Mortgage::originate(standard_terms()));
        let time = test_time();

        portfolio
            .record_payment(
                mortgage_id,
                MortgagePaymentRequest {
                    amount: Money::from_cents(2346_20),
                    principal_portion: Money::from_cents(271_20),
                    interest_portion: Money::from_cents(1625_00),
                    escrow_portion: Some(Money::from_cents(450_00)),
                    date: date(2024, 3, 1),
                    notes: None,
                },
                &time,
            )
            .unwrap();

        let mortgage = portfolio.get(mortgage_id).unwrap();
        assert_eq!(mortgage.current_balance, Money::from_cents(299_728_80));
        assert_eq!(mortgage.next_payment_date, Some(date(2024, 4, 1)));
        assert_eq!(mortgage.payments.len(), 1);
        assert_eq!(mortgage.payments[0].balance_after, mortgage.current_balance);
        assert_eq!(mortgage.interest_paid(), Money::from_cents(1625_00));
    }

    #[test]
    fn test_record_payment_unknown_mortgage() {
        let mut portfolio = MortgagePortfolio::new();
        let time = test_time();

        let err = portfolio
            .record_payment(
                Uuid::new_v4(),
                MortgagePaymentRequest {
                    amount: Money::from_cents(100_00),
                    principal_portion: Money::from_cents(100_00),
                    interest_portion: Money::ZERO,
                    escrow_portion: None,
                    date: date(2024, 3, 1),
                    notes: None,
                },
                &time,
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { entity: "mortgage", .. }));
    }

    #[test]
    fn test_payoff_transition() {
        let mut terms = standard_terms();
        terms.original_principal = Money::from_cents(1000_00);
        terms.term_months = 12;
        let mut portfolio = MortgagePortfolio::new();
        let mortgage_id = portfolio.add(Mortgage::originate(terms));
        let time = test_time();

        portfolio
            .record_payment(
                mortgage_id,
                MortgagePaymentRequest {
                    amount: Money::from_cents(1005_42),
                    principal_portion: Money::from_cents(1000_00),
                    interest_portion: Money::from_cents(5_42),
                    escrow_portion: None,
                    date: date(2024, 3, 1),
                    notes: Some("payoff".to_string()),
                },
                &time,
            )
            .unwrap();

        let mortgage = portfolio.get(mortgage_id).unwrap();
        assert_eq!(mortgage.current_balance, Money::ZERO);
        assert_eq!(mortgage.status, MortgageStatus::PaidOff);
        // no further scheduled payment
        assert_eq!(mortgage.next_payment_date, None);
        assert!(mortgage.remaining_schedule().is_empty());

        let events = portfolio.take_events();
        assert!(matches!(events[0], Event::MortgagePaymentRecorded { .. }));
        assert!(matches!(events[1], Event::MortgagePaidOff { .. }));

        // a settled loan rejects further payments
        let err = portfolio
            .record_payment(
                mortgage_id,
                MortgagePaymentRequest {
                    amount: Money::from_cents(100_00),
                    principal_portion: Money::from_cents(100_00),
                    interest_portion: Money::ZERO,
                    escrow_portion: None,
                    date: date(2024, 4, 1),
                    notes: None,
                },
                &time,
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidState { .. }));
    }

    #[test]
    fn test_biweekly_due_date_advance() {
        let mut terms = standard_terms();
        terms.payment_frequency = PaymentFrequency::BiWeekly;
        let mut portfolio = MortgagePortfolio::new();
        let mortgage_id = portfolio.add(Mortgage::originate(terms));
        let time = test_time();

        portfolio
            .record_payment(
                mortgage_id,
                MortgagePaymentRequest {
                    amount: Money::from_cents(948_10),
                    principal_portion: Money::from_cents(135_60),
                    interest_portion: Money::from_cents(812_50),
                    escrow_portion: None,
                    date: date(2024, 3, 1),
                    notes: None,
                },
                &time,
            )
            .unwrap();

        let mortgage = portfolio.get(mortgage_id).unwrap();
        assert_eq!(mortgage.next_payment_date, Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_summary_reconciles_history_and_projection() {
        let mut portfolio = MortgagePortfolio::new();
        let mortgage_id = portfolio.add(Mortgage::originate(standard_terms()));
        let time = test_time();

        portfolio
            .record_payment(
                mortgage_id,
                MortgagePaymentRequest {
                    amount: Money::from_cents(1896_20),
                    principal_portion: Money::from_cents(271_20),
                    interest_portion: Money::from_cents(1625_00),
                    escrow_portion: None,
                    date: date(2024, 3, 1),
                    notes: None,
                },
                &time,
            )
            .unwrap();

        let mortgage = portfolio.get(mortgage_id).unwrap();
        let summary = mortgage.summary(date(2024, 3, 20));

        assert_eq!(summary.principal_paid, Money::from_cents(271_20));
        assert_eq!(summary.interest_paid, Money::from_cents(1625_00));
        // 271.20 of 300,000.00 retired
        assert_eq!(summary.percent_paid_off, dec!(0.0904));
        // next payment apr 1, twelve days out
        assert_eq!(summary.days_until_next_payment, Some(12));
        assert_eq!(
            summary.total_interest,
            summary.interest_paid + summary.remaining_interest
        );
        assert_eq!(
            summary.lifetime_cost,
            mortgage.original_principal + summary.total_interest
        );
        assert!(summary.projected_payoff_date.is_some());
    }

    #[test]
    fn test_extra_payment_savings_monotonicity() {
        let mortgage = Mortgage::originate(standard_terms());

        let none = mortgage.extra_payment_savings(Money::ZERO);
        assert_eq!(none.interest_saved, Money::ZERO);
        assert_eq!(none.months_saved, 0);

        let modest = mortgage.extra_payment_savings(Money::from_cents(100_00));
        assert!(modest.interest_saved.is_positive());
        assert!(modest.months_saved > 0);

        let aggressive = mortgage.extra_payment_savings(Money::from_cents(500_00));
        assert!(aggressive.interest_saved > modest.interest_saved);
        assert!(aggressive.months_saved > modest.months_saved);

        // comparison never mutates the mortgage
        assert_eq!(mortgage.current_balance, mortgage.original_principal);
    }

    #[test]
    fn test_mortgage_serde_round_trip() {
        let mortgage = Mortgage::originate(standard_terms());
        let json = serde_json::to_string(&mortgage).unwrap();
        let restored: Mortgage = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, mortgage);
    }
}
