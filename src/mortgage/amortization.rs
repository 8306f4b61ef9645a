use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::decimal::{Money, Rate};
use crate::types::PaymentFrequency;

/// one row of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub payment_number: u32,
    pub payment_date: NaiveDate,
    pub payment_amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub ending_balance: Money,
    pub cumulative_interest: Money,
}

/// fixed monthly principal-and-interest payment for a loan's terms.
/// rounding to the cent happens once, on the final value.
pub fn monthly_payment(principal: Money, annual_rate: Rate, term_months: u32) -> Money {
    if term_months == 0 {
        return principal;
    }

    let monthly_rate = annual_rate.monthly().as_decimal();
    if monthly_rate.is_zero() {
        return Money::from_decimal(principal.as_decimal() / Decimal::from(term_months));
    }

    // payment = P * r * (1 + r)^n / ((1 + r)^n - 1)
    let base = Decimal::ONE + monthly_rate;
    let mut factor = Decimal::ONE;
    for _ in 0..term_months {
        factor *= base;
    }

    Money::from_decimal(principal.as_decimal() * monthly_rate * factor / (factor - Decimal::ONE))
}

/// full schedule from origination terms
pub fn full_schedule(
    principal: Money,
    annual_rate: Rate,
    term_months: u32,
    first_payment_date: NaiveDate,
) -> Vec<ScheduleEntry> {
    let payment = monthly_payment(principal, annual_rate, term_months);
    project(principal, annual_rate, payment, first_payment_date, term_months)
}

/// remaining schedule from a live balance and next payment date, used for
/// payoff projections. capped at twice the original term so a payment too
/// small to cover accruing interest degrades to a truncated schedule
/// instead of looping.
pub fn remaining_schedule(
    balance: Money,
    annual_rate: Rate,
    payment: Money,
    next_payment_date: NaiveDate,
    term_months: u32,
) -> Vec<ScheduleEntry> {
    let cap = (term_months * 2).max(1);
    let entries = project(balance, annual_rate, payment, next_payment_date, cap);

    if let Some(last) = entries.last() {
        if last.ending_balance.is_positive() {
            warn!(
                payments = entries.len(),
                remaining = %last.ending_balance,
                "amortization did not converge within the iteration cap; schedule truncated"
            );
        }
    }

    entries
}

/// the shared recurrence: interest on the running balance, remainder to
/// principal. an early payoff is clamped to the balance; the last scheduled
/// payment absorbs any accumulated rounding residual, provided the balance
/// is still within one level payment (a larger residual means the input
/// never converged and the schedule truncates instead).
fn project(
    starting_balance: Money,
    annual_rate: Rate,
    payment: Money,
    first_payment_date: NaiveDate,
    max_payments: u32,
) -> Vec<ScheduleEntry> {
    let monthly_rate = annual_rate.monthly().as_decimal();

    let mut entries = Vec::new();
    let mut balance = starting_balance;
    let mut cumulative_interest = Money::ZERO;
    let mut payment_date = first_payment_date;

    for payment_number in 1..=max_payments {
        if !balance.is_positive() {
            break;
        }

        let interest_portion = balance.mul_decimal(monthly_rate);
        let principal_portion = if payment_number == max_payments && balance <= payment {
            balance
        } else {
            (payment - interest_portion).min(balance)
        };

        cumulative_interest += interest_portion;
        balance -= principal_portion;

        entries.push(ScheduleEntry {
            payment_number,
            payment_date,
            payment_amount: principal_portion + interest_portion,
            principal_portion,
            interest_portion,
            ending_balance: balance,
            cumulative_interest,
        });

        payment_date = add_months(payment_date, 1);
    }

    entries
}

/// advance a due date by one payment period
pub fn advance_due_date(date: NaiveDate, frequency: PaymentFrequency) -> NaiveDate {
    match frequency {
        PaymentFrequency::Weekly => date + Duration::days(7),
        PaymentFrequency::BiWeekly => date + Duration::days(14),
        PaymentFrequency::Monthly => add_months(date, 1),
    }
}

/// add calendar months, clamping the day to the target month's length
/// (jan 31 -> feb 28/29)
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    let total = date.year() * 12 + date.month() as i32 - 1 + months as i32;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
