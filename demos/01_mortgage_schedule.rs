/// mortgage schedule - originate a loan and compare extra-payment payoffs
use chrono::NaiveDate;
use property_ledger_rs::{
    Money, Mortgage, MortgageTerms, MortgageType, PaymentFrequency, Rate, Uuid,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mortgage = Mortgage::originate(MortgageTerms {
        property_id: Uuid::new_v4(),
        entity_id: Uuid::new_v4(),
        property_address: "12 Elm St".to_string(),
        entity_name: "Elm Street Holdings LLC".to_string(),
        lender: "First National".to_string(),
        loan_number: Some("ML-4471".to_string()),
        mortgage_type: MortgageType::Fixed,
        original_principal: Money::from_major(300_000),
        annual_rate: Rate::from_percentage(dec!(6.5)),
        term_months: 360,
        escrow_amount: Some(Money::from_major(450)),
        escrow_details: None,
        payment_frequency: PaymentFrequency::Monthly,
        due_day: 1,
        origination_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        first_payment_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        notes: None,
    });

    println!("monthly P&I: ${}", mortgage.monthly_payment);
    println!("with escrow: ${}", mortgage.total_payment());

    let schedule = mortgage.full_schedule();
    println!("payments: {}", schedule.len());
    if let Some(last) = schedule.last() {
        println!("total interest: ${}", last.cumulative_interest);
        println!("payoff date: {}", last.payment_date);
    }

    // what does an extra $200/month buy?
    let savings = mortgage.extra_payment_savings(Money::from_major(200));
    println!("\nextra $200/month:");
    println!("interest saved: ${}", savings.interest_saved);
    println!("months saved: {}", savings.months_saved);

    Ok(())
}
