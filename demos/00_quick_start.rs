/// quick start - bill rent, collect a payment, check the lease balance
use chrono::NaiveDate;
use property_ledger_rs::{
    BillingPeriod, ChargeLedger, ChargeType, InMemoryLeaseDirectory, LeaseSummary, Money,
    NewCharge, PaymentMethod, RecordPayment, SafeTimeProvider, TimeSource, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);

    // the surrounding system owns leases; the ledger only looks them up
    let mut directory = InMemoryLeaseDirectory::new();
    let lease_id = Uuid::new_v4();
    let entity_id = Uuid::new_v4();
    directory.insert(LeaseSummary {
        lease_id,
        entity_id,
        display_name: "Unit 4B, 12 Elm St".to_string(),
        end_date: None,
    });

    let mut ledger = ChargeLedger::new();

    // bill march rent
    ledger.create_charge(
        &directory,
        NewCharge {
            entity_id,
            lease_id,
            period: BillingPeriod::new(2024, 3),
            charge_type: ChargeType::Rent,
            amount: Money::from_major(1500),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            linked_charge_id: None,
        },
        &time,
    )?;

    // tenant pays; allocation is oldest due date first
    ledger.record_payment(
        &directory,
        RecordPayment {
            entity_id,
            lease_id,
            payer_id: Uuid::new_v4(),
            total: Money::from_major(1500),
            method: PaymentMethod::BankTransfer,
            allocations: None,
            memo: None,
            date: None,
        },
        &time,
    )?;

    let today = time.now().date_naive();
    let balance = ledger.balance(lease_id, today);
    println!("balance: ${}", balance.balance);
    println!("open charges: {}", balance.open_charges);

    Ok(())
}
