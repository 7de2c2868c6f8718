use chrono::Utc;
use rust_decimal_macros::dec;
use tuitionpay::config::Institution;
use tuitionpay::domain::money::Money;
use tuitionpay::domain::payment::{PaymentRecord, PaymentSummary};
use tuitionpay::domain::ports::{
    ClockBox, Confirmation, FixedClock, NotifierBox, RecordStoreBox, SystemClock,
};
use tuitionpay::infrastructure::in_memory::InMemoryRecordStore;
use tuitionpay::infrastructure::notifier::{LogNotifier, WriterNotifier};
use tuitionpay::interfaces::email::confirmation::ConfirmationTemplate;

mod common;

fn summary() -> PaymentSummary {
    PaymentSummary {
        total_due: Money::new(dec!(1081.50)),
        penalties: Money::ZERO,
        total_paid: Money::new(dec!(1081.50)),
        balance: Money::new(dec!(6932.52)),
    }
}

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let record_store: RecordStoreBox = Box::new(InMemoryRecordStore::new());
    let notifier: NotifierBox = Box::new(LogNotifier::new(ConfirmationTemplate::new(
        Institution::default(),
    )));

    let s = common::submission(&["1081.50"]);
    let record = PaymentRecord::new(&s, summary(), Utc::now());
    let confirmation = Confirmation {
        payer: s.payer.clone(),
        reference_number: None,
        installments: s.installments.clone(),
        summary: summary(),
    };

    // Verify Send + Sync by spawning tasks
    let store_handle = tokio::spawn(async move {
        record_store.append(record).await.unwrap();
        record_store.list().await.unwrap()
    });

    let notify_handle = tokio::spawn(async move { notifier.notify(&confirmation).await });

    let records = store_handle.await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].payer.student_number, "2024-00123");

    assert!(notify_handle.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_writer_notifier_as_trait_object() {
    let writer =
        WriterNotifier::new(ConfirmationTemplate::new(Institution::default()), Vec::new());
    let sink = writer.sink();
    let notifier: NotifierBox = Box::new(writer);

    let s = common::submission(&["1081.50"]);
    let confirmation = Confirmation {
        payer: s.payer,
        reference_number: Some("REF-9".to_string()),
        installments: s.installments,
        summary: summary(),
    };
    tokio::spawn(async move { notifier.notify(&confirmation).await.unwrap() })
        .await
        .unwrap();

    let written = String::from_utf8(sink.lock().unwrap().clone()).unwrap();
    assert!(written.contains("Reference Number: REF-9"));
}

#[test]
fn test_clocks_as_trait_objects() {
    let fixed: ClockBox = Box::new(FixedClock(common::date(2024, 9, 6)));
    assert_eq!(fixed.today(), common::date(2024, 9, 6));

    let before = chrono::Local::now().date_naive();
    let system: ClockBox = Box::new(SystemClock);
    let today = system.today();
    assert!(today >= before && today <= chrono::Local::now().date_naive());
}
