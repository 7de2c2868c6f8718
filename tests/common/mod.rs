#![allow(dead_code)]

use chrono::NaiveDate;
use rand::Rng;
use rand::seq::SliceRandom;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use tuitionpay::domain::installment::InstallmentId;
use tuitionpay::domain::payment::{Payer, PaymentSubmission};

pub const DEFAULT_IDS: [&str; 5] = [
    "1081.50",
    "1733.13_1st",
    "1733.13_2nd",
    "1733.13_3rd",
    "1733.13_4th",
];

pub const CSV_HEADER: [&str; 6] = [
    "name",
    "student_number",
    "email",
    "reference_number",
    "installments",
    "payment_made",
];

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn submission(ids: &[&str]) -> PaymentSubmission {
    PaymentSubmission::new(
        Payer::new("Juan Dela Cruz", "2024-00123", "juan@example.com"),
        ids.iter().map(|id| InstallmentId::from(*id)).collect(),
    )
}

/// A non-empty random subset of the default schedule's identifiers.
pub fn random_selection<R: Rng>(rng: &mut R) -> Vec<&'static str> {
    let count = rng.gen_range(1..=DEFAULT_IDS.len());
    let mut ids = DEFAULT_IDS.to_vec();
    ids.shuffle(rng);
    ids.truncate(count);
    ids
}

pub fn generate_submissions_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    let mut rng = rand::thread_rng();

    wtr.write_record(CSV_HEADER)?;

    for i in 1..=rows {
        let installments = random_selection(&mut rng).join(";");
        wtr.write_record([
            format!("Student {}", i).as_str(),
            format!("2024-{:05}", i).as_str(),
            format!("student{}@example.com", i).as_str(),
            format!("REF-{}", i).as_str(),
            installments.as_str(),
            "",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
