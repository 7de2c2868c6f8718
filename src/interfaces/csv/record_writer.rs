use crate::domain::payment::PaymentRecord;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct RecordRow<'a> {
    recorded_at: String,
    name: &'a str,
    student_number: &'a str,
    email: &'a str,
    reference_number: &'a str,
    installments: String,
    total_due: String,
    penalties: String,
    total_paid: String,
    balance: String,
}

impl<'a> From<&'a PaymentRecord> for RecordRow<'a> {
    fn from(record: &'a PaymentRecord) -> Self {
        Self {
            recorded_at: record.recorded_at.to_rfc3339(),
            name: &record.payer.name,
            student_number: &record.payer.student_number,
            email: &record.payer.email,
            reference_number: record.reference_number.as_deref().unwrap_or_default(),
            installments: record
                .installments
                .iter()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join(";"),
            total_due: record.summary.total_due.to_string(),
            penalties: record.summary.penalties.to_string(),
            total_paid: record.summary.total_paid.to_string(),
            balance: record.summary.balance.to_string(),
        }
    }
}

/// Writes payment history as CSV, one row per record, in the order given.
pub struct RecordWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_records<'a, I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a PaymentRecord>,
    {
        let mut empty = true;
        for record in records {
            self.writer.serialize(RecordRow::from(record))?;
            empty = false;
        }
        if empty {
            self.writer.write_record([
                "recorded_at",
                "name",
                "student_number",
                "email",
                "reference_number",
                "installments",
                "total_due",
                "penalties",
                "total_paid",
                "balance",
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
