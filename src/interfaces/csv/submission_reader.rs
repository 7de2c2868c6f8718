use crate::domain::installment::InstallmentId;
use crate::domain::payment::{Payer, PaymentSubmission};
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

const INSTALLMENT_SEPARATOR: char = ';';

/// One CSV row as written by the batch exporter.
#[derive(Debug, Deserialize)]
struct SubmissionRow {
    name: String,
    student_number: String,
    email: String,
    #[serde(default)]
    reference_number: Option<String>,
    installments: String,
    #[serde(default)]
    payment_made: Option<Decimal>,
}

impl From<SubmissionRow> for PaymentSubmission {
    fn from(row: SubmissionRow) -> Self {
        let installments = row
            .installments
            .split(INSTALLMENT_SEPARATOR)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(InstallmentId::from)
            .collect();
        let mut submission = PaymentSubmission::new(
            Payer::new(row.name, row.student_number, row.email),
            installments,
        );
        if let Some(reference) = row.reference_number {
            submission = submission.with_reference_number(reference);
        }
        submission.payment_made = row.payment_made;
        submission
    }
}

/// Reads payment submissions from a CSV source.
///
/// Expected header: `name,student_number,email,reference_number,installments,payment_made`.
/// `installments` holds identifiers separated by `;`. Empty optional cells are
/// read as absent.
pub struct SubmissionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> SubmissionReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads and converts rows; a malformed row yields an error and the
    /// iterator moves on.
    pub fn submissions(self) -> impl Iterator<Item = Result<PaymentSubmission>> {
        self.reader
            .into_deserialize::<SubmissionRow>()
            .map(|result| result.map(PaymentSubmission::from).map_err(PaymentError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reader_valid_stream() {
        let data = "name,student_number,email,reference_number,installments,payment_made\n\
                    Juan Dela Cruz,2024-001,juan@example.com,REF-1,1081.50;1733.13_1st,\n\
                    Maria Santos,2024-002,maria@example.com,,1733.13_2nd,1733.13";
        let reader = SubmissionReader::new(data.as_bytes());
        let results: Vec<Result<PaymentSubmission>> = reader.submissions().collect();

        assert_eq!(results.len(), 2);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.payer.name, "Juan Dela Cruz");
        assert_eq!(first.reference_number.as_deref(), Some("REF-1"));
        assert_eq!(
            first.installments,
            vec![InstallmentId::from("1081.50"), InstallmentId::from("1733.13_1st")]
        );
        assert_eq!(first.payment_made, None);

        let second = results[1].as_ref().unwrap();
        assert_eq!(second.reference_number, None);
        assert_eq!(second.payment_made, Some(dec!(1733.13)));
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "name,student_number,email,reference_number,installments,payment_made\n\
                    Juan,2024-001,juan@example.com,,1081.50,not_a_number\n\
                    Maria,2024-002,maria@example.com,,1081.50,";
        let reader = SubmissionReader::new(data.as_bytes());
        let results: Vec<Result<PaymentSubmission>> = reader.submissions().collect();

        assert!(results[0].is_err());
        assert!(results[1].is_ok());
    }

    #[test]
    fn test_reader_blank_installment_cells_are_dropped() {
        let data = "name,student_number,email,reference_number,installments,payment_made\n\
                    Juan,2024-001,juan@example.com,,;;,";
        let reader = SubmissionReader::new(data.as_bytes());
        let submission = reader.submissions().next().unwrap().unwrap();
        assert!(submission.installments.is_empty());
        assert!(submission.validate().is_err());
    }
}
