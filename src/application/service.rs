use crate::config::{AppConfig, Components};
use crate::domain::balance::BalanceResolver;
use crate::domain::installment::{InstallmentSchedule, UnknownInstallmentPolicy};
use crate::domain::payment::{PaymentRecord, PaymentSubmission, PaymentSummary};
use crate::domain::penalty::PenaltyCalculator;
use crate::domain::ports::{ClockBox, Confirmation, NotifierBox, RecordStoreBox};
use crate::error::Result;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info};

/// The entry point for processing tuition payments.
///
/// `PaymentService` validates a submission, computes its [`PaymentSummary`], and
/// hands the result to the notifier and, when persistence is enabled, the record
/// store. The calculation itself is pure; every side effect goes through a port
/// owned by the service.
pub struct PaymentService {
    schedule: Arc<InstallmentSchedule>,
    calculator: PenaltyCalculator,
    resolver: BalanceResolver,
    unknown_installments: UnknownInstallmentPolicy,
    persist_records: bool,
    notifier: NotifierBox,
    record_store: RecordStoreBox,
    clock: ClockBox,
}

impl PaymentService {
    /// Creates a new `PaymentService` from a validated configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Schedule, policies and persistence switch. Invalid values fail here.
    /// * `notifier` - Where confirmations are delivered.
    /// * `record_store` - Where processed payments are appended.
    /// * `clock` - Supplies the reference date for lateness.
    pub fn new(
        config: &AppConfig,
        notifier: NotifierBox,
        record_store: RecordStoreBox,
        clock: ClockBox,
    ) -> Result<Self> {
        let Components {
            schedule,
            calculator,
            resolver,
        } = config.build()?;
        Ok(Self {
            schedule,
            calculator,
            resolver,
            unknown_installments: config.unknown_installments,
            persist_records: config.persist_records,
            notifier,
            record_store,
            clock,
        })
    }

    pub fn calculator(&self) -> &PenaltyCalculator {
        &self.calculator
    }

    /// Computes the summary for `submission` as of `reference` without any side effect.
    pub fn summarize(
        &self,
        submission: &PaymentSubmission,
        reference: NaiveDate,
    ) -> Result<PaymentSummary> {
        submission.validate()?;
        let total_due = self
            .schedule
            .total_due(&submission.installments, self.unknown_installments)?;
        let penalties = self.calculator.calculate(&submission.installments, reference);
        let summary = self
            .resolver
            .resolve(total_due, penalties, submission.payment_made);
        debug!(?summary, %reference, "payment summarized");
        Ok(summary)
    }

    /// Processes a submission against today's date.
    pub async fn process(&self, submission: PaymentSubmission) -> Result<PaymentSummary> {
        let reference = self.clock.today();
        self.process_as_of(submission, reference).await
    }

    /// Processes a submission: summarize, confirm, then record.
    ///
    /// Validation failures return before anything is sent or stored. A notifier
    /// failure aborts before the record is written; a store failure is reported
    /// after the confirmation has gone out.
    pub async fn process_as_of(
        &self,
        submission: PaymentSubmission,
        reference: NaiveDate,
    ) -> Result<PaymentSummary> {
        let summary = self.summarize(&submission, reference)?;

        let confirmation = Confirmation {
            payer: submission.payer.clone(),
            reference_number: submission.reference_number.clone(),
            installments: submission.installments.clone(),
            summary,
        };
        self.notifier.notify(&confirmation).await?;

        if self.persist_records {
            let record = PaymentRecord::new(&submission, summary, Utc::now());
            self.record_store.append(record).await?;
        }

        info!(
            student = %submission.payer.student_number,
            installments = submission.installments.len(),
            total_due = %summary.total_due,
            penalties = %summary.penalties,
            balance = %summary.balance,
            "payment processed"
        );
        Ok(summary)
    }

    /// All stored payments, most recent first.
    pub async fn history(&self) -> Result<Vec<PaymentRecord>> {
        self.record_store.list().await
    }
}
