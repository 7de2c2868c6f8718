use super::installment::InstallmentId;
use super::payment::{Payer, PaymentRecord, PaymentSummary};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{Local, NaiveDate};

/// What a payer is told once a payment has been computed.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub payer: Payer,
    pub reference_number: Option<String>,
    pub installments: Vec<InstallmentId>,
    pub summary: PaymentSummary,
}

/// Append-only store of processed payments.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn append(&self, record: PaymentRecord) -> Result<()>;
    /// All records, most recent first.
    async fn list(&self) -> Result<Vec<PaymentRecord>>;
}

/// Delivers payment confirmations. Failures are returned, never swallowed.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, confirmation: &Confirmation) -> Result<()>;
}

/// Source of the reference date used to judge lateness.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

pub type RecordStoreBox = Box<dyn RecordStore>;
pub type NotifierBox = Box<dyn Notifier>;
pub type ClockBox = Box<dyn Clock>;

/// Local calendar date of the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
