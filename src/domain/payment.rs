use super::installment::InstallmentId;
use super::money::Money;
use crate::error::{PaymentError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The person settling installments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    pub name: String,
    pub student_number: String,
    pub email: String,
}

impl Payer {
    pub fn new(
        name: impl Into<String>,
        student_number: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into().trim().to_string(),
            student_number: student_number.into().trim().to_string(),
            email: email.into().trim().to_string(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(PaymentError::ValidationError(
                "Payer name is required".to_string(),
            ));
        }
        if self.student_number.is_empty() {
            return Err(PaymentError::ValidationError(
                "Student number is required".to_string(),
            ));
        }
        if !is_plausible_email(&self.email) {
            return Err(PaymentError::ValidationError(format!(
                "Malformed email address: {:?}",
                self.email
            )));
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !domain.ends_with('.')
}

/// A submitted payment form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSubmission {
    pub payer: Payer,
    #[serde(default)]
    pub reference_number: Option<String>,
    pub installments: Vec<InstallmentId>,
    /// Amount the payer reports having paid; only read in simple balance mode.
    #[serde(default)]
    pub payment_made: Option<Decimal>,
}

impl PaymentSubmission {
    pub fn new(payer: Payer, installments: Vec<InstallmentId>) -> Self {
        Self {
            payer,
            reference_number: None,
            installments,
            payment_made: None,
        }
    }

    pub fn with_reference_number(mut self, reference: impl Into<String>) -> Self {
        let reference = reference.into().trim().to_string();
        self.reference_number = (!reference.is_empty()).then_some(reference);
        self
    }

    pub fn with_payment_made(mut self, amount: Decimal) -> Self {
        self.payment_made = Some(amount);
        self
    }

    /// Rejects the submission before anything is calculated.
    pub fn validate(&self) -> Result<()> {
        self.payer.validate()?;
        if self.installments.is_empty() {
            return Err(PaymentError::ValidationError(
                "At least one installment must be selected".to_string(),
            ));
        }
        let mut seen = HashSet::with_capacity(self.installments.len());
        for id in &self.installments {
            if id.as_str().is_empty() {
                return Err(PaymentError::ValidationError(
                    "Installment identifier must not be empty".to_string(),
                ));
            }
            if !seen.insert(id) {
                return Err(PaymentError::ValidationError(format!(
                    "Installment {} selected more than once",
                    id
                )));
            }
        }
        if let Some(amount) = self.payment_made
            && amount < Decimal::ZERO
        {
            return Err(PaymentError::ValidationError(
                "Payment made must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of one calculation: what was due, what was charged, what remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub total_due: Money,
    pub penalties: Money,
    pub total_paid: Money,
    pub balance: Money,
}

/// Persisted snapshot of a processed payment. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub payer: Payer,
    #[serde(default)]
    pub reference_number: Option<String>,
    pub installments: Vec<InstallmentId>,
    pub summary: PaymentSummary,
    pub recorded_at: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn new(
        submission: &PaymentSubmission,
        summary: PaymentSummary,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            payer: submission.payer.clone(),
            reference_number: submission.reference_number.clone(),
            installments: submission.installments.clone(),
            summary,
            recorded_at,
        }
    }
}
