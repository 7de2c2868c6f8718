use super::installment::{InstallmentDefinition, InstallmentId, InstallmentSchedule};
use super::money::Money;
use crate::error::{PaymentError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// How a late installment is surcharged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PenaltyPolicy {
    /// Fixed amount per overdue installment.
    Flat { amount: Money },
    /// `rate × face value`, once per overdue installment.
    RateOnce { rate: Decimal },
    /// `rate × face value × whole days overdue`.
    RatePerDay { rate: Decimal },
}

impl PenaltyPolicy {
    pub fn validate(&self) -> Result<()> {
        let negative = match self {
            Self::Flat { amount } => amount.is_negative(),
            Self::RateOnce { rate } | Self::RatePerDay { rate } => rate.is_sign_negative(),
        };
        if negative {
            return Err(PaymentError::ConfigError(format!(
                "Penalty policy {:?} must not be negative",
                self
            )));
        }
        Ok(())
    }

    /// Unrounded surcharge for `installment` as of `reference`.
    pub fn charge(&self, installment: &InstallmentDefinition, reference: NaiveDate) -> Money {
        if !installment.is_overdue(reference) {
            return Money::ZERO;
        }
        match *self {
            Self::Flat { amount } => amount,
            Self::RateOnce { rate } => installment.face_value * rate,
            Self::RatePerDay { rate } => {
                installment.face_value * rate * Decimal::from(installment.days_overdue(reference))
            }
        }
    }
}

/// Computes the total late penalty for a selection of installments.
#[derive(Debug, Clone)]
pub struct PenaltyCalculator {
    schedule: Arc<InstallmentSchedule>,
    default_policy: PenaltyPolicy,
}

impl PenaltyCalculator {
    pub fn new(schedule: Arc<InstallmentSchedule>, default_policy: PenaltyPolicy) -> Self {
        Self {
            schedule,
            default_policy,
        }
    }

    pub fn schedule(&self) -> &InstallmentSchedule {
        &self.schedule
    }

    /// Policy in force for `installment`: its own override, else the default.
    pub fn policy_for(&self, installment: &InstallmentDefinition) -> PenaltyPolicy {
        installment.penalty.unwrap_or(self.default_policy)
    }

    /// Total penalty, rounded to cents. Unscheduled identifiers are skipped.
    pub fn calculate(&self, ids: &[InstallmentId], reference: NaiveDate) -> Money {
        let mut total = Money::ZERO;
        for id in ids {
            let Some(installment) = self.schedule.resolve(id) else {
                warn!(installment = %id, "no schedule entry for installment, skipping penalty");
                continue;
            };
            let charge = self.policy_for(installment).charge(installment, reference);
            debug!(
                installment = %id,
                due = %installment.due_date,
                %reference,
                %charge,
                "penalty assessed"
            );
            total += charge;
        }
        total.clamp_non_negative().round()
    }
}
