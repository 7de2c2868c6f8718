use super::money::Money;
use super::payment::PaymentSummary;
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the remaining balance is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BalanceMode {
    /// `balance = total_due - payment_made`, unclamped.
    #[default]
    Simple,
    /// `balance = max(initial_balance - (total_due + penalties), 0)`.
    Running { initial_balance: Money },
}

/// Projects totals into a [`PaymentSummary`]. Holds no ledger state.
#[derive(Debug, Clone, Copy)]
pub struct BalanceResolver {
    mode: BalanceMode,
}

impl BalanceResolver {
    pub fn new(mode: BalanceMode) -> Result<Self> {
        if let BalanceMode::Running { initial_balance } = mode
            && initial_balance.is_negative()
        {
            return Err(PaymentError::ConfigError(
                "Initial balance must not be negative".to_string(),
            ));
        }
        Ok(Self { mode })
    }

    pub fn resolve(
        &self,
        total_due: Money,
        penalties: Money,
        payment_made: Option<Decimal>,
    ) -> PaymentSummary {
        match self.mode {
            BalanceMode::Simple => {
                let paid = Money::new(payment_made.unwrap_or_default()).round();
                PaymentSummary {
                    total_due,
                    penalties,
                    total_paid: paid,
                    balance: (total_due - paid).round(),
                }
            }
            BalanceMode::Running { initial_balance } => {
                let total_paid = (total_due + penalties).round();
                PaymentSummary {
                    total_due,
                    penalties,
                    total_paid,
                    balance: (initial_balance - total_paid).clamp_non_negative().round(),
                }
            }
        }
    }
}
