//! Startup configuration: the installment schedule, penalty and balance policies,
//! and the institution details printed on confirmations.
//!
//! Configuration is read once and treated as immutable for the life of the process.
//! Any problem here is fatal and reported as [`PaymentError::ConfigError`].

use crate::domain::balance::{BalanceMode, BalanceResolver};
use crate::domain::installment::{
    InstallmentDefinition, InstallmentSchedule, UnknownInstallmentPolicy,
};
use crate::domain::money::Money;
use crate::domain::penalty::{PenaltyCalculator, PenaltyPolicy};
use crate::error::{PaymentError, Result};
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institution {
    pub name: String,
    pub contact: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "PHP".to_string()
}

impl Default for Institution {
    fn default() -> Self {
        Self {
            name: "ICCT Colleges".to_string(),
            contact: "info@icct.edu.ph or call 270014228".to_string(),
            currency: default_currency(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub institution: Institution,
    pub penalty_policy: PenaltyPolicy,
    #[serde(default)]
    pub balance_mode: BalanceMode,
    #[serde(default)]
    pub unknown_installments: UnknownInstallmentPolicy,
    #[serde(default = "default_persist_records")]
    pub persist_records: bool,
    pub installments: Vec<InstallmentDefinition>,
}

fn default_persist_records() -> bool {
    true
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| PaymentError::ConfigError(format!("Invalid configuration: {}", e)))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            PaymentError::ConfigError(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Checks every value and builds the runtime components from them.
    pub fn build(&self) -> Result<Components> {
        self.penalty_policy.validate()?;
        if self.institution.currency.trim().is_empty() {
            return Err(PaymentError::ConfigError(
                "Currency must not be empty".to_string(),
            ));
        }
        let schedule = Arc::new(InstallmentSchedule::new(self.installments.clone())?);
        Ok(Components {
            calculator: PenaltyCalculator::new(schedule.clone(), self.penalty_policy),
            resolver: BalanceResolver::new(self.balance_mode)?,
            schedule,
        })
    }
}

/// The immutable pieces a `PaymentService` is assembled from.
#[derive(Debug, Clone)]
pub struct Components {
    pub schedule: Arc<InstallmentSchedule>,
    pub calculator: PenaltyCalculator,
    pub resolver: BalanceResolver,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

impl Default for AppConfig {
    /// The 2024 first-semester tuition plan: a downpayment and four equal
    /// installments, surcharged 5% of face value per day late.
    fn default() -> Self {
        let installment = Money::new(dec!(1733.13));
        Self {
            institution: Institution::default(),
            penalty_policy: PenaltyPolicy::RatePerDay { rate: dec!(0.05) },
            balance_mode: BalanceMode::Running {
                initial_balance: Money::new(dec!(8014.02)),
            },
            unknown_installments: UnknownInstallmentPolicy::CountFaceValue,
            persist_records: true,
            installments: vec![
                InstallmentDefinition::new(
                    "1081.50",
                    "Downpayment",
                    Money::new(dec!(1081.50)),
                    date(2024, 8, 15),
                ),
                InstallmentDefinition::new(
                    "1733.13_1st",
                    "1st installment",
                    installment,
                    date(2024, 9, 3),
                ),
                InstallmentDefinition::new(
                    "1733.13_2nd",
                    "2nd installment",
                    installment,
                    date(2024, 10, 3),
                ),
                InstallmentDefinition::new(
                    "1733.13_3rd",
                    "3rd installment",
                    installment,
                    date(2024, 11, 4),
                ),
                InstallmentDefinition::new(
                    "1733.13_4th",
                    "4th installment",
                    installment,
                    date(2024, 12, 3),
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_builds() {
        let config = AppConfig::default();
        let components = config.build().unwrap();
        assert_eq!(components.schedule.len(), 5);

        let full_plan: Money = components
            .schedule
            .definitions()
            .iter()
            .map(|d| d.face_value)
            .sum();
        assert_eq!(
            config.balance_mode,
            BalanceMode::Running {
                initial_balance: full_plan
            }
        );
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "penalty_policy": { "kind": "flat", "amount": "51.50" },
            "balance_mode": { "mode": "simple" },
            "installments": [
                { "id": "1081.50", "label": "Downpayment", "face_value": "1081.50", "due_date": "2024-08-15" },
                { "id": "1733.13", "face_value": "1733.13", "due_date": "2024-09-03",
                  "penalty": { "kind": "flat", "amount": "82.53" } }
            ]
        }"#;
        let config = AppConfig::from_json(json).unwrap();
        assert_eq!(config.institution.currency, "PHP");
        assert!(config.persist_records);
        assert_eq!(
            config.unknown_installments,
            UnknownInstallmentPolicy::CountFaceValue
        );
        assert_eq!(config.installments.len(), 2);
        assert_eq!(config.installments[1].label, "");
        assert_eq!(
            config.installments[1].penalty,
            Some(PenaltyPolicy::Flat {
                amount: Money::new(dec!(82.53))
            })
        );
        assert!(config.build().is_ok());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(AppConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_duplicate_schedule_ids_are_fatal() {
        let mut config = AppConfig::default();
        config.installments[2].id = config.installments[1].id.clone();
        assert!(matches!(config.build(), Err(PaymentError::ConfigError(_))));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        assert!(matches!(
            AppConfig::from_json("{ not json"),
            Err(PaymentError::ConfigError(_))
        ));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = AppConfig::load("/nonexistent/tuitionpay.json");
        assert!(matches!(result, Err(PaymentError::ConfigError(_))));
    }
}
