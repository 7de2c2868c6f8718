use super::money::Money;
use super::penalty::PenaltyPolicy;
use crate::error::{PaymentError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

const ORDINAL_SEPARATOR: char = '_';

/// Largest face value accepted from an identifier that is not in the schedule.
pub const MAX_ENCODED_FACE_VALUE: Decimal = dec!(1000000000);

/// Identifier of a scheduled installment, e.g. `"1081.50"` or `"1733.13_2nd"`.
///
/// The part before the first `_` is the base key (the face value as written on the
/// payment form); the remainder is an ordinal that tells installments sharing a
/// face value apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstallmentId(String);

impl InstallmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn base_key(&self) -> &str {
        self.0
            .split_once(ORDINAL_SEPARATOR)
            .map_or(self.0.as_str(), |(base, _)| base)
    }

    pub fn ordinal(&self) -> Option<&str> {
        self.0
            .split_once(ORDINAL_SEPARATOR)
            .map(|(_, ordinal)| ordinal)
            .filter(|ordinal| !ordinal.is_empty())
    }

    /// Face value encoded in the base key, if it parses as a decimal.
    pub fn encoded_face_value(&self) -> Option<Money> {
        Decimal::from_str(self.base_key()).ok().map(Money::new)
    }
}

impl fmt::Display for InstallmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstallmentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for InstallmentId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// One scheduled tuition installment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentDefinition {
    pub id: InstallmentId,
    #[serde(default)]
    pub label: String,
    pub face_value: Money,
    pub due_date: NaiveDate,
    /// Overrides the schedule's default penalty policy for this installment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty: Option<PenaltyPolicy>,
}

impl InstallmentDefinition {
    pub fn new(
        id: impl Into<InstallmentId>,
        label: impl Into<String>,
        face_value: Money,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            face_value,
            due_date,
            penalty: None,
        }
    }

    pub fn with_penalty(mut self, policy: PenaltyPolicy) -> Self {
        self.penalty = Some(policy);
        self
    }

    /// Whole calendar days past due at `reference`; zero when not overdue.
    pub fn days_overdue(&self, reference: NaiveDate) -> i64 {
        (reference - self.due_date).num_days().max(0)
    }

    pub fn is_overdue(&self, reference: NaiveDate) -> bool {
        reference > self.due_date
    }
}

/// What an unrecognised identifier contributes to the total due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownInstallmentPolicy {
    /// Count the face value encoded in the identifier's base key.
    #[default]
    CountFaceValue,
    /// Contribute nothing.
    Exclude,
}

/// The fixed installment table, in configuration order.
///
/// Identifiers are unique: two definitions may share a face value but never an id.
#[derive(Debug, Clone, Default)]
pub struct InstallmentSchedule {
    definitions: Vec<InstallmentDefinition>,
    index: HashMap<InstallmentId, usize>,
}

impl InstallmentSchedule {
    pub fn new(definitions: Vec<InstallmentDefinition>) -> Result<Self> {
        let mut index = HashMap::with_capacity(definitions.len());
        for (position, definition) in definitions.iter().enumerate() {
            if definition.id.as_str().is_empty() {
                return Err(PaymentError::ConfigError(
                    "Installment identifier must not be empty".to_string(),
                ));
            }
            if definition.face_value.is_negative() {
                return Err(PaymentError::ConfigError(format!(
                    "Installment {} has a negative face value",
                    definition.id
                )));
            }
            if let Some(policy) = &definition.penalty {
                policy.validate()?;
            }
            if index.insert(definition.id.clone(), position).is_some() {
                return Err(PaymentError::ConfigError(format!(
                    "Duplicate installment identifier {}",
                    definition.id
                )));
            }
        }
        Ok(Self { definitions, index })
    }

    pub fn definitions(&self) -> &[InstallmentDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Looks up the exact identifier, then a definition keyed by its bare base key.
    pub fn resolve(&self, id: &InstallmentId) -> Option<&InstallmentDefinition> {
        let position = self.index.get(id).or_else(|| {
            id.ordinal()
                .and_then(|_| self.index.get(&InstallmentId::new(id.base_key())))
        })?;
        self.definitions.get(*position)
    }

    /// Scheduled identifiers sharing `id`'s base key.
    pub fn sharing_base_key<'a>(
        &'a self,
        id: &'a InstallmentId,
    ) -> impl Iterator<Item = &'a InstallmentId> + 'a {
        self.definitions
            .iter()
            .map(|definition| &definition.id)
            .filter(move |scheduled| scheduled.base_key() == id.base_key())
    }

    /// Definition for `id`, or `None` when the identifier is not scheduled at all.
    ///
    /// An identifier that misses but shares its base key with scheduled
    /// installments is ambiguous and rejected, so that it cannot be paid
    /// without the penalty of the installment it stands for.
    fn lookup(&self, id: &InstallmentId) -> Result<Option<&InstallmentDefinition>> {
        if let Some(definition) = self.resolve(id) {
            return Ok(Some(definition));
        }
        let candidates: Vec<&str> = self.sharing_base_key(id).map(InstallmentId::as_str).collect();
        if candidates.is_empty() {
            return Ok(None);
        }
        Err(PaymentError::ValidationError(format!(
            "Installment {} is ambiguous; select one of {}",
            id,
            candidates.join(", ")
        )))
    }

    fn unscheduled_face_value(id: &InstallmentId) -> Result<Money> {
        let face_value = id.encoded_face_value().ok_or_else(|| {
            PaymentError::ValidationError(format!(
                "Installment {} is not scheduled and carries no face value",
                id
            ))
        })?;
        if face_value.value() <= Decimal::ZERO || face_value.value() > MAX_ENCODED_FACE_VALUE {
            return Err(PaymentError::ValidationError(format!(
                "Installment {} is not scheduled and its face value is out of range",
                id
            )));
        }
        Ok(face_value)
    }

    /// Sum of the face values of the selected installments.
    pub fn total_due(
        &self,
        ids: &[InstallmentId],
        unknown: UnknownInstallmentPolicy,
    ) -> Result<Money> {
        let mut total = Money::ZERO;
        for id in ids {
            let face_value = match (self.lookup(id)?, unknown) {
                (Some(definition), _) => definition.face_value,
                (None, UnknownInstallmentPolicy::Exclude) => continue,
                (None, UnknownInstallmentPolicy::CountFaceValue) => {
                    Self::unscheduled_face_value(id)?
                }
            };
            total = total.checked_add(face_value).ok_or_else(|| {
                PaymentError::ValidationError("Total amount due is too large".to_string())
            })?;
        }
        Ok(total.round())
    }
}
