//! Outbound payload assembly
//!
//! `assemble_submission` is only meaningful once `is_complete` holds; the
//! form controller gates on it before submitting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use super::date;
use super::messages::MessageLookup;
use super::types::{FieldName, FormFieldState};
use super::validators::Validators;

/// Payload handed to the prediction backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPayload {
    pub first_name: String,
    pub last_name: String,
    pub smokes: bool,
    pub cigarettes_per_day: Option<u32>,
    #[serde(serialize_with = "whole_as_integer")]
    pub height_cm: f64,
    #[serde(serialize_with = "whole_as_integer")]
    pub weight_kg: f64,
    /// `DD.MM.YYYY`
    pub date_of_birth: String,
    pub sports: Vec<String>,
    #[serde(serialize_with = "whole_as_integer")]
    pub insurance_price: f64,
}

/// Whole numbers go out as `170`, not `170.0`
fn whole_as_integer<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    // 2^53, the largest range where every integer is exact
    const EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() < EXACT_LIMIT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("submission assembled from an incomplete form (failing: {})", join_fields(.fields))]
    Incomplete { fields: Vec<FieldName> },
}

fn join_fields(fields: &[FieldName]) -> String {
    fields
        .iter()
        .map(FieldName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every validator passes and every required field is present
pub fn is_complete<M: MessageLookup>(
    state: &FormFieldState,
    validators: &Validators<M>,
    today: NaiveDate,
) -> bool {
    failing_fields(state, validators, today).is_empty()
}

fn failing_fields<M: MessageLookup>(
    state: &FormFieldState,
    validators: &Validators<M>,
    today: NaiveDate,
) -> Vec<FieldName> {
    let mut failing: Vec<FieldName> = validators
        .validate_all(state, today)
        .into_keys()
        .collect();

    let missing = [
        (FieldName::Height, state.height_cm.is_empty()),
        (FieldName::Weight, state.weight_kg.is_empty()),
        (FieldName::DateOfBirth, state.date_of_birth.is_empty()),
        (FieldName::InsurancePrice, state.insurance_price.is_empty()),
        (
            FieldName::CigarettesPerDay,
            state.is_smoker() && state.cigarettes_per_day.is_empty(),
        ),
    ];
    for (field, absent) in missing {
        if absent && !failing.contains(&field) {
            failing.push(field);
        }
    }
    failing
}

/// Build the canonical payload from a complete form.
///
/// Fails with [`SubmissionError::Incomplete`] when called on a form that
/// does not pass [`is_complete`]; callers gate on that first.
pub fn assemble_submission<M: MessageLookup>(
    state: &FormFieldState,
    validators: &Validators<M>,
    today: NaiveDate,
) -> Result<CanonicalPayload, SubmissionError> {
    let incomplete = || SubmissionError::Incomplete {
        fields: failing_fields(state, validators, today),
    };
    if !is_complete(state, validators, today) {
        return Err(incomplete());
    }

    let smokes = state.is_smoker();
    let cigarettes_per_day = if smokes {
        Some(state.cigarettes_per_day.value().ok_or_else(incomplete)? as u32)
    } else {
        None
    };
    let dob = state.date_of_birth.value().ok_or_else(incomplete)?;

    Ok(CanonicalPayload {
        first_name: state.first_name.trim().to_string(),
        last_name: state.last_name.trim().to_string(),
        smokes,
        cigarettes_per_day,
        height_cm: state.height_cm.value().ok_or_else(incomplete)?,
        weight_kg: state.weight_kg.value().ok_or_else(incomplete)?,
        date_of_birth: date::format(dob),
        sports: state
            .sports
            .iter()
            .map(|s| s.name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
        insurance_price: state.insurance_price.value().ok_or_else(incomplete)?,
    })
}
