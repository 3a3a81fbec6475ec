//! Per-field validation rules
//!
//! Every rule is a pure function of the entered value (plus the smoker flag
//! or today's date where needed). A passing field yields `None`.

use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::date;
use super::input::{DateInput, Input, NumberInput};
use super::messages::MessageLookup;
use super::types::{FieldName, FormFieldState, SmokeStatus, ValidationError};

/// Letter runs joined by single spaces, apostrophes or hyphens
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\p{L}+(?:[ '\-]\p{L}+)*$").expect("name regex is valid")
});

pub const CIGARETTES_MIN: f64 = 0.0;
pub const CIGARETTES_MAX: f64 = 30.0;
pub const HEIGHT_MIN_CM: f64 = 50.0;
pub const HEIGHT_MAX_CM: f64 = 250.0;
pub const WEIGHT_MIN_KG: f64 = 2.0;
pub const WEIGHT_MAX_KG: f64 = 300.0;
pub const AGE_MIN: i32 = 1;
pub const AGE_MAX: i32 = 100;
pub const INSURANCE_PRICE_MIN: f64 = 1.0;

/// Message keys for a bounded numeric field
struct Bounds {
    min: f64,
    max: f64,
    required: &'static str,
    below: &'static str,
    above: &'static str,
}

const HEIGHT_BOUNDS: Bounds = Bounds {
    min: HEIGHT_MIN_CM,
    max: HEIGHT_MAX_CM,
    required: "errors.height_required",
    below: "errors.height_min",
    above: "errors.height_max",
};

const WEIGHT_BOUNDS: Bounds = Bounds {
    min: WEIGHT_MIN_KG,
    max: WEIGHT_MAX_KG,
    required: "errors.weight_required",
    below: "errors.weight_min",
    above: "errors.weight_max",
};

/// Field validators bound to a message lookup
#[derive(Debug, Clone)]
pub struct Validators<M> {
    messages: M,
}

impl<M: MessageLookup> Validators<M> {
    pub fn new(messages: M) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &M {
        &self.messages
    }

    fn t(&self, key: &str) -> Option<String> {
        Some(self.messages.lookup(key))
    }

    pub fn first_name(&self, value: &str) -> Option<String> {
        self.name(value, "errors.first_name_required")
    }

    pub fn last_name(&self, value: &str) -> Option<String> {
        self.name(value, "errors.last_name_required")
    }

    fn name(&self, value: &str, required_key: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            return self.t(required_key);
        }
        if !NAME_PATTERN.is_match(value) {
            return self.t("errors.name_invalid");
        }
        None
    }

    pub fn smoke(&self, value: Option<SmokeStatus>) -> Option<String> {
        match value {
            Some(_) => None,
            None => self.t("errors.smoke_required"),
        }
    }

    /// Only checked for smokers; anything goes otherwise
    pub fn cigarettes_per_day(&self, value: &NumberInput, smoker: bool) -> Option<String> {
        if !smoker {
            return None;
        }
        let n = match value {
            Input::Empty => return self.t("errors.cpd_required"),
            Input::Unparsed(_) => return self.t("errors.number_invalid"),
            Input::Parsed(n) => *n,
        };
        if n < CIGARETTES_MIN {
            return self.t("errors.cpd_min");
        }
        if n.fract() != 0.0 {
            return self.t("errors.cpd_integer");
        }
        if n > CIGARETTES_MAX {
            return self.t("errors.cpd_max");
        }
        None
    }

    pub fn height(&self, value: &NumberInput) -> Option<String> {
        self.bounded(value, &HEIGHT_BOUNDS)
    }

    pub fn weight(&self, value: &NumberInput) -> Option<String> {
        self.bounded(value, &WEIGHT_BOUNDS)
    }

    fn bounded(&self, value: &NumberInput, bounds: &Bounds) -> Option<String> {
        let n = match value {
            Input::Empty => return self.t(bounds.required),
            Input::Unparsed(_) => return self.t("errors.number_invalid"),
            Input::Parsed(n) => *n,
        };
        if n < bounds.min {
            return self.t(bounds.below);
        }
        if n > bounds.max {
            return self.t(bounds.above);
        }
        None
    }

    pub fn date_of_birth(&self, value: &DateInput, today: NaiveDate) -> Option<String> {
        let dob = match value {
            Input::Empty => return self.t("errors.dob_required"),
            Input::Unparsed(_) => return self.t("errors.dob_invalid"),
            Input::Parsed(d) => *d,
        };
        if dob > today {
            return self.t("errors.dob_future");
        }
        let age = date::age(dob, today);
        if age > AGE_MAX {
            return self.t("errors.age_max");
        }
        if age < AGE_MIN {
            return self.t("errors.age_min_exact");
        }
        None
    }

    pub fn insurance_price(&self, value: &NumberInput) -> Option<String> {
        match value.value() {
            Some(n) if n >= INSURANCE_PRICE_MIN => None,
            _ => self.t("errors.insurance_price_invalid"),
        }
    }

    /// Validate one field against a state snapshot
    pub fn validate_field(
        &self,
        field: FieldName,
        state: &FormFieldState,
        today: NaiveDate,
    ) -> Option<ValidationError> {
        let message = match field {
            FieldName::FirstName => self.first_name(&state.first_name),
            FieldName::LastName => self.last_name(&state.last_name),
            FieldName::Smoke => self.smoke(state.smoke),
            FieldName::CigarettesPerDay => {
                self.cigarettes_per_day(&state.cigarettes_per_day, state.is_smoker())
            }
            FieldName::Height => self.height(&state.height_cm),
            FieldName::Weight => self.weight(&state.weight_kg),
            FieldName::DateOfBirth => self.date_of_birth(&state.date_of_birth, today),
            FieldName::InsurancePrice => self.insurance_price(&state.insurance_price),
        };
        message.map(|m| ValidationError::new(field, m))
    }

    /// Validate every field; only failing fields appear in the map
    pub fn validate_all(
        &self,
        state: &FormFieldState,
        today: NaiveDate,
    ) -> BTreeMap<FieldName, ValidationError> {
        FieldName::ALL
            .into_iter()
            .filter_map(|field| {
                self.validate_field(field, state, today)
                    .map(|err| (field, err))
            })
            .collect()
    }
}
