//! Prefill reconciliation from an extraction payload
//!
//! The extraction step may name the same field several ways. For every
//! logical field we keep an ordered list of candidate extractors (backend
//! snake_case key first, then camelCase, then legacy aliases) and take the
//! first one that yields a usable value. Extractors never fail: anything
//! that cannot be coerced counts as absent.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::date;
use super::input::{number_from_json, text_from_json, Input};
use super::types::{FormFieldState, SmokeStatus, SportEntry, SportList};

/// Parsed prefill payload (always a JSON object)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrefillPayload(Map<String, Value>);

impl PrefillPayload {
    /// Parse raw slot contents. Anything other than a JSON object is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(value),
            Err(err) => {
                tracing::debug!("Discarding unparsable prefill payload: {err}");
                None
            }
        }
    }

    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            other => {
                tracing::debug!("Discarding non-object prefill payload: {other}");
                None
            }
        }
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// A single source for a logical field
type Extractor<T> = fn(&PrefillPayload) -> Option<T>;

/// First candidate that yields a value wins
fn first_of<T>(payload: &PrefillPayload, candidates: &[Extractor<T>]) -> Option<T> {
    candidates.iter().find_map(|extract| extract(payload))
}

fn text_at(payload: &PrefillPayload, key: &str) -> Option<String> {
    payload.get(key).and_then(text_from_json)
}

fn number_at(payload: &PrefillPayload, key: &str) -> Option<f64> {
    payload.get(key).and_then(number_from_json)
}

fn date_at(payload: &PrefillPayload, key: &str) -> Option<NaiveDate> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .and_then(date::parse)
}

const FIRST_NAME: &[Extractor<String>] = &[
    |p| text_at(p, "first_name"),
    |p| text_at(p, "firstName"),
];

const LAST_NAME: &[Extractor<String>] = &[
    |p| text_at(p, "last_name"),
    |p| text_at(p, "lastName"),
];

const SMOKE: &[Extractor<SmokeStatus>] = &[
    |p| p.get("smokes").and_then(Value::as_bool).map(SmokeStatus::from_flag),
    |p| p.get("smoke").and_then(Value::as_str).and_then(SmokeStatus::parse),
];

const CIGARETTES_PER_DAY: &[Extractor<f64>] = &[
    |p| number_at(p, "cigarettes_per_day"),
    |p| number_at(p, "cigarettesPerDay"),
];

const HEIGHT: &[Extractor<f64>] = &[
    |p| number_at(p, "height_cm"),
    |p| number_at(p, "heightCm"),
    |p| number_at(p, "height"),
];

const WEIGHT: &[Extractor<f64>] = &[
    |p| number_at(p, "weight_kg"),
    |p| number_at(p, "weightKg"),
    |p| number_at(p, "weight"),
];

const DATE_OF_BIRTH: &[Extractor<NaiveDate>] = &[
    |p| date_at(p, "date_of_birth"),
    |p| date_at(p, "dateOfBirth"),
    |p| date_at(p, "dob"),
];

const INSURANCE_PRICE: &[Extractor<f64>] = &[
    |p| number_at(p, "insurance_price"),
    |p| number_at(p, "insurancePrice"),
];

const SPORTS: &[Extractor<SportList>] = &[|p| sport_names(p, "sports")];

/// Non-blank string entries become hobby rows; other entries are skipped
fn sport_names(payload: &PrefillPayload, key: &str) -> Option<SportList> {
    let entries = payload
        .get(key)?
        .as_array()?
        .iter()
        .filter_map(text_from_json)
        .map(SportEntry::hobby)
        .collect();
    SportList::from_entries(entries)
}

/// Result of applying a prefill payload
#[derive(Debug, Clone, PartialEq)]
pub struct PrefillOutcome {
    pub applied_field_count: usize,
    pub state: FormFieldState,
}

/// Apply every field the payload can supply on top of `prior`
pub fn reconcile_prefill(payload: &PrefillPayload, prior: FormFieldState) -> PrefillOutcome {
    let mut state = prior;
    let mut applied = 0;

    if let Some(v) = first_of(payload, FIRST_NAME) {
        state.first_name = v;
        applied += 1;
    }
    if let Some(v) = first_of(payload, LAST_NAME) {
        state.last_name = v;
        applied += 1;
    }
    if let Some(v) = first_of(payload, SMOKE) {
        state.smoke = Some(v);
        applied += 1;
    }
    if let Some(v) = first_of(payload, CIGARETTES_PER_DAY) {
        state.cigarettes_per_day = Input::Parsed(v);
        applied += 1;
    }
    if let Some(v) = first_of(payload, HEIGHT) {
        state.height_cm = Input::Parsed(v);
        applied += 1;
    }
    if let Some(v) = first_of(payload, WEIGHT) {
        state.weight_kg = Input::Parsed(v);
        applied += 1;
    }
    if let Some(v) = first_of(payload, DATE_OF_BIRTH) {
        state.date_of_birth = Input::Parsed(v);
        applied += 1;
    }
    if let Some(v) = first_of(payload, SPORTS) {
        state.sports = v;
        applied += 1;
    }
    if let Some(v) = first_of(payload, INSURANCE_PRICE) {
        state.insurance_price = Input::Parsed(v);
        applied += 1;
    }

    tracing::debug!("Prefill applied {applied} field(s)");
    PrefillOutcome {
        applied_field_count: applied,
        state,
    }
}

/// One-shot transport slot carrying raw prefill text
pub trait PrefillSlot {
    /// Read the slot and clear it, whether or not anything was there
    fn take(&mut self) -> Option<String>;
}

/// In-memory slot
#[derive(Debug, Clone, Default)]
pub struct MemorySlot(Option<String>);

impl MemorySlot {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Some(raw.into()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl PrefillSlot for MemorySlot {
    fn take(&mut self) -> Option<String> {
        self.0.take()
    }
}

/// File-backed slot; the file is deleted after the read attempt
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PrefillSlot for FileSlot {
    fn take(&mut self) -> Option<String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => Some(raw),
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!("Failed to read prefill slot {}: {err}", self.path.display());
                None
            }
        };
        if let Err(err) = fs::remove_file(&self.path) {
            tracing::warn!("Failed to clear prefill slot {}: {err}", self.path.display());
        }
        raw
    }
}

/// Drain `slot` once and reconcile whatever it held onto `prior`
pub fn reconcile_from_slot(slot: &mut dyn PrefillSlot, prior: FormFieldState) -> PrefillOutcome {
    let payload = slot.take().and_then(|raw| PrefillPayload::parse(&raw));
    match payload {
        Some(payload) => reconcile_prefill(&payload, prior),
        None => PrefillOutcome {
            applied_field_count: 0,
            state: prior,
        },
    }
}
