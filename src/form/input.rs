//! Explicit, total coercion of UI and payload values
//!
//! Every path ends in one of three states: nothing entered, parsed, or
//! entered but not parseable. Nothing here returns an error.

use chrono::NaiveDate;
use serde_json::Value;

use super::date;

/// Raw field input after coercion
#[derive(Debug, Clone, PartialEq)]
pub enum Input<T> {
    /// Nothing entered
    Empty,
    /// Entered and parsed
    Parsed(T),
    /// Entered but not parseable, keeps the raw text
    Unparsed(String),
}

/// Numeric field input
pub type NumberInput = Input<f64>;

/// Date field input
pub type DateInput = Input<NaiveDate>;

impl<T> Default for Input<T> {
    fn default() -> Self {
        Input::Empty
    }
}

impl<T> Input<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Input::Empty)
    }

    /// The parsed value, if any
    pub fn parsed(&self) -> Option<&T> {
        match self {
            Input::Parsed(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: Copy> Input<T> {
    pub fn value(&self) -> Option<T> {
        self.parsed().copied()
    }
}

impl NumberInput {
    /// Coerce UI text into a number. Blank text is `Empty`.
    pub fn number_from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Input::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Input::Parsed(n),
            _ => Input::Unparsed(trimmed.to_string()),
        }
    }
}

impl From<f64> for NumberInput {
    fn from(n: f64) -> Self {
        if n.is_finite() {
            Input::Parsed(n)
        } else {
            Input::Unparsed(n.to_string())
        }
    }
}

impl DateInput {
    /// Coerce UI text into a date via the date normalizer
    pub fn date_from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Input::Empty;
        }
        match date::parse(trimmed) {
            Some(d) => Input::Parsed(d),
            None => Input::Unparsed(trimmed.to_string()),
        }
    }
}

impl From<NaiveDate> for DateInput {
    fn from(d: NaiveDate) -> Self {
        Input::Parsed(d)
    }
}

/// Coerce a JSON value into a finite number.
///
/// Numbers pass through; numeric strings are parsed; everything else,
/// including `null`, booleans and non-numeric text, is absent.
pub fn number_from_json(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Coerce a JSON value into non-blank trimmed text
pub fn text_from_json(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
