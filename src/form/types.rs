//! Form domain types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::input::{DateInput, NumberInput};

/// Logical form fields that carry a validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldName {
    FirstName,
    LastName,
    Smoke,
    CigarettesPerDay,
    Height,
    Weight,
    DateOfBirth,
    InsurancePrice,
}

impl FieldName {
    /// All validated fields in form order
    pub const ALL: [FieldName; 8] = [
        FieldName::FirstName,
        FieldName::LastName,
        FieldName::Smoke,
        FieldName::CigarettesPerDay,
        FieldName::Height,
        FieldName::Weight,
        FieldName::DateOfBirth,
        FieldName::InsurancePrice,
    ];

    /// Identifier used for inline errors and notification ids
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Smoke => "smoke",
            Self::CigarettesPerDay => "cigarettesPerDay",
            Self::Height => "height",
            Self::Weight => "weight",
            Self::DateOfBirth => "dob",
            Self::InsurancePrice => "insurancePrice",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field `{0}`")]
pub struct UnknownField(pub String);

/// Answer to the "do you smoke" question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmokeStatus {
    Yes,
    No,
}

impl SmokeStatus {
    /// Accepts exactly `yes` or `no`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            _ => None,
        }
    }

    pub fn from_flag(smokes: bool) -> Self {
        if smokes {
            Self::Yes
        } else {
            Self::No
        }
    }

    pub fn is_smoker(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

/// Practice level for a sport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SportLevel {
    #[default]
    Hobby,
    Competitive,
}

impl SportLevel {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hobby" => Some(Self::Hobby),
            "competitive" => Some(Self::Competitive),
            _ => None,
        }
    }
}

/// One row in the sports section
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SportEntry {
    pub name: String,
    pub level: SportLevel,
}

impl SportEntry {
    pub fn new(name: impl Into<String>, level: SportLevel) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }

    pub fn hobby(name: impl Into<String>) -> Self {
        Self::new(name, SportLevel::Hobby)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SportListError {
    #[error("the last sport entry cannot be removed")]
    LastEntry,
    #[error("sport index {index} is out of range (len {len})")]
    OutOfRange { index: usize, len: usize },
}

/// Ordered sports rows, never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SportList(Vec<SportEntry>);

impl SportList {
    /// A single blank hobby row
    pub fn new() -> Self {
        Self(vec![SportEntry::default()])
    }

    /// Build from entries; `None` when `entries` is empty
    pub fn from_entries(entries: Vec<SportEntry>) -> Option<Self> {
        if entries.is_empty() {
            None
        } else {
            Some(Self(entries))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, the list keeps at least one row
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &SportEntry> {
        self.0.iter()
    }

    pub fn get(&self, index: usize) -> Option<&SportEntry> {
        self.0.get(index)
    }

    /// Append a blank hobby row
    pub fn push_blank(&mut self) {
        self.0.push(SportEntry::default());
    }

    pub fn push(&mut self, entry: SportEntry) {
        self.0.push(entry);
    }

    /// Remove a row, refusing to remove the last one
    pub fn remove(&mut self, index: usize) -> Result<SportEntry, SportListError> {
        let len = self.0.len();
        if index >= len {
            return Err(SportListError::OutOfRange { index, len });
        }
        if len == 1 {
            return Err(SportListError::LastEntry);
        }
        Ok(self.0.remove(index))
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut SportEntry, SportListError> {
        let len = self.0.len();
        self.0
            .get_mut(index)
            .ok_or(SportListError::OutOfRange { index, len })
    }
}

impl Default for SportList {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of every form field as entered
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormFieldState {
    pub first_name: String,
    pub last_name: String,
    pub smoke: Option<SmokeStatus>,
    pub cigarettes_per_day: NumberInput,
    pub height_cm: NumberInput,
    pub weight_kg: NumberInput,
    pub date_of_birth: DateInput,
    pub sports: SportList,
    pub insurance_price: NumberInput,
}

impl FormFieldState {
    pub fn is_smoker(&self) -> bool {
        self.smoke.is_some_and(|s| s.is_smoker())
    }
}

/// Stable notification id for a field's validation error
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorId(String);

impl ErrorId {
    pub fn for_field(field: FieldName) -> Self {
        Self(format!("err:{}", field.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ErrorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A failed field validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: FieldName,
    pub message: String,
    pub error_id: ErrorId,
}

impl ValidationError {
    pub fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
            error_id: ErrorId::for_field(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod field_name {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_round_trips_through_str() {
            for field in FieldName::ALL {
                assert_eq!(field.as_str().parse::<FieldName>(), Ok(field));
            }
        }

        #[test]
        fn test_unknown_field() {
            assert_eq!(
                "shoeSize".parse::<FieldName>(),
                Err(UnknownField("shoeSize".to_string()))
            );
        }

        #[test]
        fn test_error_id_is_stable() {
            assert_eq!(ErrorId::for_field(FieldName::FirstName).as_str(), "err:firstName");
            assert_eq!(
                ErrorId::for_field(FieldName::DateOfBirth),
                ErrorId::for_field(FieldName::DateOfBirth)
            );
        }
    }

    mod smoke_status {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_parse_is_exact() {
            assert_eq!(SmokeStatus::parse("yes"), Some(SmokeStatus::Yes));
            assert_eq!(SmokeStatus::parse("no"), Some(SmokeStatus::No));
            assert_eq!(SmokeStatus::parse("Yes"), None);
            assert_eq!(SmokeStatus::parse("maybe"), None);
        }

        #[test]
        fn test_unset_is_not_smoker() {
            let state = FormFieldState::default();
            assert!(!state.is_smoker());
        }
    }

    mod sport_list {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_new_has_one_blank_hobby_row() {
            let list = SportList::new();
            assert_eq!(list.len(), 1);
            assert_eq!(list.get(0), Some(&SportEntry::hobby("")));
        }

        #[test]
        fn test_cannot_remove_last_entry() {
            let mut list = SportList::new();
            assert_eq!(list.remove(0), Err(SportListError::LastEntry));
            assert_eq!(list.len(), 1);
        }

        #[test]
        fn test_remove_out_of_range() {
            let mut list = SportList::new();
            list.push_blank();
            assert_eq!(
                list.remove(5),
                Err(SportListError::OutOfRange { index: 5, len: 2 })
            );
        }

        #[test]
        fn test_remove_keeps_order() {
            let mut list = SportList::from_entries(vec![
                SportEntry::hobby("Running"),
                SportEntry::hobby("Chess"),
                SportEntry::new("Rugby", SportLevel::Competitive),
            ])
            .unwrap();
            let removed = list.remove(1).unwrap();
            assert_eq!(removed.name, "Chess");
            let names: Vec<_> = list.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names, vec!["Running", "Rugby"]);
        }

        #[test]
        fn test_from_entries_rejects_empty() {
            assert!(SportList::from_entries(Vec::new()).is_none());
        }

        #[test]
        fn test_level_parse() {
            assert_eq!(SportLevel::parse("Competitive"), Some(SportLevel::Competitive));
            assert_eq!(SportLevel::parse("hobby"), Some(SportLevel::Hobby));
            assert_eq!(SportLevel::parse("pro"), None);
        }
    }
}
