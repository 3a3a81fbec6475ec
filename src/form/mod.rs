//! Form domain layer
//!
//! Pure functions over form state snapshots: date handling, coercion,
//! validation, prefill reconciliation and payload assembly.

pub mod date;
mod input;
mod messages;
mod prefill;
mod submission;
mod types;
mod validators;

pub use date::{Clock, FixedClock, SystemClock};
pub use input::{number_from_json, text_from_json, DateInput, Input, NumberInput};
pub use messages::{DefaultMessages, MessageLookup};
pub use prefill::{
    reconcile_from_slot, reconcile_prefill, FileSlot, MemorySlot, PrefillOutcome, PrefillPayload,
    PrefillSlot,
};
pub use submission::{assemble_submission, is_complete, CanonicalPayload, SubmissionError};
pub use types::{
    ErrorId, FieldName, FormFieldState, SmokeStatus, SportEntry, SportLevel, SportList,
    SportListError, UnknownField, ValidationError,
};
pub use validators::Validators;
