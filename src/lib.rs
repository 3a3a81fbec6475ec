//! PAX form engine
//!
//! Client-side core of the PAX insurance application form: field
//! validation, OCR prefill reconciliation, deduplicated error
//! notifications and assembly of the prediction payload.

pub mod config;
pub mod form;
pub mod notify;
pub mod outbound;
pub mod session;

pub use config::FormConfig;
pub use session::FormSession;
