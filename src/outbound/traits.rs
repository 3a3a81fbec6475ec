//! Trait abstraction for payload sinks to enable mocking in tests

use anyhow::Result;
use async_trait::async_trait;

use crate::form::CanonicalPayload;

/// Receiver of a complete, validated payload
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionSink: Send {
    /// Deliver `payload`; only called once the form passed its completeness gate
    async fn deliver(&mut self, payload: &CanonicalPayload) -> Result<()>;
}
