//! Sink that writes payloads as pretty JSON

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::Write;

use super::traits::SubmissionSink;
use crate::form::CanonicalPayload;

/// Writes each payload as a pretty-printed JSON document
pub struct JsonWriterSink<W> {
    writer: W,
}

impl<W: Write + Send> JsonWriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W: Write + Send> SubmissionSink for JsonWriterSink<W> {
    async fn deliver(&mut self, payload: &CanonicalPayload) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, payload)
            .context("Failed to serialize submission payload")?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        tracing::debug!("Submission payload written");
        Ok(())
    }
}
