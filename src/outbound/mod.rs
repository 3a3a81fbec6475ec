//! Hand-off of assembled payloads to the prediction caller

mod traits;
mod writer;

pub use traits::SubmissionSink;
pub use writer::JsonWriterSink;

#[cfg(test)]
pub use traits::MockSubmissionSink;
