use std::io::Write;

use homepp_core::{CaptureTime, Envelope};

use crate::config::EnvelopeConfig;
use crate::source::SourcedReading;

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("Failed to serialize envelope: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EnvelopeConfig {
    /// Wrap a reading for transport, filling in placeholder identity.
    pub fn wrap(&self, sourced: &SourcedReading, data: CaptureTime) -> Envelope {
        Envelope::build(
            &sourced.reading,
            sourced.sensor_id.unwrap_or(self.id),
            self.status,
            data,
        )
    }
}

/// Write one envelope as a single JSON line.
pub fn write_envelope<W: Write>(out: &mut W, envelope: &Envelope) -> Result<(), EmitError> {
    serde_json::to_writer(&mut *out, envelope)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
