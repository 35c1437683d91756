pub mod serial;
pub mod synthetic;

use async_trait::async_trait;
use homepp_core::Reading;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A reading together with whatever identity its source knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedReading {
    /// Sensor id, when the source can tell one. The serial bus cannot.
    pub sensor_id: Option<u32>,
    pub reading: Reading,
}

impl SourcedReading {
    pub fn anonymous(reading: Reading) -> Self {
        Self {
            sensor_id: None,
            reading,
        }
    }
}

/// Trait for producing sensor readings.
///
/// One implementation is picked at process start and injected into the
/// read loop. Implementations spawn background tasks that send readings
/// to an mpsc channel; the receiver is returned from `start`.
#[async_trait]
pub trait ReadingSource: Send + Sync + 'static {
    /// Error type for this source implementation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Start producing readings.
    ///
    /// The background tasks run until the cancellation token is cancelled
    /// or the returned receiver is dropped.
    async fn start(
        &self,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<SourcedReading>, Self::Error>;
}
