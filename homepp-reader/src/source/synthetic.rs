use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use homepp_core::{Reading, VARIANTS, Variant};
use rand::Rng;
use rand::seq::IndexedRandom;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{ReadingSource, SourcedReading};
use crate::state::ReaderState;

/// Fake sensor ids are drawn from this range.
const ID_RANGE_END: usize = 100;
/// Generated field values fall in `0..=MAX_FIELD_VALUE`.
pub const MAX_FIELD_VALUE: i64 = 100;

/// Reading source that makes up plausible readings without hardware.
///
/// Readings follow the decoder's variant table, so consumers cannot tell
/// them apart from decoded frames by shape.
#[derive(Clone)]
pub struct SyntheticReadingSource {
    min_interval_secs: u64,
    max_interval_secs: u64,
    /// Pre-drawn sensor ids, distinct, from `1..100`.
    ids: Arc<[u32]>,
    state: ReaderState,
}

impl SyntheticReadingSource {
    pub fn new(
        min_interval_secs: u64,
        max_interval_secs: u64,
        id_pool_size: usize,
        state: ReaderState,
    ) -> Self {
        let mut rng = rand::rng();
        let amount = id_pool_size.clamp(1, ID_RANGE_END - 1);
        let ids = rand::seq::index::sample(&mut rng, ID_RANGE_END - 1, amount)
            .into_iter()
            .map(|i| i as u32 + 1)
            .collect();

        Self {
            min_interval_secs: min_interval_secs.min(max_interval_secs),
            max_interval_secs: max_interval_secs.max(min_interval_secs),
            ids,
            state,
        }
    }

    pub fn id_pool(&self) -> &[u32] {
        &self.ids
    }

    /// Produce one reading for a random non-reserved variant.
    pub fn generate(&self) -> SourcedReading {
        let mut rng = rand::rng();

        let variants: Vec<&Variant> = VARIANTS.iter().filter(|v| !v.fields.is_empty()).collect();
        let reading = match variants.choose(&mut rng) {
            Some(variant) => generate_reading(variant, &mut rng),
            None => Reading::default(),
        };

        SourcedReading {
            sensor_id: self.ids.choose(&mut rng).copied(),
            reading,
        }
    }

    fn next_delay(&self) -> Duration {
        let secs = rand::rng().random_range(self.min_interval_secs..=self.max_interval_secs);
        Duration::from_secs(secs)
    }
}

/// Fill every field of `variant` with a random value.
pub fn generate_reading<R: Rng + ?Sized>(variant: &Variant, rng: &mut R) -> Reading {
    let mut reading = Reading::with_discriminator(variant.discriminator());
    for field in variant.fields {
        reading.insert(field.name, rng.random_range(0..=MAX_FIELD_VALUE));
    }
    reading
}

#[async_trait]
impl ReadingSource for SyntheticReadingSource {
    type Error = std::convert::Infallible;

    async fn start(
        &self,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<SourcedReading>, Self::Error> {
        let (tx, rx) = mpsc::channel(100);

        info!(
            id_pool_size = self.ids.len(),
            min_interval_secs = self.min_interval_secs,
            max_interval_secs = self.max_interval_secs,
            "Starting synthetic reading source"
        );

        let source = self.clone();

        tokio::spawn(async move {
            loop {
                let delay = source.next_delay();

                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("Synthetic reading generator shutting down");
                        break;
                    }
                    _ = tokio::time::sleep(delay) => {
                        let sourced = source.generate();
                        debug!(
                            sensor_id = ?sourced.sensor_id,
                            sensor_type = ?sourced.reading.sensor_type(),
                            "Generated synthetic reading"
                        );
                        source.state.record_decoded();

                        if tx.send(sourced).await.is_err() {
                            info!("Channel closed, synthetic generator shutting down");
                            return;
                        }
                    }
                }
            }
        });

        Ok(rx)
    }
}
