use std::io::{self, BufRead, BufReader};
use std::time::Duration;

use async_trait::async_trait;
use homepp_core::{Reading, decode_frame};
use serialport::SerialPort;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::{ReadingSource, SourcedReading};
use crate::state::ReaderState;

#[derive(Debug, thiserror::Error)]
pub enum SerialSourceError {
    #[error("Serial port error: {0}")]
    Port(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serial port closed")]
    Closed,
}

/// How a pass over an open port ended.
#[derive(Debug)]
pub enum PumpOutcome {
    Cancelled,
    ReceiverClosed,
    PortLost(SerialSourceError),
}

/// Reads newline-terminated frames from a serial port and decodes them.
#[derive(Clone)]
pub struct SerialReadingSource {
    port: String,
    baud_rate: u32,
    timeout: Duration,
    reopen_interval: Duration,
    state: ReaderState,
}

impl SerialReadingSource {
    pub fn new(
        port: impl Into<String>,
        baud_rate: u32,
        timeout_ms: u64,
        reopen_interval_secs: u64,
        state: ReaderState,
    ) -> Self {
        Self {
            port: port.into(),
            baud_rate,
            timeout: Duration::from_millis(timeout_ms),
            reopen_interval: Duration::from_secs(reopen_interval_secs),
            state,
        }
    }

    fn open(&self) -> Result<Box<dyn SerialPort>, SerialSourceError> {
        let port = serialport::new(&self.port, self.baud_rate)
            .timeout(self.timeout)
            .open()?;
        Ok(port)
    }

    /// Open, read until the port fails, wait, and open again.
    ///
    /// A broken port never ends the loop; only cancellation or a dropped
    /// receiver does.
    #[instrument(name = "serial_reader", skip_all, fields(port = %self.port, baud_rate = self.baud_rate))]
    fn run(
        &self,
        handle: Handle,
        tx: mpsc::Sender<SourcedReading>,
        cancel: CancellationToken,
    ) {
        while !cancel.is_cancelled() {
            let port = match self.open() {
                Ok(port) => port,
                Err(e) => {
                    error!(error = %e, "Error opening serial port");
                    self.state.record_io_error();
                    self.pause(&handle, &cancel);
                    continue;
                }
            };
            info!("Serial port opened");

            let mut reader = BufReader::new(port);
            match pump_lines(&mut reader, &tx, &self.state, &cancel) {
                PumpOutcome::Cancelled => break,
                PumpOutcome::ReceiverClosed => {
                    info!("Channel closed, serial reader shutting down");
                    return;
                }
                PumpOutcome::PortLost(e) => {
                    error!(error = %e, "Error reading sensor data");
                    self.state.record_io_error();
                    self.pause(&handle, &cancel);
                }
            }
        }

        info!("Serial reader shutting down");
    }

    fn pause(&self, handle: &Handle, cancel: &CancellationToken) {
        let reopen_interval = self.reopen_interval;
        handle.block_on(async {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(reopen_interval) => {}
            }
        });
    }
}

/// Read lines from an open port until it fails, the token is cancelled, or
/// the receiver goes away.
///
/// A read timeout is not a failure: any partial line is kept and reading
/// resumes after the cancellation check. Must run on a blocking thread.
pub fn pump_lines<R: BufRead>(
    reader: &mut R,
    tx: &mpsc::Sender<SourcedReading>,
    state: &ReaderState,
    cancel: &CancellationToken,
) -> PumpOutcome {
    let mut line = Vec::with_capacity(256);

    loop {
        if cancel.is_cancelled() {
            return PumpOutcome::Cancelled;
        }

        match reader.read_until(b'\n', &mut line) {
            Ok(0) => return PumpOutcome::PortLost(SerialSourceError::Closed),
            Ok(_) => {
                let decoded = decode_line(&line, state);
                line.clear();

                if let Some(reading) = decoded {
                    if tx.blocking_send(SourcedReading::anonymous(reading)).is_err() {
                        return PumpOutcome::ReceiverClosed;
                    }
                }
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
            Err(e) => return PumpOutcome::PortLost(e.into()),
        }
    }
}

/// Decode one raw line as received from the port.
///
/// Undecodable lines are logged, counted, and dropped.
pub fn decode_line(bytes: &[u8], state: &ReaderState) -> Option<Reading> {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Received line is not valid UTF-8");
            state.record_rejected();
            return None;
        }
    };

    match decode_frame(text) {
        Ok(reading) => {
            debug!(line = text.trim_end(), fields = reading.len(), "Decoded frame");
            state.record_decoded();
            Some(reading)
        }
        Err(e) => {
            warn!(error = %e, line = text.trim_end(), "Error decoding data");
            state.record_rejected();
            None
        }
    }
}

#[async_trait]
impl ReadingSource for SerialReadingSource {
    type Error = std::convert::Infallible;

    async fn start(
        &self,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<SourcedReading>, Self::Error> {
        let (tx, rx) = mpsc::channel(100);

        info!(
            port = %self.port,
            baud_rate = self.baud_rate,
            timeout_ms = self.timeout.as_millis() as u64,
            "Starting serial reading source"
        );

        let source = self.clone();
        let handle = Handle::current();

        tokio::task::spawn_blocking(move || source.run(handle, tx, cancel));

        Ok(rx)
    }
}
