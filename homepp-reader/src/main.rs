use std::path::PathBuf;

use clap::Parser;
use homepp_core::CaptureTime;
use homepp_reader::{
    Config, EnvelopeConfig, ReaderState, ReadingSource, SerialReadingSource, SourceConfig,
    SourcedReading, SyntheticReadingSource, write_envelope,
};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "homepp-reader")]
#[command(about = "Homepp sensor bus reader")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "homepp-reader.toml")]
    config: PathBuf,

    /// Generate synthetic readings instead of reading the serial port
    #[arg(long)]
    synthetic: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "homepp_reader=info,homepp_core=info".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = if cli.config.exists() {
        info!(path = ?cli.config, "Loading configuration");
        Config::load(&cli.config)?
    } else {
        info!("No configuration file found, using defaults");
        Config::default()
    };

    if cli.synthetic {
        config.source = SourceConfig::synthetic();
    }

    info!(
        envelope_id = config.envelope.id,
        envelope_status = config.envelope.status,
        "Starting homepp-reader"
    );

    let state = ReaderState::new();

    match config.source.clone() {
        SourceConfig::Serial {
            port,
            baud_rate,
            timeout_ms,
            reopen_interval_secs,
        } => {
            info!(%port, baud_rate, "Using serial reading source");
            let source = SerialReadingSource::new(
                port,
                baud_rate,
                timeout_ms,
                reopen_interval_secs,
                state.clone(),
            );
            run_reader(source, config, state).await?;
        }
        SourceConfig::Synthetic {
            min_interval_secs,
            max_interval_secs,
            id_pool_size,
        } => {
            info!(
                min_interval_secs,
                max_interval_secs, id_pool_size, "Using synthetic reading source"
            );
            let source = SyntheticReadingSource::new(
                min_interval_secs,
                max_interval_secs,
                id_pool_size,
                state.clone(),
            );
            run_reader(source, config, state).await?;
        }
    }

    Ok(())
}

async fn run_reader<S: ReadingSource>(
    source: S,
    config: Config,
    state: ReaderState,
) -> color_eyre::Result<()> {
    let cancel = CancellationToken::new();

    let rx = source.start(cancel.clone()).await?;

    let envelope = config.envelope;
    let cancel_for_emitter = cancel.clone();
    let emitter_handle = tokio::spawn(async move {
        run_emitter(rx, envelope, cancel_for_emitter).await;
    });

    let http_handle = match config.server {
        Some(server) => {
            let listener = TcpListener::bind(server.http_addr).await?;
            info!(http_addr = %server.http_addr, "HTTP server listening");

            let app = homepp_reader::http::router(state.clone());
            let cancel_for_http = cancel.clone();
            Some(tokio::spawn(async move {
                let result = axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        cancel_for_http.cancelled().await;
                    })
                    .await;
                if let Err(e) = result {
                    error!(error = ?e, "HTTP server error");
                }
                info!("HTTP server shut down");
            }))
        }
        None => None,
    };

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl+C, shutting down...");
    cancel.cancel();

    let _ = emitter_handle.await;
    if let Some(handle) = http_handle {
        let _ = handle.await;
    }

    let stats = state.snapshot();
    info!(
        frames_decoded = stats.frames_decoded,
        frames_rejected = stats.frames_rejected,
        io_errors = stats.io_errors,
        "homepp-reader shut down complete"
    );
    Ok(())
}

async fn run_emitter(
    mut rx: mpsc::Receiver<SourcedReading>,
    envelope: EnvelopeConfig,
    cancel: CancellationToken,
) {
    info!("Envelope emitter started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Envelope emitter shutting down");
                break;
            }
            received = rx.recv() => {
                let Some(sourced) = received else {
                    info!("Reading source closed, emitter shutting down");
                    break;
                };

                let wrapped = envelope.wrap(&sourced, CaptureTime::now());
                let result = {
                    let mut stdout = std::io::stdout().lock();
                    write_envelope(&mut stdout, &wrapped)
                };
                match result {
                    Ok(()) => {
                        info!(
                            id = wrapped.id,
                            sensor_type = ?wrapped.sensor_type,
                            number = ?wrapped.number,
                            "Emitted sensor reading"
                        );
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to emit envelope");
                    }
                }
            }
        }
    }
}
