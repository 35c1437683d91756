pub mod config;
pub mod emit;
pub mod http;
pub mod source;
pub mod state;

pub use config::{Config, EnvelopeConfig, ServerConfig, SourceConfig};
pub use emit::{EmitError, write_envelope};
pub use source::serial::{SerialReadingSource, SerialSourceError};
pub use source::synthetic::SyntheticReadingSource;
pub use source::{ReadingSource, SourcedReading};
pub use state::{ReaderState, ReaderStats};
