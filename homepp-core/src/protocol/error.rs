use super::Radix;

pub type DecodeResult<T> = core::result::Result<T, DecodeError>;

/// Why a frame could not be decoded.
///
/// Either case discards the whole frame; callers never see a partial
/// reading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("not enough data: needed {needed} tokens, got {available}")]
    InsufficientTokens { needed: usize, available: usize },

    #[error("invalid format: token {index} ({token:?}) is not a base-{radix} integer")]
    InvalidEncoding {
        index: usize,
        token: String,
        radix: Radix,
    },
}
