use super::error::{DecodeError, DecodeResult};
use super::{DISCRIMINATOR_TOKENS, Radix};

/// Split a raw line into tokens on runs of whitespace.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Parse the token at `index` in the given radix.
pub(crate) fn parse_token(tokens: &[&str], index: usize, radix: Radix) -> DecodeResult<i64> {
    let token = tokens
        .get(index)
        .ok_or(DecodeError::InsufficientTokens {
            needed: index + 1,
            available: tokens.len(),
        })?;

    i64::from_str_radix(token, radix.base()).map_err(|_| DecodeError::InvalidEncoding {
        index,
        token: (*token).to_owned(),
        radix,
    })
}

/// The two leading tokens of every frame, both hexadecimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Discriminator {
    /// Sensor category (token 0).
    pub sensor_type: i64,
    /// Sub-variant within a category (token 1).
    pub number: i64,
}

impl Discriminator {
    pub fn new(sensor_type: i64, number: i64) -> Self {
        Self {
            sensor_type,
            number,
        }
    }

    pub fn from_tokens(tokens: &[&str]) -> DecodeResult<Self> {
        if tokens.len() < DISCRIMINATOR_TOKENS {
            return Err(DecodeError::InsufficientTokens {
                needed: DISCRIMINATOR_TOKENS,
                available: tokens.len(),
            });
        }

        Ok(Self {
            sensor_type: parse_token(tokens, 0, Radix::Hex)?,
            number: parse_token(tokens, 1, Radix::Hex)?,
        })
    }
}
