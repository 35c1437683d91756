mod error;
mod frame;
mod variant;

use tracing::error;

use crate::Reading;

pub use error::{DecodeError, DecodeResult};
pub use frame::{Discriminator, tokenize};
pub use variant::{
    FieldSpec, NumberMatch, Radix, TYPE_CHARGE_CONTROLLER, TYPE_ENVIRONMENT, TYPE_LEAK,
    TYPE_MODULE, TYPE_MODULE_LEAK, TYPE_RESERVED, VARIANTS, Variant,
};

// frame structure : type(1) + number(1) + variant-specific tokens

pub const DISCRIMINATOR_TOKENS: usize = 2;

/// Decode one raw line into a reading.
///
/// Types missing from the dispatch table are accepted and yield only the
/// discriminator fields.
pub fn decode_frame(line: &str) -> DecodeResult<Reading> {
    let tokens = tokenize(line);
    let discriminator = Discriminator::from_tokens(&tokens)?;

    let mut reading = Reading::with_discriminator(discriminator);

    let Some(variant) = Variant::lookup(discriminator) else {
        return Ok(reading);
    };

    for field in variant.fields {
        let value = frame::parse_token(&tokens, field.index, field.radix)?;
        reading.insert(field.name, value);
    }

    Ok(reading)
}

/// Decode one raw line, logging and discarding any error.
///
/// Returns an empty reading when the line cannot be decoded.
pub fn decode_frame_or_empty(line: &str) -> Reading {
    match decode_frame(line) {
        Ok(reading) => reading,
        Err(e) => {
            error!(error = %e, "Error decoding data");
            Reading::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a frame of `len` tokens with `0` filler and the given
    /// tokens placed at their indices.
    fn frame(len: usize, placed: &[(usize, &str)]) -> String {
        let mut tokens = vec!["0"; len];
        for &(index, token) in placed {
            tokens[index] = token;
        }
        tokens.join(" ")
    }

    fn environment_frame(len: usize) -> String {
        let mut placed = vec![(0, "12"), (1, "2")];
        let values = [
            (5, "1A"),
            (9, "2B"),
            (13, "3C8"),
            (17, "4D"),
            (21, "5E"),
            (25, "6F"),
            (29, "70"),
            (33, "81"),
            (35, "92"),
            (37, "A3"),
            (39, "1"),
            (41, "0"),
        ];
        placed.extend(values.into_iter().filter(|(i, _)| *i < len));
        frame(len, &placed)
    }

    #[test]
    fn test_charge_controller() {
        let reading = decode_frame("1 1 42").unwrap();

        assert_eq!(reading.len(), 3);
        assert_eq!(reading.sensor_type(), Some(1));
        assert_eq!(reading.number(), Some(1));
        assert_eq!(reading.get("charge"), Some(42));
    }

    #[test]
    fn test_charge_is_decimal() {
        let reading = decode_frame("1 1 10").unwrap();
        assert_eq!(reading.get("charge"), Some(10));

        assert!(matches!(
            decode_frame("1 1 1F"),
            Err(DecodeError::InvalidEncoding { index: 2, .. })
        ));
    }

    #[test]
    fn test_module_temperature_ignores_skipped_tokens() {
        let reading = decode_frame("2 1 x 1F trailing").unwrap();

        assert_eq!(reading.len(), 3);
        assert_eq!(reading.sensor_type(), Some(2));
        assert_eq!(reading.get("temperature_MK"), Some(31));
    }

    #[test]
    fn test_module_temperature_is_fourth_token() {
        assert!(matches!(
            decode_frame("2 1 x x 1F"),
            Err(DecodeError::InvalidEncoding { index: 3, .. })
        ));
    }

    #[test]
    fn test_leak_variants() {
        let line = frame(6, &[(0, "10"), (1, "3"), (5, "1")]);
        let reading = decode_frame(&line).unwrap();
        assert_eq!(reading.sensor_type(), Some(0x10));
        assert_eq!(reading.number(), Some(3));
        assert_eq!(reading.get("leak"), Some(1));

        let line = frame(6, &[(0, "11"), (1, "1"), (5, "0")]);
        let reading = decode_frame(&line).unwrap();
        assert_eq!(reading.sensor_type(), Some(0x11));
        assert_eq!(reading.get("leak"), Some(0));
    }

    #[test]
    fn test_environment_module() {
        let line = frame(
            18,
            &[(0, "12"), (1, "1"), (5, "FF"), (9, "10"), (13, "3E8"), (17, "a")],
        );
        let reading = decode_frame(&line).unwrap();

        assert_eq!(reading.len(), 6);
        assert_eq!(reading.get("temperature"), Some(255));
        assert_eq!(reading.get("humidity"), Some(16));
        assert_eq!(reading.get("pressure"), Some(1000));
        assert_eq!(reading.get("gas"), Some(10));
        assert!(!reading.contains("VOC"));
    }

    #[test]
    fn test_environment_full() {
        let reading = decode_frame(&environment_frame(42)).unwrap();

        assert_eq!(reading.len(), 14);
        assert_eq!(reading.get("temperature"), Some(0x1A));
        assert_eq!(reading.get("pressure"), Some(0x3C8));
        assert_eq!(reading.get("VOC"), Some(0x4D));
        assert_eq!(reading.get("gas3"), Some(0x70));
        assert_eq!(reading.get("pm25"), Some(0x92));
        assert_eq!(reading.get("pm10"), Some(0xA3));
        assert_eq!(reading.get("fire"), Some(1));
        assert_eq!(reading.get("smoke"), Some(0));
        assert!(!reading.contains("gas"));
    }

    #[test]
    fn test_truncated_environment_frame_is_rejected() {
        let line = environment_frame(20);

        assert_eq!(
            decode_frame(&line),
            Err(DecodeError::InsufficientTokens {
                needed: 22,
                available: 20,
            })
        );
        assert!(decode_frame_or_empty(&line).is_empty());
    }

    #[test]
    fn test_invalid_field_encoding_discards_frame() {
        let line = frame(18, &[(0, "12"), (1, "1"), (13, "zz")]);

        assert!(matches!(
            decode_frame(&line),
            Err(DecodeError::InvalidEncoding { index: 13, .. })
        ));
        assert!(decode_frame_or_empty(&line).is_empty());
    }

    #[test]
    fn test_invalid_discriminator() {
        assert!(decode_frame_or_empty("").is_empty());
        assert!(decode_frame_or_empty("12").is_empty());
        assert!(decode_frame_or_empty("zz 1 42").is_empty());
        assert!(decode_frame_or_empty("1 g 42").is_empty());

        assert_eq!(
            decode_frame("   "),
            Err(DecodeError::InsufficientTokens {
                needed: 2,
                available: 0,
            })
        );
    }

    #[test]
    fn test_unknown_type_keeps_discriminator_only() {
        let reading = decode_frame("FF 3 1 2 3 4 5 6").unwrap();

        assert_eq!(reading.len(), 2);
        assert_eq!(reading.sensor_type(), Some(255));
        assert_eq!(reading.number(), Some(3));
    }

    #[test]
    fn test_unknown_environment_number_keeps_discriminator_only() {
        let reading = decode_frame("12 7").unwrap();

        assert_eq!(reading.names().collect::<Vec<_>>(), vec!["number", "type"]);
    }

    #[test]
    fn test_reserved_type_has_no_fields() {
        let reading = decode_frame("0 5").unwrap();

        assert_eq!(reading.len(), 2);
        assert_eq!(reading.sensor_type(), Some(0));
        assert_eq!(reading.number(), Some(5));
    }

    #[test]
    fn test_decoding_is_repeatable() {
        let line = environment_frame(42);
        assert_eq!(decode_frame(&line), decode_frame(&line));
    }

    #[test]
    fn test_whitespace_runs() {
        let spaced = decode_frame("2 1 0 1F").unwrap();
        let messy = decode_frame("  2\t\t1   0 \t 1F\r\n").unwrap();

        assert_eq!(spaced, messy);
    }

    #[test]
    fn test_tokenize() {
        assert!(tokenize("").is_empty());
        assert_eq!(tokenize(" a\tb  c "), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_variant_lookup() {
        let env = Variant::lookup(Discriminator::new(TYPE_ENVIRONMENT, 2)).unwrap();
        assert_eq!(env.kind, "environment");
        assert_eq!(env.min_tokens(), 42);

        let charge = Variant::lookup(Discriminator::new(TYPE_CHARGE_CONTROLLER, 9)).unwrap();
        assert_eq!(charge.kind, "charge_controller");
        assert_eq!(charge.discriminator(), Discriminator::new(1, 1));

        assert!(Variant::lookup(Discriminator::new(TYPE_ENVIRONMENT, 3)).is_none());
        assert!(Variant::lookup(Discriminator::new(0xFF, 1)).is_none());
    }
}
