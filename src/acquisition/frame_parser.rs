//! Text frame decoding: `"12.50, 33.10, 60.00, 0.02"` into a [`Sample`].

use super::{
    parse_error::ParseError,
    sample::{CHANNEL_COUNT, Sample},
};

/// Field separator of the wire format.
pub const FIELD_SEPARATOR: char = ',';

/// Decodes one datagram payload.
///
/// The payload must be UTF-8 holding exactly [`CHANNEL_COUNT`] comma-separated
/// decimal numbers; whitespace around each field is ignored. Pure and
/// deterministic.
///
/// # Errors
/// - [`ParseError::Encoding`] if the payload is not UTF-8.
/// - [`ParseError::FieldCount`] if there are not exactly four fields.
/// - [`ParseError::NumericFormat`] naming the first field that is not a number.
pub fn parse(raw: &[u8]) -> Result<Sample, ParseError> {
    let text = std::str::from_utf8(raw).map_err(|e| ParseError::Encoding {
        valid_up_to: e.valid_up_to(),
    })?;

    let actual = text.split(FIELD_SEPARATOR).count();
    if actual != CHANNEL_COUNT {
        return Err(ParseError::FieldCount {
            expected: CHANNEL_COUNT,
            actual,
        });
    }

    let mut values = [0.0_f64; CHANNEL_COUNT];
    for (field_index, (slot, field)) in values
        .iter_mut()
        .zip(text.split(FIELD_SEPARATOR).map(str::trim))
        .enumerate()
    {
        *slot = field.parse().map_err(|_| ParseError::NumericFormat {
            field_index,
            raw_value: field.to_string(),
        })?;
    }

    Ok(Sample::new(values))
}

/// Like [`parse`], for a payload read into a buffer one byte larger than
/// `limit`: anything longer than `limit` was truncated by the transport and
/// is rejected whole instead of being parsed from its prefix.
///
/// # Errors
/// [`ParseError::Oversized`] for a payload above `limit`, otherwise as [`parse`].
pub fn parse_datagram(raw: &[u8], limit: usize) -> Result<Sample, ParseError> {
    if raw.len() > limit {
        return Err(ParseError::Oversized { limit });
    }
    parse(raw)
}
