use std::fmt;

/// Why a datagram did not yield a [`Sample`](super::sample::Sample).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Payload is not valid UTF-8.
    Encoding { valid_up_to: usize },
    /// Wrong number of comma-separated fields.
    FieldCount { expected: usize, actual: usize },
    /// Field at `field_index` is not a number.
    NumericFormat { field_index: usize, raw_value: String },
    /// Datagram is longer than the receive buffer; its tail was cut off.
    Oversized { limit: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ParseError::*;
        match self {
            Encoding { valid_up_to } => {
                write!(f, "payload is not UTF-8 (valid up to byte {valid_up_to})")
            }
            FieldCount { expected, actual } => {
                write!(f, "expected {expected} fields, got {actual}")
            }
            NumericFormat {
                field_index,
                raw_value,
            } => write!(f, "field {field_index} is not a number: {raw_value:?}"),
            Oversized { limit } => write!(f, "datagram exceeds {limit} bytes"),
        }
    }
}

impl std::error::Error for ParseError {}
