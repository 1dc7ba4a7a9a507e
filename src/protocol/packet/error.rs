use thiserror::Error;

/// Errors that may occur while decoding encapsulated packets or their fields.
///
/// This type is kept small and generic so it can be shared by all
/// `RaknetEncodable` implementations and both packet codecs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer did not contain enough bytes to decode the requested value.
    #[error("Truncated input, not enough bytes to read requested field.")]
    TruncatedInput,

    /// A reliability ordinal outside the defined enumeration.
    #[error("An unknown reliability value was provided. Reliability byte: {0}")]
    InvalidReliability(u8),

    /// The declared payload length runs past the end of the buffer.
    #[error("Declared payload of {declared} bytes exceeds the {remaining} bytes remaining.")]
    InvalidLength { declared: usize, remaining: usize },
}
