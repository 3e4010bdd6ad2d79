use thiserror::Error;

/// Errors returned by the generator and the codec.
#[derive(Error, Debug)]
pub enum Error {
    /// The timestamp does not fit in the 48-bit timestamp field.
    #[error("uulid: time greater than supported by the ulid spec")]
    TimestampTooLarge,

    /// The input to decode is not 16, 32 or 36 bytes long, or an entropy slice is not 10 bytes.
    #[error("uulid: bad data size when parsing")]
    BadDataSize,

    /// The output buffer does not match the size of the target encoding.
    #[error("uulid: bad buffer size when marshaling")]
    BadBufferSize,

    /// The value handed to [`Uulid::scan`](crate::Uulid::scan) is neither text nor bytes.
    #[error("uulid: invalid type to unmarshal")]
    InvalidSourceType,

    /// The 80-bit entropy counter ran out of values within a single millisecond.
    #[error("uulid: monotonic overflow")]
    EntropyExhausted,

    /// The clock reported a millisecond earlier than the one last used by the generator.
    #[error("uulid: time {now} is lower than the last generated {last}")]
    ClockWentBackward { last: u64, now: u64 },

    #[error("uulid: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// The operating system could not provide a secure seed.
    #[error("uulid: could not obtain a secure seed: {0}")]
    SeedUnavailable(#[from] rand::Error),
}
