use thiserror::Error;

/// The ciphertext file does not have the fixed `nonce | tag` header.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("ciphertext file too short: {len} bytes, expected at least {min}")]
    TooShort { len: usize, min: usize },
}

/// Invalid search window parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("number of days to search must be at least 1")]
    Empty,

    #[error("search window starting at {start} spanning {num_days} days overflows")]
    Overflow { start: i64, num_days: u32 },
}

/// User supplied input that could not be understood.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputParseError {
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}
