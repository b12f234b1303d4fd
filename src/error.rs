/*! Crate-wide error type.

Only failures that should abort a frame or the whole process are
represented here. Reed-Solomon decode failure, ADS-B post-decode
validation rejection, and "not yet attempted" are sentinel/`Option`
outcomes internal to the recovery cascade (see [`crate::fisb`] and
[`crate::adsb`]), not exceptions.
*/

/// Error produced by the decoder or its CLI shell.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O failure reading the input stream or writing output/dumps.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The 30-byte attribute header didn't parse into the expected
    /// dot-separated fields.
    #[error("malformed attribute header: {0}")]
    MalformedAttributes(String),

    /// A Reed-Solomon codec was constructed with parameters that can't
    /// produce a valid code (e.g. `n <= k`, or `n - k` not even).
    #[error("invalid Reed-Solomon parameters: {0}")]
    RsConfig(String),

    /// A `--f6b` / `first_six_bytes` literal wasn't 12 hex digits.
    #[error("invalid first-six-bytes literal {0:?}: {1}")]
    InvalidPrefix(String, String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
