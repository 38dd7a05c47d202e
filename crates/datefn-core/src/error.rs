use thiserror::Error;

/// Errors surfaced through the hard-failure channel.
///
/// These must reach the SQL caller as query errors, never as NULL results;
/// NULL is reserved for the "could not parse" channel.
#[derive(Error, Debug)]
pub enum DatefnError {
    #[error("Too many results: more than {limit} items for {input:?}")]
    TooManyResults { limit: usize, input: String },

    #[error("Invalid recurrence rule {input:?}: {message}")]
    InvalidRule { input: String, message: String },

    #[error("Could not parse {input:?} as a date")]
    UnparseableDate { input: String },

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

pub type DatefnResult<T> = std::result::Result<T, DatefnError>;
