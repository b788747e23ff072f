use smol_str::SmolStr;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid Email Address")]
    InvalidEmail,

    #[error("Invalid Password")]
    InvalidPassword,

    #[error("Not Signed In")]
    NoSession,

    #[error("Too Many Attempts")]
    RateLimited,

    /// The provider refused the request (bad credentials, revoked token, etc.)
    #[error("Rejected ({status}): {message}")]
    Rejected {
        status: reqwest::StatusCode,
        message: SmolStr,
    },

    #[error("Request Error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Json Parse Error: {0}")]
    JsonParseError(#[from] serde_json::Error),
}

impl Error {
    /// Errors that indicate something broke, rather than the provider
    /// declining or the caller passing bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::RequestError(_) | Error::JsonParseError(_))
    }
}
