use std::borrow::Cow;

use session::Error as SessionError;
use store::Error as StoreError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not Signed In")]
    NoSession,

    #[error("Too Many Requests")]
    RateLimited,

    #[error("Nothing To Record")]
    EmptyEntry,

    #[error("Too Many Gratitudes")]
    TooManyItems,

    #[error("Missing {0}")]
    MissingField(&'static str),

    #[error("{0} Too Long")]
    TooLong(&'static str),

    #[error("Invalid Email Address")]
    InvalidEmail,

    #[error("Passwords Do Not Match")]
    PasswordMismatch,

    #[error("Session Error: {0}")]
    Session(#[from] SessionError),

    #[error("Store Error: {0}")]
    Store(#[from] StoreError),
}

impl Error {
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Session(err) => err.is_fatal(),
            Error::Store(err) => err.is_fatal(),
            _ => false,
        }
    }

    /// Short text suitable for showing to the user. Fatal errors collapse
    /// to a generic message; the details stay in the logs.
    pub fn user_message(&self) -> Cow<'static, str> {
        'msg: {
            Cow::Borrowed(match self {
                _ if self.is_fatal() => "Something went wrong, please try again",
                Error::NoSession => "You need to be signed in to do that",
                Error::RateLimited => "Too many requests, give it a moment",
                Error::EmptyEntry => "Write at least one gratitude first",
                Error::Store(StoreError::Unauthorized) => "Your session has expired, sign in again",
                _ => break 'msg self.to_string().into(),
            })
        }
    }
}
