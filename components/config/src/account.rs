use std::{ops::Range, time::Duration};

crate::section! {
    #[serde(default)]
    pub struct Account {
        /// Accepted password length for signup and password changes
        #[serde(with = "crate::util::range")]
        pub password_len: Range<usize>      = 6..9999,

        /// How close to expiry the cached session token must be before
        /// the background task refreshes it
        ///
        /// Can be parsed from plain seconds or an array of `[seconds, nanoseconds]`
        #[serde(with = "crate::util::duration")]
        pub refresh_margin: Duration        = Duration::from_secs(60),
    }
}
