use std::time::Duration;

use crate::util;

crate::section! {
    #[serde(default)]
    pub struct Limits {
        /// Longest accepted gratitude or reason text, in characters
        pub max_entry_len: usize        = 1000,

        /// Longest accepted letter body, in characters
        pub max_letter_len: usize       = 1000,

        /// Longest accepted sender/recipient name, in characters
        pub max_name_len: usize         = 100,

        /// Credential attempts allowed per account within `auth_window`
        pub auth_attempts: usize        = 5 => "GRATIA_AUTH_ATTEMPTS" | util::parse[5usize],

        /// Sliding window for credential attempts
        #[serde(with = "crate::util::duration")]
        pub auth_window: Duration       = Duration::from_secs(15 * 60),

        /// Journal writes allowed per user within `write_window`
        pub write_requests: usize       = 10 => "GRATIA_WRITE_REQUESTS" | util::parse[10usize],

        /// Sliding window for journal writes
        #[serde(with = "crate::util::duration")]
        pub write_window: Duration      = Duration::from_secs(60),
    }
}
