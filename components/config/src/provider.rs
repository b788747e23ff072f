use std::time::Duration;

use crate::util;

crate::section! {
    #[serde(default)]
    pub struct Provider {
        /// Base URL of the hosted backend, e.g. `https://myproject.supabase.co`
        pub base_url: String = "http://localhost:54321".to_owned() => "GRATIA_PROVIDER_URL",

        /// Publishable API key sent with every provider request
        pub api_key: String = String::default() => "GRATIA_PROVIDER_KEY",

        /// Overall timeout for a single provider request
        ///
        /// Can be parsed from plain seconds, an array of `[seconds, nanoseconds]`,
        /// or a human-readable string such as `"10s"`
        #[serde(with = "crate::util::duration")]
        pub timeout: Duration = Duration::from_secs(10) => "GRATIA_PROVIDER_TIMEOUT" | util::parse_duration[Duration::from_secs(10)],
    }
}
