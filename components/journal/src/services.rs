use std::time::Duration;

use reqwest::{Client, Error as ReqwestError};

/// Shared HTTP client for every call to the hosted provider.
pub fn create_service_client(timeout: Duration) -> Result<Client, ReqwestError> {
    reqwest::ClientBuilder::new()
        .user_agent("Gratia/1.0 (gratitude journal core)")
        .gzip(true)
        .deflate(true)
        .redirect(reqwest::redirect::Policy::limited(1))
        .connect_timeout(Duration::from_secs(10))
        .timeout(timeout)
        .danger_accept_invalid_certs(false)
        .http2_adaptive_window(true)
        .build()
}
