//! Typed client for the hosted row store (`/rest/v1/{table}`).
//!
//! Writes send the row as JSON and ask for the stored representation back;
//! reads compile a [`RowFilter`] into the store's query operators. Every
//! request carries the publishable API key and the caller's access token.

#[macro_use]
extern crate serde;

extern crate tracing as log;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use smol_str::SmolStr;
use timestamp::Timestamp;

use schema::UserId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The access token was missing, malformed, or expired.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Store Rejected ({status}): {message}")]
    Rejected { status: StatusCode, message: SmolStr },

    #[error("Missing Representation in Store Response")]
    MissingRepresentation,

    #[error("Request Error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON Parse Error: {0}")]
    JsonParseError(#[from] serde_json::Error),
}

impl Error {
    /// Errors that indicate something broke, rather than the store
    /// declining the request.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::MissingRepresentation | Error::RequestError(_) | Error::JsonParseError(_)
        )
    }
}

/// Error body shapes the store is known to produce.
#[derive(Debug, Deserialize)]
struct RawStoreError {
    #[serde(default)]
    message: Option<SmolStr>,
    #[serde(default)]
    msg: Option<SmolStr>,
    #[serde(default)]
    error_description: Option<SmolStr>,
    #[serde(default)]
    error: Option<SmolStr>,
}

impl RawStoreError {
    fn into_message(self) -> SmolStr {
        None.or(self.message)
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
            .unwrap_or_else(|| SmolStr::new_inline("unknown error"))
    }
}

fn reject(status: StatusCode, body: &[u8]) -> Error {
    if status == StatusCode::UNAUTHORIZED {
        return Error::Unauthorized;
    }

    let message = match serde_json::from_slice::<RawStoreError>(body) {
        Ok(raw) => raw.into_message(),
        Err(_) => SmolStr::new_inline("unknown error"),
    };

    Error::Rejected { status, message }
}

/// Row filter, compiled to the store's query operators.
///
/// Reads are always scoped to an owning user; `since`/`until` bound
/// `created_at` as a half-open range.
#[derive(Debug, Clone, Copy, Default)]
#[must_use]
pub struct RowFilter {
    user_id: Option<UserId>,
    since: Option<Timestamp>,
    until: Option<Timestamp>,
    limit: Option<usize>,
}

impl RowFilter {
    pub fn new() -> RowFilter {
        RowFilter::default()
    }

    pub const fn user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Rows created at or after this instant.
    pub const fn since(mut self, since: Timestamp) -> Self {
        self.since = Some(since);
        self
    }

    /// Rows created strictly before this instant.
    pub const fn until(mut self, until: Timestamp) -> Self {
        self.until = Some(until);
        self
    }

    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(5);

        if let Some(user_id) = self.user_id {
            query.push(("user_id", format!("eq.{user_id}")));
        }

        if let Some(since) = self.since {
            query.push(("created_at", format!("gte.{}", since.format())));
        }

        if let Some(until) = self.until {
            query.push(("created_at", format!("lt.{}", until.format())));
        }

        query.push(("order", "created_at.desc".to_owned()));

        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }

        query
    }
}

pub struct RestClient {
    client: Client,
    base: String,
    api_key: String,
}

impl RestClient {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> RestClient {
        RestClient {
            client,
            base: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
        }
    }

    /// Inserts a row and decodes the stored representation.
    pub async fn insert<T, R>(&self, table: &str, access_token: &str, row: &T) -> Result<R, Error>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        log::debug!("Inserting row into {table}");

        let res = self
            .client
            .post(format!("{}/rest/v1/{table}", self.base))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;

        let status = res.status();
        let full = res.bytes().await?;

        if !status.is_success() {
            return Err(reject(status, &full));
        }

        // the representation comes back as a one-element array
        let mut rows: Vec<R> = serde_json::from_slice(&full)?;

        match rows.pop() {
            Some(row) => Ok(row),
            None => Err(Error::MissingRepresentation),
        }
    }

    /// Selects rows matching the filter, newest first.
    pub async fn select<R>(&self, table: &str, access_token: &str, filter: RowFilter) -> Result<Vec<R>, Error>
    where
        R: DeserializeOwned,
    {
        log::debug!("Selecting rows from {table}");

        let res = self
            .client
            .get(format!("{}/rest/v1/{table}", self.base))
            .query(&filter.query())
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = res.status();
        let full = res.bytes().await?;

        if !status.is_success() {
            return Err(reject(status, &full));
        }

        Ok(serde_json::from_slice(&full)?)
    }
}
