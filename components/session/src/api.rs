use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use smol_str::SmolStr;

use schema::{Session, User};

use crate::Error;

/// Low-level client for the auth provider's REST endpoints.
///
/// Every request carries the project `apikey` header; token-scoped calls
/// additionally carry the session's access token as a bearer. Responses are
/// checked for their status before decoding, so provider rejections surface
/// as [`Error::Rejected`] with the provider's own message.
#[derive(Clone)]
pub struct AuthApi {
    client: reqwest::Client,
    base: String,
    api_key: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct Recover<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct UserUpdate<'a> {
    password: &'a str,
}

/// What `/signup` answers depends on the project's email-confirmation
/// setting, so both shapes are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    /// Auto-confirm is on and the account is immediately usable.
    Session(Session),
    /// A confirmation email went out first.
    Pending(User),
}

impl AuthApi {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        AuthApi {
            client,
            base: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
        }
    }

    pub async fn password_grant(&self, email: &str, password: &str) -> Result<Session, Error> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base);

        let mut session: Session = self
            .request(self.client.post(url).json(&Credentials { email, password }))
            .await?;

        session.fill_expiry();

        Ok(session)
    }

    pub async fn refresh_grant(&self, refresh_token: &str) -> Result<Session, Error> {
        let url = format!("{}/auth/v1/token?grant_type=refresh_token", self.base);

        let mut session: Session = self
            .request(self.client.post(url).json(&RefreshGrant { refresh_token }))
            .await?;

        session.fill_expiry();

        Ok(session)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResponse, Error> {
        let url = format!("{}/auth/v1/signup", self.base);

        let mut res: SignUpResponse = self
            .request(self.client.post(url).json(&Credentials { email, password }))
            .await?;

        if let SignUpResponse::Session(ref mut session) = res {
            session.fill_expiry();
        }

        Ok(res)
    }

    /// Revokes the session server-side.
    pub async fn logout(&self, access_token: &str) -> Result<(), Error> {
        let url = format!("{}/auth/v1/logout", self.base);

        self.execute(self.client.post(url).bearer_auth(access_token)).await
    }

    /// Asks the provider to email a password-recovery link.
    pub async fn recover(&self, email: &str) -> Result<(), Error> {
        let url = format!("{}/auth/v1/recover", self.base);

        self.execute(self.client.post(url).json(&Recover { email })).await
    }

    pub async fn update_password(&self, access_token: &str, password: &str) -> Result<(), Error> {
        let url = format!("{}/auth/v1/user", self.base);

        self.execute(
            self.client
                .put(url)
                .bearer_auth(access_token)
                .json(&UserUpdate { password }),
        )
        .await
    }

    async fn request<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T, Error> {
        let resp = req.header("apikey", &self.api_key).send().await?;

        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            return Err(reject(status, &body));
        }

        Ok(serde_json::from_slice(&body)?)
    }

    /// Like [`Self::request`] for endpoints whose success body carries
    /// nothing worth decoding.
    async fn execute(&self, req: reqwest::RequestBuilder) -> Result<(), Error> {
        let resp = req.header("apikey", &self.api_key).send().await?;

        let status = resp.status();

        if !status.is_success() {
            let body = resp.bytes().await?;
            return Err(reject(status, &body));
        }

        Ok(())
    }
}

/// The provider has used several shapes for error payloads across versions;
/// take whichever field is present.
#[derive(Deserialize)]
struct RawAuthError {
    #[serde(default)]
    error_description: Option<SmolStr>,
    #[serde(default)]
    msg: Option<SmolStr>,
    #[serde(default)]
    message: Option<SmolStr>,
    #[serde(default)]
    error: Option<SmolStr>,
}

impl RawAuthError {
    fn into_message(self) -> SmolStr {
        None.or(self.error_description)
            .or(self.msg)
            .or(self.message)
            .or(self.error)
            .unwrap_or_else(|| SmolStr::new_inline("unknown error"))
    }
}

fn reject(status: StatusCode, body: &[u8]) -> Error {
    let message = match serde_json::from_slice::<RawAuthError>(body) {
        Ok(raw) => raw.into_message(),
        Err(_) => SmolStr::new_inline("unknown error"),
    };

    Error::Rejected { status, message }
}
