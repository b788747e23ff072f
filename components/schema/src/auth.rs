use std::time::Duration;

use smol_str::SmolStr;
use timestamp::Timestamp;
use uuid::Uuid;

pub type UserId = Uuid;

/// Provider-issued user record, as embedded in token responses.
///
/// Only the fields this app reads are modeled; unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    #[serde(default)]
    pub email: Option<SmolStr>,

    #[serde(default)]
    pub created_at: Option<Timestamp>,

    #[serde(default)]
    pub last_sign_in_at: Option<Timestamp>,
}

/// Access/refresh token pair as issued by the hosted identity API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: SmolStr,
    pub refresh_token: SmolStr,

    /// Lifetime of the access token in seconds at issue time
    #[serde(default)]
    pub expires_in: u64,

    /// Unix timestamp at which the access token expires
    #[serde(default)]
    pub expires_at: Option<i64>,

    pub user: User,
}

impl Session {
    /// Fills `expires_at` from `expires_in` when the provider omitted it.
    ///
    /// Must be called at receipt, while "now" still matches issue time.
    pub fn fill_expiry(&mut self) {
        if self.expires_at.is_none() {
            let now = Timestamp::now_utc().duration_since(Timestamp::UNIX_EPOCH).whole_seconds();

            self.expires_at = Some(now + self.expires_in as i64);
        }
    }

    /// Absolute expiry of the access token.
    ///
    /// A session that never went through [`fill_expiry`](Self::fill_expiry)
    /// and carries no `expires_at` reads as long-expired.
    pub fn expiry(&self) -> Timestamp {
        match self.expires_at {
            Some(at) => Timestamp::UNIX_EPOCH + Duration::from_secs(at.max(0) as u64),
            None => Timestamp::UNIX_EPOCH,
        }
    }

    pub fn expires_within(&self, margin: Duration) -> bool {
        (Timestamp::now_utc() + margin) >= self.expiry()
    }

    pub fn is_expired(&self) -> bool {
        self.expires_within(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN_RESPONSE: &str = r#"{
        "access_token": "header.payload.signature",
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 2000000000,
        "refresh_token": "v1.refresh",
        "user": {
            "id": "2b44815d-a438-4b2c-a55b-9b9bd4a63dfc",
            "aud": "authenticated",
            "email": "a@b.co",
            "created_at": "2024-09-08T12:00:00Z"
        }
    }"#;

    #[test]
    fn test_decode_token_response() {
        let session: Session = serde_json::from_str(TOKEN_RESPONSE).unwrap();

        assert_eq!(session.refresh_token, "v1.refresh");
        assert_eq!(session.expires_at, Some(2000000000));
        assert_eq!(session.user.email.as_deref(), Some("a@b.co"));
        assert!(session.user.last_sign_in_at.is_none());
    }

    #[test]
    fn test_expiry_math() {
        let mut session: Session = serde_json::from_str(TOKEN_RESPONSE).unwrap();

        assert_eq!(
            session.expiry(),
            Timestamp::UNIX_EPOCH + Duration::from_secs(2000000000)
        );

        // year 2033, not expired yet and not within any sane margin
        assert!(!session.is_expired());
        assert!(!session.expires_within(Duration::from_secs(60)));

        session.expires_at = Some(100);
        assert!(session.is_expired());
    }

    #[test]
    fn test_fill_expiry() {
        let mut session: Session = serde_json::from_str(TOKEN_RESPONSE).unwrap();
        session.expires_at = None;

        assert!(session.is_expired()); // missing expiry reads as expired

        session.fill_expiry();

        let at = session.expires_at.unwrap();
        let now = Timestamp::now_utc().duration_since(Timestamp::UNIX_EPOCH).whole_seconds();
        assert!((at - now - 3600).abs() <= 1);

        // already-filled sessions are untouched
        session.expires_in = 9999;
        session.fill_expiry();
        assert_eq!(session.expires_at, Some(at));
    }
}
