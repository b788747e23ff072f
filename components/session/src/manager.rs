use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use serde_json::json;
use tokio::sync::broadcast;

use schema::{Session, UserId};
use security::{RateLimitTable, SecurityLog, Severity};

use crate::api::{AuthApi, SignUpResponse};
use crate::events::{SessionChange, SessionEvents};
use crate::Error;

/// Outcome of [`SessionManager::sign_out`]. The local session is always
/// cleared; this reports whether the provider revoked its side too.
#[derive(Debug)]
pub enum SignOut {
    /// Provider and local state both cleared.
    Full,
    /// The provider call failed, but local state was cleared anyway.
    LocalOnly { error: Error },
}

impl SignOut {
    pub fn server_cleared(&self) -> bool {
        matches!(self, SignOut::Full)
    }
}

/// Owns the cached session and every credential-bearing operation.
///
/// Input validation and the attempt limiter run before anything touches the
/// network, and every authentication outcome is recorded in the security
/// log the same way: failed attempts as security events, successes as plain
/// info entries, transport failures as errors with their operation.
pub struct SessionManager {
    api: AuthApi,
    cached: ArcSwapOption<Session>,
    loading: AtomicBool,
    events: broadcast::Sender<SessionChange>,
    log: SecurityLog,
    rate_limit: RateLimitTable,

    password_len: Range<usize>,
    auth_attempts: usize,
    auth_window: Duration,
}

struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

impl SessionManager {
    pub fn new(api: AuthApi, log: SecurityLog, rate_limit: RateLimitTable, config: &config::Config) -> Self {
        SessionManager {
            api,
            cached: ArcSwapOption::empty(),
            loading: AtomicBool::new(false),
            events: broadcast::channel(16).0,
            log,
            rate_limit,
            password_len: config.account.password_len.clone(),
            auth_attempts: config.limits.auth_attempts,
            auth_window: config.limits.auth_window,
        }
    }

    pub fn subscribe(&self) -> SessionEvents {
        SessionEvents {
            rx: self.events.subscribe(),
        }
    }

    pub fn current(&self) -> Option<Arc<Session>> {
        self.cached.load_full()
    }

    pub fn current_user_id(&self) -> Option<UserId> {
        self.cached.load().as_ref().map(|session| session.user.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.cached.load().is_some()
    }

    /// True while a sign-in or sign-up call is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Relaxed)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Arc<Session>, Error> {
        let email = email.trim();

        if !security::validate_email(email) {
            return Err(Error::InvalidEmail);
        }

        if !self.allow_attempt(email).await {
            return Err(Error::RateLimited);
        }

        let _loading = self.begin_loading();

        match self.api.password_grant(email, password).await {
            Ok(session) => {
                let session = Arc::new(session);

                self.log.log(Severity::Info, "Successful login", Some(json!({ "email": email })));
                self.apply(SessionChange::SignedIn(session.clone()));

                Ok(session)
            }
            Err(e @ Error::Rejected { .. }) => {
                self.log.security_event("Failed login attempt", Some(json!({ "email": email })));
                Err(e)
            }
            Err(e) => {
                self.log.error(&e, "signIn");
                Err(e)
            }
        }
    }

    /// Registers a new account. Returns `None` when the provider wants the
    /// email address confirmed before issuing a session.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Arc<Session>>, Error> {
        let email = email.trim();

        if !security::validate_email(email) {
            return Err(Error::InvalidEmail);
        }

        if !security::validate_password(password, &self.password_len) {
            return Err(Error::InvalidPassword);
        }

        if !self.allow_attempt(email).await {
            return Err(Error::RateLimited);
        }

        let _loading = self.begin_loading();

        match self.api.sign_up(email, password).await {
            Ok(res) => {
                self.log.log(Severity::Info, "Successful signup", Some(json!({ "email": email })));

                Ok(match res {
                    SignUpResponse::Session(session) => {
                        let session = Arc::new(session);
                        self.apply(SessionChange::SignedIn(session.clone()));
                        Some(session)
                    }
                    SignUpResponse::Pending(user) => {
                        log::debug!("Signup for user {} pending email confirmation", user.id);
                        None
                    }
                })
            }
            Err(e @ Error::Rejected { .. }) => {
                self.log.security_event("Failed signup attempt", Some(json!({ "email": email })));
                Err(e)
            }
            Err(e) => {
                self.log.error(&e, "signUp");
                Err(e)
            }
        }
    }

    /// Clears the cached session, and revokes it with the provider when one
    /// is cached. Local state is cleared even if the provider call fails, so
    /// the app never gets stuck signed-in.
    pub async fn sign_out(&self) -> SignOut {
        let session = self.cached.load_full();

        let result = match session {
            Some(ref session) => self.api.logout(&session.access_token).await,
            // nothing cached, so nothing for the provider to revoke
            None => Ok(()),
        };

        self.apply(SessionChange::SignedOut);

        match result {
            Ok(()) => {
                self.log.log(Severity::Info, "User signed out", None);
                SignOut::Full
            }
            Err(error) => {
                self.log.error(&error, "signOut");
                SignOut::LocalOnly { error }
            }
        }
    }

    /// Asks the provider to send a password-recovery email.
    pub async fn reset_password(&self, email: &str) -> Result<(), Error> {
        let email = email.trim();

        if !security::validate_email(email) {
            return Err(Error::InvalidEmail);
        }

        match self.api.recover(email).await {
            Ok(()) => {
                self.log.log(Severity::Info, "Password reset requested", Some(json!({ "email": email })));
                Ok(())
            }
            // provider rejections surface to the caller without a log entry
            Err(e @ Error::Rejected { .. }) => Err(e),
            Err(e) => {
                self.log.error(&e, "resetPassword");
                Err(e)
            }
        }
    }

    /// Sets a new password on the signed-in account.
    pub async fn update_password(&self, password: &str) -> Result<(), Error> {
        let Some(session) = self.cached.load_full() else {
            return Err(Error::NoSession);
        };

        if !security::validate_password(password, &self.password_len) {
            return Err(Error::InvalidPassword);
        }

        match self.api.update_password(&session.access_token, password).await {
            Ok(()) => {
                self.log.log(Severity::Info, "Password updated", None);
                Ok(())
            }
            Err(e @ Error::Rejected { .. }) => Err(e),
            Err(e) => {
                self.log.error(&e, "updatePassword");
                Err(e)
            }
        }
    }

    /// Exchanges the cached refresh token for a fresh session.
    ///
    /// A provider rejection means the token was revoked out-of-band, so the
    /// cache is cleared and the app converges on signed-out. Transient
    /// failures keep the current session for a later retry.
    pub async fn refresh(&self) -> Result<Arc<Session>, Error> {
        let Some(session) = self.cached.load_full() else {
            return Err(Error::NoSession);
        };

        match self.api.refresh_grant(&session.refresh_token).await {
            Ok(fresh) => {
                let fresh = Arc::new(fresh);
                self.apply(SessionChange::Refreshed(fresh.clone()));
                Ok(fresh)
            }
            Err(e @ Error::Rejected { .. }) => {
                self.log.security_event(
                    "Session refresh rejected",
                    Some(json!({ "user_id": session.user.id })),
                );
                self.apply(SessionChange::SignedOut);
                Err(e)
            }
            Err(e) => {
                self.log.error(&e, "refresh");
                Err(e)
            }
        }
    }

    /// Restores a session from a refresh token kept across restarts.
    pub async fn restore(&self, refresh_token: &str) -> Result<Arc<Session>, Error> {
        match self.api.refresh_grant(refresh_token).await {
            Ok(session) => {
                let session = Arc::new(session);
                self.apply(SessionChange::Refreshed(session.clone()));
                Ok(session)
            }
            Err(e @ Error::Rejected { .. }) => Err(e),
            Err(e) => {
                self.log.error(&e, "restore");
                Err(e)
            }
        }
    }

    async fn allow_attempt(&self, email: &str) -> bool {
        self.rate_limit
            .req(&format!("auth:{email}"), self.auth_attempts, self.auth_window)
            .await
    }

    fn begin_loading(&self) -> LoadingGuard<'_> {
        self.loading.store(true, Ordering::Relaxed);
        LoadingGuard(&self.loading)
    }

    fn apply(&self, change: SessionChange) {
        log::trace!("Session change: {}", change.name());

        match change.session() {
            Some(session) => self.cached.store(Some(session.clone())),
            None => self.cached.store(None),
        }

        // nobody listening is fine
        let _ = self.events.send(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::SocketAddr;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const SESSION_BODY: &str = r#"{
        "access_token": "header.payload.signature",
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 2000000000,
        "refresh_token": "v1.refresh",
        "user": { "id": "2b44815d-a438-4b2c-a55b-9b9bd4a63dfc", "email": "a@b.co" }
    }"#;

    /// Serves each canned `(status, body)` once, in order, then goes away.
    async fn canned_provider(responses: Vec<(&'static str, &'static str)>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();

                read_request(&mut stream).await;

                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len(),
                );

                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
        });

        addr
    }

    async fn read_request(stream: &mut TcpStream) {
        let mut buf = Vec::with_capacity(1024);
        let mut chunk = [0u8; 1024];

        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);

            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..pos]).to_ascii_lowercase();

                let body_len = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|len| len.trim().parse::<usize>().ok())
                    .unwrap_or(0);

                if buf.len() >= pos + 4 + body_len {
                    return;
                }
            }
        }
    }

    fn test_manager(base_url: &str) -> SessionManager {
        let log = SecurityLog::new();

        SessionManager::new(
            AuthApi::new(reqwest::Client::new(), base_url, "test-key"),
            log.clone(),
            RateLimitTable::new(log),
            &config::Config::default(),
        )
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let addr = canned_provider(vec![("200 OK", SESSION_BODY), ("204 No Content", "")]).await;
        let manager = test_manager(&format!("http://{addr}"));

        let mut events = manager.subscribe();

        assert!(!manager.is_authenticated());

        let session = manager.sign_in("a@b.co", "password").await.unwrap();
        assert_eq!(session.user.email.as_deref(), Some("a@b.co"));
        assert_eq!(session.refresh_token, "v1.refresh");

        assert!(manager.is_authenticated());
        assert_eq!(manager.current_user_id(), Some(session.user.id));
        assert!(!manager.is_loading());

        assert!(manager.sign_out().await.server_cleared());
        assert!(!manager.is_authenticated());
        assert!(manager.current().is_none());

        // subscribers observed both changes in order
        assert!(matches!(events.next().await, Some(SessionChange::SignedIn(_))));
        assert!(matches!(events.next().await, Some(SessionChange::SignedOut)));

        let entries = manager.log.snapshot();
        assert!(entries.iter().any(|e| e.severity == Severity::Info && e.message == "Successful login"));
        assert!(entries.iter().any(|e| e.message == "User signed out"));
    }

    #[tokio::test]
    async fn test_validation_precedes_network() {
        // no server here; validation failures must never reach the wire
        let manager = test_manager("http://127.0.0.1:9");

        assert!(matches!(manager.sign_in("not-an-email", "hunter2").await, Err(Error::InvalidEmail)));
        assert!(matches!(manager.sign_up("a@b.co", "short").await, Err(Error::InvalidPassword)));
        assert!(matches!(manager.reset_password("also bad").await, Err(Error::InvalidEmail)));
        assert!(matches!(manager.update_password("irrelevant").await, Err(Error::NoSession)));

        // and none of it touched the security log
        assert!(manager.log.is_empty());
    }

    #[tokio::test]
    async fn test_failed_login_records_security_event() {
        let addr = canned_provider(vec![(
            "400 Bad Request",
            r#"{"error_description": "Invalid login credentials"}"#,
        )])
        .await;
        let manager = test_manager(&format!("http://{addr}"));

        let err = manager.sign_in("a@b.co", "wrong").await.unwrap_err();
        assert!(matches!(err, Error::Rejected { message, .. } if message == "Invalid login credentials"));
        assert!(!manager.is_authenticated());

        let entries = manager.log.snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].severity, Severity::Warn);
        assert_eq!(entries[0].message, "Security event: Failed login attempt");
        assert_eq!(entries[0].detail, Some(json!({ "email": "a@b.co" })));
    }

    #[tokio::test]
    async fn test_repeated_attempts_rate_limited() {
        // unreachable on purpose; every attempt fails on the wire but is
        // still counted against the window
        let manager = test_manager("http://127.0.0.1:9");

        for _ in 0..5 {
            let _ = manager.sign_in("a@b.co", "password").await;
        }

        assert!(matches!(manager.sign_in("a@b.co", "password").await, Err(Error::RateLimited)));

        // a different account is unaffected
        assert!(!matches!(manager.sign_in("other@b.co", "password").await, Err(Error::RateLimited)));
    }

    #[tokio::test]
    async fn test_sign_out_clears_locally_when_provider_fails() {
        let addr = canned_provider(vec![("200 OK", SESSION_BODY)]).await;
        let manager = test_manager(&format!("http://{addr}"));

        manager.sign_in("a@b.co", "password").await.unwrap();

        // canned server is gone now, so the revocation call fails
        let out = manager.sign_out().await;

        assert!(!out.server_cleared());
        assert!(matches!(out, SignOut::LocalOnly { .. }));
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn test_refresh_rejection_signs_out() {
        let addr = canned_provider(vec![
            ("200 OK", SESSION_BODY),
            ("400 Bad Request", r#"{"error_description": "Invalid Refresh Token"}"#),
        ])
        .await;
        let manager = test_manager(&format!("http://{addr}"));

        manager.sign_in("a@b.co", "password").await.unwrap();

        let err = manager.refresh().await.unwrap_err();
        assert!(matches!(err, Error::Rejected { message, .. } if message == "Invalid Refresh Token"));

        // token revoked out-of-band; cache converges on signed-out
        assert!(!manager.is_authenticated());

        let entries = manager.log.snapshot();
        assert!(entries.iter().any(|e| e.message == "Security event: Session refresh rejected"));
    }

    #[tokio::test]
    async fn test_restore_from_stored_token() {
        let addr = canned_provider(vec![("200 OK", SESSION_BODY)]).await;
        let manager = test_manager(&format!("http://{addr}"));

        let mut events = manager.subscribe();

        let session = manager.restore("v1.stored").await.unwrap();
        assert!(manager.is_authenticated());
        assert_eq!(manager.current_user_id(), Some(session.user.id));

        assert!(matches!(events.next().await, Some(SessionChange::Refreshed(_))));
    }
}
