use std::ops::Deref;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use config::Config;
use schema::UserId;
use security::{RateLimitTable, SecurityLog};
use session::{AuthApi, SessionManager};
use store::RestClient;

use crate::services::create_service_client;

pub struct InnerAppState {
    pub config: Config,
    pub log: SecurityLog,
    pub rate_limit: RateLimitTable,
    pub session: SessionManager,
    pub store: RestClient,

    alive: watch::Sender<bool>,
    tasks: parking_lot::Mutex<Vec<JoinHandle<()>>>,
}

#[derive(Clone)]
pub struct AppState(Arc<InnerAppState>);

impl Deref for AppState {
    type Target = InnerAppState;

    fn deref(&self) -> &InnerAppState {
        &self.0
    }
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let client = create_service_client(config.provider.timeout)?;

        let log = SecurityLog::new();
        let rate_limit = RateLimitTable::new(log.clone());

        let api = AuthApi::new(client.clone(), &config.provider.base_url, &config.provider.api_key);
        let session = SessionManager::new(api, log.clone(), rate_limit.clone(), &config);
        let store = RestClient::new(client, &config.provider.base_url, &config.provider.api_key);

        Ok(AppState(Arc::new(InnerAppState {
            session,
            store,
            log,
            rate_limit,
            alive: watch::channel(true).0,
            tasks: parking_lot::Mutex::new(Vec::new()),
            config,
        })))
    }

    /// Starts the background maintenance tasks. Call once at startup.
    pub fn spawn_tasks(&self) {
        let mut tasks = self.tasks.lock();

        debug_assert!(tasks.is_empty());

        tasks.extend(crate::tasks::spawn_tasks(self));
    }

    pub fn is_alive(&self) -> bool {
        *self.alive.borrow()
    }

    pub(crate) fn alive_watcher(&self) -> watch::Receiver<bool> {
        self.alive.subscribe()
    }

    /// Stops the background tasks and waits for them to wind down.
    pub async fn shutdown(&self) {
        log::info!("Shutting down");

        let _ = self.alive.send(false);

        let tasks = std::mem::take(&mut *self.tasks.lock());

        for task in tasks {
            if let Err(e) = task.await {
                log::error!("Task failed during shutdown: {e}");
            }
        }
    }

    /// Content-security-policy header value for an embedding web shell,
    /// derived from the configured provider origin.
    pub fn csp(&self) -> String {
        security::generate_csp(&self.config.provider.base_url)
    }

    /// One shared write budget per user across entries, letters and deeds.
    pub(crate) async fn allow_write(&self, user_id: UserId) -> bool {
        self.rate_limit
            .req(
                &format!("write:{user_id}"),
                self.config.limits.write_requests,
                self.config.limits.write_window,
            )
            .await
    }
}
