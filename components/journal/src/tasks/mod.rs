use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::state::AppState;

mod rl_cleanup;
mod session_refresh;

pub fn spawn_tasks(state: &AppState) -> Vec<JoinHandle<()>> {
    vec![rl_cleanup::spawn(state), session_refresh::spawn(state)]
}

/// Runs `f` on an interval until shutdown is signaled.
fn interval_task<F, Fut>(state: &AppState, period: Duration, f: F) -> JoinHandle<()>
where
    F: Fn(AppState, tokio::time::Instant) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let state = state.clone();

    tokio::spawn(async move {
        let mut alive = state.alive_watcher();
        let mut interval = tokio::time::interval(period);

        while *alive.borrow_and_update() {
            tokio::select! {
                biased;
                t = interval.tick() => f(state.clone(), t).await,
                _ = alive.changed() => break,
            }
        }
    })
}
