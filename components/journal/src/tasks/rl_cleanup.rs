use super::*;

/// Prunes rate-limit keys whose newest hit is older than every window in
/// use, bounding the table for keys that went quiet.
pub fn spawn(state: &AppState) -> JoinHandle<()> {
    let limits = &state.config.limits;
    let horizon = limits.auth_window.max(limits.write_window);

    interval_task(state, Duration::from_secs(60), move |state, now| async move {
        state.rate_limit.cleanup_at(now.into_std(), horizon).await;
    })
}
