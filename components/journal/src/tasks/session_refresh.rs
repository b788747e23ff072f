use super::*;

/// Renews the cached session shortly before it expires, so interactive
/// calls never pay the refresh round-trip themselves.
pub fn spawn(state: &AppState) -> JoinHandle<()> {
    let margin = state.config.account.refresh_margin;

    interval_task(state, Duration::from_secs(30), move |state, _| async move {
        let due = match state.session.current() {
            Some(session) => session.expires_within(margin),
            None => false,
        };

        if due {
            log::debug!("Session nearing expiry, refreshing");

            if let Err(e) = state.session.refresh().await {
                log::warn!("Background session refresh failed: {e}");
            }
        }
    })
}
