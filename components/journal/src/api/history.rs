use schema::history::History;
use schema::{deed, entry, letter};
use store::RowFilter;

use crate::state::AppState;
use crate::Error;

/// Everything the user has recorded, merged newest-first.
pub async fn fetch(state: &AppState) -> Result<History, Error> {
    let Some(session) = state.session.current() else {
        return Err(Error::NoSession);
    };

    let filter = RowFilter::default().user(session.user.id);
    let token = &session.access_token;

    let (entries, letters, deeds) = futures::try_join!(
        state.store.select(entry::TABLE, token, filter),
        state.store.select(letter::TABLE, token, filter),
        state.store.select(deed::TABLE, token, filter),
    )?;

    Ok(History::merge(entries, letters, deeds))
}
