use schema::entry::{self, EntryDraft, GratitudeEntry, GratitudeItem, NewGratitudeEntry};
use store::RowFilter;

use crate::state::AppState;
use crate::Error;

/// Records a gratitude entry for the signed-in user.
///
/// Each filled slot is sanitized before length validation, so markup
/// stripped from the text cannot hide an over-long payload. Slots left
/// empty, or emptied entirely by sanitization, are skipped; an entry must
/// end up with at least one surviving slot and at most the canonical
/// three.
pub async fn record(state: &AppState, draft: &EntryDraft) -> Result<GratitudeEntry, Error> {
    let Some(session) = state.session.current() else {
        return Err(Error::NoSession);
    };

    let max_len = state.config.limits.max_entry_len;

    let mut items = Vec::new();

    for item in draft.filled() {
        let item = GratitudeItem::new(
            security::sanitize_text(&item.text),
            security::sanitize_text(&item.reason),
        );

        if !item.is_filled() {
            continue;
        }

        if !security::validate_text_length(&item.text, max_len) || !security::validate_text_length(&item.reason, max_len)
        {
            return Err(Error::TooLong("Entry"));
        }

        items.push(item);
    }

    if items.is_empty() {
        return Err(Error::EmptyEntry);
    }

    if items.len() > entry::MAX_ITEMS {
        return Err(Error::TooManyItems);
    }

    let user_id = session.user.id;

    if !state.allow_write(user_id).await {
        return Err(Error::RateLimited);
    }

    let row = NewGratitudeEntry { user_id, items };

    Ok(state.store.insert(entry::TABLE, &session.access_token, &row).await?)
}

/// Entries for the signed-in user, newest first. The filter's time bounds
/// and limit are honored; its user scope is always overwritten with the
/// caller's own id.
pub async fn list(state: &AppState, filter: RowFilter) -> Result<Vec<GratitudeEntry>, Error> {
    let Some(session) = state.session.current() else {
        return Err(Error::NoSession);
    };

    let filter = filter.user(session.user.id);

    Ok(state.store.select(entry::TABLE, &session.access_token, filter).await?)
}
