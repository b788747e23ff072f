use time::Date;

use schema::deed::{self, DeedDraft, GoodDeed, NewDeed};
use schema::Session;

use crate::state::AppState;
use crate::Error;

pub use schema::deed::{suggestion, SUGGESTIONS};

/// Records a deed the user performed on their own initiative.
pub async fn record(state: &AppState, draft: &DeedDraft) -> Result<GoodDeed, Error> {
    let Some(session) = state.session.current() else {
        return Err(Error::NoSession);
    };

    let action = security::sanitize_text(&draft.action);
    let action = action.trim();
    if action.is_empty() {
        return Err(Error::MissingField("Deed"));
    }

    let detail = draft.detail.as_deref().map(security::sanitize_text);
    let detail = detail.as_deref().map(str::trim).filter(|detail| !detail.is_empty());

    let description = match detail {
        Some(detail) => format!("{action} - {detail}"),
        None => action.to_owned(),
    };

    if !security::validate_text_length(&description, state.config.limits.max_entry_len) {
        return Err(Error::TooLong("Deed"));
    }

    insert(state, &session, description, false).await
}

/// Records that the user completed the day's suggested deed.
pub async fn record_suggested(state: &AppState, today: Date) -> Result<GoodDeed, Error> {
    let Some(session) = state.session.current() else {
        return Err(Error::NoSession);
    };

    insert(state, &session, deed::suggestion(today).to_owned(), true).await
}

async fn insert(state: &AppState, session: &Session, description: String, suggested: bool) -> Result<GoodDeed, Error> {
    let user_id = session.user.id;

    if !state.allow_write(user_id).await {
        return Err(Error::RateLimited);
    }

    let row = NewDeed {
        user_id,
        description: description.into(),
        suggested,
    };

    Ok(state.store.insert(deed::TABLE, &session.access_token, &row).await?)
}
