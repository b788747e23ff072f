use schema::letter::{self, ComposedLetter, GratitudeLetter, LetterDraft, NewLetter};

use crate::state::AppState;
use crate::Error;

/// Validates and stores a gratitude letter, and renders it for delivery.
///
/// The returned [`ComposedLetter`] carries the full body for a mail
/// client, the plain body for the clipboard, and a `mailto:` link when the
/// draft included a recipient email.
pub async fn send(state: &AppState, draft: &LetterDraft) -> Result<(GratitudeLetter, ComposedLetter), Error> {
    let Some(session) = state.session.current() else {
        return Err(Error::NoSession);
    };

    let limits = &state.config.limits;

    let recipient = security::sanitize_text(&draft.recipient_name);
    let recipient = recipient.trim();
    if recipient.is_empty() {
        return Err(Error::MissingField("Recipient Name"));
    }
    if !security::validate_text_length(recipient, limits.max_name_len) {
        return Err(Error::TooLong("Name"));
    }

    let sender = security::sanitize_text(&draft.sender_name);
    let sender = sender.trim();
    if sender.is_empty() {
        return Err(Error::MissingField("Sender Name"));
    }
    if !security::validate_text_length(sender, limits.max_name_len) {
        return Err(Error::TooLong("Name"));
    }

    let content = security::sanitize_text(&draft.content);
    let content = content.trim();
    if content.is_empty() {
        return Err(Error::MissingField("Letter Content"));
    }
    if !security::validate_text_length(content, limits.max_letter_len) {
        return Err(Error::TooLong("Letter"));
    }

    // an absent or blank email means clipboard-only delivery
    let email = draft
        .recipient_email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty());

    if let Some(email) = email {
        if !security::validate_email(email) {
            return Err(Error::InvalidEmail);
        }
    }

    let user_id = session.user.id;

    if !state.allow_write(user_id).await {
        return Err(Error::RateLimited);
    }

    let row = NewLetter {
        user_id,
        recipient: recipient.into(),
        body: content.into(),
        sender: sender.into(),
    };

    let stored: GratitudeLetter = state.store.insert(letter::TABLE, &session.access_token, &row).await?;
    let composed = letter::compose(recipient, content, sender, email);

    Ok((stored, composed))
}
