use smol_str::SmolStr;
use timestamp::Timestamp;
use uuid::Uuid;

use crate::auth::UserId;

/// Row store table holding sent gratitude letters.
pub const TABLE: &str = "gratitude_letters";

/// Stored row of a sent letter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GratitudeLetter {
    pub id: Uuid,
    pub user_id: UserId,
    pub recipient: SmolStr,
    pub body: SmolStr,
    pub sender: SmolStr,
    pub created_at: Timestamp,
}

/// Insert payload; the stored row comes back with `id` and `created_at`.
#[derive(Debug, Clone, Serialize)]
pub struct NewLetter {
    pub user_id: UserId,
    pub recipient: SmolStr,
    pub body: SmolStr,
    pub sender: SmolStr,
}

/// Caller-supplied, not-yet-validated letter input.
#[derive(Debug, Clone, Default)]
pub struct LetterDraft {
    pub recipient_name: String,
    /// Optional; when present, a `mailto:` link is produced.
    pub recipient_email: Option<String>,
    pub content: String,
    pub sender_name: String,
}

/// Rendered letter, ready for hand-off to a mail client or the clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedLetter {
    pub subject: String,
    /// Full body including the app footer.
    pub body: String,
    /// Body without the footer, for the clipboard.
    pub plain: String,
    /// Only present when the draft carried a recipient email.
    pub mailto: Option<String>,
}

/// Renders the letter template around already-sanitized parts.
pub fn compose(recipient: &str, content: &str, sender: &str, email: Option<&str>) -> ComposedLetter {
    let subject = format!("A gratitude letter from {sender} 💝");
    let plain = format!("Dear {recipient},\n\n{content}\n\nWith gratitude,\n{sender}");
    let body = format!("{plain}\n\n---\nWritten with the Gratia gratitude journal");

    let mailto = email.map(|email| {
        format!(
            "mailto:{email}?subject={}&body={}",
            urlencoding::encode(&subject),
            urlencoding::encode(&body)
        )
    });

    ComposedLetter {
        subject,
        body,
        plain,
        mailto,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_without_email() {
        let letter = compose("Maria", "thank you for everything", "Ana", None);

        assert_eq!(letter.subject, "A gratitude letter from Ana 💝");
        assert_eq!(
            letter.plain,
            "Dear Maria,\n\nthank you for everything\n\nWith gratitude,\nAna"
        );
        assert!(letter.body.starts_with(&letter.plain));
        assert!(letter.body.ends_with("---\nWritten with the Gratia gratitude journal"));
        assert!(letter.mailto.is_none());
    }

    #[test]
    fn test_compose_with_email() {
        let letter = compose("Maria", "thank you", "Ana", Some("maria@example.com"));

        let mailto = letter.mailto.unwrap();
        assert!(mailto.starts_with("mailto:maria@example.com?subject="));
        // spaces and newlines percent-encoded, never '+'
        assert!(mailto.contains("%20"));
        assert!(mailto.contains("%0A"));
        assert!(!mailto.contains('+'));
    }
}
