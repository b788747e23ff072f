use smol_str::SmolStr;
use timestamp::Timestamp;
use uuid::Uuid;

use crate::auth::UserId;

/// Row store table holding daily gratitude entries.
pub const TABLE: &str = "gratitude_entries";

/// Slots per entry; drafts offer exactly this many.
pub const MAX_ITEMS: usize = 3;

/// One gratitude plus the reflection on why it mattered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GratitudeItem {
    pub text: SmolStr,
    pub reason: SmolStr,
}

impl GratitudeItem {
    pub fn new(text: impl Into<SmolStr>, reason: impl Into<SmolStr>) -> GratitudeItem {
        GratitudeItem {
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Both halves present after trimming.
    pub fn is_filled(&self) -> bool {
        !self.text.trim().is_empty() && !self.reason.trim().is_empty()
    }
}

/// Stored row of a day's gratitude entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GratitudeEntry {
    pub id: Uuid,
    pub user_id: UserId,
    pub items: Vec<GratitudeItem>,
    pub created_at: Timestamp,
}

/// Insert payload; the stored row comes back with `id` and `created_at`.
#[derive(Debug, Clone, Serialize)]
pub struct NewGratitudeEntry {
    pub user_id: UserId,
    pub items: Vec<GratitudeItem>,
}

/// Caller-supplied, not-yet-validated entry input.
///
/// The canonical form offers three slots, but any number may be filled.
#[derive(Debug, Clone, Default)]
pub struct EntryDraft {
    pub items: Vec<GratitudeItem>,
}

impl EntryDraft {
    /// An empty draft with the canonical three slots.
    pub fn blank() -> EntryDraft {
        EntryDraft {
            items: vec![GratitudeItem::default(); MAX_ITEMS],
        }
    }

    /// Items with both halves filled; the rest are skipped, not errors.
    pub fn filled(&self) -> impl Iterator<Item = &GratitudeItem> {
        self.items.iter().filter(|item| item.is_filled())
    }
}
