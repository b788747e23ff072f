use smol_str::SmolStr;
use time::Date;
use timestamp::Timestamp;
use uuid::Uuid;

use crate::auth::UserId;

/// Row store table holding completed good deeds.
pub const TABLE: &str = "good_deeds";

/// Stored row of a completed good deed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoodDeed {
    pub id: Uuid,
    pub user_id: UserId,
    pub description: SmolStr,

    /// Whether this was the day's suggested deed rather than a custom one.
    #[serde(default)]
    pub suggested: bool,

    pub created_at: Timestamp,
}

/// Insert payload; the stored row comes back with `id` and `created_at`.
#[derive(Debug, Clone, Serialize)]
pub struct NewDeed {
    pub user_id: UserId,
    pub description: SmolStr,
    pub suggested: bool,
}

/// Caller-supplied, not-yet-validated input for a custom deed.
#[derive(Debug, Clone, Default)]
pub struct DeedDraft {
    pub action: String,
    /// Optional free-form detail, appended to the action as `action - detail`.
    pub detail: Option<String>,
}

/// Pool of suggested deeds, one surfaced per day.
pub static SUGGESTIONS: [&str; 20] = [
    "Help an elderly person cross the street",
    "Buy a coffee for the person behind you in line",
    "Donate clothes you no longer wear",
    "Send a caring message to a friend",
    "Help a coworker with a task",
    "Give up your seat on public transport",
    "Make a donation to a charity",
    "Give someone a sincere compliment today",
    "Leave a positive review for a small business",
    "Offer to help a neighbor",
    "Donate blood or register as a donor",
    "Plant a tree or care for a plant",
    "Clean up a public space you found littered",
    "Give someone a ride",
    "Teach someone something you know",
    "Visit someone who is lonely",
    "Share your food with someone in need",
    "Be kind to service workers",
    "Help a lost person with directions",
    "Donate books to a library or school",
];

/// The day's suggested deed, rotating on the day of the year.
pub fn suggestion(date: Date) -> &'static str {
    SUGGESTIONS[date.ordinal() as usize % SUGGESTIONS.len()]
}
