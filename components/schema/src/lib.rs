//! Shared domain model for the gratitude journal: session/user records as
//! issued by the hosted identity API, the three journal row kinds, and
//! the derived history and statistics views.

#[macro_use]
extern crate serde;

pub mod auth;
pub mod deed;
pub mod entry;
pub mod history;
pub mod letter;
pub mod stats;

pub use auth::{Session, User, UserId};
pub use deed::{DeedDraft, GoodDeed, NewDeed};
pub use entry::{EntryDraft, GratitudeEntry, GratitudeItem, NewGratitudeEntry};
pub use history::{History, HistoryCounts, HistoryItem, HistoryKind};
pub use letter::{ComposedLetter, GratitudeLetter, LetterDraft, NewLetter};
pub use stats::JourneyStats;
