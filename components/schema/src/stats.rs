use hashbrown::HashSet;
use time::Date;

use crate::entry::GratitudeEntry;

/// Aggregate figures for the "your journey" panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JourneyStats {
    /// Distinct days with an entry in the current month.
    ///
    /// Displayed as a day streak; the count has always been distinct days
    /// rather than an unbroken run, and is kept that way so existing
    /// displays keep their numbers.
    pub consecutive_days: u32,

    /// Gratitude items across the supplied entries.
    pub total_gratitudes: u32,

    pub letters_written: u32,

    /// Distinct days with an entry in the trailing seven days.
    pub weekly_streak: u32,
}

/// Computes journey statistics over the current month's entries.
///
/// `today` anchors both the month and the trailing week; entries outside
/// the month still count toward `total_gratitudes`.
pub fn compute(entries: &[GratitudeEntry], letters_written: u32, today: Date) -> JourneyStats {
    let mut month_days: HashSet<u8> = HashSet::new();
    let mut week_days: HashSet<Date> = HashSet::new();
    let mut total_gratitudes = 0;

    for entry in entries {
        let date = entry.created_at.date();

        total_gratitudes += entry.items.len() as u32;

        if date.year() == today.year() && date.month() == today.month() {
            month_days.insert(date.day());
        }

        let days_ago = today.to_julian_day() - date.to_julian_day();
        if (0..7).contains(&days_ago) {
            week_days.insert(date);
        }
    }

    JourneyStats {
        consecutive_days: month_days.len() as u32,
        total_gratitudes,
        letters_written,
        weekly_streak: week_days.len() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use timestamp::Timestamp;
    use uuid::Uuid;

    use crate::entry::GratitudeItem;

    // day 0 = 1970-01-01
    fn entry_on(day: u64, items: usize) -> GratitudeEntry {
        GratitudeEntry {
            id: Uuid::from_u128(day as u128),
            user_id: Uuid::nil(),
            items: vec![GratitudeItem::new("text", "reason"); items],
            created_at: Timestamp::UNIX_EPOCH + Duration::from_secs(day * 86400 + 43200),
        }
    }

    #[test]
    fn test_distinct_days_not_runs() {
        let today = entry_on(20, 1).created_at.date(); // Jan 21

        // days 3, 10, 11 — gapped, three distinct days, two entries on day 10
        let entries = vec![entry_on(3, 3), entry_on(10, 2), entry_on(10, 1), entry_on(11, 3)];

        let stats = compute(&entries, 2, today);

        assert_eq!(stats.consecutive_days, 3);
        assert_eq!(stats.total_gratitudes, 9);
        assert_eq!(stats.letters_written, 2);
        assert_eq!(stats.weekly_streak, 0);
    }

    #[test]
    fn test_weekly_window() {
        let today = entry_on(20, 1).created_at.date();

        // 0, 6 days ago in the window; 7 days ago out
        let entries = vec![entry_on(20, 1), entry_on(14, 1), entry_on(13, 1)];

        let stats = compute(&entries, 0, today);

        assert_eq!(stats.weekly_streak, 2);
        assert_eq!(stats.consecutive_days, 3);
    }

    #[test]
    fn test_other_month_excluded_from_days() {
        let today = entry_on(40, 1).created_at.date(); // Feb 10

        // a January entry: counts toward totals, not toward the month days
        let entries = vec![entry_on(40, 2), entry_on(10, 3)];

        let stats = compute(&entries, 0, today);

        assert_eq!(stats.consecutive_days, 1);
        assert_eq!(stats.total_gratitudes, 5);
    }

    #[test]
    fn test_empty() {
        let today = entry_on(0, 1).created_at.date();

        assert_eq!(compute(&[], 0, today), JourneyStats::default());
    }
}
