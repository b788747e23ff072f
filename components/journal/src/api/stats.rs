use std::time::Duration;

use time::Date;
use timestamp::Timestamp;

use schema::stats::JourneyStats;
use schema::{entry, letter, GratitudeLetter};
use store::RowFilter;

use crate::state::AppState;
use crate::Error;

/// Journey statistics as of `today`: distinct entry days this month, the
/// month's gratitude count, letters sent overall, and the past week's
/// activity.
pub async fn journey(state: &AppState, today: Date) -> Result<JourneyStats, Error> {
    let Some(session) = state.session.current() else {
        return Err(Error::NoSession);
    };

    let filter = RowFilter::default().user(session.user.id);
    let token = &session.access_token;

    let (entries, letters) = futures::try_join!(
        state.store.select(entry::TABLE, token, filter.since(month_start(today))),
        state.store.select::<GratitudeLetter>(letter::TABLE, token, filter),
    )?;

    Ok(schema::stats::compute(&entries, letters.len() as u32, today))
}

/// Midnight UTC on the first of `date`'s month.
fn month_start(date: Date) -> Timestamp {
    let first = date - time::Duration::days(date.day() as i64 - 1);

    let epoch_day = Timestamp::UNIX_EPOCH.date().to_julian_day();
    let days = (first.to_julian_day() - epoch_day).max(0) as u64;

    Timestamp::UNIX_EPOCH + Duration::from_secs(days * 86400)
}

#[cfg(test)]
mod tests {
    use super::*;

    use time::Month;

    #[test]
    fn test_month_start() {
        let date = Date::from_calendar_date(2026, Month::August, 26).unwrap();

        assert_eq!(month_start(date).format().to_string(), "2026-08-01T00:00:00.000Z");

        // already the first
        let date = Date::from_calendar_date(2026, Month::August, 1).unwrap();
        assert_eq!(month_start(date).format().to_string(), "2026-08-01T00:00:00.000Z");
    }
}
