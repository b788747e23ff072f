use time::Date;

/// A quotation shown on the journal's dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

pub static QUOTES: [Quote; 4] = [
    Quote {
        text: "Gratitude is the most powerful tool in our relationship with God",
        author: "Reverend Alexandre Broglio",
    },
    Quote {
        text: "Gratitude is not only the greatest of virtues, but the parent of all the others.",
        author: "Cicero",
    },
    Quote {
        text: "Repay the good that has been done to you, even if only with gratitude.",
        author: "Confucius",
    },
    Quote {
        text: "Gratitude turns what we have into enough.",
        author: "Melody Beattie",
    },
];

/// The quote for a given day. Rotates with the day of the month, so it
/// holds steady all day and needs no stored state.
pub fn daily(date: Date) -> &'static Quote {
    &QUOTES[date.day() as usize % QUOTES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    use time::Month;

    #[test]
    fn test_daily_rotation() {
        let day = |d| daily(Date::from_calendar_date(2026, Month::August, d).unwrap());

        assert_eq!(day(4), &QUOTES[0]);
        assert_eq!(day(5), &QUOTES[1]);
        assert_eq!(day(1), &QUOTES[1]);

        // stable within a day
        assert_eq!(day(17), day(17));

        // wraps across the pool
        assert_eq!(day(2), &QUOTES[2]);
        assert_eq!(day(31), &QUOTES[3]);
    }
}
