use timestamp::Timestamp;

use crate::deed::GoodDeed;
use crate::entry::GratitudeEntry;
use crate::letter::GratitudeLetter;

/// Kind of journal record, used for filtering the merged feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Gratitude,
    Letter,
    Deed,
}

/// One record in the merged history feed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HistoryItem {
    Gratitude(GratitudeEntry),
    Letter(GratitudeLetter),
    Deed(GoodDeed),
}

impl HistoryItem {
    pub fn kind(&self) -> HistoryKind {
        match self {
            HistoryItem::Gratitude(_) => HistoryKind::Gratitude,
            HistoryItem::Letter(_) => HistoryKind::Letter,
            HistoryItem::Deed(_) => HistoryKind::Deed,
        }
    }

    pub fn created_at(&self) -> Timestamp {
        match self {
            HistoryItem::Gratitude(entry) => entry.created_at,
            HistoryItem::Letter(letter) => letter.created_at,
            HistoryItem::Deed(deed) => deed.created_at,
        }
    }
}

/// Merged, newest-first feed over all three record kinds.
#[derive(Debug, Clone, Default, Serialize)]
pub struct History {
    pub items: Vec<HistoryItem>,
}

impl History {
    pub fn merge(
        entries: Vec<GratitudeEntry>,
        letters: Vec<GratitudeLetter>,
        deeds: Vec<GoodDeed>,
    ) -> History {
        let mut items = Vec::with_capacity(entries.len() + letters.len() + deeds.len());

        items.extend(entries.into_iter().map(HistoryItem::Gratitude));
        items.extend(letters.into_iter().map(HistoryItem::Letter));
        items.extend(deeds.into_iter().map(HistoryItem::Deed));

        items.sort_by_key(|item| std::cmp::Reverse(item.created_at()));

        History { items }
    }

    /// Per-kind tallies for the feed's tab headers.
    pub fn counts(&self) -> HistoryCounts {
        let mut counts = HistoryCounts::default();

        for item in &self.items {
            match item.kind() {
                HistoryKind::Gratitude => counts.gratitudes += 1,
                HistoryKind::Letter => counts.letters += 1,
                HistoryKind::Deed => counts.deeds += 1,
            }
        }

        counts
    }

    pub fn of_kind(&self, kind: HistoryKind) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter().filter(move |item| item.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistoryCounts {
    pub gratitudes: usize,
    pub letters: usize,
    pub deeds: usize,
}

impl HistoryCounts {
    pub fn total(&self) -> usize {
        self.gratitudes + self.letters + self.deeds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use smol_str::SmolStr;
    use uuid::Uuid;

    use crate::entry::GratitudeItem;

    fn at(days: u64) -> Timestamp {
        Timestamp::UNIX_EPOCH + Duration::from_secs(days * 86400)
    }

    fn entry(days: u64) -> GratitudeEntry {
        GratitudeEntry {
            id: Uuid::from_u128(days as u128),
            user_id: Uuid::nil(),
            items: vec![GratitudeItem::new("text", "reason")],
            created_at: at(days),
        }
    }

    fn letter(days: u64) -> GratitudeLetter {
        GratitudeLetter {
            id: Uuid::from_u128(days as u128),
            user_id: Uuid::nil(),
            recipient: SmolStr::new("Maria"),
            body: SmolStr::new("thank you"),
            sender: SmolStr::new("Ana"),
            created_at: at(days),
        }
    }

    fn deed(days: u64) -> GoodDeed {
        GoodDeed {
            id: Uuid::from_u128(days as u128),
            user_id: Uuid::nil(),
            description: SmolStr::new("helped a neighbor"),
            suggested: false,
            created_at: at(days),
        }
    }

    #[test]
    fn test_merge_newest_first() {
        let history = History::merge(
            vec![entry(8), entry(5)],
            vec![letter(7)],
            vec![deed(6)],
        );

        let days: Vec<u64> = history
            .items
            .iter()
            .map(|item| {
                item.created_at().duration_since(Timestamp::UNIX_EPOCH).whole_seconds() as u64 / 86400
            })
            .collect();

        assert_eq!(days, [8, 7, 6, 5]);
    }

    #[test]
    fn test_counts_and_filter() {
        let history = History::merge(
            vec![entry(1), entry(2)],
            vec![letter(3)],
            vec![deed(4)],
        );

        let counts = history.counts();
        assert_eq!(counts.gratitudes, 2);
        assert_eq!(counts.letters, 1);
        assert_eq!(counts.deeds, 1);
        assert_eq!(counts.total(), history.len());

        assert_eq!(history.of_kind(HistoryKind::Gratitude).count(), 2);
        assert_eq!(history.of_kind(HistoryKind::Deed).count(), 1);

        assert!(history
            .of_kind(HistoryKind::Letter)
            .all(|item| matches!(item, HistoryItem::Letter(_))));
    }
}
