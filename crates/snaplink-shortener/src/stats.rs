use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use snaplink_core::UrlRecord;
use std::cmp::Reverse;
use std::str::FromStr;

/// Which records a statistics listing includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsFilter {
    #[default]
    All,
    Active,
    Expired,
}

impl StatsFilter {
    pub fn matches(&self, record: &UrlRecord, now: Timestamp) -> bool {
        match self {
            StatsFilter::All => true,
            StatsFilter::Active => record.is_active(now),
            StatsFilter::Expired => record.is_expired(now),
        }
    }
}

impl FromStr for StatsFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatsFilter::All),
            "active" => Ok(StatsFilter::Active),
            "expired" => Ok(StatsFilter::Expired),
            other => Err(format!("unknown filter '{other}'")),
        }
    }
}

/// Ordering of a statistics listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatsSort {
    /// Newest first.
    #[default]
    #[serde(rename = "created")]
    CreatedDesc,
    /// Most clicked first.
    #[serde(rename = "clicks")]
    ClicksDesc,
    /// Soonest to expire first.
    #[serde(rename = "expires")]
    ExpiresAsc,
}

impl StatsSort {
    pub fn apply(&self, records: &mut [UrlRecord]) {
        // stable sorts keep insertion order among ties
        match self {
            StatsSort::CreatedDesc => records.sort_by_key(|r| Reverse(r.created_at)),
            StatsSort::ClicksDesc => records.sort_by_key(|r| Reverse(r.click_count)),
            StatsSort::ExpiresAsc => records.sort_by_key(|r| r.expires_at),
        }
    }
}

impl FromStr for StatsSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(StatsSort::CreatedDesc),
            "clicks" => Ok(StatsSort::ClicksDesc),
            "expires" => Ok(StatsSort::ExpiresAsc),
            other => Err(format!("unknown sort '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsQuery {
    #[serde(default)]
    pub filter: StatsFilter,
    #[serde(default)]
    pub sort: StatsSort,
}

impl StatsQuery {
    pub fn new(filter: StatsFilter, sort: StatsSort) -> Self {
        Self { filter, sort }
    }
}

/// Aggregate counters over every stored record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_urls: usize,
    pub active_urls: usize,
    pub expired_urls: usize,
    pub total_clicks: u64,
}

impl StatsSummary {
    pub fn collect<'a>(records: impl IntoIterator<Item = &'a UrlRecord>, now: Timestamp) -> Self {
        records
            .into_iter()
            .fold(StatsSummary::default(), |mut summary, record| {
                summary.total_urls += 1;
                if record.is_expired(now) {
                    summary.expired_urls += 1;
                } else {
                    summary.active_urls += 1;
                }
                summary.total_clicks += record.click_count;
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;
    use snaplink_core::{RecordId, ShortCode};

    fn record(code: &str, created_min: i64, validity: u32, clicks: u64) -> UrlRecord {
        let created_at = Timestamp::from_second(1_700_000_000).unwrap()
            + SignedDuration::from_mins(created_min);
        UrlRecord {
            id: RecordId::new(),
            original_url: "https://example.com".into(),
            short_code: ShortCode::new_unchecked(code),
            created_at,
            expires_at: created_at + SignedDuration::from_mins(validity as i64),
            validity_minutes: validity,
            click_count: clicks,
            clicks: vec![],
        }
    }

    fn codes(records: &[UrlRecord]) -> Vec<&str> {
        records.iter().map(|r| r.short_code.as_str()).collect()
    }

    #[test]
    fn sorts() {
        let mut records = vec![
            record("first1", 0, 60, 2),
            record("second", 1, 10, 9),
            record("third1", 2, 30, 0),
        ];

        StatsSort::CreatedDesc.apply(&mut records);
        assert_eq!(codes(&records), ["third1", "second", "first1"]);

        StatsSort::ClicksDesc.apply(&mut records);
        assert_eq!(codes(&records), ["second", "first1", "third1"]);

        StatsSort::ExpiresAsc.apply(&mut records);
        assert_eq!(codes(&records), ["second", "third1", "first1"]);
    }

    #[test]
    fn summary_splits_active_and_expired() {
        let records = [record("live01", 0, 60, 3), record("dead01", 0, 5, 4)];
        let now = Timestamp::from_second(1_700_000_000).unwrap() + SignedDuration::from_mins(10);

        let summary = StatsSummary::collect(&records, now);

        assert_eq!(
            summary,
            StatsSummary {
                total_urls: 2,
                active_urls: 1,
                expired_urls: 1,
                total_clicks: 7,
            }
        );
        assert!(StatsFilter::Active.matches(&records[0], now));
        assert!(StatsFilter::Expired.matches(&records[1], now));
    }

    #[test]
    fn parses_query_names() {
        assert_eq!("clicks".parse::<StatsSort>().unwrap(), StatsSort::ClicksDesc);
        assert_eq!("expired".parse::<StatsFilter>().unwrap(), StatsFilter::Expired);
        assert!("oldest".parse::<StatsSort>().is_err());
    }
}
