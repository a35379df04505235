use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::parser::Record;

/// How a week/county bucket is seeded by the first record carrying its key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeedPolicy {
    /// Every record adds its confirmed count, the first one included.
    #[default]
    Sum,
    /// The first record for a key contributes 1 instead of its count; later
    /// ones add their count. Matches the legacy report output.
    FirstSeedsOne,
}

impl SeedPolicy {
    fn seed(self, confirmed_count: u64) -> u64 {
        match self {
            SeedPolicy::Sum => confirmed_count,
            SeedPolicy::FirstSeedsOne => 1,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CaseStats {
    pub by_week: BTreeMap<u32, u64>,
    pub by_county: BTreeMap<String, u64>,
    pub total: u64,
}

impl CaseStats {
    pub fn from_records(records: &[Record], policy: SeedPolicy) -> Self {
        let mut s = CaseStats::default();

        for r in records {
            let count = u64::from(r.confirmed_count);
            accumulate(&mut s.by_week, r.week, count, policy);
            accumulate(&mut s.by_county, r.county.clone(), count, policy);

            // The total always takes the real count, whatever the seeding.
            s.total += count;
        }

        s
    }

    pub fn week_total(&self) -> u64 {
        self.by_week.values().sum()
    }

    pub fn county_total(&self) -> u64 {
        self.by_county.values().sum()
    }

    /// True when both breakdowns add up to the grand total.
    pub fn is_consistent(&self) -> bool {
        self.week_total() == self.total && self.county_total() == self.total
    }
}

fn accumulate<K: Ord>(map: &mut BTreeMap<K, u64>, key: K, count: u64, policy: SeedPolicy) {
    match map.entry(key) {
        Entry::Vacant(e) => {
            e.insert(policy.seed(count));
        }
        Entry::Occupied(mut e) => {
            *e.get_mut() += count;
        }
    }
}
