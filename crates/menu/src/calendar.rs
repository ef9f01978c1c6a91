use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::category::{MenuItem, RawMenuItem, classify_day};
use crate::period::ResolvedPeriod;

/// Nutrient totals for one day, keyed by the solver's nutrient names.
pub type DailyTotals = BTreeMap<String, f64>;

/// Totals key carrying the day's energy in kcal.
pub const ENERGY_KEY: &str = "エネルギー";

/// One generated day before classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DaySlot {
    pub items: Vec<RawMenuItem>,
    pub totals: DailyTotals,
}

/// One stored calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub items: Vec<MenuItem>,
    pub totals: DailyTotals,
}

/// The assembled menu calendar, one record per date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarStore {
    days: BTreeMap<Date, DayRecord>,
}

impl CalendarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a generated batch into the calendar.
    ///
    /// Slot `i` lands on `period.start` plus `i` days, so a batch may spill
    /// into the next month or year. At most `slot_limit` slots are
    /// consumed. Each day is replaced wholesale, never blended, which makes
    /// re-merging an identical batch idempotent. Returns the number of days
    /// written.
    pub fn merge(
        &mut self,
        period: &ResolvedPeriod,
        batch: Vec<DaySlot>,
        slot_limit: usize,
    ) -> usize {
        let mut written = 0;

        for (offset, slot) in batch.into_iter().take(slot_limit).enumerate() {
            let Some(date) = period.start.checked_add(Duration::days(offset as i64)) else {
                tracing::warn!(
                    start = ?period.start,
                    offset,
                    "merge target out of calendar range"
                );
                break;
            };

            self.days.insert(
                date,
                DayRecord {
                    items: classify_day(slot.items),
                    totals: slot.totals,
                },
            );
            written += 1;
        }

        written
    }

    pub fn day(&self, date: Date) -> Option<&DayRecord> {
        self.days.get(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
