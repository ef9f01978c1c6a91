use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::calendar::{CalendarStore, DayRecord, ENERGY_KEY};
use crate::category::MenuItem;
use crate::period::{days_in_month, first_weekday_offset};

/// Placeholder badge for days whose totals carry no usable energy value.
pub const FALLBACK_CALORIES: u32 = 650;

/// Which month a grid cell belongs to relative to the displayed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellScope {
    Previous,
    Current,
    Next,
}

/// One cell of the month view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub day: u8,
    /// Column in a Sunday-started row (0 = Sunday).
    pub weekday: u8,
    pub scope: CellScope,
    pub is_today: bool,
    pub items: Vec<MenuItem>,
    pub calories: Option<u32>,
}

/// A month view: `weeks * 7` cells, padded with the neighbor months' days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u8,
    pub cells: Vec<GridCell>,
}

impl MonthGrid {
    pub fn weeks(&self) -> usize {
        self.cells.len() / 7
    }
}

/// Projects the store onto a Sunday-started month grid.
///
/// The store is read only; days absent from it project to empty cells.
/// Rows are whole weeks, so the grid starts with the previous month's
/// trailing days and ends with the next month's leading days whenever the
/// month does not align with a Sunday.
pub fn build_month_grid(year: i32, month: Month, store: &CalendarStore, today: Date) -> MonthGrid {
    let first = usize::from(first_weekday_offset(year, month));
    let length = usize::from(days_in_month(year, month));

    let (prev_year, prev_month) = match month {
        Month::January => (year - 1, Month::December),
        _ => (year, month.previous()),
    };
    let prev_length = usize::from(days_in_month(prev_year, prev_month));

    let total_cells = (first + length).div_ceil(7) * 7;
    let mut cells = Vec::with_capacity(total_cells);

    for i in 0..total_cells {
        let weekday = (i % 7) as u8;

        if i < first {
            cells.push(GridCell {
                day: (prev_length - first + i + 1) as u8,
                weekday,
                scope: CellScope::Previous,
                is_today: false,
                items: Vec::new(),
                calories: None,
            });
        } else if i - first < length {
            let day = (i - first + 1) as u8;
            let date = Date::from_calendar_date(year, month, day).ok();
            let record = date.and_then(|date| store.day(date));

            cells.push(GridCell {
                day,
                weekday,
                scope: CellScope::Current,
                is_today: date == Some(today),
                items: record.map(|record| record.items.clone()).unwrap_or_default(),
                calories: record.and_then(calorie_badge),
            });
        } else {
            cells.push(GridCell {
                day: (i - first - length + 1) as u8,
                weekday,
                scope: CellScope::Next,
                is_today: false,
                items: Vec::new(),
                calories: None,
            });
        }
    }

    MonthGrid {
        year,
        month: month as u8,
        cells,
    }
}

/// Badge for one stored day: the rounded energy total when it is present,
/// non-zero and rounds to at least 1, otherwise the placeholder for days
/// that do have dishes.
fn calorie_badge(record: &DayRecord) -> Option<u32> {
    match record.totals.get(ENERGY_KEY) {
        Some(&energy) if energy != 0.0 => {
            let rounded = energy.round();
            (rounded >= 1.0).then_some(rounded as u32)
        }
        _ if !record.items.is_empty() => Some(FALLBACK_CALORIES),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{DailyTotals, DaySlot};
    use crate::category::RawMenuItem;
    use crate::period::PeriodSelector;
    use time::macros::date;

    fn resolved(value: &str) -> crate::period::ResolvedPeriod {
        PeriodSelector::parse(value).unwrap().resolve().unwrap()
    }

    fn slot_with_energy(names: &[&str], energy: Option<f64>) -> DaySlot {
        DaySlot {
            items: names
                .iter()
                .map(|name| RawMenuItem {
                    name: name.to_string(),
                    source_category: None,
                    item_id: None,
                })
                .collect(),
            totals: energy
                .map(|value| DailyTotals::from([(ENERGY_KEY.to_string(), value)]))
                .unwrap_or_default(),
        }
    }

    #[test]
    fn february_2026_fills_exactly_four_rows() {
        // February 2026 starts on a Sunday and has 28 days.
        let grid = build_month_grid(
            2026,
            Month::February,
            &CalendarStore::new(),
            date!(2026 - 02 - 03),
        );

        assert_eq!(grid.cells.len(), 28);
        assert_eq!(grid.weeks(), 4);
        assert!(grid.cells.iter().all(|cell| cell.scope == CellScope::Current));
        assert_eq!(grid.cells[0].day, 1);
        assert_eq!(grid.cells[0].weekday, 0);
        assert_eq!(grid.cells[27].day, 28);
    }

    #[test]
    fn april_2026_pads_both_ends() {
        // April 2026 starts on a Wednesday; March has 31 days.
        let grid = build_month_grid(
            2026,
            Month::April,
            &CalendarStore::new(),
            date!(2026 - 02 - 03),
        );

        assert_eq!(grid.cells.len(), 35);
        assert_eq!(grid.weeks(), 5);

        assert_eq!(grid.cells[0].scope, CellScope::Previous);
        assert_eq!(grid.cells[0].day, 29);
        assert_eq!(grid.cells[2].day, 31);

        assert_eq!(grid.cells[3].scope, CellScope::Current);
        assert_eq!(grid.cells[3].day, 1);

        assert_eq!(grid.cells[33].scope, CellScope::Next);
        assert_eq!(grid.cells[33].day, 1);
        assert_eq!(grid.cells[34].day, 2);
    }

    #[test]
    fn january_borrows_from_the_previous_year() {
        // January 2026 starts on a Thursday; December 2025 has 31 days.
        let grid = build_month_grid(
            2026,
            Month::January,
            &CalendarStore::new(),
            date!(2026 - 02 - 03),
        );

        assert_eq!(grid.cells[0].scope, CellScope::Previous);
        assert_eq!(grid.cells[0].day, 28);
        assert_eq!(grid.cells[3].day, 31);
        assert_eq!(grid.cells[4].scope, CellScope::Current);
        assert_eq!(grid.cells[4].day, 1);
    }

    #[test]
    fn cells_carry_stored_items_and_badges() {
        let mut store = CalendarStore::new();
        let week = resolved("2026-3-9");
        store.merge(
            &week,
            vec![slot_with_energy(&["とんかつ", "牛乳"], Some(612.3))],
            week.slot_limit(),
        );

        let grid = build_month_grid(2026, Month::March, &store, date!(2026 - 03 - 09));

        // March 2026 starts on a Sunday, so day 9 sits at index 8.
        let cell = &grid.cells[8];
        assert_eq!(cell.day, 9);
        assert_eq!(cell.scope, CellScope::Current);
        assert!(cell.is_today);
        assert_eq!(cell.items.len(), 2);
        assert_eq!(cell.items[0].display_name, "とんかつ");
        assert_eq!(cell.calories, Some(612));

        let empty = &grid.cells[9];
        assert!(empty.items.is_empty());
        assert_eq!(empty.calories, None);
        assert!(!empty.is_today);
    }

    #[test]
    fn badge_falls_back_to_placeholder_without_energy() {
        let mut store = CalendarStore::new();
        let week = resolved("2026-3-9");
        store.merge(
            &week,
            vec![
                slot_with_energy(&["とんかつ"], None),
                slot_with_energy(&["カレーライス"], Some(0.0)),
                slot_with_energy(&["オムレツ"], Some(0.4)),
            ],
            week.slot_limit(),
        );

        let grid = build_month_grid(2026, Month::March, &store, date!(2026 - 03 - 01));

        // No energy key at all: placeholder.
        assert_eq!(grid.cells[8].calories, Some(FALLBACK_CALORIES));
        // Zero energy counts as absent: placeholder again.
        assert_eq!(grid.cells[9].calories, Some(FALLBACK_CALORIES));
        // Present but rounding to zero: no badge, no placeholder.
        assert_eq!(grid.cells[10].calories, None);
    }

    #[test]
    fn projection_leaves_the_store_untouched() {
        let mut store = CalendarStore::new();
        let week = resolved("2026-3-9");
        store.merge(
            &week,
            vec![slot_with_energy(&["とんかつ"], Some(612.0))],
            week.slot_limit(),
        );
        let before = store.clone();

        let first = build_month_grid(2026, Month::March, &store, date!(2026 - 03 - 09));
        let second = build_month_grid(2026, Month::March, &store, date!(2026 - 03 - 09));

        assert_eq!(first, second);
        assert_eq!(store, before);
    }
}
