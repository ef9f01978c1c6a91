use serde::Serialize;
use strum::{AsRefStr, Display, EnumString};
use time::{Date, Duration, Month};

use crate::error::MenuError;

/// Number of days a one-week plan covers (Monday through Friday).
pub const WEEK_SLOT_COUNT: u8 = 5;

/// How many upcoming weeks are offered for selection.
const UPCOMING_WEEKS: usize = 16;

#[derive(
    EnumString, Display, AsRefStr, Clone, Copy, Debug, PartialEq, Eq, Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Week,
    Month,
}

/// A generation target chosen by the user, parsed from the encoded form
/// the selection list produces: `"YYYY-M-D"` for a week anchored on that
/// day, `"YYYY-M-1-month"` for a whole month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodSelector {
    Week { monday: Date },
    Month { year: i32, month: Month },
}

impl PeriodSelector {
    pub fn parse(value: &str) -> Result<Self, MenuError> {
        let parts: Vec<&str> = value.split('-').collect();

        match parts.as_slice() {
            [year, month, day] => {
                let year = parse_component(year, value)?;
                let month = month_component(month, value)?;
                let day = parse_component(day, value)?;
                let monday = Date::from_calendar_date(year, month, day)
                    .map_err(|_| invalid(value))?;

                Ok(Self::Week { monday })
            }
            [year, month, "1", "month"] => {
                let year = parse_component(year, value)?;
                let month = month_component(month, value)?;

                Ok(Self::Month { year, month })
            }
            _ => Err(invalid(value)),
        }
    }

    pub fn resolve(&self) -> Result<ResolvedPeriod, MenuError> {
        match *self {
            Self::Week { monday } => Ok(ResolvedPeriod {
                kind: PeriodKind::Week,
                start: monday,
                day_count: WEEK_SLOT_COUNT,
                week_index: Some(week_index_in_month(monday)),
            }),
            Self::Month { year, month } => {
                let start = Date::from_calendar_date(year, month, 1)
                    .map_err(|_| invalid(&format!("{year}-{}", month as u8)))?;

                Ok(ResolvedPeriod {
                    kind: PeriodKind::Month,
                    start,
                    day_count: days_in_month(year, month),
                    week_index: None,
                })
            }
        }
    }
}

/// A resolved generation span: the first calendar day, how many consecutive
/// days the plan covers, and for weeks the week number within the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPeriod {
    pub kind: PeriodKind,
    pub start: Date,
    pub day_count: u8,
    pub week_index: Option<u8>,
}

impl ResolvedPeriod {
    /// First day of the targeted month in the solver's `YYYY-MM-01` form.
    pub fn target_year_month(&self) -> String {
        format!("{:04}-{:02}-01", self.start.year(), self.start.month() as u8)
    }

    /// How many day slots of a generated batch this period may consume.
    pub fn slot_limit(&self) -> usize {
        match self.kind {
            PeriodKind::Week => usize::from(WEEK_SLOT_COUNT),
            PeriodKind::Month => usize::from(self.day_count),
        }
    }
}

/// Week number of `date` within its month, counting Sunday-started rows.
/// Clamped to 1..=5 so a month ending in a sixth row folds into the fifth.
pub fn week_index_in_month(date: Date) -> u8 {
    let first = first_weekday_offset(date.year(), date.month());
    let index = (u16::from(date.day()) + u16::from(first) - 1) / 7 + 1;

    index.clamp(1, 5) as u8
}

/// True length of a month in days, leap-aware.
pub fn days_in_month(year: i32, month: Month) -> u8 {
    month.length(year)
}

/// Column of the month's first day in a Sunday-started row (0 = Sunday).
pub(crate) fn first_weekday_offset(year: i32, month: Month) -> u8 {
    match Date::from_calendar_date(year, month, 1) {
        Ok(first) => first.weekday().number_days_from_sunday(),
        Err(_) => 0,
    }
}

/// One selectable generation target, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodOption {
    pub value: String,
    pub label: String,
    pub kind: PeriodKind,
    pub day_count: u8,
}

/// Selectable periods seen from `today`: the current and next fifteen
/// weeks (anchored on their Mondays), then the two following whole months.
pub fn upcoming_periods(today: Date) -> Vec<PeriodOption> {
    let days_since_monday = i64::from(today.weekday().number_days_from_monday());
    let current_monday = today - Duration::days(days_since_monday);

    let mut options = Vec::with_capacity(UPCOMING_WEEKS + 2);

    for i in 0..UPCOMING_WEEKS {
        let monday = current_monday + Duration::weeks(i as i64);
        let friday = monday + Duration::days(4);

        options.push(PeriodOption {
            value: format!(
                "{}-{}-{}",
                monday.year(),
                monday.month() as u8,
                monday.day()
            ),
            label: format!(
                "{}年{}月{}日週 ({}/{} - {}/{})",
                monday.year(),
                monday.month() as u8,
                monday.day(),
                monday.month() as u8,
                monday.day(),
                friday.month() as u8,
                friday.day()
            ),
            kind: PeriodKind::Week,
            day_count: WEEK_SLOT_COUNT,
        });
    }

    let mut year = today.year();
    let mut month = today.month();

    for _ in 0..2 {
        month = month.next();
        if month == Month::January {
            year += 1;
        }
        let length = days_in_month(year, month);

        options.push(PeriodOption {
            value: format!("{}-{}-1-month", year, month as u8),
            label: format!("{}年{}月 (1ヶ月分・{}日間)", year, month as u8, length),
            kind: PeriodKind::Month,
            day_count: length,
        });
    }

    options
}

fn invalid(value: &str) -> MenuError {
    MenuError::InvalidSelection(value.to_string())
}

fn parse_component<T: std::str::FromStr>(part: &str, value: &str) -> Result<T, MenuError> {
    part.parse().map_err(|_| invalid(value))
}

fn month_component(part: &str, value: &str) -> Result<Month, MenuError> {
    let number: u8 = parse_component(part, value)?;
    Month::try_from(number).map_err(|_| invalid(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parses_week_selector() {
        let selector = PeriodSelector::parse("2026-3-9").unwrap();

        assert_eq!(
            selector,
            PeriodSelector::Week {
                monday: date!(2026 - 03 - 09)
            }
        );
    }

    #[test]
    fn parses_month_selector() {
        let selector = PeriodSelector::parse("2026-4-1-month").unwrap();

        assert_eq!(
            selector,
            PeriodSelector::Month {
                year: 2026,
                month: Month::April
            }
        );
    }

    #[test]
    fn rejects_malformed_selectors() {
        for value in [
            "",
            "today",
            "2026",
            "2026-13-1",
            "2026-2-30",
            "2026-4-2-month",
            "2026-4-1-week",
            "2026-4-1-month-extra",
        ] {
            assert!(
                PeriodSelector::parse(value).is_err(),
                "expected rejection for {value:?}"
            );
        }
    }

    #[test]
    fn resolves_week_to_five_days() {
        let period = PeriodSelector::parse("2026-3-9").unwrap().resolve().unwrap();

        assert_eq!(period.kind, PeriodKind::Week);
        assert_eq!(period.start, date!(2026 - 03 - 09));
        assert_eq!(period.day_count, 5);
        assert_eq!(period.week_index, Some(2));
        assert_eq!(period.slot_limit(), 5);
        assert_eq!(period.target_year_month(), "2026-03-01");
    }

    #[test]
    fn resolves_month_to_true_length() {
        let february = PeriodSelector::parse("2026-2-1-month")
            .unwrap()
            .resolve()
            .unwrap();
        assert_eq!(february.day_count, 28);
        assert_eq!(february.start, date!(2026 - 02 - 01));
        assert_eq!(february.week_index, None);
        assert_eq!(february.slot_limit(), 28);

        let leap_february = PeriodSelector::parse("2024-2-1-month")
            .unwrap()
            .resolve()
            .unwrap();
        assert_eq!(leap_february.day_count, 29);

        let april = PeriodSelector::parse("2026-4-1-month")
            .unwrap()
            .resolve()
            .unwrap();
        assert_eq!(april.day_count, 30);
        assert_eq!(april.target_year_month(), "2026-04-01");
    }

    #[test]
    fn week_index_counts_sunday_started_rows() {
        // March 2026 begins on a Sunday, so day 9 sits in the second row.
        assert_eq!(week_index_in_month(date!(2026 - 03 - 09)), 2);
        assert_eq!(week_index_in_month(date!(2026 - 03 - 01)), 1);
        assert_eq!(week_index_in_month(date!(2026 - 03 - 30)), 5);

        // April 2026 begins on a Wednesday.
        assert_eq!(week_index_in_month(date!(2026 - 04 - 01)), 1);
        assert_eq!(week_index_in_month(date!(2026 - 04 - 06)), 2);
    }

    #[test]
    fn week_index_clamps_a_sixth_row() {
        // May 2026 begins on a Friday; May 31 lands in a sixth row.
        assert_eq!(week_index_in_month(date!(2026 - 05 - 31)), 5);
    }

    #[test]
    fn upcoming_periods_lists_sixteen_weeks_then_two_months() {
        let options = upcoming_periods(date!(2026 - 02 - 03));

        assert_eq!(options.len(), 18);

        assert_eq!(options[0].value, "2026-2-2");
        assert_eq!(options[0].label, "2026年2月2日週 (2/2 - 2/6)");
        assert_eq!(options[0].kind, PeriodKind::Week);
        assert_eq!(options[0].day_count, 5);

        assert_eq!(options[15].value, "2026-5-18");

        assert_eq!(options[16].value, "2026-3-1-month");
        assert_eq!(options[16].label, "2026年3月 (1ヶ月分・31日間)");
        assert_eq!(options[16].day_count, 31);

        assert_eq!(options[17].value, "2026-4-1-month");
        assert_eq!(options[17].label, "2026年4月 (1ヶ月分・30日間)");
        assert_eq!(options[17].day_count, 30);
    }

    #[test]
    fn upcoming_periods_rolls_months_across_year_end() {
        let options = upcoming_periods(date!(2025 - 12 - 10));

        assert_eq!(options[0].value, "2025-12-8");
        assert_eq!(options[16].value, "2026-1-1-month");
        assert_eq!(options[16].label, "2026年1月 (1ヶ月分・31日間)");
        assert_eq!(options[17].value, "2026-2-1-month");
        assert_eq!(options[17].label, "2026年2月 (1ヶ月分・28日間)");
    }

    #[test]
    fn week_options_round_trip_through_parse() {
        for option in upcoming_periods(date!(2026 - 02 - 03)) {
            let period = PeriodSelector::parse(&option.value)
                .unwrap()
                .resolve()
                .unwrap();
            assert_eq!(period.day_count, option.day_count);
            assert_eq!(period.kind, option.kind);
        }
    }
}
