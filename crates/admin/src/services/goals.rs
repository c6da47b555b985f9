//! Finance aggregations and sales-goal generation.
//!
//! Pure calendar/decimal arithmetic over order rows; the finance routes feed
//! it query results and persist what it produces.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rust_decimal::Decimal;

use crate::db::orders::RevenueRow;

/// First and last day of the month containing `today`.
#[must_use]
pub fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = today.with_day(1).unwrap_or(today);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month
        .map(|d| d - Duration::days(1))
        .unwrap_or(today);
    (first, last)
}

/// First and last day of the year containing `today`.
#[must_use]
pub fn year_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
    let last = NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today);
    (first, last)
}

/// Every day of the range, inclusive.
#[must_use]
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        days.push(day);
        day += Duration::days(1);
    }
    days
}

/// Last complete week (Monday through Sunday) before the week of `today`.
#[must_use]
pub fn last_week_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let days_from_monday = i64::from(today.weekday().num_days_from_monday());
    let this_monday = today - Duration::days(days_from_monday);
    let last_monday = this_monday - Duration::days(7);
    (last_monday, last_monday + Duration::days(6))
}

/// Sum of order totals.
#[must_use]
pub fn revenue_total(rows: &[RevenueRow]) -> Decimal {
    rows.iter().map(|r| r.total).sum()
}

/// Revenue per calendar day (UTC date of `created_at`).
#[must_use]
pub fn daily_revenue(rows: &[RevenueRow]) -> HashMap<NaiveDate, Decimal> {
    let mut map: HashMap<NaiveDate, Decimal> = HashMap::new();
    for row in rows {
        *map.entry(row.created_at.date_naive()).or_default() += row.total;
    }
    map
}

/// Revenue per weekday, the pattern auto-generated goals follow.
#[must_use]
pub fn weekday_revenue(rows: &[RevenueRow]) -> HashMap<Weekday, Decimal> {
    let mut map: HashMap<Weekday, Decimal> = HashMap::new();
    for row in rows {
        *map.entry(row.created_at.date_naive().weekday()).or_default() += row.total;
    }
    map
}

/// Project a weekday revenue pattern over a set of days, producing the daily
/// goal rows to persist. Days whose weekday earned nothing are skipped, so
/// an upsert never writes zero targets.
#[must_use]
pub fn project_goals(
    days: &[NaiveDate],
    pattern: &HashMap<Weekday, Decimal>,
) -> Vec<(NaiveDate, Decimal)> {
    days.iter()
        .filter_map(|day| {
            let amount = pattern.get(&day.weekday()).copied()?;
            (amount > Decimal::ZERO).then_some((*day, amount))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(y: i32, m: u32, d: u32, cents: i64) -> RevenueRow {
        RevenueRow {
            total: Decimal::new(cents, 2),
            created_at: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(
            month_bounds(date(2025, 2, 14)),
            (date(2025, 2, 1), date(2025, 2, 28))
        );
        assert_eq!(
            month_bounds(date(2024, 2, 14)),
            (date(2024, 2, 1), date(2024, 2, 29))
        );
        assert_eq!(
            month_bounds(date(2025, 12, 31)),
            (date(2025, 12, 1), date(2025, 12, 31))
        );
    }

    #[test]
    fn test_year_bounds() {
        assert_eq!(
            year_bounds(date(2025, 7, 10)),
            (date(2025, 1, 1), date(2025, 12, 31))
        );
    }

    #[test]
    fn test_days_between() {
        let days = days_between(date(2025, 1, 30), date(2025, 2, 2));
        assert_eq!(
            days,
            vec![
                date(2025, 1, 30),
                date(2025, 1, 31),
                date(2025, 2, 1),
                date(2025, 2, 2)
            ]
        );
    }

    #[test]
    fn test_last_week_range_from_wednesday() {
        // 2025-08-06 is a Wednesday; last week is Mon 28 Jul .. Sun 3 Aug.
        assert_eq!(
            last_week_range(date(2025, 8, 6)),
            (date(2025, 7, 28), date(2025, 8, 3))
        );
    }

    #[test]
    fn test_last_week_range_from_monday() {
        // From a Monday, last week ends yesterday.
        assert_eq!(
            last_week_range(date(2025, 8, 4)),
            (date(2025, 7, 28), date(2025, 8, 3))
        );
    }

    #[test]
    fn test_revenue_totals_and_daily() {
        let rows = vec![
            row(2025, 8, 1, 10_000),
            row(2025, 8, 1, 5_000),
            row(2025, 8, 2, 7_000),
        ];
        assert_eq!(revenue_total(&rows), Decimal::new(22_000, 2));

        let daily = daily_revenue(&rows);
        assert_eq!(daily[&date(2025, 8, 1)], Decimal::new(15_000, 2));
        assert_eq!(daily[&date(2025, 8, 2)], Decimal::new(7_000, 2));
    }

    #[test]
    fn test_project_goals_follows_weekday_pattern() {
        // Friday earned 150.00, Saturday 80.00 last week.
        let rows = vec![row(2025, 8, 1, 15_000), row(2025, 8, 2, 8_000)];
        let pattern = weekday_revenue(&rows);

        // Project over the first week of September 2025 (Mon 1st .. Sun 7th).
        let days = days_between(date(2025, 9, 1), date(2025, 9, 7));
        let goals = project_goals(&days, &pattern);

        // Only Friday the 5th and Saturday the 6th get targets.
        assert_eq!(
            goals,
            vec![
                (date(2025, 9, 5), Decimal::new(15_000, 2)),
                (date(2025, 9, 6), Decimal::new(8_000, 2)),
            ]
        );
    }

    #[test]
    fn test_project_goals_empty_pattern() {
        let days = days_between(date(2025, 9, 1), date(2025, 9, 7));
        assert!(project_goals(&days, &HashMap::new()).is_empty());
    }
}
