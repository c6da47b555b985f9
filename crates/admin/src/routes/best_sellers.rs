//! Best-seller report.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use tracing::instrument;

use reis_core::format_brl;

use crate::db::orders::OrderRepository;
use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::services::best_sellers::{self, BestSellerRow, SortKey};
use crate::services::goals;
use crate::state::AppState;

/// Report query params.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Window start (`YYYY-MM-DD`).
    pub start: Option<NaiveDate>,
    /// Window end (`YYYY-MM-DD`).
    pub end: Option<NaiveDate>,
    /// Quick range: `7d`, `month` or `year` (overrides start/end).
    pub range: Option<String>,
    /// `qty` or `revenue`.
    pub sort: Option<String>,
}

/// One ranked row of the report.
pub struct RankedProductView {
    pub name: String,
    pub image_url: Option<String>,
    pub total_quantity: i64,
    pub total_revenue: String,
    pub line_count: usize,
    /// Bar width relative to the leader, percent.
    pub quantity_pct: i32,
    pub revenue_pct: i32,
}

/// Best-seller report template.
#[derive(Template, WebTemplate)]
#[template(path = "finance/best_sellers.html")]
pub struct BestSellersTemplate {
    pub rows: Vec<RankedProductView>,
    pub start: String,
    pub end: String,
    pub sort: &'static str,
}

/// Resolve the reporting window from the query.
fn resolve_window(query: &ReportQuery, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    match query.range.as_deref() {
        Some("7d") => (today - Duration::days(6), today),
        Some("year") => goals::year_bounds(today),
        Some("month") => goals::month_bounds(today),
        _ => {
            let (month_start, month_end) = goals::month_bounds(today);
            (
                query.start.unwrap_or(month_start),
                query.end.unwrap_or(month_end),
            )
        }
    }
}

/// Best sellers inside a window, ranked by quantity or revenue.
#[instrument(skip(_admin, state))]
pub async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<BestSellersTemplate> {
    let today = Utc::now().date_naive();
    let (start, end) = resolve_window(&query, today);

    let window_start = Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0).unwrap_or_default());
    let window_end = Utc.from_utc_datetime(&end.and_hms_opt(23, 59, 59).unwrap_or_default());

    let sales = OrderRepository::new(state.pool())
        .sales_between(window_start, window_end)
        .await?;

    let sort_key = SortKey::from_param(query.sort.as_deref().unwrap_or_default());
    let mut rows = best_sellers::aggregate(&sales);
    best_sellers::sort(&mut rows, sort_key);

    let max_quantity = rows.iter().map(|r| r.total_quantity).max().unwrap_or(1).max(1);
    let max_revenue = rows
        .iter()
        .map(|r| r.total_revenue)
        .max()
        .unwrap_or_default();

    let rows = rows.iter().map(|row| rank_view(row, max_quantity, max_revenue)).collect();

    Ok(BestSellersTemplate {
        rows,
        start: start.to_string(),
        end: end.to_string(),
        sort: match sort_key {
            SortKey::Quantity => "qty",
            SortKey::Revenue => "revenue",
        },
    })
}

fn rank_view(
    row: &BestSellerRow,
    max_quantity: i64,
    max_revenue: rust_decimal::Decimal,
) -> RankedProductView {
    use rust_decimal::prelude::ToPrimitive;

    let quantity_pct =
        i32::try_from((row.total_quantity * 100 / max_quantity).clamp(5, 100)).unwrap_or(5);

    let revenue_pct = if max_revenue > rust_decimal::Decimal::ZERO {
        let ratio = (row.total_revenue * rust_decimal::Decimal::from(100)) / max_revenue;
        ratio.to_i32().unwrap_or(5).clamp(5, 100)
    } else {
        5
    };

    RankedProductView {
        name: row.name.clone(),
        image_url: row.image_url.clone(),
        total_quantity: row.total_quantity,
        total_revenue: format_brl(row.total_revenue),
        line_count: row.line_count,
        quantity_pct,
        revenue_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(range: Option<&str>, start: Option<&str>, end: Option<&str>) -> ReportQuery {
        ReportQuery {
            start: start.map(|s| s.parse().expect("date")),
            end: end.map(|s| s.parse().expect("date")),
            range: range.map(String::from),
            sort: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    #[test]
    fn test_resolve_window_defaults_to_month() {
        let today = date(2025, 8, 6);
        assert_eq!(
            resolve_window(&query(None, None, None), today),
            (date(2025, 8, 1), date(2025, 8, 31))
        );
    }

    #[test]
    fn test_resolve_window_quick_ranges() {
        let today = date(2025, 8, 6);
        assert_eq!(
            resolve_window(&query(Some("7d"), None, None), today),
            (date(2025, 7, 31), today)
        );
        assert_eq!(
            resolve_window(&query(Some("year"), None, None), today),
            (date(2025, 1, 1), date(2025, 12, 31))
        );
    }

    #[test]
    fn test_resolve_window_explicit_dates() {
        let today = date(2025, 8, 6);
        assert_eq!(
            resolve_window(
                &query(None, Some("2025-06-01"), Some("2025-06-15")),
                today
            ),
            (date(2025, 6, 1), date(2025, 6, 15))
        );
    }
}
