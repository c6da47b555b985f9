//! Finance dashboard: revenue totals and daily sales goals.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use tower_sessions::Session;
use tracing::instrument;

use reis_core::format_brl;

use crate::db::goals::GoalRepository;
use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::{set_flash, take_flash};
use crate::services::goals;
use crate::state::AppState;

/// One day row of the goals table.
pub struct DayGoalView {
    /// Form field name (`goal_2025-08-06`).
    pub field: String,
    pub label: String,
    pub sold: String,
    pub target: String,
    /// Whether the day's revenue met its target.
    pub reached: bool,
}

/// Finance dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "finance/index.html")]
pub struct FinanceTemplate {
    pub month_label: String,
    pub month_total: String,
    pub year_total: String,
    pub month_goal_total: String,
    pub days: Vec<DayGoalView>,
    pub flash: Option<String>,
}

/// UTC window covering a local date range (whole days, inclusive).
fn day_range_utc(start: NaiveDate, end: NaiveDate) -> (chrono::DateTime<Utc>, chrono::DateTime<Utc>) {
    let start_dt = start.and_hms_opt(0, 0, 0).unwrap_or_default();
    let end_dt = end.and_hms_opt(23, 59, 59).unwrap_or_default();
    (
        Utc.from_utc_datetime(&start_dt),
        Utc.from_utc_datetime(&end_dt),
    )
}

/// Finance dashboard: month and year revenue plus the per-day goal table.
#[instrument(skip(_admin, state, session))]
pub async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<FinanceTemplate> {
    let today = Utc::now().date_naive();
    let (month_start, month_end) = goals::month_bounds(today);
    let (year_start, year_end) = goals::year_bounds(today);

    let orders = OrderRepository::new(state.pool());
    let (month_window_start, month_window_end) = day_range_utc(month_start, month_end);
    let (year_window_start, year_window_end) = day_range_utc(year_start, year_end);

    let month_rows = orders
        .revenue_rows_between(month_window_start, month_window_end)
        .await?;
    let year_rows = orders
        .revenue_rows_between(year_window_start, year_window_end)
        .await?;

    let goal_rows = GoalRepository::new(state.pool())
        .between(month_start, month_end)
        .await?;
    let targets: HashMap<NaiveDate, Decimal> = goal_rows
        .iter()
        .map(|g| (g.goal_date, g.target_amount))
        .collect();

    let daily = goals::daily_revenue(&month_rows);
    let month_goal_total: Decimal = targets.values().copied().sum();

    let days = goals::days_between(month_start, month_end)
        .into_iter()
        .map(|day| {
            let sold = daily.get(&day).copied().unwrap_or_default();
            let target = targets.get(&day).copied();
            DayGoalView {
                field: format!("goal_{day}"),
                label: day.format("%d/%m (%a)").to_string(),
                sold: format_brl(sold),
                target: target.map(|t| format!("{t:.2}")).unwrap_or_default(),
                reached: target.is_some_and(|t| sold >= t && t > Decimal::ZERO),
            }
        })
        .collect();

    Ok(FinanceTemplate {
        month_label: today.format("%m/%Y").to_string(),
        month_total: format_brl(goals::revenue_total(&month_rows)),
        year_total: format_brl(goals::revenue_total(&year_rows)),
        month_goal_total: format_brl(month_goal_total),
        days,
        flash: take_flash(&session).await,
    })
}

/// Upsert the daily goals typed into the table.
///
/// Fields arrive as `goal_<date>=<amount>`; empty and zero amounts are
/// skipped, matching "nothing to save" semantics.
#[instrument(skip(admin, state, session, pairs))]
pub async fn save_goals(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let mut rows: Vec<(NaiveDate, Decimal)> = Vec::new();

    for (key, value) in &pairs {
        let Some(date_part) = key.strip_prefix("goal_") else {
            continue;
        };
        let Ok(date) = date_part.parse::<NaiveDate>() else {
            continue;
        };
        let raw = value.trim().replace(',', ".");
        if raw.is_empty() {
            continue;
        }
        let amount = raw
            .parse::<Decimal>()
            .map_err(|_| AppError::BadRequest(format!("Meta inválida para {date}")))?;
        if amount > Decimal::ZERO {
            rows.push((date, amount));
        }
    }

    if rows.is_empty() {
        set_flash(&session, "Nada para salvar").await;
        return Ok(Redirect::to("/finance").into_response());
    }

    GoalRepository::new(state.pool())
        .upsert_many(&rows, admin.id)
        .await?;

    set_flash(&session, "Metas salvas com sucesso").await;
    Ok(Redirect::to("/finance").into_response())
}

/// Generate this month's goals from last week's revenue-by-weekday pattern.
#[instrument(skip(admin, state, session))]
pub async fn auto_goals(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Response> {
    let today = Utc::now().date_naive();
    let (week_start, week_end) = goals::last_week_range(today);
    let (window_start, window_end) = day_range_utc(week_start, week_end);

    let rows = OrderRepository::new(state.pool())
        .revenue_rows_between(window_start, window_end)
        .await?;

    let pattern = goals::weekday_revenue(&rows);
    if pattern.is_empty() {
        set_flash(&session, "Não há vendas na última semana para gerar metas.").await;
        return Ok(Redirect::to("/finance").into_response());
    }

    let (month_start, month_end) = goals::month_bounds(today);
    let projected = goals::project_goals(&goals::days_between(month_start, month_end), &pattern);

    GoalRepository::new(state.pool())
        .upsert_many(&projected, admin.id)
        .await?;

    set_flash(
        &session,
        "Metas automáticas geradas com base na última semana.",
    )
    .await;
    Ok(Redirect::to("/finance").into_response())
}
