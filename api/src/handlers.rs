use askama::Template;
use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::market::{self, DASHBOARD_ASSETS};
use crate::queries;
use crate::templates::{
    format_money, AssetTemplate, AssetToggle, CoinOption, CorrelationTemplate, DashboardTemplate,
    MetricCard, QueriesTemplate, QueryLink, QueryResultTemplate, TopicGroup,
};
use crate::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "git_hash": env!("GIT_HASH"),
        "git_branch": env!("GIT_BRANCH"),
        "build_time": env!("BUILD_TIME"),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub start: Option<String>,
    pub end: Option<String>,
    pub assets: Option<String>,
}

fn parse_date(raw: &Option<String>) -> Option<NaiveDate> {
    raw.as_deref()
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
}

/// Asset labels the request opted into. No parameter means all four;
/// an explicitly empty parameter means none (everything unchecked).
fn selected_assets(params: &DashboardParams) -> Vec<String> {
    match params.assets.as_deref() {
        None => DASHBOARD_ASSETS.iter().map(|s| s.to_string()).collect(),
        Some(raw) => raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| DASHBOARD_ASSETS.contains(&s.as_str()))
            .collect(),
    }
}

fn metric_label(asset: &str) -> String {
    match asset {
        "BTC_INR" => "BTC Avg (INR)".to_string(),
        "Oil_INR" => "Oil Avg (INR)".to_string(),
        "SP500_INR" => "S&P 500 Avg".to_string(),
        "NIFTY_INR" => "NIFTY Avg".to_string(),
        other => format!("{} Avg", other),
    }
}

pub async fn dashboard_page(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> ApiResult<Html<String>> {
    let start = parse_date(&params.start);
    let end = parse_date(&params.end);
    let summary = market::market_summary(&state.pool, start, end).await?;
    let selected = selected_assets(&params);

    let dates: Vec<String> = summary.dates.iter().map(|d| d.to_string()).collect();
    let traces: Vec<Value> = summary
        .series
        .iter()
        .filter(|(name, _)| selected.contains(name))
        .map(|(name, values)| {
            json!({
                "x": dates,
                "y": values,
                "name": name,
                "type": "scatter",
                "mode": "lines",
            })
        })
        .collect();

    let metrics = summary
        .averages
        .iter()
        .map(|(name, avg)| MetricCard {
            label: metric_label(name),
            value: format!("₹{}", format_money(*avg)),
        })
        .collect();

    let mut table_columns = vec!["Entry_Date".to_string()];
    table_columns.extend(DASHBOARD_ASSETS.iter().map(|s| s.to_string()));
    let table_rows = summary
        .dates
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let mut row = vec![date.to_string()];
            row.extend(summary.series.iter().map(|(_, values)| format!("{:.2}", values[i])));
            row
        })
        .collect();

    let template = DashboardTemplate {
        start: params.start.unwrap_or_default(),
        end: params.end.unwrap_or_default(),
        asset_toggles: DASHBOARD_ASSETS
            .iter()
            .map(|name| AssetToggle {
                name: name.to_string(),
                checked: selected.contains(&name.to_string()),
            })
            .collect(),
        metrics,
        chart_json: serde_json::to_string(&traces)?,
        table_columns,
        table_rows,
    };
    Ok(Html(template.render().map_err(anyhow::Error::from)?))
}

pub async fn asset_page(
    State(state): State<AppState>,
    Path(coin_id): Path<String>,
) -> ApiResult<Html<String>> {
    let coins = market::coin_listings(&state.pool).await?;
    let listing = coins
        .iter()
        .find(|c| c.coin_id == coin_id)
        .ok_or_else(|| ApiError::not_found(format!("coin '{}'", coin_id)))?;
    let coin_name = listing.name.clone();

    let series = market::coin_series(&state.pool, &coin_id).await?;
    let trace = json!([{
        "x": series.iter().map(|(d, _)| d.to_string()).collect::<Vec<_>>(),
        "y": series.iter().map(|(_, p)| *p).collect::<Vec<_>>(),
        "name": coin_name,
        "type": "scatter",
        "mode": "lines",
        "fill": "tozeroy",
    }]);

    let template = AssetTemplate {
        coin_name,
        coins: coins
            .into_iter()
            .map(|c| CoinOption {
                selected: c.coin_id == coin_id,
                coin_id: c.coin_id,
                name: c.name,
            })
            .collect(),
        chart_json: serde_json::to_string(&trace)?,
    };
    Ok(Html(template.render().map_err(anyhow::Error::from)?))
}

pub async fn correlation_page(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let (labels, matrix) = market::correlation(&state.pool).await?;
    let trace = json!([{
        "z": matrix,
        "x": labels,
        "y": labels,
        "type": "heatmap",
        "colorscale": "Viridis",
        "zmin": -1.0,
        "zmax": 1.0,
    }]);
    let template = CorrelationTemplate {
        chart_json: serde_json::to_string(&trace)?,
    };
    Ok(Html(template.render().map_err(anyhow::Error::from)?))
}

pub async fn queries_page() -> ApiResult<Html<String>> {
    let groups = queries::TOPICS
        .iter()
        .map(|topic| TopicGroup {
            topic: topic.to_string(),
            queries: queries::by_topic(topic)
                .into_iter()
                .map(|q| QueryLink {
                    id: q.id.to_string(),
                    title: q.title.to_string(),
                })
                .collect(),
        })
        .collect();
    let template = QueriesTemplate { groups };
    Ok(Html(template.render().map_err(anyhow::Error::from)?))
}

pub async fn query_run_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Html<String>> {
    let query =
        queries::find(&id).ok_or_else(|| ApiError::not_found(format!("query '{}'", id)))?;
    let result = queries::run(&state.pool, query).await?;
    let template = QueryResultTemplate {
        title: query.title.to_string(),
        sql: query.sql.to_string(),
        columns: result.columns,
        rows: result.rows,
    };
    Ok(Html(template.render().map_err(anyhow::Error::from)?))
}

pub async fn market_summary_json(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> ApiResult<Json<Value>> {
    let summary =
        market::market_summary(&state.pool, parse_date(&params.start), parse_date(&params.end))
            .await?;
    Ok(Json(json!({
        "dates": summary.dates,
        "series": summary.series.iter().map(|(name, values)| json!({
            "name": name,
            "values": values,
        })).collect::<Vec<_>>(),
        "averages": summary.averages.iter().cloned().collect::<std::collections::BTreeMap<String, f64>>(),
    })))
}

pub async fn asset_series_json(
    State(state): State<AppState>,
    Path(coin_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let series = market::coin_series(&state.pool, &coin_id).await?;
    if series.is_empty() {
        return Err(ApiError::not_found(format!("coin '{}'", coin_id)));
    }
    Ok(Json(json!({
        "coin_id": coin_id,
        "points": series.iter().map(|(d, p)| json!({ "date": d, "price": p })).collect::<Vec<_>>(),
    })))
}

pub async fn correlation_json(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let (labels, matrix) = market::correlation(&state.pool).await?;
    Ok(Json(json!({ "labels": labels, "matrix": matrix })))
}

pub async fn queries_json() -> Json<Value> {
    Json(json!({
        "topics": queries::TOPICS,
        "queries": queries::CATALOG.iter().map(|q| json!({
            "id": q.id,
            "topic": q.topic,
            "title": q.title,
        })).collect::<Vec<_>>(),
    }))
}

pub async fn query_run_json(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let query =
        queries::find(&id).ok_or_else(|| ApiError::not_found(format!("query '{}'", id)))?;
    let result = queries::run(&state.pool, query).await?;
    Ok(Json(json!({
        "id": query.id,
        "title": query.title,
        "columns": result.columns,
        "rows": result.rows,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(&Some("2025-01-15".to_string())),
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
        assert_eq!(parse_date(&Some("".to_string())), None);
        assert_eq!(parse_date(&Some("not-a-date".to_string())), None);
        assert_eq!(parse_date(&None), None);
    }

    #[test]
    fn test_selected_assets_defaults_to_all() {
        let params = DashboardParams::default();
        assert_eq!(selected_assets(&params).len(), 4);
    }

    #[test]
    fn test_selected_assets_empty_param_means_none() {
        let params = DashboardParams {
            assets: Some(String::new()),
            ..Default::default()
        };
        assert!(selected_assets(&params).is_empty());
    }

    #[test]
    fn test_selected_assets_filters_unknown() {
        let params = DashboardParams {
            assets: Some("BTC_INR,bogus,Oil_INR".to_string()),
            ..Default::default()
        };
        assert_eq!(selected_assets(&params), vec!["BTC_INR", "Oil_INR"]);
    }
}
