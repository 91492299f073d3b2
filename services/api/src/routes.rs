use crate::infra::{deserialize_optional_date, AppState, SettlementState};
use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Extension;
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use sumerplus::error::AppError;
use sumerplus::workflows::pricing::{
    estimate, jurisdiction_options, Estimate, EstimateRequest, ESTIMATE_DISCLAIMER,
};
use sumerplus::workflows::questionnaire::{questionnaire_router, Notifier, QuestionnaireService};
use sumerplus::workflows::settlement::{
    generate_statements, normalize_unit, parse_roster, select_load_sheet, BatchOptions, Cell,
    DeductionRecord, DocumentFailure, DriverRate, LoadRecord, PartyRole, RateBook, Roster,
    RowIssue, StatementStats, WorkPeriod, Workbook, WorkbookPayload,
};
use tracing::warn;

pub(crate) fn with_service_routes<N>(questionnaires: Arc<QuestionnaireService<N>>) -> axum::Router
where
    N: Notifier + 'static,
{
    questionnaire_router(questionnaires)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/estimates", post(estimate_endpoint))
        .route("/api/v1/estimates/jurisdictions", get(jurisdictions_endpoint))
        .route("/api/v1/statements", post(statements_endpoint))
        .route("/api/v1/statements/sheets", post(sheets_endpoint))
        .route("/api/v1/statements/roster", post(roster_endpoint))
        .route(
            "/api/v1/driver-config",
            post(save_driver_config).get(list_driver_configs),
        )
        .route("/api/v1/driver-config/:unit", get(fetch_driver_config))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Serialize)]
pub(crate) struct EstimateResponse {
    pub(crate) estimate: Estimate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) deposit_note: Option<&'static str>,
    pub(crate) disclaimer: &'static str,
}

pub(crate) async fn estimate_endpoint(Json(request): Json<EstimateRequest>) -> Json<EstimateResponse> {
    let estimate = estimate(&request);
    Json(EstimateResponse {
        deposit_note: estimate.quote().map(|quote| quote.deposit_note()),
        estimate,
        disclaimer: ESTIMATE_DISCLAIMER,
    })
}

pub(crate) async fn jurisdictions_endpoint() -> Json<Vec<&'static str>> {
    Json(jurisdiction_options())
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatementsRequest {
    #[serde(flatten)]
    pub(crate) workbook: WorkbookPayload,
    #[serde(default)]
    pub(crate) load_sheet: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatementDocumentView {
    pub(crate) name: String,
    pub(crate) role: PartyRole,
    pub(crate) unit: Option<String>,
    pub(crate) stats: StatementStats,
    pub(crate) pdf_base64: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatementsResponse {
    pub(crate) summary: String,
    pub(crate) period: WorkPeriod,
    pub(crate) load_sheet: String,
    pub(crate) documents: Vec<StatementDocumentView>,
    pub(crate) failures: Vec<DocumentFailure>,
    pub(crate) unmatched_loads: Vec<LoadRecord>,
    pub(crate) unmatched_deductions: Vec<DeductionRecord>,
    pub(crate) skipped_rows: Vec<RowIssue>,
}

pub(crate) async fn statements_endpoint(
    Extension(state): Extension<SettlementState>,
    Json(request): Json<StatementsRequest>,
) -> Result<Json<StatementsResponse>, AppError> {
    let StatementsRequest {
        workbook,
        load_sheet,
        today,
    } = request;

    let workbook = Workbook::from(workbook);
    let mut options = BatchOptions::new(today.unwrap_or_else(|| Local::now().date_naive()));
    options.load_sheet = load_sheet;

    let batch = generate_statements(&workbook, &options, state.rate_book.as_ref(), &state.config)?;
    let summary = batch.summary();
    let documents = batch
        .documents
        .into_iter()
        .map(|document| StatementDocumentView {
            pdf_base64: STANDARD.encode(&document.bytes),
            name: document.name,
            role: document.role,
            unit: document.unit,
            stats: document.stats,
        })
        .collect();

    Ok(Json(StatementsResponse {
        summary,
        period: batch.period,
        load_sheet: batch.load_sheet,
        documents,
        failures: batch.failures,
        unmatched_loads: batch.unmatched_loads,
        unmatched_deductions: batch.unmatched_deductions,
        skipped_rows: batch.skipped_rows,
    }))
}

#[derive(Debug, Serialize)]
pub(crate) struct SheetListing {
    pub(crate) sheets: Vec<String>,
    pub(crate) load_sheet: Option<String>,
}

pub(crate) async fn sheets_endpoint(Json(payload): Json<WorkbookPayload>) -> Json<SheetListing> {
    let workbook = Workbook::from(payload);
    Json(SheetListing {
        sheets: workbook
            .sheet_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        load_sheet: select_load_sheet(&workbook, None).map(|sheet| sheet.name.clone()),
    })
}

pub(crate) async fn roster_endpoint(Json(payload): Json<WorkbookPayload>) -> Json<Roster> {
    Json(parse_roster(&Workbook::from(payload)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DriverConfigPayload {
    pub(crate) unit_number: Cell,
    #[serde(default)]
    pub(crate) driver_name: Option<String>,
    #[serde(default)]
    pub(crate) driver_email: Option<String>,
    #[serde(default)]
    pub(crate) company: Option<String>,
    pub(crate) rate_per_mile: Decimal,
}

impl DriverConfigPayload {
    fn into_rate(self) -> Option<DriverRate> {
        let unit_number = normalize_unit(&self.unit_number.as_text())
            .filter(|unit| unit.chars().all(|ch| ch.is_ascii_digit()))?;
        let driver_name = self
            .driver_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())?;
        if self.rate_per_mile <= Decimal::ZERO {
            return None;
        }
        let present = |value: Option<String>| {
            value
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        Some(DriverRate {
            unit_number,
            driver_name,
            driver_email: present(self.driver_email),
            company: present(self.company),
            rate_per_mile: self.rate_per_mile,
        })
    }
}

fn invalid_payload() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "ok": false, "error": "Invalid payload" })),
    )
        .into_response()
}

pub(crate) async fn save_driver_config(
    Extension(state): Extension<SettlementState>,
    payload: Result<Json<DriverConfigPayload>, JsonRejection>,
) -> Response {
    let Some(rate) = payload.ok().and_then(|Json(payload)| payload.into_rate()) else {
        return invalid_payload();
    };

    match state.rate_book.save(rate) {
        Ok(saved) => (StatusCode::OK, Json(json!({ "ok": true, "config": saved }))).into_response(),
        Err(error) => {
            warn!(%error, "driver configuration not saved");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": error.to_string() })),
            )
                .into_response()
        }
    }
}

pub(crate) async fn list_driver_configs(
    Extension(state): Extension<SettlementState>,
) -> Json<Vec<DriverRate>> {
    Json(state.rate_book.entries())
}

pub(crate) async fn fetch_driver_config(
    Extension(state): Extension<SettlementState>,
    Path(unit): Path<String>,
) -> Response {
    let found = normalize_unit(&unit)
        .map(|unit| state.rate_book.rate_for(&unit))
        .transpose();
    match found {
        Ok(Some(Some(config))) => {
            (StatusCode::OK, Json(json!({ "ok": true, "config": config }))).into_response()
        }
        Ok(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "ok": false, "error": "Not found" })),
        )
            .into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "ok": false, "error": error.to_string() })),
        )
            .into_response(),
    }
}
