use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryOutbox, InMemoryRateBook, SettlementState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use sumerplus::config::AppConfig;
use sumerplus::error::AppError;
use sumerplus::telemetry;
use sumerplus::workflows::questionnaire::QuestionnaireService;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };
    let settlement_state = SettlementState {
        rate_book: Arc::new(InMemoryRateBook::default()),
        config: config.statements.clone(),
    };

    let questionnaire_service = Arc::new(QuestionnaireService::new(Arc::new(
        InMemoryOutbox::default(),
    )));

    let app = with_service_routes(questionnaire_service)
        .layer(Extension(settlement_state))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, company = %config.statements.company_name, "intake and settlement service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
