pub mod error;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod schedule;
pub mod settings;
pub mod source;
pub mod validation;
pub mod views;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use handlers::{
    api_index, class_details, confirmation, dashboard, donation, get_class, get_schedule,
    healthz_live, healthz_ready, home, list_classes, payment, waiver,
};
use tokio_util::sync::CancellationToken;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::openapi::ApiDoc;
use crate::schedule::ScheduleLoader;
use crate::settings::Settings;
use crate::source::{FixtureSource, HttpSource, ScheduleSource};

#[derive(Clone)]
pub struct AppState {
    pub(crate) settings: Settings,
    pub(crate) loader: Arc<ScheduleLoader>,
}

impl AppState {
    pub fn new(settings: Settings, loader: Arc<ScheduleLoader>) -> Self {
        Self { settings, loader }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let source: Arc<dyn ScheduleSource> = match &settings.schedule_url {
        Some(url) => Arc::new(HttpSource::new(url.clone())),
        None => Arc::new(FixtureSource::embedded()),
    };
    let loader = Arc::new(ScheduleLoader::new(source));

    let shutdown = CancellationToken::new();
    let load_task = loader.spawn(shutdown.child_token());

    let state = AppState::new(settings, loader);
    let app = build_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    info!("Starting Black Swan Yoga booking on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    if let Err(err) = load_task.await {
        warn!(error = %err, "schedule load task did not finish cleanly");
    }
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(err) = result {
                warn!(error = %err, "failed to listen for ctrl-c");
            }
            info!("Shutting down");
            shutdown.cancel();
        }
        _ = shutdown.cancelled() => {}
    }
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let mut router = Router::new()
        .route("/", get(home))
        .route("/class/{id}", get(class_details))
        .route("/donation/{class_id}", get(donation))
        .route("/waiver/{class_id}", get(waiver))
        .route("/payment/{class_id}", get(payment))
        .route("/confirmation/{booking_id}", get(confirmation))
        .route("/dashboard", get(dashboard))
        .route("/api", get(api_index))
        .route("/api/schedule", get(get_schedule))
        .route("/api/classes", get(list_classes))
        .route("/api/classes/{id}", get(get_class))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router.layer(trace_layer)
}
