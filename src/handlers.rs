use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use utoipa::IntoParams;

use crate::{
    AppState,
    error::ApiError,
    models::{Class, ScheduleData},
    schedule::{LoadStatus, ScheduleSnapshot},
    validation::{parse_date, validate_studio_id},
    views,
};

#[derive(Debug, Default, serde::Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClassFilter {
    /// Calendar day, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Studio id.
    pub studio: Option<String>,
}

impl ClassFilter {
    fn apply<'a>(&self, data: &'a ScheduleData) -> Result<Vec<&'a Class>, ApiError> {
        let date = self.date.as_deref().map(parse_date).transpose()?;
        let studio = self.studio.as_deref().map(validate_studio_id).transpose()?;

        let classes = match (date, studio) {
            (Some(date), Some(studio)) => {
                let at_studio = data.classes_by_studio(studio);
                data.classes_by_date(date)
                    .into_iter()
                    .filter(|class| at_studio.contains(class))
                    .collect()
            }
            (Some(date), None) => data.classes_by_date(date),
            (None, Some(studio)) => data.classes_by_studio(studio),
            (None, None) => data.classes.iter().collect(),
        };
        Ok(classes)
    }
}

pub async fn home(
    State(state): State<AppState>,
    Query(filter): Query<ClassFilter>,
) -> Result<Html<String>, ApiError> {
    let ScheduleSnapshot {
        status,
        data,
        error,
    } = state.loader.snapshot();
    let page = match status {
        LoadStatus::Loading => views::loading_page(),
        LoadStatus::Failed => {
            views::error_page(error.as_deref().unwrap_or(crate::schedule::LOAD_FAILED_MESSAGE))
        }
        LoadStatus::Ready => views::class_list_page(&filter.apply(&data)?),
    };
    Ok(Html(page))
}

pub async fn class_details(Path(id): Path<String>) -> Html<String> {
    Html(views::class_details_page(&id))
}

pub async fn donation(Path(class_id): Path<String>) -> Html<String> {
    Html(views::donation_page(&class_id))
}

pub async fn waiver(Path(class_id): Path<String>) -> Html<String> {
    Html(views::waiver_page(&class_id))
}

pub async fn payment(Path(class_id): Path<String>) -> Html<String> {
    Html(views::payment_page(&class_id))
}

pub async fn confirmation(Path(booking_id): Path<String>) -> Html<String> {
    Html(views::confirmation_page(&booking_id))
}

pub async fn dashboard() -> Html<String> {
    Html(views::dashboard_page())
}

#[utoipa::path(get, path = "/api", tag = "schedule")]
pub async fn api_index() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Black Swan Yoga Booking API",
        "endpoints": {
            "/api/schedule": "Studios, teachers and classes",
            "/api/classes": "Classes filtered by date and studio",
            "/api/classes/{id}": "A single class"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "schedule")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/healthz/ready",
    responses(
        (status = 200, description = "Schedule loaded"),
        (status = 503, description = "Schedule still loading or failed to load")
    ),
    tag = "schedule"
)]
pub async fn healthz_ready(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.loader.status();
    let code = match status {
        LoadStatus::Ready => StatusCode::OK,
        LoadStatus::Loading | LoadStatus::Failed => StatusCode::SERVICE_UNAVAILABLE,
    };
    (code, Json(serde_json::json!({"status": status})))
}

#[utoipa::path(
    get,
    path = "/api/schedule",
    responses(
        (status = 200, description = "Joined schedule", body = ScheduleData),
        (status = 503, description = "Schedule still loading"),
        (status = 500, description = "Schedule failed to load")
    ),
    tag = "schedule"
)]
pub async fn get_schedule(State(state): State<AppState>) -> Result<Json<ScheduleData>, ApiError> {
    let snapshot = state.loader.snapshot();
    match snapshot.status {
        LoadStatus::Loading => Err(ApiError::Unavailable("Schedule is still loading".into())),
        LoadStatus::Failed => Err(ApiError::Internal(
            snapshot
                .error
                .unwrap_or_else(|| crate::schedule::LOAD_FAILED_MESSAGE.to_string()),
        )),
        LoadStatus::Ready => Ok(Json(ScheduleData::clone(&snapshot.data))),
    }
}

#[utoipa::path(
    get,
    path = "/api/classes",
    params(ClassFilter),
    responses(
        (status = 200, description = "Matching classes, possibly none", body = [Class]),
        (status = 400, description = "Malformed filter")
    ),
    tag = "schedule"
)]
pub async fn list_classes(
    State(state): State<AppState>,
    Query(filter): Query<ClassFilter>,
) -> Result<Json<Vec<Class>>, ApiError> {
    let snapshot = state.loader.snapshot();
    let classes = filter
        .apply(&snapshot.data)?
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(classes))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    params(("id" = String, Path, description = "Class id")),
    responses(
        (status = 200, description = "The class", body = Class),
        (status = 404, description = "No class with that id")
    ),
    tag = "schedule"
)]
pub async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Class>, ApiError> {
    let snapshot = state.loader.snapshot();
    snapshot
        .data
        .class_by_id(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Class {id} not found")))
}
