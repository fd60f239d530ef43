// REST API endpoints for the schedule resource

use axum::{
    Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
    routing::{get, post},
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::db::{Db, ScheduleCreate, ScheduleDao, ScheduleRecord};
use crate::health::HealthState;
use crate::metrics::{Operation, RequestMetrics};
use crate::model::Schedule;

/// Shared state handed to every handler. Cloning is cheap: the database
/// handle, health flag, and counters are all internally shared.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub health: HealthState,
    pub metrics: RequestMetrics,
    /// Fixed pause applied to the list-all endpoint before responding.
    pub all_delay: Duration,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(add))
        .route("/nessProbe", get(ness_probe))
        .route("/health", get(health_check))
        .route("/all", get(all_schedules))
        .route("/all/{date}", get(all_for_day))
        .route("/venue/{id}", get(all_for_venue))
        .route("/active/{date_time}", get(active_at_date))
        .route("/updateHealthStatus", post(update_health_status))
        .route("/{id}", get(retrieve).delete(remove))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn persistence_error(e: anyhow::Error) -> StatusCode {
    tracing::error!("schedule persistence error: {}", e);
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn add(
    State(state): State<AppState>,
    Json(schedule): Json<Schedule>,
) -> Result<impl IntoResponse, StatusCode> {
    state.metrics.record(Operation::Create);

    let created = ScheduleDao::add_schedule(&state.db, &ScheduleCreate::from_model(&schedule))
        .await
        .map_err(persistence_error)?;
    let created = created.into_model();

    let location = format!("/{}", created.id.as_deref().unwrap_or_default());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

/// Plain-text readiness probe, e.g. for a k8s readinessProbe.
async fn ness_probe(State(state): State<AppState>) -> String {
    state.metrics.record(Operation::NessProbe);
    format!("schedule ready at {}", chrono::Local::now().to_rfc2822())
}

/// Liveness surface for the shared health flag: 503 once the application
/// has been marked down via `/updateHealthStatus`.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    state.metrics.record(Operation::Health);
    tracing::debug!(metrics = ?state.metrics.snapshot(), "health check");

    let (status, label) = if state.health.is_app_down() {
        (StatusCode::SERVICE_UNAVAILABLE, "down")
    } else {
        (StatusCode::OK, "healthy")
    };

    (
        status,
        Json(serde_json::json!({
            "status": label,
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}

async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Schedule>, StatusCode> {
    state.metrics.record(Operation::Retrieve);

    match ScheduleDao::find_by_id(&state.db, &id)
        .await
        .map_err(persistence_error)?
    {
        Some(record) => Ok(Json(record.into_model())),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// List every schedule, deliberately slowly.
///
/// The fixed pause reproduces the original's artificially slow listing so
/// downstream timeout handling stays exercised; the length comes from
/// server config and can be set to zero. Unlike the original, a disturbed
/// pause is never reported as "not found" - cancellation simply ends the
/// request.
async fn all_schedules(
    State(state): State<AppState>,
) -> Result<Json<Vec<Schedule>>, StatusCode> {
    state.metrics.record(Operation::ListAll);

    let records = ScheduleDao::get_all_schedules(&state.db)
        .await
        .map_err(persistence_error)?;

    tokio::time::sleep(state.all_delay).await;

    Ok(Json(into_models(records)))
}

async fn all_for_venue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Schedule>>, StatusCode> {
    state.metrics.record(Operation::ListByVenue);

    let records = ScheduleDao::find_by_venue(&state.db, &id)
        .await
        .map_err(persistence_error)?;

    Ok(Json(into_models(records)))
}

/// Schedules whose window strictly contains the given local date-time.
async fn active_at_date(
    State(state): State<AppState>,
    Path(date_time): Path<String>,
) -> Result<Json<Vec<Schedule>>, StatusCode> {
    state.metrics.record(Operation::ListActive);

    let date_time: NaiveDateTime = date_time.parse().map_err(|_| StatusCode::BAD_REQUEST)?;

    let records = ScheduleDao::find_by_date(&state.db, date_time.date())
        .await
        .map_err(persistence_error)?;

    let active = into_models(records)
        .into_iter()
        .filter(|schedule| schedule.is_active_at(date_time.time()))
        .collect();

    Ok(Json(active))
}

async fn all_for_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<Schedule>>, StatusCode> {
    state.metrics.record(Operation::ListByDay);

    let date: NaiveDate = date.parse().map_err(|_| StatusCode::BAD_REQUEST)?;

    let records = ScheduleDao::find_by_date(&state.db, date)
        .await
        .map_err(persistence_error)?;

    Ok(Json(into_models(records)))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    state.metrics.record(Operation::Remove);

    ScheduleDao::delete_schedule(&state.db, &id)
        .await
        .map_err(persistence_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HealthStatusParams {
    is_app_down: bool,
}

async fn update_health_status(
    State(state): State<AppState>,
    Query(params): Query<HealthStatusParams>,
) -> StatusCode {
    state.metrics.record(Operation::UpdateHealthStatus);

    tracing::info!("setting is_app_down = {}", params.is_app_down);
    state.health.set_app_down(params.is_app_down);

    StatusCode::OK
}

fn into_models(records: Vec<ScheduleRecord>) -> Vec<Schedule> {
    records.into_iter().map(ScheduleRecord::into_model).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DatabaseConfig, create_connection, ensure_schema};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    async fn test_state() -> AppState {
        let config = DatabaseConfig {
            url: "memory".to_string(),
            ..Default::default()
        };
        let db = create_connection(config).await.unwrap();
        ensure_schema(&db).await.unwrap();
        AppState {
            db,
            health: HealthState::new(),
            metrics: RequestMetrics::new(),
            all_delay: Duration::ZERO,
        }
    }

    async fn test_app() -> Router {
        create_router(test_state().await)
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn keynote() -> Value {
        json!({
            "venueId": "v1",
            "date": "2024-06-01",
            "startTime": "09:00:00",
            "duration": 60,
            "title": "Opening Keynote"
        })
    }

    async fn create_schedule(app: &Router, body: Value) -> String {
        let response = app.clone().oneshot(post_json("/", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_create_returns_location_and_body() {
        let app = test_app().await;

        let response = app.clone().oneshot(post_json("/", keynote())).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let location = response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        let body = json_body(response).await;
        let id = body["id"].as_str().unwrap();
        assert_eq!(location, format!("/{id}"));
        assert_eq!(body["venueId"], "v1");
        assert_eq!(body["startTime"], "09:00:00");
        assert_eq!(body["duration"], 60);
    }

    #[tokio::test]
    async fn test_create_then_retrieve_round_trips() {
        let app = test_app().await;
        let id = create_schedule(&app, keynote()).await;

        let response = app.clone().oneshot(get(&format!("/{id}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["id"], id.as_str());
        assert_eq!(body["venueId"], "v1");
        assert_eq!(body["date"], "2024-06-01");
        assert_eq!(body["title"], "Opening Keynote");
    }

    #[tokio::test]
    async fn test_retrieve_unknown_id_is_not_found() {
        let app = test_app().await;

        let response = app.oneshot(get("/no-such-id")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_then_retrieve_is_not_found() {
        let app = test_app().await;
        let id = create_schedule(&app, keynote()).await;

        let response = app.clone().oneshot(delete(&format!("/{id}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.clone().oneshot(get(&format!("/{id}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Deleting again is still 204
        let response = app.clone().oneshot(delete(&format!("/{id}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_list_all_returns_every_schedule() {
        let app = test_app().await;
        create_schedule(&app, keynote()).await;
        create_schedule(
            &app,
            json!({
                "venueId": "v2",
                "date": "2024-06-02",
                "startTime": "10:00:00",
                "duration": 45
            }),
        )
        .await;

        let response = app.clone().oneshot(get("/all")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_by_venue_filters() {
        let app = test_app().await;
        create_schedule(&app, keynote()).await;
        create_schedule(
            &app,
            json!({
                "venueId": "v2",
                "date": "2024-06-01",
                "startTime": "10:00:00",
                "duration": 45
            }),
        )
        .await;

        let response = app.clone().oneshot(get("/venue/v2")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["venueId"], "v2");

        // Unknown venue yields an empty array, not an error
        let response = app.clone().oneshot(get("/venue/v9")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_active_window_scenarios() {
        let app = test_app().await;
        // 2024-06-01, 09:00 for one hour
        create_schedule(&app, keynote()).await;

        // Strictly inside the window
        let response = app
            .clone()
            .oneshot(get("/active/2024-06-01T09:30:00"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);

        // Exactly at the end of the window
        let response = app
            .clone()
            .oneshot(get("/active/2024-06-01T10:00:00"))
            .await
            .unwrap();
        assert!(json_body(response).await.as_array().unwrap().is_empty());

        // Before the window opens
        let response = app
            .clone()
            .oneshot(get("/active/2024-06-01T08:59:00"))
            .await
            .unwrap();
        assert!(json_body(response).await.as_array().unwrap().is_empty());

        // Same time of day on a different date sees nothing
        let response = app
            .clone()
            .oneshot(get("/active/2024-06-02T09:30:00"))
            .await
            .unwrap();
        assert!(json_body(response).await.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_active_rejects_malformed_date_time() {
        let app = test_app().await;

        let response = app.oneshot(get("/active/not-a-date-time")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_by_day_returns_only_that_date() {
        let app = test_app().await;
        create_schedule(&app, keynote()).await;
        create_schedule(
            &app,
            json!({
                "venueId": "v2",
                "date": "2024-06-01",
                "startTime": "11:00:00",
                "duration": 30
            }),
        )
        .await;
        create_schedule(
            &app,
            json!({
                "venueId": "v1",
                "date": "2024-06-02",
                "startTime": "09:00:00",
                "duration": 60
            }),
        )
        .await;

        let response = app.clone().oneshot(get("/all/2024-06-01")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|s| s["date"] == "2024-06-01"));
    }

    #[tokio::test]
    async fn test_list_by_day_rejects_malformed_date() {
        let app = test_app().await;

        let response = app.oneshot(get("/all/06-01-2024")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ness_probe_reports_ready() {
        let app = test_app().await;

        let response = app.oneshot(get("/nessProbe")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("schedule ready at "));
    }

    #[tokio::test]
    async fn test_health_status_toggle_is_reflected() {
        let state = test_state().await;
        let app = create_router(state.clone());

        let response = app.clone().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "healthy");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/updateHealthStatus?isAppDown=true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.health.is_app_down());

        let response = app.clone().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["status"], "down");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/updateHealthStatus?isAppDown=false")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.clone().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_handlers_count_requests() {
        let state = test_state().await;
        let app = create_router(state.clone());

        app.clone().oneshot(get("/nessProbe")).await.unwrap();
        app.clone().oneshot(get("/all")).await.unwrap();
        app.clone().oneshot(get("/all")).await.unwrap();
        app.clone().oneshot(get("/no-such-id")).await.unwrap();

        assert_eq!(state.metrics.get(Operation::NessProbe), 1);
        assert_eq!(state.metrics.get(Operation::ListAll), 2);
        // Counted at entry even when the lookup misses
        assert_eq!(state.metrics.get(Operation::Retrieve), 1);
        assert_eq!(state.metrics.get(Operation::Create), 0);
    }
}
