use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::error;

use super::calendar::CalendarGateway;
use crate::error::AppError;
use super::intake::IntakeError;
use super::notify::Mailer;
use super::query::{LeaveRequestView, LeaveStats};
use super::service::{LeaveRequestService, LeaveServiceError};
use super::store::LeaveStore;

const SUBMITTED_MESSAGE: &str = "Leave request submitted successfully";
const INTERNAL_ERROR: &str = "internal error while processing leave request";

/// Router builder exposing the intake and admin query endpoints.
pub fn leave_router<S, C, M>(service: Arc<LeaveRequestService<S, C, M>>) -> Router
where
    S: LeaveStore + 'static,
    C: CalendarGateway + 'static,
    M: Mailer + 'static,
{
    Router::new()
        .route(
            "/api/v1/leave",
            post(submit_handler::<S, C, M>).get(query_handler::<S, C, M>),
        )
        .with_state(service)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    success: bool,
    message: &'static str,
    request_id: String,
}

#[derive(Debug, Serialize)]
struct RequestsResponse {
    success: bool,
    requests: Vec<LeaveRequestView>,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    success: bool,
    stats: LeaveStats,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorResponse {
        success: false,
        error: message.into(),
    };
    (status, Json(body)).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QueryParams {
    #[serde(default)]
    action: Option<String>,
}

pub(crate) async fn submit_handler<S, C, M>(
    State(service): State<Arc<LeaveRequestService<S, C, M>>>,
    body: Result<Bytes, BytesRejection>,
) -> Response
where
    S: LeaveStore + 'static,
    C: CalendarGateway + 'static,
    M: Mailer + 'static,
{
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let err = IntakeError::Malformed(format!("request body unreadable ({rejection})"));
            return failure(rejection.status(), err.to_string());
        }
    };

    let raw = match String::from_utf8(body.to_vec()) {
        Ok(raw) => raw,
        Err(_) => {
            let err = IntakeError::Malformed("request body is not valid UTF-8".to_string());
            return failure(StatusCode::BAD_REQUEST, err.to_string());
        }
    };

    let outcome = tokio::task::spawn_blocking(move || {
        service
            .submit_raw(&raw)
            .map(|receipt| receipt.request_id().to_string())
    })
    .await;

    match outcome {
        Ok(Ok(request_id)) => {
            let body = SubmitResponse {
                success: true,
                message: SUBMITTED_MESSAGE,
                request_id,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(Err(LeaveServiceError::Intake(err))) => failure(StatusCode::BAD_REQUEST, err.to_string()),
        Ok(Err(err)) => failure(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        Err(join_error) => {
            error!(error = %join_error, "leave submission task failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
        }
    }
}

pub(crate) async fn query_handler<S, C, M>(
    State(service): State<Arc<LeaveRequestService<S, C, M>>>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> Response
where
    S: LeaveStore + 'static,
    C: CalendarGateway + 'static,
    M: Mailer + 'static,
{
    // An undecodable query string names no action.
    let action = params.ok().and_then(|Query(params)| params.action);

    match action.as_deref() {
        Some("getRequests") => {
            let outcome = tokio::task::spawn_blocking(move || service.list_requests()).await;
            respond(outcome, |requests| RequestsResponse {
                success: true,
                requests,
            })
        }
        Some("getStats") => {
            let today = Local::now().date_naive();
            let outcome = tokio::task::spawn_blocking(move || service.compute_stats(today)).await;
            respond(outcome, |stats| StatsResponse {
                success: true,
                stats,
            })
        }
        _ => failure(StatusCode::BAD_REQUEST, "Invalid action"),
    }
}

fn respond<T, B>(
    outcome: Result<Result<T, LeaveServiceError>, tokio::task::JoinError>,
    body: impl FnOnce(T) -> B,
) -> Response
where
    B: Serialize,
{
    match outcome {
        Ok(Ok(value)) => (StatusCode::OK, Json(body(value))).into_response(),
        Ok(Err(LeaveServiceError::StoreUnavailable(err))) => AppError::from(err).into_response(),
        Ok(Err(LeaveServiceError::Intake(err))) => failure(StatusCode::BAD_REQUEST, err.to_string()),
        Err(join_error) => {
            error!(error = %join_error, "leave query task failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
        }
    }
}
