use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use prac_model::{CompositeStatus, RetryMessage, ServerStartRequest, TaskRef};
use prac_version::VersionOutcome;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{envelope::Envelope, error::ApiError, handler::ApiHandler};

const UPDATE_STARTING: &str = "update task starting";
const UP_TO_DATE: &str = "Server is already up to date";

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - POST /start - Launch the server
    /// - POST /stop - Stop a server task
    /// - GET /status - Composite server status
    /// - POST /update - Run the image refresh task
    /// - POST /check-version - Compare with upstream, refresh when stale
    /// - POST /hostname - Process one hostname retry message
    pub fn router(self) -> Router {
        Router::new()
            .route("/start", post(start_server::<H>).options(preflight))
            .route("/stop", post(stop_server::<H>).options(preflight))
            .route("/status", get(get_status::<H>).options(preflight))
            .route("/update", post(update_image::<H>).options(preflight))
            .route("/check-version", post(check_version::<H>).options(preflight))
            .route("/hostname", post(resolve_hostname::<H>).options(preflight))
            .with_state(self.handler)
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct StopRequest {
    task_arn: TaskRef,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartResponse {
    task_arns: Vec<TaskRef>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StopResponse {
    task_status: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct StatusResponse {
    task_details: Option<Vec<CompositeStatus>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateResponse {
    status: String,
    task_arns: Vec<TaskRef>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckVersionResponse {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    required_version: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct HostnameResponse {
    state: String,
    hostname: Option<String>,
}

fn reply<T: Serialize>(result: Result<T, ApiError>) -> Envelope {
    match result {
        Ok(body) => Envelope::ok(&body),
        Err(e) => {
            warn!(error = %e, status = e.status_code(), "request failed");
            e.into()
        }
    }
}

fn payload<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))
}

// ============================================================================
// Handlers
// ============================================================================

/// OPTIONS on every route
async fn preflight() -> Envelope {
    Envelope::empty()
}

/// POST /start
async fn start_server<H>(
    State(handler): State<Arc<H>>,
    body: Result<Json<ServerStartRequest>, JsonRejection>,
) -> Envelope
where
    H: ApiHandler,
{
    let result = async {
        let request = payload(body)?;
        let task_arns = handler.start_server(request).await?;
        Ok::<_, ApiError>(StartResponse { task_arns })
    }
    .await;
    reply(result)
}

/// POST /stop
async fn stop_server<H>(
    State(handler): State<Arc<H>>,
    body: Result<Json<StopRequest>, JsonRejection>,
) -> Envelope
where
    H: ApiHandler,
{
    let result = async {
        let StopRequest { task_arn } = payload(body)?;
        handler.stop_server(&task_arn).await?;
        Ok::<_, ApiError>(StopResponse {
            task_status: format!("Stopping task {task_arn}"),
        })
    }
    .await;
    reply(result)
}

/// GET /status
async fn get_status<H>(State(handler): State<Arc<H>>) -> Envelope
where
    H: ApiHandler,
{
    let result = handler.get_status().await.map(|status| {
        debug!(tasks = status.len(), "status aggregated");
        StatusResponse {
            task_details: (!status.is_empty()).then_some(status),
        }
    });
    reply(result)
}

/// POST /update
async fn update_image<H>(State(handler): State<Arc<H>>) -> Envelope
where
    H: ApiHandler,
{
    let result = handler.update_image().await.map(|task_arns| UpdateResponse {
        status: UPDATE_STARTING.to_string(),
        task_arns,
    });
    reply(result)
}

/// POST /check-version
async fn check_version<H>(State(handler): State<Arc<H>>) -> Envelope
where
    H: ApiHandler,
{
    let result = handler.check_version().await.map(|outcome| match outcome {
        VersionOutcome::UpToDate => CheckVersionResponse {
            status: UP_TO_DATE.to_string(),
            required_version: None,
        },
        VersionOutcome::Updating {
            required_version, ..
        } => CheckVersionResponse {
            status: UPDATE_STARTING.to_string(),
            required_version: Some(required_version),
        },
    });
    reply(result)
}

/// POST /hostname
async fn resolve_hostname<H>(
    State(handler): State<Arc<H>>,
    body: Result<Json<RetryMessage>, JsonRejection>,
) -> Envelope
where
    H: ApiHandler,
{
    let result = async {
        let message = payload(body)?;
        let outcome = handler.resolve_hostname(message).await?;
        Ok::<_, ApiError>(HostnameResponse {
            state: outcome.state().to_string(),
            hostname: outcome.hostname().map(str::to_string),
        })
    }
    .await;
    reply(result)
}
