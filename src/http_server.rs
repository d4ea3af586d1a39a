//! HTTP endpoint for contact form submissions.
//!
//! A single intake route. The handler guarantees exactly one response
//! per request: rate limit first, then field validation, then the spam
//! screen, then best-effort dispatch. Delivery failures never change
//! the response.

use crate::dispatch::ContactDispatcher;
use crate::rate_limiter::SubmissionRateLimiter;
use crate::spam::SpamPatternSet;
use crate::submission::Submission;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

const RATE_LIMITED: &str = "Too many requests. Please try again later.";
const GENERIC_FAILURE: &str = "Something went wrong. Please try again later.";

/// Shared state for the intake route.
pub struct AppState {
    pub dispatcher: ContactDispatcher,
    pub rate_limiter: Mutex<SubmissionRateLimiter>,
    pub spam_patterns: SpamPatternSet,
}

/// Form-encoded body of `POST /contact`. Absent fields deserialize to
/// `None` so the validator can report them as missing instead of the
/// framework rejecting the body.
#[derive(Debug, Deserialize)]
struct ContactForm {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default, rename = "project-type")]
    project_type: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ContactForm {
    fn into_submission(self) -> Submission {
        Submission {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            project_type: self.project_type,
            message: self.message.unwrap_or_default(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/contact", post(contact))
        .with_state(state)
}

/// Runs the HTTP server on the specified address.
pub async fn run_http_server(
    addr: &str,
    state: Arc<AppState>,
) -> Result<(), crate::error::Error> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("entering serving loop");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    form: Result<Form<ContactForm>, FormRejection>,
) -> Response {
    let client_id = client_id(&headers);

    // Cheapest check first; denied attempts never reach validation or I/O.
    {
        let Ok(mut limiter) = state.rate_limiter.lock() else {
            log::error!("rate_limiter lock panicked!");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE);
        };
        if !limiter.check_and_record(&client_id) {
            log::debug!("Rate limited client {client_id}");
            return error_response(StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED);
        }
    }

    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            log::error!("Failed to read contact form body: {rejection}");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE);
        }
    };

    let submission = form.into_submission();
    if let Err(rejection) = submission.validate(&state.spam_patterns) {
        log::debug!("Rejected submission from client {client_id}: {rejection}");
        return error_response(StatusCode::BAD_REQUEST, &rejection.to_string());
    }

    let outcome = state.dispatcher.dispatch(&submission, &client_id).await;
    (
        StatusCode::OK,
        Json(json!({ "success": outcome.success, "message": outcome.message })),
    )
        .into_response()
}

/// Derive the rate-limit key from forwarding headers.
///
/// Header values are spoofable and header-stripped clients all share the
/// `"unknown"` bucket; they get rate limited collectively rather than
/// bypassing the limiter.
fn client_id(headers: &HeaderMap) -> String {
    for name in ["x-forwarded-for", "x-real-ip"] {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            let value = value.trim();
            if !value.is_empty() {
                return value.to_string();
            }
        }
    }
    "unknown".to_string()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
