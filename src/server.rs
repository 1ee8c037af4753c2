use crate::config::Config;
use crate::data::{AssignmentRequest, AssignmentResponse, ErrorResponse, ValidationReport};
use crate::error::AssignmentError;
use crate::solver::{self, Matcher};
use crate::validate::validate;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    matcher: Arc<dyn Matcher + Send + Sync>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let matcher = solver::build_matcher(config.strategy, config.max_attempts);
        Self {
            config: Arc::new(config),
            matcher: Arc::from(matcher),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, errors: Vec<String>) -> ApiError {
    (status, Json(ErrorResponse { errors }))
}

async fn validate_handler(Json(input): Json<AssignmentRequest>) -> Json<ValidationReport> {
    let violations: Vec<String> = validate(&input.members, &input.prior_assignments)
        .iter()
        .map(ToString::to_string)
        .collect();
    Json(ValidationReport {
        valid: violations.is_empty(),
        violations,
    })
}

async fn generate_handler(
    State(state): State<AppState>,
    Json(input): Json<AssignmentRequest>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    let violations = validate(&input.members, &input.prior_assignments);
    if !violations.is_empty() {
        warn!("Rejected request with {} violations", violations.len());
        return Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            violations.iter().map(ToString::to_string).collect(),
        ));
    }

    let mut rng = match input.seed.or(state.config.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match solver::generate_with(
        &input.members,
        &input.prior_assignments,
        state.matcher.as_ref(),
        &mut rng,
    ) {
        Ok(assignments) => Ok(Json(AssignmentResponse {
            strategy: state.config.strategy.to_string(),
            assignments,
        })),
        Err(e @ AssignmentError::Solver(_)) => Err(api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            vec![e.to_string()],
        )),
        Err(e) => Err(api_error(StatusCode::CONFLICT, vec![e.to_string()])),
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/assignments/validate", post(validate_handler))
        .route("/v1/assignments/generate", post(generate_handler))
        .with_state(state)
}

pub async fn run_server(config: Config) -> Result<(), ServerError> {
    let addr = config.bind_addr;
    info!(
        "Using the {} strategy with up to {} attempts per request",
        config.strategy, config.max_attempts
    );
    let app = build_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
