//! REST surface over the game service.
//!
//! Identity resolution is external: callers present an `x-player-id` header
//! and the engine trusts it. A missing header is the only source of
//! `Unauthorized`.

use crate::error::GameError;
use crate::matchmaking::FindOrCreateRequest;
use crate::service::{GameService, HeartbeatAck};
use crate::session::{Session, SessionId};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Response to a successful find-or-create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameResponse {
    /// Id of the joined or created session.
    pub session_id: SessionId,
}

/// Request body for placing a move.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Cell index in `[0, grid_size^2)`.
    pub index: usize,
}

/// Acknowledgment of a deleted session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AbandonResponse {
    /// Always true; the record is gone.
    pub deleted: bool,
}

/// Machine-readable error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error kind, e.g. `WrongTurn`.
    pub error: String,
    /// Human-readable description.
    pub message: String,
}

/// [`GameError`] carried across the HTTP boundary.
#[derive(Debug)]
pub struct ApiError(pub GameError);

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            GameError::Unauthorized => StatusCode::UNAUTHORIZED,
            GameError::NotFound => StatusCode::NOT_FOUND,
            GameError::NotParticipant => StatusCode::FORBIDDEN,
            GameError::SessionFull
            | GameError::CellOccupied
            | GameError::WrongTurn
            | GameError::NotInProgress
            | GameError::Paused => StatusCode::CONFLICT,
            GameError::InvalidConfig(_) | GameError::InvalidIndex => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            GameError::BoardShapeMismatch => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.0.as_ref().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Builds the router exposing every engine operation.
pub fn router(service: GameService) -> Router {
    Router::new()
        .route("/games", post(create_game))
        .route("/games/waiting", get(list_waiting))
        .route("/games/mine", get(list_my_active))
        .route("/games/{id}", get(get_game).delete(abandon))
        .route("/games/{id}/join", post(join))
        .route("/games/{id}/move", post(place_move))
        .route("/games/{id}/heartbeat", post(heartbeat))
        .route("/games/{id}/restart", post(restart))
        .route("/games/{id}/timeout-turn", post(timeout_turn))
        .with_state(service)
}

/// Resolves the caller identity from the `x-player-id` header.
fn caller(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get("x-player-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ApiError(GameError::Unauthorized))
}

#[instrument(skip(service, headers))]
async fn create_game(
    State(service): State<GameService>,
    headers: HeaderMap,
    Json(request): Json<FindOrCreateRequest>,
) -> Result<Json<CreateGameResponse>, ApiError> {
    let caller = caller(&headers)?;
    let session_id = service.find_or_create(&caller, request)?;
    Ok(Json(CreateGameResponse { session_id }))
}

#[instrument(skip(service, headers))]
async fn join(
    State(service): State<GameService>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Session>, ApiError> {
    let caller = caller(&headers)?;
    Ok(Json(service.join(&caller, &id)?))
}

#[instrument(skip(service, headers))]
async fn place_move(
    State(service): State<GameService>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<MoveRequest>,
) -> Result<Json<Session>, ApiError> {
    let caller = caller(&headers)?;
    Ok(Json(service.place_move(&caller, &id, request.index)?))
}

#[instrument(skip(service, headers))]
async fn heartbeat(
    State(service): State<GameService>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<HeartbeatAck>, ApiError> {
    let caller = caller(&headers)?;
    Ok(Json(service.heartbeat(&caller, &id)?))
}

#[instrument(skip(service, headers))]
async fn restart(
    State(service): State<GameService>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Session>, ApiError> {
    let caller = caller(&headers)?;
    Ok(Json(service.restart(&caller, &id)?))
}

#[instrument(skip(service, headers))]
async fn abandon(
    State(service): State<GameService>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<AbandonResponse>, ApiError> {
    let caller = caller(&headers)?;
    service.abandon(&caller, &id)?;
    Ok(Json(AbandonResponse { deleted: true }))
}

#[instrument(skip(service, headers))]
async fn timeout_turn(
    State(service): State<GameService>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Session>, ApiError> {
    caller(&headers)?;
    Ok(Json(service.timeout_turn(&id)?))
}

#[instrument(skip(service))]
async fn get_game(
    State(service): State<GameService>,
    Path(id): Path<String>,
) -> Json<Option<Session>> {
    let session = service.get_game(&id);
    debug!(session_id = %id, found = session.is_some(), "Read session");
    Json(session)
}

#[instrument(skip(service))]
async fn list_waiting(State(service): State<GameService>) -> Json<Vec<Session>> {
    Json(service.list_waiting())
}

#[instrument(skip(service, headers))]
async fn list_my_active(
    State(service): State<GameService>,
    headers: HeaderMap,
) -> Result<Json<Vec<Session>>, ApiError> {
    let caller = caller(&headers)?;
    Ok(Json(service.list_my_active(&caller)))
}
