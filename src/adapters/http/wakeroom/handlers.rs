//! HTTP handlers for WakeRoom endpoints.

use std::net::IpAddr;
use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::adapters::http::error::ErrorResponse;
use crate::adapters::http::middleware::{AdminUser, AuthenticatedUser};
use crate::application::handlers::wakeroom::{
    CreateExperienceCommand, CreateExperienceHandler, EndSessionCommand, EndSessionHandler,
    GetExperienceHandler, GetMySessionsHandler, GetSessionHandler, GetSessionStatisticsHandler,
    ListExperiencesHandler, StartSessionCommand, StartSessionHandler,
};
use crate::domain::foundation::{DomainError, ExperienceId, SessionId};
use crate::domain::wakeroom::{DeviceInfo, WakeRoomError};
use crate::ports::{
    EventPublisher, ExperienceReader, ExperienceRepository, SessionReader, SessionRepository,
};

use super::dto::{
    CreateExperienceRequest, EndSessionRequest, ExperienceListParams, ExperienceResponse,
    SessionResponse, SessionStatisticsResponse, StartSessionRequest,
};

const FORWARDED_FOR_HEADER: &str = "X-Forwarded-For";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared dependencies for the WakeRoom endpoints, cloned per request.
#[derive(Clone)]
pub struct WakeRoomAppState {
    pub experience_repository: Arc<dyn ExperienceRepository>,
    pub experience_reader: Arc<dyn ExperienceReader>,
    pub session_repository: Arc<dyn SessionRepository>,
    pub session_reader: Arc<dyn SessionReader>,
    pub event_publisher: Arc<dyn EventPublisher>,
}

impl WakeRoomAppState {
    pub fn create_experience_handler(&self) -> CreateExperienceHandler {
        CreateExperienceHandler::new(
            self.experience_repository.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn get_experience_handler(&self) -> GetExperienceHandler {
        GetExperienceHandler::new(self.experience_repository.clone())
    }

    pub fn list_experiences_handler(&self) -> ListExperiencesHandler {
        ListExperiencesHandler::new(self.experience_reader.clone())
    }

    pub fn start_session_handler(&self) -> StartSessionHandler {
        StartSessionHandler::new(
            self.experience_repository.clone(),
            self.session_repository.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn end_session_handler(&self) -> EndSessionHandler {
        EndSessionHandler::new(self.session_repository.clone(), self.event_publisher.clone())
    }

    pub fn get_session_handler(&self) -> GetSessionHandler {
        GetSessionHandler::new(self.session_reader.clone())
    }

    pub fn my_sessions_handler(&self) -> GetMySessionsHandler {
        GetMySessionsHandler::new(self.session_reader.clone())
    }

    pub fn statistics_handler(&self) -> GetSessionStatisticsHandler {
        GetSessionStatisticsHandler::new(self.session_reader.clone())
    }
}

/// Client address: the body's value if given, else the first hop the
/// gateway recorded.
fn client_ip(body_ip: Option<&str>, headers: &HeaderMap) -> Result<Option<IpAddr>, WakeRoomError> {
    if let Some(raw) = body_ip.map(str::trim).filter(|s| !s.is_empty()) {
        return raw
            .parse()
            .map(Some)
            .map_err(|_| WakeRoomError::validation("ip_address", format!("'{}' is not an IP address", raw)));
    }
    Ok(headers
        .get(FORWARDED_FOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse().ok()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Experiences
// ════════════════════════════════════════════════════════════════════════════════

/// POST /experiences - Add a catalogue entry (admin only)
pub async fn create_experience(
    State(state): State<WakeRoomAppState>,
    admin: AdminUser,
    Json(request): Json<CreateExperienceRequest>,
) -> Result<impl IntoResponse, WakeRoomApiError> {
    let cmd = CreateExperienceCommand {
        title: request.title,
        description: request.description,
        experience_type: request.experience_type,
        status: request.status,
        memorial_id: request.memorial_id,
        duration_minutes: request.duration_minutes,
        qr_code_required: request.qr_code_required,
        qr_code_data: request.qr_code_data,
        nfc_data: request.nfc_data,
        requires_headset: request.requires_headset,
        spatial_audio: request.spatial_audio,
        is_featured: request.is_featured,
    };
    let experience = state
        .create_experience_handler()
        .handle(cmd, &admin.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(ExperienceResponse::from(&experience))))
}

/// GET /experiences - Catalogue, filtered by status, type and featured flag
pub async fn list_experiences(
    State(state): State<WakeRoomAppState>,
    _user: AuthenticatedUser,
    Query(params): Query<ExperienceListParams>,
) -> Result<impl IntoResponse, WakeRoomApiError> {
    let filter = params.into_filter()?;
    let experiences = state.list_experiences_handler().handle(filter).await?;
    let response: Vec<ExperienceResponse> = experiences.iter().map(ExperienceResponse::from).collect();
    Ok(Json(response))
}

/// GET /experiences/:id - One catalogue entry
pub async fn get_experience(
    State(state): State<WakeRoomAppState>,
    _user: AuthenticatedUser,
    Path(experience_id): Path<ExperienceId>,
) -> Result<impl IntoResponse, WakeRoomApiError> {
    let experience = state.get_experience_handler().handle(experience_id).await?;
    Ok(Json(ExperienceResponse::from(&experience)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Sessions
// ════════════════════════════════════════════════════════════════════════════════

/// POST /sessions - Start a session for the caller
pub async fn start_session(
    State(state): State<WakeRoomAppState>,
    user: AuthenticatedUser,
    headers: HeaderMap,
    Json(request): Json<StartSessionRequest>,
) -> Result<impl IntoResponse, WakeRoomApiError> {
    let ip_address = client_ip(request.ip_address.as_deref(), &headers)?;
    let cmd = StartSessionCommand {
        user_id: user.user_id,
        experience_id: request.experience_id,
        memorial_id: request.memorial_id,
        device: DeviceInfo {
            device_type: request.device_type,
            browser_info: request.browser_info,
            ip_address,
        },
    };
    let result = state.start_session_handler().handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(SessionResponse::from(&result.session))))
}

/// POST /sessions/:id/end - End the caller's session
pub async fn end_session(
    State(state): State<WakeRoomAppState>,
    user: AuthenticatedUser,
    Path(session_id): Path<SessionId>,
    request: Option<Json<EndSessionRequest>>,
) -> Result<impl IntoResponse, WakeRoomApiError> {
    let outcome = match request {
        Some(Json(body)) => Some(body.into_outcome()?),
        None => None,
    };
    let cmd = EndSessionCommand {
        session_id,
        user_id: user.user_id,
        outcome,
    };
    let result = state.end_session_handler().handle(cmd).await?;
    Ok(Json(SessionResponse::from(&result.session)))
}

/// GET /sessions/:id - The caller's own session
pub async fn get_session(
    State(state): State<WakeRoomAppState>,
    user: AuthenticatedUser,
    Path(session_id): Path<SessionId>,
) -> Result<impl IntoResponse, WakeRoomApiError> {
    let view = state
        .get_session_handler()
        .handle(session_id, &user.user_id)
        .await?;
    Ok(Json(SessionResponse::from(view)))
}

/// GET /sessions/mine - The caller's session history, newest first
pub async fn get_my_sessions(
    State(state): State<WakeRoomAppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, WakeRoomApiError> {
    let sessions = state.my_sessions_handler().handle(&user.user_id).await?;
    let response: Vec<SessionResponse> = sessions.into_iter().map(SessionResponse::from).collect();
    Ok(Json(response))
}

/// GET /sessions/statistics - Usage figures (admin only)
pub async fn get_session_statistics(
    State(state): State<WakeRoomAppState>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, WakeRoomApiError> {
    let stats = state.statistics_handler().handle().await?;
    Ok(Json(SessionStatisticsResponse::from(stats)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts WakeRoom errors to HTTP responses.
#[derive(Debug)]
pub struct WakeRoomApiError(WakeRoomError);

impl From<WakeRoomError> for WakeRoomApiError {
    fn from(err: WakeRoomError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for WakeRoomApiError {
    fn from(err: DomainError) -> Self {
        Self(WakeRoomError::from(err))
    }
}

impl IntoResponse for WakeRoomApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            WakeRoomError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
            WakeRoomError::ExperienceNotFound(_) => (StatusCode::NOT_FOUND, "EXPERIENCE_NOT_FOUND"),
            WakeRoomError::AlreadyEnded(_) => (StatusCode::CONFLICT, "SESSION_ALREADY_ENDED"),
            WakeRoomError::ValidationFailed { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            WakeRoomError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            WakeRoomError::Infrastructure(detail) => {
                tracing::error!(error = %detail, "WakeRoom request failed");
                let body = ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred");
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
        };

        let body = match &self.0 {
            WakeRoomError::ValidationFailed { field, .. } => ErrorResponse::with_details(
                error_code,
                self.0.message(),
                serde_json::json!({ "field": field }),
            ),
            _ => ErrorResponse::new(error_code, self.0.message()),
        };
        (status, Json(body)).into_response()
    }
}
