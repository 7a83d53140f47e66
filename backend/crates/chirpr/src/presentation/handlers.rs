//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::application::outcome::WriteOutcome;
use crate::application::session_provider::SessionProvider;
use crate::domain::service::{DocumentStore, IdentityService};
use crate::error::ChirprResult;
use crate::presentation::dto::{
    IdentityResponse, LoginRequest, ProfileFieldRequest, RegisterRequest, RegisterResponse,
    SendChirpRequest, SendChirpResponse, SessionResponse, ViewResponse,
};
use crate::presentation::routing::{View, render};

/// Shared state for shell handlers
pub struct ShellState<I, S>
where
    I: IdentityService,
    S: DocumentStore,
{
    pub provider: Arc<SessionProvider<I, S>>,
}

// Derived Clone would require `I: Clone + S: Clone`
impl<I, S> Clone for ShellState<I, S>
where
    I: IdentityService,
    S: DocumentStore,
{
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

// ============================================================================
// Account
// ============================================================================

/// POST /api/register
pub async fn register<I, S>(
    State(state): State<ShellState<I, S>>,
    Json(req): Json<RegisterRequest>,
) -> ChirprResult<impl IntoResponse>
where
    I: IdentityService + Send + Sync + 'static,
    S: DocumentStore + Send + Sync + 'static,
{
    let handle = req.handle.unwrap_or_default();
    let registration = state
        .provider
        .register(req.email, req.password, move |_| handle)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            uid: registration.identity.uid.to_string(),
            handle: registration.profile.handle.to_string(),
            username: registration.profile.username,
        }),
    ))
}

/// POST /api/login
pub async fn login<I, S>(
    State(state): State<ShellState<I, S>>,
    Json(req): Json<LoginRequest>,
) -> ChirprResult<Json<IdentityResponse>>
where
    I: IdentityService + Send + Sync + 'static,
    S: DocumentStore + Send + Sync + 'static,
{
    let identity = state.provider.login(req.email, req.password).await?;
    Ok(Json(IdentityResponse::from(&identity)))
}

/// POST /api/logout
pub async fn logout<I, S>(State(state): State<ShellState<I, S>>) -> ChirprResult<StatusCode>
where
    I: IdentityService + Send + Sync + 'static,
    S: DocumentStore + Send + Sync + 'static,
{
    state.provider.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/session
pub async fn session<I, S>(State(state): State<ShellState<I, S>>) -> Json<SessionResponse>
where
    I: IdentityService + Send + Sync + 'static,
    S: DocumentStore + Send + Sync + 'static,
{
    Json(SessionResponse::from(&state.provider.state()))
}

// ============================================================================
// Writes
// ============================================================================

/// POST /api/chirps
pub async fn send_chirp<I, S>(
    State(state): State<ShellState<I, S>>,
    Json(req): Json<SendChirpRequest>,
) -> ChirprResult<Response>
where
    I: IdentityService + Send + Sync + 'static,
    S: DocumentStore + Send + Sync + 'static,
{
    let outcome = state.provider.send_chirp(req.text, req.images).await?;
    Ok(match outcome {
        WriteOutcome::Written(id) => (
            StatusCode::CREATED,
            Json(SendChirpResponse { id: id.to_string() }),
        )
            .into_response(),
        WriteOutcome::Skipped => StatusCode::NO_CONTENT.into_response(),
    })
}

/// PUT /api/profile/blurb
pub async fn update_blurb<I, S>(
    State(state): State<ShellState<I, S>>,
    Json(req): Json<ProfileFieldRequest>,
) -> ChirprResult<StatusCode>
where
    I: IdentityService + Send + Sync + 'static,
    S: DocumentStore + Send + Sync + 'static,
{
    let _ = state.provider.send_blurb(&req.value).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/profile/username
pub async fn update_username<I, S>(
    State(state): State<ShellState<I, S>>,
    Json(req): Json<ProfileFieldRequest>,
) -> ChirprResult<StatusCode>
where
    I: IdentityService + Send + Sync + 'static,
    S: DocumentStore + Send + Sync + 'static,
{
    let _ = state.provider.send_username(&req.value).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/profile/picture
pub async fn update_picture<I, S>(
    State(state): State<ShellState<I, S>>,
    Json(req): Json<ProfileFieldRequest>,
) -> ChirprResult<StatusCode>
where
    I: IdentityService + Send + Sync + 'static,
    S: DocumentStore + Send + Sync + 'static,
{
    let _ = state.provider.send_profile_picture(&req.value).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Shell
// ============================================================================

/// GET on any non-API path
pub async fn render_page<I, S>(State(state): State<ShellState<I, S>>, uri: Uri) -> Response
where
    I: IdentityService + Send + Sync + 'static,
    S: DocumentStore + Send + Sync + 'static,
{
    let path = uri.path();
    let view = render(state.provider.is_loading(), path);
    let status = match &view {
        View::Page(route) if route.is_not_found() => StatusCode::NOT_FOUND,
        _ => StatusCode::OK,
    };
    (status, Json(ViewResponse::new(&view, path))).into_response()
}
