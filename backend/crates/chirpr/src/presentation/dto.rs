//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::session_provider::SessionState;
use crate::domain::entity::{profile::Profile, session_identity::SessionIdentity};
use crate::presentation::routing::{Route, View};

// ============================================================================
// Register / Login
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Raw handle; blank or absent picks a suggestion
    #[serde(default)]
    pub handle: Option<String>,
}

/// Register response
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub uid: String,
    /// Percent-encoded handle
    pub handle: String,
    pub username: String,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Identity as seen by the client
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl From<&SessionIdentity> for IdentityResponse {
    fn from(identity: &SessionIdentity) -> Self {
        Self {
            uid: identity.uid.to_string(),
            email: identity.email.as_ref().map(|e| e.as_str().to_string()),
            display_name: identity.display_name.clone(),
            photo_url: identity.photo_url.clone(),
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// Profile record in its stored shape
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub uid: String,
    pub chirp_handle: String,
    pub username: String,
    pub pic: String,
    pub blurb: String,
    pub amount_of_chirps: i64,
    pub chirps: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            uid: profile.uid.to_string(),
            chirp_handle: profile.handle.to_string(),
            username: profile.username.clone(),
            pic: profile.pic.clone(),
            blurb: profile.blurb.clone(),
            amount_of_chirps: profile.amount_of_chirps,
            chirps: profile.chirps.clone(),
            created_at: profile.created_at,
        }
    }
}

/// Session snapshot response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub is_loading: bool,
    pub signed_in: bool,
    pub user: Option<IdentityResponse>,
    pub profile: Option<ProfileResponse>,
}

impl From<&SessionState> for SessionResponse {
    fn from(state: &SessionState) -> Self {
        let user = state.current_user.as_ref();
        let identity = user.and_then(|u| u.identity.as_ref());
        Self {
            is_loading: state.is_loading,
            signed_in: identity.is_some(),
            user: identity.map(IdentityResponse::from),
            profile: user
                .and_then(|u| u.profile.as_ref())
                .map(ProfileResponse::from),
        }
    }
}

// ============================================================================
// Writes
// ============================================================================

/// Send chirp request
#[derive(Debug, Clone, Deserialize)]
pub struct SendChirpRequest {
    pub text: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Send chirp response
#[derive(Debug, Clone, Serialize)]
pub struct SendChirpResponse {
    pub id: String,
}

/// Single profile field update
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileFieldRequest {
    pub value: String,
}

// ============================================================================
// Shell
// ============================================================================

/// View descriptor rendered for non-API paths
#[derive(Debug, Clone, Serialize)]
pub struct ViewResponse {
    pub view: &'static str,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subpath: Option<String>,
}

impl ViewResponse {
    pub fn new(view: &View, path: &str) -> Self {
        match view {
            View::Spinner => Self {
                view: "spinner",
                path: path.to_string(),
                route: None,
                title: None,
                subpath: None,
            },
            View::Page(route) => Self {
                view: "page",
                path: path.to_string(),
                route: Some(route.name()),
                title: Some(route.title()),
                subpath: match route {
                    Route::User { subpath } => Some(subpath.clone()),
                    _ => None,
                },
            },
        }
    }
}
