//! Shell Router

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::application::session_provider::SessionProvider;
use crate::domain::service::{DocumentStore, IdentityService};
use crate::presentation::handlers::{self, ShellState};

/// JSON API under `/api`, every other `GET` rendered through the routing shell
pub fn shell_router<I, S>(provider: Arc<SessionProvider<I, S>>) -> Router
where
    I: IdentityService + Send + Sync + 'static,
    S: DocumentStore + Send + Sync + 'static,
{
    let state = ShellState { provider };

    let api = Router::new()
        .route("/register", post(handlers::register::<I, S>))
        .route("/login", post(handlers::login::<I, S>))
        .route("/logout", post(handlers::logout::<I, S>))
        .route("/session", get(handlers::session::<I, S>))
        .route("/chirps", post(handlers::send_chirp::<I, S>))
        .route("/profile/blurb", put(handlers::update_blurb::<I, S>))
        .route("/profile/username", put(handlers::update_username::<I, S>))
        .route("/profile/picture", put(handlers::update_picture::<I, S>));

    Router::new()
        .nest("/api", api)
        .fallback(get(handlers::render_page::<I, S>))
        .with_state(state)
}
