//! Session Provider
//!
//! Owns the current-user state for the lifetime of the application. On
//! start it subscribes to the identity service's auth-state stream and, for
//! every event, resolves the signed-in user's profile from the document
//! store. The actions (register, login, logout, chirp, profile edits) are
//! thin wrappers over the use cases that read or patch the same state.
//!
//! ## Loading flag
//! `is_loading` starts `true` and becomes `false` once, after the first
//! auth-state event has been fully processed (profile fetch included),
//! whether that event reports a user or not.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::application::config::ChirprConfig;
use crate::application::login::{LoginInput, LoginUseCase};
use crate::application::logout::LogoutUseCase;
use crate::application::outcome::WriteOutcome;
use crate::application::register::{RegisterInput, RegisterUseCase, Registration};
use crate::application::send_chirp::{SendChirpInput, SendChirpUseCase};
use crate::application::update_profile::UpdateProfileUseCase;
use crate::domain::entity::{
    current_user::CurrentUser,
    profile::{Profile, ProfileConverter, ProfileField},
    session_identity::SessionIdentity,
};
use crate::domain::service::{
    AuthState, AuthStateStream, DocumentStore, IdentityService, fetch_converted,
};
use crate::domain::value_object::chirp_id::ChirpId;
use crate::error::ChirprResult;

/// Observable provider state
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub is_loading: bool,
    /// `None` until the first auth-state event
    pub current_user: Option<CurrentUser>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            is_loading: true,
            current_user: None,
        }
    }
}

/// Session/data provider
pub struct SessionProvider<I, S>
where
    I: IdentityService,
    S: DocumentStore,
{
    state: Arc<watch::Sender<SessionState>>,
    auth: AuthStateStream,
    listener: Mutex<Option<JoinHandle<()>>>,
    register: RegisterUseCase<I, S>,
    login: LoginUseCase<I>,
    logout: LogoutUseCase<I>,
    send_chirp: SendChirpUseCase<S>,
    update_profile: UpdateProfileUseCase<S>,
    store: Arc<S>,
    config: Arc<ChirprConfig>,
}

impl<I, S> SessionProvider<I, S>
where
    I: IdentityService + Send + Sync + 'static,
    S: DocumentStore + Send + Sync + 'static,
{
    /// Subscribe to the auth-state stream and start tracking the session.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(identity: Arc<I>, store: Arc<S>, config: Arc<ChirprConfig>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        let state = Arc::new(state);

        let auth = identity.subscribe();
        let listener = tokio::spawn(listen(
            auth.clone(),
            Arc::clone(&store),
            Arc::clone(&config),
            Arc::clone(&state),
        ));
        tracing::debug!("Session provider started");

        Self {
            state,
            auth,
            listener: Mutex::new(Some(listener)),
            register: RegisterUseCase::new(
                Arc::clone(&identity),
                Arc::clone(&store),
                Arc::clone(&config),
            ),
            login: LoginUseCase::new(Arc::clone(&identity)),
            logout: LogoutUseCase::new(identity),
            send_chirp: SendChirpUseCase::new(Arc::clone(&store), Arc::clone(&config)),
            update_profile: UpdateProfileUseCase::new(Arc::clone(&store), Arc::clone(&config)),
            store,
            config,
        }
    }

    /// Create an account and its profile record.
    ///
    /// `derive_handle` is called with the new identity to pick the handle.
    pub async fn register<F>(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
        derive_handle: F,
    ) -> ChirprResult<Registration>
    where
        F: FnOnce(&SessionIdentity) -> String,
    {
        let input = RegisterInput {
            email: email.into(),
            password: password.into(),
        };
        let registration = self.register.execute(input, derive_handle).await?;
        self.adopt_profile(&registration.identity, &registration.profile);
        Ok(registration)
    }

    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> ChirprResult<SessionIdentity> {
        self.login
            .execute(LoginInput {
                email: email.into(),
                password: password.into(),
            })
            .await
    }

    pub async fn logout(&self) -> ChirprResult<()> {
        self.logout.execute().await
    }

    /// Post a chirp as the current user; skipped without one
    pub async fn send_chirp(
        &self,
        text: impl Into<String>,
        images: Vec<String>,
    ) -> ChirprResult<WriteOutcome<ChirpId>> {
        let current = self.current_user();
        let input = SendChirpInput {
            text: text.into(),
            images,
        };
        self.send_chirp.execute(current.as_ref(), input).await
    }

    pub async fn send_blurb(&self, blurb: &str) -> ChirprResult<WriteOutcome> {
        self.update_field(ProfileField::Blurb, blurb).await
    }

    pub async fn send_username(&self, username: &str) -> ChirprResult<WriteOutcome> {
        self.update_field(ProfileField::Username, username).await
    }

    pub async fn send_profile_picture(&self, url: &str) -> ChirprResult<WriteOutcome> {
        self.update_field(ProfileField::Picture, url).await
    }

    async fn update_field(&self, field: ProfileField, value: &str) -> ChirprResult<WriteOutcome> {
        let current = self.current_user();
        let outcome = self
            .update_profile
            .execute(current.as_ref(), field, value)
            .await?;

        let writer = current.as_ref().and_then(CurrentUser::writer);
        if let (Some(uid), true) = (writer, outcome.is_written()) {
            self.state.send_if_modified(|state| {
                let Some(profile) = state
                    .current_user
                    .as_mut()
                    .and_then(|user| user.profile.as_mut())
                    .filter(|profile| &profile.uid == uid)
                else {
                    return false;
                };
                field.apply(profile, value);
                true
            });
        }
        Ok(outcome)
    }

    /// Re-read the signed-in user's profile from the store
    pub async fn refresh_profile(&self) -> ChirprResult<Option<Profile>> {
        let Some(uid) = self.current_user().and_then(|user| user.uid().cloned()) else {
            return Ok(None);
        };

        let path = self.config.profile_path(&uid);
        let profile = match fetch_converted(&*self.store, &path, &ProfileConverter).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::error!(uid = %uid, error = %e, "Failed to refresh profile");
                return Err(e.into());
            }
        };

        if let Some(fresh) = &profile {
            self.state.send_if_modified(|state| {
                match state.current_user.as_mut() {
                    Some(user) if user.uid() == Some(&uid) => {
                        user.profile = Some(fresh.clone());
                        true
                    }
                    _ => false,
                }
            });
        }
        Ok(profile)
    }
}

impl<I, S> SessionProvider<I, S>
where
    I: IdentityService,
    S: DocumentStore,
{
    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.state.borrow().current_user.clone()
    }

    /// Wait for the first auth-state event to be processed
    pub async fn wait_until_loaded(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|state| !state.is_loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    /// Stop following the auth-state stream. Idempotent; also run on drop.
    pub fn shutdown(&self) {
        let handle = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
            tracing::debug!("Session provider stopped");
        }
    }

    /// Install the profile just written for a freshly registered identity.
    ///
    /// Only while the identity service still reports that identity, and never
    /// over a different user's session.
    fn adopt_profile(&self, identity: &SessionIdentity, profile: &Profile) {
        let adopted = self.state.send_if_modified(|state| {
            // Checked under the state lock so a sign-out the listener has
            // already applied cannot be overwritten
            let live = self
                .auth
                .borrow()
                .identity()
                .is_some_and(|current| current.uid == identity.uid);
            let other_user = state
                .current_user
                .as_ref()
                .and_then(CurrentUser::uid)
                .is_some_and(|uid| uid != &identity.uid);
            if !live || other_user {
                return false;
            }
            state.current_user = Some(CurrentUser {
                identity: Some(identity.clone()),
                profile: Some(profile.clone()),
            });
            true
        });
        if !adopted {
            tracing::debug!(uid = %identity.uid, "Registered identity no longer signed in");
        }
    }
}

impl<I, S> Drop for SessionProvider<I, S>
where
    I: IdentityService,
    S: DocumentStore,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn listen<S>(
    mut auth: AuthStateStream,
    store: Arc<S>,
    config: Arc<ChirprConfig>,
    state: Arc<watch::Sender<SessionState>>,
) where
    S: DocumentStore,
{
    loop {
        let event = auth.borrow_and_update().clone();
        match event {
            AuthState::Resolving => {}
            AuthState::SignedOut => apply_signed_out(&state),
            AuthState::SignedIn(identity) => {
                let profile = fetch_profile(&*store, &config, &identity).await;
                apply_signed_in(&state, identity, profile);
            }
        }

        if auth.changed().await.is_err() {
            tracing::debug!("Auth-state stream closed");
            break;
        }
    }
}

async fn fetch_profile<S>(
    store: &S,
    config: &ChirprConfig,
    identity: &SessionIdentity,
) -> Option<Profile>
where
    S: DocumentStore,
{
    let path = config.profile_path(&identity.uid);
    match fetch_converted(store, &path, &ProfileConverter).await {
        Ok(Some(profile)) => Some(profile),
        Ok(None) => {
            tracing::debug!(uid = %identity.uid, "No profile record yet");
            None
        }
        Err(e) => {
            tracing::warn!(uid = %identity.uid, error = %e, "Failed to fetch profile");
            None
        }
    }
}

fn apply_signed_out(state: &watch::Sender<SessionState>) {
    state.send_modify(|state| {
        state.current_user = Some(CurrentUser::signed_out());
        state.is_loading = false;
    });
    tracing::info!("Session resolved: signed out");
}

/// Store `{identity, profile}`; a profile already known for the same uid is
/// kept when the fetch came back empty.
fn apply_signed_in(
    state: &watch::Sender<SessionState>,
    identity: SessionIdentity,
    fetched: Option<Profile>,
) {
    let uid = identity.uid.clone();
    state.send_modify(|state| {
        let known = state
            .current_user
            .take()
            .filter(|user| user.uid() == Some(&identity.uid))
            .and_then(|user| user.profile);
        state.current_user = Some(CurrentUser {
            identity: Some(identity),
            profile: fetched.or(known),
        });
        state.is_loading = false;
    });
    tracing::info!(uid = %uid, "Session resolved: signed in");
}
