//! Register Use Case
//!
//! Creates an account with the identity service, then writes the new user's
//! profile record.

use std::sync::Arc;

use chrono::Utc;
use platform::password::ClearTextPassword;

use crate::application::config::ChirprConfig;
use crate::domain::document::DocumentConverter;
use crate::domain::entity::profile::{Profile, ProfileConverter};
use crate::domain::entity::session_identity::SessionIdentity;
use crate::domain::service::{DocumentStore, IdentityService};
use crate::domain::value_object::{
    auth_failure::{AuthFailure, codes},
    chirp_handle::ChirpHandle,
    email::Email,
};
use crate::error::ChirprResult;

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub password: String,
}

/// Register output
#[derive(Debug, Clone)]
pub struct Registration {
    pub identity: SessionIdentity,
    pub profile: Profile,
}

/// Register use case
pub struct RegisterUseCase<I, S>
where
    I: IdentityService,
    S: DocumentStore,
{
    identity: Arc<I>,
    store: Arc<S>,
    config: Arc<ChirprConfig>,
}

impl<I, S> RegisterUseCase<I, S>
where
    I: IdentityService,
    S: DocumentStore,
{
    pub fn new(identity: Arc<I>, store: Arc<S>, config: Arc<ChirprConfig>) -> Self {
        Self {
            identity,
            store,
            config,
        }
    }

    /// `derive_handle` picks the raw handle once the account exists; a blank
    /// answer falls back to [`ChirpHandle::suggest`].
    pub async fn execute<F>(&self, input: RegisterInput, derive_handle: F) -> ChirprResult<Registration>
    where
        F: FnOnce(&SessionIdentity) -> String,
    {
        let email = Email::parse(&input.email)?;
        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthFailure::new(codes::MISSING_PASSWORD).with_detail(e.to_string()))?;

        let identity = self.identity.create_account(&email, &password).await?;

        let raw_handle = derive_handle(&identity);
        let handle = ChirpHandle::encode(&raw_handle).unwrap_or_else(|| {
            ChirpHandle::suggest(identity.email.as_ref().or(Some(&email)))
        });
        let pic = identity
            .photo_url
            .clone()
            .unwrap_or_else(|| self.config.default_avatar_url.clone());
        let profile = Profile::registered(identity.uid.clone(), handle, pic, Utc::now());

        let path = self.config.profile_path(&identity.uid);
        if let Err(e) = self
            .store
            .set_document(&path, ProfileConverter.to_fields(&profile))
            .await
        {
            tracing::error!(uid = %identity.uid, error = %e, "Failed to write profile for new account");
            return Err(e.into());
        }

        tracing::info!(
            uid = %identity.uid,
            handle = %profile.handle,
            "User registered"
        );

        Ok(Registration { identity, profile })
    }
}
