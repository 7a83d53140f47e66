//! Update Profile Use Case
//!
//! Changes exactly one editable profile field of the current user.

use std::sync::Arc;

use crate::application::config::ChirprConfig;
use crate::application::outcome::WriteOutcome;
use crate::domain::entity::{current_user::CurrentUser, profile::ProfileField};
use crate::domain::service::DocumentStore;
use crate::error::ChirprResult;

/// Update profile use case
pub struct UpdateProfileUseCase<S>
where
    S: DocumentStore,
{
    store: Arc<S>,
    config: Arc<ChirprConfig>,
}

impl<S> UpdateProfileUseCase<S>
where
    S: DocumentStore,
{
    pub fn new(store: Arc<S>, config: Arc<ChirprConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(
        &self,
        current: Option<&CurrentUser>,
        field: ProfileField,
        value: &str,
    ) -> ChirprResult<WriteOutcome> {
        let Some(uid) = current.and_then(CurrentUser::writer) else {
            tracing::debug!(field = field.field_name(), "No signed-in user with a profile; update skipped");
            return Ok(WriteOutcome::Skipped);
        };

        let path = self.config.profile_path(uid);
        if let Err(e) = self.store.update_fields(&path, field.patch(value)).await {
            tracing::error!(uid = %uid, field = field.field_name(), error = %e, "Failed to update profile");
            return Err(e.into());
        }

        tracing::info!(uid = %uid, field = field.field_name(), "Profile updated");
        Ok(WriteOutcome::Written(()))
    }
}
