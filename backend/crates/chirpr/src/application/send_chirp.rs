//! Send Chirp Use Case

use std::sync::Arc;

use crate::application::config::ChirprConfig;
use crate::application::outcome::WriteOutcome;
use crate::domain::document::DocumentConverter;
use crate::domain::entity::{
    chirp::{Chirp, ChirpConverter},
    current_user::CurrentUser,
};
use crate::domain::service::DocumentStore;
use crate::domain::value_object::chirp_id::ChirpId;
use crate::error::ChirprResult;

/// Send chirp input
pub struct SendChirpInput {
    pub text: String,
    /// Image references, stored as given
    pub images: Vec<String>,
}

/// Send chirp use case
pub struct SendChirpUseCase<S>
where
    S: DocumentStore,
{
    store: Arc<S>,
    config: Arc<ChirprConfig>,
}

impl<S> SendChirpUseCase<S>
where
    S: DocumentStore,
{
    pub fn new(store: Arc<S>, config: Arc<ChirprConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(
        &self,
        current: Option<&CurrentUser>,
        input: SendChirpInput,
    ) -> ChirprResult<WriteOutcome<ChirpId>> {
        let Some(author) = current.and_then(CurrentUser::writer) else {
            tracing::debug!("No signed-in user with a profile; chirp not sent");
            return Ok(WriteOutcome::Skipped);
        };

        let chirp = Chirp::compose(author.clone(), input.text, input.images);
        let path = self.config.chirp_path(&chirp.id);

        if let Err(e) = self
            .store
            .set_document(&path, ChirpConverter.to_fields(&chirp))
            .await
        {
            tracing::error!(uid = %author, error = %e, "Failed to send chirp");
            return Err(e.into());
        }

        tracing::info!(uid = %author, chirp_id = %chirp.id, "Chirp sent");
        Ok(WriteOutcome::Written(chirp.id))
    }
}
