//! Logout Use Case

use std::sync::Arc;

use crate::domain::service::IdentityService;
use crate::error::ChirprResult;

/// Logout use case
pub struct LogoutUseCase<I>
where
    I: IdentityService,
{
    identity: Arc<I>,
}

impl<I> LogoutUseCase<I>
where
    I: IdentityService,
{
    pub fn new(identity: Arc<I>) -> Self {
        Self { identity }
    }

    /// Single attempt; the auth-state stream reports the change
    pub async fn execute(&self) -> ChirprResult<()> {
        self.identity.sign_out().await?;
        tracing::info!("User signed out");
        Ok(())
    }
}
