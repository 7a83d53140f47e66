//! Login Use Case

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::domain::entity::session_identity::SessionIdentity;
use crate::domain::service::IdentityService;
use crate::domain::value_object::{
    auth_failure::{AuthFailure, codes},
    email::Email,
};
use crate::error::ChirprResult;

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login use case
pub struct LoginUseCase<I>
where
    I: IdentityService,
{
    identity: Arc<I>,
}

impl<I> LoginUseCase<I>
where
    I: IdentityService,
{
    pub fn new(identity: Arc<I>) -> Self {
        Self { identity }
    }

    pub async fn execute(&self, input: LoginInput) -> ChirprResult<SessionIdentity> {
        let email = Email::parse(&input.email)?;
        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthFailure::new(codes::MISSING_PASSWORD).with_detail(e.to_string()))?;

        match self.identity.sign_in(&email, &password).await {
            Ok(identity) => {
                tracing::info!(uid = %identity.uid, "User signed in");
                Ok(identity)
            }
            Err(failure) => {
                tracing::warn!(reason = failure.reason(), "Sign-in rejected");
                Err(failure.into())
            }
        }
    }
}
