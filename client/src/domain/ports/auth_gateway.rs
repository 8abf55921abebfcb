//! Driven port for the account endpoints.
//!
//! The gateway owns the credential exchange and the profile lookup. Session
//! state itself lives in the domain's resolver, which only ever talks to this
//! trait.

use async_trait::async_trait;

use super::ApiError;
use crate::domain::{Identity, LoginCredentials, Registration};

/// Port for authenticating against the job-board API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a session.
    async fn login(&self, credentials: &LoginCredentials) -> Result<(), ApiError>;

    /// Create an applicant account. Does not sign in.
    async fn register(&self, registration: &Registration) -> Result<(), ApiError>;

    /// Invalidate the current session.
    async fn logout(&self) -> Result<(), ApiError>;

    /// Fetch the signed-in identity.
    ///
    /// Returns `Ok(None)` when the server reports no session (401 or 404).
    async fn profile(&self) -> Result<Option<Identity>, ApiError>;
}

/// Fixture gateway that never has a session.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureAuthGateway;

#[async_trait]
impl AuthGateway for FixtureAuthGateway {
    async fn login(&self, _credentials: &LoginCredentials) -> Result<(), ApiError> {
        Err(ApiError::unauthorized("fixture gateway rejects every login"))
    }

    async fn register(&self, _registration: &Registration) -> Result<(), ApiError> {
        Ok(())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        Ok(())
    }

    async fn profile(&self) -> Result<Option<Identity>, ApiError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn fixture_gateway_is_signed_out() {
        let gateway = FixtureAuthGateway;
        let creds = LoginCredentials::try_from_parts("ada@example.com", "pw").expect("creds");
        assert!(matches!(
            gateway.login(&creds).await,
            Err(ApiError::Unauthorized { .. })
        ));
        assert_eq!(gateway.profile().await, Ok(None));
        assert_eq!(gateway.logout().await, Ok(()));
    }
}
