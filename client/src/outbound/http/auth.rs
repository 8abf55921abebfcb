//! `AuthGateway` over the `/auth` endpoints.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};

use super::client::{HttpJobBoardClient, Reply};
use super::dto::{LoginBody, RegisterBody};
use crate::domain::ports::{ApiError, AuthGateway};
use crate::domain::{Identity, LoginCredentials, Registration, Role};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[async_trait]
impl AuthGateway for HttpJobBoardClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<(), ApiError> {
        let body = LoginBody {
            email: credentials.email(),
            password: credentials.password(),
        };
        let request = self.json_request(Method::POST, &["auth", "login"], &body)?;
        match self.execute(request).await? {
            // A refused login is an answer for the form, not a missing session.
            Reply::Absent {
                status: StatusCode::UNAUTHORIZED,
                message,
            } => Err(ApiError::rejected(
                StatusCode::UNAUTHORIZED.as_u16(),
                message.unwrap_or_else(|| INVALID_CREDENTIALS.to_owned()),
            )),
            other => other.into_command_data().map(drop),
        }
    }

    async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let credentials = registration.credentials();
        let body = RegisterBody {
            email: credentials.email(),
            password: credentials.password(),
            name: registration.name(),
            role: Role::Applicant.as_wire(),
        };
        let request = self.json_request(Method::POST, &["auth", "register"], &body)?;
        self.execute(request).await?.into_command_data()?;
        Ok(())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let request = self.request(Method::POST, &["auth", "logout"])?;
        match self.execute(request).await? {
            // Already signed out.
            Reply::Absent { .. } => Ok(()),
            other => other.into_command_data().map(drop),
        }
    }

    async fn profile(&self) -> Result<Option<Identity>, ApiError> {
        let request = self.request(Method::GET, &["auth", "profile"])?;
        self.execute(request)
            .await?
            .into_query_record()
            .map(|value| {
                serde_json::from_value::<Identity>(value)
                    .map_err(|error| ApiError::decode(format!("profile: {error}")))
            })
            .transpose()
    }
}
