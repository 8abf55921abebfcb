//! Driven port for the application endpoints.

use async_trait::async_trait;

use super::ApiError;
use crate::domain::{Application, ApplicationId, ReviewDecision, VacancyId};

/// Port for submitting and reviewing applications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationLedger: Send + Sync {
    /// Apply to a vacancy. Returns the new application when the server
    /// echoes it.
    async fn apply(&self, vacancy: &VacancyId) -> Result<Option<Application>, ApiError>;

    /// The caller's applications; an absent session yields an empty list.
    async fn my_applications(&self) -> Result<Vec<Application>, ApiError>;

    /// Record an elevated role's decision on an application.
    async fn review(&self, id: &ApplicationId, decision: ReviewDecision) -> Result<(), ApiError>;
}

/// Fixture ledger with no applications.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureApplicationLedger;

#[async_trait]
impl ApplicationLedger for FixtureApplicationLedger {
    async fn apply(&self, _vacancy: &VacancyId) -> Result<Option<Application>, ApiError> {
        Ok(None)
    }

    async fn my_applications(&self) -> Result<Vec<Application>, ApiError> {
        Ok(Vec::new())
    }

    async fn review(&self, id: &ApplicationId, _decision: ReviewDecision) -> Result<(), ApiError> {
        Err(ApiError::not_found(format!("application {id}")))
    }
}
