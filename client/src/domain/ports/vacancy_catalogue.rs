//! Driven port for the vacancy endpoints.

use async_trait::async_trait;

use super::ApiError;
use crate::domain::{NewVacancy, Vacancy, VacancyId};

/// Filters for listing vacancies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VacancyQuery {
    /// Title search text, matched by the server.
    pub title: Option<String>,
    /// One-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
    /// Include closed vacancies; only honoured for elevated roles.
    pub include_inactive: bool,
}

impl VacancyQuery {
    /// Query for `search`, ignoring blank text.
    pub fn search(search: Option<&str>) -> Self {
        Self {
            title: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            ..Self::default()
        }
    }

    /// Request closed vacancies as well.
    pub fn including_inactive(mut self, include: bool) -> Self {
        self.include_inactive = include;
        self
    }

    /// Cap the page size.
    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }
}

/// Port for reading and managing vacancies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VacancyCatalogue: Send + Sync {
    /// List vacancies; an absent session yields an empty list.
    async fn list(&self, query: &VacancyQuery) -> Result<Vec<Vacancy>, ApiError>;

    /// Publish a vacancy. Returns the created record when the server echoes it.
    async fn create(&self, vacancy: &NewVacancy) -> Result<Option<Vacancy>, ApiError>;

    /// Flip a vacancy's active flag.
    async fn toggle_status(&self, id: &VacancyId) -> Result<(), ApiError>;
}

/// Fixture catalogue with no vacancies.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureVacancyCatalogue;

#[async_trait]
impl VacancyCatalogue for FixtureVacancyCatalogue {
    async fn list(&self, _query: &VacancyQuery) -> Result<Vec<Vacancy>, ApiError> {
        Ok(Vec::new())
    }

    async fn create(&self, _vacancy: &NewVacancy) -> Result<Option<Vacancy>, ApiError> {
        Ok(None)
    }

    async fn toggle_status(&self, id: &VacancyId) -> Result<(), ApiError> {
        Err(ApiError::not_found(format!("vacancy {id}")))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("   "), None)]
    #[case(Some(" rust "), Some("rust"))]
    fn search_text_is_trimmed(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(VacancyQuery::search(raw).title.as_deref(), expected);
    }
}
