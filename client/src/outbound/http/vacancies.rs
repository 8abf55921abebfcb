//! `VacancyCatalogue` over the `/vacancies` endpoints.

use async_trait::async_trait;
use envelope::decode_items;
use reqwest::Method;
use tracing::warn;

use super::client::HttpJobBoardClient;
use super::dto::{VacancyDto, vacancy_record};
use crate::domain::ports::{ApiError, VacancyCatalogue, VacancyQuery};
use crate::domain::{NewVacancy, Vacancy, VacancyId};

const LIST_PATH: &str = "/vacancies";

fn query_pairs(query: &VacancyQuery) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(page) = query.page {
        pairs.push(("page", page.to_string()));
    }
    if let Some(limit) = query.limit {
        pairs.push(("limit", limit.to_string()));
    }
    if let Some(title) = &query.title {
        pairs.push(("title", title.clone()));
    }
    if query.include_inactive {
        pairs.push(("includeInactive", "true".to_owned()));
    }
    pairs
}

#[async_trait]
impl VacancyCatalogue for HttpJobBoardClient {
    async fn list(&self, query: &VacancyQuery) -> Result<Vec<Vacancy>, ApiError> {
        let request = self.request(Method::GET, &["vacancies"])?.query(&query_pairs(query));
        let Some(data) = self.execute(request).await?.into_query_data() else {
            return Ok(Vec::new());
        };
        let decoded = decode_items::<VacancyDto>(data);
        if !decoded.shape_recognised {
            warn!(path = LIST_PATH, "unrecognised list shape; treating as empty");
        }
        if let Some(first) = decoded.rejected.first() {
            warn!(
                path = LIST_PATH,
                skipped = decoded.rejected.len(),
                first = %first,
                "skipping malformed vacancies"
            );
        }
        Ok(decoded
            .items
            .into_iter()
            .map(VacancyDto::into_domain)
            .collect())
    }

    async fn create(&self, vacancy: &NewVacancy) -> Result<Option<Vacancy>, ApiError> {
        let request = self.json_request(Method::POST, &["vacancies"], vacancy)?;
        Ok(self
            .execute(request)
            .await?
            .into_command_data()?
            .and_then(vacancy_record))
    }

    async fn toggle_status(&self, id: &VacancyId) -> Result<(), ApiError> {
        let request = self.request(Method::PATCH, &["vacancies", id.as_ref(), "status"])?;
        self.execute(request).await?.into_command_data()?;
        Ok(())
    }
}
