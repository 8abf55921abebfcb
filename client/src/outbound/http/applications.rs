//! `ApplicationLedger` over the `/applications` endpoints.

use async_trait::async_trait;
use envelope::decode_items;
use reqwest::Method;
use tracing::warn;

use super::client::HttpJobBoardClient;
use super::dto::{ApplyBody, StatusBody, with_vacancy_id};
use crate::domain::ports::{ApiError, ApplicationLedger};
use crate::domain::{Application, ApplicationId, ReviewDecision, VacancyId};

const LIST_PATH: &str = "/applications/my-applications";

#[async_trait]
impl ApplicationLedger for HttpJobBoardClient {
    async fn apply(&self, vacancy: &VacancyId) -> Result<Option<Application>, ApiError> {
        let body = ApplyBody {
            vacancy_id: vacancy,
        };
        let request = self.json_request(Method::POST, &["applications"], &body)?;
        let echoed = self.execute(request).await?.into_command_data()?;
        Ok(echoed.and_then(|value| {
            serde_json::from_value::<Application>(with_vacancy_id(value, vacancy))
                .inspect_err(|error| warn!(%error, %vacancy, "application echo did not decode"))
                .ok()
        }))
    }

    async fn my_applications(&self) -> Result<Vec<Application>, ApiError> {
        let request = self.request(Method::GET, &["applications", "my-applications"])?;
        let Some(data) = self.execute(request).await?.into_query_data() else {
            return Ok(Vec::new());
        };
        let decoded = decode_items::<Application>(data);
        if !decoded.shape_recognised {
            warn!(path = LIST_PATH, "unrecognised list shape; treating as empty");
        }
        if !decoded.rejected.is_empty() {
            warn!(
                path = LIST_PATH,
                skipped = decoded.rejected.len(),
                "skipping malformed applications"
            );
        }
        Ok(decoded.items)
    }

    async fn review(&self, id: &ApplicationId, decision: ReviewDecision) -> Result<(), ApiError> {
        let body = StatusBody {
            status: decision.status(),
        };
        let request =
            self.json_request(Method::PATCH, &["applications", id.as_ref(), "status"], &body)?;
        self.execute(request).await?.into_command_data()?;
        Ok(())
    }
}
