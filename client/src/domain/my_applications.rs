//! The applicant's own applications.

use std::sync::Arc;

use tracing::warn;

use super::application::{Application, ApplicationStatus};
use super::eligibility::{ACTIVE_APPLICATION_LIMIT, ActiveQuota};
use super::notice::Notice;
use super::ports::ApplicationLedger;
use super::timestamp::long_date;

const TITLE_FALLBACK: &str = "Vacancy";
const COMPANY_FALLBACK: &str = "Company";
const DATE_FALLBACK: &str = "Unknown date";

/// One row of the applications list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationRow {
    /// Vacancy title, or `Vacancy` when the server omitted it.
    pub vacancy_title: String,
    /// Company, or `Company` when the server omitted it.
    pub company: String,
    /// Review status.
    pub status: ApplicationStatus,
    /// Long-form submission date.
    pub applied_on: String,
}

impl From<&Application> for ApplicationRow {
    fn from(application: &Application) -> Self {
        let summary = application.vacancy.as_ref();
        let label = |value: Option<&String>, fallback: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .map_or_else(|| fallback.to_owned(), Clone::clone)
        };
        Self {
            vacancy_title: label(summary.and_then(|s| s.title.as_ref()), TITLE_FALLBACK),
            company: label(summary.and_then(|s| s.company.as_ref()), COMPANY_FALLBACK),
            status: application.status,
            applied_on: application
                .created_at
                .map(long_date)
                .unwrap_or_else(|| DATE_FALLBACK.to_owned()),
        }
    }
}

/// What the applications page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MyApplicationsView {
    /// One row per application, in server order.
    pub rows: Vec<ApplicationRow>,
    /// Active applications against the limit.
    pub quota: ActiveQuota,
    /// Load failure, if any.
    pub notice: Option<Notice>,
}

impl MyApplicationsView {
    /// Build the view from fetched applications.
    pub fn from_applications(applications: &[Application]) -> Self {
        Self {
            rows: applications.iter().map(ApplicationRow::from).collect(),
            quota: ActiveQuota {
                active: applications.iter().filter(|a| a.is_active()).count(),
            },
            notice: None,
        }
    }

    /// Whether the applicant has room for another application.
    pub fn has_room(&self) -> bool {
        self.quota.active < ACTIVE_APPLICATION_LIMIT
    }
}

/// Fetch the caller's applications and build the view.
pub async fn load_my_applications<L>(ledger: &Arc<L>) -> MyApplicationsView
where
    L: ApplicationLedger,
{
    match ledger.my_applications().await {
        Ok(applications) => MyApplicationsView::from_applications(&applications),
        Err(error) => {
            warn!(%error, "applications load failed");
            MyApplicationsView {
                notice: Some(Notice::error("Could not load your applications")),
                ..MyApplicationsView::from_applications(&[])
            }
        }
    }
}
