//! Administration dashboard for elevated roles.

use std::sync::Arc;

use tracing::warn;

use super::application::{Application, ApplicationStatus, ReviewDecision};
use super::ids::{ApplicationId, VacancyId};
use super::notice::Notice;
use super::ports::{ApplicationLedger, VacancyCatalogue, VacancyQuery};
use super::vacancy::Vacancy;

/// Headline figures across every vacancy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    /// Every listed vacancy, open or closed.
    pub total_vacancies: usize,
    /// Vacancies accepting applications.
    pub active_vacancies: usize,
    /// Sum of current applicant counts.
    pub total_applications: u64,
    /// Embedded applications still awaiting review.
    pub pending_applications: usize,
}

impl DashboardStats {
    /// Compute the figures for `vacancies`.
    pub fn of(vacancies: &[Vacancy]) -> Self {
        Self {
            total_vacancies: vacancies.len(),
            active_vacancies: vacancies.iter().filter(|v| v.is_active).count(),
            total_applications: vacancies
                .iter()
                .map(|v| u64::from(v.current_applicants))
                .sum(),
            pending_applications: vacancies
                .iter()
                .flat_map(|v| &v.applications)
                .filter(|a| a.status == ApplicationStatus::Pending)
                .count(),
        }
    }
}

/// One application in the review queue, with its vacancy's labels.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewEntry {
    /// Application under review.
    pub application: Application,
    /// Title of the vacancy applied to.
    pub vacancy_title: String,
    /// Company of the vacancy applied to.
    pub company: String,
}

impl ReviewEntry {
    /// Decisions available for the entry; only pending entries have any.
    pub fn decisions(&self) -> &'static [ReviewDecision] {
        if self.application.status == ApplicationStatus::Pending {
            &[ReviewDecision::Accept, ReviewDecision::Reject]
        } else {
            &[]
        }
    }
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    /// Every vacancy, inactive ones included.
    pub vacancies: Vec<Vacancy>,
    /// Headline figures.
    pub stats: DashboardStats,
    /// Embedded applications, flattened.
    pub queue: Vec<ReviewEntry>,
    /// Load failure, if any.
    pub notice: Option<Notice>,
}

fn review_queue(vacancies: &[Vacancy]) -> Vec<ReviewEntry> {
    vacancies
        .iter()
        .flat_map(|vacancy| {
            vacancy.applications.iter().map(|application| ReviewEntry {
                application: application.clone(),
                vacancy_title: vacancy.title.clone(),
                company: vacancy.company.clone(),
            })
        })
        .collect()
}

/// Dashboard service over the vacancy and application ports.
pub struct AdminDashboard<C, L> {
    catalogue: Arc<C>,
    ledger: Arc<L>,
}

impl<C, L> AdminDashboard<C, L> {
    /// Create a dashboard over the given ports.
    pub fn new(catalogue: Arc<C>, ledger: Arc<L>) -> Self {
        Self { catalogue, ledger }
    }
}

impl<C, L> AdminDashboard<C, L>
where
    C: VacancyCatalogue,
    L: ApplicationLedger,
{
    /// Load every vacancy, closed ones included, and derive the dashboard.
    pub async fn load(&self) -> DashboardView {
        let query = VacancyQuery::default().including_inactive(true);
        match self.catalogue.list(&query).await {
            Ok(vacancies) => DashboardView {
                stats: DashboardStats::of(&vacancies),
                queue: review_queue(&vacancies),
                vacancies,
                notice: None,
            },
            Err(error) => {
                warn!(%error, "dashboard load failed");
                DashboardView {
                    notice: Some(Notice::error("Could not load dashboard data")),
                    ..DashboardView::default()
                }
            }
        }
    }

    /// Flip a vacancy between open and closed.
    pub async fn toggle_vacancy(&self, id: &VacancyId) -> Notice {
        match self.catalogue.toggle_status(id).await {
            Ok(()) => Notice::success("Vacancy status updated"),
            Err(error) => {
                warn!(%error, vacancy = %id, "vacancy toggle failed");
                Notice::error(error.user_message("Could not update the vacancy"))
            }
        }
    }

    /// Accept or reject an application.
    pub async fn review(&self, id: &ApplicationId, decision: ReviewDecision) -> Notice {
        match self.ledger.review(id, decision).await {
            Ok(()) => Notice::success(format!(
                "Application {}",
                decision.status().label().to_lowercase()
            )),
            Err(error) => {
                warn!(%error, application = %id, ?decision, "review failed");
                Notice::error(error.user_message("Could not update the application"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{ApiError, MockApplicationLedger, MockVacancyCatalogue};
    use rstest::{fixture, rstest};

    fn application(id: &str, vacancy: &str, status: ApplicationStatus) -> Application {
        Application::new(
            ApplicationId::new(id).expect("application id"),
            VacancyId::new(vacancy).expect("vacancy id"),
            status,
        )
    }

    #[fixture]
    fn vacancies() -> Vec<Vacancy> {
        vec![
            Vacancy::new(VacancyId::new("v-1").expect("id"), "Rust Engineer")
                .with_company("Ferris Ltd")
                .with_capacity(5, 0)
                .with_applications(vec![
                    application("a-1", "v-1", ApplicationStatus::Pending),
                    application("a-2", "v-1", ApplicationStatus::Accepted),
                ]),
            Vacancy::new(VacancyId::new("v-2").expect("id"), "Go Engineer")
                .with_active(false)
                .with_applications(vec![application("a-3", "v-2", ApplicationStatus::Pending)]),
            Vacancy::new(VacancyId::new("v-3").expect("id"), "SRE").with_capacity(3, 2),
        ]
    }

    #[rstest]
    fn stats_summarise_every_vacancy(vacancies: Vec<Vacancy>) {
        assert_eq!(
            DashboardStats::of(&vacancies),
            DashboardStats {
                total_vacancies: 3,
                active_vacancies: 2,
                total_applications: 5,
                pending_applications: 2,
            }
        );
    }

    #[rstest]
    fn queue_flattens_with_vacancy_labels(vacancies: Vec<Vacancy>) {
        let queue = review_queue(&vacancies);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue[0].vacancy_title, "Rust Engineer");
        assert_eq!(queue[0].company, "Ferris Ltd");
        assert_eq!(queue[0].decisions().len(), 2);
        assert!(queue[1].decisions().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn load_requests_inactive_vacancies(vacancies: Vec<Vacancy>) {
        let mut catalogue = MockVacancyCatalogue::new();
        catalogue
            .expect_list()
            .withf(|q: &VacancyQuery| q.include_inactive && q.title.is_none())
            .times(1)
            .return_once(move |_| Ok(vacancies));
        let dashboard =
            AdminDashboard::new(Arc::new(catalogue), Arc::new(MockApplicationLedger::new()));
        let view = dashboard.load().await;
        assert_eq!(view.stats.total_vacancies, 3);
        assert_eq!(view.queue.len(), 3);
        assert!(view.notice.is_none());
    }

    #[tokio::test]
    async fn failed_load_reports_a_notice() {
        let mut catalogue = MockVacancyCatalogue::new();
        catalogue
            .expect_list()
            .returning(|_| Err(ApiError::timeout("30s")));
        let dashboard =
            AdminDashboard::new(Arc::new(catalogue), Arc::new(MockApplicationLedger::new()));
        let view = dashboard.load().await;
        assert!(view.vacancies.is_empty());
        assert!(view.notice.as_ref().is_some_and(Notice::is_error));
    }

    #[rstest]
    #[case(ReviewDecision::Accept, "Application accepted")]
    #[case(ReviewDecision::Reject, "Application rejected")]
    #[tokio::test]
    async fn review_reports_the_new_status(
        #[case] decision: ReviewDecision,
        #[case] expected: &str,
    ) {
        let mut ledger = MockApplicationLedger::new();
        ledger
            .expect_review()
            .withf(move |id: &ApplicationId, d: &ReviewDecision| {
                id.as_ref() == "a-1" && *d == decision
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let dashboard =
            AdminDashboard::new(Arc::new(MockVacancyCatalogue::new()), Arc::new(ledger));
        let id = ApplicationId::new("a-1").expect("id");
        assert_eq!(dashboard.review(&id, decision).await, Notice::success(expected));
    }

    #[tokio::test]
    async fn toggle_failures_surface_the_server_message() {
        let mut catalogue = MockVacancyCatalogue::new();
        catalogue
            .expect_toggle_status()
            .returning(|_| Err(ApiError::rejected(403_u16, "Forbidden resource")));
        let dashboard =
            AdminDashboard::new(Arc::new(catalogue), Arc::new(MockApplicationLedger::new()));
        let id = VacancyId::new("v-1").expect("id");
        assert_eq!(
            dashboard.toggle_vacancy(&id).await,
            Notice::error("Forbidden resource")
        );
    }
}
