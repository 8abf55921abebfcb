//! Vacancy board: load, derive and apply.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::application::Application;
use super::eligibility::{ActiveQuota, ApplyAction, DerivedVacancy, Viewer, derive_all};
use super::identity::Role;
use super::ids::VacancyId;
use super::notice::Notice;
use super::ports::{ApplicationLedger, VacancyCatalogue, VacancyQuery};
use super::search::SearchRunner;
use super::session::SessionSnapshot;

const LOAD_FAILED: &str = "Could not load vacancies";
const APPLY_FAILED: &str = "Could not submit the application";
const APPLY_SENT: &str = "Application sent";

/// Derived board contents for one viewer and search.
#[derive(Debug, Clone)]
pub struct BoardView {
    /// Search text the board was loaded for, if any.
    pub search: Option<String>,
    /// Vacancies with their derived state, in server order.
    pub vacancies: Vec<DerivedVacancy>,
    /// Who the board was derived for.
    pub viewer: Viewer,
    /// Set when the load failed.
    pub notice: Option<Notice>,
}

impl BoardView {
    /// Active-application summary, for applicants only.
    pub fn quota(&self) -> Option<ActiveQuota> {
        self.viewer.quota()
    }

    /// Look up a vacancy on the board.
    pub fn find(&self, id: &VacancyId) -> Option<&DerivedVacancy> {
        self.vacancies.iter().find(|d| &d.vacancy.id == id)
    }
}

/// Outcome of an apply request.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    /// The viewer is not eligible; no request was made.
    NotEligible(ApplyAction),
    /// The server accepted the application.
    Submitted {
        /// Success notice.
        notice: Notice,
        /// Created application, when echoed by the server.
        application: Option<Application>,
    },
    /// The server refused or the call failed.
    Failed(Notice),
}

impl ApplyOutcome {
    /// Notice to show for the outcome.
    pub fn notice(&self) -> Notice {
        match self {
            Self::NotEligible(action) => Notice::info(action.label()),
            Self::Submitted { notice, .. } | Self::Failed(notice) => notice.clone(),
        }
    }
}

/// Board service over the vacancy and application ports.
pub struct VacancyBoard<C, L> {
    catalogue: Arc<C>,
    ledger: Arc<L>,
    page_limit: Option<u32>,
}

impl<C, L> Clone for VacancyBoard<C, L> {
    fn clone(&self) -> Self {
        Self {
            catalogue: Arc::clone(&self.catalogue),
            ledger: Arc::clone(&self.ledger),
            page_limit: self.page_limit,
        }
    }
}

impl<C, L> VacancyBoard<C, L> {
    /// Create a board over the given ports.
    pub fn new(catalogue: Arc<C>, ledger: Arc<L>) -> Self {
        Self {
            catalogue,
            ledger,
            page_limit: None,
        }
    }

    /// Ask the server for at most `limit` vacancies per load.
    pub fn with_page_limit(mut self, limit: Option<u32>) -> Self {
        self.page_limit = limit;
        self
    }
}

impl<C, L> VacancyBoard<C, L>
where
    C: VacancyCatalogue,
    L: ApplicationLedger,
{
    /// Fetch vacancies and, for applicants, their applications, then derive
    /// the board.
    ///
    /// Both fetches run concurrently. If either fails the board is empty and
    /// carries an error notice.
    pub async fn load(&self, search: Option<&str>, session: &SessionSnapshot) -> BoardView {
        let role = session.role();
        let query = VacancyQuery::search(search)
            .including_inactive(role.is_some_and(Role::is_elevated))
            .with_limit(self.page_limit);
        let applications = async {
            if role.is_some_and(Role::is_applicant) {
                self.ledger.my_applications().await
            } else {
                Ok(Vec::new())
            }
        };

        match tokio::try_join!(self.catalogue.list(&query), applications) {
            Ok((vacancies, applications)) => {
                debug!(
                    vacancies = vacancies.len(),
                    applications = applications.len(),
                    "board loaded"
                );
                let viewer = Viewer::new(role, applications);
                BoardView {
                    search: query.title,
                    vacancies: derive_all(vacancies, &viewer),
                    viewer,
                    notice: None,
                }
            }
            Err(error) => {
                warn!(%error, "board load failed");
                BoardView {
                    search: query.title,
                    vacancies: Vec::new(),
                    viewer: Viewer::new(role, Vec::new()),
                    notice: Some(Notice::error(LOAD_FAILED)),
                }
            }
        }
    }

    /// Apply to `vacancy` if the board says the viewer may.
    ///
    /// The check is advisory. Vacancies missing from the board are only
    /// checked against the viewer's global eligibility.
    pub async fn apply(&self, vacancy: &VacancyId, board: &BoardView) -> ApplyOutcome {
        let blocked = match board.find(vacancy) {
            Some(derived) if !derived.state.may_apply() => Some(derived.state.action),
            Some(_) => None,
            None if !board.viewer.can_apply() => Some(ApplyAction::LimitReached),
            None => None,
        };
        if let Some(action) = blocked {
            debug!(%vacancy, ?action, "apply skipped");
            return ApplyOutcome::NotEligible(action);
        }

        match self.ledger.apply(vacancy).await {
            Ok(application) => ApplyOutcome::Submitted {
                notice: Notice::success(APPLY_SENT),
                application,
            },
            Err(error) => {
                warn!(%error, %vacancy, "apply failed");
                ApplyOutcome::Failed(Notice::error(error.user_message(APPLY_FAILED)))
            }
        }
    }
}

/// Runs board loads for the debounced search, using the latest session.
///
/// A newly published session re-runs the last search so derived state
/// follows sign-in and sign-out.
pub struct BoardSearch<C, L> {
    board: VacancyBoard<C, L>,
    session: watch::Receiver<SessionSnapshot>,
    changes: Mutex<watch::Receiver<SessionSnapshot>>,
}

impl<C, L> BoardSearch<C, L> {
    /// Wrap `board`, reading the viewer from `session`.
    pub fn new(board: VacancyBoard<C, L>, session: watch::Receiver<SessionSnapshot>) -> Self {
        let mut changes = session.clone();
        changes.mark_unchanged();
        Self {
            board,
            session,
            changes: Mutex::new(changes),
        }
    }
}

#[async_trait]
impl<C, L> SearchRunner for BoardSearch<C, L>
where
    C: VacancyCatalogue + 'static,
    L: ApplicationLedger + 'static,
{
    type Output = BoardView;

    async fn run(&self, text: String, _cancel: CancellationToken) -> BoardView {
        let session = self.session.borrow().clone();
        self.board.load(Some(&text), &session).await
    }

    async fn context_changed(&self) {
        let mut changes = self.changes.lock().await;
        if changes.changed().await.is_err() {
            // Resolver gone: the session can no longer change.
            drop(changes);
            std::future::pending::<()>().await;
        }
    }
}
