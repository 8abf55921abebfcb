//! Command-line front end.
//!
//! [`Cli`] parses arguments; [`CliApp`] runs one command against the domain
//! services and renders the result. The app is generic over the ports so the
//! same code runs against the HTTP adapter and test doubles.

pub mod render;

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::info;

use crate::domain::ports::{ApiError, ApplicationLedger, AuthGateway, VacancyCatalogue};
use crate::domain::{
    AdminDashboard, ApplicationId, ApplyOutcome, BoardSearch, DEFAULT_DEBOUNCE, DebouncedSearch,
    Destination, FormValidationError, IdValidationError, LoginCredentials, NewVacancy, Notice,
    ProfileCard, Registration, ReviewDecision, SessionResolver, SessionSnapshot, VacancyBoard,
    VacancyDraft, VacancyId, landing_for, load_my_applications,
};

/// `jobboard` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "jobboard",
    about = "Browse and manage job-board vacancies from the terminal",
    version
)]
pub struct Cli {
    /// Action to run.
    #[command(subcommand)]
    pub command: Command,
}

/// One client action.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the signed-in profile.
    Profile,
    /// Sign in and show where the account lands.
    Login {
        /// Account email; defaults to `JOBBOARD_EMAIL`.
        #[arg(long)]
        email: Option<String>,
        /// Account password; defaults to `JOBBOARD_PASSWORD`.
        #[arg(long)]
        password: Option<String>,
    },
    /// End the session.
    Logout,
    /// Create an applicant account.
    Register {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long)]
        password: String,
        /// Display name.
        #[arg(long)]
        name: String,
    },
    /// List vacancies with their availability for the current viewer.
    Vacancies {
        /// Title search text.
        #[arg(long)]
        search: Option<String>,
    },
    /// Interactive search: each stdin line replaces the query.
    Search,
    /// Apply to a vacancy.
    Apply {
        /// Vacancy identifier.
        id: String,
    },
    /// List the applicant's own applications.
    Applications,
    /// Publish a new vacancy.
    CreateVacancy(DraftArgs),
    /// Open or close a vacancy.
    ToggleVacancy {
        /// Vacancy identifier.
        id: String,
    },
    /// Accept or reject an application.
    Review {
        /// Application identifier.
        id: String,
        /// Decision to record.
        #[arg(value_enum)]
        decision: DecisionArg,
    },
    /// Show the administration dashboard.
    Admin,
    /// Show the navigation menu for the current role.
    Nav,
}

/// Vacancy form fields, taken as typed and validated by the domain.
#[derive(Debug, Clone, Default, Args)]
pub struct DraftArgs {
    /// Job title.
    #[arg(long, default_value = "")]
    pub title: String,
    /// Free-text description.
    #[arg(long, default_value = "")]
    pub description: String,
    /// Hiring company.
    #[arg(long, default_value = "")]
    pub company: String,
    /// Where the job is based.
    #[arg(long, default_value = "")]
    pub location: String,
    /// Salary range as displayed, e.g. `3000-4000 USD`.
    #[arg(long = "salary-range", default_value = "")]
    pub salary_range: String,
    /// Applicant ceiling, a positive integer.
    #[arg(long = "max-applicants", default_value = "")]
    pub max_applicants: String,
    /// Seniority level.
    #[arg(long, default_value = "")]
    pub seniority: String,
    /// Soft skills sought.
    #[arg(long = "soft-skills", default_value = "")]
    pub soft_skills: String,
    /// One of `remoto`, `hibrido` or `presencial`.
    #[arg(long, default_value = "")]
    pub modality: String,
}

impl From<DraftArgs> for VacancyDraft {
    fn from(args: DraftArgs) -> Self {
        Self {
            title: args.title,
            description: args.description,
            company: args.company,
            location: args.location,
            salary_range: args.salary_range,
            max_applicants: args.max_applicants,
            seniority: args.seniority,
            soft_skills: args.soft_skills,
            modality: args.modality,
        }
    }
}

/// Review decision as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DecisionArg {
    /// Accept the application.
    Accept,
    /// Reject the application.
    Reject,
}

impl From<DecisionArg> for ReviewDecision {
    fn from(arg: DecisionArg) -> Self {
        match arg {
            DecisionArg::Accept => Self::Accept,
            DecisionArg::Reject => Self::Reject,
        }
    }
}

/// Errors that end a command unsuccessfully.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Output or stdin failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
    /// A form field failed validation.
    #[error("invalid input: {0}")]
    Form(#[from] FormValidationError),
    /// An identifier argument was malformed.
    #[error("invalid identifier: {0}")]
    Id(#[from] IdValidationError),
    /// The API call failed outright.
    #[error("{0}")]
    Api(#[from] ApiError),
    /// `login` ran without an email or password.
    #[error("sign-in credentials are required")]
    MissingCredentials,
    /// The signed-in role may not open the destination.
    #[error("{destination} requires {requirement}")]
    NotPermitted {
        /// Command label.
        destination: &'static str,
        /// Role the command needs.
        requirement: &'static str,
    },
    /// The command ran and reported a failure notice.
    #[error("{0}")]
    Failed(String),
}

/// Runs commands against the domain services.
pub struct CliApp<A, C, L> {
    session: SessionResolver<A>,
    board: VacancyBoard<C, L>,
    dashboard: AdminDashboard<C, L>,
    catalogue: Arc<C>,
    ledger: Arc<L>,
    debounce: Duration,
}

impl<A, C, L> CliApp<A, C, L> {
    /// Wire the app over shared port implementations.
    pub fn new(gateway: Arc<A>, catalogue: Arc<C>, ledger: Arc<L>) -> Self {
        Self {
            session: SessionResolver::new(gateway),
            board: VacancyBoard::new(Arc::clone(&catalogue), Arc::clone(&ledger)),
            dashboard: AdminDashboard::new(Arc::clone(&catalogue), Arc::clone(&ledger)),
            catalogue,
            ledger,
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Override the search debounce window.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Cap the vacancy page size.
    pub fn with_page_limit(mut self, limit: Option<u32>) -> Self {
        self.board = self.board.with_page_limit(limit);
        self
    }

    /// Current session state.
    pub fn session(&self) -> SessionSnapshot {
        self.session.snapshot()
    }
}

impl<A, C, L> CliApp<A, C, L>
where
    A: AuthGateway + 'static,
    C: VacancyCatalogue + 'static,
    L: ApplicationLedger + 'static,
{
    /// Resolve the session, signing in first when credentials are given.
    ///
    /// A refused sign-in is reported and the app continues signed out.
    pub async fn start(
        &self,
        credentials: Option<&LoginCredentials>,
        out: &mut impl Write,
    ) -> Result<SessionSnapshot, CliError> {
        if let Some(credentials) = credentials {
            match self.session.login(credentials).await {
                Ok(_) => return Ok(self.session.snapshot()),
                Err(error) => {
                    render::notice(out, &Notice::error(error.user_message("Sign-in failed")))?;
                }
            }
        }
        Ok(self.session.initialize().await)
    }

    /// Run one command, reading interactive input from `input`.
    pub async fn run<R>(
        &self,
        command: Command,
        input: R,
        out: &mut impl Write,
    ) -> Result<(), CliError>
    where
        R: AsyncBufRead + Unpin,
    {
        match command {
            Command::Profile => self.profile(out),
            Command::Login { email, password } => self.login(email, password, out).await,
            Command::Logout => {
                self.session.logout().await;
                render::notice(out, &Notice::info("Signed out"))?;
                Ok(())
            }
            Command::Register {
                email,
                password,
                name,
            } => self.register(&email, &password, &name, out).await,
            Command::Vacancies { search } => {
                let view = self.board.load(search.as_deref(), &self.session()).await;
                render::board(out, &view)?;
                Ok(())
            }
            Command::Search => self.search(input, out).await,
            Command::Apply { id } => self.apply(&id, out).await,
            Command::Applications => self.applications(out).await,
            Command::CreateVacancy(draft) => self.create_vacancy(draft, out).await,
            Command::ToggleVacancy { id } => {
                self.require_elevated(Destination::Admin)?;
                let id = VacancyId::new(id)?;
                finish(out, &self.dashboard.toggle_vacancy(&id).await)
            }
            Command::Review { id, decision } => {
                self.require_elevated(Destination::Admin)?;
                let id = ApplicationId::new(id)?;
                finish(out, &self.dashboard.review(&id, decision.into()).await)
            }
            Command::Admin => {
                self.require_elevated(Destination::Admin)?;
                let view = self.dashboard.load().await;
                render::dashboard(out, &view)?;
                Ok(())
            }
            Command::Nav => {
                render::menu(out, self.session().role())?;
                Ok(())
            }
        }
    }

    fn profile(&self, out: &mut impl Write) -> Result<(), CliError> {
        let snapshot = self.session();
        let card = snapshot.identity().map(ProfileCard::from_identity);
        render::profile(out, card.as_ref())?;
        Ok(())
    }

    async fn login(
        &self,
        email: Option<String>,
        password: Option<String>,
        out: &mut impl Write,
    ) -> Result<(), CliError> {
        let (Some(email), Some(password)) = (email, password) else {
            return Err(CliError::MissingCredentials);
        };
        let credentials = LoginCredentials::try_from_parts(&email, &password)
            .map_err(FormValidationError::from)?;
        let identity = self.session.login(&credentials).await?;
        let Some(identity) = identity else {
            return Err(CliError::Failed(
                "Signed in, but the profile could not be loaded".to_owned(),
            ));
        };
        let landing = landing_for(Some(identity.role()));
        info!(role = %identity.role(), landing = landing.command(), "signed in");
        render::notice(
            out,
            &Notice::success(format!("Signed in as {}", identity.email())),
        )?;
        writeln!(out, "Next: jobboard {}", landing.command())?;
        Ok(())
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        out: &mut impl Write,
    ) -> Result<(), CliError> {
        let registration = Registration::try_from_parts(email, password, name)?;
        match self.session.register(&registration).await {
            Ok(()) => finish(out, &Notice::success("Account created; you can now sign in")),
            Err(error) => finish(
                out,
                &Notice::error(error.user_message("Could not create the account")),
            ),
        }
    }

    async fn search<R>(&self, input: R, out: &mut impl Write) -> Result<(), CliError>
    where
        R: AsyncBufRead + Unpin,
    {
        let runner = Arc::new(BoardSearch::new(self.board.clone(), self.session.subscribe()));
        let mut search = DebouncedSearch::spawn(runner, self.debounce);
        let mut lines = input.lines();
        let mut input_open = true;
        let mut awaiting: Option<String> = None;

        loop {
            tokio::select! {
                line = lines.next_line(), if input_open => match line? {
                    Some(text) => {
                        search.push(text.clone());
                        awaiting = Some(text);
                    }
                    None => {
                        input_open = false;
                        if awaiting.is_none() {
                            break;
                        }
                    }
                },
                result = search.next_result() => {
                    let Some(result) = result else {
                        break;
                    };
                    render::board(out, &result.output)?;
                    writeln!(out)?;
                    if awaiting.as_deref() == Some(result.text.as_str()) {
                        awaiting = None;
                        if !input_open {
                            break;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    async fn apply(&self, id: &str, out: &mut impl Write) -> Result<(), CliError> {
        let id = VacancyId::new(id)?;
        let view = self.board.load(None, &self.session()).await;
        if view.find(&id).is_none() {
            return finish(out, &Notice::error(format!("Vacancy {id} is not on the board")));
        }
        let outcome = self.board.apply(&id, &view).await;
        let notice = outcome.notice();
        if matches!(outcome, ApplyOutcome::NotEligible(_)) {
            render::notice(out, &notice)?;
            return Err(CliError::Failed(notice.message));
        }
        finish(out, &notice)
    }

    async fn applications(&self, out: &mut impl Write) -> Result<(), CliError> {
        let snapshot = self.session();
        if !snapshot.role().is_some_and(|role| role.is_applicant()) {
            return Err(CliError::NotPermitted {
                destination: Destination::MyApplications.label(),
                requirement: "an applicant account",
            });
        }
        let view = load_my_applications(&self.ledger).await;
        render::applications(out, &view)?;
        Ok(())
    }

    async fn create_vacancy(&self, draft: DraftArgs, out: &mut impl Write) -> Result<(), CliError> {
        self.require_elevated(Destination::CreateVacancy)?;
        let vacancy = NewVacancy::try_from(VacancyDraft::from(draft))?;
        match self.catalogue.create(&vacancy).await {
            Ok(created) => {
                let message = created.map_or_else(
                    || "Vacancy created".to_owned(),
                    |v| format!("Vacancy created with id {}", v.id),
                );
                finish(out, &Notice::success(message))
            }
            Err(error) => finish(
                out,
                &Notice::error(error.user_message("Could not create the vacancy")),
            ),
        }
    }

    fn require_elevated(&self, destination: Destination) -> Result<(), CliError> {
        if self.session().role().is_some_and(|role| role.is_elevated()) {
            Ok(())
        } else {
            Err(CliError::NotPermitted {
                destination: destination.label(),
                requirement: "an administrator or poster account",
            })
        }
    }
}

/// Render `notice`, turning error notices into a failed command.
fn finish(out: &mut impl Write, notice: &Notice) -> Result<(), CliError> {
    render::notice(out, notice)?;
    if notice.is_error() {
        return Err(CliError::Failed(notice.message.clone()));
    }
    Ok(())
}
