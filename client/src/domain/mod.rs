//! Domain primitives, view models and services.
//!
//! Purpose: model the job board as the client sees it and derive every piece
//! of view state from API data. The domain talks to the outside world only
//! through the traits in [`ports`].
//!
//! Public surface:
//! - Identity, Vacancy, Application: decoded API records.
//! - VacancyState / Viewer: per-vacancy eligibility and capacity derivation.
//! - SessionResolver: publishes immutable session snapshots.
//! - DebouncedSearch: debounced, cancellable search driver.
//! - VacancyBoard, AdminDashboard: view services over the ports.

pub mod admin;
pub mod application;
pub mod board;
pub mod compensation;
pub mod eligibility;
pub mod forms;
pub mod identity;
pub mod ids;
pub mod my_applications;
pub mod navigation;
pub mod notice;
pub mod ports;
pub mod profile;
pub mod search;
pub mod session;
pub mod timestamp;
pub mod vacancy;

pub use self::admin::{AdminDashboard, DashboardStats, DashboardView, ReviewEntry};
pub use self::application::{
    ApplicantSummary, Application, ApplicationStatus, ReviewDecision, VacancySummary,
};
pub use self::board::{ApplyOutcome, BoardSearch, BoardView, VacancyBoard};
pub use self::compensation::{COMPENSATION_PLACEHOLDER, Compensation};
pub use self::eligibility::{
    ACTIVE_APPLICATION_LIMIT, ActiveQuota, ApplyAction, Capacity, DerivedVacancy, StatusBadge,
    VacancyState, Viewer, derive_all,
};
pub use self::forms::{
    FormValidationError, LoginCredentials, LoginValidationError, NewVacancy, Registration,
    VacancyDraft,
};
pub use self::identity::{Identity, IdentityValidationError, Role};
pub use self::ids::{ApplicationId, IdValidationError, IdentityId, VacancyId};
pub use self::my_applications::{ApplicationRow, MyApplicationsView, load_my_applications};
pub use self::navigation::{Destination, landing_for, menu_for};
pub use self::notice::{Notice, NoticeLevel};
pub use self::profile::ProfileCard;
pub use self::search::{DEFAULT_DEBOUNCE, DebouncedSearch, SearchResult, SearchRunner};
pub use self::session::{SessionResolver, SessionSnapshot};
pub use self::vacancy::{Modality, UnknownModality, Vacancy};
