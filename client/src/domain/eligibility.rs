//! Per-vacancy view state derived from the viewer's role and applications.
//!
//! Everything here is advisory. The server enforces both the applicant
//! ceiling of a vacancy and the global active-application limit; the client
//! derives the same rules only to decide what to show and whether a call is
//! worth making.

use std::collections::HashSet;
use std::fmt;

use super::application::Application;
use super::identity::{Identity, Role};
use super::ids::VacancyId;
use super::vacancy::Vacancy;

/// Maximum number of pending or accepted applications an applicant may hold.
pub const ACTIVE_APPLICATION_LIMIT: usize = 3;

/// The party looking at the board: a role (or nobody) plus their applications.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    role: Option<Role>,
    applications: Vec<Application>,
    applied: HashSet<VacancyId>,
    active: usize,
}

impl Viewer {
    /// A signed-out viewer.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Build a viewer from a role and the applications fetched for it.
    ///
    /// Applications are ignored unless the role is the applicant role; only
    /// applicants have applications of their own.
    pub fn new(role: Option<Role>, applications: Vec<Application>) -> Self {
        let applications = if role.is_some_and(Role::is_applicant) {
            applications
        } else {
            Vec::new()
        };
        let applied = applications.iter().map(|a| a.vacancy_id.clone()).collect();
        let active = applications.iter().filter(|a| a.is_active()).count();
        Self {
            role,
            applications,
            applied,
            active,
        }
    }

    /// Build a viewer from an optional identity.
    pub fn from_identity(identity: Option<&Identity>, applications: Vec<Application>) -> Self {
        Self::new(identity.map(Identity::role), applications)
    }

    /// Viewer's role, if signed in.
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Whether the viewer manages postings.
    pub fn is_elevated(&self) -> bool {
        self.role.is_some_and(Role::is_elevated)
    }

    /// The viewer's own applications.
    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    /// Count of pending or accepted applications across every vacancy.
    pub fn active_applications(&self) -> usize {
        self.active
    }

    /// Whether the viewer may apply anywhere at all.
    pub fn can_apply(&self) -> bool {
        self.role.is_some_and(Role::is_applicant) && self.active < ACTIVE_APPLICATION_LIMIT
    }

    /// Whether any application, whatever its status, targets `vacancy`.
    pub fn has_applied(&self, vacancy: &VacancyId) -> bool {
        self.applied.contains(vacancy)
    }

    /// Quota summary, shown to applicants only.
    pub fn quota(&self) -> Option<ActiveQuota> {
        self.role
            .is_some_and(Role::is_applicant)
            .then_some(ActiveQuota { active: self.active })
    }
}

/// Active applications against the global limit, displayed as `n/3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveQuota {
    /// Pending or accepted applications held.
    pub active: usize,
}

impl ActiveQuota {
    /// Whether no further application is allowed.
    pub fn at_limit(self) -> bool {
        self.active >= ACTIVE_APPLICATION_LIMIT
    }
}

impl fmt::Display for ActiveQuota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.active, ACTIVE_APPLICATION_LIMIT)
    }
}

/// Applicant ceiling of a vacancy against its current count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    /// Ceiling; zero means unbounded.
    pub max: u32,
    /// Applicants so far.
    pub current: u32,
}

impl Capacity {
    /// Capacity figures of `vacancy`.
    pub fn of(vacancy: &Vacancy) -> Self {
        Self {
            max: vacancy.max_applicants,
            current: vacancy.current_applicants,
        }
    }

    /// Whether the ceiling is set.
    pub fn is_bounded(self) -> bool {
        self.max > 0
    }

    /// Bounded and reached.
    pub fn is_full(self) -> bool {
        self.is_bounded() && self.current >= self.max
    }

    /// Spots left; reported only while bounded and not full.
    pub fn spots_remaining(self) -> Option<u32> {
        (self.is_bounded() && !self.is_full()).then(|| self.max - self.current)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} applicants", self.current, self.max)?;
        if let Some(spots) = self.spots_remaining() {
            write!(f, " ({spots} spots left)")?;
        }
        Ok(())
    }
}

/// Primary action offered on a vacancy, resolved in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyAction {
    /// Elevated viewers manage rather than apply.
    Manage,
    /// The viewer already holds an application here.
    AlreadyApplied,
    /// The applicant ceiling is reached.
    Full,
    /// Nobody is signed in.
    SignInRequired,
    /// The viewer cannot apply: wrong role or quota exhausted.
    LimitReached,
    /// The vacancy is closed.
    Unavailable,
    /// Applying is allowed.
    Apply,
}

impl ApplyAction {
    /// Button label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Manage => "Manage",
            Self::AlreadyApplied => "Already applied",
            Self::Full => "Vacancy full",
            Self::SignInRequired => "Sign in to apply",
            Self::LimitReached => "Limit reached",
            Self::Unavailable => "Unavailable",
            Self::Apply => "Apply",
        }
    }

    /// Whether the action can be triggered.
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Manage | Self::Apply)
    }
}

impl fmt::Display for ApplyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Badge summarising a vacancy's availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBadge {
    /// Closed by an elevated role.
    Inactive,
    /// Applicant ceiling reached.
    Full,
    /// Open.
    Active,
}

impl StatusBadge {
    /// Badge text.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inactive => "Inactive",
            Self::Full => "Full",
            Self::Active => "Active",
        }
    }
}

impl fmt::Display for StatusBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived flags for one vacancy as seen by one viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VacancyState {
    /// Ceiling and count.
    pub capacity: Capacity,
    /// Whether the viewer already applied, whatever the status.
    pub has_applied: bool,
    /// Whether the viewer may apply anywhere.
    pub can_apply: bool,
    /// Whether the vacancy is open.
    pub is_active: bool,
    /// Resolved primary action.
    pub action: ApplyAction,
    /// Availability badge.
    pub badge: StatusBadge,
}

impl VacancyState {
    /// Derive the state of `vacancy` for `viewer`.
    pub fn derive(vacancy: &Vacancy, viewer: &Viewer) -> Self {
        let capacity = Capacity::of(vacancy);
        let has_applied = viewer.has_applied(&vacancy.id);
        let can_apply = viewer.can_apply();
        let is_full = capacity.is_full();

        let action = if viewer.is_elevated() {
            ApplyAction::Manage
        } else if has_applied {
            ApplyAction::AlreadyApplied
        } else if is_full {
            ApplyAction::Full
        } else if viewer.role().is_none() {
            ApplyAction::SignInRequired
        } else if !can_apply {
            ApplyAction::LimitReached
        } else if !vacancy.is_active {
            ApplyAction::Unavailable
        } else {
            ApplyAction::Apply
        };

        let badge = if !vacancy.is_active {
            StatusBadge::Inactive
        } else if is_full {
            StatusBadge::Full
        } else {
            StatusBadge::Active
        };

        Self {
            capacity,
            has_applied,
            can_apply,
            is_active: vacancy.is_active,
            action,
            badge,
        }
    }

    /// Shorthand for the capacity check.
    pub fn is_full(&self) -> bool {
        self.capacity.is_full()
    }

    /// Effective eligibility for this vacancy.
    pub fn may_apply(&self) -> bool {
        self.can_apply && !self.has_applied && !self.is_full() && self.is_active
    }
}

/// A vacancy paired with its derived state.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedVacancy {
    /// Source record.
    pub vacancy: Vacancy,
    /// Derived flags.
    pub state: VacancyState,
}

/// Derive view state for every vacancy, preserving order.
pub fn derive_all(vacancies: Vec<Vacancy>, viewer: &Viewer) -> Vec<DerivedVacancy> {
    vacancies
        .into_iter()
        .map(|vacancy| {
            let state = VacancyState::derive(&vacancy, viewer);
            DerivedVacancy { vacancy, state }
        })
        .collect()
}
