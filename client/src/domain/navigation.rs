//! Role-filtered navigation entries.

use super::identity::Role;

/// A destination in the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Vacancy board.
    Vacancies,
    /// The applicant's own applications.
    MyApplications,
    /// Vacancy creation form.
    CreateVacancy,
    /// Administration dashboard.
    Admin,
    /// Sign-in form.
    Login,
}

impl Destination {
    /// Menu label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vacancies => "Vacancies",
            Self::MyApplications => "My applications",
            Self::CreateVacancy => "Create vacancy",
            Self::Admin => "Administration",
            Self::Login => "Sign in",
        }
    }

    /// CLI subcommand that opens the destination.
    pub const fn command(self) -> &'static str {
        match self {
            Self::Vacancies => "vacancies",
            Self::MyApplications => "applications",
            Self::CreateVacancy => "create-vacancy",
            Self::Admin => "admin",
            Self::Login => "profile",
        }
    }

    fn allows(self, role: Role) -> bool {
        match self {
            Self::Vacancies => true,
            Self::MyApplications => role.is_applicant(),
            Self::CreateVacancy | Self::Admin => role.is_elevated(),
            Self::Login => false,
        }
    }
}

const MENU: [Destination; 4] = [
    Destination::Vacancies,
    Destination::MyApplications,
    Destination::CreateVacancy,
    Destination::Admin,
];

/// Menu entries visible to `role`; signed-out viewers see none.
pub fn menu_for(role: Option<Role>) -> Vec<Destination> {
    let Some(role) = role else {
        return Vec::new();
    };
    MENU.into_iter().filter(|d| d.allows(role)).collect()
}

/// Where to go right after signing in.
pub fn landing_for(role: Option<Role>) -> Destination {
    match role {
        Some(role) if role.is_elevated() => Destination::CreateVacancy,
        Some(_) => Destination::Vacancies,
        None => Destination::Login,
    }
}
