//! Job postings as the client sees them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::application::Application;
use super::compensation::Compensation;
use super::ids::VacancyId;

/// Working arrangement offered by a vacancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    /// Fully remote.
    #[serde(rename = "remoto", alias = "remote")]
    Remote,
    /// Mix of remote and on-site.
    #[serde(rename = "hibrido", alias = "hybrid")]
    Hybrid,
    /// On-site only.
    #[serde(rename = "presencial", alias = "onsite")]
    OnSite,
}

impl Modality {
    /// Every modality, in form order.
    pub const ALL: [Self; 3] = [Self::Remote, Self::Hybrid, Self::OnSite];

    /// Value sent on the wire.
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Remote => "remoto",
            Self::Hybrid => "hibrido",
            Self::OnSite => "presencial",
        }
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Remote => "Remote",
            Self::Hybrid => "Hybrid",
            Self::OnSite => "On-site",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown modality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModality(pub String);

impl fmt::Display for UnknownModality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown modality `{}`; expected remoto, hibrido or presencial",
            self.0
        )
    }
}

impl std::error::Error for UnknownModality {}

impl FromStr for Modality {
    type Err = UnknownModality;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_wire() == needle)
            .ok_or_else(|| UnknownModality(s.to_owned()))
    }
}

/// A job posting.
///
/// `current_applicants` is a read projection of the server's state. The client
/// never adjusts it locally; a reload is the only way it changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Vacancy {
    /// Stable identifier.
    pub id: VacancyId,
    /// Posting title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Hiring organisation.
    pub company: String,
    /// Work location.
    pub location: String,
    /// Offered compensation.
    pub compensation: Compensation,
    /// Applicant ceiling; zero means unbounded.
    pub max_applicants: u32,
    /// Applicants recorded so far.
    pub current_applicants: u32,
    /// Whether the posting accepts applications.
    pub is_active: bool,
    /// Required seniority, when stated.
    pub seniority: Option<String>,
    /// Desired soft skills, when stated.
    pub soft_skills: Option<String>,
    /// Working arrangement, when stated.
    pub modality: Option<Modality>,
    /// Applications embedded by the list endpoint for elevated roles.
    pub applications: Vec<Application>,
}

impl Vacancy {
    /// Build an active, unbounded vacancy with the given title.
    pub fn new(id: VacancyId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            company: String::new(),
            location: String::new(),
            compensation: Compensation::Unspecified,
            max_applicants: 0,
            current_applicants: 0,
            is_active: true,
            seniority: None,
            soft_skills: None,
            modality: None,
            applications: Vec::new(),
        }
    }

    /// Set the capacity figures.
    pub fn with_capacity(mut self, max_applicants: u32, current_applicants: u32) -> Self {
        self.max_applicants = max_applicants;
        self.current_applicants = current_applicants;
        self
    }

    /// Set the active flag.
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Set the organisation name.
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    /// Set the compensation.
    pub fn with_compensation(mut self, compensation: Compensation) -> Self {
        self.compensation = compensation;
        self
    }

    /// Attach embedded applications; the applicant count follows their length.
    pub fn with_applications(mut self, applications: Vec<Application>) -> Self {
        self.current_applicants = u32::try_from(applications.len()).unwrap_or(u32::MAX);
        self.applications = applications;
        self
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::application::ApplicationStatus;
    use crate::domain::ids::ApplicationId;
    use rstest::rstest;

    #[rstest]
    #[case("remoto", Modality::Remote)]
    #[case("Hibrido", Modality::Hybrid)]
    #[case(" presencial ", Modality::OnSite)]
    fn parses_modalities(#[case] raw: &str, #[case] expected: Modality) {
        assert_eq!(raw.parse::<Modality>().expect("modality"), expected);
    }

    #[test]
    fn rejects_unknown_modality() {
        let err = "moon base".parse::<Modality>().expect_err("unknown modality");
        assert!(err.to_string().contains("moon base"));
    }

    #[test]
    fn embedded_applications_drive_the_count() {
        let vacancy_id = VacancyId::new("v-1").expect("vacancy id");
        let applications = (0..4)
            .map(|n| {
                Application::new(
                    ApplicationId::new(format!("a-{n}")).expect("application id"),
                    vacancy_id.clone(),
                    ApplicationStatus::Pending,
                )
            })
            .collect();
        let vacancy = Vacancy::new(vacancy_id, "Rust Engineer")
            .with_capacity(10, 0)
            .with_applications(applications);
        assert_eq!(vacancy.current_applicants, 4);
        assert_eq!(vacancy.max_applicants, 10);
    }
}
