//! Applications submitted against vacancies.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ApplicationId, VacancyId};
use super::timestamp::parse_timestamp;

/// Review state of an application.
///
/// The API speaks Spanish on the wire; English spellings are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    /// Awaiting review.
    #[serde(rename = "pendiente", alias = "pending", alias = "PENDIENTE")]
    Pending,
    /// Accepted by an elevated role.
    #[serde(rename = "aceptada", alias = "accepted", alias = "ACEPTADA")]
    Accepted,
    /// Rejected by an elevated role.
    #[serde(rename = "rechazada", alias = "rejected", alias = "RECHAZADA")]
    Rejected,
}

impl ApplicationStatus {
    /// Whether the status counts toward the active-application ceiling.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decision an elevated role records on a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Mark the application accepted.
    Accept,
    /// Mark the application rejected.
    Reject,
}

impl ReviewDecision {
    /// Status the decision moves the application to.
    pub const fn status(self) -> ApplicationStatus {
        match self {
            Self::Accept => ApplicationStatus::Accepted,
            Self::Reject => ApplicationStatus::Rejected,
        }
    }
}

/// Vacancy details embedded in an application payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct VacancySummary {
    /// Vacancy title.
    #[serde(default)]
    pub title: Option<String>,
    /// Hiring organisation.
    #[serde(default)]
    pub company: Option<String>,
}

/// Applicant details embedded in an application payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ApplicantSummary {
    /// Applicant display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Applicant email.
    #[serde(default)]
    pub email: Option<String>,
}

/// One application.
///
/// ## Invariants
/// - `vacancy_id` always references the vacancy applied to; payloads lacking
///   both `vacancyId` and an embedded `vacancy.id` fail to decode.
/// - Status changes only through an elevated role's review; the client never
///   edits it locally.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ApplicationDto")]
pub struct Application {
    /// Stable identifier.
    pub id: ApplicationId,
    /// Vacancy applied to.
    pub vacancy_id: VacancyId,
    /// Review state.
    pub status: ApplicationStatus,
    /// Submission time, when reported.
    pub created_at: Option<DateTime<Utc>>,
    /// Embedded vacancy details, when the endpoint includes them.
    pub vacancy: Option<VacancySummary>,
    /// Embedded applicant details, when the endpoint includes them.
    pub applicant: Option<ApplicantSummary>,
}

impl Application {
    /// Build a minimal application record.
    pub fn new(id: ApplicationId, vacancy_id: VacancyId, status: ApplicationStatus) -> Self {
        Self {
            id,
            vacancy_id,
            status,
            created_at: None,
            vacancy: None,
            applicant: None,
        }
    }

    /// Whether the application counts toward the active ceiling.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Error raised when an application payload does not name its vacancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingVacancyReference;

impl fmt::Display for MissingVacancyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "application does not reference a vacancy")
    }
}

impl std::error::Error for MissingVacancyReference {}

#[derive(Debug, Deserialize)]
struct EmbeddedVacancyDto {
    #[serde(default)]
    id: Option<VacancyId>,
    #[serde(flatten)]
    summary: VacancySummary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplicationDto {
    id: ApplicationId,
    #[serde(default)]
    vacancy_id: Option<VacancyId>,
    status: ApplicationStatus,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    vacancy: Option<EmbeddedVacancyDto>,
    #[serde(default)]
    user: Option<ApplicantSummary>,
}

impl TryFrom<ApplicationDto> for Application {
    type Error = MissingVacancyReference;

    fn try_from(value: ApplicationDto) -> Result<Self, Self::Error> {
        let ApplicationDto {
            id,
            vacancy_id,
            status,
            created_at,
            vacancy,
            user,
        } = value;
        let (embedded_id, summary) = match vacancy {
            Some(EmbeddedVacancyDto { id, summary }) => (id, Some(summary)),
            None => (None, None),
        };
        let vacancy_id = vacancy_id.or(embedded_id).ok_or(MissingVacancyReference)?;
        Ok(Self {
            id,
            vacancy_id,
            status,
            created_at: created_at.as_deref().and_then(parse_timestamp),
            vacancy: summary,
            applicant: user,
        })
    }
}
