//! Client-side form validation.
//!
//! Every form is checked before any network call so the user learns which
//! field is missing without a round trip. The server still validates again.

use std::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

use super::vacancy::Modality;

/// Domain error returned when login input is incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated sign-in credentials.
///
/// ## Invariants
/// - `email` is trimmed and must not be empty after trimming.
/// - `password` must be non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use jobboard::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ada@example.com", "hunter2").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Sign-in email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password as typed.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Field-level validation failure for the registration and vacancy forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValidationError {
    /// A required field was blank.
    MissingField {
        /// Wire name of the offending field.
        field: &'static str,
    },
    /// The applicant ceiling was not a positive integer.
    InvalidMaxApplicants {
        /// Raw input.
        value: String,
    },
    /// The modality was not one of the accepted values.
    InvalidModality {
        /// Raw input.
        value: String,
    },
}

impl FormValidationError {
    /// Name of the field the error concerns.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } => field,
            Self::InvalidMaxApplicants { .. } => "maxApplicants",
            Self::InvalidModality { .. } => "modality",
        }
    }
}

impl fmt::Display for FormValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "{field} is required"),
            Self::InvalidMaxApplicants { value } => {
                write!(f, "maxApplicants must be a positive whole number, got `{value}`")
            }
            Self::InvalidModality { value } => write!(
                f,
                "modality must be remoto, hibrido or presencial, got `{value}`"
            ),
        }
    }
}

impl std::error::Error for FormValidationError {}

impl From<LoginValidationError> for FormValidationError {
    fn from(value: LoginValidationError) -> Self {
        match value {
            LoginValidationError::EmptyEmail => Self::MissingField { field: "email" },
            LoginValidationError::EmptyPassword => Self::MissingField { field: "password" },
        }
    }
}

fn required(field: &'static str, value: &str) -> Result<String, FormValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormValidationError::MissingField { field })
    } else {
        Ok(trimmed.to_owned())
    }
}

/// Validated registration request. New accounts always get the applicant role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    credentials: LoginCredentials,
    name: String,
}

impl Registration {
    /// Validate raw registration input.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Self, FormValidationError> {
        let credentials = LoginCredentials::try_from_parts(email, password)?;
        let name = required("name", name)?;
        Ok(Self { credentials, name })
    }

    /// Credentials for the new account.
    pub fn credentials(&self) -> &LoginCredentials {
        &self.credentials
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// Raw vacancy form input, every field as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VacancyDraft {
    /// Job title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Hiring company.
    pub company: String,
    /// Where the job is based.
    pub location: String,
    /// Salary range as displayed, e.g. `3000-4000 USD`.
    pub salary_range: String,
    /// Applicant ceiling; must parse as a positive integer.
    pub max_applicants: String,
    /// Seniority level.
    pub seniority: String,
    /// Soft skills sought.
    pub soft_skills: String,
    /// One of `remoto`, `hibrido` or `presencial`.
    pub modality: String,
}

/// Validated vacancy ready to send to the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVacancy {
    /// Job title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Hiring company.
    pub company: String,
    /// Where the job is based.
    pub location: String,
    /// Salary range as displayed.
    pub salary_range: String,
    /// Applicant ceiling, at least one.
    pub max_applicants: u32,
    /// Seniority level.
    pub seniority: String,
    /// Soft skills sought.
    pub soft_skills: String,
    /// Working arrangement.
    pub modality: Modality,
}

impl TryFrom<VacancyDraft> for NewVacancy {
    type Error = FormValidationError;

    fn try_from(draft: VacancyDraft) -> Result<Self, Self::Error> {
        let title = required("title", &draft.title)?;
        let description = required("description", &draft.description)?;
        let company = required("company", &draft.company)?;
        let location = required("location", &draft.location)?;
        let salary_range = required("salaryRange", &draft.salary_range)?;
        let raw_max = required("maxApplicants", &draft.max_applicants)?;
        let seniority = required("seniority", &draft.seniority)?;
        let soft_skills = required("softSkills", &draft.soft_skills)?;
        let raw_modality = required("modality", &draft.modality)?;

        let max_applicants = raw_max
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or(FormValidationError::InvalidMaxApplicants { value: raw_max })?;
        let modality = raw_modality
            .parse::<Modality>()
            .map_err(|_| FormValidationError::InvalidModality {
                value: raw_modality,
            })?;

        Ok(Self {
            title,
            description,
            company,
            location,
            salary_range,
            max_applicants,
            seniority,
            soft_skills,
            modality,
        })
    }
}
