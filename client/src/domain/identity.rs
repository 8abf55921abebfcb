//! Signed-in identity and its role.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::IdentityId;
use super::timestamp::parse_timestamp;

/// Closed set of roles the API assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Elevated administrator.
    #[serde(rename = "ADMIN")]
    Admin,
    /// Elevated vacancy poster.
    #[serde(rename = "GESTOR")]
    Poster,
    /// Applicant; the only role allowed to apply.
    #[serde(rename = "CODER")]
    Applicant,
}

impl Role {
    /// Whether the role manages postings and applications.
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::Admin | Self::Poster)
    }

    /// Whether the role may submit applications.
    pub const fn is_applicant(self) -> bool {
        matches!(self, Self::Applicant)
    }

    /// Value sent on the wire.
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Poster => "GESTOR",
            Self::Applicant => "CODER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Validation errors raised while decoding an identity payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityValidationError {
    /// The email was blank.
    EmptyEmail,
}

impl fmt::Display for IdentityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "identity email must not be empty"),
        }
    }
}

impl std::error::Error for IdentityValidationError {}

/// The signed-in account as reported by the profile endpoint.
///
/// ## Invariants
/// - `role` is always one of [`Role`]; a payload with any other role fails to
///   decode and the session is treated as signed out.
/// - `email` is non-empty once trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IdentityDto", into = "IdentityDto")]
pub struct Identity {
    id: IdentityId,
    email: String,
    display_name: Option<String>,
    role: Role,
    created_at: Option<DateTime<Utc>>,
}

impl Identity {
    /// Build an identity from validated parts.
    pub fn new(id: IdentityId, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            email: email.into(),
            display_name: None,
            role,
            created_at: None,
        }
    }

    /// Attach a display name; blank names are ignored.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.display_name = (!name.trim().is_empty()).then_some(name);
        self
    }

    /// Attach the account creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Stable identifier.
    pub fn id(&self) -> &IdentityId {
        &self.id
    }

    /// Sign-in email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Display name, when the account has one.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Role granted to the account.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Account creation time, when reported.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityDto {
    id: IdentityId,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,
}

impl From<Identity> for IdentityDto {
    fn from(value: Identity) -> Self {
        Self {
            id: value.id,
            email: value.email,
            name: value.display_name,
            role: value.role,
            created_at: value.created_at.map(|at| at.to_rfc3339()),
        }
    }
}

impl TryFrom<IdentityDto> for Identity {
    type Error = IdentityValidationError;

    fn try_from(value: IdentityDto) -> Result<Self, Self::Error> {
        let email = value.email.trim();
        if email.is_empty() {
            return Err(IdentityValidationError::EmptyEmail);
        }
        let mut identity = Identity::new(value.id, email, value.role);
        if let Some(name) = value.name {
            identity = identity.with_display_name(name);
        }
        identity.created_at = value.created_at.as_deref().and_then(parse_timestamp);
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for identity decoding.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("ADMIN", Role::Admin, true, false)]
    #[case("GESTOR", Role::Poster, true, false)]
    #[case("CODER", Role::Applicant, false, true)]
    fn decodes_each_role(
        #[case] wire: &str,
        #[case] expected: Role,
        #[case] elevated: bool,
        #[case] applicant: bool,
    ) {
        let identity: Identity = serde_json::from_value(json!({
            "id": "u-1",
            "email": "ada@example.com",
            "name": "Ada Lovelace",
            "role": wire,
        }))
        .expect("identity payload");
        assert_eq!(identity.role(), expected);
        assert_eq!(identity.role().is_elevated(), elevated);
        assert_eq!(identity.role().is_applicant(), applicant);
    }

    #[test]
    fn unknown_roles_fail_to_decode() {
        let result = serde_json::from_value::<Identity>(json!({
            "id": "u-1",
            "email": "ada@example.com",
            "role": "SUPERUSER",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn blank_email_fails_to_decode() {
        let result = serde_json::from_value::<Identity>(json!({
            "id": "u-1",
            "email": "  ",
            "role": "CODER",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn invalid_timestamps_degrade_to_unknown() {
        let identity: Identity = serde_json::from_value(json!({
            "id": "u-1",
            "email": "ada@example.com",
            "role": "CODER",
            "createdAt": "last tuesday",
        }))
        .expect("identity payload");
        assert!(identity.created_at().is_none());
        assert!(identity.display_name().is_none());
    }

    #[test]
    fn parses_rfc3339_timestamps() {
        let identity: Identity = serde_json::from_value(json!({
            "id": 7,
            "email": "ada@example.com",
            "role": "GESTOR",
            "createdAt": "2024-03-01T12:30:00.000Z",
        }))
        .expect("identity payload");
        assert_eq!(identity.id().as_ref(), "7");
        assert_eq!(
            identity.created_at().map(|at| at.to_rfc3339()),
            Some("2024-03-01T12:30:00+00:00".to_owned())
        );
    }
}
