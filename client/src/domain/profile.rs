//! Profile card view model.

use super::identity::{Identity, Role};
use super::timestamp::long_date;

const NAME_FALLBACK: &str = "Name not set";
const DATE_FALLBACK: &str = "Unknown date";

/// What the profile page shows for a signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCard {
    /// Display name, falling back to the email.
    pub heading: String,
    /// Up to two uppercase initials of the name, or of the email when unnamed.
    pub initials: String,
    /// Sign-in email.
    pub email: String,
    /// Granted role.
    pub role: Role,
    /// Account creation date, or a fallback.
    pub member_since: String,
}

impl ProfileCard {
    /// Build the card for `identity`.
    pub fn from_identity(identity: &Identity) -> Self {
        let heading = identity
            .display_name()
            .or_else(|| Some(identity.email()).filter(|e| !e.is_empty()))
            .unwrap_or(NAME_FALLBACK)
            .to_owned();
        Self {
            initials: initials(identity.display_name().unwrap_or(identity.email())),
            heading,
            email: identity.email().to_owned(),
            role: identity.role(),
            member_since: identity
                .created_at()
                .map(long_date)
                .unwrap_or_else(|| DATE_FALLBACK.to_owned()),
        }
    }
}

/// Initials from the first two words of a name, or from the dot-separated
/// local part when the name is an email address.
pub fn initials(name: &str) -> String {
    let words: Vec<&str> = match name.split_once('@') {
        Some((local, _)) => local.split('.').collect(),
        None => name.split_whitespace().collect(),
    };
    words
        .into_iter()
        .filter_map(|w| w.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ids::IdentityId;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    #[rstest]
    #[case("Ada Lovelace", "AL")]
    #[case("ada lovelace byron", "AL")]
    #[case("Grace", "G")]
    #[case("grace.hopper@example.com", "GH")]
    #[case("", "")]
    fn derives_initials(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(initials(name), expected);
    }

    fn identity() -> Identity {
        Identity::new(
            IdentityId::new("u-1").expect("identity id"),
            "ada@example.com",
            Role::Applicant,
        )
    }

    #[test]
    fn named_identity_fills_every_field() {
        let created = Utc
            .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .single()
            .expect("timestamp");
        let card = ProfileCard::from_identity(
            &identity()
                .with_display_name("Ada Lovelace")
                .with_created_at(created),
        );
        assert_eq!(card.heading, "Ada Lovelace");
        assert_eq!(card.initials, "AL");
        assert_eq!(card.member_since, "1 March 2024");
    }

    #[test]
    fn unnamed_identity_falls_back_to_email() {
        let card = ProfileCard::from_identity(&identity());
        assert_eq!(card.heading, "ada@example.com");
        assert_eq!(card.initials, "A");
        assert_eq!(card.member_since, DATE_FALLBACK);
    }

    #[test]
    fn dotted_email_gives_two_initials() {
        let unnamed = Identity::new(
            IdentityId::new("u-2").expect("identity id"),
            "grace.hopper@example.com",
            Role::Poster,
        );
        let card = ProfileCard::from_identity(&unnamed);
        assert_eq!(card.heading, "grace.hopper@example.com");
        assert_eq!(card.initials, "GH");
    }
}
