//! Opaque server-assigned identifiers.
//!
//! The API issues identifiers as strings (UUIDs in practice) but some
//! deployments emit integers. Both decode into the same validated newtype; the
//! client never interprets the value beyond equality.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors for identifier values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdValidationError {
    /// The identifier was empty.
    Empty,
    /// The identifier carried leading or trailing whitespace.
    Padded,
}

impl fmt::Display for IdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "identifier must not be empty"),
            Self::Padded => write!(f, "identifier must not carry surrounding whitespace"),
        }
    }
}

impl std::error::Error for IdValidationError {}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(value: RawId) -> Self {
        match value {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

fn validate(raw: String) -> Result<String, IdValidationError> {
    if raw.is_empty() {
        return Err(IdValidationError::Empty);
    }
    if raw.trim() != raw {
        return Err(IdValidationError::Padded);
    }
    Ok(raw)
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct the identifier.
            pub fn new(id: impl Into<String>) -> Result<Self, IdValidationError> {
                validate(id.into()).map(Self)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = RawId::deserialize(deserializer)?;
                Self::new(String::from(raw)).map_err(serde::de::Error::custom)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

opaque_id! {
    /// Identifier of a signed-in identity.
    IdentityId
}

opaque_id! {
    /// Identifier of a vacancy.
    VacancyId
}

opaque_id! {
    /// Identifier of an application.
    ApplicationId
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("", IdValidationError::Empty)]
    #[case(" v1", IdValidationError::Padded)]
    #[case("v1\n", IdValidationError::Padded)]
    fn rejects_invalid_ids(#[case] raw: &str, #[case] expected: IdValidationError) {
        assert_eq!(VacancyId::new(raw).expect_err("invalid id"), expected);
    }

    #[test]
    fn decodes_string_and_numeric_ids_alike() {
        let text: VacancyId = serde_json::from_value(json!("42")).expect("string id");
        let number: VacancyId = serde_json::from_value(json!(42)).expect("numeric id");
        assert_eq!(text, number);
        assert_eq!(serde_json::to_value(&number).expect("encode"), json!("42"));
    }

    #[test]
    fn rejects_empty_ids_during_decode() {
        let result = serde_json::from_value::<ApplicationId>(json!(""));
        assert!(result.is_err());
    }
}
