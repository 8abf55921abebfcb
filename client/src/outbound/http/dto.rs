//! Wire payloads for the job-board API.
//!
//! Response DTOs are deliberately loose: the server omits fields freely and
//! sends numbers as strings in places. `into_domain` applies the defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::{Application, ApplicationStatus, Compensation, Modality, Vacancy, VacancyId};

#[derive(Debug, Serialize)]
pub(super) struct LoginBody<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct RegisterBody<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) name: &'a str,
    pub(super) role: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ApplyBody<'a> {
    pub(super) vacancy_id: &'a VacancyId,
}

#[derive(Debug, Serialize)]
pub(super) struct StatusBody {
    pub(super) status: ApplicationStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VacancyDto {
    id: VacancyId,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    salary_range: Option<String>,
    #[serde(default)]
    salary: Option<Value>,
    #[serde(default)]
    max_applicants: Option<Value>,
    #[serde(default)]
    current_applicants: Option<Value>,
    #[serde(default)]
    is_active: Option<bool>,
    #[serde(default)]
    seniority: Option<String>,
    #[serde(default)]
    soft_skills: Option<String>,
    #[serde(default)]
    modality: Option<String>,
    #[serde(default)]
    applications: Option<Vec<Value>>,
}

impl VacancyDto {
    pub(super) fn into_domain(self) -> Vacancy {
        // The embedded list counts every entry, decodable or not.
        let embedded_count = self
            .applications
            .as_ref()
            .map(|raw| u32::try_from(raw.len()).unwrap_or(u32::MAX));
        let current_applicants = embedded_count
            .or_else(|| self.current_applicants.as_ref().and_then(count))
            .unwrap_or(0);
        let applications = self
            .applications
            .map(|raw| decode_embedded(&self.id, raw));
        let modality = self
            .modality
            .as_deref()
            .and_then(|raw| raw.parse::<Modality>().ok());

        Vacancy {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            company: self.company.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            compensation: Compensation::from_parts(
                self.salary_range,
                self.salary.as_ref().and_then(number),
            ),
            max_applicants: self.max_applicants.as_ref().and_then(count).unwrap_or(0),
            current_applicants,
            is_active: self.is_active.unwrap_or(false),
            seniority: non_blank(self.seniority),
            soft_skills: non_blank(self.soft_skills),
            modality,
            applications: applications.unwrap_or_default(),
            id: self.id,
        }
    }
}

/// Decode applications embedded in a vacancy, filling in the parent id the
/// server leaves out. Malformed entries are dropped.
fn decode_embedded(vacancy: &VacancyId, raw: Vec<Value>) -> Vec<Application> {
    raw.into_iter()
        .filter_map(|value| {
            serde_json::from_value::<Application>(with_vacancy_id(value, vacancy))
                .inspect_err(|error| warn!(%error, %vacancy, "skipping embedded application"))
                .ok()
        })
        .collect()
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Non-negative whole count; negatives clamp to zero.
fn count(value: &Value) -> Option<u32> {
    let n = number(value)?;
    if !n.is_finite() {
        return None;
    }
    // Float-to-int casts saturate: negatives become zero.
    Some(n.trunc() as u32)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Decode a single vacancy record, tolerating a missing echo.
pub(super) fn vacancy_record(value: Value) -> Option<Vacancy> {
    serde_json::from_value::<VacancyDto>(value)
        .inspect_err(|error| warn!(%error, "vacancy record did not decode"))
        .ok()
        .map(VacancyDto::into_domain)
}

/// Ensure an application echo carries `vacancyId`.
pub(super) fn with_vacancy_id(value: Value, vacancy: &VacancyId) -> Value {
    match value {
        Value::Object(mut map) => {
            map.entry("vacancyId")
                .or_insert_with(|| Value::String(vacancy.to_string()));
            Value::Object(map)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for vacancy normalisation.
    use super::*;
    use crate::domain::{ApplyAction, Role, VacancyState, Viewer};
    use rstest::rstest;
    use serde_json::json;

    fn decode(value: Value) -> Vacancy {
        serde_json::from_value::<VacancyDto>(value)
            .expect("vacancy should decode")
            .into_domain()
    }

    #[test]
    fn missing_fields_take_their_defaults() {
        let vacancy = decode(json!({ "id": 7 }));
        assert_eq!(vacancy.id.as_ref(), "7");
        assert_eq!(vacancy.title, "");
        assert!(!vacancy.is_active);
        assert_eq!(vacancy.max_applicants, 0);
        assert_eq!(vacancy.current_applicants, 0);
        assert_eq!(vacancy.compensation, Compensation::Unspecified);
        assert!(vacancy.applications.is_empty());
    }

    #[test]
    fn embedded_applications_define_the_applicant_count() {
        let vacancy = decode(json!({
            "id": "v-1",
            "isActive": true,
            "maxApplicants": 5,
            "currentApplicants": 1,
            "applications": [
                { "id": "a-1", "status": "pendiente" },
                { "id": "a-2", "status": "aceptada" },
                { "id": "a-3", "status": "nonsense" }
            ]
        }));
        assert_eq!(vacancy.applications.len(), 2);
        assert_eq!(vacancy.current_applicants, 3);
        assert!(
            vacancy
                .applications
                .iter()
                .all(|a| a.vacancy_id.as_ref() == "v-1")
        );
    }

    #[test]
    fn undecodable_embedded_entries_still_fill_the_vacancy() {
        let vacancy = decode(json!({
            "id": "v-1",
            "isActive": true,
            "maxApplicants": 3,
            "applications": [
                { "id": "a-1", "status": "pendiente" },
                { "id": "a-2", "status": "pendiente" },
                { "id": "a-3", "status": "en_revision" }
            ]
        }));
        let viewer = Viewer::new(Some(Role::Applicant), Vec::new());
        let state = VacancyState::derive(&vacancy, &viewer);
        assert_eq!(vacancy.current_applicants, 3);
        assert!(state.is_full());
        assert_eq!(state.action, ApplyAction::Full);
    }

    #[rstest]
    #[case::negative(json!(-4), 0)]
    #[case::string(json!("12"), 12)]
    #[case::fractional(json!(3.9), 3)]
    #[case::garbage(json!("many"), 0)]
    fn capacity_counts_are_clamped(#[case] raw: Value, #[case] expected: u32) {
        let vacancy = decode(json!({ "id": "v-1", "maxApplicants": raw }));
        assert_eq!(vacancy.max_applicants, expected);
    }

    #[test]
    fn unknown_modality_is_dropped() {
        let vacancy = decode(json!({ "id": "v-1", "modality": "moon base" }));
        assert_eq!(vacancy.modality, None);
        let vacancy = decode(json!({ "id": "v-1", "modality": "Remoto" }));
        assert_eq!(vacancy.modality, Some(Modality::Remote));
    }

    #[test]
    fn salary_range_wins_over_amount() {
        let vacancy = decode(json!({
            "id": "v-1",
            "salaryRange": "3000-4000 USD",
            "salary": 3500
        }));
        assert_eq!(
            vacancy.compensation,
            Compensation::Range("3000-4000 USD".to_owned())
        );
        let vacancy = decode(json!({ "id": "v-1", "salary": "2500.5" }));
        assert_eq!(vacancy.compensation, Compensation::Amount(2500.5));
    }

    #[test]
    fn application_echo_gets_its_vacancy_id() {
        let id = VacancyId::new("v-9").expect("id");
        let value = with_vacancy_id(json!({ "id": "a-1", "status": "pendiente" }), &id);
        let application: Application = serde_json::from_value(value).expect("decode");
        assert_eq!(application.vacancy_id, id);
    }

    #[test]
    fn request_bodies_use_wire_names() {
        let id = VacancyId::new("v-1").expect("id");
        assert_eq!(
            serde_json::to_value(ApplyBody { vacancy_id: &id }).expect("encode"),
            json!({ "vacancyId": "v-1" })
        );
        assert_eq!(
            serde_json::to_value(StatusBody {
                status: ApplicationStatus::Accepted
            })
            .expect("encode"),
            json!({ "status": "aceptada" })
        );
    }
}
