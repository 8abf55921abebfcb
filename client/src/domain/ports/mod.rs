//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod api_error;
mod application_ledger;
mod auth_gateway;
mod vacancy_catalogue;

pub use api_error::ApiError;
#[cfg(test)]
pub use application_ledger::MockApplicationLedger;
pub use application_ledger::{ApplicationLedger, FixtureApplicationLedger};
#[cfg(test)]
pub use auth_gateway::MockAuthGateway;
pub use auth_gateway::{AuthGateway, FixtureAuthGateway};
#[cfg(test)]
pub use vacancy_catalogue::MockVacancyCatalogue;
pub use vacancy_catalogue::{FixtureVacancyCatalogue, VacancyCatalogue, VacancyQuery};
