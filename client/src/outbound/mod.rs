//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed client for the job-board API, implementing
//!   `AuthGateway`, `VacancyCatalogue` and `ApplicationLedger`.
//!
//! Adapters translate between wire payloads and domain types. They contain
//! no business logic.

pub mod http;
