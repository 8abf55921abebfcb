//! Job-board client library.
//!
//! Session resolution, vacancy eligibility derivation, debounced search and
//! the HTTP adapter for the job-board API, plus the command-line front end
//! that drives them.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod settings;
