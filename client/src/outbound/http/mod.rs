//! Job-board HTTP adapter.
//!
//! One [`HttpJobBoardClient`] implements every port. It owns transport
//! details only: URL building, the session cookie jar, timeout and status
//! mapping, envelope unwrapping and decoding into domain records.

mod applications;
mod auth;
mod client;
mod dto;
mod vacancies;

pub use client::HttpJobBoardClient;
