//! Inbound adapters driving the domain.
//!
//! - **cli**: clap-based command-line front end rendering view models as text.

pub mod cli;
