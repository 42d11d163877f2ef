//! idgate — a minimal in-memory identity service.
//!
//! Registers accounts, checks credentials, issues bearer tokens, and serves
//! account records to token holders over a small JSON API.

pub mod auth;
pub mod config;
pub mod gateway;

pub use config::Config;
