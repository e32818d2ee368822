//! Smoke tests for WaterML2.0 part 2 (RGS) REST APIs.
//!
//! Fetches a monitoring point, its gaugings and its conversion groups from an
//! RGS API and checks that each returned entity carries the required fields.
//! Every finding is returned as a severity-tagged [`models::Message`]; checks
//! never fail with an error.

pub mod config;
pub mod errors;
pub mod models;
pub mod output;
pub mod requester;
pub mod runner;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod test_support;

pub use config::{Credentials, Opts, TesterConfig, TransportConfig};
pub use errors::{AppError, AppResult};
pub use models::{CheckKind, CheckReport, Message, RunReport, Severity};
pub use requester::{Fetch, HttpFetch, Probe, RawResponse, Requester};
pub use runner::{ApiTester, Endpoints};
pub use schema::ResourceType;
pub use validator::{Validation, Validator};
