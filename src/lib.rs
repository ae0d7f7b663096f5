pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{
    http::HttpTransport,
    location::{FixedLocationGate, PromptLocationGate},
};
pub use crate::config::settings::{ApiSettings, LocationSettings, PermissionMode};
pub use crate::core::{
    finder::NearbyFinder,
    query::{build_request, parse_response, QueryOutcome},
};
pub use crate::domain::model::{Article, Coordinate, EncodedQuery, GeosearchRequestParams};
pub use crate::utils::error::{NearbyError, Result};
