use crate::domain::model::{
    Coordinate, GeosearchRequestParams, DEFAULT_ACTION, DEFAULT_FORMAT, DEFAULT_LIST,
    DEFAULT_RADIUS_METERS,
};
use crate::utils::error::{NearbyError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_positive, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org/";
pub const DEFAULT_ENDPOINT_PATH: &str = "w/api.php";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_PERMISSION_TIMEOUT_SECONDS: u64 = 30;

pub fn default_user_agent() -> String {
    format!("nearby-wiki/{}", env!("CARGO_PKG_VERSION"))
}

/// Resolved settings for the geosearch endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub endpoint_path: String,
    pub action: String,
    pub format: String,
    pub list: String,
    pub radius_meters: i64,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            action: DEFAULT_ACTION.to_string(),
            format: DEFAULT_FORMAT.to_string(),
            list: DEFAULT_LIST.to_string(),
            radius_meters: DEFAULT_RADIUS_METERS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: default_user_agent(),
        }
    }
}

impl ApiSettings {
    pub fn request_params(&self, center: Coordinate) -> GeosearchRequestParams {
        GeosearchRequestParams::with_api_values(
            self.action.as_str(),
            self.format.as_str(),
            self.list.as_str(),
            center,
            self.radius_meters,
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Validate for ApiSettings {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.base_url)?;
        validate_non_empty_string("api.endpoint_path", &self.endpoint_path)?;
        validate_non_empty_string("api.action", &self.action)?;
        validate_non_empty_string("api.format", &self.format)?;
        validate_non_empty_string("api.list", &self.list)?;
        validate_positive("api.radius_meters", self.radius_meters)?;
        validate_positive("api.timeout_seconds", self.timeout_seconds as i64)?;
        validate_non_empty_string("api.user_agent", &self.user_agent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionMode {
    #[default]
    Granted,
    Denied,
    Prompt,
}

impl FromStr for PermissionMode {
    type Err = NearbyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            "prompt" => Ok(Self::Prompt),
            other => Err(NearbyError::invalid_argument(
                "location.permission",
                other,
                "Expected one of: granted, denied, prompt",
            )),
        }
    }
}

impl fmt::Display for PermissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Prompt => "prompt",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSettings {
    pub position: Option<Coordinate>,
    pub permission: PermissionMode,
    pub permission_timeout_seconds: u64,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            position: None,
            permission: PermissionMode::default(),
            permission_timeout_seconds: DEFAULT_PERMISSION_TIMEOUT_SECONDS,
        }
    }
}

impl LocationSettings {
    pub fn permission_timeout(&self) -> Duration {
        Duration::from_secs(self.permission_timeout_seconds)
    }
}

impl Validate for LocationSettings {
    fn validate(&self) -> Result<()> {
        if let Some(position) = &self.position {
            position.validate()?;
        }
        validate_positive(
            "location.permission_timeout_seconds",
            self.permission_timeout_seconds as i64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_public_endpoint() {
        let settings = ApiSettings::default();
        assert_eq!(settings.base_url, "https://en.wikipedia.org/");
        assert_eq!(settings.endpoint_path, "w/api.php");
        assert_eq!(settings.radius_meters, 10_000);
        assert!(settings.user_agent.starts_with("nearby-wiki/"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_request_params_use_configured_values() {
        let settings = ApiSettings {
            radius_meters: 750,
            ..ApiSettings::default()
        };
        let center = Coordinate::new(10.5, 20.25).unwrap();
        let query = settings.request_params(center).encode().unwrap();
        assert_eq!(query.get("gsradius"), Some("750"));
        assert_eq!(query.get("gscoord"), Some("10.5|20.25"));
    }

    #[test]
    fn test_permission_mode_parsing() {
        assert_eq!("granted".parse::<PermissionMode>().unwrap(), PermissionMode::Granted);
        assert_eq!("Prompt".parse::<PermissionMode>().unwrap(), PermissionMode::Prompt);
        assert_eq!(" denied ".parse::<PermissionMode>().unwrap(), PermissionMode::Denied);
        assert!("maybe".parse::<PermissionMode>().is_err());
    }

    #[test]
    fn test_location_settings_validation() {
        let mut settings = LocationSettings::default();
        assert!(settings.validate().is_ok());

        settings.position = Some(Coordinate {
            latitude: 120.0,
            longitude: 0.0,
        });
        assert!(settings.validate().is_err());
    }
}
