pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::settings::{ApiSettings, LocationSettings, PermissionMode};
#[cfg(feature = "cli")]
use crate::config::toml_config::TomlConfig;
#[cfg(feature = "cli")]
use crate::core::Coordinate;
#[cfg(feature = "cli")]
use crate::utils::error::{NearbyError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "nearby-wiki")]
#[command(about = "Find encyclopedia articles near your location")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, allow_hyphen_values = true, help = "Latitude of the current position")]
    pub lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true, help = "Longitude of the current position")]
    pub lon: Option<f64>,

    #[arg(long, allow_hyphen_values = true, help = "Search radius in meters [default: 10000]")]
    pub radius: Option<i64>,

    #[arg(long, help = "API base URL [default: https://en.wikipedia.org/]")]
    pub base_url: Option<String>,

    #[arg(long)]
    pub user_agent: Option<String>,

    #[arg(long, help = "HTTP request timeout [default: 30]")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Location permission: granted, denied or prompt [default: granted]")]
    pub permission: Option<PermissionMode>,

    #[arg(long, help = "Seconds to wait for a permission answer [default: 30]")]
    pub permission_timeout_seconds: Option<u64>,

    #[arg(long, help = "Print articles as JSON")]
    pub json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併預設值、TOML 檔案與命令列參數（命令列優先）
    pub fn resolve(&self) -> Result<(ApiSettings, LocationSettings)> {
        let (mut api, mut location) = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                TomlConfig::from_file(path)?.to_settings()?
            }
            None => (ApiSettings::default(), LocationSettings::default()),
        };

        if let Some(v) = &self.base_url {
            api.base_url = v.clone();
        }
        if let Some(v) = &self.user_agent {
            api.user_agent = v.clone();
        }
        if let Some(v) = self.radius {
            api.radius_meters = v;
        }
        if let Some(v) = self.timeout_seconds {
            api.timeout_seconds = v;
        }

        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => location.position = Some(Coordinate::new(lat, lon)?),
            (None, None) => {}
            _ => {
                return Err(NearbyError::ConfigError {
                    message: "--lat and --lon must be given together".to_string(),
                })
            }
        }
        if let Some(mode) = self.permission {
            location.permission = mode;
        }
        if let Some(v) = self.permission_timeout_seconds {
            location.permission_timeout_seconds = v;
        }

        api.validate()?;
        location.validate()?;
        Ok((api, location))
    }
}
