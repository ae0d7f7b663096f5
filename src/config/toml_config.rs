use crate::config::settings::{ApiSettings, LocationSettings, PermissionMode};
use crate::core::Coordinate;
use crate::utils::error::{NearbyError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub location: LocationSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    pub base_url: Option<String>,
    pub endpoint_path: Option<String>,
    pub action: Option<String>,
    pub format: Option<String>,
    pub list: Option<String>,
    pub radius_meters: Option<i64>,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationSection {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub permission: Option<PermissionMode>,
    pub permission_timeout_seconds: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| NearbyError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WIKI_BASE_URL})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| NearbyError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 取得設定中的座標；經緯度必須同時提供
    pub fn position(&self) -> Result<Option<Coordinate>> {
        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lon)) => Ok(Some(Coordinate::new(lat, lon)?)),
            (None, None) => Ok(None),
            _ => Err(NearbyError::ConfigError {
                message: "location.latitude and location.longitude must be set together"
                    .to_string(),
            }),
        }
    }

    /// 將檔案中的值覆蓋到現有設定上
    pub fn apply(&self, api: &mut ApiSettings, location: &mut LocationSettings) -> Result<()> {
        let section = &self.api;
        if let Some(v) = &section.base_url {
            api.base_url = v.clone();
        }
        if let Some(v) = &section.endpoint_path {
            api.endpoint_path = v.clone();
        }
        if let Some(v) = &section.action {
            api.action = v.clone();
        }
        if let Some(v) = &section.format {
            api.format = v.clone();
        }
        if let Some(v) = &section.list {
            api.list = v.clone();
        }
        if let Some(v) = section.radius_meters {
            api.radius_meters = v;
        }
        if let Some(v) = section.timeout_seconds {
            api.timeout_seconds = v;
        }
        if let Some(v) = &section.user_agent {
            api.user_agent = v.clone();
        }

        if let Some(position) = self.position()? {
            location.position = Some(position);
        }
        if let Some(mode) = self.location.permission {
            location.permission = mode;
        }
        if let Some(v) = self.location.permission_timeout_seconds {
            location.permission_timeout_seconds = v;
        }

        Ok(())
    }

    pub fn to_settings(&self) -> Result<(ApiSettings, LocationSettings)> {
        let mut api = ApiSettings::default();
        let mut location = LocationSettings::default();
        self.apply(&mut api, &mut location)?;
        Ok((api, location))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        let (api, location) = self.to_settings()?;
        api.validate()?;
        location.validate()
    }
}
