use thiserror::Error;

#[derive(Error, Debug)]
pub enum NearbyError {
    #[error("Invalid argument `{field}` = {value}: {reason}")]
    InvalidArgument {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Location permission denied")]
    PermissionDenied,

    #[error("No last known position available")]
    PositionUnavailable,

    #[error("Geosearch request failed with HTTP status {status}")]
    HttpError { status: u16 },

    #[error("Failed to decode geosearch response: {detail}")]
    DecodeError { detail: String },

    #[error("Network request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// 錯誤分類，對應查詢結果中的失敗種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Permission,
    Location,
    Http,
    Decode,
    Network,
    Configuration,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl NearbyError {
    pub fn invalid_argument(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArgument { .. } => ErrorCategory::Validation,
            Self::PermissionDenied => ErrorCategory::Permission,
            Self::PositionUnavailable => ErrorCategory::Location,
            Self::HttpError { .. } => ErrorCategory::Http,
            Self::DecodeError { .. } | Self::SerializationError(_) => ErrorCategory::Decode,
            Self::NetworkError(_) => ErrorCategory::Network,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Permission | ErrorCategory::Location => ErrorSeverity::Low,
            ErrorCategory::Http | ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Validation | ErrorCategory::Decode => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidArgument { field, reason, .. } => {
                format!("Invalid value for {}: {}", field, reason)
            }
            Self::PermissionDenied => "Location permission denied".to_string(),
            Self::PositionUnavailable => "Your location is not available yet".to_string(),
            Self::HttpError { status } => {
                format!("The encyclopedia API answered with HTTP {}", status)
            }
            Self::DecodeError { .. } | Self::SerializationError(_) => {
                "The encyclopedia API returned a response that could not be read".to_string()
            }
            Self::NetworkError(_) => "Could not reach the encyclopedia API".to_string(),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::IoError(e) => format!("File system error: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => {
                "Check that latitude is within [-90, 90], longitude within [-180, 180] and the radius is positive"
            }
            ErrorCategory::Permission => "Grant location access and try again",
            ErrorCategory::Location => {
                "Provide a position with --lat/--lon or in the [location] section of the config file"
            }
            ErrorCategory::Http => "Try again later; the API may be unavailable or rate limiting",
            ErrorCategory::Decode => "Verify that --base-url points at a MediaWiki API host",
            ErrorCategory::Network => "Check your network connection and the configured base URL",
            ErrorCategory::Configuration => "Fix the configuration file and run again",
            ErrorCategory::Io => "Check that the file exists and is readable",
        }
    }
}

pub type Result<T> = std::result::Result<T, NearbyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_keeps_status() {
        let err = NearbyError::HttpError { status: 503 };
        assert_eq!(err.category(), ErrorCategory::Http);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_permission_and_location_are_low_severity() {
        assert_eq!(NearbyError::PermissionDenied.severity(), ErrorSeverity::Low);
        assert_eq!(NearbyError::PositionUnavailable.severity(), ErrorSeverity::Low);
        assert_eq!(
            NearbyError::PositionUnavailable.category(),
            ErrorCategory::Location
        );
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = NearbyError::invalid_argument("radius_meters", 0, "must be positive");
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(
            err.user_friendly_message(),
            "Invalid value for radius_meters: must be positive"
        );
    }
}
