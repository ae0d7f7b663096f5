use crate::utils::error::Result;
use crate::utils::validation::{validate_finite_range, validate_non_empty_string, validate_positive};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_ACTION: &str = "query";
pub const DEFAULT_FORMAT: &str = "json";
pub const DEFAULT_LIST: &str = "geosearch";
pub const DEFAULT_RADIUS_METERS: i64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// 建立並驗證座標
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let coord = Self {
            latitude,
            longitude,
        };
        coord.validate()?;
        Ok(coord)
    }

    pub fn validate(&self) -> Result<()> {
        validate_finite_range("latitude", self.latitude, -90.0, 90.0)?;
        validate_finite_range("longitude", self.longitude, -180.0, 180.0)
    }

    /// `gscoord` wire format: `{lat}|{lon}` in shortest round-trip decimal form.
    pub fn to_gscoord(&self) -> String {
        format!("{}|{}", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeosearchRequestParams {
    action: String,
    format: String,
    list: String,
    center: Coordinate,
    radius_meters: i64,
}

impl GeosearchRequestParams {
    pub fn new(center: Coordinate, radius_meters: i64) -> Self {
        Self::with_api_values(DEFAULT_ACTION, DEFAULT_FORMAT, DEFAULT_LIST, center, radius_meters)
    }

    pub fn with_api_values(
        action: impl Into<String>,
        format: impl Into<String>,
        list: impl Into<String>,
        center: Coordinate,
        radius_meters: i64,
    ) -> Self {
        Self {
            action: action.into(),
            format: format.into(),
            list: list.into(),
            center,
            radius_meters,
        }
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn radius_meters(&self) -> i64 {
        self.radius_meters
    }

    /// Encodes the parameters into the query map sent to the API.
    ///
    /// Fails with `InvalidArgument` when the center is out of range or the
    /// radius is not positive.
    pub fn encode(&self) -> Result<EncodedQuery> {
        self.center.validate()?;
        validate_positive("radius_meters", self.radius_meters)?;
        validate_non_empty_string("action", &self.action)?;
        validate_non_empty_string("format", &self.format)?;
        validate_non_empty_string("list", &self.list)?;

        let mut params = BTreeMap::new();
        params.insert("action".to_string(), self.action.clone());
        params.insert("format".to_string(), self.format.clone());
        params.insert("list".to_string(), self.list.clone());
        params.insert("gscoord".to_string(), self.center.to_gscoord());
        params.insert("gsradius".to_string(), self.radius_meters.to_string());

        Ok(EncodedQuery { params })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EncodedQuery {
    params: BTreeMap<String, String>,
}

impl EncodedQuery {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.params
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Article {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.title, self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Status and body exactly as received from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gscoord_keeps_full_precision() {
        let coord = Coordinate::new(42.3557134, -3.6646324).unwrap();
        assert_eq!(coord.to_gscoord(), "42.3557134|-3.6646324");

        let precise = Coordinate::new(0.1234567890123, -179.98765432101).unwrap();
        assert_eq!(precise.to_gscoord(), "0.1234567890123|-179.98765432101");
    }

    #[test]
    fn test_gscoord_never_uses_exponent_notation() {
        let coord = Coordinate::new(0.00001, -0.000002).unwrap();
        assert_eq!(coord.to_gscoord(), "0.00001|-0.000002");
    }

    #[test]
    fn test_coordinate_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(90.5, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_encode_rejects_empty_api_values() {
        let center = Coordinate::new(1.0, 2.0).unwrap();
        let params = GeosearchRequestParams::with_api_values("", "json", "geosearch", center, 10);
        assert!(params.encode().is_err());
    }

    #[test]
    fn test_article_display() {
        let article = Article {
            title: "Burgos Cathedral".to_string(),
            latitude: 42.341,
            longitude: -3.704,
        };
        assert_eq!(article.to_string(), "Burgos Cathedral (42.341, -3.704)");
    }
}
