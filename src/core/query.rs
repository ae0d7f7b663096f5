use crate::domain::model::{Article, Coordinate, EncodedQuery, GeosearchRequestParams};
use crate::utils::error::{NearbyError, Result};
use serde::Deserialize;

/// `Ok` carries the articles in API order, `Err` the typed failure.
pub type QueryOutcome = Result<Vec<Article>>;

const BODY_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct GeosearchResponse {
    #[serde(default)]
    query: Option<QueryBody>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    geosearch: Option<Vec<GeosearchHit>>,
}

#[derive(Debug, Deserialize)]
struct GeosearchHit {
    title: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    info: Option<String>,
}

impl From<GeosearchHit> for Article {
    fn from(hit: GeosearchHit) -> Self {
        Self {
            title: hit.title,
            latitude: hit.lat,
            longitude: hit.lon,
        }
    }
}

/// Builds the geosearch query for `coord` with the default action, format
/// and list values.
pub fn build_request(coord: &Coordinate, radius_meters: i64) -> Result<EncodedQuery> {
    GeosearchRequestParams::new(*coord, radius_meters).encode()
}

/// Interprets a geosearch response.
///
/// Non-2xx statuses fail without looking at the body. A missing
/// `query.geosearch` path is an empty success, not an error.
pub fn parse_response(raw_body: &[u8], http_status: u16) -> QueryOutcome {
    if !(200..=299).contains(&http_status) {
        return Err(NearbyError::HttpError {
            status: http_status,
        });
    }

    let value: serde_json::Value =
        serde_json::from_slice(raw_body).map_err(|e| decode_error(&e, raw_body))?;

    if !value.is_object() {
        return Err(NearbyError::DecodeError {
            detail: format!(
                "expected a JSON object at the top level, found {}; body: {}",
                json_kind(&value),
                body_preview(raw_body)
            ),
        });
    }

    let response =
        GeosearchResponse::deserialize(value).map_err(|e| decode_error(&e, raw_body))?;

    if let Some(api_error) = &response.error {
        tracing::warn!(
            "Geosearch API reported an error: code={}, info={}",
            api_error.code.as_deref().unwrap_or("unknown"),
            api_error.info.as_deref().unwrap_or("")
        );
    }

    let hits = response
        .query
        .and_then(|query| query.geosearch)
        .unwrap_or_default();

    Ok(hits.into_iter().map(Article::from).collect())
}

fn decode_error(err: &serde_json::Error, raw_body: &[u8]) -> NearbyError {
    NearbyError::DecodeError {
        detail: format!("{}; body: {}", err, body_preview(raw_body)),
    }
}

fn body_preview(raw_body: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw_body);
    let mut preview: String = text.chars().take(BODY_PREVIEW_CHARS).collect();
    if text.chars().count() > BODY_PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
