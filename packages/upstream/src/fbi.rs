//! Client for the FBI Crime Data Explorer summarized endpoints.
//!
//! - `GET /summarized/national/{offense}`
//! - `GET /summarized/state/{STATE}/{offense}`
//!
//! Both take `from`/`to` query parameters in `MM-YYYY` form plus an
//! `API_KEY`. The response nests actual counts and rates under a
//! location-named key (e.g. `"Texas Offenses"`).

use serde_json::Value;
use ucr_forecast_taxonomy::{Offense, StateCode};
use ucr_forecast_upstream_models::HistoryPoint;

use crate::{FetchError, REQUEST_TIMEOUT, read_json};

/// Default base URL for the FBI Crime Data Explorer API.
const DEFAULT_BASE_URL: &str = "https://api.usa.gov/crime/fbi/cde";

/// HTTP client for the FBI Crime Data Explorer.
#[derive(Debug, Clone)]
pub struct CrimeDataClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CrimeDataClient {
    /// Creates a client against the given base URL with an optional API key.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Creates a client from `FBI_API_BASE_URL` (defaulted) and
    /// `FBI_API_KEY` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("FBI_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url, std::env::var("FBI_API_KEY").ok())
    }

    /// Fetches monthly historical data for an offense over a year range.
    ///
    /// National scope when `state` is `None`. Points are returned sorted by
    /// date ascending.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails, the API responds with a
    /// non-success status, or the body cannot be decoded.
    pub async fn fetch_history(
        &self,
        offense: Offense,
        state: Option<StateCode>,
        from_year: i32,
        to_year: i32,
    ) -> Result<Vec<HistoryPoint>, FetchError> {
        let url = state.map_or_else(
            || format!("{}/summarized/national/{offense}", self.base_url),
            |state| format!("{}/summarized/state/{state}/{offense}", self.base_url),
        );
        log::info!("Fetching FBI history: {url} {from_year}-{to_year}");

        let mut query = vec![
            ("from".to_string(), format!("01-{from_year}")),
            ("to".to_string(), format!("12-{to_year}")),
        ];
        if let Some(key) = &self.api_key {
            query.push(("API_KEY".to_string(), key.clone()));
        }

        let resp = self
            .http
            .get(&url)
            .query(&query)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        let body = read_json(resp).await?;

        let location = state.map_or("United States", StateCode::display_name);
        Ok(parse_summarized(&body, location))
    }
}

/// Converts the API's `MM-YYYY` date form to `YYYY-MM`.
///
/// Anything that doesn't look like `MM-YYYY` passes through unchanged.
fn normalize_api_date(api_date: &str) -> String {
    if let Some((month, year)) = api_date.split_once('-')
        && month.len() == 2
    {
        return format!("{year}-{month}");
    }
    api_date.to_string()
}

/// Extracts monthly points from a summarized response body.
///
/// Actuals and rates are keyed by `"<location> Offenses"` inside the
/// `offenses` block; rates are joined onto actuals by the raw date key.
#[allow(clippy::cast_possible_truncation)]
fn parse_summarized(body: &Value, location: &str) -> Vec<HistoryPoint> {
    let key = format!("{location} Offenses");

    let section = |name: &str| {
        body.get("offenses")
            .and_then(|offenses| offenses.get(name))
            .and_then(|block| block.get(&key))
            .and_then(Value::as_object)
    };

    let Some(actuals) = section("actuals") else {
        return Vec::new();
    };
    let rates = section("rates");

    let mut points: Vec<HistoryPoint> = actuals
        .iter()
        .map(|(date, actual)| HistoryPoint {
            date: normalize_api_date(date),
            actual: actual
                .as_i64()
                .or_else(|| actual.as_f64().map(|v| v.round() as i64))
                .unwrap_or(0),
            rate: rates
                .and_then(|rates| rates.get(date))
                .and_then(Value::as_f64),
        })
        .collect();

    points.sort_by(|a, b| a.date.cmp(&b.date));
    points
}
