//! Client for the UCR prediction service.
//!
//! - `POST /api/v1/predict/{offense}` body `{"months": n}`, optional `?state=`
//! - `GET /api/v1/history/{offense}?months=n[&state=]`
//! - `GET /api/v1/models[?state=]`

use ucr_forecast_taxonomy::{Offense, StateCode};
use ucr_forecast_upstream_models::{
    HistoryPoint, ModelInfo, PredictionResponse, history_points, model_catalog,
};

use crate::{FetchError, REQUEST_TIMEOUT, read_json};

/// Default base URL for the prediction service.
const DEFAULT_BASE_URL: &str =
    "https://fbi-ucr-fbi-ucr.apps.cluster-tw52m.tw52m.sandbox448.opentlc.com";

/// HTTP client for the UCR prediction service.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    base_url: String,
}

impl PredictionClient {
    /// Creates a client against the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a client from the `UCR_API_BASE_URL` environment variable,
    /// falling back to the default service URL.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("UCR_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Fetches a forecast for one offense.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails, the service responds
    /// with a non-success status, or the body cannot be decoded.
    pub async fn fetch_prediction(
        &self,
        offense: Offense,
        months: u32,
        state: Option<StateCode>,
    ) -> Result<PredictionResponse, FetchError> {
        let url = format!("{}/api/v1/predict/{offense}", self.base_url);
        log::info!("Fetching prediction: {url} months={months} state={state:?}");

        let mut request = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "months": months }))
            .timeout(REQUEST_TIMEOUT);
        if let Some(state) = state {
            request = request.query(&[("state", state.to_string())]);
        }

        let body = read_json(request.send().await?).await?;
        Ok(PredictionResponse::from_json(&body))
    }

    /// Fetches the most recent `months` of historical data for one offense.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails, the service responds
    /// with a non-success status, or the body cannot be decoded.
    pub async fn fetch_history(
        &self,
        offense: Offense,
        months: u32,
        state: Option<StateCode>,
    ) -> Result<Vec<HistoryPoint>, FetchError> {
        let url = format!("{}/api/v1/history/{offense}", self.base_url);
        log::info!("Fetching history: {url} months={months} state={state:?}");

        let mut request = self
            .http
            .get(&url)
            .query(&[("months", months.to_string())])
            .timeout(REQUEST_TIMEOUT);
        if let Some(state) = state {
            request = request.query(&[("state", state.to_string())]);
        }

        let body = read_json(request.send().await?).await?;
        Ok(history_points(&body))
    }

    /// Fetches the model catalog, optionally filtered by state.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails, the service responds
    /// with a non-success status, or the body cannot be decoded.
    pub async fn fetch_models(
        &self,
        state: Option<StateCode>,
    ) -> Result<Vec<ModelInfo>, FetchError> {
        let url = format!("{}/api/v1/models", self.base_url);
        log::info!("Fetching model catalog: {url} state={state:?}");

        let mut request = self.http.get(&url).timeout(REQUEST_TIMEOUT);
        if let Some(state) = state {
            request = request.query(&[("state", state.to_string())]);
        }

        let body = read_json(request.send().await?).await?;
        Ok(model_catalog(&body))
    }
}

/// Per-offense fetch result for the compare tool.
///
/// Carries either the paired prediction+history payloads or an error
/// string, so that one offense's unreachable API never aborts the
/// comparison of the others.
#[derive(Debug)]
pub struct OffenseFetch {
    /// The offense this result belongs to.
    pub offense: Offense,
    /// Forecast response, when the fetch succeeded.
    pub prediction: Option<PredictionResponse>,
    /// Recent history, when the fetch succeeded.
    pub history: Vec<HistoryPoint>,
    /// Short error description, when either fetch failed.
    pub error: Option<String>,
}

/// Fetches prediction and latest history for one offense concurrently,
/// converting any failure into an error string on the result carrier.
pub async fn fetch_offense_data(
    client: &PredictionClient,
    offense: Offense,
    months: u32,
    state: Option<StateCode>,
) -> OffenseFetch {
    let result = tokio::try_join!(
        client.fetch_prediction(offense, months, state),
        client.fetch_history(offense, 1, state),
    );

    match result {
        Ok((prediction, history)) => OffenseFetch {
            offense,
            prediction: Some(prediction),
            history,
            error: None,
        },
        Err(err) => {
            log::warn!("Fetch failed for {offense}: {err}");
            OffenseFetch {
                offense,
                prediction: None,
                history: Vec::new(),
                error: Some(err.brief()),
            }
        }
    }
}
