use crate::{sort_oldest_first, CoinApiConfig, QuoteSource};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Months, SecondsFormat, Utc};
use common::{
    models::{CurrencyPair, PriceObservation},
    Error, Result,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use tracing::{debug, error};

/// Aggregation period requested from the exchange-rate history endpoint
pub const PERIOD_ID: &str = "8HRS";

const API_KEY_HEADER: &str = "X-CoinAPI-Key";

pub struct CoinApiConnector {
    client: reqwest::Client,
    base_url: String,
}

impl CoinApiConnector {
    pub fn new(config: &CoinApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.key)
            .map_err(|e| Error::ConfigError(format!("Invalid CoinAPI key: {}", e)))?;
        headers.insert(API_KEY_HEADER, key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn history_url(&self, pair: &CurrencyPair) -> String {
        format!(
            "{}/exchangerate/{}/{}/history",
            self.base_url, pair.crypto, pair.fiat
        )
    }
}

/// Window covering the month before `now`.
///
/// When the previous month is shorter, the start is clamped to its last day.
pub fn history_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now
        .checked_sub_months(Months::new(1))
        .unwrap_or_else(|| now - Duration::days(30));
    (start, now)
}

fn iso8601(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[async_trait]
impl QuoteSource for CoinApiConnector {
    async fn get_time_series(&self, pair: &CurrencyPair) -> Result<Vec<PriceObservation>> {
        let url = self.history_url(pair);
        let (start, end) = history_window(Utc::now());

        debug!(
            "Fetching {} history from CoinAPI: {} (period: {}, start: {}, end: {})",
            pair, url, PERIOD_ID, start, end
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period_id", PERIOD_ID.to_string()),
                ("time_start", iso8601(start)),
                ("time_end", iso8601(end)),
            ])
            .send()
            .await
            .map_err(Error::HttpError)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("CoinAPI error: {} - {}", status, error_text);
            return Err(Error::QuoteApiError(format!(
                "CoinAPI error: {} - {}",
                status, error_text
            )));
        }

        let mut observations: Vec<PriceObservation> = response.json().await.map_err(|e| {
            Error::ParseError(format!("Failed to parse CoinAPI history: {}", e))
        })?;

        sort_oldest_first(&mut observations);

        debug!("Received {} observations for {}", observations.len(), pair);

        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query, State},
        http::{HeaderMap as RequestHeaders, StatusCode},
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    struct Captured {
        crypto: String,
        fiat: String,
        params: HashMap<String, String>,
        api_key: Option<String>,
        accept: Option<String>,
    }

    type Captures = Arc<Mutex<Vec<Captured>>>;

    async fn history(
        State(captures): State<Captures>,
        Path((crypto, fiat)): Path<(String, String)>,
        Query(params): Query<HashMap<String, String>>,
        headers: RequestHeaders,
    ) -> impl IntoResponse {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let api_key = header("x-coinapi-key");
        captures.lock().unwrap().push(Captured {
            crypto,
            fiat,
            params,
            api_key: api_key.clone(),
            accept: header("accept"),
        });

        if api_key.as_deref() != Some("test-key") {
            return (StatusCode::UNAUTHORIZED, "Invalid API key").into_response();
        }

        // served newest first to exercise ordering
        Json(serde_json::json!([
            {
                "time_period_start": "2022-11-02T08:00:00.0000000Z",
                "time_period_end": "2022-11-02T16:00:00.0000000Z",
                "rate_open": 20300.25
            },
            {
                "time_period_start": "2022-11-02T00:00:00.0000000Z",
                "time_period_end": "2022-11-02T08:00:00.0000000Z",
                "rate_open": 20150.0
            }
        ]))
        .into_response()
    }

    async fn spawn_stub() -> (String, Captures) {
        let captures: Captures = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/v1/exchangerate/:crypto/:fiat/history", get(history))
            .with_state(captures.clone());

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::Server::from_tcp(listener)
                .unwrap()
                .serve(app.into_make_service())
                .await
                .unwrap();
        });

        (format!("http://{}/v1/", addr), captures)
    }

    #[tokio::test]
    async fn requests_eight_hour_history_with_key() {
        let (base_url, captures) = spawn_stub().await;
        let connector = CoinApiConnector::new(&CoinApiConfig::new(base_url, "test-key")).unwrap();

        let observations = connector
            .get_time_series(&CurrencyPair::new("EUR", "ETH"))
            .await
            .unwrap();

        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].open_rate, 20150.0);
        assert_eq!(observations[1].open_rate, 20300.25);

        let captured = captures.lock().unwrap()[0].clone();
        assert_eq!(captured.crypto, "ETH");
        assert_eq!(captured.fiat, "EUR");
        assert_eq!(captured.params.get("period_id").map(String::as_str), Some("8HRS"));
        assert_eq!(captured.api_key.as_deref(), Some("test-key"));
        assert_eq!(captured.accept.as_deref(), Some("application/json"));

        let start: DateTime<Utc> = captured.params["time_start"].parse().unwrap();
        let end: DateTime<Utc> = captured.params["time_end"].parse().unwrap();
        assert!(captured.params["time_end"].ends_with('Z'));
        assert!(end - start >= Duration::days(28));
        assert!(end - start <= Duration::days(31));
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let (base_url, _) = spawn_stub().await;
        let connector = CoinApiConnector::new(&CoinApiConfig::new(base_url, "wrong")).unwrap();

        let err = connector
            .get_time_series(&CurrencyPair::new("USD", "BTC"))
            .await
            .unwrap_err();

        match err {
            Error::QuoteApiError(msg) => {
                assert!(msg.contains("401"));
                assert!(msg.contains("Invalid API key"));
            }
            other => panic!("Expected QuoteApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_http_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = CoinApiConfig::new(format!("http://{}/v1", addr), "test-key");
        let connector = CoinApiConnector::new(&config).unwrap();
        let result = connector
            .get_time_series(&CurrencyPair::new("USD", "BTC"))
            .await;

        assert!(matches!(result, Err(Error::HttpError(_))));
    }

    #[test]
    fn window_spans_previous_month() {
        let now = Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap();
        let (start, end) = history_window(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 4, 15, 12, 0, 0).unwrap());
        assert_eq!(end, now);
    }

    #[test]
    fn window_clamps_to_shorter_month() {
        let now = Utc.with_ymd_and_hms(2023, 3, 31, 0, 0, 0).unwrap();
        let (start, _) = history_window(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2023, 2, 28, 0, 0, 0).unwrap());
    }

    #[test]
    fn timestamps_use_millisecond_utc_form() {
        let time = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(iso8601(time), "2024-01-02T03:04:05.000Z");
    }

    #[test]
    fn invalid_key_is_config_error() {
        let result = CoinApiConnector::new(&CoinApiConfig::new("http://localhost", "bad\nkey"));
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }
}
