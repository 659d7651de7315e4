use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chart::ChartConfig;
use common::{config::CurrencyConfig, Error as CommonError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::controller::ViewController;
use crate::view::ViewModel;

type SharedController = Arc<ViewController>;

// Create a wrapper for our common::Error type
pub struct ApiError(CommonError);

impl From<CommonError> for ApiError {
    fn from(err: CommonError) -> Self {
        ApiError(err)
    }
}

// Convert our API error wrapper to an Axum response
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            CommonError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            CommonError::QuoteApiError(msg) => (StatusCode::BAD_GATEWAY, msg),
            CommonError::ParseError(msg) => (StatusCode::BAD_REQUEST, msg),
            CommonError::StorageError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            CommonError::ChartError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            CommonError::HttpError(e) => (
                StatusCode::BAD_GATEWAY,
                format!("External API request failed: {}", e),
            ),
            CommonError::ConfigError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            CommonError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Routes of the chart page API, bound to one controller
pub fn routes(controller: SharedController) -> Router {
    Router::new()
        .route("/api/v1/currencies", get(list_currencies))
        .route("/api/v1/view", get(get_view))
        .route("/api/v1/chart", get(get_chart))
        .route("/api/v1/form/submit", post(submit))
        .route("/api/v1/form/fiat", post(change_fiat))
        .route("/api/v1/form/crypto", post(change_crypto))
        .route("/api/v1/form/auto-apply", post(change_auto_apply))
        .with_state(controller)
}

// Options for the fiat and crypto selects
pub async fn list_currencies(State(controller): State<SharedController>) -> Json<CurrencyConfig> {
    Json(controller.currencies().clone())
}

pub async fn get_view(State(controller): State<SharedController>) -> Json<ViewModel> {
    Json(controller.view().await)
}

// Configuration of the chart currently on screen
pub async fn get_chart(
    State(controller): State<SharedController>,
) -> Result<Json<ChartConfig>, ApiError> {
    let chart = controller
        .chart()
        .await
        .ok_or_else(|| CommonError::NotFound("No chart has been drawn".to_string()))?;
    Ok(Json(chart))
}

pub async fn submit(
    State(controller): State<SharedController>,
) -> Result<Json<ViewModel>, ApiError> {
    let state = controller.submit().await?;
    debug!("Submit finished in state {:?}", state);
    Ok(Json(controller.view().await))
}

#[derive(Debug, Deserialize)]
pub struct SelectChange {
    pub value: String,
}

pub async fn change_fiat(
    State(controller): State<SharedController>,
    Json(change): Json<SelectChange>,
) -> Result<Json<ViewModel>, ApiError> {
    controller.select_fiat(&change.value).await?;
    Ok(Json(controller.view().await))
}

pub async fn change_crypto(
    State(controller): State<SharedController>,
    Json(change): Json<SelectChange>,
) -> Result<Json<ViewModel>, ApiError> {
    controller.select_crypto(&change.value).await?;
    Ok(Json(controller.view().await))
}

#[derive(Debug, Deserialize)]
pub struct ToggleChange {
    pub checked: bool,
}

pub async fn change_auto_apply(
    State(controller): State<SharedController>,
    Json(change): Json<ToggleChange>,
) -> Result<Json<ViewModel>, ApiError> {
    controller.set_auto_apply(change.checked).await?;
    Ok(Json(controller.view().await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::DisplayConfig;
    use connectors::{fixture::FixtureConnector, FixtureConfig};
    use serde_json::{json, Value};
    use store::{MemoryStorage, PreferenceStore, StoreConfig};

    #[test]
    fn errors_map_to_status_codes() {
        let cases = [
            (CommonError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (CommonError::QuoteApiError("x".into()), StatusCode::BAD_GATEWAY),
            (CommonError::StorageError("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (CommonError::Conflict("x".into()), StatusCode::CONFLICT),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    async fn serve() -> String {
        let fixture = FixtureConfig {
            path: concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures/test.json").into(),
        };
        let display = DisplayConfig::default();
        let preferences = Arc::new(PreferenceStore::new(
            Arc::new(MemoryStorage::new()),
            &StoreConfig::default(),
            display.clone(),
        ));
        let controller = Arc::new(ViewController::new(
            Arc::new(FixtureConnector::new(&fixture)),
            preferences,
            display,
        ));
        let app = routes(controller);

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::Server::from_tcp(listener)
                .unwrap()
                .serve(app.into_make_service())
                .await
                .unwrap();
        });

        format!("http://{}/api/v1", addr)
    }

    #[tokio::test]
    async fn chart_is_missing_until_first_submit() {
        let base = serve().await;
        let client = reqwest::Client::new();

        let response = client.get(format!("{}/chart", base)).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());

        let response = client
            .post(format!("{}/form/submit", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let view: Value = response.json().await.unwrap();
        assert_eq!(view["state"]["status"], "loaded");

        let response = client.get(format!("{}/chart", base)).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let chart: Value = response.json().await.unwrap();
        assert_eq!(chart["type"], "line");
        assert_eq!(chart["options"]["scales"]["y"]["title"]["text"], "Price in USD");
    }

    #[tokio::test]
    async fn form_bodies_drive_the_controller() {
        let base = serve().await;
        let client = reqwest::Client::new();

        let view: Value = client
            .post(format!("{}/form/crypto", base))
            .json(&json!({ "value": "ETH" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(view["form"]["crypto"], "ETH");
        assert_eq!(view["state"]["status"], "idle");

        let view: Value = client
            .post(format!("{}/form/auto-apply", base))
            .json(&json!({ "checked": true }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(view["form"]["auto_apply"], true);
        assert_eq!(view["form"]["submit_enabled"], false);

        let response = client
            .post(format!("{}/form/submit", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);

        let view: Value = client
            .post(format!("{}/form/fiat", base))
            .json(&json!({ "value": "EUR" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(view["state"]["status"], "loaded");
        assert_eq!(
            view["chart"]["options"]["scales"]["y"]["title"]["text"],
            "Price in EUR"
        );
    }

    #[tokio::test]
    async fn malformed_bodies_are_rejected() {
        let base = serve().await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}/form/auto-apply", base))
            .json(&json!({ "checked": "yes" }))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_client_error());

        let currencies: Value = client
            .get(format!("{}/currencies", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(currencies["fiat"]["default"], "USD");
        assert_eq!(currencies["crypto"]["available"].as_array().unwrap().len(), 8);
    }
}
