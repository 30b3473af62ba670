use crate::auth::sign_request;
use crate::responses::ApiErrorResponse;
use async_trait::async_trait;
use chrono::Utc;
use configuration::HttpConfig;
use core_types::QueryParams;
use reqwest::header::HeaderValue;
use serde_json::Value;
use std::time::Duration;

pub mod auth;
pub mod error;
pub mod responses;
pub mod session;
// --- Public API ---
pub use error::ApiError;
pub use session::AccountSession;

/// The header Binance reads the API key from. The key never goes in the query string.
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Spot account information, including balances.
pub const SPOT_ACCOUNT_PATH: &str = "/api/v3/account";
/// USD-M futures account information, including per-asset margin balances.
pub const FUTURES_ACCOUNT_PATH: &str = "/fapi/v2/account";
/// USD-M futures position risk, one entry per symbol.
pub const POSITION_RISK_PATH: &str = "/fapi/v2/positionRisk";

/// The transport seam for authenticated, read-only requests.
///
/// Sessions only talk to the exchange through this trait, so the live client
/// can be swapped for an in-memory one. Credentials are passed per call and
/// implementations must not keep them.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Performs a signed GET and returns the decoded JSON body.
    async fn get_signed(
        &self,
        base_url: &str,
        path: &str,
        params: QueryParams,
        api_key: &str,
        api_secret: &str,
    ) -> Result<Value, ApiError>;
}

/// Appends `timestamp`, then a `signature` over everything before it.
pub fn sign_params(mut params: QueryParams, api_secret: &str, timestamp_ms: i64) -> QueryParams {
    params.push("timestamp", timestamp_ms);
    let signature = sign_request(api_secret, &params);
    params.push("signature", signature);
    params
}

/// A concrete implementation of the `ApiClient` for the Binance exchange.
#[derive(Clone)]
pub struct BinanceClient {
    client: reqwest::Client,
    max_retries: u32,
    retry_backoff: Duration,
}

impl BinanceClient {
    pub fn new(http: &HttpConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            max_retries: http.max_retries,
            retry_backoff: Duration::from_millis(http.retry_backoff_ms),
        })
    }

    async fn send_once(
        &self,
        url: &str,
        params: &QueryParams,
        api_key: &str,
        api_secret: &str,
    ) -> Result<Value, ApiError> {
        // Stamped per attempt so a retry never reuses a stale timestamp.
        let signed = sign_params(params.clone(), api_secret, Utc::now().timestamp_millis());
        let key = HeaderValue::from_str(api_key)
            .map_err(|e| ApiError::InvalidHeader(e.to_string()))?;

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, key)
            .query(signed.pairs())
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str::<Value>(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
        } else {
            let body = serde_json::from_str::<ApiErrorResponse>(&text).ok();
            Err(ApiError::Status {
                status: status.as_u16(),
                code: body.as_ref().map(|b| b.code),
                message: body.map(|b| b.msg).unwrap_or(text),
            })
        }
    }
}

#[async_trait]
impl ApiClient for BinanceClient {
    async fn get_signed(
        &self,
        base_url: &str,
        path: &str,
        params: QueryParams,
        api_key: &str,
        api_secret: &str,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", base_url, path);
        let mut attempt = 0;

        loop {
            match self.send_once(&url, &params, api_key, api_secret).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.retry_backoff * attempt;
                    tracing::warn!(%url, attempt, error = %e, "Request failed, retrying in {:?}.", delay);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
