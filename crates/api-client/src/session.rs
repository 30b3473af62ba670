use crate::responses::{open_positions, FuturesAccountResponse, PositionRiskResponse, SpotAccountResponse};
use crate::{ApiClient, FUTURES_ACCOUNT_PATH, POSITION_RISK_PATH, SPOT_ACCOUNT_PATH};
use core_types::{Credential, Endpoints, FuturesBalance, Position, QueryParams, SpotBalance};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// One account's read-only view of the exchange.
///
/// A session owns its credential and the base URLs it was built with; nothing
/// is shared between sessions except the stateless transport. Every read
/// returns an empty list when the request or the response shape fails. The
/// failure is logged here with the account name and the operation.
pub struct AccountSession {
    credential: Credential,
    endpoints: Endpoints,
    client: Arc<dyn ApiClient>,
}

impl AccountSession {
    pub fn new(credential: Credential, endpoints: Endpoints, client: Arc<dyn ApiClient>) -> Self {
        Self {
            credential,
            endpoints,
            client,
        }
    }

    /// Uses the network's default base URLs.
    pub fn for_network(credential: Credential, client: Arc<dyn ApiClient>) -> Self {
        let endpoints = Endpoints::for_network(credential.network());
        Self::new(credential, endpoints, client)
    }

    pub fn name(&self) -> &str {
        self.credential.name()
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Spot assets with a positive free + locked total.
    pub async fn spot_balances(&self) -> Vec<SpotBalance> {
        self.fetch::<SpotAccountResponse>(&self.endpoints.spot_url, SPOT_ACCOUNT_PATH, "spot balances")
            .await
            .map(SpotAccountResponse::into_balances)
            .unwrap_or_default()
    }

    /// Futures margin assets with a positive wallet balance.
    pub async fn futures_balances(&self) -> Vec<FuturesBalance> {
        self.fetch::<FuturesAccountResponse>(
            &self.endpoints.futures_url,
            FUTURES_ACCOUNT_PATH,
            "futures balances",
        )
        .await
        .map(FuturesAccountResponse::into_balances)
        .unwrap_or_default()
    }

    /// Futures positions with a non-zero amount.
    pub async fn futures_positions(&self) -> Vec<Position> {
        self.fetch::<Vec<PositionRiskResponse>>(
            &self.endpoints.futures_url,
            POSITION_RISK_PATH,
            "futures positions",
        )
        .await
        .map(open_positions)
        .unwrap_or_default()
    }

    async fn fetch<T: DeserializeOwned>(&self, base_url: &str, path: &str, operation: &str) -> Option<T> {
        let body = match self
            .client
            .get_signed(
                base_url,
                path,
                QueryParams::new(),
                self.credential.api_key(),
                self.credential.api_secret(),
            )
            .await
        {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(account = %self.name(), operation, error = %e, "Request failed.");
                return None;
            }
        };

        match serde_json::from_value::<T>(body) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::error!(account = %self.name(), operation, error = %e, "Unexpected response shape.");
                None
            }
        }
    }
}
